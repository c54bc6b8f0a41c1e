//! Two memory mini-games behind a terminal game-selection shell.
//!
//! - [`games::num_pairs`]: open tiles two at a time and find every pair.
//! - [`games::numem`]: memorize a number, then type it back once hidden.
//!
//! Engines are plain state machines driven by key events and by elapsed
//! time handed to their `update`; the [`shell`] owns the terminal.

pub mod config;
pub mod error;
pub mod games;
pub mod shell;
pub mod timer;

pub use error::GameError;
pub use games::{GameDescriptor, GameView, Selector};
