pub mod num_pairs;
pub mod numem;

use crate::error::GameError;
use crossterm::event::KeyEvent;
use log::debug;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// A playable game as seen by the shell: keys in, text lines out.
pub trait GameView
{
    fn name(&self) -> &str;

    fn handle_key(&mut self, key: KeyEvent) -> Result<(), GameError>;

    /// Forwards wall time that passed since the previous call.
    fn update(&mut self, dt: Duration);

    fn render(&self) -> Vec<String>;
}

pub type GameFactory = Box<dyn Fn() -> Box<dyn GameView>>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameDescriptor
{
    pub name: &'static str,
    pub description: &'static str,
}

struct Entry
{
    descriptor: GameDescriptor,
    factory: GameFactory,
}

#[derive(Default)]
pub struct Selector
{
    entries: Vec<Entry>,
    active: Option<Box<dyn GameView>>,
}

impl Selector
{
    pub fn new() -> Self
    {
        Self::default()
    }

    pub fn with_default_games() -> Self
    {
        let mut selector = Self::new();
        selector.register(
            "NumPairs",
            "Open tiles two at a time and find every pair",
            || Box::new(num_pairs::NumPairsView::new()),
        );
        selector.register(
            "Numem",
            "Memorize a number before it is hidden",
            || Box::new(numem::NumemView::new()),
        );
        selector
    }

    /// Registering a name twice replaces the earlier factory in place.
    pub fn register<F>(&mut self, name: &'static str, description: &'static str, factory: F)
    where
        F: Fn() -> Box<dyn GameView> + 'static,
    {
        let added = Entry {
            descriptor: GameDescriptor { name, description },
            factory: Box::new(factory),
        };
        match self.entries.iter_mut().find(|entry| entry.descriptor.name == name) {
            Some(existing) => *existing = added,
            None => self.entries.push(added),
        }
    }

    pub fn list_names(&self) -> Vec<&'static str>
    {
        self.entries.iter().map(|entry| entry.descriptor.name).collect()
    }

    pub fn descriptors(&self) -> Vec<GameDescriptor>
    {
        self.entries.iter().map(|entry| entry.descriptor).collect()
    }

    /// Builds a fresh view for `name` (case-insensitive), dropping the
    /// previous one.
    pub fn activate(&mut self, name: &str) -> Result<&mut dyn GameView, GameError>
    {
        let entry = self
            .entries
            .iter()
            .find(|entry| entry.descriptor.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| GameError::NotFound(name.to_string()))?;

        let view = (entry.factory)();
        debug!("selector: activated {}", entry.descriptor.name);
        Ok(&mut **self.active.insert(view))
    }

    /// Same as [`Selector::activate`] but with an already built view, for
    /// callers that preset options on it.
    pub fn activate_with(&mut self, view: Box<dyn GameView>) -> &mut dyn GameView
    {
        debug!("selector: activated {}", view.name());
        &mut **self.active.insert(view)
    }

    pub fn active(&self) -> Option<&dyn GameView>
    {
        self.active.as_deref()
    }

    pub fn active_mut(&mut self) -> Option<&mut (dyn GameView + 'static)>
    {
        self.active.as_deref_mut()
    }

    pub fn deactivate(&mut self)
    {
        self.active = None;
    }
}

pub(crate) fn time_seed() -> u64
{
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|since| since.as_nanos() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests
{
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    struct Probe;

    impl GameView for Probe
    {
        fn name(&self) -> &str
        {
            "Probe"
        }

        fn handle_key(&mut self, _key: KeyEvent) -> Result<(), GameError>
        {
            Ok(())
        }

        fn update(&mut self, _dt: Duration) {}

        fn render(&self) -> Vec<String>
        {
            vec!["probe".to_string()]
        }
    }

    #[test]
    fn default_games_are_listed_in_order()
    {
        let selector = Selector::with_default_games();
        assert_eq!(selector.list_names(), vec!["NumPairs", "Numem"]);
        assert!(selector.active().is_none());
    }

    #[test]
    fn unknown_name_is_not_found()
    {
        let mut selector = Selector::with_default_games();
        let err = selector.activate("Chess").err().unwrap();
        assert_eq!(err, GameError::NotFound("Chess".to_string()));
    }

    #[test]
    fn activation_builds_a_fresh_view_each_time()
    {
        let built = Rc::new(Cell::new(0));
        let counter = Rc::clone(&built);
        let mut selector = Selector::new();
        selector.register("Probe", "test view", move || {
            counter.set(counter.get() + 1);
            Box::new(Probe)
        });

        assert_eq!(selector.activate("probe").unwrap().name(), "Probe");
        selector.activate("Probe").unwrap();
        assert_eq!(built.get(), 2);
    }

    #[test]
    fn switching_games_replaces_the_active_view()
    {
        let mut selector = Selector::with_default_games();
        selector.activate("NumPairs").unwrap();
        selector.activate("Numem").unwrap();
        assert_eq!(selector.active().map(|view| view.name()), Some("Numem"));

        selector.deactivate();
        assert!(selector.active().is_none());
    }

    #[test]
    fn reregistering_keeps_position()
    {
        let mut selector = Selector::with_default_games();
        selector.register("NumPairs", "replacement", || Box::new(Probe));
        assert_eq!(selector.list_names(), vec!["NumPairs", "Numem"]);
        assert_eq!(selector.descriptors()[0].description, "replacement");
        assert_eq!(selector.activate("NumPairs").unwrap().name(), "Probe");
    }
}
