use crate::error::GameError;
use crate::games::{GameView, time_seed};
use crate::timer::Timer;
use crossterm::event::{KeyCode, KeyEvent};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;

pub const MIN_DIFFICULTY: u8 = 1;
pub const MAX_DIFFICULTY: u8 = 5;
pub const COLUMNS: usize = 4;
pub const MAX_TILES: usize = MAX_DIFFICULTY as usize * COLUMNS;
pub const TICK: Duration = Duration::from_millis(100);

const IDLE_STATUS: &str = "click 'start' to begin";
const WON_STATUS: &str = "you've done";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tile
{
    value: u32,
    revealed: bool,
    active: bool,
}

impl Tile
{
    fn hidden() -> Self
    {
        Self {
            value: 0,
            revealed: false,
            active: true,
        }
    }

    pub fn value(&self) -> u32
    {
        self.value
    }

    pub fn is_revealed(&self) -> bool
    {
        self.revealed
    }

    /// False once the tile belongs to a solved pair.
    pub fn is_active(&self) -> bool
    {
        self.active
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActivateOutcome
{
    Opened,
    Closed,
    Matched
    {
        value: u32,
    },
    Won,
}

pub struct NumPairs
{
    tiles: Vec<Tile>,
    revealed_count: usize,
    click_count: u32,
    elapsed: Duration,
    clock: Timer,
    started: bool,
    won: bool,
}

impl Default for NumPairs
{
    fn default() -> Self
    {
        Self::new()
    }
}

impl NumPairs
{
    pub fn new() -> Self
    {
        Self {
            tiles: Vec::with_capacity(MAX_TILES),
            revealed_count: 0,
            click_count: 0,
            elapsed: Duration::ZERO,
            clock: Timer::every(TICK),
            started: false,
            won: false,
        }
    }

    pub fn start_round(&mut self, difficulty: u8) -> Result<(), GameError>
    {
        let mut rng = StdRng::seed_from_u64(time_seed());
        self.start_round_with(difficulty, &mut rng)
    }

    pub fn start_round_with(&mut self, difficulty: u8, rng: &mut impl Rng)
        -> Result<(), GameError>
    {
        if !(MIN_DIFFICULTY..=MAX_DIFFICULTY).contains(&difficulty) {
            return Err(GameError::invalid(format!(
                "Difficulty must be {MIN_DIFFICULTY}-{MAX_DIFFICULTY}, got {difficulty}"
            )));
        }

        let tile_count = difficulty as usize * COLUMNS;
        self.tiles.clear();
        self.tiles.resize(tile_count, Tile::hidden());
        place_pairs(&mut self.tiles, rng);

        self.revealed_count = 0;
        self.click_count = 0;
        self.elapsed = Duration::ZERO;
        self.started = true;
        self.won = false;
        self.clock.start();

        debug!("numpairs: round started with {tile_count} tiles");
        Ok(())
    }

    pub fn activate(&mut self, index: usize) -> Result<ActivateOutcome, GameError>
    {
        let len = self.tiles.len();
        let tile = self
            .tiles
            .get(index)
            .ok_or(GameError::OutOfRange { index, len })?;
        if !tile.active {
            return Err(GameError::invalid(format!("Tile {index} is already matched")));
        }

        if self.revealed_count >= 2 {
            for tile in self.tiles.iter_mut().filter(|tile| tile.active) {
                tile.revealed = false;
            }
            self.revealed_count = 0;
        }

        let tile = &mut self.tiles[index];
        let mut outcome = if tile.revealed {
            tile.revealed = false;
            self.revealed_count -= 1;
            ActivateOutcome::Closed
        } else {
            tile.revealed = true;
            self.revealed_count += 1;
            ActivateOutcome::Opened
        };
        self.click_count += 1;

        if let Some(value) = self.match_open_pair() {
            debug!("numpairs: pair of {value} matched");
            outcome = ActivateOutcome::Matched { value };
        }

        if self.tiles.iter().all(|tile| tile.revealed) {
            self.clock.stop();
            self.won = true;
            info!(
                "numpairs: won in {} clicks, {}",
                self.click_count,
                self.elapsed_text()
            );
            outcome = ActivateOutcome::Won;
        }

        Ok(outcome)
    }

    fn match_open_pair(&mut self) -> Option<u32>
    {
        let open: Vec<usize> = self
            .tiles
            .iter()
            .enumerate()
            .filter(|(_, tile)| tile.active && tile.revealed)
            .map(|(idx, _)| idx)
            .collect();

        let [first, second] = open[..] else {
            return None;
        };
        let value = self.tiles[first].value;
        if value != self.tiles[second].value {
            return None;
        }

        self.tiles[first].active = false;
        self.tiles[second].active = false;
        self.revealed_count -= 2;
        Some(value)
    }

    /// Display refresh: one clock period of play time.
    pub fn tick(&mut self)
    {
        self.elapsed += TICK;
    }

    pub fn update(&mut self, dt: Duration)
    {
        for _ in 0..self.clock.advance(dt) {
            self.tick();
        }
    }

    pub fn tiles(&self) -> &[Tile]
    {
        &self.tiles
    }

    pub fn revealed_count(&self) -> usize
    {
        self.revealed_count
    }

    pub fn click_count(&self) -> u32
    {
        self.click_count
    }

    pub fn elapsed(&self) -> Duration
    {
        self.elapsed
    }

    pub fn is_started(&self) -> bool
    {
        self.started
    }

    pub fn is_won(&self) -> bool
    {
        self.won
    }

    pub fn is_clock_running(&self) -> bool
    {
        self.clock.is_running()
    }

    pub fn status_text(&self) -> &'static str
    {
        if self.won {
            WON_STATUS
        } else if self.started {
            ""
        } else {
            IDLE_STATUS
        }
    }

    pub fn clicks_text(&self) -> String
    {
        format!("clicks: {}", self.click_count)
    }

    pub fn elapsed_text(&self) -> String
    {
        format_hms(self.elapsed)
    }
}

/// Gives every value in `0..len/2` to exactly two tiles. Each tile takes a
/// position drawn uniformly from the ones still free.
fn place_pairs(tiles: &mut [Tile], rng: &mut impl Rng)
{
    let mut places: Vec<usize> = (0..tiles.len()).collect();
    let pairs = tiles.len() / 2;

    for value in 0..pairs as u32 {
        for _ in 0..2 {
            let pick = rng.gen_range(0..places.len());
            let place = places.remove(pick);
            tiles[place].value = value;
        }
    }
}

pub fn format_hms(elapsed: Duration) -> String
{
    let total = elapsed.as_secs();
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}

pub struct NumPairsView
{
    game: NumPairs,
    difficulty: u8,
    cursor: usize,
}

impl Default for NumPairsView
{
    fn default() -> Self
    {
        Self::new()
    }
}

impl NumPairsView
{
    pub fn new() -> Self
    {
        Self::with_difficulty(MIN_DIFFICULTY)
    }

    pub fn with_difficulty(difficulty: u8) -> Self
    {
        Self {
            game: NumPairs::new(),
            difficulty: difficulty.clamp(MIN_DIFFICULTY, MAX_DIFFICULTY),
            cursor: 0,
        }
    }

    pub fn game(&self) -> &NumPairs
    {
        &self.game
    }

    pub fn difficulty(&self) -> u8
    {
        self.difficulty
    }

    pub fn cursor(&self) -> usize
    {
        self.cursor
    }

    fn start_label(&self) -> &'static str
    {
        if self.game.is_started() && !self.game.is_won() {
            "restart"
        } else {
            "start"
        }
    }

    fn move_cursor(&mut self, code: KeyCode)
    {
        let len = self.game.tiles().len();
        if len == 0 {
            return;
        }
        let col = self.cursor % COLUMNS;
        self.cursor = match code {
            KeyCode::Left if col > 0 => self.cursor - 1,
            KeyCode::Right if col + 1 < COLUMNS && self.cursor + 1 < len => self.cursor + 1,
            KeyCode::Up if self.cursor >= COLUMNS => self.cursor - COLUMNS,
            KeyCode::Down if self.cursor + COLUMNS < len => self.cursor + COLUMNS,
            _ => self.cursor,
        };
    }

    fn render_tile(&self, index: usize, tile: &Tile) -> String
    {
        let face = if tile.is_revealed() {
            tile.value().to_string()
        } else {
            "X".to_string()
        };
        let (open, close) = if index == self.cursor {
            ('[', ']')
        } else if !tile.is_active() {
            ('(', ')')
        } else {
            (' ', ' ')
        };
        format!("{open}{face:>2}{close}")
    }
}

impl GameView for NumPairsView
{
    fn name(&self) -> &str
    {
        "NumPairs"
    }

    fn handle_key(&mut self, key: KeyEvent) -> Result<(), GameError>
    {
        match key.code {
            KeyCode::Char('s') | KeyCode::Char('S') => {
                self.game.start_round(self.difficulty)?;
                self.cursor = 0;
            }
            KeyCode::Char('+') | KeyCode::Char('=') => {
                self.difficulty = (self.difficulty + 1).min(MAX_DIFFICULTY);
            }
            KeyCode::Char('-') => {
                self.difficulty = self.difficulty.saturating_sub(1).max(MIN_DIFFICULTY);
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                self.game.activate(self.cursor)?;
            }
            KeyCode::Left | KeyCode::Right | KeyCode::Up | KeyCode::Down => {
                self.move_cursor(key.code);
            }
            _ => {}
        }
        Ok(())
    }

    fn update(&mut self, dt: Duration)
    {
        self.game.update(dt);
    }

    fn render(&self) -> Vec<String>
    {
        let mut lines = Vec::new();
        lines.push(self.game.status_text().to_string());
        lines.push(format!(
            "{}   {}",
            self.game.elapsed_text(),
            self.game.clicks_text()
        ));
        lines.push(format!(
            "choose difficulty: {} [{}-{}]   [s] {}",
            self.difficulty,
            MIN_DIFFICULTY,
            MAX_DIFFICULTY,
            self.start_label()
        ));
        lines.push(String::new());

        for (row, chunk) in self.game.tiles().chunks(COLUMNS).enumerate() {
            let cells: Vec<String> = chunk
                .iter()
                .enumerate()
                .map(|(col, tile)| self.render_tile(row * COLUMNS + col, tile))
                .collect();
            lines.push(cells.join(" "));
        }

        lines.push(String::new());
        lines.push("Arrows move, Enter/Space opens, +/- difficulty.".to_string());
        lines
    }
}
