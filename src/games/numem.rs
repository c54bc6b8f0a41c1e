use crate::error::GameError;
use crate::games::{GameView, time_seed};
use crate::timer::Timer;
use crossterm::event::{KeyCode, KeyEvent};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fmt;
use std::time::Duration;

pub const MIN_DIFFICULTY: u8 = 1;
pub const MAX_DIFFICULTY: u8 = 10;
pub const DEFAULT_DIFFICULTY: u8 = 5;
pub const MEMORIZE_TIME: Duration = Duration::from_millis(5000);
const MASK: char = '*';

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase
{
    Idle,
    Revealing,
    AwaitingInput,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict
{
    Excellent,
    Errors(usize),
}

impl Verdict
{
    pub fn errors(self) -> usize
    {
        match self {
            Verdict::Excellent => 0,
            Verdict::Errors(count) => count,
        }
    }
}

impl fmt::Display for Verdict
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        match self {
            Verdict::Excellent => write!(f, "excellent"),
            Verdict::Errors(1) => write!(f, "1 error"),
            Verdict::Errors(count) => write!(f, "{count} errors"),
        }
    }
}

pub struct Numem
{
    difficulty: u8,
    sequence: Vec<u8>,
    phase: Phase,
    reveal: Timer,
    verdict: Option<Verdict>,
}

impl Default for Numem
{
    fn default() -> Self
    {
        Self::new(DEFAULT_DIFFICULTY)
    }
}

impl Numem
{
    pub fn new(difficulty: u8) -> Self
    {
        Self {
            difficulty: difficulty.clamp(MIN_DIFFICULTY, MAX_DIFFICULTY),
            sequence: Vec::with_capacity(MAX_DIFFICULTY as usize),
            phase: Phase::Idle,
            reveal: Timer::once(MEMORIZE_TIME),
            verdict: None,
        }
    }

    pub fn difficulty(&self) -> u8
    {
        self.difficulty
    }

    /// Locked from `generate` until the next `submit`.
    pub fn set_difficulty(&mut self, difficulty: u8) -> Result<(), GameError>
    {
        if self.phase != Phase::Idle {
            return Err(GameError::invalid("Difficulty is locked until the number is checked"));
        }
        if !(MIN_DIFFICULTY..=MAX_DIFFICULTY).contains(&difficulty) {
            return Err(GameError::invalid(format!(
                "Difficulty must be {MIN_DIFFICULTY}-{MAX_DIFFICULTY}, got {difficulty}"
            )));
        }
        self.difficulty = difficulty;
        Ok(())
    }

    pub fn generate(&mut self) -> Result<(), GameError>
    {
        let mut rng = StdRng::seed_from_u64(time_seed());
        self.generate_with(&mut rng)
    }

    pub fn generate_with(&mut self, rng: &mut impl Rng) -> Result<(), GameError>
    {
        if self.phase != Phase::Idle {
            return Err(GameError::invalid("A number is already being memorized"));
        }

        self.sequence.clear();
        self.sequence
            .extend((0..self.difficulty).map(|_| rng.gen_range(0..=9u8)));
        self.verdict = None;
        self.phase = Phase::Revealing;
        self.reveal.start();

        debug!("numem: generated {} digits", self.sequence.len());
        Ok(())
    }

    pub fn on_reveal_timeout(&mut self) -> Result<(), GameError>
    {
        if self.phase != Phase::Revealing {
            return Err(GameError::invalid("Nothing is being revealed"));
        }
        self.reveal.stop();
        self.phase = Phase::AwaitingInput;
        debug!("numem: number hidden, awaiting input");
        Ok(())
    }

    /// Compares `input` with the sequence digit by digit. Digits past the
    /// sequence length are ignored; a shorter input is `OutOfRange` and the
    /// round stays open for another attempt.
    pub fn submit(&mut self, input: &[u8]) -> Result<Verdict, GameError>
    {
        if self.phase != Phase::AwaitingInput {
            return Err(GameError::invalid("Generate a number before checking"));
        }

        let mut errors = 0;
        for (index, expected) in self.sequence.iter().enumerate() {
            let actual = input.get(index).ok_or(GameError::OutOfRange {
                index,
                len: input.len(),
            })?;
            if actual != expected {
                errors += 1;
            }
        }

        let verdict = if errors == 0 {
            Verdict::Excellent
        } else {
            Verdict::Errors(errors)
        };
        self.verdict = Some(verdict);
        self.phase = Phase::Idle;
        info!("numem: {} digits checked, {verdict}", self.sequence.len());
        Ok(verdict)
    }

    pub fn update(&mut self, dt: Duration)
    {
        if self.reveal.advance(dt) > 0 {
            let _ = self.on_reveal_timeout();
        }
    }

    pub fn phase(&self) -> Phase
    {
        self.phase
    }

    pub fn sequence(&self) -> &[u8]
    {
        &self.sequence
    }

    pub fn last_verdict(&self) -> Option<Verdict>
    {
        self.verdict
    }

    pub fn display_text(&self) -> String
    {
        match self.phase {
            Phase::AwaitingInput => MASK.to_string().repeat(self.sequence.len()),
            Phase::Revealing | Phase::Idle => self
                .sequence
                .iter()
                .map(|digit| char::from(b'0' + digit))
                .collect(),
        }
    }

    pub fn result_text(&self) -> String
    {
        self.verdict
            .map(|verdict| verdict.to_string())
            .unwrap_or_default()
    }

    pub fn action_label(&self) -> &'static str
    {
        match self.phase {
            Phase::Idle => "generate a number",
            Phase::Revealing | Phase::AwaitingInput => "check",
        }
    }

    pub fn accepts_input(&self) -> bool
    {
        self.phase == Phase::AwaitingInput
    }
}

pub fn parse_digits(text: &str) -> Result<Vec<u8>, GameError>
{
    text.chars()
        .map(|ch| {
            ch.to_digit(10)
                .map(|digit| digit as u8)
                .ok_or_else(|| GameError::invalid(format!("'{ch}' is not a digit")))
        })
        .collect()
}

pub struct NumemView
{
    game: Numem,
    input: String,
}

impl Default for NumemView
{
    fn default() -> Self
    {
        Self::new()
    }
}

impl NumemView
{
    pub fn new() -> Self
    {
        Self::with_difficulty(DEFAULT_DIFFICULTY)
    }

    pub fn with_difficulty(difficulty: u8) -> Self
    {
        Self {
            game: Numem::new(difficulty),
            input: String::new(),
        }
    }

    pub fn game(&self) -> &Numem
    {
        &self.game
    }

    pub fn input(&self) -> &str
    {
        &self.input
    }

    fn act(&mut self) -> Result<(), GameError>
    {
        match self.game.phase() {
            Phase::Idle => {
                self.game.generate()?;
                self.input.clear();
            }
            Phase::AwaitingInput => {
                let digits = parse_digits(&self.input)?;
                self.game.submit(&digits)?;
            }
            Phase::Revealing => {
                return Err(GameError::invalid("Wait until the number is hidden"));
            }
        }
        Ok(())
    }
}

impl GameView for NumemView
{
    fn name(&self) -> &str
    {
        "Numem"
    }

    fn handle_key(&mut self, key: KeyEvent) -> Result<(), GameError>
    {
        match key.code {
            KeyCode::Enter => self.act(),
            KeyCode::Char('+') | KeyCode::Char('=') => {
                let next = (self.game.difficulty() + 1).min(MAX_DIFFICULTY);
                self.game.set_difficulty(next)
            }
            KeyCode::Char('-') => {
                let next = self.game.difficulty().saturating_sub(1).max(MIN_DIFFICULTY);
                self.game.set_difficulty(next)
            }
            KeyCode::Char(ch) if ch.is_ascii_digit() => {
                if self.game.accepts_input() && self.input.len() < MAX_DIFFICULTY as usize {
                    self.input.push(ch);
                }
                Ok(())
            }
            KeyCode::Backspace => {
                if self.game.accepts_input() {
                    self.input.pop();
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn update(&mut self, dt: Duration)
    {
        self.game.update(dt);
    }

    fn render(&self) -> Vec<String>
    {
        let mut lines = Vec::new();
        let lock = if self.game.phase() == Phase::Idle { "" } else { " (locked)" };
        lines.push(format!(
            "difficulty: {} [{}-{}]{}",
            self.game.difficulty(),
            MIN_DIFFICULTY,
            MAX_DIFFICULTY,
            lock
        ));
        lines.push(String::new());
        lines.push(format!(
            "{:<12} {}",
            self.game.display_text(),
            self.game.result_text()
        ));
        lines.push(String::new());

        let input = if self.game.accepts_input() {
            format!("> {}_", self.input)
        } else {
            format!("  {}", self.input)
        };
        let action = if self.game.phase() == Phase::Revealing {
            format!("({})", self.game.action_label())
        } else {
            format!("[Enter] {}", self.game.action_label())
        };
        lines.push(format!("{input:<14} {action}"));

        lines.push(String::new());
        lines.push("Type digits, Enter to act, +/- difficulty.".to_string());
        lines
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    fn generated(difficulty: u8, seed: u64) -> Numem
    {
        let mut game = Numem::new(difficulty);
        let mut rng = StdRng::seed_from_u64(seed);
        game.generate_with(&mut rng).unwrap();
        game
    }

    fn flipped(digit: u8) -> u8
    {
        (digit + 1) % 10
    }

    #[test]
    fn generate_yields_requested_length_and_reveals()
    {
        let game = generated(3, 1);
        assert_eq!(game.sequence().len(), 3);
        assert!(game.sequence().iter().all(|digit| *digit <= 9));
        assert_eq!(game.phase(), Phase::Revealing);
        assert_eq!(game.display_text().len(), 3);
        assert_eq!(game.action_label(), "check");
    }

    #[test]
    fn reveal_window_expires_after_five_seconds()
    {
        let mut game = generated(4, 2);
        game.update(Duration::from_millis(4999));
        assert_eq!(game.phase(), Phase::Revealing);
        game.update(Duration::from_millis(1));
        assert_eq!(game.phase(), Phase::AwaitingInput);
        assert_eq!(game.display_text(), "****");
    }

    #[test]
    fn timeout_outside_reveal_is_rejected()
    {
        let mut game = Numem::default();
        assert_eq!(game.on_reveal_timeout().unwrap_err().code(), "invalid_operation");
    }

    #[test]
    fn submit_before_generate_is_rejected()
    {
        let mut game = Numem::default();
        assert_eq!(game.submit(&[1, 2, 3]).unwrap_err().code(), "invalid_operation");

        let mut game = generated(3, 3);
        assert_eq!(game.submit(&[1, 2, 3]).unwrap_err().code(), "invalid_operation");
    }

    #[test]
    fn verdicts_count_wrong_positions()
    {
        let mut game = generated(3, 4);
        game.on_reveal_timeout().unwrap();
        let exact = game.sequence().to_vec();
        assert_eq!(game.submit(&exact), Ok(Verdict::Excellent));
        assert_eq!(game.result_text(), "excellent");
        assert_eq!(game.phase(), Phase::Idle);

        let mut game = generated(3, 5);
        game.on_reveal_timeout().unwrap();
        let mut one_off = game.sequence().to_vec();
        one_off[1] = flipped(one_off[1]);
        assert_eq!(game.submit(&one_off), Ok(Verdict::Errors(1)));
        assert_eq!(game.result_text(), "1 error");

        let mut game = generated(3, 6);
        game.on_reveal_timeout().unwrap();
        let all_off: Vec<u8> = game.sequence().iter().map(|digit| flipped(*digit)).collect();
        assert_eq!(game.submit(&all_off), Ok(Verdict::Errors(3)));
        assert_eq!(game.result_text(), "3 errors");
        assert_eq!(game.last_verdict().map(Verdict::errors), Some(3));
    }

    #[test]
    fn short_input_is_out_of_range_and_keeps_the_round()
    {
        let mut game = generated(4, 7);
        game.on_reveal_timeout().unwrap();
        let partial = game.sequence()[..2].to_vec();

        assert_eq!(
            game.submit(&partial),
            Err(GameError::OutOfRange { index: 2, len: 2 })
        );
        assert_eq!(game.phase(), Phase::AwaitingInput);

        let full = game.sequence().to_vec();
        assert_eq!(game.submit(&full), Ok(Verdict::Excellent));
    }

    #[test]
    fn extra_digits_are_ignored()
    {
        let mut game = generated(2, 8);
        game.on_reveal_timeout().unwrap();
        let mut longer = game.sequence().to_vec();
        longer.push(flipped(longer[0]));
        assert_eq!(game.submit(&longer), Ok(Verdict::Excellent));
    }

    #[test]
    fn difficulty_locks_during_a_round()
    {
        let mut game = Numem::new(2);
        game.set_difficulty(7).unwrap();
        assert_eq!(game.difficulty(), 7);
        assert!(game.set_difficulty(0).is_err());
        assert!(game.set_difficulty(11).is_err());

        game.generate().unwrap();
        assert!(game.set_difficulty(3).is_err());
        assert!(game.generate().is_err());
        assert_eq!(game.sequence().len(), 7);
    }

    #[test]
    fn checked_number_is_shown_again()
    {
        let mut game = generated(1, 9);
        game.on_reveal_timeout().unwrap();
        let digit = game.sequence()[0];
        game.submit(&[digit]).unwrap();
        assert_eq!(game.display_text(), digit.to_string());
        assert_eq!(game.action_label(), "generate a number");
    }

    #[test]
    fn parse_digits_rejects_non_digits()
    {
        assert_eq!(parse_digits("0459"), Ok(vec![0, 4, 5, 9]));
        assert!(parse_digits("12a").is_err());
    }
}
