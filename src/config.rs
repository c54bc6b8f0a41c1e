use log::LevelFilter;
use std::env;
use std::path::PathBuf;

const LOG_FILE_VAR: &str = "MEMORY_GAMES_LOG_FILE";
const LOG_LEVEL_VAR: &str = "MEMORY_GAMES_LOG";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command
{
    Menu,
    List,
    Help,
    Play
    {
        game: String,
        difficulty: Option<u8>,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config
{
    pub command: Command,
    pub log_level: LevelFilter,
    pub log_file: Option<PathBuf>,
}

impl Default for Config
{
    fn default() -> Self
    {
        Self {
            command: Command::Menu,
            log_level: LevelFilter::Warn,
            log_file: None,
        }
    }
}

impl Config
{
    /// Reads the environment first so flags on the command line win.
    pub fn load(args: &[String]) -> Result<Self, String>
    {
        let mut config = Self::default();
        if let Ok(value) = env::var(LOG_LEVEL_VAR) {
            config.log_level = parse_level(&value)
                .map_err(|err| format!("{LOG_LEVEL_VAR}: {err}"))?;
        }
        if let Ok(value) = env::var(LOG_FILE_VAR) {
            if !value.is_empty() {
                config.log_file = Some(PathBuf::from(value));
            }
        }
        config.apply_args(args)?;
        Ok(config)
    }

    pub fn from_args(args: &[String]) -> Result<Self, String>
    {
        let mut config = Self::default();
        config.apply_args(args)?;
        Ok(config)
    }

    fn apply_args(&mut self, args: &[String]) -> Result<(), String>
    {
        let mut difficulty: Option<u8> = None;
        let mut game: Option<String> = None;
        let mut iter = args.iter().peekable();

        while let Some(arg) = iter.next() {
            if arg == "-h" || arg == "--help" {
                self.command = Command::Help;
                return Ok(());
            } else if arg == "-v" {
                self.log_level = raise(self.log_level);
            } else if arg == "-q" {
                self.log_level = LevelFilter::Off;
            } else if arg == "--log-file" {
                let value = iter
                    .next()
                    .ok_or_else(|| "Expected value after --log-file".to_string())?;
                self.log_file = Some(PathBuf::from(value));
            } else if let Some(rest) = arg.strip_prefix("--log-file=") {
                self.log_file = Some(PathBuf::from(rest));
            } else if arg == "--log-level" {
                let value = iter
                    .next()
                    .ok_or_else(|| "Expected value after --log-level".to_string())?;
                self.log_level = parse_level(value)?;
            } else if let Some(rest) = arg.strip_prefix("--log-level=") {
                self.log_level = parse_level(rest)?;
            } else if arg == "--difficulty" {
                let value = iter
                    .next()
                    .ok_or_else(|| "Expected value after --difficulty".to_string())?;
                difficulty = Some(parse_difficulty(value)?);
            } else if let Some(rest) = arg.strip_prefix("--difficulty=") {
                difficulty = Some(parse_difficulty(rest)?);
            } else if arg.starts_with('-') {
                return Err(format!("Unknown option '{arg}'"));
            } else if game.is_none() && self.command == Command::Menu {
                match arg.as_str() {
                    "list" => self.command = Command::List,
                    _ => game = Some(arg.clone()),
                }
            } else {
                return Err(format!("Unexpected argument '{arg}'"));
            }
        }

        match (game, difficulty) {
            (Some(game), difficulty) => self.command = Command::Play { game, difficulty },
            (None, Some(_)) => {
                return Err("--difficulty needs a game, e.g. 'numpairs --difficulty=3'".to_string());
            }
            (None, None) => {}
        }
        Ok(())
    }
}

fn parse_level(value: &str) -> Result<LevelFilter, String>
{
    value
        .parse::<LevelFilter>()
        .map_err(|_| format!("Unknown log level '{value}'"))
}

fn parse_difficulty(value: &str) -> Result<u8, String>
{
    value
        .parse::<u8>()
        .map_err(|_| "Difficulty must be a number".to_string())
}

fn raise(level: LevelFilter) -> LevelFilter
{
    match level {
        LevelFilter::Off => LevelFilter::Error,
        LevelFilter::Error => LevelFilter::Warn,
        LevelFilter::Warn => LevelFilter::Info,
        LevelFilter::Info => LevelFilter::Debug,
        LevelFilter::Debug | LevelFilter::Trace => LevelFilter::Trace,
    }
}
