use memory_games::config::{Command, Config};
use memory_games::games::num_pairs::{self, NumPairsView};
use memory_games::games::numem::{self, NumemView};
use memory_games::games::{GameView, Selector};
use memory_games::shell::{self, Shell};
use simplelog::{ColorChoice, TermLogger, TerminalMode, WriteLogger};
use std::env;
use std::fs::File;

fn main()
{
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String>
{
    let args: Vec<String> = env::args().skip(1).collect();
    let config = Config::load(&args)?;
    init_logging(&config)?;

    match config.command {
        Command::Menu => shell::run(Shell::new(Selector::with_default_games())),
        Command::List => {
            list_games();
            Ok(())
        }
        Command::Help => {
            print_help();
            Ok(())
        }
        Command::Play { game, difficulty } => run_game(&game, difficulty),
    }
}

fn init_logging(config: &Config) -> Result<(), String>
{
    let log_config = simplelog::Config::default();
    let started = match &config.log_file {
        Some(path) => {
            let file = File::create(path)
                .map_err(|err| format!("Failed to open log file {}: {err}", path.display()))?;
            WriteLogger::init(config.log_level, log_config, file)
        }
        None => TermLogger::init(
            config.log_level,
            log_config,
            TerminalMode::Stderr,
            ColorChoice::Auto,
        ),
    };
    started.map_err(|err| format!("Failed to start logging: {err}"))
}

fn run_game(name: &str, difficulty: Option<u8>) -> Result<(), String>
{
    let mut shell = Shell::new(Selector::with_default_games());
    let view: Box<dyn GameView> = match (name.to_ascii_lowercase().as_str(), difficulty) {
        ("numpairs", Some(level)) => {
            check_difficulty(level, num_pairs::MIN_DIFFICULTY, num_pairs::MAX_DIFFICULTY)?;
            Box::new(NumPairsView::with_difficulty(level))
        }
        ("numem", Some(level)) => {
            check_difficulty(level, numem::MIN_DIFFICULTY, numem::MAX_DIFFICULTY)?;
            Box::new(NumemView::with_difficulty(level))
        }
        (_, _) => {
            shell.play(name);
            if let Some(notice) = shell.notice() {
                return Err(format!("{notice}. Run with --help."));
            }
            return shell::run(shell);
        }
    };
    shell.play_view(view);
    shell::run(shell)
}

fn check_difficulty(level: u8, min: u8, max: u8) -> Result<(), String>
{
    if (min..=max).contains(&level) {
        Ok(())
    } else {
        Err(format!("Difficulty must be {min}-{max}, got {level}"))
    }
}

fn list_games()
{
    println!("Available games:");
    for game in Selector::with_default_games().descriptors() {
        println!("  {:<10} - {}", game.name, game.description);
    }
}

fn print_help()
{
    println!("memory-games");
    println!("\nUsage:");
    println!("  memory-games                      open the game menu");
    println!("  memory-games list");
    println!("  memory-games numpairs [--difficulty=1..5]");
    println!("  memory-games numem [--difficulty=1..10]");
    println!("\nOptions:");
    println!("  -v / -q                 more / no logging");
    println!("  --log-level=<level>     off, error, warn, info, debug, trace");
    println!("  --log-file=<path>       write the log to a file");
    println!("\nNotes:");
    println!("  Set MEMORY_GAMES_LOG / MEMORY_GAMES_LOG_FILE to configure logging.");
    println!("  F1 shows the authors, F2 returns to game selection, Esc quits.");
}
