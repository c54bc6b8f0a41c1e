use crate::games::{GameView, Selector};
use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{execute, queue};
use log::{debug, warn};
use std::io::{self, Stdout, Write};
use std::time::{Duration, Instant};

pub const TITLE: &str = "Games of Memory";
pub const AUTHORS: &str = "designed and developed by IU-6's student";
const TICK_MS: u64 = 33;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Screen
{
    Menu
    {
        selected: usize,
    },
    Game,
}

pub struct Shell
{
    selector: Selector,
    screen: Screen,
    show_authors: bool,
    notice: Option<String>,
    quit: bool,
}

impl Shell
{
    pub fn new(selector: Selector) -> Self
    {
        Self {
            selector,
            screen: Screen::Menu { selected: 0 },
            show_authors: false,
            notice: None,
            quit: false,
        }
    }

    pub fn selector(&self) -> &Selector
    {
        &self.selector
    }

    pub fn screen(&self) -> Screen
    {
        self.screen
    }

    pub fn is_showing_authors(&self) -> bool
    {
        self.show_authors
    }

    pub fn notice(&self) -> Option<&str>
    {
        self.notice.as_deref()
    }

    pub fn should_quit(&self) -> bool
    {
        self.quit
    }

    pub fn play(&mut self, name: &str)
    {
        match self.selector.activate(name) {
            Ok(_) => {
                self.screen = Screen::Game;
                self.notice = None;
            }
            Err(err) => {
                warn!("shell: {err}");
                self.notice = Some(err.to_string());
            }
        }
    }

    /// Starts straight into a prepared view, skipping the menu.
    pub fn play_view(&mut self, view: Box<dyn GameView>)
    {
        self.selector.activate_with(view);
        self.screen = Screen::Game;
        self.notice = None;
    }

    pub fn handle_key(&mut self, key: KeyEvent)
    {
        if key.code == KeyCode::Esc
            || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
        {
            self.quit = true;
            return;
        }

        if self.show_authors {
            self.show_authors = false;
            return;
        }

        match key.code {
            KeyCode::F(1) => {
                self.show_authors = true;
                return;
            }
            KeyCode::F(2) => {
                self.selector.deactivate();
                self.screen = Screen::Menu { selected: 0 };
                self.notice = None;
                return;
            }
            _ => {}
        }

        match self.screen {
            Screen::Menu { selected } => self.handle_menu_key(selected, key.code),
            Screen::Game => {
                let Some(view) = self.selector.active_mut() else {
                    self.screen = Screen::Menu { selected: 0 };
                    return;
                };
                self.notice = None;
                if let Err(err) = view.handle_key(key) {
                    warn!("{}: rejected {:?}: {err}", view.name(), key.code);
                    self.notice = Some(err.to_string());
                }
            }
        }
    }

    fn handle_menu_key(&mut self, selected: usize, code: KeyCode)
    {
        let names = self.selector.list_names();
        if names.is_empty() {
            return;
        }

        match code {
            KeyCode::Up => {
                self.screen = Screen::Menu {
                    selected: selected.saturating_sub(1),
                };
            }
            KeyCode::Down => {
                self.screen = Screen::Menu {
                    selected: (selected + 1).min(names.len() - 1),
                };
            }
            KeyCode::Enter => self.play(names[selected.min(names.len() - 1)]),
            KeyCode::Char('q') | KeyCode::Char('Q') => self.quit = true,
            KeyCode::Char(ch) => {
                let picked = ch
                    .to_digit(10)
                    .map(|digit| digit as usize)
                    .filter(|index| *index >= 1 && *index <= names.len());
                if let Some(index) = picked {
                    self.play(names[index - 1]);
                }
            }
            _ => {}
        }
    }

    pub fn update(&mut self, dt: Duration)
    {
        if let Some(view) = self.selector.active_mut() {
            view.update(dt);
        }
    }

    pub fn render(&self) -> Vec<String>
    {
        let mut lines = Vec::new();
        lines.push(TITLE.to_string());
        lines.push("[F2] Select game  [F1] Authors  [Esc] Quit".to_string());
        lines.push(String::new());

        if self.show_authors {
            lines.push("Authors".to_string());
            lines.push(String::new());
            lines.push(AUTHORS.to_string());
            lines.push(String::new());
            lines.push("Press any key to close.".to_string());
            return lines;
        }

        match (self.screen, self.selector.active()) {
            (Screen::Game, Some(view)) => {
                lines.push(format!("== {} ==", view.name()));
                lines.extend(view.render());
            }
            (screen, _) => {
                let selected = match screen {
                    Screen::Menu { selected } => selected,
                    Screen::Game => 0,
                };
                lines.push("Select game:".to_string());
                for (idx, game) in self.selector.descriptors().iter().enumerate() {
                    let marker = if idx == selected { ">" } else { " " };
                    lines.push(format!(
                        "{marker} {}. play {} - {}",
                        idx + 1,
                        game.name,
                        game.description
                    ));
                }
            }
        }

        if let Some(notice) = &self.notice {
            lines.push(String::new());
            lines.push(notice.clone());
        }
        lines
    }
}

struct TerminalGuard
{
    stdout: Stdout,
}

impl TerminalGuard
{
    fn enter() -> io::Result<Self>
    {
        let mut stdout = io::stdout();
        terminal::enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen, Hide)?;
        Ok(Self { stdout })
    }

    fn stdout(&mut self) -> &mut Stdout
    {
        &mut self.stdout
    }
}

impl Drop for TerminalGuard
{
    fn drop(&mut self)
    {
        let _ = execute!(self.stdout, Show, LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

pub fn run(mut shell: Shell) -> Result<(), String>
{
    let mut term = TerminalGuard::enter().map_err(|err| err.to_string())?;
    let tick = Duration::from_millis(TICK_MS);
    let mut last_frame = Instant::now();
    debug!("shell: terminal entered");

    while !shell.should_quit() {
        draw(term.stdout(), &shell.render())?;

        let timeout = tick.saturating_sub(last_frame.elapsed());
        if event::poll(timeout).map_err(|err| err.to_string())? {
            if let Event::Key(key) = event::read().map_err(|err| err.to_string())? {
                if key.kind != KeyEventKind::Release {
                    shell.handle_key(key);
                }
            }
        }

        let now = Instant::now();
        shell.update(now.saturating_duration_since(last_frame));
        last_frame = now;
    }

    debug!("shell: leaving terminal");
    Ok(())
}

fn draw(stdout: &mut Stdout, lines: &[String]) -> Result<(), String>
{
    let output = format!("{}\r\n", lines.join("\r\n"));
    queue!(stdout, MoveTo(0, 0), Clear(ClearType::All))
        .map_err(|err| err.to_string())?;
    stdout.write_all(output.as_bytes()).map_err(|err| err.to_string())?;
    stdout.flush().map_err(|err| err.to_string())?;
    Ok(())
}
