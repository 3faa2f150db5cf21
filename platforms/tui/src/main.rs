mod app;

use action::Action;
use app::App;
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEvent},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::Read;
use std::path::PathBuf;
use std::time::Instant;
use std::{error::Error, fs, io, time::Duration};
use tmsim::RunConfig;

/// A single-tape Turing machine simulator with a Terminal User Interface.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
#[clap(after_help = "EXAMPLES:
  tmsim-tui machine.json
  cat machine.json | tmsim-tui")]
struct Cli {
    /// Path to a JSON machine definition.
    /// If not provided, the application will load the built-in programs.
    /// Can also pipe a definition via stdin.
    program_file: Option<String>,

    /// Input written to the tape instead of the program's suggested input.
    #[clap(short, long)]
    input: Option<String>,

    /// A TOML file with run settings.
    #[clap(short, long)]
    config: Option<PathBuf>,
}

/// Represents the state of the application loop.
#[derive(PartialEq)]
enum AppState {
    Running,
    ShouldQuit,
}

/// A wrapper around the terminal to ensure it's restored on drop.
struct Tui {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl Tui {
    /// Creates a new TUI.
    fn new() -> io::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        Ok(Self { terminal })
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        // Errors are ignored; there is nothing left to report them to.
        let _ = disable_raw_mode();
        let _ = execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        );
        let _ = self.terminal.show_cursor();
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    // Load before entering the alternate screen so errors reach stderr.
    let app = match load_app(&cli) {
        Ok(app) => app,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let mut tui = Tui::new()?;
    run_app(&mut tui.terminal, app)?;

    Ok(())
}

/// Builds the application from CLI arguments.
///
/// It tries to load from a file path, then from stdin, and finally
/// falls back to the built-in programs.
fn load_app(cli: &Cli) -> Result<App, String> {
    let config = match &cli.config {
        Some(path) => RunConfig::load(path).map_err(|e| e.to_string())?,
        None => RunConfig::default(),
    };

    let mut app = if let Some(file_path) = &cli.program_file {
        fs::read_to_string(file_path)
            .map_err(|e| format!("Failed to read file '{}': {}", file_path, e))
            .and_then(|content| App::new_from_program_string(&content, config))?
    } else if atty::isnt(atty::Stream::Stdin) {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|e| format!("Failed to read from stdin: {}", e))?;
        App::new_from_program_string(&buffer, config)?
    } else {
        App::new_default(config)?
    };

    if let Some(input) = &cli.input {
        app.set_input(input)?;
    }
    Ok(app)
}

/// Runs the main application loop.
fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    mut app: App,
) -> io::Result<()> {
    let mut last_step = Instant::now();

    loop {
        terminal.draw(|f| app.render(f))?;

        let timeout = if app.is_auto_playing() {
            app.step_delay().saturating_sub(last_step.elapsed())
        } else {
            Duration::from_millis(100)
        };

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if handle_key_event(&mut app, key) == AppState::ShouldQuit {
                    return Ok(());
                }
            }
        }

        if app.is_auto_playing() && last_step.elapsed() >= app.step_delay() {
            app.step_machine();
            last_step = Instant::now();
        }
    }
}

/// Handles key events and updates the application state.
fn handle_key_event(app: &mut App, key: KeyEvent) -> AppState {
    if let Some(action) = app.keymap.get(&key) {
        match action {
            Action::Quit => return AppState::ShouldQuit,
            Action::Reset => app.reset_machine(),
            Action::Step => app.step_machine(),
            Action::Run => app.run_machine(),
            Action::Validate => app.validate_machine(),
            Action::ToggleAutoPlay => app.toggle_auto_play(),
            Action::ToggleHelp => app.toggle_help(),
            Action::PreviousProgram => app.previous_program(),
            Action::NextProgram => app.next_program(),
            Action::SpeedUp => app.change_delay(-1),
            Action::SlowDown => app.change_delay(1),
        }
    }
    AppState::Running
}
