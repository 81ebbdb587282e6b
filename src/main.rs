//! cielterm - Weather, forecasts and air quality in the terminal
//!
//! A terminal UI application that displays current weather, a five-day
//! forecast and air quality for any city, searched interactively.

mod app;
mod cache;
mod cli;
mod config;
mod data;
mod fetch;
mod ui;

use std::fs::File;
use std::io;
use std::panic;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing_subscriber::EnvFilter;

use app::{App, AppState};
use cli::{Cli, StartupConfig};
use config::Config;

/// Environment variable holding the log filter; logging is off without it
const LOG_ENV_VAR: &str = "CIELTERM_LOG";

/// Log file written next to the working directory when logging is enabled
const LOG_FILE: &str = "cielterm.log";

/// Sets up a panic hook that restores the terminal before printing the panic message.
/// This ensures the terminal is usable even if the application panics.
fn setup_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        // Attempt to restore the terminal
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        // Call the original panic hook
        original_hook(panic_info);
    }));
}

/// Initializes file-based tracing when CIELTERM_LOG is set
///
/// Stdout belongs to the TUI, so log lines go to a file instead.
fn init_tracing() -> io::Result<()> {
    let filter = match std::env::var(LOG_ENV_VAR) {
        Ok(value) if !value.trim().is_empty() => value,
        _ => return Ok(()),
    };

    let log_file = File::create(LOG_FILE)?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::sync::Mutex::new(log_file))
        .with_ansi(false)
        .try_init();

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let startup = match StartupConfig::from_cli(&cli) {
        Ok(startup) => startup,
        Err(err) => {
            eprintln!("Error: {}", err);
            return ExitCode::FAILURE;
        }
    };

    // Configuration problems are reported before the terminal is taken over
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Error: {}", err);
            return ExitCode::FAILURE;
        }
    };

    if let Err(err) = init_tracing() {
        eprintln!("Error: could not open log file: {}", err);
        return ExitCode::FAILURE;
    }

    let app = match App::new(&config, startup) {
        Ok(app) => app,
        Err(err) => {
            eprintln!("Error: {}", err);
            return ExitCode::FAILURE;
        }
    };

    match run_tui(app).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {}", err);
            ExitCode::FAILURE
        }
    }
}

/// Takes over the terminal and runs the event loop until quit
async fn run_tui(mut app: App) -> Result<(), Box<dyn std::error::Error>> {
    // Set up panic hook to restore terminal on crash
    setup_panic_hook();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Main event loop
    loop {
        terminal.draw(|f| ui::render(f, &app))?;

        // A queued search renders the loading state before blocking on the fetch
        if let Some(city) = app.take_search_request() {
            app.state = AppState::Loading;
            terminal.draw(|f| ui::render(f, &app))?;
            app.run_search(&city).await;
            continue;
        }

        // Poll for keyboard events with 100ms timeout
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                app.handle_key(key);
            }
        }

        if app.should_quit {
            break;
        }
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

    Ok(())
}
