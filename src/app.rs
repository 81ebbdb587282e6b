//! Application state management for cielterm
//!
//! This module contains the main application state, handling keyboard
//! input in the search bar, running searches, and transitions between
//! the idle, loading, dashboard and error views.

use chrono::{DateTime, Local};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::cli::StartupConfig;
use crate::config::{Config, ConfigError};
use crate::data::CitySnapshot;
use crate::fetch::{user_message, Fetcher};

/// Application state enum representing the current view
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppState {
    /// No search has been made yet
    Idle,
    /// A search is in flight
    Loading,
    /// A snapshot is available and rendered
    Dashboard,
    /// The last search failed; the message is user-facing
    Error(String),
}

/// Main application struct managing state and data
pub struct App {
    /// Current application state/view
    pub state: AppState,
    /// Text in the search bar
    pub input: String,
    /// Result of the last successful search
    pub snapshot: Option<CitySnapshot>,
    /// City name of the last successful search
    pub last_search: Option<String>,
    /// Timestamp of the last successful search
    pub last_refresh: Option<DateTime<Local>>,
    /// Flag indicating the application should quit
    pub should_quit: bool,
    /// City waiting to be searched, set by Enter and drained by the loop
    pending_search: Option<String>,
    /// Clients and cache for data acquisition
    fetcher: Fetcher,
}

impl App {
    /// Creates a new App from the validated configuration
    ///
    /// # Errors
    /// Fails if the API clients cannot be constructed.
    pub fn new(config: &Config, startup: StartupConfig) -> Result<Self, ConfigError> {
        let fetcher = Fetcher::new(config, startup.cache_enabled)?;
        Ok(Self::with_fetcher(fetcher, startup))
    }

    /// Creates a new App around a pre-built fetcher (used by tests)
    pub fn with_fetcher(fetcher: Fetcher, startup: StartupConfig) -> Self {
        let mut app = Self {
            state: AppState::Idle,
            input: String::new(),
            snapshot: None,
            last_search: None,
            last_refresh: None,
            should_quit: false,
            pending_search: None,
            fetcher,
        };

        if let Some(city) = startup.initial_city {
            app.input = city.clone();
            app.pending_search = Some(city);
        }

        app
    }

    /// Handles a key event
    ///
    /// The search bar owns all printable characters, so quitting is bound
    /// to Esc and Ctrl+C rather than a letter key.
    pub fn handle_key(&mut self, key_event: KeyEvent) {
        if key_event.modifiers.contains(KeyModifiers::CONTROL) {
            if let KeyCode::Char('c') = key_event.code {
                self.should_quit = true;
            }
            return;
        }

        match key_event.code {
            KeyCode::Esc => {
                // Esc first dismisses an error banner, then quits
                if matches!(self.state, AppState::Error(_)) {
                    self.dismiss_error();
                } else {
                    self.should_quit = true;
                }
            }
            KeyCode::Enter => {
                let city = self.input.trim();
                if !city.is_empty() {
                    self.pending_search = Some(city.to_string());
                }
            }
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Char(c) => {
                self.input.push(c);
            }
            _ => {}
        }
    }

    /// Takes the pending search request, if Enter queued one
    pub fn take_search_request(&mut self) -> Option<String> {
        self.pending_search.take()
    }

    /// Runs one search and applies the result to the app state
    ///
    /// Failures become a user-facing error banner; a previously loaded
    /// snapshot stays visible behind it.
    pub async fn run_search(&mut self, city: &str) {
        self.state = AppState::Loading;

        match self.fetcher.city_snapshot(city).await {
            Ok(snapshot) => {
                self.snapshot = Some(snapshot);
                self.last_search = Some(city.to_string());
                self.last_refresh = Some(Local::now());
                self.state = AppState::Dashboard;
            }
            Err(err) => {
                self.state = AppState::Error(user_message(city, &err));
            }
        }
    }

    /// Dismisses the error banner, restoring the previous view
    fn dismiss_error(&mut self) {
        self.state = if self.snapshot.is_some() {
            AppState::Dashboard
        } else {
            AppState::Idle
        };
    }
}
