//! FRF - FreightForward Terminal Client
//!
//! A terminal client for the FreightForward freight marketplace. An
//! authenticated LINE user fills in pickup and dropoff locations, cargo
//! type, estimated weight and an optional photo, then submits the request
//! to the hosted backend where agents pick it up and respond with bids.

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::{Backend, CrosstermBackend},
};
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tracing::Level;

mod application;
mod domain;
mod infrastructure;
mod presentation;

use application::App;
use domain::{IdentityProvider, IdentityResolver, TableStore};
use infrastructure::{Config, LineIdentityProvider, SupabaseStore};
use presentation::{InputHandler, render_ui};

const POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Entry point for the FreightForward terminal client.
///
/// Loads the environment configuration, wires up the identity and
/// persistence capabilities, sets up the terminal interface and runs the
/// main event loop until the user quits or the view is closed.
///
/// # Errors
///
/// Returns an error if terminal setup fails or if there are issues
/// with the terminal interface during runtime.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging(std::env::var(infrastructure::LOG_FILE_VAR).ok().as_deref());
    let config = Config::load();

    let mut provider = LineIdentityProvider::new(&config);
    let store = SupabaseStore::new(&config);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(provider.is_in_client());
    let res = run_app(&mut terminal, &mut app, &mut provider, &store, &config);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}");
    }

    Ok(())
}

/// Writes structured logs to a file so the alternate-screen UI stays clean.
/// Logging is off unless a log file is configured.
fn init_logging(path: Option<&str>) {
    let Some(path) = path.filter(|p| !p.is_empty()) else {
        return;
    };
    let Ok(file) = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
    else {
        return;
    };

    let file = Arc::new(file);
    let _ = tracing_subscriber::fmt()
        .with_writer(move || Arc::clone(&file))
        .with_ansi(false)
        .with_max_level(Level::INFO)
        .try_init();
}

/// Main application event loop.
///
/// Resolves the identity once at startup (the loading frame is drawn
/// first), then processes keyboard input until the user quits. After a
/// successful submission the loop keeps ticking so the success screen can
/// ask the host container to close the view once the delay has passed.
///
/// # Errors
///
/// Returns an IO error if terminal operations fail.
fn run_app<B, P, S>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    provider: &mut P,
    store: &S,
    config: &Config,
) -> io::Result<()>
where
    B: Backend,
    P: IdentityProvider,
    S: TableStore,
{
    terminal.draw(|f| render_ui(f, app))?;
    app.set_identity_phase(IdentityResolver::resolve(provider, &config.liff_id));

    loop {
        terminal.draw(|f| render_ui(f, app))?;

        if app.should_auto_close() {
            if provider.is_in_client() {
                provider.close_window();
                return Ok(());
            }
            app.mark_close_unavailable();
        }

        if !event::poll(POLL_INTERVAL)? {
            continue;
        }

        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                match key.code {
                    KeyCode::Char('q') if app.allows_quit() => return Ok(()),
                    _ => InputHandler::handle_key_event(app, key.code, key.modifiers, store),
                }
            }
        }
    }
}
