//! shelf-search TUI
//!
//! Terminal search page: type to search the Books API, move results onto shelves.

mod app;
mod keybindings;
mod saver;
mod widgets;

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use shelf_search::{BooksApiClient, Bookshelf, ConfigError, SearchService, ShelfSearchConfig};
use tracing_subscriber::EnvFilter;

use app::App;
use saver::ShelfSaver;

const TICK: Duration = Duration::from_millis(50);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging()?;

    let config = load_config()?;
    let api = Arc::new(BooksApiClient::new(&config.api)?);

    let bookshelf = api.get_all().await.unwrap_or_else(|e| {
        tracing::warn!("Failed to load bookshelf: {}, starting empty", e);
        Bookshelf::default()
    });
    tracing::info!("Loaded {} shelved books", bookshelf.len());

    let saver = ShelfSaver::spawn(Arc::clone(&api));
    let mut app = App::new(api, saver, bookshelf, config.search.clone());

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {err:?}");
    }

    app.shutdown().await;

    Ok(())
}

fn run_app<B: ratatui::backend::Backend, S: SearchService>(
    terminal: &mut Terminal<B>,
    app: &mut App<S>,
) -> io::Result<()> {
    loop {
        app.process_shelf_changes();
        app.process_save_outcomes();

        terminal.draw(|f| app.render(f))?;

        if event::poll(TICK)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && app.handle_key(key.code, key.modifiers) {
                    return Ok(());
                }
            }
        }
    }
}

fn app_dir(base: Option<PathBuf>) -> PathBuf {
    base.unwrap_or_else(std::env::temp_dir).join("shelf-search")
}

/// Log to a file so output does not tear the terminal UI. Level comes from `RUST_LOG`.
fn init_logging() -> io::Result<()> {
    let dir = app_dir(dirs::cache_dir());
    fs::create_dir_all(&dir)?;
    let file = File::create(dir.join("shelf-search.log"))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

/// Load `<config_dir>/shelf-search/config.toml`, creating it on first run
/// so the generated API token (and with it the user's shelves) survives restarts.
fn load_config() -> Result<ShelfSearchConfig, ConfigError> {
    let path = app_dir(dirs::config_dir()).join("config.toml");

    let mut config = if path.exists() {
        ShelfSearchConfig::load(&path)?
    } else {
        let config = ShelfSearchConfig::default();
        if let Err(e) = write_config(&path, &config) {
            tracing::warn!("Could not write {:?}: {}", path, e);
        }
        config
    };

    if let Ok(url) = std::env::var("BOOKS_API_URL") {
        config.api.base_url = url;
    }
    if let Ok(token) = std::env::var("BOOKS_API_TOKEN") {
        config.api.token = token;
    }

    config.validate()?;
    Ok(config)
}

fn write_config(path: &Path, config: &ShelfSearchConfig) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, config.to_toml()?)?;
    tracing::info!("Wrote default config to {:?}", path);
    Ok(())
}
