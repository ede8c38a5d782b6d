mod app;
mod cli;
mod config;
mod controls;
mod error;
mod input;
mod list_view;
mod storage;
mod task;
mod task_manager;
mod ui;

use std::fs::{self, OpenOptions};
use std::io;
use std::path::Path;
use std::sync::Mutex;

use anyhow::Context;
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::app::App;
use crate::cli::Cli;
use crate::config::Config;
use crate::storage::FileStore;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config_path = cli.config.clone().unwrap_or_else(Config::default_path);
    let (config, config_error) = match Config::load_if_present(&config_path) {
        Ok(config) => (config, None),
        Err(err) => (Config::default(), Some(err)),
    };
    let data_dir = config.resolve_data_dir(cli.data_dir.clone());
    let store = FileStore::new(&data_dir);

    if cli.command.is_some() {
        init_cli_logging();
    } else {
        init_tui_logging(&data_dir)?;
    }
    if let Some(err) = config_error {
        tracing::warn!(path = %config_path.display(), error = %err, "ignoring invalid config");
    }

    match cli.command {
        Some(command) => {
            tracing::debug!(data_dir = %data_dir.display(), "running command");
            command.run(store)?;
        }
        None => {
            tracing::info!(data_dir = %data_dir.display(), "starting");
            run_tui(config, store)?;
        }
    }
    Ok(())
}

fn env_filter(default: &str) -> EnvFilter {
    std::env::var("RUST_LOG")
        .ok()
        .and_then(|raw| EnvFilter::try_new(raw.trim()).ok())
        .unwrap_or_else(|| EnvFilter::new(default))
}

fn init_cli_logging() {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(env_filter("warn"))
        .init();
}

/// The screen owns stdout, so logs go to a file next to the data.
fn init_tui_logging(data_dir: &Path) -> anyhow::Result<()> {
    fs::create_dir_all(data_dir)
        .with_context(|| format!("creating {}", data_dir.display()))?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(data_dir.join("folio.log"))
        .context("opening log file")?;
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(Mutex::new(file)).with_ansi(false))
        .with(env_filter("off"))
        .init();
    Ok(())
}

fn run_tui(config: Config, store: FileStore) -> anyhow::Result<()> {
    let mut app = App::new(config, store);

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = ui::run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result.context("event loop failed")
}
