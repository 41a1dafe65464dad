//! Brailler - six-key braille input in the terminal
//!
//! Type braille like on a Perkins brailler: hold the dot keys of a cell
//! together and release them to move on.

use std::fs::OpenOptions;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use brailler::config::Config;
use brailler::constants::{APP_BINARY_NAME, APP_NAME};
use brailler::engine::BoundaryPolicy;
use brailler::tui::{restore_terminal, run_tui, setup_terminal, AppState};

/// Brailler - six-key braille input in the terminal
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Number of grid rows
    #[arg(long, value_name = "N")]
    rows: Option<usize>,

    /// Number of grid columns
    #[arg(long, value_name = "N")]
    cols: Option<usize>,

    /// Cursor behaviour at the grid edges (clamp, wrap, wrap_scroll)
    #[arg(long, value_name = "POLICY")]
    policy: Option<BoundaryPolicy>,

    /// Write logs to this file (the terminal is used by the UI)
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Write a default configuration file and exit
    #[arg(long)]
    init: bool,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    print_config: bool,
}

/// Sends tracing output to `path`, filtered by `RUST_LOG` (default `info`).
fn init_file_logging(path: &PathBuf) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file: {}", path.display()))?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(file),
        )
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(path) = &cli.log_file {
        init_file_logging(path)?;
    }

    if cli.init {
        if Config::exists() {
            let path = Config::config_file_path()?;
            println!("Configuration already exists: {}", path.display());
            return Ok(());
        }
        let path = Config::new().save()?;
        println!("Wrote default configuration to {}", path.display());
        return Ok(());
    }

    let mut config = Config::load().with_context(|| {
        format!("Failed to load configuration (run `{APP_BINARY_NAME} --init` for a fresh one)")
    })?;
    config.apply_overrides(cli.rows, cli.cols, cli.policy)?;

    if cli.print_config {
        print!("{}", config.to_toml()?);
        return Ok(());
    }

    info!(
        "{} v{} starting with a {}x{} grid",
        APP_NAME,
        env!("CARGO_PKG_VERSION"),
        config.grid.rows,
        config.grid.cols
    );

    let (mut terminal, mode) = setup_terminal()?;
    let mut state = AppState::new(config, mode);
    let result = run_tui(&mut state, &mut terminal);
    restore_terminal(terminal, mode)?;
    result
}
