//! Brailler Web Server Binary
//!
//! Serves the braille engine over HTTP so browser or touch front ends can
//! drive it.
//!
//! # Usage
//!
//! ```bash
//! # Start with default settings (port 3030, 20x25 grid)
//! brailler-web
//!
//! # Bigger page that scrolls instead of wrapping to the top
//! brailler-web --rows 40 --cols 32 --policy wrap_scroll
//! ```

use std::net::SocketAddr;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use brailler::config::Config;
use brailler::constants::DEFAULT_WEB_PORT;
use brailler::engine::BoundaryPolicy;
use brailler::web;

/// Brailler Web Server - HTTP API for the braille engine
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value_t = DEFAULT_WEB_PORT)]
    port: u16,

    /// Host to bind to
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Number of grid rows
    #[arg(long, value_name = "N")]
    rows: Option<usize>,

    /// Number of grid columns
    #[arg(long, value_name = "N")]
    cols: Option<usize>,

    /// Cursor behaviour at the grid edges (clamp, wrap, wrap_scroll)
    #[arg(long, value_name = "POLICY")]
    policy: Option<BoundaryPolicy>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize tracing
    let filter = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config = Config::load_or_default();
    config.apply_overrides(args.rows, args.cols, args.policy)?;

    let addr: SocketAddr = format!("{}:{}", args.host, args.port)
        .parse()
        .context("Invalid host or port")?;

    web::run_server(config.grid, addr).await
}
