mod app;
mod config;
mod grid;
mod render;
mod rng;
mod sim;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Stderr only, and quiet by default: stdout carries the grid.
    let filter = EnvFilter::try_from_env("WILDFIRE_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    app::run()
}
