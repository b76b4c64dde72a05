mod cli;
mod error;
mod lifecycle;
mod logging;
mod model;
mod orchestrator;
mod store;
mod text_view;
#[cfg(feature = "tui")]
mod tui;

use anyhow::Result;
use clap::Parser;

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();
    cli::run(args).await
}
