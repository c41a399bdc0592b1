//! clinicsite CLI: render, build, and serve the clinic website.
//!
//! Pages always render from static copy; a configured WordPress install
//! enriches them when it answers in time.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
