//! reqdraft CLI: business-analysis documents from free-text input.
//!
//! Generates BRDs from stakeholder notes, FRDs from BRDs, and wireframe
//! prototypes from user stories, with or without an AI service.

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
