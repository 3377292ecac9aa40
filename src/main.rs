//! Kiln - asset pipeline for static sites.

mod cli;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use kiln::config::SiteConfig;
use kiln::logger;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    let config = SiteConfig::load(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;

    match &cli.command {
        Commands::Asset { args } => cli::asset::build_asset(args, Arc::new(config)),
        Commands::Output { args } => cli::output::show_output(args, &config),
        Commands::Clean => cli::clean::clean_store(&config),
    }
}
