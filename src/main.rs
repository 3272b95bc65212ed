//! Faleproxy - fetches a web page and serves a copy with every Yale renamed to Fale.

#![allow(dead_code)]

mod cli;
mod config;
mod core;
mod embed;
mod fetch;
mod logger;
mod rewrite;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::ProxyConfig;
use std::sync::Arc;

fn main() -> Result<()> {
    // Setup global Ctrl+C handler (before any blocking operations)
    core::setup_shutdown_handler()?;

    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    let config = Arc::new(ProxyConfig::load(&cli)?);

    match &cli.command {
        Commands::Serve { .. } => cli::serve::bind_server(config)?.run(),
        Commands::Fetch { url, output } => cli::fetch::run_fetch(&config, url, output.as_deref()),
    }
}
