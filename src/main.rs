//! webroot - resource location and static serving for wasm web apps.

use anyhow::Result;
use clap::{ColorChoice, Parser};
use webroot::cli::{self, Cli, Commands};
use webroot::config::Config;
use webroot::{logger, serve};

fn main() -> Result<()> {
    // Setup global Ctrl+C handler (before any blocking operations)
    serve::setup_shutdown_handler()?;

    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    let config = Config::load(&cli)?;

    match &cli.command {
        Commands::Serve { .. } => cli::run_serve(&config),
        Commands::Urls { args } => cli::run_urls(args, &config),
    }
}
