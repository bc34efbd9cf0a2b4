// ABOUTME: Entry point for the atroctl CLI application.
// ABOUTME: Parses arguments, resolves settings once, and dispatches to command handlers.

mod cli;
mod commands;

use atroctl::config::{Overrides, ProjectConfig, Settings};
use atroctl::error::Result;
use atroctl::output::{Output, OutputMode};
use clap::Parser;
use cli::{Cli, Commands};
use std::env;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing subscriber based on verbose flag
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let result = run(cli).await;

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mode = if cli.json {
        OutputMode::Json
    } else if cli.quiet {
        OutputMode::Quiet
    } else {
        OutputMode::Normal
    };
    let output = Output::new(mode);
    let cwd = env::current_dir()?;

    match cli.command {
        Commands::Init { force } => commands::init(&cwd, cli.url.as_deref(), force, &output),
        Commands::Deploy(args) => {
            let overrides = Overrides {
                url: cli.url,
                api_key: cli.api_key,
                api_secret: cli.api_secret,
                timeout: cli.timeout.map(Duration::from_secs),
                func_dir: args.func_dir,
                static_dir: args.static_dir,
                strategy: args.strategy,
                watch: args.watch,
                esbuild: args.esbuild,
            };
            let settings = Settings::resolve(overrides, ProjectConfig::discover(&cwd)?)?;
            commands::deploy(settings, output).await
        }
    }
}
