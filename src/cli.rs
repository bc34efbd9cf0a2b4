// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Every flag has an ATROCTL_* environment fallback; the flag wins when both are set.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "atroctl")]
#[command(about = "Blue/green deployments of functions, secrets and static assets to Atrocity")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Base URL of the target
    #[arg(short, long, global = true, env = "ATROCTL_URL")]
    pub url: Option<String>,

    /// API key sent with every call
    #[arg(short = 'k', long = "apikey", global = true, env = "ATROCTL_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// API secret key sent with every call
    #[arg(short = 'x', long = "secretkey", global = true, env = "ATROCTL_API_SECRET_KEY", hide_env_values = true)]
    pub api_secret: Option<String>,

    /// Per-call timeout in seconds (no timeout when unset)
    #[arg(long, global = true, env = "ATROCTL_TIMEOUT")]
    pub timeout: Option<u64>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Print only final results
    #[arg(short, long, global = true, conflicts_with = "json")]
    pub quiet: bool,

    /// Emit JSON lines instead of human-readable output
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Deploy secrets, the function bundle and static assets to the next slot
    Deploy(DeployArgs),

    /// Write an atroctl.yml template to the current directory
    Init {
        /// Overwrite an existing configuration file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Args, Debug, Default)]
pub struct DeployArgs {
    /// Directory holding the function sources (index.js is the entry point)
    #[arg(short, long, env = "ATROCTL_FUNC_DIR")]
    pub func_dir: Option<PathBuf>,

    /// Directory holding static assets
    #[arg(short, long, env = "ATROCTL_STATIC_DIR")]
    pub static_dir: Option<PathBuf>,

    /// Deployment strategy
    #[arg(short = 'g', long, env = "ATROCTL_STRATEGY")]
    pub strategy: Option<String>,

    /// Redeploy whenever watched sources change
    #[arg(short, long, env = "ATROCTL_WATCH")]
    pub watch: bool,

    /// esbuild executable used to bundle the function
    #[arg(long, env = "ATROCTL_ESBUILD")]
    pub esbuild: Option<PathBuf>,
}
