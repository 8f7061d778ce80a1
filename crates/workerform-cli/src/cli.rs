use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "workerform")]
#[command(about = "Plan and apply worker scripts and queue consumers")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to a TOML config file (defaults to ./workerform.toml when present)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// API token (overrides the configured token)
    #[arg(long, global = true, env = "CLOUDFLARE_API_TOKEN", hide_env_values = true)]
    pub token: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the bundle digest of a script directory
    Hash(HashArgs),
    /// Manage a worker script
    Script(ResourceArgs),
    /// Manage a queue consumer
    Consumer(ResourceArgs),
}

#[derive(clap::Args)]
pub struct HashArgs {
    /// Script directory to scan
    pub dir: PathBuf,
}

#[derive(clap::Args)]
pub struct ResourceArgs {
    #[command(subcommand)]
    pub command: ResourceCommands,
}

#[derive(Subcommand)]
pub enum ResourceCommands {
    /// Show what apply would do
    Plan(PlanArgs),
    /// Create, update or replace the resource and record the new state
    Apply(ApplyArgs),
    /// Delete the resource and its state file
    Destroy(DestroyArgs),
}

#[derive(clap::Args)]
pub struct PlanArgs {
    /// JSON file with the desired configuration
    #[arg(short, long)]
    pub desired: PathBuf,
    /// State file written by a previous apply
    #[arg(short, long)]
    pub state: Option<PathBuf>,
}

#[derive(clap::Args)]
pub struct ApplyArgs {
    /// JSON file with the desired configuration
    #[arg(short, long)]
    pub desired: PathBuf,
    /// State file to read and rewrite
    #[arg(short, long)]
    pub state: PathBuf,
}

#[derive(clap::Args)]
pub struct DestroyArgs {
    /// State file written by a previous apply
    #[arg(short, long)]
    pub state: PathBuf,
}
