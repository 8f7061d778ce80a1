mod cli;
mod commands;
mod observability;
mod output;
mod state;

use anyhow::{Context, Result};
use clap::Parser;
use workerform_cloudflare::{CloudflareClient, RetryPolicy};
use workerform_config::AppConfig;
use workerform_provider::{QueueConsumerProvider, ResourceProvider, ScriptProvider};

use cli::{Cli, Commands, ResourceCommands};
use output::print_error;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        print_error(&format!("{e:#}"));
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = workerform_config::load_config(cli.config.as_deref())
        .context("Failed to load configuration")?;
    observability::init_tracing_with_level(&config.logging.level);

    match &cli.command {
        Commands::Hash(args) => {
            commands::hash::hash(&args.dir).await?;
        }
        Commands::Script(args) => {
            let provider = ScriptProvider::new(make_client(&config, &cli)?);
            run_resource(&provider, "script", &args.command).await?;
        }
        Commands::Consumer(args) => {
            let provider = QueueConsumerProvider::new(make_client(&config, &cli)?);
            run_resource(&provider, "consumer", &args.command).await?;
        }
    }

    Ok(())
}

async fn run_resource<P>(provider: &P, kind: &str, command: &ResourceCommands) -> Result<()>
where
    P: ResourceProvider,
    P::Inputs: serde::de::DeserializeOwned,
    P::Outputs: serde::Serialize + serde::de::DeserializeOwned,
{
    match command {
        ResourceCommands::Plan(args) => {
            commands::resource::plan(provider, kind, &args.desired, args.state.as_deref()).await
        }
        ResourceCommands::Apply(args) => {
            commands::resource::apply(provider, kind, &args.desired, &args.state).await
        }
        ResourceCommands::Destroy(args) => {
            commands::resource::destroy(provider, kind, &args.state).await
        }
    }
}

fn make_client(config: &AppConfig, cli: &Cli) -> Result<CloudflareClient> {
    let token = cli
        .token
        .clone()
        .or_else(|| config.api.token.clone())
        .context("No API token: pass --token, set CLOUDFLARE_API_TOKEN or WORKERFORM__API__TOKEN")?;
    let client = CloudflareClient::new(token)
        .with_base_url(&config.api.base_url)?
        .with_retry(RetryPolicy::new(config.retry.max_retries, config.retry.delay()));
    Ok(client)
}
