//! `whisky-admin`: the catalog admin client on the command line.

mod cli;
mod commands;
mod support;

use std::{process::ExitCode, sync::Arc};

use clap::Parser;
use cli::{Cli, Commands};
use services::services::{
    admin::AdminClient,
    auth::FileTokenStore,
    config::{API_URL_ENV, ClientConfig},
    notification::TracingNotifier,
};
use support::Output;
use tracing::error;

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    utils::log::init_tracing("info");
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = ClientConfig::load().await?;
    if let Some(url) = cli.api_url {
        config = config.with_env(|name| (name == API_URL_ENV).then(|| url.clone()))?;
    }

    let admin = AdminClient::connect(
        &config,
        Arc::new(FileTokenStore::default_location()),
        Arc::new(TracingNotifier),
    )
    .await?;
    let out = Output { json: cli.json };

    match cli.command {
        Commands::Login { email, password } => commands::session::login(&admin, &email, password).await,
        Commands::Logout => commands::session::logout(&admin).await,
        Commands::Banners(command) => commands::banners::run(&admin, command, out).await,
        Commands::Curations(command) => commands::curations::run(&admin, command, out).await,
        Commands::Tags(command) => commands::tags::run(&admin, command, out).await,
        Commands::Alcohols(command) => commands::alcohols::run(&admin, command, out).await,
        Commands::Regions { keyword } => commands::reference::regions(&admin, keyword, out).await,
        Commands::Distilleries { keyword, region_id } => {
            commands::reference::distilleries(&admin, keyword, region_id, out).await
        }
        Commands::Helps(command) => commands::helps::run(&admin, command, out).await,
    }
}
