use std::{process::ExitCode, sync::Arc, time::Duration};

use slashcore::{
    bot::{commands::general::commands::general_commands, platforms::discord::event_loop::run_discord_bot},
    BotConfig, BotResult, CommandRegistry,
};
use tokio::time::sleep;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Err(e) = run().await {
        error!("Fatal: {e}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

async fn run() -> BotResult<()> {
    let config = BotConfig::from_env()?;
    config.token()?;

    let registry = Arc::new(CommandRegistry::new().with_logging(config.logging));
    registry.register_source(&general_commands()?);

    //Loop so a dropped gateway connection doesn't end the bot
    loop {
        if let Err(e) = run_discord_bot(&config, registry.clone()).await {
            error!("Discord client error: {e:?}");
        }
        info!("Restarting Discord client");
        sleep(Duration::from_secs(5)).await;
    }
}
