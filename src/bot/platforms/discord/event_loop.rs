use std::sync::Arc;

use serenity::{
    all::{Context, EventHandler, GatewayIntents, Interaction, Ready},
    async_trait, Client,
};
use tokio::sync::{
    mpsc::{self, UnboundedReceiver, UnboundedSender},
    Mutex,
};
use tracing::{error, info, warn};

use crate::bot::{
    commands::registry::CommandRegistry,
    dispatcher::dispatcher::Dispatcher,
    invocation::invocation::{Invocation, UserId},
    platforms::discord::discord::{to_invocation, DiscordTransport, InteractionReply},
    run_event_loop,
    state::def::{BotConfig, BotResult},
    uploader::uploader::publish_global,
};

pub struct DiscordHandler {
    registry: Arc<CommandRegistry>,
    publish_global: bool,
    tx: UnboundedSender<Invocation>,
    rx: Mutex<Option<UnboundedReceiver<Invocation>>>,
}

impl DiscordHandler {
    pub fn new(registry: Arc<CommandRegistry>, config: &BotConfig) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { registry, publish_global: config.publish_global, tx, rx: Mutex::new(Some(rx)) }
    }
}

#[async_trait]
impl EventHandler for DiscordHandler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!("Successfully connected to bot {}", ready.user.name);
        let self_id = UserId(ready.user.id.get());

        // Ready fires again after reconnects; the loop only starts once.
        let rx = self.rx.lock().await.take();
        if let Some(rx) = rx {
            let transport = DiscordTransport::new(ctx.http.clone(), self_id);
            let dispatcher = Arc::new(Dispatcher::for_transport(self.registry.clone(), &transport));
            tokio::spawn(async move {
                let handled = run_event_loop(dispatcher, rx).await;
                warn!(handled, "Discord event loop stopped");
            });

            if self.publish_global {
                publish_global(&self.registry, &transport).await;
            }
        }
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        let Interaction::Command(command) = interaction else {
            return;
        };
        let reply = InteractionReply::new(ctx.http.clone(), command.clone());
        if let Err(e) = self.tx.send(to_invocation(&command, reply)) {
            error!("Event loop is gone, dropping /{}: {e:?}", e.0.command);
        }
    }
}

pub async fn run_discord_bot(config: &BotConfig, registry: Arc<CommandRegistry>) -> BotResult<()> {
    let token = config.token()?;
    let mut client = Client::builder(token, GatewayIntents::GUILDS)
        .event_handler(DiscordHandler::new(registry, config))
        .await?;

    client.start().await?;
    Ok(())
}
