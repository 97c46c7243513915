use tracing::{info, warn};

use crate::bot::{commands::registry::CommandRegistry, handler::handler::Transport};

/// Publishes every global command through the transport and returns how many
/// were accepted. Individual publish failures are logged and skipped.
pub async fn publish_global(registry: &CommandRegistry, transport: &dyn Transport) -> usize {
    if registry.is_empty() {
        warn!("No commands are registered; register commands before publishing global commands");
        return 0;
    }

    let mut published = 0;
    for descriptor in registry.global_descriptors() {
        match transport.publish(&descriptor).await {
            Ok(()) => published += 1,
            Err(e) => warn!(command = %descriptor.name, "Failed to publish global command: {e:?}"),
        }
    }

    if registry.is_logging() {
        info!(count = published, "{published} global commands published successfully");
    }
    published
}
