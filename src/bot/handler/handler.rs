use async_trait::async_trait;

use crate::bot::{commands::CommandDescriptor, invocation::invocation::UserId, state::def::BotResult};

/// Where replies for one invocation go.
#[async_trait]
pub trait ReplySink: Send + Sync {
    async fn reply(&self, content: &str) -> BotResult<()>;

    /// Sends a message rendered as a failure (denials, generic errors).
    async fn fail(&self, content: &str) -> BotResult<()>;
}

/// The connection that delivers invocations and accepts published commands.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Identity the transport itself acts as; invocations from it are ignored.
    fn self_id(&self) -> UserId;

    async fn publish(&self, descriptor: &CommandDescriptor) -> BotResult<()>;
}
