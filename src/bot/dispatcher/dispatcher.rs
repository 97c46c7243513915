use std::{any::Any, panic::AssertUnwindSafe, sync::Arc};

use chrono::Utc;
use futures::FutureExt;
use tracing::{error, info, warn};

use crate::bot::{
    commands::registry::CommandRegistry,
    handler::handler::Transport,
    invocation::invocation::{Invocation, UserId},
    permissions::permissions::{authorize, Authorization},
    replies::Replies,
};

/// Which branch a single dispatch ended in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Sent by our own identity, dropped without a lookup.
    Ignored,
    UnknownCommand,
    MalformedContext,
    Denied,
    Completed,
    /// The handler returned an error or panicked.
    Failed,
}

pub struct Dispatcher {
    registry: Arc<CommandRegistry>,
    self_id: UserId,
    logging: bool,
}

impl Dispatcher {
    pub fn new(registry: Arc<CommandRegistry>, self_id: UserId) -> Self {
        let logging = registry.is_logging();
        Self { registry, self_id, logging }
    }

    /// Ignores invocations coming from the transport's own identity.
    pub fn for_transport(registry: Arc<CommandRegistry>, transport: &dyn Transport) -> Self {
        Self::new(registry, transport.self_id())
    }

    pub fn self_id(&self) -> UserId {
        self.self_id
    }

    /// Runs one invocation to completion. Never fails: every problem is logged
    /// and, where the invoker should hear about it, answered through the reply sink.
    pub async fn handle(&self, invocation: Invocation) -> DispatchOutcome {
        if invocation.user == self.self_id {
            return DispatchOutcome::Ignored;
        }

        let Some(command) = self.registry.resolve(&invocation.command) else {
            error!(
                command = %invocation.command,
                user = %invocation.user,
                "Received invocation for unregistered command /{}",
                invocation.command
            );
            return DispatchOutcome::UnknownCommand;
        };

        match authorize(&invocation, &command.descriptor) {
            Authorization::Allowed => {}
            Authorization::Malformed(reason) => {
                error!(
                    command = %invocation.command,
                    user = %invocation.user,
                    "Malformed invocation context: {reason}"
                );
                return DispatchOutcome::MalformedContext;
            }
            Authorization::Denied(message) => {
                if self.logging {
                    info!(
                        command = %invocation.command,
                        user = %invocation.user,
                        permission = %command.descriptor.permission,
                        "Permission denied"
                    );
                }
                if let Err(e) = invocation.fail(&message).await {
                    warn!("Failed to send denial for /{}: {e:?}", invocation.command);
                }
                return DispatchOutcome::Denied;
            }
        }

        let reply = invocation.reply.clone();
        let user = invocation.user;
        let scope = invocation.scope;
        let received_at = invocation.received_at;
        let name = command.descriptor.name.clone();
        let handler = command.handler.clone();

        // The closure call sits inside the async block so a panic while building
        // the future is caught the same way as one while polling it.
        let result = AssertUnwindSafe(async move { handler(invocation).await })
            .catch_unwind()
            .await;

        let detail = match result {
            Ok(Ok(())) => {
                if self.logging {
                    let elapsed_ms = (Utc::now() - received_at).num_milliseconds();
                    let scope = scope.map(|s| s.to_string()).unwrap_or_else(|| "direct".to_string());
                    info!(%user, command = %name, %scope, elapsed_ms, "{user} executed command /{name} in {scope}");
                }
                return DispatchOutcome::Completed;
            }
            Ok(Err(e)) => format!("{e:?}"),
            Err(panic) => format!("panic: {}", panic_message(panic.as_ref())),
        };

        error!(command = %name, %user, "Command /{name} failed: {detail}");
        if let Err(e) = reply.fail(Replies::GENERIC_FAILURE).await {
            warn!("Failed to send failure reply for /{name}: {e:?}");
        }
        DispatchOutcome::Failed
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        *s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "non-string panic payload"
    }
}
