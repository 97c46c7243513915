use std::{future::Future, sync::Arc};

use futures::future::BoxFuture;

use crate::bot::{
    commands::{CommandDescriptor, CommandGroup, CommandRegistration},
    invocation::invocation::Invocation,
    state::def::BotResult,
};

pub type CommandHandler = Arc<dyn Fn(Invocation) -> BoxFuture<'static, BotResult<()>> + Send + Sync>;

/// Wraps an async closure into a [`CommandHandler`].
pub fn handler<F, Fut>(func: F) -> CommandHandler
where
    F: Fn(Invocation) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = BotResult<()>> + Send + 'static,
{
    Arc::new(move |invocation| Box::pin(func(invocation)))
}

/// Anything that can hand the registry its declarations.
pub trait CommandSource {
    fn name(&self) -> &str;
    fn registrations(&self) -> Vec<CommandRegistration>;
}

impl CommandSource for CommandGroup {
    fn name(&self) -> &str {
        &self.name
    }

    fn registrations(&self) -> Vec<CommandRegistration> {
        self.commands.clone()
    }
}

impl CommandGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), commands: Vec::new() }
    }

    pub fn command(mut self, descriptor: CommandDescriptor, handler: CommandHandler) -> Self {
        self.commands.push(CommandRegistration { descriptor, handler });
        self
    }
}

#[macro_export]
macro_rules! cmd {
    ($descriptor:expr, $handler:expr $(,)?) => {
        $crate::bot::commands::CommandRegistration {
            descriptor: $descriptor,
            handler: $crate::bot::commands::commands::handler($handler),
        }
    };
}
