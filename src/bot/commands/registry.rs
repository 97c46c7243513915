use std::sync::Arc;

use dashmap::{mapref::entry::Entry, DashMap};
use tracing::{debug, info};

use crate::bot::{
    commands::{commands::{CommandHandler, CommandSource}, CommandDescriptor},
    state::def::BotResult,
};

#[derive(Clone)]
pub struct RegisteredCommand {
    pub descriptor: Arc<CommandDescriptor>,
    pub handler: CommandHandler,
}

/// Name → command table shared by the dispatcher and the uploader.
///
/// Registration is expected to finish before the first dispatch; registering
/// while invocations are in flight is not supported.
pub struct CommandRegistry {
    commands: DashMap<String, RegisteredCommand>,
    logging: bool,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self { commands: DashMap::new(), logging: false }
    }

    pub fn with_logging(mut self, logging: bool) -> Self {
        self.logging = logging;
        self
    }

    pub fn is_logging(&self) -> bool {
        self.logging
    }

    /// First registration of a name wins; later ones are ignored.
    pub fn register(&self, descriptor: CommandDescriptor, handler: CommandHandler) {
        match self.commands.entry(descriptor.name.clone()) {
            Entry::Occupied(_) => {
                debug!(command = %descriptor.name, "command already registered, keeping the first one");
            }
            Entry::Vacant(slot) => {
                let name = descriptor.name.clone();
                slot.insert(RegisteredCommand { descriptor: Arc::new(descriptor), handler });
                if self.logging {
                    info!(command = %name, "Registered new command (/{name})");
                }
            }
        }
    }

    pub fn register_source(&self, source: &dyn CommandSource) {
        let registrations = source.registrations();
        let count = registrations.len();
        for registration in registrations {
            self.register(registration.descriptor, registration.handler);
        }
        if self.logging {
            info!(source = source.name(), count, "Registered commands from source");
        }
    }

    pub fn resolve(&self, name: &str) -> Option<RegisteredCommand> {
        self.commands.get(name).map(|entry| entry.value().clone())
    }

    pub fn all(&self) -> Vec<Arc<CommandDescriptor>> {
        self.commands.iter().map(|entry| entry.value().descriptor.clone()).collect()
    }

    pub fn global_descriptors(&self) -> Vec<Arc<CommandDescriptor>> {
        self.commands
            .iter()
            .filter(|entry| entry.value().descriptor.global)
            .map(|entry| entry.value().descriptor.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Every descriptor as JSON, sorted by name.
    pub fn manifest(&self) -> BotResult<serde_json::Value> {
        let mut descriptors = self.all();
        descriptors.sort_by(|a, b| a.name.cmp(&b.name));
        let list: Vec<&CommandDescriptor> = descriptors.iter().map(|d| d.as_ref()).collect();
        Ok(serde_json::to_value(list)?)
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}
