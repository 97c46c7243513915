//! Declarative slash-command dispatch: declare commands with typed parameters
//! and a required permission, register them once, and let the dispatcher route
//! every invocation through the permission gate to its handler.
//!
//! ```rust,ignore
//! let registry = Arc::new(CommandRegistry::new().with_logging(true));
//! registry.register(
//!     CommandDescriptor::builder("ban").permission(Permission::BanMembers).build()?,
//!     handler(|invocation| async move { invocation.send("banned").await }),
//! );
//! let dispatcher = Dispatcher::new(registry.clone(), bot_id);
//! dispatcher.handle(invocation).await;
//! ```

pub mod bot;

pub use bot::{
    commands::{
        commands::{handler, CommandHandler, CommandSource},
        registry::{CommandRegistry, RegisteredCommand},
        CommandDescriptor, CommandGroup, CommandRegistration, ParameterSpec, ParameterType,
    },
    dispatcher::dispatcher::{DispatchOutcome, Dispatcher},
    handler::handler::{ReplySink, Transport},
    invocation::invocation::{Invocation, Member, OptionValue, ScopeId, UserId},
    permissions::permissions::{authorize, Authorization, Permission, PermissionSet},
    run_event_loop,
    state::def::{BotConfig, BotError, BotResult},
    uploader::uploader::publish_global,
};
