//! Fakes shared by the unit tests.

use std::{
    fmt,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use tracing::{
    field::{Field, Visit},
    subscriber::DefaultGuard,
    Event, Level, Subscriber,
};
use tracing_subscriber::{layer::Context, prelude::*, Layer};

use crate::bot::{
    commands::CommandDescriptor,
    handler::handler::{ReplySink, Transport},
    invocation::invocation::{Invocation, Member, ScopeId, UserId},
    permissions::permissions::PermissionSet,
    state::def::{BotError, BotResult},
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Sent {
    Reply(String),
    Failure(String),
}

#[derive(Clone, Default)]
pub struct SentLog(Arc<Mutex<Vec<Sent>>>);

impl SentLog {
    pub fn all(&self) -> Vec<Sent> {
        self.0.lock().unwrap().clone()
    }

    pub fn replies(&self) -> Vec<String> {
        self.all()
            .into_iter()
            .filter_map(|s| match s {
                Sent::Reply(text) => Some(text),
                Sent::Failure(_) => None,
            })
            .collect()
    }

    pub fn failures(&self) -> Vec<String> {
        self.all()
            .into_iter()
            .filter_map(|s| match s {
                Sent::Failure(text) => Some(text),
                Sent::Reply(_) => None,
            })
            .collect()
    }
}

pub struct RecordingReply {
    log: SentLog,
}

impl RecordingReply {
    pub fn new() -> (Arc<dyn ReplySink>, SentLog) {
        let log = SentLog::default();
        (Arc::new(RecordingReply { log: log.clone() }), log)
    }
}

#[async_trait]
impl ReplySink for RecordingReply {
    async fn reply(&self, content: &str) -> BotResult<()> {
        self.log.0.lock().unwrap().push(Sent::Reply(content.to_string()));
        Ok(())
    }

    async fn fail(&self, content: &str) -> BotResult<()> {
        self.log.0.lock().unwrap().push(Sent::Failure(content.to_string()));
        Ok(())
    }
}

pub fn direct_invocation(user: UserId, command: &str, reply: Arc<dyn ReplySink>) -> Invocation {
    Invocation::new(user, command, reply)
}

pub fn scoped_invocation(
    user: UserId,
    scope: ScopeId,
    command: &str,
    permissions: PermissionSet,
    reply: Arc<dyn ReplySink>,
) -> Invocation {
    Invocation::new(user, command, reply).in_scope(scope, Some(Member { id: user, permissions }))
}

/// Records published command names; names listed in `reject` fail to publish.
pub struct RecordingTransport {
    pub id: UserId,
    pub published: Mutex<Vec<String>>,
    pub reject: Vec<String>,
}

impl RecordingTransport {
    pub fn new(id: UserId) -> Self {
        Self { id, published: Mutex::new(Vec::new()), reject: Vec::new() }
    }

    pub fn published(&self) -> Vec<String> {
        let mut names = self.published.lock().unwrap().clone();
        names.sort();
        names
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    fn self_id(&self) -> UserId {
        self.id
    }

    async fn publish(&self, descriptor: &CommandDescriptor) -> BotResult<()> {
        if self.reject.contains(&descriptor.name) {
            return Err(BotError::Custom(format!("rejected {}", descriptor.name)));
        }
        self.published.lock().unwrap().push(descriptor.name.clone());
        Ok(())
    }
}

#[derive(Clone, Debug)]
pub struct CapturedEvent {
    pub level: Level,
    pub text: String,
}

/// A `tracing` layer that keeps every event it sees.
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<CapturedEvent>>>);

pub fn capture_logs() -> CapturedLogs {
    CapturedLogs::default()
}

impl CapturedLogs {
    /// Installs the layer for the current thread until the guard drops.
    pub fn install(&self) -> DefaultGuard {
        tracing::subscriber::set_default(tracing_subscriber::registry().with(self.clone()))
    }

    pub fn events(&self) -> Vec<CapturedEvent> {
        self.0.lock().unwrap().clone()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.events().iter().any(|e| e.text.contains(needle))
    }

    pub fn at_level(&self, level: Level) -> Vec<String> {
        self.events().into_iter().filter(|e| e.level == level).map(|e| e.text).collect()
    }
}

struct TextVisitor(String);

impl Visit for TextVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.0.insert_str(0, &format!("{value:?}"));
        } else {
            self.0.push_str(&format!(" {}={value:?}", field.name()));
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.0.insert_str(0, value);
        } else {
            self.0.push_str(&format!(" {}={value}", field.name()));
        }
    }
}

impl<S: Subscriber> Layer<S> for CapturedLogs {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = TextVisitor(String::new());
        event.record(&mut visitor);
        self.0.lock().unwrap().push(CapturedEvent { level: *event.metadata().level(), text: visitor.0 });
    }
}
