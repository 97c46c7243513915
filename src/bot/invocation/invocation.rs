use core::fmt;
use std::{collections::HashMap, sync::Arc};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::bot::{handler::handler::ReplySink, permissions::permissions::PermissionSet, state::def::BotResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct UserId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct ScopeId(pub u64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The invoking principal as seen inside a scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub id: UserId,
    pub permissions: PermissionSet,
}

#[derive(Debug, Clone, PartialEq)]
pub enum OptionValue {
    String(String),
    Integer(i64),
    Boolean(bool),
    Number(f64),
    User(UserId),
    Channel(u64),
    Role(u64),
    Mentionable(u64),
    Attachment(u64),
}

impl OptionValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            OptionValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            OptionValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            OptionValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            OptionValue::Number(n) => Some(*n),
            OptionValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_user(&self) -> Option<UserId> {
        match self {
            OptionValue::User(id) => Some(*id),
            _ => None,
        }
    }
}

/// One incoming command invocation, built by the transport and consumed by a single dispatch.
#[derive(Clone)]
pub struct Invocation {
    pub user: UserId,
    pub command: String,
    pub scope: Option<ScopeId>,
    pub member: Option<Member>,
    pub options: HashMap<String, OptionValue>,
    pub reply: Arc<dyn ReplySink>,
    pub received_at: DateTime<Utc>,
}

impl Invocation {
    pub fn new(user: UserId, command: impl Into<String>, reply: Arc<dyn ReplySink>) -> Self {
        Self {
            user,
            command: command.into(),
            scope: None,
            member: None,
            options: HashMap::new(),
            reply,
            received_at: Utc::now(),
        }
    }

    pub fn in_scope(mut self, scope: ScopeId, member: Option<Member>) -> Self {
        self.scope = Some(scope);
        self.member = member;
        self
    }

    pub fn with_option(mut self, name: impl Into<String>, value: OptionValue) -> Self {
        self.options.insert(name.into(), value);
        self
    }

    pub fn is_scoped(&self) -> bool {
        self.scope.is_some()
    }

    pub fn option(&self, name: &str) -> Option<&OptionValue> {
        self.options.get(name)
    }

    pub fn string(&self, name: &str) -> Option<&str> {
        self.option(name).and_then(OptionValue::as_str)
    }

    pub fn boolean(&self, name: &str) -> Option<bool> {
        self.option(name).and_then(OptionValue::as_bool)
    }

    pub fn integer(&self, name: &str) -> Option<i64> {
        self.option(name).and_then(OptionValue::as_i64)
    }

    pub async fn send(&self, content: &str) -> BotResult<()> {
        self.reply.reply(content).await
    }

    pub async fn fail(&self, content: &str) -> BotResult<()> {
        self.reply.fail(content).await
    }
}

impl fmt::Debug for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Invocation")
            .field("user", &self.user)
            .field("command", &self.command)
            .field("scope", &self.scope)
            .field("member", &self.member)
            .field("options", &self.options)
            .field("received_at", &self.received_at)
            .finish_non_exhaustive()
    }
}
