use std::io;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type BotResult<T> = Result<T, BotError>;

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct BotConfig {
    #[serde(default, skip_serializing)]
    pub discord_token: Option<String>,
    // Registration, audit, denial and publish events
    #[serde(default)]
    pub logging: bool,
    #[serde(default = "default_publish_global")]
    pub publish_global: bool,
}

fn default_publish_global() -> bool {
    true
}

#[derive(Debug, Error)]
pub enum BotError {
    #[error("Invalid command descriptor `{name}`: {reason}")]
    InvalidDescriptor { name: String, reason: String },
    #[error("Discord error: {0}")]
    Discord(#[from] serenity::Error),
    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),
    #[error("Configuration missing: {0}")]
    ConfigMissing(&'static str),
    #[error("Invalid configuration value for {key}: {value}")]
    ConfigInvalid { key: &'static str, value: String },
    #[error("{0}")]
    Custom(String),
}

impl BotError {
    pub fn invalid(name: impl Into<String>, reason: impl Into<String>) -> Self {
        BotError::InvalidDescriptor { name: name.into(), reason: reason.into() }
    }
}
