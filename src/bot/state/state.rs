use std::env;

use crate::bot::state::def::{BotConfig, BotError, BotResult};

pub const TOKEN_VAR: &str = "DISCORD_TOKEN";
pub const LOGGING_VAR: &str = "SLASHCORE_LOGGING";
pub const PUBLISH_VAR: &str = "SLASHCORE_PUBLISH_GLOBAL";

impl Default for BotConfig {
    fn default() -> Self {
        BotConfig { discord_token: None, logging: false, publish_global: true }
    }
}

impl BotConfig {
    /// Loads `.env` (if present) and reads the config from the process environment.
    pub fn from_env() -> BotResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> BotResult<Self>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        let mut config = BotConfig::default();

        config.discord_token = lookup(TOKEN_VAR).filter(|t| !t.trim().is_empty());

        if let Some(raw) = lookup(LOGGING_VAR) {
            config.logging = parse_flag(LOGGING_VAR, &raw)?;
        }
        if let Some(raw) = lookup(PUBLISH_VAR) {
            config.publish_global = parse_flag(PUBLISH_VAR, &raw)?;
        }

        Ok(config)
    }

    pub fn token(&self) -> BotResult<&str> {
        self.discord_token.as_deref().ok_or(BotError::ConfigMissing(TOKEN_VAR))
    }
}

fn parse_flag(key: &'static str, raw: &str) -> BotResult<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(BotError::ConfigInvalid { key, value: raw.to_string() }),
    }
}
