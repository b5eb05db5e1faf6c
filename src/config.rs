//! Process configuration read from the environment (after `.env` is loaded).

use crate::constants::{DEFAULT_DB_MAX_CONNECTIONS, DEFAULT_SESSION_TTL_SECS};
use anyhow::{Context, Result, anyhow};
use serenity::model::id::GuildId;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub discord_token: String,
    pub database_url: String,
    /// When set, guild messages from any other server are ignored. DMs are always handled.
    pub allowed_guild: Option<GuildId>,
    pub moderators: Vec<String>,
    pub session_ttl: Duration,
    pub db_max_connections: u32,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let require = |key: &str| get(key).ok_or_else(|| anyhow!("{key} must be set"));

        let allowed_guild = match get("SERVER_ID") {
            Some(raw) => {
                let id = raw
                    .parse::<u64>()
                    .with_context(|| format!("SERVER_ID must be a numeric guild id, got {raw:?}"))?;
                if id == 0 {
                    return Err(anyhow!("SERVER_ID must be non-zero"));
                }
                Some(GuildId::new(id))
            }
            None => None,
        };

        let moderators = get("MODERATORS")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|h| !h.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        let session_ttl_secs = match get("SESSION_TTL_SECS") {
            Some(raw) => raw
                .parse::<u64>()
                .with_context(|| format!("SESSION_TTL_SECS must be a whole number, got {raw:?}"))?,
            None => DEFAULT_SESSION_TTL_SECS,
        };

        let db_max_connections = match get("DB_MAX_CONNECTIONS") {
            Some(raw) => raw
                .parse::<u32>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| anyhow!("DB_MAX_CONNECTIONS must be a positive integer, got {raw:?}"))?,
            None => DEFAULT_DB_MAX_CONNECTIONS,
        };

        Ok(Self {
            discord_token: require("DISCORD_TOKEN")?,
            database_url: require("DATABASE_URL")?,
            allowed_guild,
            moderators,
            session_ttl: Duration::from_secs(session_ttl_secs),
            db_max_connections,
        })
    }
}
