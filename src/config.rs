//! Process configuration from the environment

use crate::commands::{CommandSettings, Endpoints};
use crate::runtime::SessionConfig;
use std::time::Duration;

const DEFAULT_PORT: u16 = 8000;
const DEFAULT_TIMEOUT_SECS: u64 = 300;
const DEFAULT_RETENTION_SECS: u64 = 600;
const DEFAULT_PING_URL: &str = "https://discord.com";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub calculator_timeout: Duration,
    pub calculator_retention: Duration,
    pub safe_browsing_key: Option<String>,
    pub ping_url: String,
    pub support_url: Option<String>,
    pub invite_url: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset, empty or malformed values take defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let text = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let seconds = |key: &str, default: u64| {
            let secs = text(key)
                .and_then(|v| v.parse::<u64>().ok())
                .filter(|&secs| secs > 0);
            if secs.is_none() && text(key).is_some() {
                tracing::warn!(key, default, "Ignoring invalid duration");
            }
            Duration::from_secs(secs.unwrap_or(default))
        };

        Self {
            port: text("ASSISTANT_PORT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            calculator_timeout: seconds("CALCULATOR_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS),
            calculator_retention: seconds("CALCULATOR_RETENTION_SECS", DEFAULT_RETENTION_SECS),
            safe_browsing_key: text("GOOGLE_SAFE_BROWSING_KEY"),
            ping_url: text("PING_URL").unwrap_or_else(|| DEFAULT_PING_URL.to_string()),
            support_url: text("SUPPORT_URL"),
            invite_url: text("INVITE_URL"),
        }
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            inactivity_timeout: self.calculator_timeout,
            expired_retention: self.calculator_retention,
        }
    }

    pub fn command_settings(&self) -> CommandSettings {
        CommandSettings {
            endpoints: Endpoints::default(),
            safe_browsing_key: self.safe_browsing_key.clone(),
            ping_url: self.ping_url.clone(),
            support_url: self.support_url.clone(),
            invite_url: self.invite_url.clone(),
        }
    }
}
