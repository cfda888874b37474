//! Informational chat commands
//!
//! Each command is a stateless request -> format -> reply pipeline over one
//! external HTTP API. No retries, no caching; all per-call context arrives in
//! [`CommandContext`].

mod clock;
mod define;
mod fact;
mod joke;
mod links;
mod ping;
mod urban;
mod url_check;
mod weather;

pub use clock::TimeCommand;
pub use define::DefineCommand;
pub use fact::FactCommand;
pub use joke::JokeCommand;
pub use links::{InviteCommand, SupportCommand};
pub use ping::PingCommand;
pub use urban::UrbanCommand;
pub use url_check::UrlCheckCommand;
pub use weather::WeatherCommand;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

/// Reply produced by a command
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommandOutput {
    pub success: bool,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embed: Option<Embed>,
    /// Only the invoking user should see this reply
    pub ephemeral: bool,
}

impl CommandOutput {
    pub fn success(content: impl Into<String>) -> Self {
        Self {
            success: true,
            content: content.into(),
            embed: None,
            ephemeral: false,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            content: message.into(),
            embed: None,
            ephemeral: false,
        }
    }

    pub fn embed(embed: Embed) -> Self {
        Self {
            success: true,
            content: String::new(),
            embed: Some(embed),
            ephemeral: false,
        }
    }

    pub fn ephemeral(mut self) -> Self {
        self.ephemeral = true;
        self
    }
}

/// Rich reply block
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Embed {
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<EmbedField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

impl Embed {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            fields: Vec::new(),
            footer: None,
        }
    }

    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>, inline: bool) -> Self {
        self.fields.push(EmbedField {
            name: name.into(),
            value: value.into(),
            inline,
        });
        self
    }

    pub fn footer(mut self, footer: impl Into<String>) -> Self {
        self.footer = Some(footer.into());
        self
    }
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("{0} is not configured")]
    NotConfigured(&'static str),
    #[error("upstream request failed: {0}")]
    Upstream(String),
    #[error("unexpected upstream response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for CommandError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            CommandError::Decode(e.to_string())
        } else {
            CommandError::Upstream(e.to_string())
        }
    }
}

/// Upstream base URLs
#[derive(Debug, Clone)]
pub struct Endpoints {
    pub joke: String,
    pub fact: String,
    pub urban: String,
    pub dictionary: String,
    pub world_time: String,
    pub safe_browsing: String,
    pub geocoding: String,
    pub forecast: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            joke: "https://v2.jokeapi.dev/joke/Any?safe-mode".to_string(),
            fact: "https://uselessfacts.jsph.pl/random.json?language=en".to_string(),
            urban: "https://api.urbandictionary.com/v0/define".to_string(),
            dictionary: "https://api.dictionaryapi.dev/api/v2/entries/en".to_string(),
            world_time: "https://worldtimeapi.org/api/timezone".to_string(),
            safe_browsing: "https://safebrowsing.googleapis.com/v4/threatMatches:find".to_string(),
            geocoding: "https://geocoding-api.open-meteo.com/v1/search".to_string(),
            forecast: "https://api.open-meteo.com/v1/forecast".to_string(),
        }
    }
}

/// Settings shared by every command invocation
#[derive(Debug, Clone, Default)]
pub struct CommandSettings {
    pub endpoints: Endpoints,
    pub safe_browsing_key: Option<String>,
    pub ping_url: String,
    pub support_url: Option<String>,
    pub invite_url: Option<String>,
}

/// All context needed for a command invocation.
///
/// Created fresh for each call. The HTTP client is the process-wide one
/// built at startup; cloning it is cheap.
#[derive(Clone)]
pub struct CommandContext {
    pub http: Client,
    pub settings: Arc<CommandSettings>,
    pub actor_id: String,
}

impl CommandContext {
    pub fn new(http: Client, settings: Arc<CommandSettings>, actor_id: impl Into<String>) -> Self {
        Self {
            http,
            settings,
            actor_id: actor_id.into(),
        }
    }
}

/// Trait for commands users can invoke
#[async_trait]
pub trait Command: Send + Sync {
    /// Command name as typed by users
    fn name(&self) -> &'static str;

    fn description(&self) -> String;

    /// JSON schema for the command arguments
    fn input_schema(&self) -> Value;

    async fn run(&self, input: Value, ctx: CommandContext) -> CommandOutput;
}

/// Name, description and schema of a command, for listing
#[derive(Debug, Clone, Serialize)]
pub struct CommandDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
    /// Opens a calculator session instead of replying once
    pub interactive: bool,
}

/// Collection of the informational commands
pub struct CommandRegistry {
    commands: Vec<Arc<dyn Command>>,
}

impl CommandRegistry {
    pub fn standard() -> Self {
        Self {
            commands: vec![
                Arc::new(JokeCommand),
                Arc::new(FactCommand),
                Arc::new(UrbanCommand),
                Arc::new(DefineCommand),
                Arc::new(TimeCommand),
                Arc::new(UrlCheckCommand),
                Arc::new(WeatherCommand),
                Arc::new(PingCommand),
                Arc::new(SupportCommand),
                Arc::new(InviteCommand),
            ],
        }
    }

    pub fn definitions(&self) -> Vec<CommandDefinition> {
        self.commands
            .iter()
            .map(|c| CommandDefinition {
                name: c.name().to_string(),
                description: c.description(),
                input_schema: c.input_schema(),
                interactive: false,
            })
            .collect()
    }

    /// Run a command by name; `None` if no such command exists
    pub async fn execute(&self, name: &str, input: Value, ctx: CommandContext) -> Option<CommandOutput> {
        for command in &self.commands {
            if command.name() == name {
                tracing::debug!(command = name, actor = %ctx.actor_id, "Running command");
                return Some(command.run(input, ctx).await);
            }
        }
        None
    }
}

/// Parse command arguments, mapping serde errors to `InvalidInput`
pub(crate) fn parse_args<T: DeserializeOwned>(input: Value) -> Result<T, CommandError> {
    // Commands without arguments may be invoked with `null`
    let input = if input.is_null() {
        Value::Object(serde_json::Map::new())
    } else {
        input
    };
    serde_json::from_value(input).map_err(|e| CommandError::InvalidInput(e.to_string()))
}

/// Turn a pipeline result into a reply, logging failures
pub(crate) fn finish(command: &str, result: Result<CommandOutput, CommandError>) -> CommandOutput {
    match result {
        Ok(output) => output,
        Err(e) => {
            tracing::warn!(command, error = %e, "Command failed");
            CommandOutput::error(format!("Command failed: {e}"))
        }
    }
}

/// Truncate to at most `max` characters
pub(crate) fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

/// Empty argument object for commands that take none
#[derive(Debug, Default, Deserialize)]
pub(crate) struct NoArgs {}

#[cfg(test)]
pub(crate) fn test_context() -> CommandContext {
    CommandContext::new(
        Client::new(),
        Arc::new(CommandSettings {
            ping_url: "http://127.0.0.1:9/".to_string(),
            ..CommandSettings::default()
        }),
        "tester",
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_all_commands_registered() {
        let registry = CommandRegistry::standard();
        let names: Vec<_> = registry.definitions().into_iter().map(|d| d.name).collect();
        for expected in [
            "joke", "fact", "urban", "define", "time", "url-check", "weather", "ping", "support",
            "invite",
        ] {
            assert!(names.iter().any(|n| n == expected), "Missing {expected}");
        }
    }

    #[test]
    fn test_schemas_are_objects() {
        for def in CommandRegistry::standard().definitions() {
            assert_eq!(def.input_schema["type"], "object", "{}", def.name);
            assert!(!def.interactive);
        }
    }

    #[tokio::test]
    async fn test_unknown_command() {
        let registry = CommandRegistry::standard();
        assert!(registry
            .execute("shard", json!({}), test_context())
            .await
            .is_none());
    }

    #[test]
    fn test_parse_args_null_is_empty_object() {
        let _: NoArgs = parse_args(Value::Null).unwrap();
    }

    #[test]
    fn test_truncate_chars_counts_chars() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("hi", 10), "hi");
    }

    #[test]
    fn test_finish_maps_error() {
        let out = finish("x", Err(CommandError::NotConfigured("thing")));
        assert!(!out.success);
        assert_eq!(out.content, "Command failed: thing is not configured");
    }

    #[test]
    fn test_output_serialization_skips_empty() {
        let value = serde_json::to_value(CommandOutput::success("hi")).unwrap();
        assert_eq!(
            value,
            json!({"success": true, "content": "hi", "ephemeral": false})
        );
    }
}
