//! Random joke from JokeAPI

use super::{finish, parse_args, Command, CommandContext, CommandError, CommandOutput, NoArgs};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

pub struct JokeCommand;

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum JokeResponse {
    Single { joke: String },
    Twopart { setup: String, delivery: String },
}

fn format_joke(joke: JokeResponse) -> String {
    match joke {
        JokeResponse::Single { joke } => joke,
        JokeResponse::Twopart { setup, delivery } => format!("{setup}\n{delivery}"),
    }
}

impl JokeCommand {
    async fn fetch(input: Value, ctx: &CommandContext) -> Result<CommandOutput, CommandError> {
        let NoArgs {} = parse_args(input)?;
        let joke: JokeResponse = ctx
            .http
            .get(&ctx.settings.endpoints.joke)
            .send()
            .await?
            .json()
            .await?;
        Ok(CommandOutput::success(format_joke(joke)))
    }
}

#[async_trait]
impl Command for JokeCommand {
    fn name(&self) -> &'static str {
        "joke"
    }

    fn description(&self) -> String {
        "Get a random joke".to_string()
    }

    fn input_schema(&self) -> Value {
        json!({ "type": "object", "properties": {} })
    }

    async fn run(&self, input: Value, ctx: CommandContext) -> CommandOutput {
        finish(self.name(), Self::fetch(input, &ctx).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_joke() {
        let joke: JokeResponse =
            serde_json::from_value(json!({"type": "single", "joke": "Knock knock", "id": 3}))
                .unwrap();
        assert_eq!(format_joke(joke), "Knock knock");
    }

    #[test]
    fn test_two_part_joke() {
        let joke: JokeResponse = serde_json::from_value(json!({
            "type": "twopart",
            "setup": "Why?",
            "delivery": "Because."
        }))
        .unwrap();
        assert_eq!(format_joke(joke), "Why?\nBecause.");
    }

    #[test]
    fn test_error_payload_does_not_parse() {
        let parsed = serde_json::from_value::<JokeResponse>(json!({"error": true, "message": "No matching joke"}));
        assert!(parsed.is_err());
    }
}
