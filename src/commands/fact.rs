//! Random fact from the useless-facts API

use super::{finish, parse_args, Command, CommandContext, CommandError, CommandOutput, NoArgs};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

pub struct FactCommand;

#[derive(Debug, Deserialize)]
struct FactResponse {
    text: String,
}

impl FactCommand {
    async fn fetch(input: Value, ctx: &CommandContext) -> Result<CommandOutput, CommandError> {
        let NoArgs {} = parse_args(input)?;
        let fact: FactResponse = ctx
            .http
            .get(&ctx.settings.endpoints.fact)
            .send()
            .await?
            .json()
            .await?;
        Ok(CommandOutput::success(fact.text))
    }
}

#[async_trait]
impl Command for FactCommand {
    fn name(&self) -> &'static str {
        "fact"
    }

    fn description(&self) -> String {
        "Get a random fact".to_string()
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
    fn test_fact_parses() {
        let fact: FactResponse = serde_json::from_value(json!({
            "id": "abc",
            "text": "Honey never spoils.",
            "language": "en"
        }))
        .unwrap();
        assert_eq!(fact.text, "Honey never spoils.");
    }
}
