//! Urban Dictionary lookup

use super::{
    finish, parse_args, truncate_chars, Command, CommandContext, CommandError, CommandOutput,
    Embed,
};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

const MAX_DEFINITION_CHARS: usize = 4000;
const MAX_EXAMPLE_CHARS: usize = 1024;

pub struct UrbanCommand;

#[derive(Debug, Deserialize)]
struct UrbanInput {
    term: String,
}

#[derive(Debug, Deserialize)]
struct UrbanResponse {
    list: Vec<UrbanEntry>,
}

#[derive(Debug, Deserialize)]
struct UrbanEntry {
    word: String,
    definition: String,
    #[serde(default)]
    example: String,
}

fn format_urban(response: UrbanResponse) -> CommandOutput {
    let Some(entry) = response.list.into_iter().next() else {
        return CommandOutput::success("No definition found.");
    };

    let example = truncate_chars(&entry.example, MAX_EXAMPLE_CHARS);
    let example = if example.is_empty() {
        "N/A".to_string()
    } else {
        example
    };

    CommandOutput::embed(
        Embed::new(entry.word, truncate_chars(&entry.definition, MAX_DEFINITION_CHARS))
            .field("Example", example, false),
    )
}

impl UrbanCommand {
    async fn fetch(input: Value, ctx: &CommandContext) -> Result<CommandOutput, CommandError> {
        let UrbanInput { term } = parse_args(input)?;
        let response: UrbanResponse = ctx
            .http
            .get(&ctx.settings.endpoints.urban)
            .query(&[("term", term.as_str())])
            .send()
            .await?
            .json()
            .await?;
        Ok(format_urban(response))
    }
}

#[async_trait]
impl Command for UrbanCommand {
    fn name(&self) -> &'static str {
        "urban"
    }

    fn description(&self) -> String {
        "Search Urban Dictionary".to_string()
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "required": ["term"],
            "properties": {
                "term": { "type": "string", "description": "Term to look up" }
            }
        })
    }

    async fn run(&self, input: Value, ctx: CommandContext) -> CommandOutput {
        finish(self.name(), Self::fetch(input, &ctx).await)
    }
}
