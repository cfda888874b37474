//! Dictionary definition lookup

use super::{finish, parse_args, Command, CommandContext, CommandError, CommandOutput};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::{json, Value};

pub struct DefineCommand;

#[derive(Debug, Deserialize)]
struct DefineInput {
    word: String,
}

#[derive(Debug, Deserialize)]
struct Entry {
    #[serde(default)]
    meanings: Vec<Meaning>,
}

#[derive(Debug, Deserialize)]
struct Meaning {
    #[serde(default)]
    definitions: Vec<Definition>,
}

#[derive(Debug, Deserialize)]
struct Definition {
    definition: String,
}

/// The dictionary answers with an entry list, or an object when it has none
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DictionaryResponse {
    Entries(Vec<Entry>),
    NotFound(Value),
}

/// Reply with the first definition, under the word as the user typed it
fn format_definition(word: &str, response: DictionaryResponse) -> CommandOutput {
    let first = match response {
        DictionaryResponse::Entries(entries) => entries
            .into_iter()
            .next()
            .and_then(|entry| entry.meanings.into_iter().flat_map(|m| m.definitions).next()),
        DictionaryResponse::NotFound(_) => None,
    };

    match first {
        Some(Definition { definition }) => {
            CommandOutput::success(format!("**{word}**: {definition}"))
        }
        None => CommandOutput::success("No definition found."),
    }
}

impl DefineCommand {
    async fn fetch(input: Value, ctx: &CommandContext) -> Result<CommandOutput, CommandError> {
        let DefineInput { word } = parse_args(input)?;
        let word = word.trim();
        if word.is_empty() || word.contains('/') {
            return Err(CommandError::InvalidInput(format!("not a word: {word:?}")));
        }

        let url = format!(
            "{}/{}",
            ctx.settings.endpoints.dictionary.trim_end_matches('/'),
            word
        );
        let response = ctx.http.get(url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(CommandOutput::success("No definition found."));
        }
        let body: DictionaryResponse = response.json().await?;
        Ok(format_definition(word, body))
    }
}

#[async_trait]
impl Command for DefineCommand {
    fn name(&self) -> &'static str {
        "define"
    }

    fn description(&self) -> String {
        "Get the dictionary definition of a word".to_string()
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "required": ["word"],
            "properties": {
                "word": { "type": "string", "description": "Word to define" }
            }
        })
    }

    async fn run(&self, input: Value, ctx: CommandContext) -> CommandOutput {
        finish(self.name(), Self::fetch(input, &ctx).await)
    }
}
