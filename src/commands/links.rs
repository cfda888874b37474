//! Support-server and invite links

use super::{finish, parse_args, Command, CommandContext, CommandError, CommandOutput, NoArgs};
use async_trait::async_trait;
use serde_json::{json, Value};

pub struct SupportCommand;
pub struct InviteCommand;

fn support_message(url: &str) -> String {
    format!("You can join our support server [here](<{url}>)!")
}

fn invite_message(url: &str) -> String {
    format!("[Tap here to invite the bot now!]({url})")
}

fn link_reply(
    input: Value,
    url: Option<&str>,
    setting: &'static str,
    message: fn(&str) -> String,
) -> Result<CommandOutput, CommandError> {
    let NoArgs {} = parse_args(input)?;
    let url = url.ok_or(CommandError::NotConfigured(setting))?;
    Ok(CommandOutput::success(message(url)).ephemeral())
}

#[async_trait]
impl Command for SupportCommand {
    fn name(&self) -> &'static str {
        "support"
    }

    fn description(&self) -> String {
        "Get a link to the support server".to_string()
    }

    fn input_schema(&self) -> Value {
        json!({ "type": "object", "properties": {} })
    }

    async fn run(&self, input: Value, ctx: CommandContext) -> CommandOutput {
        let url = ctx.settings.support_url.as_deref();
        finish(
            self.name(),
            link_reply(input, url, "SUPPORT_URL", support_message),
        )
    }
}

#[async_trait]
impl Command for InviteCommand {
    fn name(&self) -> &'static str {
        "invite"
    }

    fn description(&self) -> String {
        "Get a link to add the bot to a server".to_string()
    }

    fn input_schema(&self) -> Value {
        json!({ "type": "object", "properties": {} })
    }

    async fn run(&self, input: Value, ctx: CommandContext) -> CommandOutput {
        let url = ctx.settings.invite_url.as_deref();
        finish(
            self.name(),
            link_reply(input, url, "INVITE_URL", invite_message),
        )
    }
}
