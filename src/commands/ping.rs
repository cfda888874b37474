//! Round-trip latency to the chat host

use super::{finish, parse_args, Command, CommandContext, CommandError, CommandOutput, NoArgs};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::{Duration, Instant};

pub struct PingCommand;

fn format_latency(elapsed: Duration) -> String {
    format!("Network: `{}ms`", elapsed.as_millis())
}

impl PingCommand {
    async fn measure(input: Value, ctx: &CommandContext) -> Result<CommandOutput, CommandError> {
        let NoArgs {} = parse_args(input)?;
        let start = Instant::now();
        // Any HTTP answer counts; only the round trip matters
        ctx.http.get(&ctx.settings.ping_url).send().await?;
        Ok(CommandOutput::success(format_latency(start.elapsed())).ephemeral())
    }
}

#[async_trait]
impl Command for PingCommand {
    fn name(&self) -> &'static str {
        "ping"
    }

    fn description(&self) -> String {
        "Check network latency".to_string()
    }

    fn input_schema(&self) -> Value {
        json!({ "type": "object", "properties": {} })
    }

    async fn run(&self, input: Value, ctx: CommandContext) -> CommandOutput {
        finish(self.name(), Self::measure(input, &ctx).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_latency() {
        assert_eq!(format_latency(Duration::from_micros(42_900)), "Network: `42ms`");
    }

    #[tokio::test]
    async fn test_unreachable_host_fails() {
        let out = PingCommand.run(json!({}), crate::commands::test_context()).await;
        assert!(!out.success);
        assert!(out.content.starts_with("Command failed: upstream request failed"));
    }
}
