//! Current time in a timezone

use super::{finish, parse_args, Command, CommandContext, CommandError, CommandOutput};
use async_trait::async_trait;
use chrono::DateTime;
use serde::Deserialize;
use serde_json::{json, Value};

pub struct TimeCommand;

#[derive(Debug, Deserialize)]
struct TimeInput {
    timezone: String,
}

#[derive(Debug, Deserialize)]
struct WorldTimeResponse {
    datetime: String,
}

/// IANA names only use these characters; anything else never reaches the URL
fn is_valid_timezone(tz: &str) -> bool {
    !tz.is_empty()
        && !tz.contains("..")
        && !tz.starts_with('/')
        && tz
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '+' | '/'))
}

fn format_time(timezone: &str, datetime: &str) -> Result<String, CommandError> {
    let parsed = DateTime::parse_from_rfc3339(datetime)
        .map_err(|e| CommandError::Decode(format!("bad datetime {datetime:?}: {e}")))?;
    Ok(format!(
        "Time in `{timezone}`: **{}**",
        parsed.format("%Y-%m-%d %H:%M:%S")
    ))
}

impl TimeCommand {
    async fn fetch(input: Value, ctx: &CommandContext) -> Result<CommandOutput, CommandError> {
        let TimeInput { timezone } = parse_args(input)?;
        let timezone = timezone.trim();
        if !is_valid_timezone(timezone) {
            return Ok(CommandOutput::success("Invalid timezone."));
        }

        let url = format!(
            "{}/{}",
            ctx.settings.endpoints.world_time.trim_end_matches('/'),
            timezone
        );
        let response = ctx.http.get(url).send().await?;
        if !response.status().is_success() {
            return Ok(CommandOutput::success("Invalid timezone."));
        }
        let body: WorldTimeResponse = response.json().await?;
        Ok(CommandOutput::success(format_time(timezone, &body.datetime)?))
    }
}

#[async_trait]
impl Command for TimeCommand {
    fn name(&self) -> &'static str {
        "time"
    }

    fn description(&self) -> String {
        "Get the current time in a timezone".to_string()
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "required": ["timezone"],
            "properties": {
                "timezone": {
                    "type": "string",
                    "description": "IANA timezone, e.g. Europe/London"
                }
            }
        })
    }

    async fn run(&self, input: Value, ctx: CommandContext) -> CommandOutput {
        finish(self.name(), Self::fetch(input, &ctx).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timezone_validation() {
        assert!(is_valid_timezone("Europe/London"));
        assert!(is_valid_timezone("America/Argentina/Buenos_Aires"));
        assert!(is_valid_timezone("Etc/GMT+5"));
        assert!(!is_valid_timezone(""));
        assert!(!is_valid_timezone("../etc/passwd"));
        assert!(!is_valid_timezone("Europe/London?x=1"));
        assert!(!is_valid_timezone("/UTC"));
    }

    #[test]
    fn test_format_time_uses_local_offset() {
        let text = format_time("Asia/Tokyo", "2024-03-01T21:05:09.123456+09:00").unwrap();
        assert_eq!(text, "Time in `Asia/Tokyo`: **2024-03-01 21:05:09**");
    }

    #[test]
    fn test_format_time_bad_datetime() {
        assert!(matches!(
            format_time("UTC", "yesterday"),
            Err(CommandError::Decode(_))
        ));
    }

    #[tokio::test]
    async fn test_invalid_timezone_short_circuits() {
        let out = TimeCommand
            .run(json!({"timezone": "bad zone"}), crate::commands::test_context())
            .await;
        assert!(out.success);
        assert_eq!(out.content, "Invalid timezone.");
    }
}
