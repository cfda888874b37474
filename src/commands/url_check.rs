//! URL reputation check against Google Safe Browsing

use super::{parse_args, Command, CommandContext, CommandError, CommandOutput};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::BTreeSet;

const CLIENT_ID: &str = "assistant-bot";
const FOOTER: &str = "_Searches not found in Google's database will return safe._";
const THREAT_TYPES: [&str; 4] = [
    "MALWARE",
    "SOCIAL_ENGINEERING",
    "UNWANTED_SOFTWARE",
    "POTENTIALLY_HARMFUL_APPLICATION",
];

pub struct UrlCheckCommand;

#[derive(Debug, Deserialize)]
struct UrlCheckInput {
    url: String,
}

#[derive(Debug, Default, Deserialize)]
struct LookupResponse {
    #[serde(default)]
    matches: Vec<ThreatMatch>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThreatMatch {
    threat_type: String,
}

fn lookup_body(url: &str) -> Value {
    json!({
        "client": {
            "clientId": CLIENT_ID,
            "clientVersion": env!("CARGO_PKG_VERSION"),
        },
        "threatInfo": {
            "threatTypes": THREAT_TYPES,
            "platformTypes": ["ANY_PLATFORM"],
            "threatEntryTypes": ["URL"],
            "threatEntries": [{ "url": url }],
        }
    })
}

fn format_verdict(response: LookupResponse) -> String {
    if response.matches.is_empty() {
        return format!("✅ **URL is safe** (no threats detected).\n{FOOTER}");
    }
    // Sorted and deduplicated so the reply is stable
    let threats: BTreeSet<_> = response
        .matches
        .iter()
        .map(|m| m.threat_type.as_str())
        .collect();
    let threats = threats.into_iter().collect::<Vec<_>>().join(", ");
    format!("⚠️ **Unsafe URL detected**\nThreats: **{threats}**\n{FOOTER}")
}

impl UrlCheckCommand {
    async fn lookup(input: Value, ctx: &CommandContext) -> Result<String, CommandError> {
        let UrlCheckInput { url } = parse_args(input)?;
        let key = ctx
            .settings
            .safe_browsing_key
            .as_deref()
            .ok_or(CommandError::NotConfigured("GOOGLE_SAFE_BROWSING_KEY"))?;

        let response = ctx
            .http
            .post(&ctx.settings.endpoints.safe_browsing)
            .query(&[("key", key)])
            .json(&lookup_body(&url))
            .send()
            .await?
            .error_for_status()?;
        let body: LookupResponse = response.json().await?;
        Ok(format_verdict(body))
    }
}

#[async_trait]
impl Command for UrlCheckCommand {
    fn name(&self) -> &'static str {
        "url-check"
    }

    fn description(&self) -> String {
        "Check whether a URL is known to be unsafe".to_string()
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "required": ["url"],
            "properties": {
                "url": { "type": "string", "description": "URL to check" }
            }
        })
    }

    async fn run(&self, input: Value, ctx: CommandContext) -> CommandOutput {
        match Self::lookup(input, &ctx).await {
            Ok(verdict) => CommandOutput::success(verdict),
            Err(e) => {
                tracing::warn!(command = self.name(), error = %e, "URL check failed");
                CommandOutput::error(format!("URL check failed:\n```{e}```"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_verdict() {
        let verdict = format_verdict(serde_json::from_value(json!({})).unwrap());
        assert_eq!(
            verdict,
            "✅ **URL is safe** (no threats detected).\n_Searches not found in Google's database will return safe._"
        );
    }

    #[test]
    fn test_unsafe_verdict_dedupes_threats() {
        let response: LookupResponse = serde_json::from_value(json!({"matches": [
            {"threatType": "SOCIAL_ENGINEERING", "platformType": "ANY_PLATFORM"},
            {"threatType": "MALWARE"},
            {"threatType": "MALWARE"}
        ]}))
        .unwrap();
        let verdict = format_verdict(response);
        assert!(verdict.starts_with("⚠️ **Unsafe URL detected**\n"));
        assert!(verdict.contains("Threats: **MALWARE, SOCIAL_ENGINEERING**\n"));
        assert!(verdict.ends_with(FOOTER));
    }

    #[test]
    fn test_lookup_body_shape() {
        let body = lookup_body("http://example.com");
        assert_eq!(body["threatInfo"]["threatEntries"][0]["url"], "http://example.com");
        assert_eq!(body["threatInfo"]["threatTypes"].as_array().unwrap().len(), 4);
        assert_eq!(body["client"]["clientId"], CLIENT_ID);
    }

    #[tokio::test]
    async fn test_missing_key_reports_failure() {
        let out = UrlCheckCommand
            .run(json!({"url": "http://example.com"}), crate::commands::test_context())
            .await;
        assert!(!out.success);
        assert_eq!(
            out.content,
            "URL check failed:\n```GOOGLE_SAFE_BROWSING_KEY is not configured```"
        );
    }
}
