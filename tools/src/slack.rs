//! `slack_webhook`: post a message to a Slack incoming webhook.

use serde_json::json;
use tracing::warn;

use crate::env::{describe, ToolEnv};
use crate::model::{ToolOutput, ToolSpec, ToolStatus};

pub const TOOL_NAME: &str = "slack_webhook";
pub const DESCRIPTION: &str =
    "Send a message through a Slack incoming webhook. Params: message, webhook_url, timeout.";

pub const MISSING_WEBHOOK_REASON: &str =
    "No webhook URL provided; set SLACK_WEBHOOK_URL or pass params.webhook_url";

/// Posts `{"text": message}`. The message defaults to `default_message`
/// (the instruction) and the destination to the process-wide webhook.
pub async fn run(spec: &ToolSpec, env: &ToolEnv, default_message: &str) -> ToolOutput {
    let message = spec.str_param("message").unwrap_or(default_message);
    let webhook_url = spec
        .str_param("webhook_url")
        .or(env.default_webhook_url.as_deref());

    let Some(webhook_url) = webhook_url else {
        return ToolOutput::new(TOOL_NAME, ToolStatus::Skipped)
            .with("reason", MISSING_WEBHOOK_REASON)
            .with("message", message);
    };

    let result = env
        .client
        .post(webhook_url)
        .timeout(spec.timeout(env.default_timeout))
        .json(&json!({ "text": message }))
        .send()
        .await;

    match result {
        Ok(response) => ToolOutput::new(TOOL_NAME, ToolStatus::Code(response.status().as_u16()))
            .with("message", message),
        Err(err) => {
            let error = describe(&err);
            warn!("slack_webhook post failed: {}", error);
            ToolOutput::new(TOOL_NAME, ToolStatus::Error)
                .with("message", message)
                .with("error", error)
        }
    }
}
