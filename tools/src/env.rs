use std::time::Duration;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Read-only configuration shared by every connector call.
///
/// Built once at startup and cloned into the dispatcher; the inner
/// `reqwest::Client` is reference counted so clones share one pool.
#[derive(Debug, Clone)]
pub struct ToolEnv {
    pub client: reqwest::Client,
    pub default_webhook_url: Option<String>,
    pub default_timeout: Duration,
}

impl ToolEnv {
    pub fn new(default_webhook_url: Option<String>, default_timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            default_webhook_url,
            default_timeout,
        }
    }
}

impl Default for ToolEnv {
    fn default() -> Self {
        Self::new(None, DEFAULT_TIMEOUT)
    }
}

/// Flattens an error and its source chain into one line.
pub(crate) fn describe(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
