use async_openai::{
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    },
    Client,
};
use anyhow::{anyhow, Context, Result};
use phantom_tools::ToolOutput;
use std::fmt;
use std::time::Duration;
use tracing::{error, info};

use crate::config::LlmConfig;

pub const SYSTEM_PROMPT: &str =
    "You are a senior orchestrator that summarises tool outputs and recommends the next action.";
pub const MAX_COMPLETION_TOKENS: u32 = 300;
pub const TEMPERATURE: f32 = 0.2;

/// What the Brain produced for one request.
#[derive(Debug, Clone, PartialEq)]
pub enum Synthesis {
    Live(String),
    Offline(OfflineSummary),
}

impl Synthesis {
    pub fn is_live(&self) -> bool {
        matches!(self, Synthesis::Live(_))
    }

    pub fn into_text(self) -> String {
        match self {
            Synthesis::Live(answer) => answer,
            Synthesis::Offline(summary) => summary.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OfflineCause {
    /// No credential configured: the expected, quiet case.
    MissingCredential,
    /// A credential exists but the call did not produce an answer.
    BackendFailure(String),
}

/// Deterministic fallback text. Depends only on its inputs.
#[derive(Debug, Clone, PartialEq)]
pub struct OfflineSummary {
    pub cause: OfflineCause,
    pub instruction: String,
    pub observed: Vec<String>,
}

impl OfflineSummary {
    pub fn new(cause: OfflineCause, instruction: &str, tool_outputs: &[ToolOutput]) -> Self {
        Self {
            cause,
            instruction: instruction.to_string(),
            observed: tool_outputs.iter().map(ToString::to_string).collect(),
        }
    }
}

impl fmt::Display for OfflineSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.cause {
            OfflineCause::MissingCredential => {
                writeln!(f, "OpenAI key not set; returning offline summary.")?;
            }
            OfflineCause::BackendFailure(reason) => {
                writeln!(f, "OpenAI call failed; returning offline summary.")?;
                writeln!(f, "Reason: {}", reason)?;
            }
        }

        writeln!(f, "Instruction: {}", self.instruction)?;
        writeln!(f, "Observed tool outputs ({}):", self.observed.len())?;
        for (index, output) in self.observed.iter().enumerate() {
            writeln!(f, "  {}. {}", index + 1, output)?;
        }

        match &self.cause {
            OfflineCause::MissingCredential => write!(
                f,
                "Set the OPENAI_API_KEY environment variable (or add it to a local .env file) to enable live reasoning."
            ),
            OfflineCause::BackendFailure(_) => write!(
                f,
                "Verify that OPENAI_API_KEY is valid and that this host can reach the OpenAI endpoint."
            ),
        }
    }
}

/// The reasoning step. Never fails: without a client, or when the call goes
/// wrong, it degrades to an [`OfflineSummary`].
pub struct Brain {
    client: Option<Client<OpenAIConfig>>,
    model: String,
    timeout: Duration,
}

impl Brain {
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let Some(api_key) = config.api_key.as_deref() else {
            info!("No OpenAI key configured. Brain will answer with offline summaries.");
            return Ok(Self::offline());
        };

        let mut openai = OpenAIConfig::new().with_api_key(api_key);
        if let Some(api_base) = config.api_base.as_deref() {
            openai = openai.with_api_base(api_base);
        }

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .context("Failed to build HTTP client for the Brain")?;
        let client = Client::with_config(openai).with_http_client(http);

        info!("Brain connected. Model: {}", config.model);
        Ok(Self {
            client: Some(client),
            model: config.model.clone(),
            timeout: config.timeout,
        })
    }

    pub fn offline() -> Self {
        let defaults = LlmConfig::default();
        Self {
            client: None,
            model: defaults.model,
            timeout: defaults.timeout,
        }
    }

    pub fn is_live(&self) -> bool {
        self.client.is_some()
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Startup connectivity check. Only meaningful with a credential.
    pub async fn say_hello(&self) -> Result<String> {
        let client = self
            .client
            .as_ref()
            .ok_or_else(|| anyhow!("no OpenAI key configured"))?;

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages([ChatCompletionRequestMessage::User(
                ChatCompletionRequestUserMessageArgs::default()
                    .content("Hello! Reply with 'System Online'.")
                    .build()?,
            )])
            .build()?;

        let response = tokio::time::timeout(self.timeout, client.chat().create(request))
            .await
            .map_err(|_| anyhow!("OpenAI call timed out after {:?}", self.timeout))??;

        Ok(response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default())
    }

    pub async fn synthesize(&self, instruction: &str, tool_outputs: &[ToolOutput]) -> Synthesis {
        let Some(client) = self.client.as_ref() else {
            return Synthesis::Offline(OfflineSummary::new(
                OfflineCause::MissingCredential,
                instruction,
                tool_outputs,
            ));
        };

        match self.complete(client, instruction, tool_outputs).await {
            Ok(answer) => Synthesis::Live(answer),
            Err(e) => {
                let reason = format!("{:#}", e);
                error!("Brain failure, degrading to offline summary: {}", reason);
                Synthesis::Offline(OfflineSummary::new(
                    OfflineCause::BackendFailure(reason),
                    instruction,
                    tool_outputs,
                ))
            }
        }
    }

    async fn complete(
        &self,
        client: &Client<OpenAIConfig>,
        instruction: &str,
        tool_outputs: &[ToolOutput],
    ) -> Result<String> {
        // 1. Two messages: the role, then the instruction plus everything the tools saw
        let outputs = serde_json::to_string(tool_outputs)?;
        let messages = [
            ChatCompletionRequestMessage::System(
                ChatCompletionRequestSystemMessageArgs::default()
                    .content(SYSTEM_PROMPT)
                    .build()?,
            ),
            ChatCompletionRequestMessage::User(
                ChatCompletionRequestUserMessageArgs::default()
                    .content(format!("Instruction: {}\n\nTool outputs: {}", instruction, outputs))
                    .build()?,
            ),
        ];

        // 2. Short, low-temperature answer
        #[allow(deprecated)]
        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .temperature(TEMPERATURE)
            .max_tokens(MAX_COMPLETION_TOKENS)
            .build()?;

        // 3. Send to AI, bounded like every other outbound call
        let response = tokio::time::timeout(self.timeout, client.chat().create(request))
            .await
            .map_err(|_| anyhow!("OpenAI call timed out after {:?}", self.timeout))??;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| anyhow!("OpenAI returned no completion text"))
    }
}
