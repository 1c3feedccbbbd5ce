use phantom_tools::{ToolOutput, ToolSpec};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// Input: What the caller sends us
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgentRequest {
    #[serde(default)]
    pub instruction: Option<String>, // Validated by the runtime, not by serde
    #[serde(default)]
    pub context: Option<Map<String, Value>>, // Passed through to the echo tool only
    #[serde(default)]
    pub tool_specs: Option<Vec<ToolSpec>>,
}

impl AgentRequest {
    pub fn new(instruction: impl Into<String>) -> Self {
        Self {
            instruction: Some(instruction.into()),
            ..Self::default()
        }
    }

    pub fn with_context(mut self, context: Map<String, Value>) -> Self {
        self.context = Some(context);
        self
    }

    pub fn with_tools(mut self, tool_specs: Vec<ToolSpec>) -> Self {
        self.tool_specs = Some(tool_specs);
        self
    }
}

// Output: What we send back
#[derive(Debug, Clone, Serialize)]
pub struct AgentResult {
    pub result: String,
    pub raw_tool_outputs: Vec<ToolOutput>, // Verbatim, for caller-side auditing
}
