use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;
use std::time::Duration;

// Input: one requested tool invocation, kept exactly as the caller sent it
// so the echo tool can reflect unknown keys and nulls back.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ToolSpec {
    raw: Map<String, Value>,
}

impl ToolSpec {
    pub fn new(name: impl Into<String>, params: Value) -> Self {
        let mut raw = Map::new();
        raw.insert("name".to_string(), Value::String(name.into()));
        if !params.is_null() {
            raw.insert("params".to_string(), params);
        }
        Self { raw }
    }

    pub fn name(&self) -> Option<&str> {
        self.raw.get("name").and_then(Value::as_str)
    }

    /// Connector-specific parameters; no schema is enforced.
    pub fn params(&self) -> Option<&Value> {
        self.raw.get("params").filter(|params| !params.is_null())
    }

    /// Registry key for this spec: the name, lower-cased.
    pub fn normalized_name(&self) -> String {
        self.name().unwrap_or_default().to_lowercase()
    }

    pub fn param(&self, key: &str) -> Option<&Value> {
        self.params()?.get(key).filter(|value| !value.is_null())
    }

    /// A string parameter, treating `""` the same as absent.
    pub fn str_param(&self, key: &str) -> Option<&str> {
        self.param(key)
            .and_then(Value::as_str)
            .filter(|value| !value.is_empty())
    }

    /// `params.timeout` in seconds (fractions allowed), else `default`.
    pub fn timeout(&self, default: Duration) -> Duration {
        self.param("timeout")
            .and_then(Value::as_f64)
            .filter(|secs| secs.is_finite() && *secs > 0.0)
            .map(Duration::from_secs_f64)
            .unwrap_or(default)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolStatus {
    /// HTTP-like status code reported by the remote peer.
    Code(u16),
    Skipped,
    Error,
}

// Codes go out as numbers, the two literal states as strings.
impl Serialize for ToolStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ToolStatus::Code(code) => serializer.serialize_u16(*code),
            ToolStatus::Skipped => serializer.serialize_str("skipped"),
            ToolStatus::Error => serializer.serialize_str("error"),
        }
    }
}

impl fmt::Display for ToolStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToolStatus::Code(code) => write!(f, "{}", code),
            ToolStatus::Skipped => f.write_str("skipped"),
            ToolStatus::Error => f.write_str("error"),
        }
    }
}

// Output: what one connector observed. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolOutput {
    pub tool: String,
    pub status: ToolStatus,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl ToolOutput {
    pub fn new(tool: &str, status: ToolStatus) -> Self {
        Self {
            tool: tool.to_string(),
            status,
            fields: Map::new(),
        }
    }

    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(key.to_string(), value.into());
        self
    }

    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }
}

// Compact JSON, used when listing outputs in summaries and prompts.
impl fmt::Display for ToolOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}
