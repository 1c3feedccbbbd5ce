//! Orchestration core: configuration, the tool registry and dispatcher, the
//! reasoning "Brain", and the request runtime that ties them together.

pub mod config;
pub mod dispatch;
pub mod error;
pub mod llm;
pub mod model;
pub mod registry;
pub mod runtime;

#[cfg(test)]
mod test_support;

pub use config::{AppConfig, LlmConfig};
pub use error::AgentError;
pub use model::{AgentRequest, AgentResult};
pub use phantom_tools::{ToolOutput, ToolSpec, ToolStatus};
