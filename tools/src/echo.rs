//! `echo`: the trace connector. Reflects its inputs back and never fails.

use serde_json::{Map, Value};

use crate::model::{ToolOutput, ToolSpec, ToolStatus};

pub const TOOL_NAME: &str = "echo";
pub const DESCRIPTION: &str =
    "Reflect the instruction, context and requested tools back for tracing.";

/// `unmatched` carries the requested name when echo stands in for an unknown tool.
pub fn run(
    instruction: &str,
    context: Option<&Map<String, Value>>,
    tool_specs: &[ToolSpec],
    unmatched: Option<&str>,
) -> ToolOutput {
    let specs = tool_specs
        .iter()
        .map(|spec| serde_json::to_value(spec).unwrap_or(Value::Null))
        .collect::<Vec<_>>();

    let output = ToolOutput::new(TOOL_NAME, ToolStatus::Code(200))
        .with("instruction", instruction)
        .with("context", context.cloned().unwrap_or_default())
        .with("tool_specs", specs);

    match unmatched {
        Some(name) => output.with("unmatched_tool", name),
        None => output,
    }
}
