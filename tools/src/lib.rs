//! Tool connectors for the Phantom Shell agent.
//!
//! Every connector maps one [`ToolSpec`] to one [`ToolOutput`]. Connectors never
//! fail past their own output record: transport problems come back as
//! `status: "error"`, missing configuration as `status: "skipped"`.

pub mod echo;
pub mod env;
pub mod http;
pub mod model;
pub mod shell;
pub mod slack;

#[cfg(test)]
mod test_support;

pub use env::ToolEnv;
pub use model::{ToolOutput, ToolSpec, ToolStatus};
