use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AgentError {
    /// Client-input error: the request carried no usable instruction.
    #[error("Instruction is required")]
    MissingInstruction,
}
