use anyhow::Result;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::dispatch::Dispatcher;
use crate::error::AgentError;
use crate::llm::Brain;
use crate::model::{AgentRequest, AgentResult};
use crate::registry::Registry;

// The Runtime
// One per process; every request borrows it and nothing in it is mutated.
pub struct Runtime {
    dispatcher: Dispatcher,
    brain: Brain,
}

impl Runtime {
    pub fn new(dispatcher: Dispatcher, brain: Brain) -> Self {
        Self { dispatcher, brain }
    }

    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let dispatcher = Dispatcher::new(config.tool_env());
        let brain = Brain::new(&config.llm)?;
        Ok(Self::new(dispatcher, brain))
    }

    pub fn brain(&self) -> &Brain {
        &self.brain
    }

    pub fn registry(&self) -> &Registry {
        self.dispatcher.registry()
    }

    // The Critical Function: validate, act, then think
    pub async fn run(&self, request: AgentRequest) -> Result<AgentResult, AgentError> {
        let instruction = request
            .instruction
            .as_deref()
            .filter(|instruction| !instruction.is_empty())
            .ok_or_else(|| {
                warn!("Rejected request without an instruction");
                AgentError::MissingInstruction
            })?;

        info!("Instruction received: {}", instruction);

        // STEP 1: ACT (the tools, in order)
        let raw_tool_outputs = self
            .dispatcher
            .dispatch(instruction, request.context.as_ref(), request.tool_specs.as_deref())
            .await;

        // STEP 2: THINK (the Brain, after every tool has finished)
        let synthesis = self.brain.synthesize(instruction, &raw_tool_outputs).await;
        info!(
            "Synthesized {} answer from {} tool outputs",
            if synthesis.is_live() { "live" } else { "offline" },
            raw_tool_outputs.len()
        );

        Ok(AgentResult {
            result: synthesis.into_text(),
            raw_tool_outputs,
        })
    }
}
