use crate::domain::model::{CommandStatus, Invocation};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Runs an external command to completion.
///
/// `Ok` means the process was started and waited for, whatever its exit
/// status. A process that could not be started is `RunnerError::IoError`;
/// the orchestrator names the step it belonged to.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, invocation: &Invocation) -> Result<CommandStatus>;
}
