use crate::domain::model::{CommandStatus, Invocation};
use crate::domain::ports::CommandRunner;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::process::Stdio;
use tokio::process::Command as TokioCommand;

/// Spawns real child processes. Stdout and stderr are inherited, so the
/// child's own output is the diagnostic when something fails.
#[derive(Debug, Clone, Default)]
pub struct ProcessRunner;

impl ProcessRunner {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(&self, invocation: &Invocation) -> Result<CommandStatus> {
        let mut cmd = TokioCommand::new(&invocation.program);
        cmd.args(&invocation.args)
            .current_dir(&invocation.current_dir)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        for (key, value) in &invocation.envs {
            cmd.env(key, value);
        }

        tracing::debug!("Spawning: {}", invocation.display_line());

        let status = cmd.status().await?;

        tracing::debug!("{} exited with {:?}", invocation.display_line(), status.code());

        Ok(CommandStatus {
            code: status.code(),
        })
    }
}
