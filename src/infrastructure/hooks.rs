//! Hook Runner
//!
//! Runs the configured lifecycle commands through `sh -c`. A failing hook is
//! returned to the engine, which decides between abort and rollback.

use std::path::Path;
use std::rc::Rc;
use std::time::Duration;

use tracing::debug;

use crate::domain::ports::{CommandRunner, CommandSpec};
use crate::domain::value_objects::HookKind;
use crate::error::{DeployError, DeployResult};

pub struct HookRunner {
    runner: Rc<dyn CommandRunner>,
    timeout: Option<Duration>,
}

impl HookRunner {
    pub fn new(runner: Rc<dyn CommandRunner>, timeout: Option<Duration>) -> Self {
        Self { runner, timeout }
    }

    /// Run `command` in `working_dir`, returning its stdout
    pub fn run(&self, kind: HookKind, command: &str, working_dir: &Path) -> DeployResult<String> {
        debug!(hook = %kind, command, cwd = %working_dir.display(), "running hook");

        let spec = CommandSpec::shell(command)
            .current_dir(working_dir)
            .timeout(self.timeout);

        let output = self.runner.run(&spec).map_err(|e| DeployError::HookFailed {
            kind,
            command: command.to_string(),
            stderr: e.to_string(),
        })?;

        if !output.success() {
            let mut stderr = output.stderr_lossy().trim().to_string();
            if stderr.is_empty() {
                stderr = match output.code {
                    Some(code) => format!("exited with status {}", code),
                    None => "terminated by signal".to_string(),
                };
            }
            return Err(DeployError::HookFailed {
                kind,
                command: command.to_string(),
                stderr,
            });
        }

        Ok(output.stdout_lossy())
    }
}
