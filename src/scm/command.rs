//! External Command Execution
//!
//! Runs tool command lines through a shell and resolves tools on the
//! executable search path.

use crate::domain::ports::{CommandExecutor, ToolLocator};
use crate::error::{Error, Result};
use std::path::PathBuf;
use std::process::Command;
use tracing::debug;

// =============================================================================
// Shell Executor
// =============================================================================

/// Runs command lines as `<shell> -c <line>`, blocking until exit
#[derive(Debug, Clone)]
pub struct ShellExecutor {
    shell: String,
}

impl ShellExecutor {
    pub fn new(shell: impl Into<String>) -> Self {
        Self {
            shell: shell.into(),
        }
    }
}

impl Default for ShellExecutor {
    fn default() -> Self {
        Self::new("bash")
    }
}

impl CommandExecutor for ShellExecutor {
    fn run(&self, command: &str) -> Result<String> {
        debug!("Running `{}`", command);

        let output = Command::new(&self.shell)
            .arg("-c")
            .arg(command)
            .output()
            .map_err(|e| Error::CommandExecution {
                command: command.to_string(),
                stdout: String::new(),
                detail: e.to_string(),
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::CommandExecution {
                command: command.to_string(),
                stdout,
                detail: format!("{}; stderr: {}", output.status, stderr.trim_end()),
            });
        }

        Ok(stdout)
    }
}

// =============================================================================
// Tool Lookup
// =============================================================================

/// Resolves tools against the process `PATH`
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemToolLocator;

impl ToolLocator for SystemToolLocator {
    fn ensure_available(&self, tool: &str) -> Result<PathBuf> {
        which::which(tool).map_err(|e| {
            debug!("Lookup of {} failed: {}", tool, e);
            Error::MissingDependency {
                tool: tool.to_string(),
            }
        })
    }
}
