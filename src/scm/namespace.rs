//! Namespace Management
//!
//! Lists, creates and removes pmem namespaces via `ndctl`, decoding its JSON
//! output into [`ScmNamespace`] records.

use crate::domain::ports::{CommandExecutorRef, ScmNamespace, ToolLocatorRef};
use crate::error::{Error, Result};
use crate::scm::config::ToolCommands;
use tracing::{debug, info};

/// Decode `ndctl` namespace output.
///
/// `ndctl` prints a bare object for a single namespace and an array
/// otherwise; both yield the same records. Empty output means no namespaces.
pub fn parse_namespaces(text: &str) -> Result<Vec<ScmNamespace>> {
    let trimmed = text.trim_start();

    let json = if trimmed.starts_with('[') {
        trimmed.to_string()
    } else {
        format!("[{}]", trimmed)
    };

    serde_json::from_str(&json).map_err(|e| Error::Parse {
        what: "namespace json".into(),
        reason: e.to_string(),
        text: text.to_string(),
    })
}

/// Reject device names that are unsafe to place on a shell command line
pub fn validate_namespace_name(name: &str) -> Result<()> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'));

    if valid {
        Ok(())
    } else {
        Err(Error::Parse {
            what: "namespace name".into(),
            reason: "expected only [A-Za-z0-9._-]".into(),
            text: name.to_string(),
        })
    }
}

/// Namespace operations against the local pmem subsystem
pub struct NamespaceManager {
    executor: CommandExecutorRef,
    locator: ToolLocatorRef,
    commands: ToolCommands,
}

impl NamespaceManager {
    pub fn new(
        executor: CommandExecutorRef,
        locator: ToolLocatorRef,
        commands: ToolCommands,
    ) -> Self {
        Self {
            executor,
            locator,
            commands,
        }
    }

    /// List existing namespaces
    pub fn list_namespaces(&self) -> Result<Vec<ScmNamespace>> {
        self.locator.ensure_available(self.commands.ndctl())?;

        let out = self.executor.run(&self.commands.list_namespaces())?;
        let namespaces = parse_namespaces(&out)?;

        debug!("discovered {} pmem namespaces", namespaces.len());
        Ok(namespaces)
    }

    /// Run a single namespace creation, returning what it created
    pub fn create_namespace_batch(&self) -> Result<Vec<ScmNamespace>> {
        self.locator.ensure_available(self.commands.ndctl())?;

        info!("creating SCM namespace, may take a few minutes...");
        let out = self.executor.run(&self.commands.create_namespace())?;

        parse_namespaces(&out)
    }

    /// Disable then destroy the named namespace.
    ///
    /// Destroy is not attempted when disable fails.
    pub fn remove_namespace(&self, name: &str) -> Result<()> {
        validate_namespace_name(name)?;
        self.locator.ensure_available(self.commands.ndctl())?;

        info!("removing SCM namespace {:?}, may take a few minutes...", name);
        self.executor.run(&self.commands.disable_namespace(name))?;
        self.executor.run(&self.commands.destroy_namespace(name))?;

        Ok(())
    }
}
