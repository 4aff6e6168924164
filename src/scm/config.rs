//! SCM Provisioner Configuration
//!
//! Names of the external tools and the shell used to run them, plus the
//! command lines built from them.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

// =============================================================================
// Defaults
// =============================================================================

const DEFAULT_SHELL: &str = "bash";
const DEFAULT_IPMCTL: &str = "ipmctl";
const DEFAULT_NDCTL: &str = "ndctl";

fn default_shell() -> String {
    DEFAULT_SHELL.to_string()
}

fn default_ipmctl() -> String {
    DEFAULT_IPMCTL.to_string()
}

fn default_ndctl() -> String {
    DEFAULT_NDCTL.to_string()
}

// =============================================================================
// Configuration
// =============================================================================

/// Configuration for SCM provisioning
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScmConfig {
    /// Shell used to run command lines (`<shell> -c <line>`)
    #[serde(default = "default_shell")]
    pub shell: String,
    /// Region management tool
    #[serde(default = "default_ipmctl")]
    pub ipmctl_bin: String,
    /// Namespace management tool
    #[serde(default = "default_ndctl")]
    pub ndctl_bin: String,
}

impl Default for ScmConfig {
    fn default() -> Self {
        Self {
            shell: default_shell(),
            ipmctl_bin: default_ipmctl(),
            ndctl_bin: default_ndctl(),
        }
    }
}

impl ScmConfig {
    /// Load configuration from a YAML file; missing keys take defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: ScmConfig = serde_yaml::from_str(&text)?;
        config.validate()?;
        debug!("Loaded SCM config from {}: {:?}", path.display(), config);
        Ok(config)
    }

    /// Reject empty tool or shell names
    pub fn validate(&self) -> Result<()> {
        for (key, value) in [
            ("shell", &self.shell),
            ("ipmctl_bin", &self.ipmctl_bin),
            ("ndctl_bin", &self.ndctl_bin),
        ] {
            if value.trim().is_empty() {
                return Err(Error::Configuration(format!("{} must not be empty", key)));
            }
        }
        Ok(())
    }

    /// Command lines for the configured tools
    pub fn commands(&self) -> ToolCommands {
        ToolCommands {
            ipmctl: self.ipmctl_bin.clone(),
            ndctl: self.ndctl_bin.clone(),
        }
    }
}

// =============================================================================
// Tool Commands
// =============================================================================

/// Builds the exact command lines handed to the executor
#[derive(Debug, Clone)]
pub struct ToolCommands {
    ipmctl: String,
    ndctl: String,
}

impl ToolCommands {
    pub fn ipmctl(&self) -> &str {
        &self.ipmctl
    }

    pub fn ndctl(&self) -> &str {
        &self.ndctl
    }

    pub fn show_regions(&self) -> String {
        format!("{} show -d PersistentMemoryType,FreeCapacity -region", self.ipmctl)
    }

    /// AppDirect interleaved allocation goal across all modules
    pub fn create_regions(&self) -> String {
        format!("{} create -f -goal PersistentMemoryType=AppDirect", self.ipmctl)
    }

    /// Goal returning all capacity to memory mode
    pub fn remove_regions(&self) -> String {
        format!("{} create -f -goal MemoryMode=100", self.ipmctl)
    }

    pub fn delete_goal(&self) -> String {
        format!("{} delete -goal", self.ipmctl)
    }

    pub fn create_namespace(&self) -> String {
        format!("{} create-namespace", self.ndctl)
    }

    pub fn list_namespaces(&self) -> String {
        format!("{} list -N -v", self.ndctl)
    }

    pub fn disable_namespace(&self, name: &str) -> String {
        format!("{} disable-namespace {}", self.ndctl, name)
    }

    pub fn destroy_namespace(&self, name: &str) -> String {
        format!("{} destroy-namespace {}", self.ndctl, name)
    }
}

impl Default for ToolCommands {
    fn default() -> Self {
        ScmConfig::default().commands()
    }
}
