//! Domain Ports - Core types and trait definitions for SCM provisioning
//!
//! These traits define the boundaries between the provisioning logic and the
//! host system. Adapters implement them to run real tools; tests implement
//! them to script tool behaviour.

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;

// =============================================================================
// SCM State
// =============================================================================

/// Provisioning state of the SCM subsystem, re-derived on every inspection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScmState {
    Unknown,
    /// No interleaved regions configured
    NoRegions,
    /// Regions exist with unallocated space
    FreeCapacity,
    /// Regions exist and are fully allocated
    NoCapacity,
}

impl std::fmt::Display for ScmState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScmState::Unknown => write!(f, "unknown"),
            ScmState::NoRegions => write!(f, "no regions"),
            ScmState::FreeCapacity => write!(f, "free capacity"),
            ScmState::NoCapacity => write!(f, "no capacity"),
        }
    }
}

// =============================================================================
// SCM Modules
// =============================================================================

/// Raw module record as reported by a discovery binding
#[derive(Debug, Clone, Default)]
pub struct DiscoveredModule {
    pub channel_id: u16,
    pub channel_pos: u16,
    pub memory_controller_id: u16,
    pub socket_id: u16,
    pub physical_id: u16,
    pub capacity: u64,
}

/// A discovered persistent memory module
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScmModule {
    pub channel_id: u32,
    pub channel_position: u32,
    pub controller_id: u32,
    pub socket_id: u32,
    pub physical_id: u32,
    /// Capacity in bytes
    pub capacity: u64,
}

impl From<&DiscoveredModule> for ScmModule {
    fn from(d: &DiscoveredModule) -> Self {
        Self {
            channel_id: d.channel_id.into(),
            channel_position: d.channel_pos.into(),
            controller_id: d.memory_controller_id.into(),
            socket_id: d.socket_id.into(),
            physical_id: d.physical_id.into(),
            capacity: d.capacity,
        }
    }
}

impl std::fmt::Display for ScmModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "PhysicalID:{} Capacity:{} Location:(socket:{} memctrlr:{} chan:{} pos:{})",
            self.physical_id,
            self.capacity,
            self.socket_id,
            self.controller_id,
            self.channel_id,
            self.channel_position
        )
    }
}

// =============================================================================
// SCM Namespaces
// =============================================================================

/// A pmem namespace as emitted by `ndctl`.
///
/// Only `dev` is required; unrecognised keys are carried in `extra` so that
/// newer tool versions round-trip without loss.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScmNamespace {
    /// Namespace device name, e.g. `namespace0.0`
    #[serde(rename = "dev")]
    pub name: String,
    /// Size in bytes
    #[serde(default)]
    pub size: u64,
    /// Block device name, e.g. `pmem0`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blockdev: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub numa_node: Option<u32>,
    /// Remaining fields, passed through opaquely
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Outcome of preparing SCM for use
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PrepOutcome {
    /// Allocation changes only take effect after a reboot
    pub reboot_required: bool,
    pub namespaces: Vec<ScmNamespace>,
}

// =============================================================================
// Provider Request/Response
// =============================================================================

/// Snapshot of SCM hardware and provisioning state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScmScanResponse {
    pub state: ScmState,
    pub modules: Vec<ScmModule>,
    pub namespaces: Vec<ScmNamespace>,
    pub scanned_at: chrono::DateTime<chrono::Utc>,
}

/// Request to prepare (or reset) SCM
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct PrepRequest {
    /// Tear down namespaces and regions instead of creating them
    pub reset: bool,
}

/// Result of a prepare or reset request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrepResponse {
    /// State observed before acting
    pub state: ScmState,
    pub reboot_required: bool,
    pub namespaces: Vec<ScmNamespace>,
}

// =============================================================================
// Host Ports
// =============================================================================

/// Port for running external command lines
pub trait CommandExecutor: Send + Sync {
    /// Run a command line, returning captured stdout on success
    fn run(&self, command: &str) -> Result<String>;
}

/// Port for resolving executables on the search path
pub trait ToolLocator: Send + Sync {
    /// Resolve `tool`, failing with `MissingDependency` when absent
    fn ensure_available(&self, tool: &str) -> Result<PathBuf>;
}

/// Port for the native module discovery binding
pub trait ModuleDiscoverer: Send + Sync {
    fn discover(&self) -> Result<Vec<DiscoveredModule>>;
}

// =============================================================================
// SCM Manager Port
// =============================================================================

/// Port for daemon-level SCM management
#[async_trait]
pub trait ScmManager: Send + Sync {
    /// Inspect modules, state and namespaces
    async fn scan(&self) -> Result<ScmScanResponse>;

    /// Inspect state then prepare or reset accordingly
    async fn prep(&self, request: PrepRequest) -> Result<PrepResponse>;
}

// =============================================================================
// Type Aliases for Arc'd Traits
// =============================================================================

pub type CommandExecutorRef = Arc<dyn CommandExecutor>;
pub type ToolLocatorRef = Arc<dyn ToolLocator>;
pub type ModuleDiscovererRef = Arc<dyn ModuleDiscoverer>;
pub type ScmManagerRef = Arc<dyn ScmManager>;
