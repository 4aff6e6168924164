//! SCM Provisioner - Persistent Memory Provisioning
//!
//! Discovers storage-class memory modules, determines their region and
//! namespace state, and drives them toward AppDirect regions hosting pmem
//! namespaces (or back to memory mode) using `ipmctl` and `ndctl`.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                 ScmProvider (async, serialized)           │
//! ├──────────────────────────────────────────────────────────┤
//! │                ScmProvisioner (prep / reset)              │
//! │   ┌──────────────────────┐   ┌────────────────────────┐  │
//! │   │   RegionInspector    │   │   NamespaceManager     │  │
//! │   │   (ipmctl regions)   │   │   (ndctl namespaces)   │  │
//! │   └──────────┬───────────┘   └───────────┬────────────┘  │
//! ├──────────────┴───────────────────────────┴───────────────┤
//! │        CommandExecutor  ·  ToolLocator  ·  Discoverer     │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! No state is cached: every operation re-derives the SCM state from the
//! host, so any operation can be re-run after a partial failure.
//!
//! # Modules
//!
//! - [`scm`]: Provisioning logic and host adapters
//! - [`domain`]: Core domain types and traits
//! - [`error`]: Error types and handling

pub mod domain;
pub mod error;
pub mod scm;

// Re-export commonly used types
pub use domain::ports::{
    CommandExecutor, DiscoveredModule, ModuleDiscoverer, PrepOutcome, PrepRequest, PrepResponse,
    ScmManager, ScmModule, ScmNamespace, ScmScanResponse, ScmState, ToolLocator,
};

pub use error::{Error, Result, ResultExt};

pub use scm::{
    has_free_capacity, parse_namespaces, NamespaceManager, RegionInspector, ScmConfig,
    ScmProvider, ScmProvisioner, ShellExecutor, SystemToolLocator, ToolCommands,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
