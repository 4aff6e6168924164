//! Error types for the SCM provisioner
//!
//! Provides structured error types for command execution, tool lookup,
//! output parsing and the provisioning state machine.

use thiserror::Error;

/// Unified error type for SCM provisioning
#[derive(Error, Debug)]
pub enum Error {
    // =========================================================================
    // Internal Errors
    // =========================================================================
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    // =========================================================================
    // External Tool Errors
    // =========================================================================
    #[error("Missing dependency: {tool} not found in PATH, please install it")]
    MissingDependency { tool: String },

    #[error("Command `{command}` failed: {detail}: stdout: {stdout}")]
    CommandExecution {
        command: String,
        stdout: String,
        detail: String,
    },

    #[error("Failed to parse {what}: {reason} (output: {text:?})")]
    Parse {
        what: String,
        reason: String,
        text: String,
    },

    // =========================================================================
    // State Machine Errors
    // =========================================================================
    #[error("Unknown SCM state")]
    UnknownState,

    #[error("Protocol violation: {0}")]
    ProtocolViolation(String),

    #[error("SCM module discovery failed: {0}")]
    Discovery(String),

    /// Wraps an inner error with the name of the step it occurred in
    #[error("{operation}: {source}")]
    Context {
        operation: String,
        #[source]
        source: Box<Error>,
    },

    // =========================================================================
    // IO / Decode Errors
    // =========================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl Error {
    /// Innermost error, looking through any operation context
    pub fn root(&self) -> &Error {
        match self {
            Error::Context { source, .. } => source.root(),
            other => other,
        }
    }

    /// Whether a required external tool is absent
    pub fn is_missing_dependency(&self) -> bool {
        matches!(self.root(), Error::MissingDependency { .. })
    }

    /// Whether re-invoking the failed operation may succeed.
    ///
    /// Every operation re-derives state from the host, so re-running after a
    /// command failure is safe. Missing tools, unparseable output and an
    /// unknown state will not change by trying again.
    pub fn is_retryable(&self) -> bool {
        match self.root() {
            Error::CommandExecution { .. }
            | Error::ProtocolViolation(_)
            | Error::Io(_)
            | Error::Internal(_) => true,

            Error::MissingDependency { .. }
            | Error::Parse { .. }
            | Error::UnknownState
            | Error::Discovery(_)
            | Error::Configuration(_)
            | Error::Yaml(_) => false,

            Error::Context { .. } => unreachable!("root() never returns a context"),
        }
    }
}

/// Attach the name of the failing step to an error
pub trait ResultExt<T> {
    fn context(self, operation: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, operation: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::Context {
            operation: operation.into(),
            source: Box::new(e),
        })
    }
}

/// Result type alias for the provisioner
pub type Result<T> = std::result::Result<T, Error>;
