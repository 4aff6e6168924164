//! SCM Provider
//!
//! Daemon-facing entry point. The host's SCM subsystem is a shared resource
//! with no locking of its own, so every operation holds a single mutex for
//! its full duration. Blocking tool invocations run on the blocking pool and
//! own the lock guard, so a caller dropping its future (e.g. on a timeout)
//! does not release the lock while tools are still running.

use crate::domain::ports::{
    PrepRequest, PrepResponse, ScmManager, ScmNamespace, ScmScanResponse, ScmState,
};
use crate::error::{Error, Result, ResultExt};
use crate::scm::config::ScmConfig;
use crate::scm::provisioner::ScmProvisioner;
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

/// Serialized async access to an [`ScmProvisioner`]
pub struct ScmProvider {
    provisioner: Arc<ScmProvisioner>,
    lock: Arc<Mutex<()>>,
}

impl ScmProvider {
    pub fn new(provisioner: ScmProvisioner) -> Self {
        Self {
            provisioner: Arc::new(provisioner),
            lock: Arc::new(Mutex::new(())),
        }
    }

    /// Provider running real tools as configured
    pub fn from_config(config: &ScmConfig) -> Self {
        Self::new(ScmProvisioner::from_config(config))
    }

    /// Inspect the current state only
    pub async fn state(&self) -> Result<ScmState> {
        self.run_exclusive(|p| p.get_state()).await
    }

    /// List existing namespaces
    pub async fn namespaces(&self) -> Result<Vec<ScmNamespace>> {
        self.run_exclusive(|p| p.get_namespaces()).await
    }

    /// Run `f` against the provisioner while holding the lock
    async fn run_exclusive<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&ScmProvisioner) -> Result<T> + Send + 'static,
    {
        let guard = self.lock.clone().lock_owned().await;
        let provisioner = self.provisioner.clone();

        tokio::task::spawn_blocking(move || {
            let _guard = guard;
            f(&provisioner)
        })
        .await
        .map_err(|e| Error::Internal(format!("SCM task failed: {}", e)))?
    }
}

#[async_trait]
impl ScmManager for ScmProvider {
    async fn scan(&self) -> Result<ScmScanResponse> {
        self.run_exclusive(|p| {
            let modules = if p.has_discoverer() {
                p.discover()?
            } else {
                Vec::new()
            };

            let state = p.get_state().context("scan state")?;
            let namespaces = match state {
                ScmState::NoRegions => Vec::new(),
                _ => p.get_namespaces().context("scan namespaces")?,
            };

            Ok(ScmScanResponse {
                state,
                modules,
                namespaces,
                scanned_at: Utc::now(),
            })
        })
        .await
    }

    async fn prep(&self, request: PrepRequest) -> Result<PrepResponse> {
        self.run_exclusive(move |p| {
            let state = p.get_state().context("get state")?;

            if request.reset {
                let reboot_required = p.prep_reset(state).context("prep reset")?;
                Ok(PrepResponse {
                    state,
                    reboot_required,
                    namespaces: Vec::new(),
                })
            } else {
                let outcome = p.prep(state).context("prep")?;
                Ok(PrepResponse {
                    state,
                    reboot_required: outcome.reboot_required,
                    namespaces: outcome.namespaces,
                })
            }
        })
        .await
        .map(|resp| {
            if resp.reboot_required {
                warn!("SCM allocation changed, reboot required to take effect");
            } else {
                info!("SCM prep complete in state {}", resp.state);
            }
            resp
        })
    }
}
