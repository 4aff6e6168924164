//! SCM Provisioning State Machine
//!
//! Drives SCM modules toward AppDirect interleaved regions hosting pmem
//! namespaces, or back to memory mode. The caller passes in the state it
//! observed; nothing is cached between calls, so any step can be re-run from
//! scratch after a partial failure.
//!
//! | State         | `prep`                                   | `prep_reset`                  |
//! |---------------|------------------------------------------|-------------------------------|
//! | NoRegions     | create regions goal (reboot required)    | no-op                         |
//! | FreeCapacity  | create namespaces until capacity is used | remove namespaces and regions |
//! | NoCapacity    | return existing namespaces               | remove namespaces and regions |
//! | Unknown       | error                                    | error                         |

use crate::domain::ports::{
    CommandExecutorRef, ModuleDiscovererRef, PrepOutcome, ScmModule, ScmNamespace, ScmState,
    ToolLocatorRef,
};
use crate::error::{Error, Result, ResultExt};
use crate::scm::command::{ShellExecutor, SystemToolLocator};
use crate::scm::config::{ScmConfig, ToolCommands};
use crate::scm::namespace::NamespaceManager;
use crate::scm::region::RegionInspector;
use std::sync::Arc;
use tracing::{debug, error, info};

/// Provisions SCM regions and namespaces using `ipmctl` and `ndctl`
pub struct ScmProvisioner {
    executor: CommandExecutorRef,
    locator: ToolLocatorRef,
    commands: ToolCommands,
    regions: RegionInspector,
    namespaces: NamespaceManager,
    discoverer: Option<ModuleDiscovererRef>,
}

impl ScmProvisioner {
    /// Create a provisioner over the given host ports
    pub fn new(
        executor: CommandExecutorRef,
        locator: ToolLocatorRef,
        commands: ToolCommands,
    ) -> Self {
        Self {
            regions: RegionInspector::new(executor.clone(), locator.clone(), commands.clone()),
            namespaces: NamespaceManager::new(executor.clone(), locator.clone(), commands.clone()),
            executor,
            locator,
            commands,
            discoverer: None,
        }
    }

    /// Create a provisioner running real tools as configured
    pub fn from_config(config: &ScmConfig) -> Self {
        Self::new(
            Arc::new(ShellExecutor::new(config.shell.clone())),
            Arc::new(SystemToolLocator),
            config.commands(),
        )
    }

    /// Attach a native module discovery binding
    pub fn with_discoverer(mut self, discoverer: ModuleDiscovererRef) -> Self {
        self.discoverer = Some(discoverer);
        self
    }

    pub fn has_discoverer(&self) -> bool {
        self.discoverer.is_some()
    }

    /// Enumerate installed SCM modules through the discovery binding
    pub fn discover(&self) -> Result<Vec<ScmModule>> {
        let discoverer = self.discoverer.as_ref().ok_or_else(|| {
            Error::Discovery("no module discovery binding configured".into())
        })?;

        let discovered = discoverer
            .discover()
            .context("failed to discover SCM modules")?;
        debug!("discovered {} SCM modules", discovered.len());

        Ok(discovered.iter().map(ScmModule::from).collect())
    }

    /// Establish the current state of SCM regions
    pub fn get_state(&self) -> Result<ScmState> {
        self.regions.get_state()
    }

    /// List existing pmem namespaces
    pub fn get_namespaces(&self) -> Result<Vec<ScmNamespace>> {
        self.namespaces.list_namespaces()
    }

    /// Configure SCM into AppDirect regions hosting pmem namespaces.
    ///
    /// Region creation only takes effect after a reboot, in which case no
    /// namespaces are returned.
    pub fn prep(&self, state: ScmState) -> Result<PrepOutcome> {
        debug!("scm in state {}", state);

        match state {
            ScmState::Unknown => Err(Error::UnknownState),
            ScmState::NoRegions => {
                self.ensure_ndctl()?;
                self.ensure_ipmctl()?;
                // clear any pre-existing goals first
                self.executor
                    .run(&self.commands.delete_goal())
                    .context("clear goal")?;
                self.executor
                    .run(&self.commands.create_regions())
                    .context("create regions")?;

                info!("SCM region goal created, reboot required");
                Ok(PrepOutcome {
                    reboot_required: true,
                    namespaces: Vec::new(),
                })
            }
            ScmState::FreeCapacity => Ok(PrepOutcome {
                reboot_required: false,
                namespaces: self.create_namespaces()?,
            }),
            ScmState::NoCapacity => Ok(PrepOutcome {
                reboot_required: false,
                namespaces: self.get_namespaces().context("list namespaces")?,
            }),
        }
    }

    /// Remove namespaces and regions, returning whether a reboot is required.
    ///
    /// Stops at the first namespace that fails to be removed; re-running
    /// continues from whatever namespaces remain.
    pub fn prep_reset(&self, state: ScmState) -> Result<bool> {
        debug!("scm in state {}", state);

        match state {
            ScmState::Unknown => return Err(Error::UnknownState),
            ScmState::NoRegions => {
                self.ensure_ndctl()?;
                info!("SCM is already reset");
                return Ok(false);
            }
            ScmState::FreeCapacity | ScmState::NoCapacity => {}
        }

        let namespaces = self.get_namespaces().context("list namespaces")?;
        for ns in &namespaces {
            self.namespaces
                .remove_namespace(&ns.name)
                .context(format!("remove namespace {}", ns.name))?;
        }

        self.ensure_ipmctl()?;
        info!("resetting SCM memory allocations");
        self.executor
            .run(&self.commands.delete_goal())
            .context("clear goal")?;

        if let Err(e) = self.executor.run(&self.commands.remove_regions()) {
            if let Error::CommandExecution { stdout, .. } = &e {
                error!("{}", stdout);
            }
            return Err::<bool, _>(e).context("remove regions");
        }

        // memory allocation reset requires a reboot
        Ok(true)
    }

    /// Create namespaces until no free capacity remains
    fn create_namespaces(&self) -> Result<Vec<ScmNamespace>> {
        let mut created = Vec::new();

        loop {
            let batch = self
                .namespaces
                .create_namespace_batch()
                .context("create namespace cmd")?;
            created.extend(batch);

            match self.get_state().context("getting state")? {
                ScmState::NoCapacity => return Ok(created),
                ScmState::FreeCapacity => {}
                other => {
                    return Err(Error::ProtocolViolation(format!(
                        "unexpected state after namespace creation: want {}, got {}",
                        ScmState::FreeCapacity,
                        other
                    )))
                }
            }
        }
    }

    fn ensure_ndctl(&self) -> Result<()> {
        self.locator
            .ensure_available(self.commands.ndctl())
            .context("check ndctl")?;
        Ok(())
    }

    fn ensure_ipmctl(&self) -> Result<()> {
        self.locator
            .ensure_available(self.commands.ipmctl())
            .context("check ipmctl")?;
        Ok(())
    }
}
