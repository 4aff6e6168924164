//! Region State Inspection
//!
//! Classifies the SCM subsystem from `ipmctl` region listings:
//!
//! ```text
//! $ ipmctl show -d PersistentMemoryType,FreeCapacity -region
//!
//! ---ISetID=0x2aba7f4828ef2ccc---
//!    PersistentMemoryType=AppDirect
//!    FreeCapacity=3012.0 GiB
//! ---ISetID=0x81187f4881f02ccc---
//!    PersistentMemoryType=AppDirect
//!    FreeCapacity=3012.0 GiB
//! ```

use crate::domain::ports::{CommandExecutorRef, ScmState, ToolLocatorRef};
use crate::error::{Error, Result};
use crate::scm::config::ToolCommands;
use tracing::debug;

// =============================================================================
// Constants
// =============================================================================

/// Exact `ipmctl` output when no regions exist
pub const NO_REGIONS_OUTPUT: &str = "\nThere are no Regions defined in the system.\n";

const MIN_REGION_LINES: usize = 4;
const KEY_MEMORY_TYPE: &str = "PersistentMemoryType";
const KEY_FREE_CAPACITY: &str = "FreeCapacity";
const APP_DIRECT: &str = "AppDirect";
const ZERO_CAPACITY: &str = "0.0 GiB";

// =============================================================================
// Region Scanner
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Seeking,
    /// Saw `PersistentMemoryType=AppDirect`, waiting for its free capacity
    InAppDirectRegion,
}

/// Whether any AppDirect region in `text` reports non-zero free capacity.
///
/// Returns on the first AppDirect region with free space; later regions are
/// not examined.
pub fn has_free_capacity(text: &str) -> Result<bool> {
    let line_count = text.split('\n').count();
    if line_count < MIN_REGION_LINES {
        return Err(Error::Parse {
            what: "region listing".into(),
            reason: format!(
                "expecting at least {} lines, got {}",
                MIN_REGION_LINES, line_count
            ),
            text: text.to_string(),
        });
    }

    let mut state = ScanState::Seeking;

    for line in text.split('\n') {
        let parts: Vec<&str> = line.trim().split('=').collect();
        let &[key, value] = parts.as_slice() else {
            continue;
        };

        if key == KEY_MEMORY_TYPE && value == APP_DIRECT {
            state = ScanState::InAppDirectRegion;
            continue;
        }

        if key != KEY_FREE_CAPACITY {
            continue;
        }

        if state == ScanState::InAppDirectRegion && value != ZERO_CAPACITY {
            return Ok(true);
        }

        state = ScanState::Seeking;
    }

    Ok(false)
}

// =============================================================================
// Region Inspector
// =============================================================================

/// Derives the current [`ScmState`] from the host on every call
pub struct RegionInspector {
    executor: CommandExecutorRef,
    locator: ToolLocatorRef,
    commands: ToolCommands,
}

impl RegionInspector {
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

    /// Establish the state of SCM regions on the local server
    pub fn get_state(&self) -> Result<ScmState> {
        self.locator.ensure_available(self.commands.ndctl())?;
        self.locator.ensure_available(self.commands.ipmctl())?;

        let out = self.executor.run(&self.commands.show_regions())?;
        debug!("show region output: {}", out);

        if out == NO_REGIONS_OUTPUT {
            return Ok(ScmState::NoRegions);
        }

        if has_free_capacity(&out)? {
            Ok(ScmState::FreeCapacity)
        } else {
            Ok(ScmState::NoCapacity)
        }
    }
}
