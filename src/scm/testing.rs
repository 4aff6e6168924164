//! Scripted host ports for unit tests

use crate::domain::ports::{CommandExecutor, DiscoveredModule, ModuleDiscoverer, ToolLocator};
use crate::error::{Error, Result};
use std::collections::{HashSet, VecDeque};
use std::path::PathBuf;
use std::sync::Mutex;

pub const NO_REGIONS: &str = "\nThere are no Regions defined in the system.\n";

pub const REGIONS_FREE: &str = "\n---ISetID=0x2aba7f4828ef2ccc---\n   PersistentMemoryType=AppDirect\n   FreeCapacity=3012.0 GiB\n---ISetID=0x81187f4881f02ccc---\n   PersistentMemoryType=AppDirect\n   FreeCapacity=3012.0 GiB\n\n";

pub const REGIONS_FULL: &str = "\n---ISetID=0x2aba7f4828ef2ccc---\n   PersistentMemoryType=AppDirect\n   FreeCapacity=0.0 GiB\n---ISetID=0x81187f4881f02ccc---\n   PersistentMemoryType=AppDirect\n   FreeCapacity=0.0 GiB\n\n";

pub fn ns_json(name: &str, blockdev: &str, numa: u32) -> String {
    format!(
        r#"{{"dev":"{}","mode":"fsdax","map":"dev","size":3183575302144,"uuid":"842fc847-28e0-4bb6-8dfc-d24afdba1528","blockdev":"{}","numa_node":{}}}"#,
        name, blockdev, numa
    )
}

pub fn cmd_failure(command: &str) -> Error {
    Error::CommandExecution {
        command: command.to_string(),
        stdout: "some output".to_string(),
        detail: "exit status: 1; stderr: failed".to_string(),
    }
}

/// Executor that replays a fixed script of expected commands
#[derive(Default)]
pub struct ScriptedExecutor {
    script: Mutex<VecDeque<(String, Result<String>)>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn expect(self, command: &str, response: Result<String>) -> Self {
        self.script
            .lock()
            .unwrap()
            .push_back((command.to_string(), response));
        self
    }

    pub fn ok(self, command: &str, stdout: &str) -> Self {
        self.expect(command, Ok(stdout.to_string()))
    }

    pub fn fail(self, command: &str) -> Self {
        self.expect(command, Err(cmd_failure(command)))
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn remaining(&self) -> usize {
        self.script.lock().unwrap().len()
    }
}

impl CommandExecutor for ScriptedExecutor {
    fn run(&self, command: &str) -> Result<String> {
        self.calls.lock().unwrap().push(command.to_string());

        let (expected, response) = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("unexpected command `{}`", command));
        assert_eq!(command, expected, "commands ran out of order");

        response
    }
}

/// Locator that knows a fixed set of tools
pub struct FakeLocator {
    available: HashSet<String>,
}

impl FakeLocator {
    pub fn with(tools: &[&str]) -> Self {
        Self {
            available: tools.iter().map(|t| t.to_string()).collect(),
        }
    }

    pub fn all() -> Self {
        Self::with(&["ipmctl", "ndctl"])
    }
}

impl ToolLocator for FakeLocator {
    fn ensure_available(&self, tool: &str) -> Result<PathBuf> {
        if self.available.contains(tool) {
            Ok(PathBuf::from("/usr/bin").join(tool))
        } else {
            Err(Error::MissingDependency {
                tool: tool.to_string(),
            })
        }
    }
}

/// Discovery binding returning fixed records
pub struct FakeDiscoverer(pub Vec<DiscoveredModule>);

impl ModuleDiscoverer for FakeDiscoverer {
    fn discover(&self) -> Result<Vec<DiscoveredModule>> {
        Ok(self.0.clone())
    }
}
