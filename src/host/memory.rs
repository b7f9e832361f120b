//! In-memory host for testing.
//!
//! `MemoryHost` implements every host trait against plain collections
//! and records each mutation for later assertion. Individual primitives
//! can be made to fail.
//!
//! # Example
//!
//! ```
//! use hostcheck::host::{MemoryHost, PrivilegedFs, ServiceManager, ServiceState};
//! use std::path::Path;
//!
//! let host = MemoryHost::new()
//!     .with_service("NetworkManager.service", ServiceState::Running)
//!     .with_file("/etc/hosts", b"127.0.0.1 localhost\n", 0o644);
//!
//! assert!(host.file_content_equals(Path::new("/etc/hosts"), b"127.0.0.1 localhost\n").is_ok());
//! assert_eq!(host.status("NetworkManager.service").unwrap(), ServiceState::Running);
//! assert!(host.mutations().is_empty());
//! ```

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::{Path, PathBuf};

use crate::error::{HostcheckError, Result};

use super::{PrivilegedFs, ServiceManager, ServiceState, ToolLocator};

/// A host-changing operation performed through a [`MemoryHost`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    /// A file was written.
    Write { path: PathBuf, mode: u32 },
    /// A file was removed.
    Remove { path: PathBuf },
    /// A unit was reloaded.
    Reload { unit: String },
}

#[derive(Debug, Clone)]
struct MemoryFile {
    content: Vec<u8>,
    mode: u32,
}

/// Host that lives entirely in memory.
#[derive(Debug, Default)]
pub struct MemoryHost {
    files: RefCell<BTreeMap<PathBuf, MemoryFile>>,
    services: RefCell<HashMap<String, ServiceState>>,
    tools: HashMap<String, PathBuf>,
    mutations: RefCell<Vec<Mutation>>,
    fail_writes: Cell<bool>,
    fail_removes: Cell<bool>,
    failing_reloads: RefCell<HashSet<String>>,
    failing_queries: HashSet<String>,
}

impl MemoryHost {
    /// Empty host: no files, no units, nothing on PATH.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file.
    pub fn with_file(self, path: impl Into<PathBuf>, content: &[u8], mode: u32) -> Self {
        self.files.borrow_mut().insert(
            path.into(),
            MemoryFile {
                content: content.to_vec(),
                mode,
            },
        );
        self
    }

    /// Add a unit in the given state.
    pub fn with_service(self, unit: &str, state: ServiceState) -> Self {
        self.services.borrow_mut().insert(unit.to_string(), state);
        self
    }

    /// Put a tool on the search path under `/usr/bin`.
    pub fn with_tool(mut self, tool: &str) -> Self {
        self.tools
            .insert(tool.to_string(), Path::new("/usr/bin").join(tool));
        self
    }

    /// Make every privileged write fail.
    pub fn failing_writes(self) -> Self {
        self.fail_writes.set(true);
        self
    }

    /// Make every privileged removal fail.
    pub fn failing_removes(self) -> Self {
        self.fail_removes.set(true);
        self
    }

    /// Make reloads of `unit` fail.
    pub fn failing_reload(self, unit: &str) -> Self {
        self.failing_reloads.borrow_mut().insert(unit.to_string());
        self
    }

    /// Make status queries for `unit` fail.
    pub fn failing_status(mut self, unit: &str) -> Self {
        self.failing_queries.insert(unit.to_string());
        self
    }

    /// Let reloads of `unit` succeed again.
    pub fn restore_reload(&self, unit: &str) {
        self.failing_reloads.borrow_mut().remove(unit);
    }

    /// Change a unit's state after construction.
    pub fn set_service(&self, unit: &str, state: ServiceState) {
        self.services.borrow_mut().insert(unit.to_string(), state);
    }

    /// Content of `path`, if present.
    pub fn file(&self, path: impl AsRef<Path>) -> Option<Vec<u8>> {
        self.files
            .borrow()
            .get(path.as_ref())
            .map(|f| f.content.clone())
    }

    /// Permission mode of `path`, if present.
    pub fn file_mode(&self, path: impl AsRef<Path>) -> Option<u32> {
        self.files.borrow().get(path.as_ref()).map(|f| f.mode)
    }

    /// Every mutation performed so far, in order.
    pub fn mutations(&self) -> Vec<Mutation> {
        self.mutations.borrow().clone()
    }

    /// Units reloaded so far, in order.
    pub fn reloads(&self) -> Vec<String> {
        self.mutations
            .borrow()
            .iter()
            .filter_map(|m| match m {
                Mutation::Reload { unit } => Some(unit.clone()),
                _ => None,
            })
            .collect()
    }

    /// Forget recorded mutations.
    pub fn clear_mutations(&self) {
        self.mutations.borrow_mut().clear();
    }
}

impl PrivilegedFs for MemoryHost {
    fn write_file_as_privileged(
        &self,
        description: &str,
        content: &[u8],
        path: &Path,
        mode: u32,
    ) -> Result<()> {
        if self.fail_writes.get() {
            return Err(HostcheckError::PrivilegedWrite {
                path: path.to_path_buf(),
                message: format!("permission denied ({})", description),
            });
        }
        self.files.borrow_mut().insert(
            path.to_path_buf(),
            MemoryFile {
                content: content.to_vec(),
                mode,
            },
        );
        self.mutations.borrow_mut().push(Mutation::Write {
            path: path.to_path_buf(),
            mode,
        });
        Ok(())
    }

    fn remove_file_as_privileged(&self, description: &str, path: &Path) -> Result<()> {
        if self.fail_removes.get() {
            return Err(HostcheckError::PrivilegedRemove {
                path: path.to_path_buf(),
                message: format!("permission denied ({})", description),
            });
        }
        if self.files.borrow_mut().remove(path).is_some() {
            self.mutations.borrow_mut().push(Mutation::Remove {
                path: path.to_path_buf(),
            });
        }
        Ok(())
    }

    fn file_content_equals(&self, path: &Path, expected: &[u8]) -> Result<()> {
        match self.files.borrow().get(path) {
            None => Err(HostcheckError::FileAbsent {
                path: path.to_path_buf(),
            }),
            Some(file) if file.content != expected => Err(HostcheckError::FileContentDiffers {
                path: path.to_path_buf(),
            }),
            Some(_) => Ok(()),
        }
    }

    fn file_exists(&self, path: &Path) -> bool {
        self.files.borrow().contains_key(path)
    }
}

impl ServiceManager for MemoryHost {
    fn status(&self, unit: &str) -> Result<ServiceState> {
        if self.failing_queries.contains(unit) {
            return Err(HostcheckError::ServiceQuery {
                unit: unit.to_string(),
                message: "Failed to connect to bus".to_string(),
            });
        }
        Ok(self
            .services
            .borrow()
            .get(unit)
            .copied()
            .unwrap_or(ServiceState::NotFound))
    }

    fn reload(&self, unit: &str) -> Result<()> {
        if self.failing_reloads.borrow().contains(unit) {
            return Err(HostcheckError::ServiceReload {
                unit: unit.to_string(),
                message: format!("Job for {}.service failed", unit),
            });
        }
        self.mutations.borrow_mut().push(Mutation::Reload {
            unit: unit.to_string(),
        });
        Ok(())
    }
}

impl ToolLocator for MemoryHost {
    fn look_path(&self, tool: &str) -> Result<PathBuf> {
        self.tools
            .get(tool)
            .cloned()
            .ok_or_else(|| HostcheckError::ToolNotFound {
                tool: tool.to_string(),
            })
    }
}
