//! The real host.
//!
//! File writes and removals go through `install` and `rm` run as root
//! (via `sudo` unless already root); reads and PATH lookups run as the
//! invoking user.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::error::{HostcheckError, Result};
use crate::shell::execute_privileged;

use super::systemd::SystemdServiceManager;
use super::{PrivilegedFs, ServiceManager, ServiceState, ToolLocator};

/// Host implementation backed by the running system.
#[derive(Debug, Clone)]
pub struct SystemHost {
    services: SystemdServiceManager,
    path_entries: Vec<PathBuf>,
}

impl SystemHost {
    /// Host using the process `PATH` and the system service manager.
    pub fn new() -> Self {
        Self {
            services: SystemdServiceManager::new(),
            path_entries: parse_system_path(),
        }
    }

    /// Host resolving tools against an explicit search path.
    pub fn with_path(path_entries: Vec<PathBuf>) -> Self {
        Self {
            services: SystemdServiceManager::new(),
            path_entries,
        }
    }
}

impl Default for SystemHost {
    fn default() -> Self {
        Self::new()
    }
}

impl PrivilegedFs for SystemHost {
    fn write_file_as_privileged(
        &self,
        description: &str,
        content: &[u8],
        path: &Path,
        mode: u32,
    ) -> Result<()> {
        let write_err = |message: String| HostcheckError::PrivilegedWrite {
            path: path.to_path_buf(),
            message,
        };

        // Staged as the invoking user, then copied into place by root.
        let mut staged = tempfile::NamedTempFile::new().map_err(|e| write_err(e.to_string()))?;
        staged
            .write_all(content)
            .and_then(|_| staged.flush())
            .map_err(|e| write_err(e.to_string()))?;

        let mode = format!("{:04o}", mode);
        let staged_path = staged.path().to_string_lossy().to_string();
        let target = path.to_string_lossy().to_string();

        execute_privileged(
            description,
            "install",
            &["-D", "-m", &mode, &staged_path, &target],
        )
        .map_err(|e| write_err(e.to_string()))?;

        tracing::debug!("Wrote {} ({} bytes, mode {})", path.display(), content.len(), mode);
        Ok(())
    }

    fn remove_file_as_privileged(&self, description: &str, path: &Path) -> Result<()> {
        if !self.file_exists(path) {
            return Ok(());
        }
        let target = path.to_string_lossy().to_string();
        execute_privileged(description, "rm", &["-f", &target]).map_err(|e| {
            HostcheckError::PrivilegedRemove {
                path: path.to_path_buf(),
                message: e.to_string(),
            }
        })?;
        Ok(())
    }

    fn file_content_equals(&self, path: &Path, expected: &[u8]) -> Result<()> {
        let actual = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(HostcheckError::FileAbsent {
                    path: path.to_path_buf(),
                });
            }
            Err(e) => {
                return Err(HostcheckError::Other(
                    anyhow::Error::new(e).context(format!("Failed to read {}", path.display())),
                ));
            }
        };

        if actual == expected {
            Ok(())
        } else {
            Err(HostcheckError::FileContentDiffers {
                path: path.to_path_buf(),
            })
        }
    }

    fn file_exists(&self, path: &Path) -> bool {
        path.symlink_metadata().is_ok()
    }
}

impl ServiceManager for SystemHost {
    fn status(&self, unit: &str) -> Result<ServiceState> {
        self.services.status(unit)
    }

    fn reload(&self, unit: &str) -> Result<()> {
        self.services.reload(unit)
    }
}

impl ToolLocator for SystemHost {
    fn look_path(&self, tool: &str) -> Result<PathBuf> {
        resolve_tool_path(tool, &self.path_entries).ok_or_else(|| HostcheckError::ToolNotFound {
            tool: tool.to_string(),
        })
    }
}

/// Check whether a file has executable permission bits set.
#[cfg(unix)]
pub fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
pub fn is_executable(_path: &Path) -> bool {
    true
}

/// Resolve a tool's binary path by iterating over PATH entries.
///
/// Returns the first match that is a regular, executable file. Does NOT
/// shell out to `which`, whose behavior varies across systems.
pub fn resolve_tool_path(tool: &str, path_entries: &[PathBuf]) -> Option<PathBuf> {
    for dir in path_entries {
        let candidate = dir.join(tool);
        if candidate.is_file() && is_executable(&candidate) {
            return Some(candidate);
        }
    }
    None
}

/// Parse the system PATH environment variable into a list of directories.
pub fn parse_system_path() -> Vec<PathBuf> {
    std::env::var_os("PATH")
        .map(|path| std::env::split_paths(&path).collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    /// Create a fake binary at a path (creates parent dirs as needed).
    fn create_fake_binary(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, "#!/bin/sh\n").unwrap();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
        }
    }

    #[test]
    fn content_equals_reports_absent_file() {
        let temp = TempDir::new().unwrap();
        let host = SystemHost::with_path(vec![]);
        let path = temp.path().join("crc.conf");

        let err = host.file_content_equals(&path, b"x").unwrap_err();
        assert!(matches!(err, HostcheckError::FileAbsent { .. }));
        assert!(err.to_string().contains("crc.conf"));
    }

    #[test]
    fn content_equals_reports_differing_file() {
        let temp = TempDir::new().unwrap();
        let host = SystemHost::with_path(vec![]);
        let path = temp.path().join("crc.conf");
        fs::write(&path, "server=/old/1.2.3.4\n").unwrap();

        let err = host
            .file_content_equals(&path, b"server=/new/1.2.3.4\n")
            .unwrap_err();
        assert!(matches!(err, HostcheckError::FileContentDiffers { .. }));
    }

    #[test]
    fn content_equals_accepts_exact_bytes() {
        let temp = TempDir::new().unwrap();
        let host = SystemHost::with_path(vec![]);
        let path = temp.path().join("crc.conf");
        fs::write(&path, "[main]\ndns=dnsmasq\n").unwrap();

        host.file_content_equals(&path, b"[main]\ndns=dnsmasq\n")
            .unwrap();
    }

    #[test]
    fn content_equals_is_sensitive_to_trailing_newline() {
        let temp = TempDir::new().unwrap();
        let host = SystemHost::with_path(vec![]);
        let path = temp.path().join("crc.conf");
        fs::write(&path, "[main]\ndns=dnsmasq").unwrap();

        assert!(host
            .file_content_equals(&path, b"[main]\ndns=dnsmasq\n")
            .is_err());
    }

    #[test]
    fn remove_absent_file_is_ok_without_escalating() {
        let temp = TempDir::new().unwrap();
        let host = SystemHost::with_path(vec![]);

        host.remove_file_as_privileged("test", &temp.path().join("missing"))
            .unwrap();
    }

    #[test]
    fn look_path_finds_tool() {
        let temp = TempDir::new().unwrap();
        create_fake_binary(&temp.path().join("bin").join("nmcli"));
        let host = SystemHost::with_path(vec![temp.path().join("bin")]);

        let path = host.look_path("nmcli").unwrap();
        assert_eq!(path, temp.path().join("bin").join("nmcli"));
    }

    #[test]
    fn look_path_reports_missing_tool() {
        let temp = TempDir::new().unwrap();
        let host = SystemHost::with_path(vec![temp.path().to_path_buf()]);

        let err = host.look_path("nmcli").unwrap_err();
        assert!(matches!(err, HostcheckError::ToolNotFound { ref tool } if tool == "nmcli"));
    }

    #[test]
    fn resolve_tool_path_finds_first_match() {
        let temp = TempDir::new().unwrap();
        let dir_a = temp.path().join("a");
        let dir_b = temp.path().join("b");
        create_fake_binary(&dir_a.join("nmcli"));
        create_fake_binary(&dir_b.join("nmcli"));

        let result = resolve_tool_path("nmcli", &[dir_a.clone(), dir_b.clone()]);
        assert_eq!(result, Some(dir_a.join("nmcli")));
    }

    #[cfg(unix)]
    #[test]
    fn resolve_tool_path_skips_non_executable() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let dir_a = temp.path().join("a");
        let dir_b = temp.path().join("b");
        fs::create_dir_all(&dir_a).unwrap();
        fs::write(dir_a.join("nmcli"), "not executable").unwrap();
        fs::set_permissions(dir_a.join("nmcli"), fs::Permissions::from_mode(0o644)).unwrap();
        create_fake_binary(&dir_b.join("nmcli"));

        let result = resolve_tool_path("nmcli", &[dir_a.clone(), dir_b.clone()]);
        assert_eq!(result, Some(dir_b.join("nmcli")));
    }

    #[test]
    fn resolve_tool_path_skips_directories() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("nmcli")).unwrap();

        assert!(resolve_tool_path("nmcli", &[temp.path().to_path_buf()]).is_none());
    }
}
