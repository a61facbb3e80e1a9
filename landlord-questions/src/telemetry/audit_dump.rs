//! Offline audit of question generation.
//!
//! When `QUESTION_AUDIT_DIR` is set, each synthesis run writes its artifacts
//! to `<dir>/<utc-stamp>/`:
//! - `prompt.txt`: exact generation prompt
//! - `raw.txt`: generator answer as received
//! - `clean.json`: answer after code-fence stripping
//! - `report.json`: accepted/rejected candidates and the fallback reason
//!
//! Dump failures are logged at DEBUG and otherwise ignored.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use ai_llm_service::error_handler::env_opt;
use tracing::debug;

pub const AUDIT_DIR_VAR: &str = "QUESTION_AUDIT_DIR";

/// Audit root shared by every run; inert when no directory is configured.
#[derive(Debug, Clone, Default)]
pub struct AuditTrail {
    root: Option<PathBuf>,
}

impl AuditTrail {
    /// Reads [`AUDIT_DIR_VAR`]; disabled when unset or blank.
    pub fn from_env() -> Self {
        match env_opt(AUDIT_DIR_VAR) {
            Some(root) => Self::under(root),
            None => Self::disabled(),
        }
    }

    pub fn disabled() -> Self {
        Self { root: None }
    }

    /// Runs are dumped below `root`.
    pub fn under(root: impl AsRef<Path>) -> Self {
        Self {
            root: Some(root.as_ref().to_path_buf()),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.root.is_some()
    }

    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    /// Creates a fresh `<root>/<utc-stamp>` directory for one run.
    ///
    /// Runs started within the same millisecond get a `-<n>` suffix. If the
    /// directory cannot be created the run is not audited.
    pub fn start_run(&self) -> AuditRun {
        let Some(root) = &self.root else {
            return AuditRun { dir: None };
        };
        match create_run_dir(root) {
            Ok(dir) => {
                debug!(dir = %dir.display(), "audit run started");
                AuditRun { dir: Some(dir) }
            }
            Err(e) => {
                debug!(root = %root.display(), error = %e, "audit run dir not created");
                AuditRun { dir: None }
            }
        }
    }
}

/// Dump target of a single synthesis run.
#[derive(Debug, Default)]
pub struct AuditRun {
    dir: Option<PathBuf>,
}

impl AuditRun {
    pub fn is_enabled(&self) -> bool {
        self.dir.is_some()
    }

    pub fn dir(&self) -> Option<&Path> {
        self.dir.as_deref()
    }

    /// Writes `data` to `<run dir>/<name>`.
    pub fn dump(&self, name: &str, data: &[u8]) {
        let Some(dir) = &self.dir else {
            return;
        };
        if let Err(e) = fs::write(dir.join(name), data) {
            debug!(dir = %dir.display(), name, error = %e, "audit dump failed");
        } else {
            debug!(dir = %dir.display(), name, bytes = data.len(), "audit dump written");
        }
    }
}

fn create_run_dir(root: &Path) -> io::Result<PathBuf> {
    fs::create_dir_all(root)?;
    let stamp = chrono::Utc::now().format("%Y%m%dT%H%M%S%.3fZ").to_string();
    let mut dir = root.join(&stamp);
    let mut n = 1;
    loop {
        match fs::create_dir(&dir) {
            Ok(()) => return Ok(dir),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                dir = root.join(format!("{stamp}-{n}"));
                n += 1;
            }
            Err(e) => return Err(e),
        }
    }
}
