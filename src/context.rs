//! Path resolution for marker files.
//!
//! A [`RuntimeContext`] turns a slot name into `<root>/<pid_dir>/<name>.pid`
//! and makes sure the pid directory exists before anything opens a marker.
//! Every command resolves its paths through this module so the CLI and the
//! library agree on where markers live.

use crate::config::Config;
use crate::error::{Result, SingletonError};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the optional config file looked up at the root.
pub const CONFIG_FILE_NAME: &str = "singleton.yaml";

/// Name of the NDJSON event log inside the pid directory.
pub const EVENTS_FILE_NAME: &str = "events.ndjson";

/// Extension used for marker files.
pub const MARKER_EXTENSION: &str = "pid";

/// Resolved paths for singleton markers.
#[derive(Debug, Clone)]
pub struct RuntimeContext {
    /// Base directory (application root).
    pub root: PathBuf,

    /// Directory holding marker files (default: `{root}/tmp/pids/`).
    pub pids_dir: PathBuf,
}

impl RuntimeContext {
    /// Build a context rooted at `root` using the configured pid directory.
    pub fn new<P: AsRef<Path>>(root: P, config: &Config) -> Self {
        let root = root.as_ref().to_path_buf();
        let pids_dir = root.join(&config.pid_dir);
        Self { root, pids_dir }
    }

    /// Resolve the context, defaulting the root to the current working directory.
    pub fn resolve(root: Option<&Path>, config: &Config) -> Result<Self> {
        match root {
            Some(root) => Ok(Self::new(root, config)),
            None => {
                let cwd = env::current_dir().map_err(|e| {
                    SingletonError::UserError(format!(
                        "failed to get current working directory: {}",
                        e
                    ))
                })?;
                Ok(Self::new(cwd, config))
            }
        }
    }

    /// Default config file location for a root.
    pub fn default_config_path<P: AsRef<Path>>(root: P) -> PathBuf {
        root.as_ref().join(CONFIG_FILE_NAME)
    }

    /// Create the pid directory if it is missing.
    pub fn ensure_pids_dir(&self) -> Result<()> {
        if !self.pids_dir.is_dir() {
            fs::create_dir_all(&self.pids_dir).map_err(|e| {
                SingletonError::io("create pid directory", &self.pids_dir, e)
            })?;
        }
        Ok(())
    }

    /// Marker path for `name`, with the pid directory guaranteed to exist.
    pub fn marker_path(&self, name: &str) -> Result<PathBuf> {
        validate_name(name)?;
        self.ensure_pids_dir()?;
        Ok(self.marker_path_unchecked(name))
    }

    /// Marker path for `name` without touching the filesystem.
    pub(crate) fn marker_path_unchecked(&self, name: &str) -> PathBuf {
        self.pids_dir.join(format!("{}.{}", name, MARKER_EXTENSION))
    }

    /// Path to the NDJSON event log.
    pub fn events_path(&self) -> PathBuf {
        self.pids_dir.join(EVENTS_FILE_NAME)
    }
}

/// Check that `name` can be used as a marker file stem.
pub fn validate_name(name: &str) -> Result<()> {
    let invalid = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\', '\0']);

    if invalid {
        return Err(SingletonError::InvalidName(name.to_string()));
    }
    Ok(())
}
