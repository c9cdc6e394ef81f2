//! Config struct definition and default implementation.

use serde::{Deserialize, Serialize};

/// Default pid directory, relative to the root.
pub const DEFAULT_PID_DIR: &str = "tmp/pids";

/// Configuration for singleton-process.
///
/// Unknown fields in the YAML are ignored for forward compatibility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding marker files, relative to the root.
    #[serde(default = "default_pid_dir")]
    pub pid_dir: String,

    /// Application label recorded in events and shown by `status`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_name: Option<String>,

    /// Whether the CLI appends to the NDJSON event log.
    #[serde(default = "default_true")]
    pub record_events: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pid_dir: default_pid_dir(),
            app_name: None,
            record_events: default_true(),
        }
    }
}

fn default_pid_dir() -> String {
    DEFAULT_PID_DIR.to_string()
}

fn default_true() -> bool {
    true
}
