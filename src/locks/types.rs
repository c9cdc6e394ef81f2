//! Marker inventory types.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;

/// Snapshot of one marker file.
#[derive(Debug, Clone, Serialize)]
pub struct MarkerInfo {
    /// Slot name (the marker's file stem).
    pub name: String,

    /// Marker file path.
    pub path: PathBuf,

    /// Pid recorded in the marker, if readable.
    pub pid: Option<u32>,

    /// Whether some process holds the advisory lock right now.
    pub running: bool,

    /// Last modification time of the marker.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<DateTime<Utc>>,
}

impl MarkerInfo {
    /// A marker that exists on disk but has no holder.
    pub fn is_stale(&self) -> bool {
        !self.running
    }

    /// Format the marker age as a human-readable string.
    pub fn age_string(&self) -> String {
        let Some(modified_at) = self.modified_at else {
            return "unknown".to_string();
        };

        let age = Utc::now().signed_duration_since(modified_at);
        let minutes = age.num_minutes();
        let hours = age.num_hours();
        let days = age.num_days();

        if days > 0 {
            format!("{}d {}h", days, hours % 24)
        } else if hours > 0 {
            format!("{}h {}m", hours, minutes % 60)
        } else {
            format!("{}m", minutes)
        }
    }
}

impl std::fmt::Display for MarkerInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let pid = self
            .pid
            .map(|pid| pid.to_string())
            .unwrap_or_else(|| "-".to_string());

        write!(
            f,
            "{} (pid: {}, age: {}{})",
            self.name,
            pid,
            self.age_string(),
            if self.running { ", RUNNING" } else { ", STALE" }
        )
    }
}
