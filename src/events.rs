//! Event logging for the singleton-process CLI.
//!
//! The lock core never logs. The CLI records what it did in an append-only
//! NDJSON file (one JSON object per line) at `<pid_dir>/events.ndjson`, which
//! makes it possible to reconstruct who held a slot and when.
//!
//! # Event Format
//!
//! Each event is a JSON object with the following fields:
//! - `ts`: RFC3339 timestamp
//! - `action`: The action performed (lock, unlock, conflict, run, clear)
//! - `actor`: The owner string (e.g., `user@HOST`)
//! - `name`: Slot name
//! - `details`: Freeform object with action-specific details
//!
//! ```no_run
//! use singleton_process::config::Config;
//! use singleton_process::context::RuntimeContext;
//! use singleton_process::events::{Event, EventAction, append_event};
//! use serde_json::json;
//!
//! let ctx = RuntimeContext::resolve(None, &Config::default())?;
//! let event = Event::new(EventAction::Lock, "worker").with_details(json!({"pid": 4242}));
//! append_event(&ctx, &event)?;
//! # Ok::<(), singleton_process::error::SingletonError>(())
//! ```

use crate::context::RuntimeContext;
use crate::error::{Result, SingletonError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs::OpenOptions;
use std::io::Write;

/// Actions that can be logged as events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventAction {
    /// Slot acquired
    Lock,
    /// Slot released
    Unlock,
    /// Acquisition refused because another process holds the slot
    Conflict,
    /// Child command finished under the slot
    Run,
    /// Stale marker removed manually
    Clear,
}

impl std::fmt::Display for EventAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventAction::Lock => write!(f, "lock"),
            EventAction::Unlock => write!(f, "unlock"),
            EventAction::Conflict => write!(f, "conflict"),
            EventAction::Run => write!(f, "run"),
            EventAction::Clear => write!(f, "clear"),
        }
    }
}

/// An event record for the audit log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// RFC3339 timestamp when the event occurred.
    pub ts: DateTime<Utc>,

    /// The action that was performed.
    pub action: EventAction,

    /// The actor who performed the action (e.g., `user@HOST`).
    pub actor: String,

    /// Slot name the action applies to.
    pub name: String,

    /// Freeform details object with action-specific information.
    pub details: Value,
}

impl Event {
    /// Create a new event for slot `name`, timestamped now.
    pub fn new(action: EventAction, name: impl Into<String>) -> Self {
        Self {
            ts: Utc::now(),
            action,
            actor: get_actor_string(),
            name: name.into(),
            details: Value::Object(serde_json::Map::new()),
        }
    }

    /// Set the details object for this event.
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = details;
        self
    }

    /// Serialize the event to a single-line JSON string.
    pub fn to_ndjson_line(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| {
            SingletonError::UserError(format!("failed to serialize event to JSON: {}", e))
        })
    }
}

/// Get the actor string for event metadata.
fn get_actor_string() -> String {
    let user = std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "unknown".to_string());

    let host = hostname::get()
        .map(|h| h.to_string_lossy().to_string())
        .unwrap_or_else(|_| "unknown".to_string());

    format!("{}@{}", user, host)
}

/// Append an event to the events log.
///
/// The file and pid directory are created if missing. Each append writes one
/// line with a trailing newline and syncs it to disk.
pub fn append_event(ctx: &RuntimeContext, event: &Event) -> Result<()> {
    let events_file = ctx.events_path();
    let json_line = event.to_ndjson_line()?;

    ctx.ensure_pids_dir()?;

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&events_file)
        .map_err(|e| SingletonError::io("open events file", &events_file, e))?;

    writeln!(file, "{}", json_line)
        .map_err(|e| SingletonError::io("write event", &events_file, e))?;

    file.sync_all()
        .map_err(|e| SingletonError::io("sync events file", &events_file, e))
}

/// Read all events back, skipping lines that do not parse.
pub fn read_events(ctx: &RuntimeContext) -> Result<Vec<Event>> {
    let events_file = ctx.events_path();
    if !events_file.exists() {
        return Ok(Vec::new());
    }

    let content = std::fs::read_to_string(&events_file)
        .map_err(|e| SingletonError::io("read events file", &events_file, e))?;

    Ok(content
        .lines()
        .filter_map(|line| serde_json::from_str(line).ok())
        .collect())
}
