//! Queries and maintenance over markers that do not need a `LockHandle`.

use super::marker::{self, Removal};
use super::types::MarkerInfo;
use crate::context::{MARKER_EXTENSION, RuntimeContext};
use crate::error::{Result, SingletonError};
use chrono::{DateTime, Utc};
use std::fs;
use std::path::Path;

/// True if some process holds the marker at `path`.
///
/// A missing marker, or one left behind by a dead process, reads as `false`.
pub fn is_running(path: &Path) -> Result<bool> {
    marker::probe(path)
}

/// Pid of the process holding the marker at `path`, if any.
pub fn holder_pid(path: &Path) -> Result<Option<u32>> {
    if marker::probe(path)? {
        Ok(marker::read_pid(path))
    } else {
        Ok(None)
    }
}

/// Describe the marker for `name`. `Ok(None)` if there is no marker file.
pub fn inspect_marker(ctx: &RuntimeContext, name: &str) -> Result<Option<MarkerInfo>> {
    let path = ctx.marker_path(name)?;
    if !path.exists() {
        return Ok(None);
    }
    describe(name, &path).map(Some)
}

/// List every marker in the pid directory, sorted by name.
///
/// Files without the `.pid` extension are skipped.
pub fn list_markers(ctx: &RuntimeContext) -> Result<Vec<MarkerInfo>> {
    let mut markers = Vec::new();

    if !ctx.pids_dir.exists() {
        return Ok(markers);
    }

    let entries = fs::read_dir(&ctx.pids_dir)
        .map_err(|e| SingletonError::io("read pid directory", &ctx.pids_dir, e))?;

    for entry in entries {
        let entry =
            entry.map_err(|e| SingletonError::io("read pid directory entry", &ctx.pids_dir, e))?;
        let path = entry.path();

        if path.extension().and_then(|e| e.to_str()) != Some(MARKER_EXTENSION) {
            continue;
        }

        let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };

        // A marker can vanish between read_dir and describe when its holder releases
        match describe(name, &path) {
            Ok(info) => markers.push(info),
            Err(_) if !path.exists() => continue,
            Err(e) => return Err(e),
        }
    }

    markers.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(markers)
}

/// Remove the marker for `name` if no process holds it.
///
/// # Returns
///
/// * `Ok(MarkerInfo)` - What the removed marker recorded
/// * `Err(SingletonError::AlreadyRunning)` - A live holder owns the marker
/// * `Err(SingletonError::UserError)` - No marker exists for `name`
pub fn clear_stale_marker(ctx: &RuntimeContext, name: &str) -> Result<MarkerInfo> {
    let path = ctx.marker_path(name)?;
    let modified_at = modified_at(&path);

    match marker::remove_unheld(&path, None)? {
        Removal::Removed(pid) => Ok(MarkerInfo {
            name: name.to_string(),
            path,
            pid,
            running: false,
            modified_at,
        }),
        Removal::Missing => Err(SingletonError::UserError(format!(
            "no marker for '{}' at: {}",
            name,
            path.display()
        ))),
        Removal::Held | Removal::Foreign => Err(SingletonError::AlreadyRunning {
            name: name.to_string(),
            pid: marker::read_pid(&path),
        }),
    }
}

fn describe(name: &str, path: &Path) -> Result<MarkerInfo> {
    Ok(MarkerInfo {
        name: name.to_string(),
        path: path.to_path_buf(),
        pid: marker::read_pid(path),
        running: marker::probe(path)?,
        modified_at: modified_at(path),
    })
}

fn modified_at(path: &Path) -> Option<DateTime<Utc>> {
    let modified = fs::metadata(path).ok()?.modified().ok()?;
    Some(DateTime::<Utc>::from(modified))
}
