//! Low-level marker file operations.
//!
//! Every function here takes the marker path for error reporting. Lock state
//! is always read from the kernel through `fs2` advisory locks, never cached.

use crate::error::{Result, SingletonError};
use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Seek, SeekFrom, Write};
use std::path::Path;

/// Outcome of removing a marker that nobody holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Removal {
    /// No marker at the path.
    Missing,
    /// Another descriptor holds the lock, or the marker was swapped underneath us.
    Held,
    /// The marker records a different pid than the expected owner.
    Foreign,
    /// Removed; carries the pid it recorded.
    Removed(Option<u32>),
}

/// Open the marker for acquisition: read-write, created if absent, never truncated.
pub(super) fn open_for_lock(path: &Path) -> Result<File> {
    OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(path)
        .map_err(|e| SingletonError::io("open marker", path, e))
}

/// Open an existing marker without creating it. `None` if it does not exist.
pub(super) fn open_existing(path: &Path) -> Result<Option<File>> {
    match OpenOptions::new().read(true).open(path) {
        Ok(file) => Ok(Some(file)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(SingletonError::io("open marker for probe", path, e)),
    }
}

/// Non-blocking exclusive lock attempt. `Ok(false)` means someone else holds it.
pub(super) fn try_lock(file: &File, path: &Path) -> Result<bool> {
    match file.try_lock_exclusive() {
        Ok(()) => Ok(true),
        Err(e) if is_contended(&e) => Ok(false),
        Err(e) => Err(SingletonError::io("lock marker", path, e)),
    }
}

fn is_contended(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::WouldBlock
        || err.raw_os_error() == fs2::lock_contended_error().raw_os_error()
}

/// Release a lock taken by `try_lock` on this descriptor.
pub(super) fn unlock(file: &File, path: &Path) -> Result<()> {
    FileExt::unlock(file).map_err(|e| SingletonError::io("unlock marker", path, e))
}

/// True if someone currently holds the lock on the marker at `path`.
///
/// Uses its own short-lived read-only descriptor, so it never creates the
/// marker and never disturbs a real holder.
pub(super) fn probe(path: &Path) -> Result<bool> {
    let Some(file) = open_existing(path)? else {
        return Ok(false);
    };

    if try_lock(&file, path)? {
        unlock(&file, path)?;
        Ok(false)
    } else {
        Ok(true)
    }
}

/// Replace the marker content with `"<pid>\n"` and flush it to storage.
///
/// Must only be called while `file` holds the exclusive lock.
pub(super) fn write_pid(file: &mut File, path: &Path, pid: u32) -> Result<()> {
    file.set_len(0)
        .map_err(|e| SingletonError::io("truncate marker", path, e))?;
    file.seek(SeekFrom::Start(0))
        .map_err(|e| SingletonError::io("rewind marker", path, e))?;
    file.write_all(format!("{}\n", pid).as_bytes())
        .map_err(|e| SingletonError::io("write marker", path, e))?;
    file.sync_all()
        .map_err(|e| SingletonError::io("sync marker", path, e))
}

/// Pid recorded in the marker, if the file exists and holds a positive integer.
pub fn read_pid(path: &Path) -> Option<u32> {
    fs::read_to_string(path)
        .ok()?
        .trim()
        .parse::<u32>()
        .ok()
        .filter(|pid| *pid > 0)
}

/// True if `file` still refers to the file currently at `path`.
///
/// A descriptor can outlive its marker: the holder removes the file on
/// release and the next acquirer creates a fresh one. Locking the orphan
/// would not exclude anybody.
#[cfg(unix)]
pub(super) fn is_current(file: &File, path: &Path) -> Result<bool> {
    use std::os::unix::fs::MetadataExt;

    let held = file
        .metadata()
        .map_err(|e| SingletonError::io("stat marker descriptor", path, e))?;

    match fs::metadata(path) {
        Ok(on_disk) => Ok(held.dev() == on_disk.dev() && held.ino() == on_disk.ino()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(SingletonError::io("stat marker", path, e)),
    }
}

#[cfg(not(unix))]
pub(super) fn is_current(_file: &File, path: &Path) -> Result<bool> {
    Ok(path.exists())
}

/// Delete the marker, treating an already-missing file as success.
pub(super) fn remove(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(SingletonError::io("remove marker", path, e)),
    }
}

/// Remove the marker only if nobody holds it.
///
/// The removal happens while this function itself holds the lock, so an
/// acquirer cannot win the marker between the check and the unlink. With
/// `owner` set, a marker recording any other pid is left alone.
pub(super) fn remove_unheld(path: &Path, owner: Option<u32>) -> Result<Removal> {
    let Some(file) = open_existing(path)? else {
        return Ok(Removal::Missing);
    };

    if !try_lock(&file, path)? || !is_current(&file, path)? {
        return Ok(Removal::Held);
    }

    let recorded = read_pid(path);
    if owner.is_some() && recorded != owner {
        return Ok(Removal::Foreign);
    }

    remove(path)?;
    drop(file);
    Ok(Removal::Removed(recorded))
}
