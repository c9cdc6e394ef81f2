//! The per-name singleton handle.

use super::guard::ReleaseGuard;
use super::marker::{self, Removal};
use crate::context::RuntimeContext;
use crate::error::{Result, SingletonError};
use crate::exit_codes;
use crate::process::ProcessEnv;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, Weak};

/// How many times `acquire` replaces a descriptor whose marker was swapped
/// out from under it before giving up.
const MAX_REOPEN_ATTEMPTS: usize = 3;

/// Descriptor slot shared (weakly) with the exit hook.
type DescriptorSlot = Mutex<Option<File>>;

/// Result of one lock attempt on a descriptor.
enum Claim {
    Won,
    Contended,
    Stale,
}

/// Exclusive ownership of one named slot on this host.
///
/// The handle owns a lazily opened descriptor on `<pid_dir>/<name>.pid`.
/// Whether the slot is held is always answered by the kernel's advisory lock
/// table, so a second handle in the same process is refused exactly like a
/// handle in another process.
///
/// Dropping the handle closes the descriptor (which releases the kernel
/// lock) but leaves the marker file in place.
pub struct LockHandle {
    name: String,
    path: PathBuf,
    descriptor: Arc<DescriptorSlot>,
    env: Arc<dyn ProcessEnv>,
    exit_hook_registered: bool,
}

impl LockHandle {
    /// Create a handle for `name`, resolving its marker path through `ctx`.
    ///
    /// The pid directory is created if missing. Nothing is opened or locked yet.
    pub fn new(name: &str, ctx: &RuntimeContext, env: Arc<dyn ProcessEnv>) -> Result<Self> {
        let path = ctx.marker_path(name)?;
        Ok(Self::with_path(name, path, env))
    }

    /// Create a handle on an explicit marker path.
    ///
    /// The caller is responsible for the parent directory existing.
    pub fn with_path(name: &str, path: impl Into<PathBuf>, env: Arc<dyn ProcessEnv>) -> Self {
        Self {
            name: name.to_string(),
            path: path.into(),
            descriptor: Arc::new(Mutex::new(None)),
            env,
            exit_hook_registered: false,
        }
    }

    /// Slot name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Marker file path.
    pub fn marker_path(&self) -> &Path {
        &self.path
    }

    /// Try to become the holder of this slot without blocking.
    ///
    /// On success the marker contains exactly this process's pid and a
    /// newline, synced to storage, and a release callback is registered with
    /// the process environment (once per handle).
    ///
    /// # Returns
    ///
    /// * `Ok(())` - This handle now holds the slot
    /// * `Err(SingletonError::AlreadyRunning)` - Held elsewhere; carries the recorded pid
    /// * `Err(SingletonError::Io)` - Open, lock, write, or sync failed
    pub fn acquire(&mut self) -> Result<()> {
        let pid = self.env.pid();

        {
            let mut slot = lock_slot(&self.descriptor);
            let mut reopened = 0;

            loop {
                let mut file = match slot.take() {
                    Some(file) => file,
                    None => marker::open_for_lock(&self.path)?,
                };

                let claim = claim(&mut file, &self.path, pid);
                // Keep the descriptor only while it still names the live marker
                if matches!(claim, Ok(Claim::Won | Claim::Contended)) {
                    *slot = Some(file);
                }

                match claim? {
                    Claim::Won => break,
                    Claim::Contended => return Err(self.already_running()),
                    Claim::Stale => {
                        reopened += 1;
                        if reopened > MAX_REOPEN_ATTEMPTS {
                            return Err(self.already_running());
                        }
                    }
                }
            }
        }

        self.register_exit_hook(pid);
        Ok(())
    }

    /// Like [`acquire`](Self::acquire), but terminates the process quietly
    /// (exit status 0) when another holder has the slot.
    ///
    /// I/O failures are still returned.
    pub fn lock_or_exit(&mut self) -> Result<()> {
        match self.acquire() {
            Err(SingletonError::AlreadyRunning { .. }) => self.env.exit(exit_codes::SUCCESS),
            other => other,
        }
    }

    /// Acquire, run `body`, and release on every exit path of `body`.
    ///
    /// Release also happens if `body` panics. `body`'s own error wins over a
    /// release failure; a release failure after a successful `body` is
    /// returned as the error.
    pub fn run_exclusively<T, E, F>(&mut self, body: F) -> std::result::Result<T, E>
    where
        F: FnOnce() -> std::result::Result<T, E>,
        E: From<SingletonError>,
    {
        self.acquire()?;

        let guard = ReleaseGuard::new(self);
        let outcome = body();
        let released = guard.release();

        let value = outcome?;
        released?;
        Ok(value)
    }

    /// Give up ownership.
    ///
    /// Deletes the marker when this handle holds it, then closes the
    /// descriptor, which releases the advisory lock. On a handle that holds
    /// nothing this is a no-op apart from the final check.
    ///
    /// Returns `true` iff the slot is reported free afterwards.
    pub fn release(&mut self) -> Result<bool> {
        release_descriptor(&self.path, &self.descriptor, self.env.pid())?;
        Ok(!self.is_running()?)
    }

    /// True if any descriptor in any process holds the slot.
    ///
    /// Never creates the marker and never blocks.
    pub fn is_running(&self) -> Result<bool> {
        marker::probe(&self.path)
    }

    /// Pid recorded by the current holder, or `None` when nobody holds the slot.
    ///
    /// A holder that crashed between locking and writing leaves empty or
    /// previous-run content; that also reads as `None` or as the old pid.
    pub fn holder_pid(&self) -> Result<Option<u32>> {
        if self.is_running()? {
            Ok(marker::read_pid(&self.path))
        } else {
            Ok(None)
        }
    }

    fn already_running(&self) -> SingletonError {
        SingletonError::AlreadyRunning {
            name: self.name.clone(),
            pid: marker::read_pid(&self.path),
        }
    }

    fn register_exit_hook(&mut self, pid: u32) {
        if self.exit_hook_registered {
            return;
        }

        let path = self.path.clone();
        let descriptor = Arc::downgrade(&self.descriptor);
        self.env
            .on_exit(Box::new(move || release_at_exit(&path, &descriptor, pid)));
        self.exit_hook_registered = true;
    }
}

impl std::fmt::Debug for LockHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LockHandle")
            .field("name", &self.name)
            .field("path", &self.path)
            .field("descriptor_open", &lock_slot(&self.descriptor).is_some())
            .finish()
    }
}

fn lock_slot(slot: &DescriptorSlot) -> MutexGuard<'_, Option<File>> {
    slot.lock().unwrap_or_else(|poison| poison.into_inner())
}

/// Lock first, then verify, then rewrite. The order matters: content is only
/// ever rewritten by the descriptor that holds the lock on the live marker.
fn claim(file: &mut File, path: &Path, pid: u32) -> Result<Claim> {
    if !marker::try_lock(file, path)? {
        return Ok(Claim::Contended);
    }
    if !marker::is_current(file, path)? {
        return Ok(Claim::Stale);
    }
    marker::write_pid(file, path, pid)?;
    Ok(Claim::Won)
}

/// Close the handle's descriptor, deleting the marker first if we own it.
fn release_descriptor(path: &Path, slot: &DescriptorSlot, pid: u32) -> Result<()> {
    let Some(file) = lock_slot(slot).take() else {
        return Ok(());
    };

    // Re-locking our own locked descriptor succeeds; a descriptor that never
    // won the lock fails here or points at a marker recording someone else.
    let owned = marker::try_lock(&file, path)?
        && marker::is_current(&file, path)?
        && marker::read_pid(path) == Some(pid);

    if owned {
        marker::remove(path)?;
    }

    drop(file);
    Ok(())
}

fn release_at_exit(path: &Path, descriptor: &Weak<DescriptorSlot>, pid: u32) {
    // Exit hooks have no caller to report to
    let _ = match descriptor.upgrade() {
        Some(slot) => release_descriptor(path, &slot, pid),
        None => marker::remove_unheld(path, Some(pid)).map(|_: Removal| ()),
    };
}
