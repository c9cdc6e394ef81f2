//! Scope guard releasing a handle on every exit path.

use super::handle::LockHandle;
use crate::error::Result;

/// Releases the borrowed handle when dropped, unless released explicitly.
///
/// Drop covers unwinding; the explicit path lets the caller see the result.
pub(super) struct ReleaseGuard<'a> {
    handle: Option<&'a mut LockHandle>,
}

impl<'a> ReleaseGuard<'a> {
    pub(super) fn new(handle: &'a mut LockHandle) -> Self {
        Self {
            handle: Some(handle),
        }
    }

    /// Release now and report the outcome.
    pub(super) fn release(mut self) -> Result<bool> {
        match self.handle.take() {
            Some(handle) => handle.release(),
            None => Ok(true),
        }
    }
}

impl Drop for ReleaseGuard<'_> {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = handle.release();
        }
    }
}
