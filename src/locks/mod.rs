//! Singleton locking for named processes.
//!
//! Each name maps to one marker file, `<pid_dir>/<name>.pid`. Ownership is
//! the kernel advisory lock on that file (taken with `fs2`), never the file's
//! existence:
//! - A holder locks the marker, then truncates it and writes `"<pid>\n"`.
//! - A crashed holder's lock disappears with its descriptors, so a leftover
//!   marker reads as not running.
//! - Status probes use their own short-lived descriptor and never create
//!   the marker.
//!
//! Nothing here blocks, retries, or logs. Contention is reported as
//! `SingletonError::AlreadyRunning` and left to the caller.

mod guard;
mod handle;
mod marker;
mod operations;
mod types;


pub use handle::LockHandle;
pub use marker::read_pid;
pub use operations::{clear_stale_marker, holder_pid, inspect_marker, is_running, list_markers};
pub use types::MarkerInfo;
