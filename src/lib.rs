//! singleton-process: at most one running instance of a named process per host.
//!
//! The shared state is a marker file per name, `<root>/<pid_dir>/<name>.pid`,
//! and the kernel advisory lock on it. See [`locks::LockHandle`] for the
//! protocol. The binary wraps this library with a small CLI.
//!
//! ```no_run
//! use singleton_process::config::Config;
//! use singleton_process::context::RuntimeContext;
//! use singleton_process::locks::LockHandle;
//! use singleton_process::process::CurrentProcess;
//!
//! let process = CurrentProcess::shared();
//! let ctx = RuntimeContext::resolve(None, &Config::default())?;
//! let mut handle = LockHandle::new("nightly-report", &ctx, process.clone())?;
//!
//! handle.run_exclusively(|| {
//!     // only one copy of this ever runs at a time
//!     Ok::<_, singleton_process::error::SingletonError>(())
//! })?;
//!
//! process.run_exit_hooks();
//! # Ok::<(), singleton_process::error::SingletonError>(())
//! ```

pub mod config;
pub mod context;
pub mod error;
pub mod events;
pub mod exit_codes;
pub mod locks;
pub mod process;

#[cfg(test)]
pub(crate) mod test_support;
