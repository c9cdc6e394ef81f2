//! Command implementations for singleton-process.
//!
//! This module provides the dispatcher that routes CLI commands to their
//! implementations, plus the per-invocation [`Session`] they share.

mod clear;
mod hold;
mod list;
mod path;
mod run;
mod status;

use crate::cli::{Cli, Command};
use singleton_process::config::Config;
use singleton_process::context::RuntimeContext;
use singleton_process::error::{Result, SingletonError};
use singleton_process::events::{Event, EventAction, append_event};
use singleton_process::locks::LockHandle;
use singleton_process::process::{CurrentProcess, ProcessEnv};
use serde_json::json;
use std::path::Path;
use std::sync::Arc;

/// Resolved configuration, paths, and process environment for one invocation.
pub struct Session {
    pub ctx: RuntimeContext,
    pub config: Config,
    pub env: Arc<CurrentProcess>,
}

impl Session {
    /// Resolve the root, load the config, and build the runtime context.
    ///
    /// An explicit `--config` must exist; the default `<root>/singleton.yaml`
    /// is optional.
    pub fn open(root: Option<&Path>, config_path: Option<&Path>, env: Arc<CurrentProcess>) -> Result<Self> {
        let base = RuntimeContext::resolve(root, &Config::default())?;

        let config = match config_path {
            Some(path) => Config::load(path)?,
            None => Config::load_or_default(RuntimeContext::default_config_path(&base.root))?,
        };

        let ctx = RuntimeContext::new(&base.root, &config);
        Ok(Self { ctx, config, env })
    }

    /// A lock handle for `name` bound to this process.
    pub fn handle(&self, name: &str) -> Result<LockHandle> {
        let env: Arc<dyn ProcessEnv> = self.env.clone();
        LockHandle::new(name, &self.ctx, env)
    }

    /// Pid of this process.
    pub fn pid(&self) -> u32 {
        self.env.pid()
    }

    /// Append an event unless disabled; failures are reported but not fatal.
    pub fn record(&self, event: Event) {
        if !self.config.record_events {
            return;
        }
        if let Err(e) = append_event(&self.ctx, &event) {
            eprintln!("Warning: failed to record {} event: {}", event.action, e);
        }
    }

    /// Record a refused acquisition.
    pub fn record_conflict(&self, name: &str, err: &SingletonError) {
        if let SingletonError::AlreadyRunning { pid, .. } = err {
            self.record(
                Event::new(EventAction::Conflict, name)
                    .with_details(json!({ "pid": self.pid(), "holder": pid })),
            );
        }
    }
}

/// Dispatch a command to its implementation.
///
/// Returns the process exit code on success.
pub fn dispatch(cli: Cli, env: Arc<CurrentProcess>) -> Result<i32> {
    let session = Session::open(cli.root.as_deref(), cli.config.as_deref(), env)?;

    match cli.command {
        Command::Hold(args) => hold::cmd_hold(&session, args),
        Command::Run(args) => run::cmd_run(&session, args),
        Command::Status(args) => status::cmd_status(&session, args),
        Command::List(args) => list::cmd_list(&session, args),
        Command::Clear(args) => clear::cmd_clear(&session, args),
        Command::Path(args) => path::cmd_path(&session, args),
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value)
        .map_err(|e| SingletonError::UserError(format!("failed to serialize output: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn session_uses_default_config_file_when_present() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(
            temp_dir.path().join("singleton.yaml"),
            "pid_dir: run\napp_name: billing\n",
        )
        .unwrap();

        let session = Session::open(Some(temp_dir.path()), None, CurrentProcess::shared()).unwrap();

        assert_eq!(session.ctx.pids_dir, temp_dir.path().join("run"));
        assert_eq!(session.config.app_name.as_deref(), Some("billing"));
    }

    #[test]
    fn session_defaults_without_config_file() {
        let temp_dir = TempDir::new().unwrap();
        let session = Session::open(Some(temp_dir.path()), None, CurrentProcess::shared()).unwrap();
        assert_eq!(session.ctx.pids_dir, temp_dir.path().join("tmp/pids"));
    }

    #[test]
    fn session_requires_explicit_config_to_exist() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("nope.yaml");
        let result = Session::open(Some(temp_dir.path()), Some(&missing), CurrentProcess::shared());
        assert!(matches!(result, Err(SingletonError::UserError(_))));
    }

    #[test]
    fn record_respects_record_events() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("singleton.yaml"), "record_events: false\n").unwrap();
        let session = Session::open(Some(temp_dir.path()), None, CurrentProcess::shared()).unwrap();

        session.record(Event::new(EventAction::Lock, "worker"));
        assert!(!session.ctx.events_path().exists());
    }
}
