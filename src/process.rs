//! Process environment seen by the lock core.
//!
//! The core needs two things from the running process: its pid, and a place
//! to register callbacks that must run when the process terminates normally.
//! Both come through the [`ProcessEnv`] trait so the entry point owns the
//! termination hooks explicitly and tests can substitute a fake process.

use std::sync::{Arc, Mutex};

/// A callback run once at normal process termination.
pub type ExitHook = Box<dyn FnOnce() + Send + 'static>;

/// Process identity and termination hooks.
pub trait ProcessEnv: Send + Sync {
    /// Identifier of the calling process.
    fn pid(&self) -> u32;

    /// Register `hook` to run at normal termination.
    fn on_exit(&self, hook: ExitHook);

    /// Run registered hooks, then terminate with `code`.
    fn exit(&self, code: i32) -> !;
}

/// Registry of termination callbacks.
///
/// Hooks run in reverse registration order, each at most once. Cloning shares
/// the same registry.
#[derive(Clone, Default)]
pub struct ExitHooks {
    hooks: Arc<Mutex<Vec<ExitHook>>>,
}

impl ExitHooks {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a hook.
    pub fn register(&self, hook: ExitHook) {
        self.slots().push(hook);
    }

    /// Number of hooks waiting to run.
    pub fn len(&self) -> usize {
        self.slots().len()
    }

    /// True when no hooks are pending.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drain and run every pending hook, returning how many ran.
    pub fn run(&self) -> usize {
        let hooks = std::mem::take(&mut *self.slots());
        let count = hooks.len();
        // Registry lock is released before running so a hook may register another.
        for hook in hooks.into_iter().rev() {
            hook();
        }
        count
    }

    fn slots(&self) -> std::sync::MutexGuard<'_, Vec<ExitHook>> {
        self.hooks.lock().unwrap_or_else(|poison| poison.into_inner())
    }
}

impl std::fmt::Debug for ExitHooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExitHooks")
            .field("pending", &self.len())
            .finish()
    }
}

/// The real running process.
///
/// The top-level entry point must call [`CurrentProcess::run_exit_hooks`]
/// before returning from `main`; [`ProcessEnv::exit`] does so itself.
#[derive(Debug, Clone, Default)]
pub struct CurrentProcess {
    hooks: ExitHooks,
}

impl CurrentProcess {
    /// Create a process environment with an empty hook registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Convenience constructor for handing to a `LockHandle`.
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Run all registered termination hooks.
    pub fn run_exit_hooks(&self) -> usize {
        self.hooks.run()
    }

    /// The underlying registry.
    pub fn hooks(&self) -> &ExitHooks {
        &self.hooks
    }
}

impl ProcessEnv for CurrentProcess {
    fn pid(&self) -> u32 {
        std::process::id()
    }

    fn on_exit(&self, hook: ExitHook) {
        self.hooks.register(hook);
    }

    fn exit(&self, code: i32) -> ! {
        self.hooks.run();
        std::process::exit(code)
    }
}
