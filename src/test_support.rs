use crate::config::Config;
use crate::context::RuntimeContext;
use crate::process::{ExitHook, ExitHooks, ProcessEnv};
use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock, Mutex, MutexGuard};
use tempfile::TempDir;

static CWD_LOCK: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

pub(crate) struct DirGuard {
    original: PathBuf,
    _lock: MutexGuard<'static, ()>,
}

impl DirGuard {
    pub(crate) fn new(new_dir: &Path) -> Self {
        // Changing the process current working directory is global and not thread-safe.
        // Lock it so tests don't race even if a #[serial] annotation is missed.
        let lock = CWD_LOCK.lock().unwrap_or_else(|poison| poison.into_inner());
        let original = std::env::current_dir().unwrap();
        std::env::set_current_dir(new_dir).unwrap();
        Self {
            original,
            _lock: lock,
        }
    }
}

impl Drop for DirGuard {
    fn drop(&mut self) {
        let _ = std::env::set_current_dir(&self.original);
    }
}

/// A temporary root with the default pid directory layout.
pub(crate) fn create_test_context() -> (TempDir, RuntimeContext) {
    let temp_dir = TempDir::new().unwrap();
    let ctx = RuntimeContext::new(temp_dir.path(), &Config::default());
    (temp_dir, ctx)
}

/// Process environment with a chosen pid whose `exit` panics instead of exiting.
pub(crate) struct FakeProcess {
    pid: u32,
    hooks: ExitHooks,
}

impl FakeProcess {
    pub(crate) fn new(pid: u32) -> Arc<Self> {
        Arc::new(Self {
            pid,
            hooks: ExitHooks::new(),
        })
    }

    pub(crate) fn pending_hooks(&self) -> usize {
        self.hooks.len()
    }

    pub(crate) fn run_exit_hooks(&self) -> usize {
        self.hooks.run()
    }
}

impl ProcessEnv for FakeProcess {
    fn pid(&self) -> u32 {
        self.pid
    }

    fn on_exit(&self, hook: ExitHook) {
        self.hooks.register(hook);
    }

    fn exit(&self, code: i32) -> ! {
        self.hooks.run();
        panic!("exit({})", code)
    }
}
