//! Scoped changes of the process working directory.
//!
//! The working directory is shared by every thread in the process. All
//! changes made through [`WorkingDirGuard`] are serialized by one reentrant
//! process-wide lock, and each guard puts the previous directory back when it
//! goes out of scope. Code that calls [`std::env::set_current_dir`] directly
//! bypasses the lock.

use std::env;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use parking_lot::{ReentrantMutex, ReentrantMutexGuard};
use tracing::{debug, warn};

static WORKING_DIR_LOCK: Lazy<ReentrantMutex<()>> =
    Lazy::new(|| ReentrantMutex::new(()));

/// Held lock on the process working directory.
pub type WorkingDirLock = ReentrantMutexGuard<'static, ()>;

/// Pin the working directory for the current thread.
///
/// Guards created on the same thread while the lock is held still succeed;
/// other threads block until it is released.
pub fn lock() -> WorkingDirLock {
    WORKING_DIR_LOCK.lock()
}

/// Changes into a directory and changes back when dropped.
///
/// The guard holds the working-directory lock for its whole lifetime and is
/// therefore tied to the thread that created it.
pub struct WorkingDirGuard {
    original: PathBuf,
    entered: PathBuf,
    armed: bool,
    _lock: WorkingDirLock,
}

impl WorkingDirGuard {
    /// Record the current directory, then change into `path`.
    ///
    /// Nothing is changed if `path` cannot be entered.
    pub fn enter(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let lock = lock();
        let original = env::current_dir()?;
        env::set_current_dir(path)?;

        debug!(
            from = %original.display(),
            to = %path.display(),
            "entered working directory"
        );

        Ok(Self {
            original,
            entered: path.to_path_buf(),
            armed: true,
            _lock: lock,
        })
    }

    /// Directory that was current before [`enter`](Self::enter).
    pub fn original(&self) -> &Path {
        &self.original
    }

    /// Directory the guard changed into.
    pub fn entered(&self) -> &Path {
        &self.entered
    }

    /// Change back now, reporting a failed restore instead of logging it.
    pub fn restore(mut self) -> io::Result<()> {
        self.armed = false;
        env::set_current_dir(&self.original)?;
        debug!(to = %self.original.display(), "restored working directory");
        Ok(())
    }

    /// Release the lock but stay in the entered directory.
    pub fn keep(mut self) -> PathBuf {
        self.armed = false;
        self.entered.clone()
    }
}

impl Drop for WorkingDirGuard {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }

        match env::set_current_dir(&self.original) {
            Ok(()) => debug!(
                to = %self.original.display(),
                "restored working directory"
            ),
            Err(err) => warn!(
                original = %self.original.display(),
                entered = %self.entered.display(),
                error = %err,
                "failed to restore working directory"
            ),
        }
    }
}

impl fmt::Debug for WorkingDirGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkingDirGuard")
            .field("original", &self.original)
            .field("entered", &self.entered)
            .field("armed", &self.armed)
            .finish()
    }
}
