//! Waiting for the manifest file to be released by other processes
//!
//! Another program (a launcher, an editor) may hold the manifest open
//! exclusively. Before writing, the run polls until the file can be locked.
//! Waiting is not an error: with the default policy the wait is unbounded.

use crate::error::ManifestError;
use fs4::fs_std::FileExt;
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Reports whether a file is currently held exclusively elsewhere.
pub trait LockProbe {
    fn is_locked(&self, path: &Path) -> bool;
}

/// Probes by attempting a non-blocking exclusive lock on a read/write handle.
///
/// A file that does not exist is not locked. Any other failure to open or lock
/// counts as locked.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExclusiveLockProbe;

impl LockProbe for ExclusiveLockProbe {
    fn is_locked(&self, path: &Path) -> bool {
        let file = match OpenOptions::new().read(true).write(true).open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return false,
            Err(e) => {
                debug!(path = %path.display(), error = %e, "Open for lock probe failed");
                return true;
            }
        };
        match file.try_lock_exclusive() {
            Ok(true) => {
                let _ = FileExt::unlock(&file);
                false
            }
            Ok(false) | Err(_) => true,
        }
    }
}

/// Sleep abstraction so waits can be observed in tests.
pub trait Sleeper {
    fn sleep(&self, duration: Duration);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Cooperative cancellation shared between a caller and a waiting run.
#[derive(Debug, Default, Clone)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Poll interval and optional upper bound for the lock wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockWaitPolicy {
    pub interval: Duration,
    /// `None` waits forever.
    pub timeout: Option<Duration>,
}

impl Default for LockWaitPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            timeout: None,
        }
    }
}

/// Block until `path` is not locked. Returns how many intervals were slept.
///
/// Elapsed time is the sum of slept intervals, so the timeout is measured in
/// the sleeper's time.
pub fn wait_for_unlock(
    path: &Path,
    policy: &LockWaitPolicy,
    probe: &dyn LockProbe,
    sleeper: &dyn Sleeper,
    cancel: &CancelToken,
) -> Result<u32, ManifestError> {
    let mut waits: u32 = 0;
    let mut waited = Duration::ZERO;

    loop {
        if cancel.is_cancelled() {
            return Err(ManifestError::Cancelled);
        }
        if !probe.is_locked(path) {
            if waits > 0 {
                debug!(path = %path.display(), waits, "Manifest released");
            }
            return Ok(waits);
        }
        if let Some(timeout) = policy.timeout {
            if waited >= timeout {
                return Err(ManifestError::LockTimeout {
                    path: path.to_path_buf(),
                    waited,
                });
            }
        }

        warn!("{} is being used", path.display());
        sleeper.sleep(policy.interval);
        waited += policy.interval;
        waits = waits.saturating_add(1);
    }
}
