//! OS advisory lock primitive built on `fs2`.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

use fs2::FileExt;
use process_lock_core::traits::AdvisoryLock;

/// Advisory exclusive lock backed by the OS file-lock facility.
///
/// Each binding opens its own descriptor when locking, so two bindings to
/// the same path contend even inside a single process, the same outcome
/// two separate processes would see.
#[derive(Debug)]
pub struct FsAdvisoryLock {
    path: PathBuf,
    /// The open, locked file while the lock is held. `None` when unheld.
    held: Mutex<Option<File>>,
}

impl FsAdvisoryLock {
    /// Binds a lock to `path`. Performs no I/O.
    pub fn bind(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            held: Mutex::new(None),
        }
    }

    /// Returns the path this binding locks.
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Opens the backing file without creating it.
    ///
    /// A missing file is a hard error: once the lock domain has been
    /// destroyed, stale bindings must fail rather than resurrect it.
    fn open(&self) -> io::Result<File> {
        OpenOptions::new().read(true).write(true).open(&self.path)
    }

    fn store(&self, file: File) {
        *self.held.lock().unwrap_or_else(PoisonError::into_inner) = Some(file);
    }
}

impl AdvisoryLock for FsAdvisoryLock {
    fn lock(&self) -> io::Result<()> {
        let file = self.open()?;
        file.lock_exclusive()?;
        self.store(file);
        Ok(())
    }

    fn try_lock(&self) -> io::Result<bool> {
        let file = self.open()?;
        match file.try_lock_exclusive() {
            Ok(()) => {
                self.store(file);
                Ok(true)
            }
            Err(e) if e.raw_os_error() == fs2::lock_contended_error().raw_os_error() => Ok(false),
            Err(e) => Err(e),
        }
    }

    fn unlock(&self) -> io::Result<()> {
        let file = self
            .held
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .ok_or_else(|| io::Error::other("lock not held"))?;
        // The descriptor closes when `file` drops, which releases the lock
        // even if the explicit unlock call fails.
        file.unlock()
    }
}
