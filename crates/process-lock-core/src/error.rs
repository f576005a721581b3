//! Error types for lock operations.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during lock operations.
///
/// Every wrapping variant preserves the underlying I/O error as its source.
/// Contention on a non-blocking attempt is not an error; it is reported as
/// a plain `false` by the attempt itself.
#[derive(Error, Debug)]
pub enum LockError {
    /// The backing file could not be created at construction time.
    #[error("failed to create lock file '{}'", path.display())]
    Provision {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The blocking acquisition failed for a reason other than contention.
    #[error("failed to acquire lock")]
    Acquire(#[source] io::Error),

    /// The acquisition deadline elapsed before the lock was granted.
    ///
    /// Distinguishable from [`LockError::Acquire`] so callers can decide
    /// between retrying and aborting. The lock must be treated as not held.
    #[error("timeout occurred while acquiring lock")]
    AcquireTimeout,

    /// The non-blocking attempt failed for a reason other than contention.
    #[error("failed to acquire lock")]
    TryAcquire(#[source] io::Error),

    /// Releasing the lock failed, including release of a lock not held.
    #[error("failed to release lock")]
    Release(#[source] io::Error),

    /// The backing file could not be removed after a successful release.
    #[error("failed to delete lock file '{}'", path.display())]
    Delete {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Result type for lock operations.
pub type LockResult<T> = Result<T, LockError>;
