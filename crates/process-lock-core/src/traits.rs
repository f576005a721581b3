//! The advisory-lock primitive contract.

use std::io;

/// An OS-level advisory exclusive lock bound to a single filesystem path.
///
/// Implementations sequence raw lock operations; they do not provision or
/// delete the backing file. Binding to a path performs no I/O; all I/O
/// happens in [`lock`](AdvisoryLock::lock), [`try_lock`](AdvisoryLock::try_lock),
/// and [`unlock`](AdvisoryLock::unlock).
///
/// Exclusivity is advisory: only cooperating processes that go through the
/// same locking discipline observe it. The lock is valid only among
/// processes sharing the same filesystem.
pub trait AdvisoryLock: Send + Sync + 'static {
    /// Blocks until the exclusive lock is granted.
    ///
    /// There is no native timeout; callers that need a bounded wait must
    /// race this call against a timer on another thread.
    fn lock(&self) -> io::Result<()>;

    /// Attempts the exclusive lock once, without blocking.
    ///
    /// Returns `Ok(true)` if granted, `Ok(false)` if the lock is currently
    /// held by another binding or process. Contention is an expected
    /// outcome, not an error.
    fn try_lock(&self) -> io::Result<bool>;

    /// Releases a previously granted lock.
    ///
    /// Releasing a lock this binding does not hold is an error, never
    /// silently ignored.
    fn unlock(&self) -> io::Result<()>;
}
