//! Cross-process file lock with bounded-wait acquisition.

use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use process_lock_core::error::{LockError, LockResult};
use process_lock_core::traits::AdvisoryLock;
use tracing::{field, instrument, Span};

use crate::primitive::FsAdvisoryLock;

/// Deadline for a single blocking acquisition. One-shot, non-renewable.
pub const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(3);

/// A cross-process mutual-exclusion lock identified by a file path.
///
/// The backing file doubles as the lock's identity; its content is never
/// interpreted (an empty file suffices). Mutual exclusion itself is
/// delegated to an [`AdvisoryLock`] primitive, so the lock is valid only
/// among processes sharing the same filesystem.
///
/// Several `FileLock` values may be bound to the same path within one
/// process; each carries an independent primitive binding and contends
/// exactly as two separate processes would.
#[derive(Debug)]
pub struct FileLock<P: AdvisoryLock = FsAdvisoryLock> {
    path: PathBuf,
    primitive: Arc<P>,
}

impl FileLock<FsAdvisoryLock> {
    /// Creates a lock for `path`, provisioning the backing file.
    ///
    /// An empty file is created when none exists; an existing file is left
    /// untouched (never truncated). The path is used as given, without
    /// canonicalization.
    pub fn new(path: impl Into<PathBuf>) -> LockResult<Self> {
        let path = path.into();
        let primitive = FsAdvisoryLock::bind(&path);
        Self::with_primitive(primitive, path)
    }
}

impl<P: AdvisoryLock> FileLock<P> {
    /// Creates a lock backed by a caller-supplied advisory primitive.
    ///
    /// Provisions the backing file exactly like [`FileLock::new`]. This
    /// seam exists so the timeout and lifecycle logic can be exercised
    /// against a fake primitive, without real lock contention.
    pub fn with_primitive(primitive: P, path: impl Into<PathBuf>) -> LockResult<Self> {
        let path = path.into();
        OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .map_err(|source| LockError::Provision {
                path: path.clone(),
                source,
            })?;

        Ok(Self {
            path,
            primitive: Arc::new(primitive),
        })
    }

    /// Returns the path of the backing file.
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Acquires the lock, waiting at most [`ACQUIRE_TIMEOUT`].
    ///
    /// The blocking primitive call runs on a separate thread and its
    /// completion is raced against the deadline. If the attempt finishes
    /// first, its outcome is returned as-is; if the deadline fires first,
    /// [`LockError::AcquireTimeout`] is returned and the lock must be
    /// treated as not held.
    ///
    /// A timed-out attempt is abandoned, not cancelled: the primitive has
    /// no cooperative cancellation, so the in-flight attempt may still
    /// complete later and silently hold the lock until
    /// [`unlock`](Self::unlock) is called on this handle. No retries are
    /// performed; callers retry by calling `lock` again.
    #[instrument(
        skip(self),
        fields(lock.path = %self.path.display(), acquired = field::Empty, error = field::Empty)
    )]
    pub async fn lock(&self) -> LockResult<()> {
        let primitive = Arc::clone(&self.primitive);
        let attempt = tokio::task::spawn_blocking(move || primitive.lock());

        match tokio::time::timeout(ACQUIRE_TIMEOUT, attempt).await {
            Ok(Ok(Ok(()))) => {
                Span::current().record("acquired", true);
                Ok(())
            }
            Ok(Ok(Err(e))) => {
                Span::current().record("acquired", false);
                Span::current().record("error", field::display(&e));
                Err(LockError::Acquire(e))
            }
            Ok(Err(join)) => {
                Span::current().record("acquired", false);
                Err(LockError::Acquire(io::Error::other(join)))
            }
            Err(_elapsed) => {
                Span::current().record("acquired", false);
                Span::current().record("error", "timeout");
                Err(LockError::AcquireTimeout)
            }
        }
    }

    /// Attempts to acquire the lock without waiting.
    ///
    /// `Ok(false)` means the lock is currently held by another handle or
    /// process; that is an expected outcome, not an error.
    #[instrument(
        skip(self),
        fields(lock.path = %self.path.display(), acquired = field::Empty)
    )]
    pub async fn try_lock(&self) -> LockResult<bool> {
        match self.primitive.try_lock() {
            Ok(acquired) => {
                Span::current().record("acquired", acquired);
                Ok(acquired)
            }
            Err(e) => Err(LockError::TryAcquire(e)),
        }
    }

    /// Releases a lock previously granted to this handle.
    ///
    /// Releasing when the lock is not held is an error reported by the
    /// primitive, never silently ignored.
    #[instrument(skip(self), fields(lock.path = %self.path.display()))]
    pub async fn unlock(&self) -> LockResult<()> {
        self.primitive.unlock().map_err(LockError::Release)
    }

    /// Releases the lock and deletes the backing file.
    ///
    /// Fail-fast: a release failure aborts the operation and leaves the
    /// file in place. Consuming `self` makes the destroyed handle
    /// unusable; other handles still bound to the same path fail their
    /// next attempt with a missing-file error rather than contend.
    #[instrument(skip(self), fields(lock.path = %self.path.display()))]
    pub async fn destroy(self) -> LockResult<()> {
        self.unlock().await?;
        std::fs::remove_file(&self.path).map_err(|source| LockError::Delete {
            path: self.path.clone(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Instant;

    /// In-memory advisory lock; clones share the held flag, so two handles
    /// built from clones contend like two processes would.
    #[derive(Clone, Debug)]
    struct FakeAdvisoryLock {
        held: Arc<AtomicBool>,
    }

    impl FakeAdvisoryLock {
        fn new() -> Self {
            Self {
                held: Arc::new(AtomicBool::new(false)),
            }
        }

        fn grab(&self) -> bool {
            self.held
                .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
                .is_ok()
        }
    }

    impl AdvisoryLock for FakeAdvisoryLock {
        fn lock(&self) -> io::Result<()> {
            while !self.grab() {
                std::thread::sleep(Duration::from_millis(5));
            }
            Ok(())
        }

        fn try_lock(&self) -> io::Result<bool> {
            Ok(self.grab())
        }

        fn unlock(&self) -> io::Result<()> {
            if self.held.swap(false, Ordering::AcqRel) {
                Ok(())
            } else {
                Err(io::Error::other("lock not held"))
            }
        }
    }

    /// Advisory lock whose every operation fails.
    struct BrokenAdvisoryLock;

    impl AdvisoryLock for BrokenAdvisoryLock {
        fn lock(&self) -> io::Result<()> {
            Err(io::Error::other("primitive failure"))
        }

        fn try_lock(&self) -> io::Result<bool> {
            Err(io::Error::other("primitive failure"))
        }

        fn unlock(&self) -> io::Result<()> {
            Err(io::Error::other("primitive failure"))
        }
    }

    fn scratch_lock<P: AdvisoryLock>(primitive: P) -> (tempfile::TempDir, FileLock<P>) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fake.lock");
        let lock = FileLock::with_primitive(primitive, path).unwrap();
        (dir, lock)
    }

    #[tokio::test]
    async fn lock_times_out_against_a_held_primitive() {
        let shared = FakeAdvisoryLock::new();
        let (_dir1, h1) = scratch_lock(shared.clone());
        let (_dir2, h2) = scratch_lock(shared.clone());

        assert!(h1.try_lock().await.unwrap());

        let start = Instant::now();
        let err = h2.lock().await.unwrap_err();
        let elapsed = start.elapsed();

        assert!(matches!(err, LockError::AcquireTimeout));
        assert!(elapsed >= ACQUIRE_TIMEOUT, "returned early: {elapsed:?}");
        assert!(
            elapsed < ACQUIRE_TIMEOUT + Duration::from_secs(1),
            "deadline overshot: {elapsed:?}"
        );

        // Let the abandoned attempt finish so runtime shutdown is not held up.
        h1.unlock().await.unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;
        h2.unlock().await.unwrap();
    }

    #[tokio::test]
    async fn abandoned_attempt_may_still_win_the_lock() {
        let shared = FakeAdvisoryLock::new();
        let (_dir1, h1) = scratch_lock(shared.clone());
        let (_dir2, h2) = scratch_lock(shared.clone());

        assert!(h1.try_lock().await.unwrap());
        let err = h2.lock().await.unwrap_err();
        assert!(matches!(err, LockError::AcquireTimeout));

        // The timed-out attempt keeps running; once h1 releases, it grabs
        // the lock even though h2's caller never observed success.
        h1.unlock().await.unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert!(!h1.try_lock().await.unwrap());
        h2.unlock().await.unwrap();
    }

    #[tokio::test]
    async fn primitive_failures_map_to_lock_errors() {
        let (_dir, lock) = scratch_lock(BrokenAdvisoryLock);

        assert!(matches!(
            lock.lock().await.unwrap_err(),
            LockError::Acquire(_)
        ));
        assert!(matches!(
            lock.try_lock().await.unwrap_err(),
            LockError::TryAcquire(_)
        ));
        assert!(matches!(
            lock.unlock().await.unwrap_err(),
            LockError::Release(_)
        ));
    }

    #[tokio::test]
    async fn provisioning_failure_reports_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no-such-dir").join("x.lock");

        let err = FileLock::with_primitive(FakeAdvisoryLock::new(), &path).unwrap_err();
        assert!(matches!(err, LockError::Provision { .. }));
    }
}
