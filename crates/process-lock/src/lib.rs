//! Cross-process mutual exclusion backed by the filesystem.
//!
//! A [`FileLock`] is a named lock identified by a file path. Independent
//! OS processes sharing a filesystem coordinate through it without any
//! other communication channel: whoever holds the lock may treat the
//! protected resource as exclusively theirs until release.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use process_lock::FileLock;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Provision the backing file and bind a lock to it.
//!     let lock = FileLock::new("/tmp/my-resource.lock")?;
//!
//!     // Non-blocking attempt; contention is a plain `false`, not an error.
//!     if lock.try_lock().await? {
//!         // Critical section - we have exclusive access.
//!         lock.unlock().await?;
//!     }
//!
//!     // Blocking acquisition with a fixed 3 second deadline.
//!     lock.lock().await?;
//!
//!     // Release and delete the backing file in one step.
//!     lock.destroy().await?;
//!     Ok(())
//! }
//! ```
//!
//! # Semantics
//!
//! - Exclusion is **advisory**: only cooperating processes that go through
//!   the lock observe it, and it is valid only among processes sharing the
//!   same filesystem.
//! - [`FileLock::lock`] races the blocking OS acquisition against a fixed
//!   3 second deadline. A timed-out attempt is abandoned but not cancelled
//!   at the OS level; see the method docs for the resulting hazard.
//! - There is no reentrancy and no fairness among waiters.
//!
//! # Crate Organization
//!
//! This is a meta-crate that re-exports types from:
//! - `process-lock-core`: error taxonomy and the advisory primitive trait
//! - `process-lock-fs`: the filesystem-backed lock
//!
//! For fine-grained control, depend on the individual crates instead.

// Re-export core types and traits
pub use process_lock_core::*;

// Re-export the filesystem backend
#[allow(ambiguous_glob_reexports)]
pub use process_lock_fs::*;
