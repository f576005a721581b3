//! Filesystem-backed cross-process lock.

pub mod lock;
pub mod primitive;

pub use lock::{FileLock, ACQUIRE_TIMEOUT};
pub use primitive::FsAdvisoryLock;
