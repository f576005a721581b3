//! Convenience prelude for process lock types.

pub use crate::error::{LockError, LockResult};
pub use crate::traits::AdvisoryLock;
