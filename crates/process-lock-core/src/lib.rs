//! Core traits and types for cross-process file locks.

pub mod error;
pub mod prelude;
pub mod traits;

pub use error::{LockError, LockResult};
pub use prelude::*;
