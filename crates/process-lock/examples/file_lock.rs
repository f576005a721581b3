//! Example: coordinating access to a shared resource with a file lock.
//!
//! Run with: `cargo run --example file_lock`

use process_lock::{FileLock, LockError};
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = std::env::temp_dir().join("process-lock-example.lock");
    let lock = FileLock::new(&path)?;
    println!("Bound lock at {}", path.display());

    // Non-blocking attempt first.
    if lock.try_lock().await? {
        println!("Lock acquired without waiting");

        // Do some work while holding the lock.
        tokio::time::sleep(Duration::from_millis(500)).await;

        lock.unlock().await?;
        println!("Lock released");
    } else {
        println!("Lock is currently held by another process");
    }

    // Blocking acquisition with the built-in 3 second deadline.
    match lock.lock().await {
        Ok(()) => println!("Lock acquired"),
        Err(LockError::AcquireTimeout) => {
            println!("Another process held the lock for the whole wait");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    }

    // Tear the lock domain down: release and delete the backing file.
    lock.destroy().await?;
    println!("Lock destroyed");

    Ok(())
}
