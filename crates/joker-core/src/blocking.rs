//! Blocking utilities for CPU-bound work.
//!
//! HTML parsing and text normalization run on Tokio's blocking threadpool so
//! a large page cannot stall the async runtime.

use crate::Error;

/// Execute a CPU-bound closure on Tokio's blocking threadpool.
///
/// A panic inside the closure comes back as `Error::Task`.
pub async fn run_blocking<F, T>(f: F) -> Result<T, Error>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| Error::Task(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_run_blocking_returns_value() {
        let value = run_blocking(|| 2 + 2).await.unwrap();
        assert_eq!(value, 4);
    }

    #[tokio::test]
    async fn test_run_blocking_panic_is_error() {
        let result: Result<(), Error> = run_blocking(|| panic!("boom")).await;
        assert!(matches!(result, Err(Error::Task(_))));
    }
}
