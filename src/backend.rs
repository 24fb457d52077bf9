//! Numeric backend shared by the convolution stage.
//!
//! The backend owns a rayon thread pool that is built lazily on first use and
//! reused for every subsequent call. Detectors receive the backend explicitly
//! (`OmrDetector::with_backend`), so tests can run against isolated instances
//! while applications share [`ComputeBackend::shared`].
use log::{debug, warn};
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::sync::OnceLock;

#[derive(Debug, Default)]
pub struct ComputeBackend {
    threads: Option<usize>,
    pool: OnceLock<Option<ThreadPool>>,
}

static SHARED: OnceLock<ComputeBackend> = OnceLock::new();

impl ComputeBackend {
    /// Backend sized by rayon's defaults (one worker per logical core).
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend with a fixed number of worker threads.
    pub fn with_threads(threads: usize) -> Self {
        Self {
            threads: Some(threads.max(1)),
            pool: OnceLock::new(),
        }
    }

    /// Process-wide backend, initialized on first access.
    pub fn shared() -> &'static ComputeBackend {
        SHARED.get_or_init(ComputeBackend::new)
    }

    /// Whether the thread pool has been built yet.
    pub fn is_initialized(&self) -> bool {
        self.pool.get().is_some()
    }

    fn pool(&self) -> Option<&ThreadPool> {
        self.pool
            .get_or_init(|| {
                let mut builder = ThreadPoolBuilder::new().thread_name(|i| format!("omr-worker-{i}"));
                if let Some(n) = self.threads {
                    builder = builder.num_threads(n);
                }
                match builder.build() {
                    Ok(pool) => {
                        debug!(
                            "ComputeBackend initialized threads={}",
                            pool.current_num_threads()
                        );
                        Some(pool)
                    }
                    Err(err) => {
                        warn!("ComputeBackend: thread pool unavailable ({err}), running inline");
                        None
                    }
                }
            })
            .as_ref()
    }

    /// Run `op` inside the backend's pool. Falls back to the calling thread
    /// when the pool could not be created.
    pub fn install<R, F>(&self, op: F) -> R
    where
        F: FnOnce() -> R + Send,
        R: Send,
    {
        match self.pool() {
            Some(pool) => pool.install(op),
            None => op(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_is_built_lazily() {
        let backend = ComputeBackend::with_threads(2);
        assert!(!backend.is_initialized());
        let sum: u32 = backend.install(|| (1..=4).sum());
        assert_eq!(sum, 10);
        assert!(backend.is_initialized());
    }

    #[test]
    fn shared_backend_is_a_single_instance() {
        let a = ComputeBackend::shared() as *const ComputeBackend;
        let b = ComputeBackend::shared() as *const ComputeBackend;
        assert_eq!(a, b);
    }
}
