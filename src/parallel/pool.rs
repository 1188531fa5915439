//! Rayon thread pool configuration for simulation workloads.
//!
//! Use [WorkerPool::install] to run batches or stat weights with a fixed number of threads,
//! or rely on Rayon's default (all CPU cores).

use rayon::ThreadPoolBuilder;

/// Configures how many worker threads are used for parallel batch execution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerPool {
    /// Number of worker threads. If 0, use the Rayon default.
    pub workers: usize,
}

impl WorkerPool {
    /// Use all available CPU cores.
    pub fn default_workers() -> Self {
        Self::default()
    }

    /// Use exactly `n` worker threads.
    pub fn with_workers(n: usize) -> Self {
        Self { workers: n }
    }

    /// Run a closure with this worker count. With 0 workers the global pool is used; otherwise a
    /// temporary pool is built. If that pool cannot be built the closure runs on the global pool.
    pub fn install<F, R>(&self, f: F) -> R
    where
        F: FnOnce() -> R + Send,
        R: Send,
    {
        if self.workers == 0 {
            return f();
        }
        match ThreadPoolBuilder::new().num_threads(self.workers).build() {
            Ok(pool) => pool.install(f),
            Err(error) => {
                tracing::warn!(workers = self.workers, %error, "falling back to global thread pool");
                f()
            }
        }
    }
}
