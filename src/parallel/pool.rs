//! Rayon thread pool configuration for squad evaluation.
//!
//! Candidate squads are independent; [WorkerPool::install] runs a parallel
//! sweep either on the global Rayon pool or on a dedicated pool of fixed size.

use rayon::ThreadPoolBuilder;

/// Number of worker threads used when planning squads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerPool {
    /// Number of worker threads. If 0, use Rayon default (num_cpus).
    pub workers: usize,
}

impl WorkerPool {
    /// Use exactly `n` worker threads.
    pub fn with_workers(n: usize) -> Self {
        Self { workers: n }
    }

    /// Run a closure with this worker count. With 0 workers the global Rayon
    /// pool is used; a pool that fails to build also falls back to it.
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
            Err(err) => {
                tracing::warn!(%err, workers = self.workers, "using the global rayon pool");
                f()
            }
        }
    }
}
