// src/grepo/pool.rs
// =============================================================================
// A bounded pool of "workers" shared by exploration and downloading.
//
// Every listing request and every raw download runs inside WorkerPool::run,
// which first takes one permit from a semaphore. With a pool of 100, at most
// 100 requests are in flight at once, no matter how wide the repository tree
// is or how many files are being downloaded.
//
// A permit is held only while the request itself runs. A directory that is
// waiting for its sub-directories holds nothing, so a tree deeper than the
// pool size can't starve the pool.
//
// Cloning a WorkerPool is cheap and all clones share the same permits.
// =============================================================================

use std::future::Future;
use std::sync::Arc;

use tokio::sync::Semaphore;

use crate::error::{KataError, Result};

pub const DEFAULT_POOL_SIZE: usize = 100;

#[derive(Debug, Clone)]
pub struct WorkerPool {
    permits: Arc<Semaphore>,
    size: usize,
}

impl WorkerPool {
    /// A pool of `size` workers (at least one)
    pub fn new(size: usize) -> Self {
        let size = size.max(1);
        Self {
            permits: Arc::new(Semaphore::new(size)),
            size,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Waits for a free worker, then runs `work` while holding it
    pub async fn run<F, T>(&self, work: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|_| KataError::WorkerPoolClosed)?;

        work.await
    }
}

impl Default for WorkerPool {
    fn default() -> Self {
        Self::new(DEFAULT_POOL_SIZE)
    }
}
