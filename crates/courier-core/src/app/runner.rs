//! TaskRunner - 並行に Operation を走らせるランナー
//!
//! - 同時実行数は Semaphore で制限する
//! - start() は即 return するので、permit は finished() まで保持する
//! - retry はしない（callback を受けた呼び出し側の責務）

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::app::config::UploaderConfig;
use crate::error::CourierError;
use crate::observability::RunnerCounts;
use crate::ports::Operation;

struct Tracked {
    op: Arc<dyn Operation>,
    join: JoinHandle<()>,
}

/// Runs submitted operations with bounded concurrency.
pub struct TaskRunner {
    permits: Arc<Semaphore>,
    closed: AtomicBool,
    tracked: Mutex<Vec<Tracked>>,
}

impl TaskRunner {
    pub fn new(max_concurrent: usize) -> Self {
        Self {
            permits: Arc::new(Semaphore::new(max_concurrent.max(1))),
            closed: AtomicBool::new(false),
            tracked: Mutex::new(Vec::new()),
        }
    }

    pub fn from_config(config: &UploaderConfig) -> Self {
        Self::new(config.max_concurrent_uploads)
    }

    /// Queue `op`; it starts once a slot is free.
    ///
    /// Must be called from within a tokio runtime.
    pub fn submit(&self, op: Arc<dyn Operation>) -> Result<(), CourierError> {
        if self.closed.load(Ordering::Acquire) {
            return Err(CourierError::RunnerClosed);
        }
        let handle = tokio::runtime::Handle::try_current()
            .map_err(|e| CourierError::NoRuntime(e.to_string()))?;

        let permits = Arc::clone(&self.permits);
        let worker_op = Arc::clone(&op);
        let join = handle.spawn(async move {
            // close() していないので Err にはならない
            let Ok(_permit) = permits.acquire_owned().await else {
                return;
            };
            Arc::clone(&worker_op).start();
            worker_op.finished().await;
        });

        let mut tracked = self.lock_tracked();
        tracked.retain(|t| !t.join.is_finished());
        tracked.push(Tracked { op, join });
        debug!(tracked = tracked.len(), "operation submitted");
        Ok(())
    }

    /// Cancel every operation that has not finished yet.
    pub fn cancel_all(&self) {
        let tracked = self.lock_tracked();
        for t in tracked.iter() {
            t.op.cancel();
        }
        debug!(count = tracked.len(), "cancel requested for all operations");
    }

    /// Stop accepting new operations. In-flight ones keep running.
    pub fn request_shutdown(&self) {
        self.closed.store(true, Ordering::Release);
    }

    pub fn counts(&self) -> RunnerCounts {
        let tracked = self.lock_tracked();
        let mut counts = RunnerCounts::default();
        for t in tracked.iter() {
            counts.record(t.op.state());
        }
        counts
    }

    /// Shutdown and wait for every submitted operation to finish.
    pub async fn shutdown_and_join(&self) {
        self.request_shutdown();
        let tracked = std::mem::take(&mut *self.lock_tracked());
        for t in tracked {
            let _ = t.join.await;
        }
    }

    fn lock_tracked(&self) -> MutexGuard<'_, Vec<Tracked>> {
        self.tracked.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
