//! Lifecycle - スレッドセーフな unit-of-work の状態機械
//!
//! # 学習ポイント
//! - AtomicU8 + compare_exchange による lock-free な状態遷移
//! - watch チャネルで「終わったこと」を待てるようにする
//!
//! Upload 固有のことは何も知らない。`UploadTask` がこれを合成して使う。

use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};

use tokio::sync::watch;
use tracing::debug;

use crate::domain::WorkState;

/// What `begin` decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Begin {
    /// Pending -> Executing; the caller must do the work and later `finish`.
    Run,
    /// Was cancelled before start; now Finished, no work to do.
    SkippedCancelled,
    /// Already running (a mid-flight cancel counts) or finished; `start` was called twice.
    AlreadyStarted,
}

/// Cancelled, reached from Pending. Reads back as `WorkState::Cancelled`;
/// only `begin` tells it apart from a cancel that arrived while executing.
const CANCELLED_BEFORE_START: u8 = 4;

/// Lifecycle state shared by every unit of work.
///
/// All transitions go through a CAS loop, so `begin`, `cancel` and `finish`
/// may race from any thread.
#[derive(Debug)]
pub struct Lifecycle {
    state: AtomicU8,
    cancel_notified: AtomicBool,
    succeeded: AtomicBool,
    finished_tx: watch::Sender<bool>,
}

impl Lifecycle {
    pub fn new() -> Self {
        let (finished_tx, _) = watch::channel(false);
        Self {
            state: AtomicU8::new(WorkState::Pending as u8),
            cancel_notified: AtomicBool::new(false),
            succeeded: AtomicBool::new(false),
            finished_tx,
        }
    }

    pub fn state(&self) -> WorkState {
        WorkState::from(self.state.load(Ordering::Acquire))
    }

    /// Whether `cancel` was observed before the unit finished.
    pub fn is_cancel_notified(&self) -> bool {
        self.cancel_notified.load(Ordering::Acquire)
    }

    /// The `success` flag passed to the effective `finish` call.
    pub fn finished_successfully(&self) -> bool {
        self.state().is_finished() && self.succeeded.load(Ordering::Acquire)
    }

    /// Entry point for `start`.
    pub fn begin(&self) -> Begin {
        if self.transition(WorkState::Executing).is_some() {
            debug!("lifecycle: pending -> executing");
            return Begin::Run;
        }
        // 実行中に来た cancel は完了ハンドラが Finished にする
        if self.state.load(Ordering::Acquire) == CANCELLED_BEFORE_START && self.finish(false) {
            return Begin::SkippedCancelled;
        }
        Begin::AlreadyStarted
    }

    /// Marks the unit Cancelled unless it already finished.
    ///
    /// Returns `true` if this call performed the transition.
    pub fn cancel(&self) -> bool {
        match self.transition_with(WorkState::Cancelled, |from| match from {
            WorkState::Pending => CANCELLED_BEFORE_START,
            _ => WorkState::Cancelled as u8,
        }) {
            Some(prev) => {
                self.cancel_notified.store(true, Ordering::Release);
                debug!(from = ?prev, "lifecycle: cancelled");
                true
            }
            None => false,
        }
    }

    /// Moves to Finished.
    ///
    /// Idempotent: only the first call returns `true` and wakes waiters.
    pub fn finish(&self, success: bool) -> bool {
        match self.transition(WorkState::Finished) {
            Some(prev) => {
                self.succeeded.store(success, Ordering::Release);
                self.finished_tx.send_replace(true);
                debug!(from = ?prev, success, "lifecycle: finished");
                true
            }
            None => false,
        }
    }

    /// Resolves once `finish` has taken effect.
    pub async fn wait_finished(&self) {
        let mut rx = self.finished_tx.subscribe();
        // sender は self が持っているので Err にはならない
        let _ = rx.wait_for(|done| *done).await;
    }

    fn transition(&self, next: WorkState) -> Option<WorkState> {
        self.transition_with(next, |_| next as u8)
    }

    fn transition_with(
        &self,
        next: WorkState,
        encode: impl Fn(WorkState) -> u8,
    ) -> Option<WorkState> {
        let mut current = self.state.load(Ordering::Acquire);
        loop {
            let from = WorkState::from(current);
            if !from.can_transition_to(next) {
                return None;
            }
            match self.state.compare_exchange_weak(
                current,
                encode(from),
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return Some(from),
                Err(actual) => current = actual,
            }
        }
    }
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}
