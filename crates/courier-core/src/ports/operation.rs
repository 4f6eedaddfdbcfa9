//! Operation port - runner から見た unit-of-work
//!
//! runner は upload の中身を知らずに start / cancel だけを呼ぶ。

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::WorkState;

/// A schedulable, cancellable unit of work.
///
/// # Contract
/// - `start` returns once the work has been submitted; it never blocks on it.
/// - `cancel` is safe before, during, or after `start`, and never panics.
/// - every operation eventually reaches `WorkState::Finished` once started,
///   which is what `finished` waits for.
#[async_trait]
pub trait Operation: Send + Sync {
    fn start(self: Arc<Self>);

    fn cancel(&self);

    fn state(&self) -> WorkState;

    /// Resolves when the operation reaches `Finished`.
    async fn finished(&self);
}
