use serde::{Deserialize, Serialize};

use crate::domain::WorkState;

/// Snapshot of the operations a runner currently tracks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunnerCounts {
    pub pending: usize,
    pub executing: usize,
    pub cancelled: usize,
    pub finished: usize,
}

impl RunnerCounts {
    pub fn record(&mut self, state: WorkState) {
        match state {
            WorkState::Pending => self.pending += 1,
            WorkState::Executing => self.executing += 1,
            WorkState::Cancelled => self.cancelled += 1,
            WorkState::Finished => self.finished += 1,
        }
    }

    pub fn in_flight(&self) -> usize {
        self.pending + self.executing + self.cancelled
    }
}
