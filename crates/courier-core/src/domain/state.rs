//! WorkState - unit-of-work のライフサイクル状態
//!
//! # 状態遷移
//! - Pending -start-> Executing -finish-> Finished
//! - Pending -cancel-> Cancelled -start-> Finished（作業なし）
//! - Executing -cancel-> Cancelled -finish-> Finished
//!
//! Finished は終端。どこからも戻らない。

use serde::{Deserialize, Serialize};

/// Lifecycle state of a schedulable unit of work.
///
/// Stored as a `u8` inside an atomic, hence the explicit discriminants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum WorkState {
    /// Created, not yet started by the runner.
    Pending = 0,
    /// Started; work is in flight.
    Executing = 1,
    /// Terminal.
    Finished = 2,
    /// Cancellation was requested; `Finished` follows.
    Cancelled = 3,
}

impl WorkState {
    pub fn is_finished(self) -> bool {
        matches!(self, WorkState::Finished)
    }

    /// Whether `self -> next` is a legal edge of the state machine.
    pub fn can_transition_to(self, next: WorkState) -> bool {
        use WorkState::*;
        matches!(
            (self, next),
            (Pending, Executing)
                | (Pending, Cancelled)
                | (Executing, Cancelled)
                | (Executing, Finished)
                | (Cancelled, Finished)
        )
    }
}

impl From<u8> for WorkState {
    fn from(value: u8) -> Self {
        match value {
            0 => Self::Pending,
            1 => Self::Executing,
            2 => Self::Finished,
            // 3 と 4（開始前の cancel）はどちらも Cancelled
            _ => Self::Cancelled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(WorkState::Pending)]
    #[case(WorkState::Executing)]
    #[case(WorkState::Finished)]
    #[case(WorkState::Cancelled)]
    fn u8_conversion_is_lossless(#[case] state: WorkState) {
        assert_eq!(WorkState::from(state as u8), state);
    }

    #[test]
    fn finished_is_terminal() {
        for next in [
            WorkState::Pending,
            WorkState::Executing,
            WorkState::Finished,
            WorkState::Cancelled,
        ] {
            assert!(!WorkState::Finished.can_transition_to(next));
        }
    }

    #[test]
    fn pending_cannot_skip_to_finished() {
        assert!(!WorkState::Pending.can_transition_to(WorkState::Finished));
    }

    #[test]
    fn cancelled_only_moves_to_finished() {
        assert!(WorkState::Cancelled.can_transition_to(WorkState::Finished));
        assert!(!WorkState::Cancelled.can_transition_to(WorkState::Executing));
        assert!(!WorkState::Cancelled.can_transition_to(WorkState::Pending));
    }

    #[test]
    fn state_serializes_as_screaming_snake_case() {
        let s = serde_json::to_string(&WorkState::Executing).unwrap();
        assert_eq!(s, "\"EXECUTING\"");
    }
}
