//! Outcome model: what the caller learns from one upload attempt.
//!
//! The boolean `success` is the only thing the retry logic upstream looks at.
//! It is deliberately decoupled from the raw status code: a 4xx is reported
//! as "handled" so the payload is dropped instead of retried forever.

use serde::{Deserialize, Serialize};

use super::errors::UploadError;

/// Diagnostic classification of an attempt.
///
/// Serialized as SCREAMING_SNAKE_CASE (`HTTP_STATUS`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UploadResult {
    /// The server answered with a status we act on (2xx or 4xx).
    HttpStatus(u16),
    /// No usable answer; try again later.
    RecoverableFailure,
}

/// Verdict handed to the completion callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadOutcome {
    pub success: bool,
    pub error: Option<UploadError>,
    pub result: UploadResult,
}

impl UploadOutcome {
    pub fn is_retryable(&self) -> bool {
        !self.success
    }

    pub fn into_parts(self) -> (bool, Option<UploadError>) {
        (self.success, self.error)
    }
}

/// Apply the response classification table.
///
/// `status` is 0 when no response arrived.
///
/// | status    | success | error       |
/// |-----------|---------|-------------|
/// | 200..=299 | true    | None        |
/// | 400..=499 | true    | passthrough |
/// | other     | false   | passthrough |
pub fn classify(status: u16, error: Option<UploadError>) -> UploadOutcome {
    match status {
        200..=299 => UploadOutcome {
            success: true,
            error: None,
            result: UploadResult::HttpStatus(status),
        },
        400..=499 => UploadOutcome {
            success: true,
            error,
            result: UploadResult::HttpStatus(status),
        },
        _ => UploadOutcome {
            success: false,
            error,
            result: UploadResult::RecoverableFailure,
        },
    }
}
