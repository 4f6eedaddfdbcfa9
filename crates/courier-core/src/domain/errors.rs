//! Errors - アップロード失敗の分類

use thiserror::Error;

/// ErrorKind は運用上の分類
///
/// - Transient: 後でリトライすれば通る可能性がある
/// - Permanent: リトライしても無意味（payload は破棄される）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Transient,
    Permanent,
}

/// Why an upload attempt did not end in a 2xx response.
///
/// Delivered to the completion callback. `Clone` so that tests and callers
/// can keep a copy for diagnostics after handing one to the queue.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadError {
    /// No response: connect, DNS, TLS or timeout failure.
    #[error("transport error: {0}")]
    Transport(String),

    /// The server answered with a non-2xx status.
    #[error("server responded with HTTP {0}")]
    HttpStatus(u16),

    /// The in-flight call was aborted by `cancel()`.
    #[error("upload cancelled")]
    Cancelled,
}

impl UploadError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            UploadError::HttpStatus(status) if (400..500).contains(status) => ErrorKind::Permanent,
            _ => ErrorKind::Transient,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_are_permanent() {
        assert_eq!(UploadError::HttpStatus(404).kind(), ErrorKind::Permanent);
        assert_eq!(UploadError::HttpStatus(499).kind(), ErrorKind::Permanent);
    }

    #[test]
    fn everything_else_is_transient() {
        assert_eq!(UploadError::HttpStatus(503).kind(), ErrorKind::Transient);
        assert_eq!(UploadError::HttpStatus(302).kind(), ErrorKind::Transient);
        assert_eq!(
            UploadError::Transport("connection refused".into()).kind(),
            ErrorKind::Transient
        );
        assert_eq!(UploadError::Cancelled.kind(), ErrorKind::Transient);
    }

    #[test]
    fn display_mentions_status() {
        assert_eq!(
            UploadError::HttpStatus(500).to_string(),
            "server responded with HTTP 500"
        );
    }
}
