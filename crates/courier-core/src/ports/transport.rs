//! UploadTransport port - HTTP upload の抽象化
//!
//! # テスト容易性
//! - 本番は `impls::HttpTransport`（reqwest）
//! - テストでは結果を台本どおりに返す fake を使う

use async_trait::async_trait;

use crate::domain::{UploadError, UploadRequest};

/// What the transport observed for one call.
///
/// `status` is `None` when no response arrived at all.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TransportResponse {
    pub status: Option<u16>,
    pub error: Option<UploadError>,
}

impl TransportResponse {
    pub fn status(status: u16) -> Self {
        Self {
            status: Some(status),
            error: None,
        }
    }

    pub fn with_error(mut self, error: UploadError) -> Self {
        self.error = Some(error);
        self
    }

    /// No response; the call failed below HTTP.
    pub fn failed(error: UploadError) -> Self {
        Self {
            status: None,
            error: Some(error),
        }
    }

    /// Completion synthesized when the call was aborted.
    pub fn cancelled() -> Self {
        Self::failed(UploadError::Cancelled)
    }

    /// Status code with the "no response" default applied.
    pub fn status_code(&self) -> u16 {
        self.status.unwrap_or(0)
    }
}

/// Performs one HTTP upload.
///
/// Implementations must not cache: every call reaches the network or fails.
/// Dropping the returned future aborts the call.
#[async_trait]
pub trait UploadTransport: Send + Sync {
    async fn upload(&self, request: &UploadRequest, body: Option<&[u8]>) -> TransportResponse;
}
