//! UploadRequest - 送信済み前提の request 記述子
//!
//! header や URL の組み立ては呼び出し側の責務。ここでは中身を解釈しない。

use serde::{Deserialize, Serialize};

/// A fully formed request descriptor.
///
/// Opaque to classification; only the transport reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadRequest {
    pub method: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub headers: Vec<(String, String)>,
}

impl UploadRequest {
    /// `POST url`, the common case for ping submission.
    pub fn post(url: impl Into<String>) -> Self {
        Self {
            method: "POST".to_string(),
            url: url.into(),
            headers: Vec::new(),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}
