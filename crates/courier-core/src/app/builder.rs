//! UploadTaskBuilder - UploadTask の組み立て
//!
//! # Fail-fast 設計
//! - transport と callback は必須。足りなければ build() が BuildError を返す
//! - extension は省略可能（NoopExtension）

use std::sync::Arc;

use crate::app::upload_task::{UploadCallback, UploadTask};
use crate::domain::{UploadError, UploadRequest};
use crate::impls::NoopExtension;
use crate::ports::{BackgroundExtension, UploadTransport};

/// Builds an [`UploadTask`].
///
/// ```ignore
/// let task = UploadTaskBuilder::new(UploadRequest::post(url))
///     .payload(body)
///     .transport(transport)
///     .on_complete(|success, error| { /* ... */ })
///     .build()?;
/// ```
pub struct UploadTaskBuilder {
    request: UploadRequest,
    payload: Option<Vec<u8>>,
    transport: Option<Arc<dyn UploadTransport>>,
    extension: Option<Arc<dyn BackgroundExtension>>,
    callback: Option<UploadCallback>,
}

/// BuildError は組み立て時のエラー
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("upload task for {0} has no transport")]
    MissingTransport(String),

    #[error("upload task for {0} has no completion callback")]
    MissingCallback(String),
}

impl UploadTaskBuilder {
    pub fn new(request: UploadRequest) -> Self {
        Self {
            request,
            payload: None,
            transport: None,
            extension: None,
            callback: None,
        }
    }

    pub fn payload(mut self, payload: impl Into<Vec<u8>>) -> Self {
        self.payload = Some(payload.into());
        self
    }

    pub fn transport(mut self, transport: Arc<dyn UploadTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn extension(mut self, extension: Arc<dyn BackgroundExtension>) -> Self {
        self.extension = Some(extension);
        self
    }

    pub fn on_complete<F>(mut self, callback: F) -> Self
    where
        F: FnOnce(bool, Option<UploadError>) + Send + 'static,
    {
        self.callback = Some(Box::new(callback));
        self
    }

    pub fn build(self) -> Result<Arc<UploadTask>, BuildError> {
        let transport = self
            .transport
            .ok_or_else(|| BuildError::MissingTransport(self.request.url.clone()))?;
        let callback = self
            .callback
            .ok_or_else(|| BuildError::MissingCallback(self.request.url.clone()))?;
        let extension = self
            .extension
            .unwrap_or_else(|| Arc::new(NoopExtension::new()));

        Ok(UploadTask::new(
            self.request,
            self.payload,
            transport,
            extension,
            callback,
        ))
    }
}
