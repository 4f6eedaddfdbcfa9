//! UploadTask - 1 回分の ping upload
//!
//! # フロー
//! 1. `start`: cancel 済みなら何もせず Finished
//! 2. background extension を取得
//! 3. transport に upload を投げて即 return（tokio::spawn）
//! 4. 完了ハンドラ: status 分類 → callback → extension 解放 → finish
//!
//! extension は Finished になる前に解放する。`finished()` を待った側からは
//! 解放済みに見える。
//!
//! cancel が実行中に来た場合は transport の future を捨て、
//! `UploadError::Cancelled` で完了を合成する。callback は必ず 1 回呼ばれる。

use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, Span, debug, info, info_span, warn};

use crate::app::extension::ExtensionLease;
use crate::app::lifecycle::{Begin, Lifecycle};
use crate::domain::{TaskId, UploadError, UploadRequest, WorkState, classify};
use crate::ports::{BackgroundExtension, Operation, TransportResponse, UploadTransport};

/// Name under which the background extension is requested.
pub const UPLOAD_EXTENSION_NAME: &str = "courier.upload";

/// `(success, error)`; invoked at most once.
pub type UploadCallback = Box<dyn FnOnce(bool, Option<UploadError>) + Send + 'static>;

/// One upload attempt of a pre-built request.
pub struct UploadTask {
    id: TaskId,
    request: UploadRequest,
    payload: Option<Vec<u8>>,
    callback: Mutex<Option<UploadCallback>>,
    transport: Arc<dyn UploadTransport>,
    extension: Arc<ExtensionLease>,
    lifecycle: Lifecycle,
    in_flight: CancellationToken,
    span: Span,
}

impl UploadTask {
    pub fn new(
        request: UploadRequest,
        payload: Option<Vec<u8>>,
        transport: Arc<dyn UploadTransport>,
        extension: Arc<dyn BackgroundExtension>,
        callback: UploadCallback,
    ) -> Arc<Self> {
        let id = TaskId::generate();
        let span = info_span!("upload_task", task_id = %id, url = %request.url);
        Arc::new(Self {
            id,
            request,
            payload,
            callback: Mutex::new(Some(callback)),
            transport,
            extension: ExtensionLease::new(extension),
            lifecycle: Lifecycle::new(),
            in_flight: CancellationToken::new(),
            span,
        })
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn request(&self) -> &UploadRequest {
        &self.request
    }

    pub fn payload(&self) -> Option<&[u8]> {
        self.payload.as_deref()
    }

    pub fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    pub fn extension_released(&self) -> bool {
        self.extension.is_released()
    }

    fn begin_upload(self: Arc<Self>) {
        self.extension.acquire(UPLOAD_EXTENSION_NAME);

        let handle = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(e) => {
                warn!(error = %e, "no async runtime; upload not submitted");
                self.complete(TransportResponse::failed(UploadError::Transport(format!(
                    "no async runtime: {e}"
                ))));
                return;
            }
        };

        let task = Arc::clone(&self);
        let span = self.span.clone();
        handle.spawn(
            async move {
                let response = tokio::select! {
                    biased;
                    _ = task.in_flight.cancelled() => {
                        debug!("upload aborted by cancel");
                        TransportResponse::cancelled()
                    }
                    response = task.transport.upload(&task.request, task.payload.as_deref()) => response,
                };
                task.complete(response);
            }
            .instrument(span),
        );
        debug!("upload submitted");
    }

    /// Completion handler; runs once per attempt.
    fn complete(&self, response: TransportResponse) {
        let _finalize = Finalize(self);

        let status = response.status_code();
        if let Some(error) = &response.error {
            warn!(status, %error, "upload reported an error");
        }
        let outcome = classify(status, response.error);
        info!(
            status,
            success = outcome.success,
            result = ?outcome.result,
            "upload finished"
        );

        let callback = self
            .callback
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        match callback {
            Some(callback) => callback(outcome.success, outcome.error),
            None => warn!("completion delivered twice; callback already consumed"),
        }
    }
}

/// Runs after the callback, even if it panics: release, then finish.
struct Finalize<'a>(&'a UploadTask);

impl Drop for Finalize<'_> {
    fn drop(&mut self) {
        self.0.extension.release();
        self.0.lifecycle.finish(true);
    }
}

#[async_trait]
impl Operation for UploadTask {
    fn start(self: Arc<Self>) {
        let _entered = self.span.clone().entered();
        match self.lifecycle.begin() {
            Begin::Run => self.begin_upload(),
            Begin::SkippedCancelled => debug!("cancelled before start; no upload"),
            Begin::AlreadyStarted => warn!("start called on a task that already started"),
        }
    }

    fn cancel(&self) {
        let _entered = self.span.enter();
        self.in_flight.cancel();
        self.lifecycle.cancel();
    }

    fn state(&self) -> WorkState {
        self.lifecycle.state()
    }

    async fn finished(&self) {
        self.lifecycle.wait_finished().await;
    }
}

impl std::fmt::Debug for UploadTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadTask")
            .field("id", &self.id)
            .field("request", &self.request)
            .field("payload_len", &self.payload.as_ref().map(Vec::len))
            .field("state", &self.lifecycle.state())
            .finish_non_exhaustive()
    }
}
