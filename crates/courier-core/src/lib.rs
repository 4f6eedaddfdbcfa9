//! courier-core
//!
//! Single-attempt upload tasks for a telemetry pipeline.
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（WorkState, UploadRequest, UploadOutcome, UploadError）
//! - **ports**: 抽象化レイヤー（Operation, UploadTransport, BackgroundExtension）
//! - **app**: Lifecycle, UploadTask, TaskRunner, 設定
//! - **impls**: 実装（HttpTransport, NoopExtension, DeadlineExtension）

pub mod app;
pub mod domain;
pub mod error;
pub mod impls;
pub mod observability;
pub mod ports;

pub use app::{TaskRunner, UploadTask, UploadTaskBuilder, UploaderConfig};
pub use domain::{UploadError, UploadOutcome, UploadRequest, WorkState, classify};
pub use error::CourierError;
pub use ports::Operation;
