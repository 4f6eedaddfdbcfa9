//! App - ports を組み合わせたアプリケーション層
//!
//! # 主要コンポーネント
//! - **Lifecycle**: unit-of-work の状態機械
//! - **ExtensionLease**: background extension の 1 回限りの解放
//! - **UploadTask**: 1 回分の upload
//! - **UploadTaskBuilder**: 組み立てと起動時検証
//! - **TaskRunner**: 並行実行
//! - **UploaderConfig**: 設定

pub mod builder;
pub mod config;
pub mod extension;
pub mod lifecycle;
pub mod runner;
pub mod upload_task;

pub use self::builder::{BuildError, UploadTaskBuilder};
pub use self::config::UploaderConfig;
pub use self::extension::ExtensionLease;
pub use self::lifecycle::{Begin, Lifecycle};
pub use self::runner::TaskRunner;
pub use self::upload_task::{UPLOAD_EXTENSION_NAME, UploadCallback, UploadTask};
