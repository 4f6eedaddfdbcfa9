//! Impls - ports の実装
//!
//! # 含まれる実装
//! - **HttpTransport**: reqwest ベースの UploadTransport
//! - **NoopExtension**: 延長なしのホスト
//! - **DeadlineExtension**: 猶予時間つきのホスト（テスト・デモ用）

pub mod background;
pub mod http_transport;

pub use self::background::{DeadlineExtension, NoopExtension};
pub use self::http_transport::HttpTransport;
