//! Ports - 外部との境界
//!
//! 各 trait はホスト環境や HTTP クライアントへのインターフェースを提供し、
//! 実装の詳細を隠蔽する。

pub mod background;
pub mod operation;
pub mod transport;

pub use self::background::{BackgroundExtension, ExpiryHandler, ExtensionToken};
pub use self::operation::Operation;
pub use self::transport::{TransportResponse, UploadTransport};
