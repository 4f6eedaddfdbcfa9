//! BackgroundExtension port - ホスト環境の「バックグラウンド延長」
//!
//! モバイル OS ではアプリがサスペンドされる前に追加の実行時間を要求できる。
//! それ以外のホストでは `NoopExtension` で十分。

/// Called by the host when the granted time runs out.
pub type ExpiryHandler = Box<dyn FnOnce() + Send + 'static>;

/// Opaque handle for one granted extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExtensionToken(u64);

impl ExtensionToken {
    /// The host refused the request; nothing to release.
    pub const INVALID: ExtensionToken = ExtensionToken(0);

    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }

    pub fn is_valid(self) -> bool {
        self != Self::INVALID
    }
}

/// Minimal capability for extended execution time.
///
/// Hosts drop the expiry handler once the token is released.
pub trait BackgroundExtension: Send + Sync {
    fn acquire(&self, name: &str, on_expire: ExpiryHandler) -> ExtensionToken;

    fn release(&self, token: ExtensionToken);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_token_is_zero() {
        assert!(!ExtensionToken::INVALID.is_valid());
        assert!(ExtensionToken::new(7).is_valid());
        assert_eq!(ExtensionToken::new(7).raw(), 7);
    }
}
