//! ExtensionLease - background extension を「ちょうど 1 回」解放する
//!
//! 解放経路は 2 つある:
//! 1. 完了ハンドラの最後（本来の経路）
//! 2. ホストからの expiry コールバック（保険）
//!
//! どちらが先でも、両方来ても、ホストの `release` は 1 回しか呼ばれない。

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, warn};

use crate::ports::{BackgroundExtension, ExtensionToken};

/// One task's claim on a background extension.
pub struct ExtensionLease {
    host: Arc<dyn BackgroundExtension>,
    token: Mutex<Option<ExtensionToken>>,
    released: AtomicBool,
}

impl ExtensionLease {
    pub fn new(host: Arc<dyn BackgroundExtension>) -> Arc<Self> {
        Arc::new(Self {
            host,
            token: Mutex::new(None),
            released: AtomicBool::new(false),
        })
    }

    /// Requests the extension from the host.
    ///
    /// The expiry handler keeps the lease alive until the host drops it.
    pub fn acquire(self: &Arc<Self>, name: &str) {
        let lease = Arc::clone(self);
        let token = self.host.acquire(
            name,
            Box::new(move || {
                warn!("background extension expired before upload completed");
                lease.release();
            }),
        );
        debug!(token = token.raw(), name, "background extension acquired");
        *self.lock_token() = Some(token);

        // expiry が acquire の戻りより先に走った場合、token はここで返す
        if self.released.load(Ordering::Acquire) {
            self.return_token();
        }
    }

    /// Releases the extension.
    ///
    /// Only the first call on a lease does anything; it returns `true`.
    pub fn release(&self) -> bool {
        if self
            .released
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return false;
        }
        self.return_token();
        true
    }

    pub fn is_released(&self) -> bool {
        self.released.load(Ordering::Acquire)
    }

    fn return_token(&self) {
        let token = self.lock_token().take();
        if let Some(token) = token.filter(|t| t.is_valid()) {
            debug!(token = token.raw(), "background extension released");
            self.host.release(token);
        }
    }

    fn lock_token(&self) -> std::sync::MutexGuard<'_, Option<ExtensionToken>> {
        self.token.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::ExpiryHandler;
    use std::sync::atomic::{AtomicU64, AtomicUsize};

    /// acquire 時に handler を保持し、テストから expire できるホスト
    #[derive(Default)]
    struct ManualHost {
        next: AtomicU64,
        handler: Mutex<Option<ExpiryHandler>>,
        releases: AtomicUsize,
        expire_during_acquire: bool,
    }

    impl ManualHost {
        fn expire(&self) {
            let handler = self.handler.lock().unwrap().take();
            if let Some(h) = handler {
                h();
            }
        }
    }

    impl BackgroundExtension for ManualHost {
        fn acquire(&self, _name: &str, on_expire: ExpiryHandler) -> ExtensionToken {
            if self.expire_during_acquire {
                on_expire();
            } else {
                *self.handler.lock().unwrap() = Some(on_expire);
            }
            ExtensionToken::new(self.next.fetch_add(1, Ordering::SeqCst) + 1)
        }

        fn release(&self, _token: ExtensionToken) {
            self.releases.fetch_add(1, Ordering::SeqCst);
            self.handler.lock().unwrap().take();
        }
    }

    struct RefusingHost;

    impl BackgroundExtension for RefusingHost {
        fn acquire(&self, _name: &str, _on_expire: ExpiryHandler) -> ExtensionToken {
            ExtensionToken::INVALID
        }

        fn release(&self, _token: ExtensionToken) {
            panic!("invalid tokens must never be released");
        }
    }

    #[test]
    fn release_twice_releases_once() {
        let host = Arc::new(ManualHost::default());
        let lease = ExtensionLease::new(host.clone());
        lease.acquire("test");
        assert!(lease.release());
        assert!(!lease.release());
        assert_eq!(host.releases.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn expiry_then_completion_releases_once() {
        let host = Arc::new(ManualHost::default());
        let lease = ExtensionLease::new(host.clone());
        lease.acquire("test");
        host.expire();
        assert!(lease.is_released());
        assert!(!lease.release());
        assert_eq!(host.releases.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn expiry_inside_acquire_still_returns_token() {
        let host = Arc::new(ManualHost {
            expire_during_acquire: true,
            ..Default::default()
        });
        let lease = ExtensionLease::new(host.clone());
        lease.acquire("test");
        assert!(lease.is_released());
        assert!(!lease.release());
        assert_eq!(host.releases.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn refused_extension_is_not_released() {
        let lease = ExtensionLease::new(Arc::new(RefusingHost));
        lease.acquire("test");
        assert!(lease.release());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn racing_release_paths_never_double_release() {
        for _ in 0..100 {
            let host = Arc::new(ManualHost::default());
            let lease = ExtensionLease::new(host.clone());
            lease.acquire("race");

            let a = {
                let host = host.clone();
                tokio::spawn(async move { host.expire() })
            };
            let b = {
                let lease = lease.clone();
                tokio::spawn(async move {
                    lease.release();
                })
            };
            a.await.unwrap();
            b.await.unwrap();
            assert_eq!(host.releases.load(Ordering::SeqCst), 1);
        }
    }
}
