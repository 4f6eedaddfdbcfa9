//! BackgroundExtension の実装
//!
//! - **NoopExtension**: 延長の概念がないホスト用（サーバ、デスクトップ）
//! - **DeadlineExtension**: 猶予時間が過ぎると expiry を呼ぶホストの模擬

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::ports::{BackgroundExtension, ExpiryHandler, ExtensionToken};

/// Grants every request and never expires.
#[derive(Debug, Default)]
pub struct NoopExtension {
    next: AtomicU64,
}

impl NoopExtension {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BackgroundExtension for NoopExtension {
    fn acquire(&self, _name: &str, on_expire: ExpiryHandler) -> ExtensionToken {
        drop(on_expire);
        ExtensionToken::new(self.next.fetch_add(1, Ordering::Relaxed) + 1)
    }

    fn release(&self, _token: ExtensionToken) {}
}

/// Expires each grant after a fixed grace period unless released first.
///
/// Expiry timers run on the current tokio runtime; without one, grants never
/// expire.
#[derive(Debug)]
pub struct DeadlineExtension {
    grace: Duration,
    next: AtomicU64,
    timers: Mutex<HashMap<u64, CancellationToken>>,
}

impl DeadlineExtension {
    pub fn new(grace: Duration) -> Self {
        Self {
            grace,
            next: AtomicU64::new(0),
            timers: Mutex::new(HashMap::new()),
        }
    }

    /// Grants not yet released.
    pub fn active(&self) -> usize {
        self.lock_timers().len()
    }

    fn lock_timers(&self) -> MutexGuard<'_, HashMap<u64, CancellationToken>> {
        self.timers.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl BackgroundExtension for DeadlineExtension {
    fn acquire(&self, name: &str, on_expire: ExpiryHandler) -> ExtensionToken {
        let raw = self.next.fetch_add(1, Ordering::Relaxed) + 1;
        let cancel = CancellationToken::new();
        self.lock_timers().insert(raw, cancel.clone());

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let grace = self.grace;
                let name = name.to_string();
                handle.spawn(async move {
                    tokio::select! {
                        _ = cancel.cancelled() => {}
                        _ = tokio::time::sleep(grace) => {
                            warn!(token = raw, %name, "background extension deadline reached");
                            on_expire();
                        }
                    }
                });
            }
            Err(_) => debug!(token = raw, "no runtime; extension will not expire"),
        }
        ExtensionToken::new(raw)
    }

    fn release(&self, token: ExtensionToken) {
        let timer = self.lock_timers().remove(&token.raw());
        match timer {
            Some(cancel) => cancel.cancel(),
            None => warn!(token = token.raw(), "release of unknown extension token"),
        }
    }
}
