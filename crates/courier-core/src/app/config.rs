//! UploaderConfig - transport と runner の設定
//!
//! JSON で読み込む。省略したフィールドは Default の値になる。

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::CourierError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UploaderConfig {
    /// Whole-request timeout.
    pub request_timeout_ms: u64,
    pub connect_timeout_ms: u64,
    /// How many upload tasks a runner executes at once.
    pub max_concurrent_uploads: usize,
    /// Grace period granted by `DeadlineExtension` before it expires.
    pub extension_grace_ms: u64,
    pub user_agent: String,
}

impl Default for UploaderConfig {
    fn default() -> Self {
        Self {
            request_timeout_ms: 30_000,
            connect_timeout_ms: 10_000,
            max_concurrent_uploads: 4,
            extension_grace_ms: 30_000,
            user_agent: format!("courier/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl UploaderConfig {
    pub fn from_json_str(raw: &str) -> Result<Self, CourierError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, CourierError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn validate(&self) -> Result<(), CourierError> {
        if self.max_concurrent_uploads == 0 {
            return Err(CourierError::InvalidConfig(
                "max_concurrent_uploads must be at least 1".to_string(),
            ));
        }
        if self.request_timeout_ms == 0 || self.connect_timeout_ms == 0 {
            return Err(CourierError::InvalidConfig(
                "timeouts must be non-zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn extension_grace(&self) -> Duration {
        Duration::from_millis(self.extension_grace_ms)
    }
}
