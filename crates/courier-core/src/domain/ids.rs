//! Task identifiers.
//!
//! ULID を使うので、ログ上で生成順に並べられる。

use serde::{Deserialize, Serialize};
use std::fmt;
use ulid::Ulid;

/// Identifies one upload task for log correlation.
///
/// The id carries no lifecycle meaning; two tasks uploading the same payload
/// still get distinct ids.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TaskId(Ulid);

impl TaskId {
    /// 新しい TaskId を生成
    pub fn generate() -> Self {
        Self(Ulid::new())
    }

    pub fn from_ulid(ulid: Ulid) -> Self {
        Self(ulid)
    }

    pub fn as_ulid(&self) -> Ulid {
        self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "upload-{}", self.0)
    }
}
