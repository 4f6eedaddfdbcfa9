//! Domain model: lifecycle states, requests, outcomes, errors.

pub mod errors;
pub mod ids;
pub mod outcome;
pub mod request;
pub mod state;

pub use errors::{ErrorKind, UploadError};
pub use ids::TaskId;
pub use outcome::{UploadOutcome, UploadResult, classify};
pub use request::UploadRequest;
pub use state::WorkState;
