//! Error types for tempo_animation
//!
//! The engine has deliberately few failure modes: invalid handles, stale
//! entries, and repeated cancellation are all defined as no-ops. The only
//! hard precondition is construction-time.

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when constructing animation units
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnimationError {
    /// A transition was constructed with a non-positive duration
    #[error("transition duration must be positive, got {0:?}")]
    InvalidDuration(Duration),
}

/// Result type for tempo_animation constructors
pub type Result<T> = std::result::Result<T, AnimationError>;
