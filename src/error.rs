//! Error definitions for drill configuration and startup validation

use crate::feedback::ContactState;
use thiserror::Error;

/// Errors raised while building the drill from configuration.
///
/// All of them are startup errors; once a drill is running, stop and cancel
/// operations never fail.
#[derive(Debug, Error)]
pub enum DrillError {
    /// The feedback table has no entry for a contact state
    #[error("Missing feedback entry for {0}")]
    MissingFeedbackEntry(ContactState),

    /// The feedback table lists a contact state twice
    #[error("Duplicate feedback entry for {0}")]
    DuplicateFeedbackEntry(ContactState),

    /// Rotation periods must be positive and finite
    #[error("Invalid rotation period {period} for {state}")]
    InvalidRotationPeriod { state: ContactState, period: f32 },

    /// A clip reference is empty
    #[error("Empty {channel} clip name for {state}")]
    EmptyClipName {
        state: ContactState,
        channel: &'static str,
    },

    /// Any other invalid configuration value
    #[error("Configuration error: {0}")]
    ConfigError(String),
}
