use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors returned by telemetry payload decoding.
///
/// # Examples
/// ```
/// use ridelink_core::protocol::telemetry::TelemetryError;
///
/// let err = TelemetryError::InsufficientPayload { needed: 15, actual: 3 };
/// assert!(err.to_string().contains("payload too short"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TelemetryError {
    #[error("payload too short: need {needed} bytes, got {actual}")]
    InsufficientPayload { needed: usize, actual: usize },
}
