//! Error types for display discovery and change requests

use thiserror::Error;

use crate::types::{DisplayChangeStatus, ModeField};

/// Result type alias for display operations
pub type Result<T> = std::result::Result<T, DisplayError>;

/// Everything that can go wrong while building the registry or applying a change.
///
/// Validation variants (`InvalidDisplayIndex` through `ScaleUnavailable`) are
/// raised before the platform is touched. `ApplyRejected` and `ScaleRejected`
/// carry the platform's own status so it can be reported verbatim.
#[derive(Debug, Error)]
pub enum DisplayError {
    /// A platform query failed while discovering outputs.
    #[error("{operation} failed with status {code}")]
    PlatformQueryFailed { operation: &'static str, code: u32 },

    #[error("Invalid display number {requested}, expected 1 to {count}")]
    InvalidDisplayIndex { requested: usize, count: usize },

    #[error("Invalid video mode {requested}, expected 1 to {count}")]
    InvalidVideoMode { requested: usize, count: usize },

    #[error("Invalid orientation {0}, available values are 0, 90, 180, 270")]
    InvalidOrientation(u32),

    /// The named constraint removed every remaining candidate.
    #[error("Can't find video mode with {field}={value}")]
    NoMatchingMode { field: ModeField, value: u32 },

    #[error("No available video modes found")]
    NoModesAvailable,

    #[error("Invalid scale {requested}%, available range from {minimum}% to {maximum}%")]
    ScaleOutOfRange {
        requested: u32,
        minimum: u32,
        maximum: u32,
    },

    #[error("Display {display} does not report a DPI scale range")]
    ScaleUnavailable { display: usize },

    /// The platform refused the mode change.
    #[error("{} (status {})", .0.description(), .0.code())]
    ApplyRejected(DisplayChangeStatus),

    #[error("Setting DPI scale failed with status {code}")]
    ScaleRejected { code: u32 },

    #[error("{0}")]
    Unsupported(&'static str),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid display fixture: {0}")]
    Fixture(#[from] serde_json::Error),
}
