//! Display output discovery and video mode / DPI scale changes.
//!
//! This crate provides:
//! - A [`DisplayRegistry`] of attached outputs, reconciling the legacy
//!   per-output mode enumeration with the active configuration paths
//! - Best-fit mode selection from a partially specified [`ModeRequest`]
//! - Translation between DPI scale percentages and the relative step offsets
//!   the platform accepts
//!
//! All OS access goes through the [`DisplayPlatform`] trait. The native
//! implementation only exists on Windows; [`SimulatedPlatform`] runs anywhere
//! and is what the tests use.
//!
//! Notes:
//! - The registry is a snapshot. Applying a change does not refresh it; build a
//!   new [`DisplayManager`] to observe the new state.

#![cfg_attr(not(target_os = "windows"), allow(unused))]

use tracing::instrument;

pub mod catalog;
pub mod errors;
pub mod manager;
pub mod platforms;
pub mod registry;
pub mod scale;
pub mod selector;
pub mod types;

#[cfg(test)]
mod tests;

pub use catalog::ModeCatalog;
pub use errors::{DisplayError, Result};
pub use manager::DisplayManager;
pub use platforms::{DisplayPlatform, SimulatedPlatform};
pub use registry::{DisplayRegistry, Output};
pub use scale::{ScaleInfo, SCALE_STEPS};
pub use selector::ModeRequest;
pub use types::{
    ChangeOutcome, DisplayChangeStatus, ModeField, ModeFields, Orientation, PathFields, PathInfo,
    VideoMode,
};

#[cfg(target_os = "windows")]
pub use platforms::NativePlatform;

/// Open the live platform display service of this machine.
#[instrument]
pub fn native_platform() -> Result<Box<dyn DisplayPlatform>> {
    #[cfg(target_os = "windows")]
    {
        Ok(Box::new(platforms::NativePlatform::new()))
    }

    #[cfg(not(target_os = "windows"))]
    {
        Err(DisplayError::Unsupported("the native display backend is only available on Windows"))
    }
}
