//! Platform display services.
//!
//! The registry and the change planners only talk to [`DisplayPlatform`]. Two
//! implementations exist:
//! - `native`: Win32 GDI and DisplayConfig calls (Windows only)
//! - [`simulated`]: an in-memory layout, loadable from JSON

use crate::errors::Result;
use crate::types::{ActiveConfig, AdapterId, DisplayDevice, ModeFields, RawScaleRange, VideoMode};

pub mod simulated;

#[cfg(target_os = "windows")]
pub mod native;

pub use simulated::SimulatedPlatform;

#[cfg(target_os = "windows")]
pub use native::NativePlatform;

/// Operations the OS display-configuration subsystem has to provide.
pub trait DisplayPlatform {
    /// Every output known to the legacy device enumeration, attached or not.
    fn enumerate_devices(&self) -> Result<Vec<DisplayDevice>>;

    /// Raw mode records for one output, duplicates included.
    fn enumerate_modes(&self, device_name: &str) -> Result<Vec<VideoMode>>;

    fn current_mode(&self, device_name: &str) -> Result<VideoMode>;

    /// Active configuration paths and their mode blocks.
    fn active_config(&self) -> Result<ActiveConfig>;

    fn target_name(&self, adapter_id: AdapterId, target_id: u32) -> Result<String>;

    fn dpi_scale_range(&self, adapter_id: AdapterId, source_id: u32) -> Result<RawScaleRange>;

    /// Set the DPI scale as a step offset from the recommended scale.
    fn set_dpi_scale(&mut self, adapter_id: AdapterId, source_id: u32, relative: i32)
        -> Result<()>;

    /// Apply a mode and return the platform's signed status code.
    fn apply_mode(
        &mut self,
        device_name: &str,
        mode: &VideoMode,
        fields: ModeFields,
        persist: bool,
    ) -> i32;
}

impl<P: DisplayPlatform + ?Sized> DisplayPlatform for Box<P> {
    fn enumerate_devices(&self) -> Result<Vec<DisplayDevice>> {
        (**self).enumerate_devices()
    }

    fn enumerate_modes(&self, device_name: &str) -> Result<Vec<VideoMode>> {
        (**self).enumerate_modes(device_name)
    }

    fn current_mode(&self, device_name: &str) -> Result<VideoMode> {
        (**self).current_mode(device_name)
    }

    fn active_config(&self) -> Result<ActiveConfig> {
        (**self).active_config()
    }

    fn target_name(&self, adapter_id: AdapterId, target_id: u32) -> Result<String> {
        (**self).target_name(adapter_id, target_id)
    }

    fn dpi_scale_range(&self, adapter_id: AdapterId, source_id: u32) -> Result<RawScaleRange> {
        (**self).dpi_scale_range(adapter_id, source_id)
    }

    fn set_dpi_scale(
        &mut self,
        adapter_id: AdapterId,
        source_id: u32,
        relative: i32,
    ) -> Result<()> {
        (**self).set_dpi_scale(adapter_id, source_id, relative)
    }

    fn apply_mode(
        &mut self,
        device_name: &str,
        mode: &VideoMode,
        fields: ModeFields,
        persist: bool,
    ) -> i32 {
        (**self).apply_mode(device_name, mode, fields, persist)
    }
}
