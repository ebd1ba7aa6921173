//! In-memory display layout that behaves like the native platform service.
//!
//! A layout is usually loaded from JSON:
//!
//! ```json
//! {
//!   "devices": [{
//!     "device": { "name": "\\\\.\\DISPLAY1", "device_string": "Simulated Adapter",
//!                 "state_flags": "ATTACHED_TO_DESKTOP | PRIMARY_DEVICE" },
//!     "modes": [{ "width": 1920, "height": 1080, "bits_per_pixel": 32, "frequency": 60 }]
//!   }],
//!   "paths": [{
//!     "path": { "adapter_id": { "low": 1, "high": 0 }, "source_id": 0, "target_id": 256 },
//!     "friendly_name": "DELL U2720Q",
//!     "scale": { "minimum": 0, "current": 0, "maximum": 3 }
//!   }]
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{DisplayError, Result};
use crate::platforms::DisplayPlatform;
use crate::types::{
    ActiveConfig, AdapterId, DisplayChangeStatus, DisplayDevice, ModeBlock, ModeFields,
    PathFields, PathInfo, RawScaleRange, VideoMode,
};

/// Status reported for lookups of unknown devices, paths or out-of-range offsets.
pub const ERROR_INVALID_PARAMETER: u32 = 87;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulatedDevice {
    pub device: DisplayDevice,
    #[serde(default)]
    pub modes: Vec<VideoMode>,
    /// Defaults to the first listed mode.
    #[serde(default)]
    pub current: Option<VideoMode>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulatedPath {
    pub path: PathInfo,
    #[serde(default)]
    pub friendly_name: String,
    #[serde(default)]
    pub scale: RawScaleRange,
}

/// A change the simulated platform was asked to make.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppliedChange {
    Mode {
        device_name: String,
        mode: VideoMode,
        fields: ModeFields,
        persist: bool,
    },
    Scale {
        adapter_id: AdapterId,
        source_id: u32,
        relative: i32,
    },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimulatedPlatform {
    pub devices: Vec<SimulatedDevice>,
    #[serde(default)]
    pub paths: Vec<SimulatedPath>,
    #[serde(default)]
    pub mode_blocks: Vec<ModeBlock>,
    /// Makes the active-path query fail with this status.
    #[serde(default)]
    pub query_failure: Option<u32>,
    /// Makes every mode change report this status instead of being applied.
    #[serde(default)]
    pub apply_status: Option<i32>,
    #[serde(skip)]
    applied: Vec<AppliedChange>,
}

impl SimulatedPlatform {
    pub fn new(devices: Vec<SimulatedDevice>, paths: Vec<SimulatedPath>) -> Self {
        Self {
            devices,
            paths,
            ..Self::default()
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let platform = Self::from_json(&raw)?;
        debug!(
            path = %path.as_ref().display(),
            devices = platform.devices.len(),
            paths = platform.paths.len(),
            "Loaded simulated display layout"
        );
        Ok(platform)
    }

    /// Every change requested so far, in order.
    pub fn applied(&self) -> &[AppliedChange] {
        &self.applied
    }

    fn device(&self, device_name: &str, operation: &'static str) -> Result<&SimulatedDevice> {
        self.devices
            .iter()
            .find(|d| d.device.name == device_name)
            .ok_or(DisplayError::PlatformQueryFailed {
                operation,
                code: ERROR_INVALID_PARAMETER,
            })
    }

    fn find_path(&self, probe: &PathInfo, volatile: PathFields) -> Option<&SimulatedPath> {
        self.paths.iter().find(|p| p.path.matches(probe, volatile))
    }
}

impl DisplayPlatform for SimulatedPlatform {
    fn enumerate_devices(&self) -> Result<Vec<DisplayDevice>> {
        Ok(self.devices.iter().map(|d| d.device.clone()).collect())
    }

    fn enumerate_modes(&self, device_name: &str) -> Result<Vec<VideoMode>> {
        Ok(self.device(device_name, "enumerate modes")?.modes.clone())
    }

    fn current_mode(&self, device_name: &str) -> Result<VideoMode> {
        let device = self.device(device_name, "current mode")?;
        device
            .current
            .or_else(|| device.modes.first().copied())
            .ok_or(DisplayError::PlatformQueryFailed {
                operation: "current mode",
                code: ERROR_INVALID_PARAMETER,
            })
    }

    fn active_config(&self) -> Result<ActiveConfig> {
        if let Some(code) = self.query_failure {
            return Err(DisplayError::PlatformQueryFailed {
                operation: "query display config",
                code,
            });
        }
        Ok(ActiveConfig {
            paths: self.paths.iter().map(|p| p.path).collect(),
            mode_blocks: self.mode_blocks.clone(),
        })
    }

    fn target_name(&self, adapter_id: AdapterId, target_id: u32) -> Result<String> {
        let probe = PathInfo {
            adapter_id,
            source_id: 0,
            target_id,
        };
        self.find_path(&probe, PathFields::SOURCE)
            .map(|p| p.friendly_name.clone())
            .ok_or(DisplayError::PlatformQueryFailed {
                operation: "target device name",
                code: ERROR_INVALID_PARAMETER,
            })
    }

    fn dpi_scale_range(&self, adapter_id: AdapterId, source_id: u32) -> Result<RawScaleRange> {
        let probe = PathInfo {
            adapter_id,
            source_id,
            target_id: 0,
        };
        self.find_path(&probe, PathFields::TARGET)
            .map(|p| p.scale)
            .ok_or(DisplayError::PlatformQueryFailed {
                operation: "DPI scale query",
                code: ERROR_INVALID_PARAMETER,
            })
    }

    fn set_dpi_scale(
        &mut self,
        adapter_id: AdapterId,
        source_id: u32,
        relative: i32,
    ) -> Result<()> {
        self.applied.push(AppliedChange::Scale {
            adapter_id,
            source_id,
            relative,
        });

        let probe = PathInfo {
            adapter_id,
            source_id,
            target_id: 0,
        };
        let rejected = DisplayError::ScaleRejected {
            code: ERROR_INVALID_PARAMETER,
        };
        let range = self
            .find_path(&probe, PathFields::TARGET)
            .map(|p| p.scale)
            .ok_or(rejected)?;
        if relative < range.minimum || relative > range.maximum {
            return Err(DisplayError::ScaleRejected {
                code: ERROR_INVALID_PARAMETER,
            });
        }

        // Cloned targets share the source, so all of them move together.
        for path in self
            .paths
            .iter_mut()
            .filter(|p| p.path.matches(&probe, PathFields::TARGET))
        {
            path.scale.current = relative;
        }
        Ok(())
    }

    fn apply_mode(
        &mut self,
        device_name: &str,
        mode: &VideoMode,
        fields: ModeFields,
        persist: bool,
    ) -> i32 {
        self.applied.push(AppliedChange::Mode {
            device_name: device_name.to_string(),
            mode: *mode,
            fields,
            persist,
        });

        if let Some(status) = self.apply_status {
            return status;
        }

        let Some(device) = self.devices.iter_mut().find(|d| d.device.name == device_name) else {
            return DisplayChangeStatus::BadParam.code();
        };
        if !device.modes.iter().any(|m| m.same_mode(mode)) {
            return DisplayChangeStatus::BadMode.code();
        }
        device.current = Some(*mode);
        DisplayChangeStatus::Successful.code()
    }
}
