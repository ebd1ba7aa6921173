//! Unit tests for the adjust-display crate, run against the simulated platform.

use crate::platforms::simulated::{SimulatedDevice, SimulatedPath};
use crate::platforms::SimulatedPlatform;
use crate::types::{
    AdapterId, DeviceStateFlags, DisplayDevice, Orientation, PathInfo, RawScaleRange, VideoMode,
};

mod catalog_tests;
mod scale_tests;
mod types_tests;

pub(crate) fn mode(width: u32, height: u32, bits_per_pixel: u32, frequency: u32) -> VideoMode {
    VideoMode {
        width,
        height,
        bits_per_pixel,
        frequency,
        orientation: Orientation::Default,
    }
}

pub(crate) fn device(index: usize, flags: DeviceStateFlags) -> DisplayDevice {
    DisplayDevice {
        name: format!(r"\\.\DISPLAY{index}"),
        key: String::new(),
        id: format!(r"MONITOR\SIM{index:04}"),
        device_string: "Simulated Adapter".to_string(),
        state_flags: flags,
    }
}

pub(crate) fn path_info(source_id: u32, target_id: u32) -> PathInfo {
    PathInfo {
        adapter_id: AdapterId { low: 0x1234, high: 0 },
        source_id,
        target_id,
    }
}

pub(crate) fn sim_path(
    source_id: u32,
    target_id: u32,
    name: &str,
    scale: RawScaleRange,
) -> SimulatedPath {
    SimulatedPath {
        path: path_info(source_id, target_id),
        friendly_name: name.to_string(),
        scale,
    }
}

pub(crate) fn standard_modes() -> Vec<VideoMode> {
    vec![
        mode(800, 600, 32, 60),
        mode(800, 600, 32, 120),
        mode(1024, 768, 32, 60),
        mode(1920, 1080, 32, 60),
        mode(1920, 1080, 32, 144),
    ]
}

/// Two attached outputs: a primary 1080p panel at 150% recommended scale and a
/// secondary panel that is not primary. A third, detached device is listed too.
pub(crate) fn two_display_platform() -> SimulatedPlatform {
    let attached = DeviceStateFlags::ATTACHED_TO_DESKTOP;
    SimulatedPlatform::new(
        vec![
            SimulatedDevice {
                device: device(1, attached | DeviceStateFlags::PRIMARY_DEVICE),
                modes: standard_modes(),
                current: Some(mode(1920, 1080, 32, 60)),
            },
            SimulatedDevice {
                device: device(2, attached),
                modes: vec![mode(1280, 1024, 32, 60), mode(1280, 1024, 32, 75)],
                current: None,
            },
            SimulatedDevice {
                device: device(3, DeviceStateFlags::empty()),
                modes: vec![mode(640, 480, 16, 60)],
                current: None,
            },
        ],
        vec![
            sim_path(
                0,
                256,
                "DELL U2720Q",
                RawScaleRange {
                    minimum: -2,
                    current: 0,
                    maximum: 5,
                },
            ),
            sim_path(
                1,
                257,
                "",
                RawScaleRange {
                    minimum: 0,
                    current: 1,
                    maximum: 3,
                },
            ),
        ],
    )
}
