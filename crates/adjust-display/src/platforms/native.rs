//! Win32 implementation of the platform display service.
//!
//! Legacy GDI calls (`EnumDisplayDevicesW`, `EnumDisplaySettingsW`,
//! `ChangeDisplaySettingsExW`) cover outputs and modes; the DisplayConfig API
//! covers active paths, friendly names and the undocumented DPI scale packets.

#![cfg(target_os = "windows")]

use std::ffi::OsStr;
use std::mem::size_of;
use std::os::windows::ffi::OsStrExt;

use tracing::{debug, instrument, warn};
use windows::core::PCWSTR;
use windows::Win32::Devices::Display::{
    DisplayConfigGetDeviceInfo, DisplayConfigSetDeviceInfo, GetDisplayConfigBufferSizes,
    QueryDisplayConfig, DISPLAYCONFIG_DEVICE_INFO_GET_TARGET_NAME,
    DISPLAYCONFIG_DEVICE_INFO_HEADER, DISPLAYCONFIG_DEVICE_INFO_TYPE, DISPLAYCONFIG_MODE_INFO,
    DISPLAYCONFIG_MODE_INFO_TYPE_SOURCE, DISPLAYCONFIG_MODE_INFO_TYPE_TARGET,
    DISPLAYCONFIG_PATH_INFO, DISPLAYCONFIG_TARGET_DEVICE_NAME, QDC_ONLY_ACTIVE_PATHS,
};
use windows::Win32::Foundation::{ERROR_SUCCESS, LUID};
use windows::Win32::Graphics::Gdi::{
    ChangeDisplaySettingsExW, EnumDisplayDevicesW, EnumDisplaySettingsW, CDS_RESET, CDS_TYPE,
    CDS_UPDATEREGISTRY, DEVMODEW, DEVMODE_DISPLAY_ORIENTATION, DEVMODE_FIELD_FLAGS,
    DISPLAY_DEVICEW, DM_BITSPERPEL, DM_DISPLAYFLAGS, DM_DISPLAYFREQUENCY, DM_DISPLAYORIENTATION,
    DM_PELSHEIGHT, DM_PELSWIDTH, DM_POSITION, ENUM_CURRENT_SETTINGS, ENUM_DISPLAY_SETTINGS_MODE,
};

use crate::errors::{DisplayError, Result};
use crate::platforms::DisplayPlatform;
use crate::types::{
    ActiveConfig, AdapterId, DeviceStateFlags, DisplayDevice, ModeBlock, ModeBlockKind,
    ModeFields, Orientation, PathInfo, RawScaleRange, VideoMode,
};

// Undocumented DisplayConfig packet types used by the Settings app for DPI scaling.
const DISPLAYCONFIG_DEVICE_INFO_GET_DPI_SCALE: DISPLAYCONFIG_DEVICE_INFO_TYPE =
    DISPLAYCONFIG_DEVICE_INFO_TYPE(-3);
const DISPLAYCONFIG_DEVICE_INFO_SET_DPI_SCALE: DISPLAYCONFIG_DEVICE_INFO_TYPE =
    DISPLAYCONFIG_DEVICE_INFO_TYPE(-4);

#[repr(C)]
struct DpiScaleGet {
    header: DISPLAYCONFIG_DEVICE_INFO_HEADER,
    min_scale_rel: i32,
    cur_scale_rel: i32,
    max_scale_rel: i32,
}

#[repr(C)]
struct DpiScaleSet {
    header: DISPLAYCONFIG_DEVICE_INFO_HEADER,
    scale_rel: i32,
}

/// Platform service backed by the live Windows display configuration.
#[derive(Debug, Default)]
pub struct NativePlatform;

impl NativePlatform {
    pub fn new() -> Self {
        Self
    }
}

fn to_wide(s: &str) -> Vec<u16> {
    OsStr::new(s)
        .encode_wide()
        .chain(std::iter::once(0))
        .collect()
}

fn wide_to_string(buffer: &[u16]) -> String {
    let end = buffer.iter().position(|&c| c == 0).unwrap_or(buffer.len());
    String::from_utf16_lossy(&buffer[..end])
}

fn to_luid(adapter_id: AdapterId) -> LUID {
    LUID {
        LowPart: adapter_id.low,
        HighPart: adapter_id.high,
    }
}

fn from_luid(luid: LUID) -> AdapterId {
    AdapterId {
        low: luid.LowPart,
        high: luid.HighPart,
    }
}

fn empty_devmode() -> DEVMODEW {
    // SAFETY: DEVMODEW is plain old data; all-zero is a valid value.
    let mut devmode: DEVMODEW = unsafe { std::mem::zeroed() };
    devmode.dmSize = size_of::<DEVMODEW>() as u16;
    devmode
}

fn mode_from_devmode(devmode: &DEVMODEW) -> VideoMode {
    // SAFETY: for display devices the second variant of the union is the active one.
    let orientation = unsafe { devmode.Anonymous1.Anonymous2.dmDisplayOrientation.0 };
    VideoMode {
        width: devmode.dmPelsWidth,
        height: devmode.dmPelsHeight,
        bits_per_pixel: devmode.dmBitsPerPel,
        frequency: devmode.dmDisplayFrequency,
        orientation: Orientation::from_raw(orientation),
    }
}

fn devmode_fields(fields: ModeFields) -> DEVMODE_FIELD_FLAGS {
    let mapping = [
        (ModeFields::WIDTH, DM_PELSWIDTH),
        (ModeFields::HEIGHT, DM_PELSHEIGHT),
        (ModeFields::BITS_PER_PIXEL, DM_BITSPERPEL),
        (ModeFields::FREQUENCY, DM_DISPLAYFREQUENCY),
        (ModeFields::ORIENTATION, DM_DISPLAYORIENTATION),
        (ModeFields::POSITION, DM_POSITION),
        (ModeFields::FLAGS, DM_DISPLAYFLAGS),
    ];
    let bits = mapping
        .iter()
        .filter(|(field, _)| fields.contains(*field))
        .fold(0u32, |acc, (_, flag)| acc | flag.0);
    DEVMODE_FIELD_FLAGS(bits)
}

fn query_failed(operation: &'static str, code: u32) -> DisplayError {
    DisplayError::PlatformQueryFailed { operation, code }
}

impl NativePlatform {
    fn enum_settings(
        &self,
        device_name: &str,
        index: ENUM_DISPLAY_SETTINGS_MODE,
    ) -> Option<DEVMODEW> {
        let name_w = to_wide(device_name);
        let mut devmode = empty_devmode();
        // SAFETY: name_w is NUL terminated and outlives the call.
        let ok = unsafe { EnumDisplaySettingsW(PCWSTR(name_w.as_ptr()), index, &mut devmode) };
        ok.as_bool().then_some(devmode)
    }
}

impl DisplayPlatform for NativePlatform {
    #[instrument(skip(self))]
    fn enumerate_devices(&self) -> Result<Vec<DisplayDevice>> {
        let mut devices = Vec::new();
        for index in 0.. {
            // SAFETY: DISPLAY_DEVICEW is plain old data.
            let mut raw: DISPLAY_DEVICEW = unsafe { std::mem::zeroed() };
            raw.cb = size_of::<DISPLAY_DEVICEW>() as u32;
            // SAFETY: raw is a properly sized out-parameter.
            let found = unsafe { EnumDisplayDevicesW(PCWSTR::null(), index, &mut raw, 0) };
            if !found.as_bool() {
                break;
            }
            devices.push(DisplayDevice {
                name: wide_to_string(&raw.DeviceName),
                key: wide_to_string(&raw.DeviceKey),
                id: wide_to_string(&raw.DeviceID),
                device_string: wide_to_string(&raw.DeviceString),
                state_flags: DeviceStateFlags::from_bits_retain(raw.StateFlags.0),
            });
        }
        debug!(count = devices.len(), "Enumerated display devices");
        Ok(devices)
    }

    fn enumerate_modes(&self, device_name: &str) -> Result<Vec<VideoMode>> {
        let mut modes = Vec::new();
        for index in 0.. {
            match self.enum_settings(device_name, ENUM_DISPLAY_SETTINGS_MODE(index)) {
                Some(devmode) => modes.push(mode_from_devmode(&devmode)),
                None => break,
            }
        }
        Ok(modes)
    }

    fn current_mode(&self, device_name: &str) -> Result<VideoMode> {
        self.enum_settings(device_name, ENUM_CURRENT_SETTINGS)
            .map(|devmode| mode_from_devmode(&devmode))
            .ok_or_else(|| {
                // SAFETY: reads the calling thread's last-error value.
                let code = unsafe { windows::Win32::Foundation::GetLastError() };
                query_failed("EnumDisplaySettingsW(ENUM_CURRENT_SETTINGS)", code.0)
            })
    }

    #[instrument(skip(self))]
    fn active_config(&self) -> Result<ActiveConfig> {
        let mut path_count: u32 = 0;
        let mut mode_count: u32 = 0;
        // SAFETY: both counters are valid out-parameters.
        let status = unsafe {
            GetDisplayConfigBufferSizes(QDC_ONLY_ACTIVE_PATHS, &mut path_count, &mut mode_count)
        };
        if status != ERROR_SUCCESS {
            return Err(query_failed("GetDisplayConfigBufferSizes", status.0));
        }

        // SAFETY: both record types are plain old data.
        let mut paths: Vec<DISPLAYCONFIG_PATH_INFO> =
            vec![unsafe { std::mem::zeroed() }; path_count as usize];
        let mut modes: Vec<DISPLAYCONFIG_MODE_INFO> =
            vec![unsafe { std::mem::zeroed() }; mode_count as usize];
        // SAFETY: the buffers hold exactly the element counts passed in.
        let status = unsafe {
            QueryDisplayConfig(
                QDC_ONLY_ACTIVE_PATHS,
                &mut path_count,
                paths.as_mut_ptr(),
                &mut mode_count,
                modes.as_mut_ptr(),
                None,
            )
        };
        if status != ERROR_SUCCESS {
            return Err(query_failed("QueryDisplayConfig", status.0));
        }
        paths.truncate(path_count as usize);
        modes.truncate(mode_count as usize);

        let paths = paths
            .iter()
            .map(|path| PathInfo {
                adapter_id: from_luid(path.sourceInfo.adapterId),
                source_id: path.sourceInfo.id,
                target_id: path.targetInfo.id,
            })
            .collect();
        let mode_blocks = modes
            .iter()
            .map(|mode| ModeBlock {
                kind: match mode.infoType {
                    DISPLAYCONFIG_MODE_INFO_TYPE_SOURCE => ModeBlockKind::Source,
                    DISPLAYCONFIG_MODE_INFO_TYPE_TARGET => ModeBlockKind::Target,
                    _ => ModeBlockKind::DesktopImage,
                },
                id: mode.id,
                adapter_id: from_luid(mode.adapterId),
            })
            .collect();

        Ok(ActiveConfig { paths, mode_blocks })
    }

    fn target_name(&self, adapter_id: AdapterId, target_id: u32) -> Result<String> {
        // SAFETY: plain old data packet.
        let mut packet: DISPLAYCONFIG_TARGET_DEVICE_NAME = unsafe { std::mem::zeroed() };
        packet.header.r#type = DISPLAYCONFIG_DEVICE_INFO_GET_TARGET_NAME;
        packet.header.size = size_of::<DISPLAYCONFIG_TARGET_DEVICE_NAME>() as u32;
        packet.header.adapterId = to_luid(adapter_id);
        packet.header.id = target_id;

        // SAFETY: the header is the first field of a correctly sized packet.
        let status = unsafe { DisplayConfigGetDeviceInfo(&mut packet.header) };
        if status != ERROR_SUCCESS.0 as i32 {
            return Err(query_failed("DisplayConfigGetDeviceInfo(GET_TARGET_NAME)", status as u32));
        }
        Ok(wide_to_string(&packet.monitorFriendlyDeviceName))
    }

    fn dpi_scale_range(&self, adapter_id: AdapterId, source_id: u32) -> Result<RawScaleRange> {
        let mut packet = DpiScaleGet {
            header: DISPLAYCONFIG_DEVICE_INFO_HEADER {
                r#type: DISPLAYCONFIG_DEVICE_INFO_GET_DPI_SCALE,
                size: size_of::<DpiScaleGet>() as u32,
                adapterId: to_luid(adapter_id),
                id: source_id,
            },
            min_scale_rel: 0,
            cur_scale_rel: 0,
            max_scale_rel: 0,
        };

        // SAFETY: the header is the first field of a repr(C) packet of the declared size.
        let status = unsafe { DisplayConfigGetDeviceInfo(&mut packet.header) };
        if status != ERROR_SUCCESS.0 as i32 {
            return Err(query_failed("DisplayConfigGetDeviceInfo(GET_DPI_SCALE)", status as u32));
        }
        Ok(RawScaleRange {
            minimum: packet.min_scale_rel,
            current: packet.cur_scale_rel,
            maximum: packet.max_scale_rel,
        })
    }

    fn set_dpi_scale(
        &mut self,
        adapter_id: AdapterId,
        source_id: u32,
        relative: i32,
    ) -> Result<()> {
        let packet = DpiScaleSet {
            header: DISPLAYCONFIG_DEVICE_INFO_HEADER {
                r#type: DISPLAYCONFIG_DEVICE_INFO_SET_DPI_SCALE,
                size: size_of::<DpiScaleSet>() as u32,
                adapterId: to_luid(adapter_id),
                id: source_id,
            },
            scale_rel: relative,
        };

        // SAFETY: the header is the first field of a repr(C) packet of the declared size.
        let status = unsafe { DisplayConfigSetDeviceInfo(&packet.header) };
        if status != ERROR_SUCCESS.0 as i32 {
            warn!(status, relative, "DisplayConfigSetDeviceInfo(SET_DPI_SCALE) failed");
            return Err(DisplayError::ScaleRejected {
                code: status as u32,
            });
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
        // Start from the live settings so position and driver fields survive.
        let mut devmode = self
            .enum_settings(device_name, ENUM_CURRENT_SETTINGS)
            .unwrap_or_else(empty_devmode);
        devmode.dmPelsWidth = mode.width;
        devmode.dmPelsHeight = mode.height;
        devmode.dmBitsPerPel = mode.bits_per_pixel;
        devmode.dmDisplayFrequency = mode.frequency;
        // SAFETY: writes the display variant of the union.
        unsafe {
            devmode.Anonymous1.Anonymous2.dmDisplayOrientation =
                DEVMODE_DISPLAY_ORIENTATION(mode.orientation.to_raw());
        }
        devmode.dmFields = devmode_fields(fields);

        let flags = if persist {
            CDS_TYPE(CDS_UPDATEREGISTRY.0 | CDS_RESET.0)
        } else {
            CDS_RESET
        };
        let name_w = to_wide(device_name);
        // SAFETY: name_w and devmode outlive the call.
        let result = unsafe {
            ChangeDisplaySettingsExW(
                PCWSTR(name_w.as_ptr()),
                Some(&devmode as *const DEVMODEW),
                None,
                flags,
                None,
            )
        };
        debug!(device = device_name, status = result.0, "ChangeDisplaySettingsExW returned");
        result.0
    }
}
