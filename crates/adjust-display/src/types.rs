//! Plain data shared by the registry, the selector and the platform backends.

use std::fmt;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::errors::DisplayError;

// ===== Video modes =====

/// Display rotation. Serialized as degrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum Orientation {
    #[default]
    Default,
    Rotate90,
    Rotate180,
    Rotate270,
}

impl Orientation {
    pub fn degrees(self) -> u32 {
        match self {
            Orientation::Default => 0,
            Orientation::Rotate90 => 90,
            Orientation::Rotate180 => 180,
            Orientation::Rotate270 => 270,
        }
    }

    /// Index used by the platform's mode records (0..=3).
    pub fn to_raw(self) -> u32 {
        self.degrees() / 90
    }

    /// Unknown raw values collapse to `Default`.
    pub fn from_raw(raw: u32) -> Self {
        match raw {
            1 => Orientation::Rotate90,
            2 => Orientation::Rotate180,
            3 => Orientation::Rotate270,
            _ => Orientation::Default,
        }
    }
}

impl TryFrom<u32> for Orientation {
    type Error = DisplayError;

    fn try_from(degrees: u32) -> Result<Self, Self::Error> {
        match degrees {
            0 => Ok(Orientation::Default),
            90 => Ok(Orientation::Rotate90),
            180 => Ok(Orientation::Rotate180),
            270 => Ok(Orientation::Rotate270),
            other => Err(DisplayError::InvalidOrientation(other)),
        }
    }
}

impl From<Orientation> for u32 {
    fn from(orientation: Orientation) -> Self {
        orientation.degrees()
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°", self.degrees())
    }
}

/// One supported (resolution, colour depth, refresh rate, orientation) tuple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VideoMode {
    pub width: u32,
    pub height: u32,
    pub bits_per_pixel: u32,
    pub frequency: u32,
    #[serde(default)]
    pub orientation: Orientation,
}

impl VideoMode {
    /// Identity used for deduplication. Orientation is left out because the
    /// platform reports the same physical mode once per rotation.
    pub fn key(&self) -> (u32, u32, u32, u32) {
        (self.width, self.height, self.bits_per_pixel, self.frequency)
    }

    pub fn same_mode(&self, other: &VideoMode) -> bool {
        self.key() == other.key()
    }
}

impl fmt::Display for VideoMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} by {}, {} orientation, {} bpp, {} Hz",
            self.width, self.height, self.orientation, self.bits_per_pixel, self.frequency
        )
    }
}

/// A single constrainable field of a mode request, named in `NoMatchingMode`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeField {
    Width,
    Height,
    BitsPerPixel,
    Frequency,
}

impl fmt::Display for ModeField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ModeField::Width => "width",
            ModeField::Height => "height",
            ModeField::BitsPerPixel => "bits per pixel",
            ModeField::Frequency => "frequency",
        };
        f.write_str(name)
    }
}

bitflags! {
    /// Fields of a mode record the platform should treat as dirty when applying it.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ModeFields: u32 {
        const WIDTH = 1 << 0;
        const HEIGHT = 1 << 1;
        const BITS_PER_PIXEL = 1 << 2;
        const FREQUENCY = 1 << 3;
        const ORIENTATION = 1 << 4;
        const POSITION = 1 << 5;
        const FLAGS = 1 << 6;
    }
}

impl ModeFields {
    /// Mask used for every mode change: the whole mode is resubmitted.
    pub const FULL: ModeFields = ModeFields::all();
}

// ===== Devices and configuration paths =====

bitflags! {
    /// State reported by the legacy device enumeration.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct DeviceStateFlags: u32 {
        const ATTACHED_TO_DESKTOP = 0x0000_0001;
        const MULTI_DRIVER = 0x0000_0002;
        const PRIMARY_DEVICE = 0x0000_0004;
        const MIRRORING_DRIVER = 0x0000_0008;
        const VGA_COMPATIBLE = 0x0000_0010;
        const REMOVABLE = 0x0000_0020;
        const DISCONNECTED = 0x0200_0000;
        const REMOTE = 0x0400_0000;
        const MODESPRUNED = 0x0800_0000;
    }
}

/// An output as reported by the legacy device enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayDevice {
    /// Stable device name, e.g. `\\.\DISPLAY1`. Used to address mode changes.
    pub name: String,
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub id: String,
    /// Adapter description.
    #[serde(default)]
    pub device_string: String,
    #[serde(default = "DeviceStateFlags::empty")]
    pub state_flags: DeviceStateFlags,
}

impl DisplayDevice {
    pub fn is_attached(&self) -> bool {
        self.state_flags.contains(DeviceStateFlags::ATTACHED_TO_DESKTOP)
    }

    pub fn is_primary(&self) -> bool {
        self.state_flags.contains(DeviceStateFlags::PRIMARY_DEVICE)
    }
}

/// Locally unique adapter identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct AdapterId {
    pub low: u32,
    pub high: i32,
}

impl fmt::Display for AdapterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08x}:{:08x}", self.high as u32, self.low)
    }
}

bitflags! {
    /// Identity fields of a [`PathInfo`] that may be treated as volatile when comparing.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct PathFields: u8 {
        const ADAPTER = 1 << 0;
        const SOURCE = 1 << 1;
        const TARGET = 1 << 2;
    }
}

/// One active source→target path from the configuration query.
///
/// Source and target ids change across reboots and topology switches, so two
/// paths are only ever compared through [`PathInfo::matches`] with the
/// volatile fields spelled out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PathInfo {
    pub adapter_id: AdapterId,
    pub source_id: u32,
    pub target_id: u32,
}

impl PathInfo {
    pub fn matches(&self, other: &PathInfo, volatile: PathFields) -> bool {
        (volatile.contains(PathFields::ADAPTER) || self.adapter_id == other.adapter_id)
            && (volatile.contains(PathFields::SOURCE) || self.source_id == other.source_id)
            && (volatile.contains(PathFields::TARGET) || self.target_id == other.target_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModeBlockKind {
    Source,
    Target,
    DesktopImage,
}

/// Opaque mode record returned next to the active paths. Only kept for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeBlock {
    pub kind: ModeBlockKind,
    pub id: u32,
    pub adapter_id: AdapterId,
}

/// Result of the active-path configuration query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActiveConfig {
    pub paths: Vec<PathInfo>,
    pub mode_blocks: Vec<ModeBlock>,
}

/// DPI scale steps as reported by the platform, relative to the recommended step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RawScaleRange {
    pub minimum: i32,
    pub current: i32,
    pub maximum: i32,
}

// ===== Change results =====

/// Signed result of the platform's apply-mode primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayChangeStatus {
    Successful,
    Restart,
    Failed,
    BadMode,
    NotUpdated,
    BadFlags,
    BadParam,
    BadDualView,
    Unknown(i32),
}

impl DisplayChangeStatus {
    pub fn code(self) -> i32 {
        match self {
            DisplayChangeStatus::Successful => 0,
            DisplayChangeStatus::Restart => 1,
            DisplayChangeStatus::Failed => -1,
            DisplayChangeStatus::BadMode => -2,
            DisplayChangeStatus::NotUpdated => -3,
            DisplayChangeStatus::BadFlags => -4,
            DisplayChangeStatus::BadParam => -5,
            DisplayChangeStatus::BadDualView => -6,
            DisplayChangeStatus::Unknown(code) => code,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            DisplayChangeStatus::Successful => "The settings change was successful",
            DisplayChangeStatus::Restart => {
                "The computer must be restarted for the graphics mode to work"
            }
            DisplayChangeStatus::Failed => "The display driver failed the specified graphics mode",
            DisplayChangeStatus::BadMode => "The graphics mode is not supported",
            DisplayChangeStatus::NotUpdated => "Unable to write settings to the registry",
            DisplayChangeStatus::BadFlags => "An invalid set of flags was passed in",
            DisplayChangeStatus::BadParam => "An invalid parameter was passed in",
            DisplayChangeStatus::BadDualView => {
                "The settings change was unsuccessful because the system is DualView capable"
            }
            DisplayChangeStatus::Unknown(_) => "The display driver returned an unknown status",
        }
    }
}

impl From<i32> for DisplayChangeStatus {
    fn from(code: i32) -> Self {
        match code {
            0 => DisplayChangeStatus::Successful,
            1 => DisplayChangeStatus::Restart,
            -1 => DisplayChangeStatus::Failed,
            -2 => DisplayChangeStatus::BadMode,
            -3 => DisplayChangeStatus::NotUpdated,
            -4 => DisplayChangeStatus::BadFlags,
            -5 => DisplayChangeStatus::BadParam,
            -6 => DisplayChangeStatus::BadDualView,
            other => DisplayChangeStatus::Unknown(other),
        }
    }
}

/// Successful end of a change request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeOutcome {
    Applied,
    /// Accepted, but only takes effect after a reboot.
    RestartRequired,
    /// Nothing was requested.
    Unchanged,
}
