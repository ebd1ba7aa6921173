//! Best-fit video mode selection from a partially specified request.

use tracing::debug;

use crate::errors::{DisplayError, Result};
use crate::types::{ModeField, Orientation, VideoMode};

/// Requested mode fields. `None` means "keep whatever the chosen candidate has".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModeRequest {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub bits_per_pixel: Option<u32>,
    pub frequency: Option<u32>,
    /// Degrees, validated during selection.
    pub orientation: Option<u32>,
}

impl ModeRequest {
    /// True when any of width, height, bpp or frequency is constrained.
    pub fn constrains_catalog(&self) -> bool {
        self.width.is_some()
            || self.height.is_some()
            || self.bits_per_pixel.is_some()
            || self.frequency.is_some()
    }

    /// True when the request asks for any mode change at all.
    pub fn is_empty(&self) -> bool {
        !self.constrains_catalog() && self.orientation.is_none()
    }

    fn constraints(&self) -> [(ModeField, Option<u32>); 4] {
        [
            (ModeField::Width, self.width),
            (ModeField::Height, self.height),
            (ModeField::BitsPerPixel, self.bits_per_pixel),
            (ModeField::Frequency, self.frequency),
        ]
    }
}

fn field_value(mode: &VideoMode, field: ModeField) -> u32 {
    match field {
        ModeField::Width => mode.width,
        ModeField::Height => mode.height,
        ModeField::BitsPerPixel => mode.bits_per_pixel,
        ModeField::Frequency => mode.frequency,
    }
}

/// Narrow `candidates` by the request and return the mode to submit.
///
/// Filters run in a fixed order (width, height, bpp, frequency) and the first
/// one that leaves nothing is the one reported. Among the survivors the last
/// in catalog order wins. The platform usually enumerates in ascending order,
/// so this tends to pick the highest resolution and refresh rate, but that
/// order is not guaranteed.
pub fn select_mode(candidates: &[VideoMode], request: &ModeRequest) -> Result<VideoMode> {
    let mut survivors: Vec<&VideoMode> = candidates.iter().collect();

    for (field, wanted) in request.constraints() {
        let Some(value) = wanted else {
            continue;
        };
        survivors.retain(|mode| field_value(mode, field) == value);
        if survivors.is_empty() {
            return Err(DisplayError::NoMatchingMode { field, value });
        }
    }

    let orientation = request
        .orientation
        .map(Orientation::try_from)
        .transpose()?;

    let mut selected = **survivors.last().ok_or(DisplayError::NoModesAvailable)?;
    debug!(candidates = survivors.len(), selected = %selected, "Selected video mode");

    if let Some(width) = request.width {
        selected.width = width;
    }
    if let Some(height) = request.height {
        selected.height = height;
    }
    if let Some(bpp) = request.bits_per_pixel {
        selected.bits_per_pixel = bpp;
    }
    if let Some(frequency) = request.frequency {
        selected.frequency = frequency;
    }
    if let Some(orientation) = orientation {
        selected.orientation = orientation;
    }
    Ok(selected)
}
