//! Conversion between DPI scale percentages and the platform's relative step encoding.
//!
//! The platform never deals in percentages. It reports and accepts signed step
//! counts into [`SCALE_STEPS`], measured from the output's recommended scale.

use serde::Serialize;
use tracing::warn;

use crate::errors::{DisplayError, Result};
use crate::types::RawScaleRange;

/// Reference table of the scale percentages the platform steps through.
pub const SCALE_STEPS: [u32; 14] = [
    100, 125, 150, 175, 200, 225, 250, 300, 350, 400, 450, 500, 550, 600,
];

/// DPI scale range of one output, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScaleInfo {
    pub minimum: u32,
    pub maximum: u32,
    pub current: u32,
    pub recommended: u32,
}

impl ScaleInfo {
    pub fn contains(&self, percent: u32) -> bool {
        (self.minimum..=self.maximum).contains(&percent)
    }
}

/// Resolve the platform's relative steps into absolute percentages.
///
/// The minimum step is negative (or zero), so `|minimum|` is the table index of
/// the recommended scale. Combinations that run off either end of the table
/// yield `None` instead of an error.
pub fn resolve_scale_info(raw: RawScaleRange) -> Option<ScaleInfo> {
    let base = i64::from(raw.minimum).abs();
    let span = base + i64::from(raw.maximum) + 1;
    if span > SCALE_STEPS.len() as i64 {
        warn!(
            minimum = raw.minimum,
            current = raw.current,
            maximum = raw.maximum,
            "DPI scale range does not fit the reference table"
        );
        return None;
    }

    let step = |offset: i32| -> Option<u32> {
        let index = usize::try_from(base + i64::from(offset)).ok()?;
        SCALE_STEPS.get(index).copied()
    };

    let info = ScaleInfo {
        minimum: step(raw.minimum)?,
        maximum: step(raw.maximum)?,
        current: step(raw.current)?,
        recommended: step(0)?,
    };

    if !info.contains(info.current) || !info.contains(info.recommended) {
        warn!(?raw, "DPI scale range is inconsistent");
        return None;
    }
    Some(info)
}

/// Signed step offset, relative to the recommended scale, that selects `requested`.
pub fn relative_offset(info: &ScaleInfo, requested: u32) -> Result<i32> {
    let out_of_range = || DisplayError::ScaleOutOfRange {
        requested,
        minimum: info.minimum,
        maximum: info.maximum,
    };

    if !info.contains(requested) {
        return Err(out_of_range());
    }

    let requested_index = step_index(requested).ok_or_else(out_of_range)?;
    let recommended_index = step_index(info.recommended).ok_or_else(out_of_range)?;
    Ok(requested_index as i32 - recommended_index as i32)
}

fn step_index(percent: u32) -> Option<usize> {
    SCALE_STEPS.iter().position(|&step| step == percent)
}
