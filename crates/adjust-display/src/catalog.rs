//! Per-output list of supported video modes.

use serde::Serialize;
use tracing::{debug, warn};

use crate::errors::Result;
use crate::platforms::DisplayPlatform;
use crate::types::VideoMode;

/// Deduplicated modes of one output in first-seen order, plus the current one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ModeCatalog {
    modes: Vec<VideoMode>,
    current_index: usize,
}

impl ModeCatalog {
    /// Build a catalog from raw enumeration records, keeping the first record
    /// of every (width, height, bpp, frequency) key.
    pub fn from_modes<I>(modes: I) -> Self
    where
        I: IntoIterator<Item = VideoMode>,
    {
        let mut unique: Vec<VideoMode> = Vec::new();
        for mode in modes {
            if !unique.iter().any(|known| known.same_mode(&mode)) {
                unique.push(mode);
            }
        }
        Self {
            modes: unique,
            current_index: 0,
        }
    }

    /// Point the current index at the entry matching `current`, or at 0 when
    /// the platform's current mode is not in the list.
    pub fn with_current(mut self, current: &VideoMode) -> Self {
        self.current_index = match self.modes.iter().position(|m| m.same_mode(current)) {
            Some(index) => index,
            None => {
                warn!(current = %current, "Current mode not found in mode list, using first mode");
                0
            }
        };
        self
    }

    /// Walk the platform's mode enumeration for `device_name` and resolve the current mode.
    pub fn enumerate<P>(platform: &P, device_name: &str) -> Result<Self>
    where
        P: DisplayPlatform + ?Sized,
    {
        let raw = platform.enumerate_modes(device_name)?;
        let raw_count = raw.len();
        let catalog = Self::from_modes(raw);
        debug!(
            device = device_name,
            raw_count,
            unique = catalog.modes.len(),
            "Enumerated video modes"
        );

        let current = platform.current_mode(device_name)?;
        Ok(catalog.with_current(&current))
    }

    pub fn modes(&self) -> &[VideoMode] {
        &self.modes
    }

    pub fn len(&self) -> usize {
        self.modes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modes.is_empty()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// `None` only for an output that reports no modes at all.
    pub fn current_mode(&self) -> Option<&VideoMode> {
        self.modes.get(self.current_index)
    }

    /// Look up a mode by its 1-based number.
    pub fn by_number(&self, number: usize) -> Option<&VideoMode> {
        number.checked_sub(1).and_then(|index| self.modes.get(index))
    }
}
