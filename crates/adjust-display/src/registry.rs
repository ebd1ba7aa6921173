//! Discovery of attached outputs and their reconciliation with the active
//! configuration paths.

use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::catalog::ModeCatalog;
use crate::errors::{DisplayError, Result};
use crate::platforms::DisplayPlatform;
use crate::scale::{resolve_scale_info, ScaleInfo};
use crate::types::{DisplayDevice, PathInfo, VideoMode};

/// Label shown for outputs whose target reports no friendly name.
pub const DEFAULT_FRIENDLY_NAME: &str = "Default";

/// One attached display.
#[derive(Debug, Clone, Serialize)]
pub struct Output {
    /// 1-based position in the registry.
    pub number: usize,
    pub device: DisplayDevice,
    /// Configuration path correlated by position, if there was one.
    pub path: Option<PathInfo>,
    /// Set when there are more active paths than outputs, i.e. the output is
    /// driven twice (clone group).
    pub is_duplicated: bool,
    /// Set on exactly one output when any device carries the primary flag.
    pub primary: bool,
    pub catalog: ModeCatalog,
    pub scale_info: Option<ScaleInfo>,
    pub friendly_name: Option<String>,
}

impl Output {
    pub fn display_name(&self) -> &str {
        match self.friendly_name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => DEFAULT_FRIENDLY_NAME,
        }
    }

    pub fn is_primary(&self) -> bool {
        self.primary
    }

    pub fn current_mode(&self) -> Option<&VideoMode> {
        self.catalog.current_mode()
    }

    /// Identification label: the output number, or `1/2` for a duplicated pair.
    pub fn label(&self) -> String {
        if self.is_duplicated {
            "1/2".to_string()
        } else {
            self.number.to_string()
        }
    }
}

/// Immutable snapshot of all attached outputs, built once per run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DisplayRegistry {
    outputs: Vec<Output>,
    /// Index of the primary output. `None` is a degraded but tolerated state.
    primary: Option<usize>,
    mode_blocks: usize,
}

impl DisplayRegistry {
    /// Query the platform and assemble the registry.
    ///
    /// Paths are paired with outputs by position. The source and target ids
    /// the platform reports change across topology switches, so they are never
    /// used to pick the pairing. Any failing query aborts the build.
    #[instrument(skip(platform))]
    pub fn build<P>(platform: &P) -> Result<Self>
    where
        P: DisplayPlatform + ?Sized,
    {
        let mut outputs = Vec::new();
        for device in platform.enumerate_devices()? {
            if !device.is_attached() {
                debug!(device = %device.name, "Skipping output not attached to desktop");
                continue;
            }
            let catalog = ModeCatalog::enumerate(platform, &device.name)?;
            outputs.push(Output {
                number: outputs.len() + 1,
                device,
                path: None,
                is_duplicated: false,
                primary: false,
                catalog,
                scale_info: None,
                friendly_name: None,
            });
        }

        let config = platform.active_config()?;
        let duplicated = config.paths.len() > outputs.len();
        if duplicated {
            info!(
                paths = config.paths.len(),
                outputs = outputs.len(),
                "More active paths than outputs, marking outputs as duplicated"
            );
        }

        for (output, path) in outputs.iter_mut().zip(config.paths.iter()) {
            output.is_duplicated = duplicated;
            output.path = Some(*path);
            output.friendly_name = Some(platform.target_name(path.adapter_id, path.target_id)?);

            let raw = platform.dpi_scale_range(path.adapter_id, path.source_id)?;
            output.scale_info = resolve_scale_info(raw);
            debug!(
                device = %output.device.name,
                adapter = %path.adapter_id,
                source = path.source_id,
                target = path.target_id,
                scale = ?output.scale_info,
                "Correlated output with configuration path"
            );
        }

        let primary = outputs.iter().position(|output| output.device.is_primary());
        match primary {
            Some(index) => outputs[index].primary = true,
            None if !outputs.is_empty() => warn!("No output is flagged as primary"),
            None => {}
        }

        Ok(Self {
            outputs,
            primary,
            mode_blocks: config.mode_blocks.len(),
        })
    }

    pub fn outputs(&self) -> &[Output] {
        &self.outputs
    }

    pub fn len(&self) -> usize {
        self.outputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outputs.is_empty()
    }

    /// Number of opaque mode blocks returned with the active paths.
    pub fn mode_block_count(&self) -> usize {
        self.mode_blocks
    }

    /// Look up an output by its 1-based number.
    pub fn get(&self, number: usize) -> Result<&Output> {
        number
            .checked_sub(1)
            .and_then(|index| self.outputs.get(index))
            .ok_or(DisplayError::InvalidDisplayIndex {
                requested: number,
                count: self.outputs.len(),
            })
    }

    pub fn primary(&self) -> Option<&Output> {
        self.primary.and_then(|index| self.outputs.get(index))
    }

    /// The primary output, falling back to the first one.
    pub fn primary_or_first(&self) -> Option<&Output> {
        self.primary().or_else(|| self.outputs.first())
    }
}
