//! Application context: the platform service plus the registry built from it.

use tracing::{info, instrument, warn};

use crate::errors::{DisplayError, Result};
use crate::platforms::DisplayPlatform;
use crate::registry::{DisplayRegistry, Output};
use crate::scale::relative_offset;
use crate::selector::{select_mode, ModeRequest};
use crate::types::{ChangeOutcome, DisplayChangeStatus, ModeFields, VideoMode};

/// Plans and applies changes against a registry that is built once and never
/// refreshed. Observing the effect of a change needs a new manager.
pub struct DisplayManager<P: DisplayPlatform> {
    platform: P,
    registry: DisplayRegistry,
}

/// Validated scale change waiting to be submitted.
struct PlannedScale {
    display: usize,
    percent: u32,
    relative: i32,
}

impl<P: DisplayPlatform> DisplayManager<P> {
    pub fn new(platform: P) -> Result<Self> {
        let registry = DisplayRegistry::build(&platform)?;
        info!(outputs = registry.len(), "Display registry ready");
        Ok(Self { platform, registry })
    }

    pub fn registry(&self) -> &DisplayRegistry {
        &self.registry
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn into_platform(self) -> P {
        self.platform
    }

    /// Select a mode from a partial request and apply it, then apply `scale` if given.
    ///
    /// Any mode field in the request, orientation included, selects from the
    /// full catalog of display `number`.
    ///
    /// All validation, the scale range included, happens before the platform
    /// is asked to change anything.
    #[instrument(skip(self))]
    pub fn select_and_apply(
        &mut self,
        number: usize,
        request: &ModeRequest,
        scale: Option<u32>,
    ) -> Result<ChangeOutcome> {
        let output = self.registry.get(number)?;

        let mode = if request.is_empty() {
            None
        } else {
            Some(select_mode(output.catalog.modes(), request)?)
        };

        let planned_scale = scale
            .map(|percent| plan_scale(output, percent))
            .transpose()?;

        let mut outcome = ChangeOutcome::Unchanged;
        if let Some(mode) = mode {
            outcome = self.submit_mode(number, &mode)?;
        }
        if let Some(planned) = planned_scale {
            self.submit_scale(planned)?;
            if outcome == ChangeOutcome::Unchanged {
                outcome = ChangeOutcome::Applied;
            }
        }
        Ok(outcome)
    }

    /// Apply the `mode_number`-th catalog entry (1-based) of display `number`
    /// unchanged, then `scale` if given.
    #[instrument(skip(self))]
    pub fn select_by_index(
        &mut self,
        number: usize,
        mode_number: usize,
        scale: Option<u32>,
    ) -> Result<ChangeOutcome> {
        let output = self.registry.get(number)?;
        let mode = *output
            .catalog
            .by_number(mode_number)
            .ok_or(DisplayError::InvalidVideoMode {
                requested: mode_number,
                count: output.catalog.len(),
            })?;
        let planned_scale = scale
            .map(|percent| plan_scale(output, percent))
            .transpose()?;

        let outcome = self.submit_mode(number, &mode)?;
        if let Some(planned) = planned_scale {
            self.submit_scale(planned)?;
        }
        Ok(outcome)
    }

    /// Set the DPI scale of one output to `percent`.
    #[instrument(skip(self))]
    pub fn apply_scale(&mut self, number: usize, percent: u32) -> Result<()> {
        let output = self.registry.get(number)?;
        let planned = plan_scale(output, percent)?;
        self.submit_scale(planned)
    }

    fn submit_mode(&mut self, number: usize, mode: &VideoMode) -> Result<ChangeOutcome> {
        let output = self.registry.get(number)?;
        info!(display = number, device = %output.device.name, mode = %mode, "Applying video mode");

        let code = self
            .platform
            .apply_mode(&output.device.name, mode, ModeFields::FULL, true);
        match DisplayChangeStatus::from(code) {
            DisplayChangeStatus::Successful => Ok(ChangeOutcome::Applied),
            DisplayChangeStatus::Restart => {
                warn!(display = number, "Mode change requires a restart");
                Ok(ChangeOutcome::RestartRequired)
            }
            rejected => Err(DisplayError::ApplyRejected(rejected)),
        }
    }

    fn submit_scale(&mut self, planned: PlannedScale) -> Result<()> {
        let output = self.registry.get(planned.display)?;
        let Some(path) = output.path else {
            return Err(DisplayError::ScaleUnavailable {
                display: planned.display,
            });
        };
        info!(
            display = planned.display,
            percent = planned.percent,
            relative = planned.relative,
            "Applying DPI scale"
        );
        self.platform
            .set_dpi_scale(path.adapter_id, path.source_id, planned.relative)
    }
}

fn plan_scale(output: &Output, percent: u32) -> Result<PlannedScale> {
    let info = match (output.path, output.scale_info) {
        (Some(_), Some(info)) => info,
        _ => {
            return Err(DisplayError::ScaleUnavailable {
                display: output.number,
            })
        }
    };
    Ok(PlannedScale {
        display: output.number,
        percent,
        relative: relative_offset(&info, percent)?,
    })
}
