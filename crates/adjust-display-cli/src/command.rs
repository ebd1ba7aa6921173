use anyhow::{bail, Context, Result};
use colored::Colorize;
use tracing::{debug, info, warn};

use adjust_display::{
    ChangeOutcome, DisplayManager, DisplayPlatform, DisplayRegistry, ModeRequest, Output,
    SimulatedPlatform,
};

use crate::cli::{Assignment, Cli, Commands, GetArgs, ParamKey, SetArgs};
use crate::config::{AppConfig, PlatformSource};
use crate::help::print_usage;

type BoxedPlatform = Box<dyn DisplayPlatform>;

/// Parsed `set` parameters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChangeRequest {
    pub display: usize,
    pub mode_number: Option<usize>,
    pub mode: ModeRequest,
    pub scale: Option<u32>,
}

impl ChangeRequest {
    /// Later duplicates of a key override earlier ones.
    pub fn from_params(params: &[Assignment], default_display: usize) -> Self {
        let mut request = ChangeRequest {
            display: default_display,
            ..Default::default()
        };
        for param in params {
            let value = param.value;
            match param.key {
                ParamKey::Disp => request.display = value as usize,
                ParamKey::Mode => request.mode_number = Some(value as usize),
                ParamKey::Width => request.mode.width = Some(value),
                ParamKey::Height => request.mode.height = Some(value),
                ParamKey::Orient => request.mode.orientation = Some(value),
                ParamKey::Freq => request.mode.frequency = Some(value),
                ParamKey::Bpp => request.mode.bits_per_pixel = Some(value),
                ParamKey::Scale => request.scale = Some(value),
            }
        }
        request
    }

    pub fn is_empty(&self) -> bool {
        self.mode_number.is_none() && self.mode.is_empty() && self.scale.is_none()
    }
}

pub fn run(cli: Cli) -> Result<()> {
    // Usage never depends on the config file.
    let Some(command) = cli.command else {
        print_usage();
        return Ok(());
    };

    let config = AppConfig::load(cli.config.as_deref())?;
    crate::utils::init_logging(cli.verbose, config.log_filter.as_deref());
    debug!(?config, "Loaded configuration");

    let source = config.platform_source(cli.platform, cli.fixture.as_deref())?;
    match command {
        Commands::Get(args) => handle_get(&source, args),
        Commands::Set(args) => handle_set(&source, args, config.default_display),
        Commands::Ident => handle_ident(&source),
    }
}

fn open_platform(source: &PlatformSource) -> Result<BoxedPlatform> {
    match source {
        PlatformSource::Native => Ok(adjust_display::native_platform()?),
        PlatformSource::Simulated(path) => {
            let platform = SimulatedPlatform::from_file(path)
                .with_context(|| format!("Failed to load display layout {}", path.display()))?;
            Ok(Box::new(platform))
        }
    }
}

pub fn handle_get(source: &PlatformSource, args: GetArgs) -> Result<()> {
    let mut display = None;
    for param in &args.params {
        match param.key {
            ParamKey::Disp => display = Some(param.value as usize),
            other => bail!("'{other}' is not accepted by get, only disp=n"),
        }
    }

    let platform = open_platform(source)?;
    let registry = DisplayRegistry::build(&platform)?;

    match display {
        None if args.json => println!("{}", serde_json::to_string_pretty(&registry)?),
        None => {
            for output in registry.outputs() {
                println!("{}", format_output(output));
            }
        }
        Some(number) => {
            let output = registry.get(number)?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(output)?);
            } else {
                println!("{}", format_output(output));
                println!("Video modes:");
                for line in format_modes(output) {
                    println!("{line}");
                }
            }
        }
    }
    Ok(())
}

pub fn handle_set(source: &PlatformSource, args: SetArgs, default_display: usize) -> Result<()> {
    let request = ChangeRequest::from_params(&args.params, default_display);
    if request.is_empty() {
        print_usage();
        return Ok(());
    }

    let platform = open_platform(source)?;
    let mut manager = DisplayManager::new(platform)?;

    let outcome = match request.mode_number {
        Some(number) => {
            if !request.mode.is_empty() {
                warn!("mode= is set, ignoring width, height, orient, freq and bpp");
            }
            manager.select_by_index(request.display, number, request.scale)?
        }
        None => manager.select_and_apply(request.display, &request.mode, request.scale)?,
    };

    match outcome {
        ChangeOutcome::Applied => info!(display = request.display, "Display settings changed"),
        ChangeOutcome::RestartRequired => println!(
            "{}",
            "The computer must be restarted for the graphics mode to work".yellow()
        ),
        ChangeOutcome::Unchanged => debug!("Nothing to change"),
    }
    Ok(())
}

pub fn handle_ident(source: &PlatformSource) -> Result<()> {
    let platform = open_platform(source)?;
    let registry = DisplayRegistry::build(&platform)?;

    for output in registry.outputs() {
        println!(
            "{}\t{}\t{}",
            output.label().yellow().bold(),
            output.device.name,
            output.display_name()
        );
    }
    Ok(())
}

fn format_output(output: &Output) -> String {
    let scale = output
        .scale_info
        .map(|s| format!("{}%", s.current))
        .unwrap_or_else(|| "-".to_string());
    let mut line = format!(
        "{}: Adapter: {}\tDisplay: {}\tScale: {}",
        output.number,
        output.device.device_string,
        output.display_name(),
        scale
    );
    if output.is_primary() {
        line.push_str(" (primary)");
    }
    line
}

fn format_modes(output: &Output) -> Vec<String> {
    let current = output.catalog.current_index();
    output
        .catalog
        .modes()
        .iter()
        .enumerate()
        .map(|(index, mode)| {
            let line = format!("\t{}:\t{}", index + 1, mode);
            if index == current {
                format!("{} {}", line, "(current)".green())
            } else {
                line
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use adjust_display::Orientation;
    use clap::Parser;

    fn param(key: ParamKey, value: u32) -> Assignment {
        Assignment { key, value }
    }

    #[test]
    fn test_change_request_defaults_to_configured_display() {
        let request = ChangeRequest::from_params(&[param(ParamKey::Width, 1280)], 2);

        assert_eq!(request.display, 2);
        assert_eq!(request.mode.width, Some(1280));
        assert_eq!(request.mode_number, None);
    }

    #[test]
    fn test_change_request_collects_all_keys() {
        let request = ChangeRequest::from_params(
            &[
                param(ParamKey::Disp, 3),
                param(ParamKey::Height, 1080),
                param(ParamKey::Orient, 90),
                param(ParamKey::Freq, 144),
                param(ParamKey::Bpp, 32),
                param(ParamKey::Scale, 150),
            ],
            1,
        );

        assert_eq!(request.display, 3);
        assert_eq!(request.mode.height, Some(1080));
        assert_eq!(request.mode.orientation, Some(90));
        assert_eq!(request.mode.frequency, Some(144));
        assert_eq!(request.mode.bits_per_pixel, Some(32));
        assert_eq!(request.scale, Some(150));
    }

    #[test]
    fn test_display_only_request_is_empty() {
        assert!(ChangeRequest::from_params(&[param(ParamKey::Disp, 2)], 1).is_empty());
        assert!(!ChangeRequest::from_params(&[param(ParamKey::Mode, 4)], 1).is_empty());
    }

    #[test]
    fn test_format_output_line() {
        let registry = DisplayRegistry::build(&sample_platform()).unwrap();
        colored::control::set_override(false);

        let line = format_output(registry.get(1).unwrap());

        assert_eq!(line, "1: Adapter: Simulated Adapter\tDisplay: Default\tScale: 125% (primary)");
    }

    #[test]
    fn test_format_modes_marks_current() {
        let registry = DisplayRegistry::build(&sample_platform()).unwrap();
        colored::control::set_override(false);

        let lines = format_modes(registry.get(1).unwrap());

        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0],
            format!("\t1:\t1280 by 720, {} orientation, 32 bpp, 60 Hz", Orientation::Default)
        );
        assert!(lines[1].ends_with("(current)"));
    }

    #[test]
    fn test_usage_ignores_malformed_config() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("config.json");
        std::fs::write(&config_path, "{ platform: native").unwrap();
        let config_arg = config_path.to_string_lossy().to_string();

        let bare = Cli::try_parse_from(["adjust-display", "--config", config_arg.as_str()]).unwrap();
        assert!(run(bare).is_ok());

        let with_command =
            Cli::try_parse_from(["adjust-display", "--config", config_arg.as_str(), "ident"])
                .unwrap();
        assert!(run(with_command).is_err());
    }

    fn sample_platform() -> SimulatedPlatform {
        SimulatedPlatform::from_json(
            r#"{
                "devices": [{
                    "device": {
                        "name": "\\\\.\\DISPLAY1",
                        "device_string": "Simulated Adapter",
                        "state_flags": "ATTACHED_TO_DESKTOP | PRIMARY_DEVICE"
                    },
                    "modes": [
                        { "width": 1280, "height": 720, "bits_per_pixel": 32, "frequency": 60 },
                        { "width": 1920, "height": 1080, "bits_per_pixel": 32, "frequency": 60 }
                    ],
                    "current": { "width": 1920, "height": 1080, "bits_per_pixel": 32, "frequency": 60 }
                }],
                "paths": [{
                    "path": { "adapter_id": { "low": 1, "high": 0 }, "source_id": 0, "target_id": 256 },
                    "scale": { "minimum": 0, "current": 1, "maximum": 2 }
                }]
            }"#,
        )
        .unwrap()
    }
}
