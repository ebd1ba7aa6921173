use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use clap::{Parser, Subcommand, ValueEnum};
use serde::Deserialize;

#[derive(Parser, Debug)]
#[command(name = "adjust-display")]
#[command(about = "🖥️ adjust-display - inspect displays and change their video mode and DPI scale")]
#[command(
    long_about = "adjust-display lists attached displays with their supported video modes and DPI scale range, and changes resolution, colour depth, refresh rate, orientation and scale from key=value parameters."
)]
#[command(disable_help_subcommand = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Display backend to use
    #[clap(long, value_enum, env = "ADJUST_DISPLAY_PLATFORM", global = true)]
    pub platform: Option<PlatformKind>,

    /// JSON display layout for the simulated backend (implies --platform simulated)
    #[clap(long, env = "ADJUST_DISPLAY_FIXTURE", global = true)]
    pub fixture: Option<PathBuf>,

    /// Config file (default: <config dir>/adjust-display/config.json)
    #[clap(long, global = true)]
    pub config: Option<PathBuf>,

    /// Debug logging on stderr
    #[clap(long, short, global = true)]
    pub verbose: bool,
}

#[derive(ValueEnum, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[clap(rename_all = "lower")]
#[serde(rename_all = "lowercase")]
pub enum PlatformKind {
    Native,
    Simulated,
}

#[derive(Parser, Debug)]
pub struct GetArgs {
    /// Optional `disp=n` to list the video modes of one display
    pub params: Vec<Assignment>,

    /// Print the display information as JSON
    #[clap(long)]
    pub json: bool,
}

#[derive(Parser, Debug)]
pub struct SetArgs {
    /// `key=value` pairs: disp, mode, width, height, orient, freq, bpp, scale
    pub params: Vec<Assignment>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Identify displays by their numbers
    Ident,
    /// Show connected displays, or the video modes of one display
    Get(GetArgs),
    /// Change the video mode and/or DPI scale of a display
    Set(SetArgs),
}

/// Key of a `key=value` parameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParamKey {
    Disp,
    Mode,
    Width,
    Height,
    Orient,
    Freq,
    Bpp,
    Scale,
}

impl ParamKey {
    const ALL: [ParamKey; 8] = [
        ParamKey::Disp,
        ParamKey::Mode,
        ParamKey::Width,
        ParamKey::Height,
        ParamKey::Orient,
        ParamKey::Freq,
        ParamKey::Bpp,
        ParamKey::Scale,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ParamKey::Disp => "disp",
            ParamKey::Mode => "mode",
            ParamKey::Width => "width",
            ParamKey::Height => "height",
            ParamKey::Orient => "orient",
            ParamKey::Freq => "freq",
            ParamKey::Bpp => "bpp",
            ParamKey::Scale => "scale",
        }
    }
}

impl fmt::Display for ParamKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One `key=value` parameter. Keys are case-insensitive, values are unsigned integers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Assignment {
    pub key: ParamKey,
    pub value: u32,
}

impl FromStr for Assignment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (key, value) = s
            .split_once('=')
            .ok_or_else(|| format!("expected key=value, got '{s}'"))?;

        let key = ParamKey::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(key.trim()))
            .ok_or_else(|| {
                let known: Vec<&str> = ParamKey::ALL.iter().map(|k| k.as_str()).collect();
                format!("unknown parameter '{key}', expected one of: {}", known.join(", "))
            })?;

        let value = value
            .trim()
            .parse::<u32>()
            .map_err(|e| format!("invalid value for {key}: {e}"))?;

        Ok(Assignment { key, value })
    }
}
