//! Optional JSON config file, overridden by command-line flags.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use tracing::warn;

use crate::cli::PlatformKind;

const CONFIG_DIR_NAME: &str = "adjust-display";
const CONFIG_FILE_NAME: &str = "config.json";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub platform: Option<PlatformKind>,
    pub fixture: Option<PathBuf>,
    /// Display addressed when `disp=` is omitted (1-based).
    pub default_display: usize,
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub log_filter: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            platform: None,
            fixture: None,
            default_display: 1,
            log_filter: None,
        }
    }
}

/// Where the display platform comes from after flags and config are merged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformSource {
    Native,
    Simulated(PathBuf),
}

impl AppConfig {
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Load `explicit` if given (it must exist), else the default location if present.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => match Self::default_path() {
                Some(path) if path.is_file() => Self::from_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: AppConfig = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        if config.default_display == 0 {
            bail!(
                "Invalid default_display 0 in {}, display numbers start from 1",
                path.display()
            );
        }
        Ok(config)
    }

    /// Merge the backend flags over this config.
    pub fn platform_source(
        &self,
        platform: Option<PlatformKind>,
        fixture: Option<&Path>,
    ) -> Result<PlatformSource> {
        let fixture = fixture
            .map(Path::to_path_buf)
            .or_else(|| self.fixture.clone());
        let kind = platform.or(self.platform).unwrap_or(if fixture.is_some() {
            PlatformKind::Simulated
        } else {
            PlatformKind::Native
        });

        match (kind, fixture) {
            (PlatformKind::Simulated, Some(path)) => Ok(PlatformSource::Simulated(path)),
            (PlatformKind::Simulated, None) => {
                bail!("The simulated platform needs a display layout, pass --fixture <json>")
            }
            (PlatformKind::Native, fixture) => {
                if let Some(path) = fixture {
                    warn!(fixture = %path.display(), "Ignoring fixture for the native platform");
                }
                Ok(PlatformSource::Native)
            }
        }
    }
}
