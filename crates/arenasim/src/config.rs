//! # Harness Configuration
//!
//! Optional TOML file controlling how snapshots are displayed and how much
//! is logged. Every field has a default, so an empty file is valid.
//!
//! ```toml
//! [display]
//! width = 120
//! color = true
//! step = false
//!
//! [logging]
//! filter = "arenasim_core=debug"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{HarnessError, HarnessResult};

/// Terminal width used when neither the config nor `COLUMNS` gives one.
pub const FALLBACK_WIDTH: usize = 80;

/// Top-level harness configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// Snapshot rendering.
    pub display: DisplayConfig,
    /// Log output.
    pub logging: LoggingConfig,
}

/// How snapshots are printed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Columns available; `None` means detect.
    pub width: Option<usize>,
    /// Emit ANSI colours.
    pub color: bool,
    /// Wait for ENTER between snapshots.
    pub step: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: None,
            color: true,
            step: false,
        }
    }
}

impl DisplayConfig {
    /// The configured width, else `COLUMNS`, else [`FALLBACK_WIDTH`].
    #[must_use]
    pub fn resolved_width(&self) -> usize {
        self.width
            .or_else(|| {
                std::env::var("COLUMNS")
                    .ok()
                    .and_then(|columns| columns.trim().parse().ok())
            })
            .filter(|&width| width > 0)
            .unwrap_or(FALLBACK_WIDTH)
    }
}

/// Log output settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive; `RUST_LOG` takes precedence.
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "warn".to_string(),
        }
    }
}

impl HarnessConfig {
    /// Loads a config file.
    ///
    /// # Errors
    ///
    /// [`HarnessError::Io`] or [`HarnessError::Parse`].
    pub fn load(path: &Path) -> HarnessResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| HarnessError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| HarnessError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: HarnessConfig = toml::from_str("").unwrap();
        assert_eq!(config, HarnessConfig::default());
        assert!(config.display.color);
        assert_eq!(config.logging.filter, "warn");
    }

    #[test]
    fn test_partial_display_section() {
        let config: HarnessConfig = toml::from_str("[display]\nwidth = 40\nstep = true").unwrap();
        assert_eq!(config.display.width, Some(40));
        assert!(config.display.step);
        assert!(config.display.color);
        assert_eq!(config.display.resolved_width(), 40);
    }

    #[test]
    fn test_zero_width_falls_back() {
        let display = DisplayConfig {
            width: Some(0),
            ..DisplayConfig::default()
        };
        assert!(display.resolved_width() > 0);
    }
}
