//! # Scenarios
//!
//! A scenario names a strategy, an arena capacity, an address domain and a
//! script of steps. Scenarios are loaded from TOML:
//!
//! ```toml
//! strategy = "boundary_tag"
//! capacity = 32
//! domain = "u8"
//!
//! [[steps]]
//! op = "allocate"
//! size = 7
//!
//! [[steps]]
//! op = "release"
//! address = 0x02
//! ```

use std::fmt;
use std::path::Path;

use arenasim_core::StrategyKind;
use serde::{Deserialize, Serialize};

use crate::error::{HarnessError, HarnessResult};

/// Capacity of the built-in demos.
pub const DEMO_CAPACITY: u64 = 32;

/// Width of the address domain a scenario runs in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    /// 8-bit addresses (0-255).
    #[default]
    U8,
    /// 16-bit addresses.
    U16,
    /// 32-bit addresses.
    U32,
    /// 64-bit addresses.
    U64,
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::U32 => "u32",
            Self::U64 => "u64",
        })
    }
}

/// One scripted call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    /// `allocate(size)`.
    Allocate {
        /// Requested usable units.
        size: u64,
    },
    /// `release(address)`.
    Release {
        /// Address returned by an earlier allocation.
        address: u64,
    },
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Allocate { size } => write!(f, "allocate({size})"),
            Self::Release { address } => write!(f, "release({address:#04x})"),
        }
    }
}

/// A strategy, an arena and a script.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    /// Which strategy to drive.
    pub strategy: StrategyKind,
    /// Arena capacity in units.
    pub capacity: u64,
    /// Address domain.
    #[serde(default)]
    pub domain: Domain,
    /// The script.
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl Scenario {
    /// Parses a scenario from TOML text.
    ///
    /// # Errors
    ///
    /// [`HarnessError::Parse`] with `origin` as the reported path.
    pub fn from_toml_str(text: &str, origin: &Path) -> HarnessResult<Self> {
        toml::from_str(text).map_err(|source| HarnessError::Parse {
            path: origin.to_path_buf(),
            source,
        })
    }

    /// Loads a scenario file.
    ///
    /// # Errors
    ///
    /// [`HarnessError::Io`] or [`HarnessError::Parse`].
    pub fn load(path: &Path) -> HarnessResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| HarnessError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text, path)
    }

    /// The walkthrough script for `kind` on a 32-unit `u8` arena.
    #[must_use]
    pub fn demo(kind: StrategyKind) -> Self {
        let allocate = |size| Step::Allocate { size };
        let release = |address| Step::Release { address };

        let mut steps: Vec<Step> = [7, 2, 3, 5].into_iter().map(allocate).collect();
        match kind {
            StrategyKind::Linear => {}
            StrategyKind::FreeList => {
                steps.extend([0x07, 0x0c, 0x09, 0x00].into_iter().map(release));
            }
            StrategyKind::BoundaryTag => {
                steps.extend([0x0c, 0x17, 0x11, 0x02].into_iter().map(release));
            }
        }

        Self {
            strategy: kind,
            capacity: DEMO_CAPACITY,
            domain: Domain::U8,
            steps,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_scenario() {
        let text = r#"
            strategy = "free_list"
            capacity = 64
            domain = "u16"

            [[steps]]
            op = "allocate"
            size = 7

            [[steps]]
            op = "release"
            address = 0x00
        "#;

        let scenario = Scenario::from_toml_str(text, Path::new("inline")).unwrap();
        assert_eq!(scenario.strategy, StrategyKind::FreeList);
        assert_eq!(scenario.domain, Domain::U16);
        assert_eq!(
            scenario.steps,
            vec![Step::Allocate { size: 7 }, Step::Release { address: 0 }]
        );
    }

    #[test]
    fn test_domain_defaults_to_u8() {
        let scenario =
            Scenario::from_toml_str("strategy = \"linear\"\ncapacity = 8", Path::new("inline"))
                .unwrap();
        assert_eq!(scenario.domain, Domain::U8);
        assert!(scenario.steps.is_empty());
    }

    #[test]
    fn test_unknown_op_is_rejected() {
        let text = "strategy = \"linear\"\ncapacity = 8\n[[steps]]\nop = \"grow\"\nsize = 1\n";
        let err = Scenario::from_toml_str(text, Path::new("bad.toml")).unwrap_err();
        assert!(matches!(err, HarnessError::Parse { .. }));
        assert!(err.to_string().starts_with("invalid file bad.toml"));
    }

    #[test]
    fn test_step_labels() {
        assert_eq!(Step::Allocate { size: 7 }.to_string(), "allocate(7)");
        assert_eq!(Step::Release { address: 0x0c }.to_string(), "release(0x0c)");
    }

    #[test]
    fn test_demo_scripts() {
        assert_eq!(Scenario::demo(StrategyKind::Linear).steps.len(), 4);
        let tags = Scenario::demo(StrategyKind::BoundaryTag);
        assert_eq!(tags.steps[4], Step::Release { address: 0x0c });
        assert_eq!(tags.capacity, 32);
    }
}
