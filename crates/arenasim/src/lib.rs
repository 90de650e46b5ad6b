//! # ARENASIM Harness
//!
//! The view and control side of the simulator: scenario files, the scripted
//! runner, and a terminal renderer. Nothing here touches arena contents
//! directly; everything goes through [`arenasim_core::Strategy`].
//!
//! ## Example
//!
//! ```rust
//! use arenasim::{Renderer, Runner, Scenario};
//! use arenasim_core::StrategyKind;
//!
//! let scenario = Scenario::demo(StrategyKind::BoundaryTag);
//! let mut runner = Runner::<u8>::new(&scenario)?;
//! let renderer = Renderer::new(160, false);
//!
//! let summary = runner.run(|report| {
//!     println!("{}\n{}", report.heading(), renderer.render(&report.snapshot));
//!     Ok(())
//! })?;
//! assert_eq!(summary.releases, 4);
//! # Ok::<(), arenasim::HarnessError>(())
//! ```

#![deny(unsafe_code)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod error;
pub mod logging;
pub mod render;
pub mod runner;
pub mod scenario;

pub use config::{DisplayConfig, HarnessConfig, LoggingConfig};
pub use error::{HarnessError, HarnessResult};
pub use logging::init_tracing;
pub use render::Renderer;
pub use runner::{RunSummary, Runner, StepReport};
pub use scenario::{Domain, Scenario, Step};
