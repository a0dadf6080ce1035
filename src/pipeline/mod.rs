//! pipeline — end-to-end analysis runs.
//!
//! Purpose
//! -------
//! Orchestrate the accessibility, spatial, regression, selection and impact
//! layers for a set of outcomes, driven by one [`AnalysisConfig`].
//!
//! Key behaviors
//! -------------
//! - [`AnalysisConfig`] is built in code or loaded from TOML.
//! - [`run_analysis`] returns an [`AnalysisReport`]: comparison table,
//!   calibrated coefficients and log-likelihood, standardized accessibility,
//!   selected model and impacts per outcome.
//! - Progress is reported through the `log` facade; the caller installs the
//!   logger.

pub mod config;
pub mod errors;
pub mod run;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::config::AnalysisConfig;
pub use self::errors::{AnalysisError, AnalysisResult};
pub use self::run::{run_analysis, AnalysisReport, OutcomeReport};

// ---- Optional convenience prelude for downstream crates -------------------

pub mod prelude {
    pub use super::config::AnalysisConfig;
    pub use super::errors::{AnalysisError, AnalysisResult};
    pub use super::run::{run_analysis, AnalysisReport};
}
