//! selection — four-way specification fit and nested model choice.
//!
//! Purpose
//! -------
//! Fit OLS, spatial lag, spatial error and spatial Durbin models over one
//! design, summarize them side by side, and choose between the nested pair
//! with a likelihood-ratio test.
//!
//! Key behaviors
//! -------------
//! - [`fit_all`] returns a [`ModelSet`]; [`ModelSet::comparison_table`]
//!   gives one [`ComparisonRow`] per specification.
//! - [`compare`] runs an LR test; [`select_nested`] prefers the simpler
//!   model unless the test rejects it.

pub mod model_set;
pub mod policy;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::model_set::{fit_all, CoefficientSummary, ComparisonRow, ModelSet};
pub use self::policy::{
    compare, select_error_vs_durbin, select_nested, Selection, DEFAULT_SIGNIFICANCE,
};

// ---- Optional convenience prelude for downstream crates -------------------

pub mod prelude {
    pub use super::model_set::{fit_all, ModelSet};
    pub use super::policy::{compare, select_error_vs_durbin, Selection};
}
