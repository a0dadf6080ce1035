//! park_access — park accessibility logsums and spatial regression of tract
//! health outcomes.
//!
//! Purpose
//! -------
//! Serve as the crate root. The crate estimates how park accessibility
//! relates to tract-level health outcomes: it builds a choice-theoretic
//! logsum accessibility index over tracts × parks, calibrates its
//! coefficients by maximizing the likelihood of a spatial regression, fits
//! OLS / spatial lag / spatial error / spatial Durbin models over the
//! augmented design, selects between nested specifications, and summarizes
//! direct and spillover impacts.
//!
//! Key behaviors
//! -------------
//! - [`data`]: validated tract and park tables, centroid join, attribute
//!   transforms.
//! - [`accessibility`]: distance matrix, logsum engine, standardization, and
//!   the bounded calibrator.
//! - [`spatial`]: queen / distance-band adjacency, row-standardized weights
//!   with isolates, power traces.
//! - [`regression`]: named designs, the [`regression::RegressionFitter`]
//!   seam, and concentrated maximum-likelihood estimators.
//! - [`selection`], [`statistical_tests`]: four-way fits, likelihood-ratio
//!   tests, nested selection.
//! - [`impacts`]: simulated direct / indirect / total effects.
//! - [`pipeline`]: configuration and the end-to-end [`pipeline::run_analysis`].
//! - [`optimization`], [`inference`]: the Argmin-backed maximizer, scalar
//!   searches, finite differences, and covariance from observed information.
//!
//! Invariants & assumptions
//! ------------------------
//! - Inputs are cleaned, reprojected to a planar distance-preserving CRS, and
//!   complete-case before they reach this crate.
//! - Inputs are immutable; every stage returns new values.
//! - Failures are explicit `Result` errors; Monte Carlo steps are seeded.
//!
//! Conventions
//! -----------
//! - Vectors and matrices are `ndarray` containers; decompositions go
//!   through `nalgebra` inside the numerical modules only.
//! - Log-likelihoods are summed over tracts, never averaged.
//!
//! Downstream usage
//! ----------------
//! - Most callers build an [`pipeline::AnalysisConfig`] and call
//!   [`pipeline::run_analysis`]. The layer modules are public for callers
//!   that need one stage on its own (e.g. only the logsum engine).
//!
//! Testing notes
//! -------------
//! - Each module carries unit tests; `tests/` exercises the whole pipeline
//!   on synthetic lattices.

pub mod accessibility;
pub mod data;
pub mod impacts;
pub mod inference;
pub mod optimization;
pub mod pipeline;
pub mod regression;
pub mod selection;
pub mod spatial;
pub mod statistical_tests;
