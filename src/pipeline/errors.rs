//! pipeline::errors — top-level error of an analysis run.
//!
//! Every layer's error converts into [`AnalysisError`] so the orchestration
//! code can use `?` throughout. File access goes through `anyhow` context
//! and lands in [`AnalysisError::Anyhow`].
use crate::{
    accessibility::errors::AccessError, data::errors::DataError, impacts::errors::ImpactError,
    optimization::errors::OptError, regression::errors::RegressionError,
    spatial::errors::SpatialError, statistical_tests::errors::LRError,
};

pub type AnalysisResult<T> = Result<T, AnalysisError>;

#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisError {
    // ---- Configuration ----
    /// TOML text could not be parsed into the configuration mirror.
    ConfigParse(String),
    InvalidConfig { field: &'static str, reason: String },
    UnknownOutcome { name: String },
    /// Signal term requested but the parks carry no signal counts.
    MissingSignal,

    // ---- Layers ----
    Data(DataError),
    Spatial(SpatialError),
    Access(AccessError),
    Regression(RegressionError),
    Selection(LRError),
    Impact(ImpactError),
    Optimization(OptError),

    // ---- Anyhow catchall ----
    Anyhow(String),
}

impl std::error::Error for AnalysisError {}

impl std::fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnalysisError::ConfigParse(msg) => write!(f, "Failed to parse analysis config: {msg}"),
            AnalysisError::InvalidConfig { field, reason } => {
                write!(f, "Invalid analysis config field '{field}': {reason}")
            }
            AnalysisError::UnknownOutcome { name } => {
                write!(f, "Outcome '{name}' is not a column of the tract table")
            }
            AnalysisError::MissingSignal => {
                write!(f, "Signal term requested but parks carry no signal counts")
            }
            AnalysisError::Data(e) => write!(f, "Data error: {e}"),
            AnalysisError::Spatial(e) => write!(f, "Spatial weights error: {e}"),
            AnalysisError::Access(e) => write!(f, "Accessibility error: {e}"),
            AnalysisError::Regression(e) => write!(f, "Regression error: {e}"),
            AnalysisError::Selection(e) => write!(f, "Model selection error: {e}"),
            AnalysisError::Impact(e) => write!(f, "Impact summary error: {e}"),
            AnalysisError::Optimization(e) => write!(f, "Optimizer configuration error: {e}"),
            AnalysisError::Anyhow(msg) => write!(f, "{msg}"),
        }
    }
}

impl From<anyhow::Error> for AnalysisError {
    fn from(err: anyhow::Error) -> Self {
        AnalysisError::Anyhow(format!("{err:#}"))
    }
}

impl From<toml::de::Error> for AnalysisError {
    fn from(err: toml::de::Error) -> Self {
        AnalysisError::ConfigParse(err.to_string())
    }
}

impl From<DataError> for AnalysisError {
    fn from(err: DataError) -> Self {
        AnalysisError::Data(err)
    }
}

impl From<SpatialError> for AnalysisError {
    fn from(err: SpatialError) -> Self {
        AnalysisError::Spatial(err)
    }
}

impl From<AccessError> for AnalysisError {
    fn from(err: AccessError) -> Self {
        AnalysisError::Access(err)
    }
}

impl From<RegressionError> for AnalysisError {
    fn from(err: RegressionError) -> Self {
        AnalysisError::Regression(err)
    }
}

impl From<LRError> for AnalysisError {
    fn from(err: LRError) -> Self {
        AnalysisError::Selection(err)
    }
}

impl From<ImpactError> for AnalysisError {
    fn from(err: ImpactError) -> Self {
        AnalysisError::Impact(err)
    }
}

impl From<OptError> for AnalysisError {
    fn from(err: OptError) -> Self {
        AnalysisError::Optimization(err)
    }
}
