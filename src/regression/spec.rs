//! regression::spec — the four model specifications.
use crate::regression::errors::{RegressionError, RegressionResult};
use serde::Deserialize;
use std::{fmt, str::FromStr};

/// Model specification fitted over a shared design.
///
/// - `Ols`: `y = Xβ + ε`.
/// - `Lag` (SAR): `y = ρWy + Xβ + ε`.
/// - `Error` (SEM): `y = Xβ + u`, `u = λWu + ε`.
/// - `Durbin` (SDM): `y = ρWy + Xβ + WXθ + ε`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelSpec {
    Ols,
    #[serde(alias = "sar")]
    Lag,
    #[serde(alias = "sem")]
    Error,
    #[serde(alias = "sdm")]
    Durbin,
}

impl ModelSpec {
    pub const ALL: [ModelSpec; 4] =
        [ModelSpec::Ols, ModelSpec::Lag, ModelSpec::Error, ModelSpec::Durbin];

    /// Whether the outcome itself is spatially lagged (`ρWy` term).
    pub fn has_lag(&self) -> bool {
        matches!(self, ModelSpec::Lag | ModelSpec::Durbin)
    }

    /// Whether the specification needs a weights matrix.
    pub fn is_spatial(&self) -> bool {
        !matches!(self, ModelSpec::Ols)
    }
}

impl fmt::Display for ModelSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ModelSpec::Ols => "ols",
            ModelSpec::Lag => "lag",
            ModelSpec::Error => "error",
            ModelSpec::Durbin => "durbin",
        };
        f.write_str(name)
    }
}

impl FromStr for ModelSpec {
    type Err = RegressionError;

    fn from_str(s: &str) -> RegressionResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ols" => Ok(ModelSpec::Ols),
            "lag" | "sar" => Ok(ModelSpec::Lag),
            "error" | "sem" => Ok(ModelSpec::Error),
            "durbin" | "sdm" => Ok(ModelSpec::Durbin),
            _ => Err(RegressionError::InvalidSpec { name: s.to_string() }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_names_and_aliases_case_insensitively() {
        assert_eq!("SAR".parse::<ModelSpec>().unwrap(), ModelSpec::Lag);
        assert_eq!(" error ".parse::<ModelSpec>().unwrap(), ModelSpec::Error);
        assert_eq!("sdm".parse::<ModelSpec>().unwrap(), ModelSpec::Durbin);
        assert!("probit".parse::<ModelSpec>().is_err());
        for spec in ModelSpec::ALL {
            assert_eq!(spec.to_string().parse::<ModelSpec>().unwrap(), spec);
        }
        assert!(ModelSpec::Durbin.has_lag() && !ModelSpec::Error.has_lag());
    }
}
