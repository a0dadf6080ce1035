//! accessibility::coefficients — logsum coefficients and their box bounds.
//!
//! Purpose
//! -------
//! Represent the coefficient vector `β = (β_d, β_s, β_t?)` and the box that
//! encodes the behavioral sign restrictions (accessibility never increases
//! with distance, never decreases with park size).
//!
//! Key behaviors
//! -------------
//! - [`Interval`] maps between an unconstrained real θ and a bounded value:
//!   scaled logistic for two finite ends, shifted softplus for one finite
//!   end, identity when unbounded. Every θ maps inside the closed interval,
//!   so the optimizer cannot propose an infeasible coefficient.
//! - [`Interval::boundary`] reports whether a value sits at an end, which is
//!   how boundary convergence is flagged.
//!
//! Conventions
//! -----------
//! - Intervals are closed at finite ends; infinite ends are allowed.
//! - A starting value on (or within [`BOUNDARY_NUDGE`] of) a finite end is
//!   moved inward by [`START_OFFSET`]`·max(1, |end|)` before inversion, so
//!   θ starts where the map still has slope; the two-sided map keeps the
//!   start within `[START_FRACTION, 1 − START_FRACTION]` of the width.
use crate::{
    accessibility::errors::{AccessError, AccessResult},
    optimization::numerical_stability::transformations::{
        safe_logistic, safe_logit, safe_softplus, safe_softplus_inv,
    },
};

/// Distance from an end below which a starting value counts as on it.
pub const BOUNDARY_NUDGE: f64 = 1e-8;

/// Relative inward offset for a start on a one-sided bound.
pub const START_OFFSET: f64 = 0.1;

/// Smallest interior fraction for a start in a two-sided interval.
pub const START_FRACTION: f64 = 0.05;

/// Which end of an interval a value sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundSide {
    Lower,
    Upper,
}

/// Closed interval `[lower, upper]` with possibly infinite ends.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    lower: f64,
    upper: f64,
}

impl Interval {
    pub const UNBOUNDED: Interval = Interval { lower: f64::NEG_INFINITY, upper: f64::INFINITY };

    /// # Errors
    /// `InvalidBounds` when either end is NaN, `lower >= upper`, or an end
    /// is an infinity on the wrong side.
    pub fn new(coefficient: &'static str, lower: f64, upper: f64) -> AccessResult<Self> {
        let ok = !lower.is_nan()
            && !upper.is_nan()
            && lower < upper
            && lower != f64::INFINITY
            && upper != f64::NEG_INFINITY;
        if !ok {
            return Err(AccessError::InvalidBounds { coefficient, lower, upper });
        }
        Ok(Interval { lower, upper })
    }

    /// `(−∞, 0]`.
    pub fn non_positive() -> Self {
        Interval { lower: f64::NEG_INFINITY, upper: 0.0 }
    }

    /// `[0, ∞)`.
    pub fn non_negative() -> Self {
        Interval { lower: 0.0, upper: f64::INFINITY }
    }

    pub fn lower(&self) -> f64 {
        self.lower
    }

    pub fn upper(&self) -> f64 {
        self.upper
    }

    pub fn contains(&self, x: f64) -> bool {
        x >= self.lower && x <= self.upper
    }

    /// Bounded value for an unconstrained θ.
    pub fn from_unconstrained(&self, theta: f64) -> f64 {
        match (self.lower.is_finite(), self.upper.is_finite()) {
            (true, true) => {
                let x = self.lower + (self.upper - self.lower) * safe_logistic(theta);
                x.clamp(self.lower, self.upper)
            }
            (true, false) => self.lower + safe_softplus(theta),
            (false, true) => self.upper - safe_softplus(theta),
            (false, false) => theta,
        }
    }

    /// Unconstrained θ for a value inside the interval.
    ///
    /// Values on an end are moved inward first (see [`START_OFFSET`] and
    /// [`START_FRACTION`]); interior values round-trip exactly.
    pub fn to_unconstrained(&self, x: f64) -> f64 {
        match (self.lower.is_finite(), self.upper.is_finite()) {
            (true, true) => {
                let width = self.upper - self.lower;
                let mut frac = (x - self.lower) / width;
                if frac * width <= BOUNDARY_NUDGE || (1.0 - frac) * width <= BOUNDARY_NUDGE {
                    frac = frac.clamp(START_FRACTION, 1.0 - START_FRACTION);
                }
                safe_logit(frac)
            }
            (true, false) => safe_softplus_inv(inward_gap(x - self.lower, self.lower)),
            (false, true) => safe_softplus_inv(inward_gap(self.upper - x, self.upper)),
            (false, false) => x,
        }
    }

    /// End of the interval `x` lies on, within `tol · max(1, |end|)`.
    pub fn boundary(&self, x: f64, tol: f64) -> Option<BoundSide> {
        if self.lower.is_finite() && x - self.lower <= tol * self.lower.abs().max(1.0) {
            return Some(BoundSide::Lower);
        }
        if self.upper.is_finite() && self.upper - x <= tol * self.upper.abs().max(1.0) {
            return Some(BoundSide::Upper);
        }
        None
    }
}

fn inward_gap(gap: f64, end: f64) -> f64 {
    if gap <= BOUNDARY_NUDGE {
        START_OFFSET * end.abs().max(1.0)
    } else {
        gap
    }
}

/// Box constraints on `(β_d, β_s, β_t)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoefficientBounds {
    pub distance: Interval,
    pub size: Interval,
    pub signal: Interval,
}

impl Default for CoefficientBounds {
    /// `β_d ∈ (−∞, 0]`, `β_s ∈ [0, ∞)`, `β_t` unconstrained.
    fn default() -> Self {
        CoefficientBounds {
            distance: Interval::non_positive(),
            size: Interval::non_negative(),
            signal: Interval::UNBOUNDED,
        }
    }
}

impl CoefficientBounds {
    /// Check that `start` lies inside the box.
    ///
    /// # Errors
    /// `StartOutsideBounds` naming the first offending coefficient.
    pub fn check(&self, start: &LogsumCoefficients) -> AccessResult<()> {
        let mut pairs = vec![("distance", start.distance, self.distance), ("size", start.size, self.size)];
        if let Some(t) = start.signal {
            pairs.push(("signal", t, self.signal));
        }
        for (coefficient, value, iv) in pairs {
            if !iv.contains(value) {
                return Err(AccessError::StartOutsideBounds {
                    coefficient,
                    value,
                    lower: iv.lower,
                    upper: iv.upper,
                });
            }
        }
        Ok(())
    }
}

/// Logsum coefficients `(β_d, β_s, β_t?)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogsumCoefficients {
    pub distance: f64,
    pub size: f64,
    pub signal: Option<f64>,
}

impl LogsumCoefficients {
    pub fn new(distance: f64, size: f64, signal: Option<f64>) -> Self {
        LogsumCoefficients { distance, size, signal }
    }
}

/// Boundary flags of a calibrated coefficient vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BoundaryFlags {
    pub distance: Option<BoundSide>,
    pub size: Option<BoundSide>,
    pub signal: Option<BoundSide>,
}

impl BoundaryFlags {
    pub fn any(&self) -> bool {
        self.distance.is_some() || self.size.is_some() || self.signal.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // Every θ must map inside the interval, including extreme θ.
    //
    // Given
    // -----
    // - Intervals [−2, 3], [0, ∞), (−∞, 0], ℝ and θ ∈ {−800, −3, 0, 4, 800}.
    //
    // Expect
    // ------
    // - `contains(from_unconstrained(θ))` for all pairs.
    fn every_theta_maps_inside_interval() {
        let intervals = [
            Interval::new("t", -2.0, 3.0).unwrap(),
            Interval::non_negative(),
            Interval::non_positive(),
            Interval::UNBOUNDED,
        ];
        for iv in intervals {
            for theta in [-800.0, -3.0, 0.0, 4.0, 800.0] {
                let x = iv.from_unconstrained(theta);
                assert!(iv.contains(x), "{iv:?} theta {theta} -> {x}");
            }
        }
    }

    #[test]
    // Purpose
    // -------
    // Interior values survive the θ round trip; a start on an end maps to
    // a θ with usable slope, a fixed step inside the interval.
    //
    // Given
    // -----
    // - x = 1.3 on [−2, 3], x = −0.7 on (−∞, 0].
    // - Starts on an end: 0 on [0, ∞), 0 on (−∞, 0], −2 and 3 on [−2, 3],
    //   −5 on [−5, ∞).
    //
    // Expect
    // ------
    // - Interior round trips within 1e-9.
    // - End starts come back at 0.1, −0.1, −1.75, 2.75, and −4.5.
    fn round_trip_recovers_interior_values_and_moves_end_starts_inward() {
        let iv = Interval::new("t", -2.0, 3.0).unwrap();
        assert!((iv.from_unconstrained(iv.to_unconstrained(1.3)) - 1.3).abs() < 1e-9);
        let neg = Interval::non_positive();
        assert!((neg.from_unconstrained(neg.to_unconstrained(-0.7)) + 0.7).abs() < 1e-9);
        let pos = Interval::non_negative();
        let shifted = Interval::new("t", -5.0, f64::INFINITY).unwrap();
        for (interval, start, want) in [
            (pos, 0.0, 0.1),
            (neg, 0.0, -0.1),
            (iv, -2.0, -1.75),
            (iv, 3.0, 2.75),
            (shifted, -5.0, -4.5),
        ] {
            let back = interval.from_unconstrained(interval.to_unconstrained(start));
            assert!((back - want).abs() < 1e-9, "{interval:?} {start} -> {back}");
        }
        assert_eq!(pos.boundary(1e-9, 1e-6), Some(BoundSide::Lower));
        assert_eq!(neg.boundary(-1e-9, 1e-6), Some(BoundSide::Upper));
        assert_eq!(neg.boundary(-0.5, 1e-6), None);
    }

    #[test]
    fn invalid_intervals_and_starts_are_rejected() {
        assert!(Interval::new("d", 1.0, 1.0).is_err());
        assert!(Interval::new("d", f64::NAN, 1.0).is_err());
        let bounds = CoefficientBounds::default();
        let err = bounds.check(&LogsumCoefficients::new(0.5, 1.0, None)).unwrap_err();
        assert!(matches!(err, AccessError::StartOutsideBounds { coefficient: "distance", .. }));
        assert!(bounds.check(&LogsumCoefficients::new(0.0, 0.0, Some(-3.0))).is_ok());
    }
}
