//! Flight conditions and the training domain.

use crate::error::{ModelError, ModelResult};
use serde::{Deserialize, Serialize};
use sp_core::ensure_finite;

/// Freestream condition a prediction is requested for.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlightCondition {
    /// Mach number
    pub mach: f64,
    /// Angle of attack [deg]
    pub alpha: f64,
    /// Sideslip angle [deg]
    pub beta: f64,
}

impl FlightCondition {
    pub fn new(mach: f64, alpha: f64, beta: f64) -> Self {
        Self { mach, alpha, beta }
    }

    /// Reject NaN and infinite parameters.
    pub fn validate(&self) -> ModelResult<()> {
        ensure_finite(self.mach, "mach")?;
        ensure_finite(self.alpha, "alpha")?;
        ensure_finite(self.beta, "beta")?;
        Ok(())
    }

    pub fn as_array(&self) -> [f64; 3] {
        [self.mach, self.alpha, self.beta]
    }
}

/// Closed interval of one training parameter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub lo: f64,
    pub hi: f64,
}

impl Bounds {
    pub const fn new(lo: f64, hi: f64) -> Self {
        Self { lo, hi }
    }

    /// Affine map into `[0, 1]`: `(raw - lo) / (hi - lo)`.
    #[inline]
    pub fn normalize(&self, raw: f64) -> f64 {
        (raw - self.lo) / (self.hi - self.lo)
    }

    pub fn contains(&self, value: f64) -> bool {
        (self.lo..=self.hi).contains(&value)
    }

    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.lo, self.hi)
    }

    fn validate(&self, what: &str) -> ModelResult<()> {
        if !(self.lo.is_finite() && self.hi.is_finite()) || self.hi <= self.lo {
            return Err(ModelError::invalid(
                "training domain",
                format!("{what} bounds [{}, {}] are not an increasing interval", self.lo, self.hi),
            ));
        }
        Ok(())
    }
}

/// Parameter box the regressors were trained on.
///
/// Normalization is a property of the trained artifact and is never exposed
/// as a per-call option.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrainingDomain {
    pub mach: Bounds,
    pub alpha: Bounds,
    pub beta: Bounds,
}

impl Default for TrainingDomain {
    fn default() -> Self {
        Self::HYPERSONIC
    }
}

impl TrainingDomain {
    /// mach ∈ [5, 7], alpha ∈ [0, 8] deg, beta ∈ [0, 8] deg.
    pub const HYPERSONIC: TrainingDomain = TrainingDomain {
        mach: Bounds::new(5.0, 7.0),
        alpha: Bounds::new(0.0, 8.0),
        beta: Bounds::new(0.0, 8.0),
    };

    pub fn validate(&self) -> ModelResult<()> {
        self.mach.validate("mach")?;
        self.alpha.validate("alpha")?;
        self.beta.validate("beta")?;
        Ok(())
    }

    /// Normalized model input `(mach, alpha, beta)`.
    pub fn normalize(&self, condition: &FlightCondition) -> [f64; 3] {
        [
            self.mach.normalize(condition.mach),
            self.alpha.normalize(condition.alpha),
            self.beta.normalize(condition.beta),
        ]
    }

    fn parameters(&self, condition: &FlightCondition) -> [(&'static str, f64, Bounds); 3] {
        [
            ("mach", condition.mach, self.mach),
            ("alpha", condition.alpha, self.alpha),
            ("beta", condition.beta, self.beta),
        ]
    }

    /// First parameter lying outside its bounds, if any.
    pub fn first_violation(&self, condition: &FlightCondition) -> Option<(&'static str, f64, Bounds)> {
        self.parameters(condition)
            .into_iter()
            .find(|(_, value, bounds)| !bounds.contains(*value))
    }

    pub fn contains(&self, condition: &FlightCondition) -> bool {
        self.first_violation(condition).is_none()
    }

    pub fn clamp(&self, condition: &FlightCondition) -> FlightCondition {
        FlightCondition {
            mach: self.mach.clamp(condition.mach),
            alpha: self.alpha.clamp(condition.alpha),
            beta: self.beta.clamp(condition.beta),
        }
    }
}

/// What to do with a condition outside the training domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DomainPolicy {
    /// Predict anyway and log a warning; results are unvalidated extrapolations.
    #[default]
    Extrapolate,
    /// Project the condition onto the training box.
    Clamp,
    /// Fail with `ModelError::OutOfDomain`.
    Reject,
}

impl DomainPolicy {
    /// Resolve the condition the model is actually evaluated at.
    pub fn apply(
        self,
        domain: &TrainingDomain,
        condition: &FlightCondition,
    ) -> ModelResult<FlightCondition> {
        condition.validate()?;

        let Some((parameter, value, bounds)) = domain.first_violation(condition) else {
            return Ok(*condition);
        };

        match self {
            DomainPolicy::Extrapolate => {
                tracing::warn!(
                    parameter,
                    value,
                    lo = bounds.lo,
                    hi = bounds.hi,
                    "flight condition outside training domain; prediction is extrapolated"
                );
                Ok(*condition)
            }
            DomainPolicy::Clamp => {
                let clamped = domain.clamp(condition);
                tracing::warn!(
                    parameter,
                    value,
                    mach = clamped.mach,
                    alpha = clamped.alpha,
                    beta = clamped.beta,
                    "flight condition outside training domain; clamped"
                );
                Ok(clamped)
            }
            DomainPolicy::Reject => Err(ModelError::OutOfDomain {
                parameter,
                value,
                lo: bounds.lo,
                hi: bounds.hi,
            }),
        }
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn in_domain_conditions_normalize_into_unit_cube(
            mach in 5.0_f64..=7.0,
            alpha in 0.0_f64..=8.0,
            beta in 0.0_f64..=8.0,
        ) {
            let domain = TrainingDomain::HYPERSONIC;
            let x = domain.normalize(&FlightCondition::new(mach, alpha, beta));
            for v in x {
                prop_assert!((0.0..=1.0).contains(&v), "normalized value {} out of [0,1]", v);
            }
        }

        #[test]
        fn clamped_conditions_are_inside(
            mach in -20.0_f64..20.0,
            alpha in -20.0_f64..20.0,
            beta in -20.0_f64..20.0,
        ) {
            let domain = TrainingDomain::HYPERSONIC;
            let clamped = domain.clamp(&FlightCondition::new(mach, alpha, beta));
            prop_assert!(domain.contains(&clamped));
        }
    }
}
