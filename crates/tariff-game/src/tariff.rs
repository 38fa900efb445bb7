//! Effective tariff sampling
//!
//! A tariff rate is only drawn when a side faces a defection. Rates are
//! percentages drawn from a triangular distribution.

use rand::Rng;
use rand_distr::{Distribution, Triangular};
use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};
use crate::strategy::Move;

/// Parameters of the triangular tariff distribution, in percent
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TariffBounds {
    pub min: f64,
    pub mode: f64,
    pub max: f64,
}

impl TariffBounds {
    /// 10% to 30%, most likely 20%
    pub fn standard() -> Self {
        Self { min: 10.0, mode: 20.0, max: 30.0 }
    }

    /// 10% to 50%, most likely 25%
    pub fn escalated() -> Self {
        Self { min: 10.0, mode: 25.0, max: 50.0 }
    }
}

impl Default for TariffBounds {
    fn default() -> Self {
        Self::standard()
    }
}

/// Validated triangular sampler
#[derive(Clone, Debug)]
pub struct TariffSampler {
    bounds: TariffBounds,
    distribution: Triangular<f64>,
}

impl TariffSampler {
    pub fn new(bounds: TariffBounds) -> Result<Self> {
        let TariffBounds { min, mode, max } = bounds;
        let finite = min.is_finite() && mode.is_finite() && max.is_finite();
        if !finite || min > mode || mode > max {
            return Err(GameError::InvalidTariffBounds { min, mode, max });
        }
        // rand_distr orders the arguments (min, max, mode)
        let distribution = Triangular::new(min, max, mode)
            .map_err(|_| GameError::InvalidTariffBounds { min, mode, max })?;

        Ok(Self { bounds, distribution })
    }

    pub fn bounds(&self) -> TariffBounds {
        self.bounds
    }

    /// Draw one tariff rate in [min, max]
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        // Rounding in the inverse CDF can land one ulp outside the support.
        self.distribution
            .sample(rng)
            .clamp(self.bounds.min, self.bounds.max)
    }

    /// Tariff faced by a side given the opponent's move: sampled on
    /// defection, exactly zero otherwise (no draw is consumed)
    pub fn faced<R: Rng + ?Sized>(&self, opponent: Move, rng: &mut R) -> f64 {
        match opponent {
            Move::Defect => self.sample(rng),
            Move::Cooperate => 0.0,
        }
    }
}
