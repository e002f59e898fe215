// ============================================================================
// Fare Calculator
// Per-passenger pricing with pooling discount and detour surcharge
// ============================================================================

use crate::domain::PoolingConfig;
use crate::error::{PricingError, PricingResult};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One passenger's distances within a ride group.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PassengerLeg {
    /// Straight pickup-to-dropoff distance
    pub direct_km: f64,
    /// Distance actually travelled on board
    pub actual_km: f64,
}

impl PassengerLeg {
    pub fn new(direct_km: f64, actual_km: f64) -> Self {
        Self {
            direct_km,
            actual_km,
        }
    }
}

/// Intermediate factors of a single fare, before rounding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FareQuote {
    pub base_fare: f64,
    pub pool_discount: f64,
    /// Detour factor after clamping to `[0, max_detour_factor]`
    pub detour_factor: f64,
    pub detour_surcharge: f64,
}

impl FareQuote {
    pub fn total(&self) -> f64 {
        self.base_fare * self.pool_discount * self.detour_surcharge
    }
}

/// Prices passengers of a ride group.
///
/// ```text
/// fare = direct_km * base_fare_per_km
///      * (1 - (1 - discount) * (n - 1) / n)      n = shared_count, 1 when n <= 1
///      * (1 + detour_factor * surcharge_rate * 100)
/// ```
///
/// Fares are rounded half away from zero to two decimal places.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FareCalculator {
    base_fare_per_km: f64,
    pooling_discount_factor: f64,
    max_detour_factor: f64,
    detour_surcharge_rate: f64,
}

impl Default for FareCalculator {
    fn default() -> Self {
        Self::new(&PoolingConfig::default())
    }
}

impl FareCalculator {
    pub fn new(config: &PoolingConfig) -> Self {
        Self {
            base_fare_per_km: config.base_fare_per_km,
            pooling_discount_factor: config.pooling_discount_factor,
            max_detour_factor: config.max_detour_factor,
            detour_surcharge_rate: config.detour_surcharge_rate,
        }
    }

    /// Multiplier applied for `shared_count` riders in one cab.
    ///
    /// Approaches `pooling_discount_factor` as the cab fills up.
    #[inline]
    pub fn pool_discount(&self, shared_count: usize) -> f64 {
        if shared_count <= 1 {
            return 1.0;
        }
        let n = shared_count as f64;
        1.0 - (1.0 - self.pooling_discount_factor) * (n - 1.0) / n
    }

    /// Detour factor clamped to `[0, max_detour_factor]`; 0 for a
    /// zero-length request.
    #[inline]
    pub fn detour_factor(&self, direct_km: f64, actual_km: f64) -> f64 {
        if direct_km <= 0.0 {
            return 0.0;
        }
        ((actual_km - direct_km) / direct_km).clamp(0.0, self.max_detour_factor)
    }

    pub fn quote(&self, direct_km: f64, actual_km: f64, shared_count: usize) -> FareQuote {
        let detour_factor = self.detour_factor(direct_km, actual_km);
        FareQuote {
            base_fare: direct_km * self.base_fare_per_km,
            pool_discount: self.pool_discount(shared_count),
            detour_factor,
            detour_surcharge: 1.0 + detour_factor * self.detour_surcharge_rate * 100.0,
        }
    }

    /// Fare for one passenger, rounded to two decimal places.
    ///
    /// # Example
    /// ```
    /// use ride_pooling::engine::FareCalculator;
    /// use rust_decimal::Decimal;
    ///
    /// let calculator = FareCalculator::default();
    /// assert_eq!(calculator.compute_fare(10.0, 10.0, 1).unwrap(), Decimal::new(2500, 2));
    /// assert_eq!(calculator.compute_fare(10.0, 10.0, 3).unwrap(), Decimal::new(2250, 2));
    /// ```
    pub fn compute_fare(
        &self,
        direct_km: f64,
        actual_km: f64,
        shared_count: usize,
    ) -> PricingResult<Decimal> {
        let fare = self.quote(direct_km, actual_km, shared_count).total();
        if !fare.is_finite() {
            return Err(PricingError::NonFinite {
                direct_km,
                actual_km,
            });
        }

        let amount = Decimal::from_f64(fare).ok_or(PricingError::OutOfRange(fare))?;
        Ok(amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
    }

    /// Sum of rounded per-passenger fares for one ride.
    pub fn ride_total(&self, legs: &[PassengerLeg], shared_count: usize) -> PricingResult<Decimal> {
        legs.iter().try_fold(Decimal::ZERO, |total, leg| {
            Ok(total + self.compute_fare(leg.direct_km, leg.actual_km, shared_count)?)
        })
    }
}
