// ============================================================================
// Pooling Configuration
// Tunables for matching, pricing and the default vehicle fleet
// ============================================================================

use std::str::FromStr;
use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_MAX_DETOUR_FACTOR: f64 = 0.30;
pub const DEFAULT_BASE_FARE_PER_KM: f64 = 2.5;
pub const DEFAULT_POOLING_DISCOUNT_FACTOR: f64 = 0.85;
/// Surcharge per 1% detour (0.005 = 0.5% extra per 1% detour)
pub const DEFAULT_DETOUR_SURCHARGE_RATE: f64 = 0.005;
pub const DEFAULT_VEHICLE_SEATS: u32 = 4;
pub const DEFAULT_VEHICLE_LUGGAGE: u32 = 4;
pub const DEFAULT_POOL_SIZE: usize = 50;
pub const DEFAULT_MATCHING_INTERVAL: Duration = Duration::from_secs(10);
pub const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(5);

// ============================================================================
// Pooling Configuration
// ============================================================================

/// Configuration shared by the pooling engine, fare calculator and
/// matching orchestrator.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PoolingConfig {
    /// Max detour as a fraction of direct distance (0.3 = 30% extra)
    pub max_detour_factor: f64,

    /// Base fare per km of direct distance (currency units)
    pub base_fare_per_km: f64,

    /// Fare multiplier approached as a cab fills up (0.85 = up to 15% off)
    pub pooling_discount_factor: f64,

    /// Fractional surcharge per percentage point of detour
    pub detour_surcharge_rate: f64,

    /// Seats of a provisioned default cab
    pub default_vehicle_seats: u32,

    /// Luggage capacity of a provisioned default cab
    pub default_vehicle_luggage: u32,

    /// Number of cabs provisioned when the fleet is empty
    pub default_pool_size: usize,

    /// Period of the background matching scheduler
    pub matching_interval: Duration,

    /// How long a cancellation waits on a booking claimed by a running round
    pub lock_timeout: Duration,
}

impl Default for PoolingConfig {
    fn default() -> Self {
        Self {
            max_detour_factor: DEFAULT_MAX_DETOUR_FACTOR,
            base_fare_per_km: DEFAULT_BASE_FARE_PER_KM,
            pooling_discount_factor: DEFAULT_POOLING_DISCOUNT_FACTOR,
            detour_surcharge_rate: DEFAULT_DETOUR_SURCHARGE_RATE,
            default_vehicle_seats: DEFAULT_VEHICLE_SEATS,
            default_vehicle_luggage: DEFAULT_VEHICLE_LUGGAGE,
            default_pool_size: DEFAULT_POOL_SIZE,
            matching_interval: DEFAULT_MATCHING_INTERVAL,
            lock_timeout: DEFAULT_LOCK_TIMEOUT,
        }
    }
}

impl PoolingConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: Set maximum detour factor
    pub fn with_max_detour_factor(mut self, factor: f64) -> Self {
        self.max_detour_factor = factor;
        self
    }

    /// Builder method: Set base fare per km
    pub fn with_base_fare_per_km(mut self, fare: f64) -> Self {
        self.base_fare_per_km = fare;
        self
    }

    /// Builder method: Set pooling discount factor
    pub fn with_pooling_discount_factor(mut self, factor: f64) -> Self {
        self.pooling_discount_factor = factor;
        self
    }

    /// Builder method: Set detour surcharge rate
    pub fn with_detour_surcharge_rate(mut self, rate: f64) -> Self {
        self.detour_surcharge_rate = rate;
        self
    }

    /// Builder method: Set default cab dimensions
    pub fn with_default_vehicle(mut self, seats: u32, luggage: u32) -> Self {
        self.default_vehicle_seats = seats;
        self.default_vehicle_luggage = luggage;
        self
    }

    /// Builder method: Set size of the provisioned default fleet
    pub fn with_default_pool_size(mut self, size: usize) -> Self {
        self.default_pool_size = size;
        self
    }

    /// Builder method: Set scheduler period
    pub fn with_matching_interval(mut self, interval: Duration) -> Self {
        self.matching_interval = interval;
        self
    }

    /// Builder method: Set claimed-row wait for cancellations
    pub fn with_lock_timeout(mut self, timeout: Duration) -> Self {
        self.lock_timeout = timeout;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if !self.max_detour_factor.is_finite() || self.max_detour_factor < 0.0 {
            return Err("Max detour factor must be a non-negative number".to_string());
        }

        if !self.base_fare_per_km.is_finite() || self.base_fare_per_km <= 0.0 {
            return Err("Base fare per km must be positive".to_string());
        }

        if !(self.pooling_discount_factor > 0.0 && self.pooling_discount_factor <= 1.0) {
            return Err("Pooling discount factor must be in (0, 1]".to_string());
        }

        if !self.detour_surcharge_rate.is_finite() || self.detour_surcharge_rate < 0.0 {
            return Err("Detour surcharge rate cannot be negative".to_string());
        }

        if self.default_vehicle_seats == 0 {
            return Err("Default vehicle must have at least one seat".to_string());
        }

        if self.default_pool_size == 0 {
            return Err("Default pool size must be positive".to_string());
        }

        if self.matching_interval.is_zero() {
            return Err("Matching interval must be positive".to_string());
        }

        Ok(())
    }

    /// Read overrides from the process environment on top of the defaults.
    ///
    /// Recognised variables: `MAX_DETOUR_FACTOR`, `BASE_FARE_PER_KM`,
    /// `POOLING_DISCOUNT_FACTOR`, `DETOUR_SURCHARGE_RATE`,
    /// `MATCHING_INTERVAL_SECS`. A set but unparseable variable is an error.
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`PoolingConfig::from_env`] with a custom variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(v) = parse_var::<f64, _>(&lookup, "MAX_DETOUR_FACTOR")? {
            config.max_detour_factor = v;
        }
        if let Some(v) = parse_var::<f64, _>(&lookup, "BASE_FARE_PER_KM")? {
            config.base_fare_per_km = v;
        }
        if let Some(v) = parse_var::<f64, _>(&lookup, "POOLING_DISCOUNT_FACTOR")? {
            config.pooling_discount_factor = v;
        }
        if let Some(v) = parse_var::<f64, _>(&lookup, "DETOUR_SURCHARGE_RATE")? {
            config.detour_surcharge_rate = v;
        }
        if let Some(v) = parse_var::<u64, _>(&lookup, "MATCHING_INTERVAL_SECS")? {
            config.matching_interval = Duration::from_secs(v);
        }

        config.validate()?;
        Ok(config)
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Result<Option<T>, String>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| format!("{key} has an invalid value: {raw:?}")),
    }
}

// ============================================================================
// Preset Configurations (Factory Methods)
// ============================================================================

impl PoolingConfig {
    /// Airport shuttle defaults
    /// - 30% detour tolerance
    /// - 2.5 per km, up to 15% pooling discount
    /// - 50 four-seat cabs
    pub fn airport() -> Self {
        Self::default()
    }

    /// Tight detour tolerance for premium shared rides
    /// - 10% detour tolerance
    /// - Smaller pooling discount
    pub fn premium_shared() -> Self {
        Self::default()
            .with_max_detour_factor(0.10)
            .with_pooling_discount_factor(0.95)
    }

    /// Large vans for group travel
    /// - 50% detour tolerance
    /// - 8 seats, 8 bags
    pub fn shuttle_van() -> Self {
        Self::default()
            .with_max_detour_factor(0.50)
            .with_default_vehicle(8, 8)
            .with_default_pool_size(20)
    }
}
