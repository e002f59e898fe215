// ============================================================================
// Crate Errors
// Error types for pricing and for the pooling service as a whole
// ============================================================================

use crate::geo::GeoError;
use crate::interfaces::StoreError;
use std::fmt;

// ============================================================================
// Pricing Errors
// ============================================================================

/// Errors raised by the fare calculator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PricingError {
    /// The fare formula produced NaN or infinity
    NonFinite { direct_km: f64, actual_km: f64 },
    /// The fare does not fit a decimal amount
    OutOfRange(f64),
}

impl fmt::Display for PricingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PricingError::NonFinite {
                direct_km,
                actual_km,
            } => write!(
                f,
                "fare is not finite for direct {direct_km} km and actual {actual_km} km"
            ),
            PricingError::OutOfRange(fare) => write!(f, "fare {fare} is out of decimal range"),
        }
    }
}

impl std::error::Error for PricingError {}

/// Result type alias for pricing operations
pub type PricingResult<T> = Result<T, PricingError>;

// ============================================================================
// Pooling Errors
// ============================================================================

/// Top-level error for booking, matching and scheduling operations.
#[derive(Debug, Clone, PartialEq)]
pub enum PoolingError {
    /// Caller input failed validation
    Validation(String),
    /// Invalid coordinate
    Geo(GeoError),
    /// Fare computation failed
    Pricing(PricingError),
    /// Store I/O failed or an optimistic check lost
    Store(StoreError),
    /// Invalid configuration
    Config(String),
    /// The fleet is still empty after provisioning
    NoVehicles,
    /// The background scheduler is no longer running
    SchedulerStopped,
    /// A worker running a round panicked or was cancelled
    Worker(String),
    /// A round tried an illegal state transition
    RoundState(String),
}

impl PoolingError {
    /// True when the error is an optimistic-lock conflict the caller lost.
    pub fn is_conflict(&self) -> bool {
        matches!(self, PoolingError::Store(StoreError::VersionConflict { .. }))
    }
}

impl fmt::Display for PoolingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PoolingError::Validation(msg) => write!(f, "validation failed: {msg}"),
            PoolingError::Geo(err) => write!(f, "{err}"),
            PoolingError::Pricing(err) => write!(f, "pricing failed: {err}"),
            PoolingError::Store(err) => write!(f, "store failure: {err}"),
            PoolingError::Config(msg) => write!(f, "invalid configuration: {msg}"),
            PoolingError::NoVehicles => write!(f, "no vehicles available after provisioning"),
            PoolingError::SchedulerStopped => write!(f, "matching scheduler is not running"),
            PoolingError::Worker(msg) => write!(f, "matching worker failed: {msg}"),
            PoolingError::RoundState(msg) => write!(f, "round state machine: {msg}"),
        }
    }
}

impl std::error::Error for PoolingError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PoolingError::Geo(err) => Some(err),
            PoolingError::Pricing(err) => Some(err),
            PoolingError::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<GeoError> for PoolingError {
    fn from(err: GeoError) -> Self {
        PoolingError::Geo(err)
    }
}

impl From<PricingError> for PoolingError {
    fn from(err: PricingError) -> Self {
        PoolingError::Pricing(err)
    }
}

impl From<StoreError> for PoolingError {
    fn from(err: StoreError) -> Self {
        PoolingError::Store(err)
    }
}

/// Result type alias for pooling operations
pub type PoolingResult<T> = Result<T, PoolingError>;
