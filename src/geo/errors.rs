// ============================================================================
// Geo Errors
// Error types for coordinate validation
// ============================================================================

use std::fmt;

/// Errors raised when a coordinate is outside the valid WGS84 degree range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GeoError {
    /// Latitude outside [-90, 90] or not finite
    InvalidLatitude(f64),
    /// Longitude outside [-180, 180] or not finite
    InvalidLongitude(f64),
}

impl fmt::Display for GeoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeoError::InvalidLatitude(lat) => {
                write!(f, "invalid latitude: {lat}. Must be between -90 and 90")
            },
            GeoError::InvalidLongitude(lng) => {
                write!(f, "invalid longitude: {lng}. Must be between -180 and 180")
            },
        }
    }
}

impl std::error::Error for GeoError {}

/// Result type alias for geo operations
pub type GeoResult<T> = Result<T, GeoError>;
