// ============================================================================
// Geo Module
// Great-circle distance utilities for pooling and pricing
// ============================================================================
//
// This module provides:
// - Coordinate: a lat/lng value object in degrees
// - distance_km: haversine distance on a 6371 km sphere
// - route_length_km: summed segment length of an ordered route
//
// Real road networks are out of scope; every distance in the crate is a
// great-circle distance.

mod coordinate;
mod distance;
mod errors;

pub use coordinate::Coordinate;
pub use distance::{distance_km, route_length_km, EARTH_RADIUS_KM};
pub use errors::{GeoError, GeoResult};
