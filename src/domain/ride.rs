// ============================================================================
// Ride Domain Model
// ============================================================================

use crate::domain::{BookingId, VehicleId};
use crate::geo::Coordinate;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RideId(Uuid);

impl RideId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for RideId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RideId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RideStatus {
    Active,
}

impl RideStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RideStatus::Active => "ACTIVE",
        }
    }
}

/// One vehicle trip carrying one or more bookings.
///
/// Aggregates stay `None` until the matching round that created the ride
/// writes them.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Ride {
    pub id: RideId,
    pub vehicle_id: VehicleId,
    pub total_distance_km: Option<f64>,
    pub total_fare: Option<Decimal>,
    pub status: RideStatus,
    pub created_at: DateTime<Utc>,
}

impl Ride {
    pub fn new(vehicle_id: VehicleId) -> Self {
        Self {
            id: RideId::new(),
            vehicle_id,
            total_distance_km: None,
            total_fare: None,
            status: RideStatus::Active,
            created_at: Utc::now(),
        }
    }
}

// ============================================================================
// Waypoints
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum WaypointKind {
    Pickup,
    Dropoff,
}

impl WaypointKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            WaypointKind::Pickup => "PICKUP",
            WaypointKind::Dropoff => "DROPOFF",
        }
    }
}

/// A stop on a ride's route.
///
/// `sequence` is 1-based and unique within the ride that owns the stop.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Waypoint {
    pub booking_id: BookingId,
    pub kind: WaypointKind,
    pub sequence: u32,
    pub location: Coordinate,
}

impl Waypoint {
    pub fn pickup(booking_id: BookingId, sequence: u32, location: Coordinate) -> Self {
        Self {
            booking_id,
            kind: WaypointKind::Pickup,
            sequence,
            location,
        }
    }

    pub fn dropoff(booking_id: BookingId, sequence: u32, location: Coordinate) -> Self {
        Self {
            booking_id,
            kind: WaypointKind::Dropoff,
            sequence,
            location,
        }
    }
}
