// ============================================================================
// Domain Models Module
// Contains all core domain entities and value objects
// ============================================================================

pub mod booking;
pub mod config;
pub mod passenger;
pub mod ride;
pub mod round;
pub mod vehicle;

pub use booking::{Booking, BookingId, BookingRequest};
pub use config::PoolingConfig;
pub use passenger::{Passenger, PassengerId};
pub use ride::{Ride, RideId, RideStatus, Waypoint, WaypointKind};
pub use round::{RoundId, RoundState, RoundSummary};
pub use vehicle::{Vehicle, VehicleId, VehiclePool};

// Re-export state machine
pub use booking::state::{BookingStatus, BookingTransition};
