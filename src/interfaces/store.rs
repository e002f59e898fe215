// ============================================================================
// Store Interface
// Persistence contracts consumed by the booking service and the orchestrator
// ============================================================================

use crate::domain::{
    Booking, BookingId, BookingRequest, Passenger, PassengerId, Ride, RideId, RoundId, Vehicle,
    VehicleId, Waypoint,
};
use rust_decimal::Decimal;
use std::fmt;

// ============================================================================
// Store Errors
// ============================================================================

/// Errors reported by a store implementation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// No row with the given id
    NotFound { entity: &'static str, id: String },
    /// Optimistic version check failed (or the booking already left PENDING)
    VersionConflict {
        booking_id: BookingId,
        expected: u64,
        actual: u64,
    },
    /// A matching round tried to bind a booking it never claimed
    NotClaimed { booking_id: BookingId },
    /// A booking stayed claimed by another round past the lock timeout
    LockTimeout { booking_id: BookingId },
    /// A waypoint sequence was repeated within one ride
    DuplicateWaypoint { ride_id: RideId, sequence: u32 },
    /// The transaction was already committed or rolled back
    TransactionClosed,
    /// Backend I/O failure
    Unavailable(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::NotFound { entity, id } => write!(f, "{entity} {id} not found"),
            StoreError::VersionConflict {
                booking_id,
                expected,
                actual,
            } => write!(
                f,
                "booking {booking_id} version conflict: expected {expected}, found {actual}"
            ),
            StoreError::NotClaimed { booking_id } => {
                write!(f, "booking {booking_id} is not claimed by this round")
            },
            StoreError::LockTimeout { booking_id } => {
                write!(f, "timed out waiting for booking {booking_id} to be released")
            },
            StoreError::DuplicateWaypoint { ride_id, sequence } => {
                write!(f, "ride {ride_id} already has a waypoint at sequence {sequence}")
            },
            StoreError::TransactionClosed => write!(f, "transaction already closed"),
            StoreError::Unavailable(msg) => write!(f, "store unavailable: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {}

/// Result type alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;

// ============================================================================
// Repositories
// ============================================================================

pub trait PassengerRepository: Send + Sync {
    fn create_passenger(&self, name: &str) -> StoreResult<Passenger>;

    fn get_passenger(&self, id: PassengerId) -> StoreResult<Option<Passenger>>;
}

pub trait BookingRepository: Send + Sync {
    /// Insert a PENDING booking at version 0.
    fn create_booking(&self, request: BookingRequest) -> StoreResult<Booking>;

    fn get_booking(&self, id: BookingId) -> StoreResult<Option<Booking>>;

    /// Cancel a PENDING booking if it is still at `expected_version`.
    ///
    /// Fails with [`StoreError::VersionConflict`] when the booking moved on,
    /// whether by another cancel or by a matching round.
    fn cancel_booking(&self, id: BookingId, expected_version: u64) -> StoreResult<Booking>;

    fn get_bookings_by_ride(&self, ride_id: RideId) -> StoreResult<Vec<Booking>>;
}

pub trait RideRepository: Send + Sync {
    fn get_ride(&self, id: RideId) -> StoreResult<Option<Ride>>;

    /// Waypoints of a ride ordered by sequence.
    fn get_waypoints(&self, ride_id: RideId) -> StoreResult<Vec<Waypoint>>;
}

pub trait VehicleRepository: Send + Sync {
    fn list_vehicles(&self) -> StoreResult<Vec<Vehicle>>;

    /// Provision `count` identical cabs if and only if the fleet is empty.
    fn ensure_default_pool(&self, seats: u32, luggage_capacity: u32, count: usize)
        -> StoreResult<()>;

    fn create_vehicle(&self, seats: u32, luggage_capacity: u32) -> StoreResult<Vehicle>;
}

// ============================================================================
// Transactions
// ============================================================================

/// One matching round's unit of work.
///
/// Nothing written through a transaction is visible until `commit` returns
/// Ok. Dropping a transaction without committing rolls it back.
pub trait MatchingTransaction: Send {
    fn round_id(&self) -> RoundId;

    /// Claim every PENDING booking not already claimed by another round,
    /// in creation order. Rows held by a concurrent round are skipped.
    fn claim_pending_bookings(&mut self) -> StoreResult<Vec<Booking>>;

    fn create_ride(&mut self, vehicle_id: VehicleId) -> StoreResult<Ride>;

    fn update_ride_aggregate(
        &mut self,
        ride_id: RideId,
        total_distance_km: f64,
        total_fare: Decimal,
    ) -> StoreResult<()>;

    fn insert_waypoints(&mut self, ride_id: RideId, waypoints: &[Waypoint]) -> StoreResult<()>;

    /// Bind a claimed booking to a ride, moving it PENDING -> MATCHED and
    /// bumping its version, if it is still at `expected_version`.
    fn mark_matched(
        &mut self,
        booking_id: BookingId,
        ride_id: RideId,
        expected_version: u64,
    ) -> StoreResult<()>;

    fn commit(self: Box<Self>) -> StoreResult<()>;

    fn rollback(self: Box<Self>);
}

pub trait TransactionalStore: Send + Sync {
    fn begin(&self, round_id: RoundId) -> StoreResult<Box<dyn MatchingTransaction + '_>>;
}

/// Everything the orchestrator and booking service need from a store.
pub trait MatchingStore:
    PassengerRepository + BookingRepository + RideRepository + VehicleRepository + TransactionalStore
{
}

impl<T> MatchingStore for T where
    T: PassengerRepository
        + BookingRepository
        + RideRepository
        + VehicleRepository
        + TransactionalStore
        + ?Sized
{
}
