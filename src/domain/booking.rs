// ============================================================================
// Booking Domain Model
// ============================================================================

use crate::domain::{PassengerId, RideId};
use crate::geo::{distance_km, Coordinate};
use chrono::{DateTime, Utc};
use uuid::Uuid;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// ============================================================================
// Value Objects
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BookingId(Uuid);

impl BookingId {
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

impl Default for BookingId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for BookingId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Input for creating a booking. The store assigns id, sequence and timestamp.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BookingRequest {
    pub passenger_id: PassengerId,
    pub pickup: Coordinate,
    pub dropoff: Coordinate,
    pub luggage: u32,
}

impl BookingRequest {
    pub fn new(passenger_id: PassengerId, pickup: Coordinate, dropoff: Coordinate) -> Self {
        Self {
            passenger_id,
            pickup,
            dropoff,
            luggage: 0,
        }
    }

    pub fn with_luggage(mut self, luggage: u32) -> Self {
        self.luggage = luggage;
        self
    }
}

// ============================================================================
// Booking State Machine
// ============================================================================

pub mod state {
    #[cfg(feature = "serde")]
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
    pub enum BookingStatus {
        Pending,
        Matched,
        Cancelled,
    }

    impl BookingStatus {
        pub fn as_str(&self) -> &'static str {
            match self {
                BookingStatus::Pending => "PENDING",
                BookingStatus::Matched => "MATCHED",
                BookingStatus::Cancelled => "CANCELLED",
            }
        }

        pub fn is_terminal(&self) -> bool {
            matches!(self, BookingStatus::Matched | BookingStatus::Cancelled)
        }
    }

    impl std::fmt::Display for BookingStatus {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str(self.as_str())
        }
    }

    /// Valid state transitions for the booking state machine
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum BookingTransition {
        Match,
        Cancel,
    }

    impl BookingStatus {
        /// PENDING is the only state that can be left.
        pub fn transition(&self, transition: BookingTransition) -> Result<BookingStatus, String> {
            match (self, transition) {
                (BookingStatus::Pending, BookingTransition::Match) => Ok(BookingStatus::Matched),
                (BookingStatus::Pending, BookingTransition::Cancel) => {
                    Ok(BookingStatus::Cancelled)
                },
                _ => Err(format!(
                    "Invalid transition from {:?} via {:?}",
                    self, transition
                )),
            }
        }
    }
}

use state::{BookingStatus, BookingTransition};

// ============================================================================
// Booking Entity
// ============================================================================

/// A single passenger's request to travel from pickup to dropoff.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Booking {
    pub id: BookingId,
    pub passenger_id: PassengerId,
    pub pickup: Coordinate,
    pub dropoff: Coordinate,
    pub luggage: u32,
    pub status: BookingStatus,
    pub ride_id: Option<RideId>,
    /// Optimistic lock counter, bumped by exactly one on every mutation
    pub version: u64,
    pub created_at: DateTime<Utc>,
    /// Store-assigned creation order, breaks ties between equal timestamps
    pub sequence: u64,
}

impl Booking {
    pub fn new(
        passenger_id: PassengerId,
        pickup: Coordinate,
        dropoff: Coordinate,
        luggage: u32,
    ) -> Self {
        Self {
            id: BookingId::new(),
            passenger_id,
            pickup,
            dropoff,
            luggage,
            status: BookingStatus::Pending,
            ride_id: None,
            version: 0,
            created_at: Utc::now(),
            sequence: 0,
        }
    }

    pub fn from_request(request: BookingRequest, sequence: u64) -> Self {
        Self::new(
            request.passenger_id,
            request.pickup,
            request.dropoff,
            request.luggage,
        )
        .with_sequence(sequence)
    }

    pub fn with_sequence(mut self, sequence: u64) -> Self {
        self.sequence = sequence;
        self
    }

    /// Great-circle distance from pickup to dropoff.
    pub fn direct_distance_km(&self) -> f64 {
        distance_km(self.pickup, self.dropoff)
    }

    pub fn is_pending(&self) -> bool {
        self.status == BookingStatus::Pending
    }

    /// Key that orders bookings by creation: timestamp, then sequence.
    pub fn creation_key(&self) -> (DateTime<Utc>, u64) {
        (self.created_at, self.sequence)
    }

    /// Bind to `ride_id` and move to MATCHED, bumping the version.
    pub fn mark_matched(&mut self, ride_id: RideId) -> Result<(), String> {
        self.status = self.status.transition(BookingTransition::Match)?;
        self.ride_id = Some(ride_id);
        self.version += 1;
        Ok(())
    }

    /// Move to CANCELLED, bumping the version.
    pub fn cancel(&mut self) -> Result<(), String> {
        self.status = self.status.transition(BookingTransition::Cancel)?;
        self.version += 1;
        Ok(())
    }
}
