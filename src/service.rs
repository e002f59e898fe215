// ============================================================================
// Booking Service
// Validated entry points for passengers, bookings, rides and matching
// ============================================================================

use crate::domain::{
    Booking, BookingId, BookingRequest, Passenger, PoolingConfig, Ride, RideId, RoundSummary,
    Waypoint,
};
use crate::engine::MatchingOrchestrator;
use crate::error::{PoolingError, PoolingResult};
use crate::interfaces::{EventHandler, MatchingStore, NoOpEventHandler, StoreError};
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A ride with its passengers and ordered stops.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RideDetails {
    pub ride: Ride,
    pub bookings: Vec<Booking>,
    /// Ordered by sequence
    pub waypoints: Vec<Waypoint>,
}

pub struct BookingService<S: MatchingStore + ?Sized> {
    store: Arc<S>,
    orchestrator: Arc<MatchingOrchestrator<S>>,
}

impl<S: MatchingStore + ?Sized> BookingService<S> {
    pub fn new(store: Arc<S>, config: PoolingConfig) -> PoolingResult<Self> {
        Self::with_event_handler(store, config, Arc::new(NoOpEventHandler))
    }

    pub fn with_event_handler(
        store: Arc<S>,
        config: PoolingConfig,
        event_handler: Arc<dyn EventHandler>,
    ) -> PoolingResult<Self> {
        let orchestrator =
            MatchingOrchestrator::with_event_handler(Arc::clone(&store), config, event_handler)?;
        Ok(Self {
            store,
            orchestrator: Arc::new(orchestrator),
        })
    }

    /// Shared orchestrator, e.g. for a background scheduler.
    pub fn orchestrator(&self) -> &Arc<MatchingOrchestrator<S>> {
        &self.orchestrator
    }

    pub fn register_passenger(&self, name: &str) -> PoolingResult<Passenger> {
        Passenger::validate_name(name).map_err(PoolingError::Validation)?;
        let passenger = self.store.create_passenger(name.trim())?;
        tracing::debug!(passenger_id = %passenger.id, "passenger registered");
        Ok(passenger)
    }

    /// Store a new PENDING booking at version 0.
    pub fn create_booking(&self, request: BookingRequest) -> PoolingResult<Booking> {
        request.pickup.validate()?;
        request.dropoff.validate()?;

        if self.store.get_passenger(request.passenger_id)?.is_none() {
            return Err(StoreError::NotFound {
                entity: "passenger",
                id: request.passenger_id.to_string(),
            }
            .into());
        }

        let booking = self.store.create_booking(request)?;
        tracing::info!(
            booking_id = %booking.id,
            passenger_id = %booking.passenger_id,
            luggage = booking.luggage,
            "booking created"
        );
        Ok(booking)
    }

    /// Cancel a booking the caller last saw at `version`.
    ///
    /// Loses with a version conflict if a matching round or another cancel
    /// got there first; the caller is expected to re-read, not retry.
    pub fn cancel_booking(&self, id: BookingId, version: u64) -> PoolingResult<Booking> {
        match self.store.cancel_booking(id, version) {
            Ok(booking) => {
                tracing::info!(booking_id = %id, "booking cancelled");
                Ok(booking)
            },
            Err(err) => {
                tracing::warn!(booking_id = %id, version, error = %err, "cancel rejected");
                Err(err.into())
            },
        }
    }

    pub fn get_booking(&self, id: BookingId) -> PoolingResult<Booking> {
        self.store
            .get_booking(id)?
            .ok_or_else(|| not_found("booking", id))
    }

    pub fn get_ride(&self, id: RideId) -> PoolingResult<RideDetails> {
        let ride = self
            .store
            .get_ride(id)?
            .ok_or_else(|| not_found("ride", id))?;
        Ok(RideDetails {
            bookings: self.store.get_bookings_by_ride(id)?,
            waypoints: self.store.get_waypoints(id)?,
            ride,
        })
    }

    /// Run one matching round now.
    pub fn run_matching(&self) -> PoolingResult<RoundSummary> {
        self.orchestrator.run_matching_round()
    }
}

fn not_found(entity: &'static str, id: impl ToString) -> PoolingError {
    PoolingError::Store(StoreError::NotFound {
        entity,
        id: id.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BookingStatus, PassengerId, WaypointKind};
    use crate::geo::{Coordinate, GeoError};
    use crate::store::InMemoryStore;

    const AIRPORT: Coordinate = Coordinate::new(28.5355, 77.391);
    const CITY: Coordinate = Coordinate::new(28.6139, 77.209);

    fn service() -> BookingService<InMemoryStore> {
        BookingService::new(Arc::new(InMemoryStore::new()), PoolingConfig::default()).unwrap()
    }

    #[test]
    fn test_register_passenger_validates_name() {
        let service = service();
        assert!(matches!(
            service.register_passenger("   "),
            Err(PoolingError::Validation(_))
        ));
        assert!(matches!(
            service.register_passenger(&"x".repeat(256)),
            Err(PoolingError::Validation(_))
        ));
        assert_eq!(service.register_passenger("  Anil ").unwrap().name, "Anil");
    }

    #[test]
    fn test_create_booking_validates_input() {
        let service = service();
        let passenger = service.register_passenger("Neha").unwrap();

        let bad_pickup = BookingRequest::new(passenger.id, Coordinate::new(95.0, 77.0), CITY);
        assert_eq!(
            service.create_booking(bad_pickup).unwrap_err(),
            PoolingError::Geo(GeoError::InvalidLatitude(95.0))
        );

        let bad_dropoff = BookingRequest::new(passenger.id, AIRPORT, Coordinate::new(28.6, 181.0));
        assert_eq!(
            service.create_booking(bad_dropoff).unwrap_err(),
            PoolingError::Geo(GeoError::InvalidLongitude(181.0))
        );

        let stranger = BookingRequest::new(PassengerId::new(), AIRPORT, CITY);
        assert!(matches!(
            service.create_booking(stranger),
            Err(PoolingError::Store(StoreError::NotFound { entity: "passenger", .. }))
        ));
    }

    #[test]
    fn test_booking_lifecycle() {
        let service = service();
        let passenger = service.register_passenger("Tara").unwrap();
        let booking = service
            .create_booking(BookingRequest::new(passenger.id, AIRPORT, CITY).with_luggage(2))
            .unwrap();
        assert_eq!(booking.status, BookingStatus::Pending);
        assert_eq!(booking.version, 0);
        assert_eq!(service.get_booking(booking.id).unwrap(), booking);

        let cancelled = service.cancel_booking(booking.id, 0).unwrap();
        assert_eq!(cancelled.status, BookingStatus::Cancelled);

        let err = service.cancel_booking(booking.id, 0).unwrap_err();
        assert!(err.is_conflict());
        assert!(service.run_matching().unwrap().is_empty());
    }

    #[test]
    fn test_ride_details_after_matching() {
        let service = service();
        let passenger = service.register_passenger("Omar").unwrap();
        let booking = service
            .create_booking(BookingRequest::new(passenger.id, AIRPORT, CITY))
            .unwrap();

        let summary = service.run_matching().unwrap();
        let details = service.get_ride(summary.ride_ids[0]).unwrap();

        assert_eq!(details.bookings.len(), 1);
        assert_eq!(details.bookings[0].id, booking.id);
        assert_eq!(details.waypoints.len(), 2);
        assert_eq!(details.waypoints[0].kind, WaypointKind::Pickup);
        assert_eq!(details.waypoints[1].kind, WaypointKind::Dropoff);
        assert!(details.ride.total_fare.is_some());

        // A matched booking can no longer be cancelled
        assert!(service.cancel_booking(booking.id, 0).unwrap_err().is_conflict());
        assert!(service.cancel_booking(booking.id, 1).unwrap_err().is_conflict());
    }

    #[test]
    fn test_missing_entities() {
        let service = service();
        assert!(matches!(
            service.get_booking(BookingId::new()),
            Err(PoolingError::Store(StoreError::NotFound { entity: "booking", .. }))
        ));
        assert!(matches!(
            service.get_ride(RideId::new()),
            Err(PoolingError::Store(StoreError::NotFound { entity: "ride", .. }))
        ));
    }
}
