// ============================================================================
// Matching Orchestrator
// Runs one all-or-nothing matching round against a transactional store
// ============================================================================

use crate::domain::{PoolingConfig, RideId, RoundId, RoundState, RoundSummary, VehiclePool};
use crate::engine::{FareCalculator, PoolingEngine, RideGroup};
use crate::error::{PoolingError, PoolingResult};
use crate::interfaces::{
    EventHandler, MatchingStore, MatchingTransaction, NoOpEventHandler, PoolingEvent,
};
use chrono::Utc;
use rust_decimal::Decimal;
use std::sync::Arc;

// ============================================================================
// Round Tracking
// ============================================================================

/// Drives one round through its state machine and reports each step.
struct RoundTracker<'a> {
    id: RoundId,
    state: RoundState,
    events: &'a dyn EventHandler,
}

impl<'a> RoundTracker<'a> {
    fn start(id: RoundId, events: &'a dyn EventHandler) -> Self {
        events.on_event(PoolingEvent::RoundStarted {
            round_id: id,
            timestamp: Utc::now(),
        });
        Self {
            id,
            state: RoundState::Start,
            events,
        }
    }

    fn advance(&mut self, next: RoundState) -> PoolingResult<()> {
        let from = self.state;
        self.state = from.transition(next).map_err(PoolingError::RoundState)?;
        tracing::debug!(round_id = %self.id, ?from, to = ?self.state, "round state changed");
        self.events.on_event(PoolingEvent::RoundStateChanged {
            round_id: self.id,
            from,
            to: self.state,
            timestamp: Utc::now(),
        });
        Ok(())
    }

    /// Mark the round aborted and hand the error back to the caller.
    fn abort(&mut self, err: PoolingError) -> PoolingError {
        if !self.state.is_terminal() {
            // Any non-terminal state may abort
            let _ = self.advance(RoundState::Aborted);
        }
        tracing::error!(round_id = %self.id, error = %err, "matching round aborted");
        self.events.on_event(PoolingEvent::RoundAborted {
            round_id: self.id,
            reason: err.to_string(),
            timestamp: Utc::now(),
        });
        err
    }
}

// ============================================================================
// Orchestrator
// ============================================================================

/// Claims pending bookings, pools them, prices every passenger and persists
/// the resulting rides in a single transaction.
///
/// Rounds may run concurrently from any number of threads; the store's
/// claim semantics keep their booking sets disjoint.
pub struct MatchingOrchestrator<S: MatchingStore + ?Sized> {
    store: Arc<S>,
    config: PoolingConfig,
    engine: PoolingEngine,
    fares: FareCalculator,
    event_handler: Arc<dyn EventHandler>,
}

impl<S: MatchingStore + ?Sized> MatchingOrchestrator<S> {
    pub fn new(store: Arc<S>, config: PoolingConfig) -> PoolingResult<Self> {
        Self::with_event_handler(store, config, Arc::new(NoOpEventHandler))
    }

    pub fn with_event_handler(
        store: Arc<S>,
        config: PoolingConfig,
        event_handler: Arc<dyn EventHandler>,
    ) -> PoolingResult<Self> {
        config.validate().map_err(PoolingError::Config)?;
        Ok(Self {
            engine: PoolingEngine::new(config.clone(), Arc::clone(&event_handler)),
            fares: FareCalculator::new(&config),
            store,
            config,
            event_handler,
        })
    }

    pub fn config(&self) -> &PoolingConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Run one matching round.
    ///
    /// Either every ride, waypoint and booking transition of the round is
    /// committed, or none is. A round with nothing pending commits
    /// immediately and returns an empty summary.
    pub fn run_matching_round(&self) -> PoolingResult<RoundSummary> {
        let mut round = RoundTracker::start(RoundId::new(), self.event_handler.as_ref());

        let vehicles = self.vehicle_pool().map_err(|err| round.abort(err))?;
        let mut tx = self
            .store
            .begin(round.id)
            .map_err(|err| round.abort(err.into()))?;

        match self.execute(&mut round, tx.as_mut(), &vehicles) {
            Ok((summary, matches)) => {
                tx.commit().map_err(|err| round.abort(err.into()))?;
                round.advance(RoundState::Committed)?;
                // Ride and match events only describe committed rows
                if !matches.is_empty() {
                    self.event_handler.on_events(matches);
                }
                tracing::info!(
                    round_id = %summary.round_id,
                    rides = summary.rides_created,
                    matched = summary.bookings_matched,
                    unassigned = summary.bookings_unassigned,
                    "matching round committed"
                );
                self.event_handler.on_event(PoolingEvent::RoundCommitted {
                    summary: summary.clone(),
                    timestamp: Utc::now(),
                });
                Ok(summary)
            },
            Err(err) => {
                tx.rollback();
                Err(round.abort(err))
            },
        }
    }

    /// Current fleet, provisioning the default pool when it is empty.
    fn vehicle_pool(&self) -> PoolingResult<VehiclePool> {
        let mut vehicles = self.store.list_vehicles()?;
        if vehicles.is_empty() {
            self.store.ensure_default_pool(
                self.config.default_vehicle_seats,
                self.config.default_vehicle_luggage,
                self.config.default_pool_size,
            )?;
            vehicles = self.store.list_vehicles()?;
        }
        if vehicles.is_empty() {
            return Err(PoolingError::NoVehicles);
        }
        Ok(VehiclePool::from(vehicles))
    }

    /// Claim, pool and stage one round. Returns the summary and the ride and
    /// match events to publish once the transaction commits.
    fn execute(
        &self,
        round: &mut RoundTracker<'_>,
        tx: &mut dyn MatchingTransaction,
        vehicles: &VehiclePool,
    ) -> PoolingResult<(RoundSummary, Vec<PoolingEvent>)> {
        let claimed = tx.claim_pending_bookings()?;
        round.advance(RoundState::Claimed)?;

        let mut summary = RoundSummary::empty(round.id);
        let mut matches = Vec::new();
        if claimed.is_empty() {
            return Ok((summary, matches));
        }

        let outcome = self.engine.pool(&claimed, Vec::new(), vehicles);
        round.advance(RoundState::Grouped)?;

        for group in &outcome.groups {
            let ride_id = self.persist_group(round.id, tx, group, &mut matches)?;
            summary.rides_created += 1;
            summary.bookings_matched += group.len();
            summary.ride_ids.push(ride_id);
        }
        summary.bookings_unassigned = outcome.unassigned.len();
        for unassigned in &outcome.unassigned {
            tracing::warn!(
                round_id = %round.id,
                booking_id = %unassigned.booking.id,
                reason = ?unassigned.reason,
                "booking fits no vehicle, left pending"
            );
        }
        round.advance(RoundState::Persisted)?;

        Ok((summary, matches))
    }

    /// Write one group: ride, waypoints, fares, then booking transitions.
    /// The group's events are appended to `events`, not sent.
    fn persist_group(
        &self,
        round_id: RoundId,
        tx: &mut dyn MatchingTransaction,
        group: &RideGroup,
        events: &mut Vec<PoolingEvent>,
    ) -> PoolingResult<RideId> {
        let ride = tx.create_ride(group.vehicle.id)?;
        tx.insert_waypoints(ride.id, group.route.waypoints())?;

        let shared_count = group.len();
        let mut fares = Vec::with_capacity(shared_count);
        for booking in &group.bookings {
            let fare = self.fares.compute_fare(
                booking.direct_distance_km(),
                group.passenger_distance_km(booking.id),
                shared_count,
            )?;
            fares.push((booking.id, fare));
        }
        let total_fare: Decimal = fares.iter().map(|(_, fare)| *fare).sum();
        tx.update_ride_aggregate(ride.id, group.total_distance_km, total_fare)?;

        for booking in &group.bookings {
            tx.mark_matched(booking.id, ride.id, booking.version)?;
        }

        let timestamp = Utc::now();
        events.reserve(fares.len() + 1);
        events.push(PoolingEvent::RideCreated {
            round_id,
            ride_id: ride.id,
            vehicle_id: group.vehicle.id,
            passengers: shared_count,
            total_distance_km: group.total_distance_km,
            total_fare,
            timestamp,
        });
        events.extend(fares.into_iter().map(|(booking_id, fare)| PoolingEvent::BookingMatched {
            round_id,
            booking_id,
            ride_id: ride.id,
            fare,
            timestamp,
        }));

        Ok(ride.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        Booking, BookingId, BookingRequest, BookingStatus, PassengerId, Passenger, Ride, Vehicle,
        VehicleId, Waypoint,
    };
    use crate::geo::Coordinate;
    use crate::interfaces::{
        BookingRepository, ChannelEventHandler, PassengerRepository, RideRepository, StoreError,
        StoreResult, TransactionalStore, VehicleRepository,
    };
    use crate::store::InMemoryStore;
    use crossbeam::channel::unbounded;
    use parking_lot::Mutex;
    use std::sync::Barrier;
    use std::thread;

    const AIRPORT: Coordinate = Coordinate::new(28.5355, 77.391);
    const CITY: Coordinate = Coordinate::new(28.6139, 77.209);

    fn book(store: &InMemoryStore, luggage: u32) -> Booking {
        let passenger = store.create_passenger("Ravi").unwrap();
        store
            .create_booking(BookingRequest::new(passenger.id, AIRPORT, CITY).with_luggage(luggage))
            .unwrap()
    }

    fn orchestrator(store: &Arc<InMemoryStore>) -> MatchingOrchestrator<InMemoryStore> {
        MatchingOrchestrator::new(Arc::clone(store), PoolingConfig::default()).unwrap()
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let store = Arc::new(InMemoryStore::new());
        let config = PoolingConfig::default().with_base_fare_per_km(0.0);
        assert!(matches!(
            MatchingOrchestrator::new(store, config),
            Err(PoolingError::Config(_))
        ));
    }

    #[test]
    fn test_empty_round_is_idempotent() {
        let store = Arc::new(InMemoryStore::new());
        let orchestrator = orchestrator(&store);

        let first = orchestrator.run_matching_round().unwrap();
        let second = orchestrator.run_matching_round().unwrap();

        assert!(first.is_empty() && second.is_empty());
        assert!(first.ride_ids.is_empty());
        // The default fleet is provisioned once
        assert_eq!(store.list_vehicles().unwrap().len(), 50);
    }

    #[test]
    fn test_round_pools_prices_and_persists() {
        let store = Arc::new(InMemoryStore::new());
        let x = book(&store, 1);
        let y = book(&store, 0);

        let summary = orchestrator(&store).run_matching_round().unwrap();
        assert_eq!(summary.rides_created, 1);
        assert_eq!(summary.bookings_matched, 2);
        assert_eq!(summary.bookings_unassigned, 0);

        let ride_id = summary.ride_ids[0];
        let ride = store.get_ride(ride_id).unwrap().unwrap();
        let waypoints = store.get_waypoints(ride_id).unwrap();
        assert_eq!(waypoints.len(), 4);
        assert_eq!(
            waypoints.iter().map(|w| w.sequence).collect::<Vec<_>>(),
            vec![1, 2, 3, 4]
        );

        // Two riders at 0.925 of the solo fare each
        let solo = FareCalculator::default()
            .compute_fare(x.direct_distance_km(), x.direct_distance_km(), 1)
            .unwrap();
        let total = ride.total_fare.unwrap();
        assert!(total < solo * Decimal::from(2));
        assert!(total > solo);
        assert!(ride.total_distance_km.unwrap() > 0.0);

        for id in [x.id, y.id] {
            let booking = store.get_booking(id).unwrap().unwrap();
            assert_eq!(booking.status, BookingStatus::Matched);
            assert_eq!(booking.ride_id, Some(ride_id));
            assert_eq!(booking.version, 1);
        }
        assert_eq!(store.get_bookings_by_ride(ride_id).unwrap().len(), 2);
    }

    #[test]
    fn test_unassigned_booking_stays_pending() {
        let store = Arc::new(InMemoryStore::new());
        let heavy = book(&store, 5);

        let summary = orchestrator(&store).run_matching_round().unwrap();
        assert_eq!(summary.rides_created, 0);
        assert_eq!(summary.bookings_unassigned, 1);

        let booking = store.get_booking(heavy.id).unwrap().unwrap();
        assert_eq!(booking.status, BookingStatus::Pending);
        assert_eq!(booking.version, 0);
        assert_eq!(store.pending_count(), 1);
    }

    #[test]
    fn test_events_follow_round_state_machine() {
        let store = Arc::new(InMemoryStore::new());
        book(&store, 0);
        let (tx, rx) = unbounded();
        let orchestrator = MatchingOrchestrator::with_event_handler(
            Arc::clone(&store),
            PoolingConfig::default(),
            Arc::new(ChannelEventHandler::new(tx)),
        )
        .unwrap();

        orchestrator.run_matching_round().unwrap();

        let transitions: Vec<_> = rx
            .try_iter()
            .filter_map(|event| match event {
                PoolingEvent::RoundStateChanged { to, .. } => Some(to),
                _ => None,
            })
            .collect();
        assert_eq!(
            transitions,
            vec![
                RoundState::Claimed,
                RoundState::Grouped,
                RoundState::Persisted,
                RoundState::Committed
            ]
        );
    }

    #[test]
    fn test_concurrent_rounds_partition_pending_bookings() {
        let store = Arc::new(InMemoryStore::new());
        let bookings: Vec<_> = (0..40).map(|_| book(&store, 0)).collect();
        let orchestrator = Arc::new(orchestrator(&store));
        let barrier = Arc::new(Barrier::new(4));

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let orchestrator = Arc::clone(&orchestrator);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    orchestrator.run_matching_round().unwrap()
                })
            })
            .collect();

        let matched: usize = handles
            .into_iter()
            .map(|h| h.join().unwrap().bookings_matched)
            .sum();
        assert_eq!(matched, bookings.len());

        for booking in &bookings {
            let stored = store.get_booking(booking.id).unwrap().unwrap();
            assert_eq!(stored.status, BookingStatus::Matched);
            assert_eq!(stored.version, 1);
        }
    }

    #[test]
    fn test_cancel_and_match_race_has_one_winner() {
        for _ in 0..20 {
            let store = Arc::new(InMemoryStore::new());
            let booking = book(&store, 0);
            let orchestrator = Arc::new(orchestrator(&store));
            let barrier = Arc::new(Barrier::new(2));

            let matcher = {
                let orchestrator = Arc::clone(&orchestrator);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    orchestrator.run_matching_round().unwrap()
                })
            };
            barrier.wait();
            let cancelled = store.cancel_booking(booking.id, 0);
            let summary = matcher.join().unwrap();

            let stored = store.get_booking(booking.id).unwrap().unwrap();
            assert_eq!(stored.version, 1);
            match cancelled {
                Ok(_) => {
                    assert_eq!(stored.status, BookingStatus::Cancelled);
                    assert_eq!(summary.bookings_matched, 0);
                },
                Err(err) => {
                    assert!(matches!(err, StoreError::VersionConflict { .. }));
                    assert_eq!(stored.status, BookingStatus::Matched);
                    assert_eq!(summary.bookings_matched, 1);
                },
            }
        }
    }

    // ========================================================================
    // Failure injection
    // ========================================================================

    #[derive(Clone, Copy, PartialEq)]
    enum FailAt {
        MarkMatched,
        Commit,
    }

    /// Delegates to an in-memory store but fails at one step of every round.
    struct FlakyStore {
        inner: InMemoryStore,
        rides: Mutex<Vec<RideId>>,
        fail_at: FailAt,
    }

    impl FlakyStore {
        fn new(fail_at: FailAt) -> Self {
            Self {
                inner: InMemoryStore::new(),
                rides: Mutex::new(Vec::new()),
                fail_at,
            }
        }
    }

    struct FlakyTransaction<'a> {
        inner: Box<dyn MatchingTransaction + 'a>,
        rides: &'a Mutex<Vec<RideId>>,
        fail_at: FailAt,
    }

    impl PassengerRepository for FlakyStore {
        fn create_passenger(&self, name: &str) -> StoreResult<Passenger> {
            self.inner.create_passenger(name)
        }

        fn get_passenger(&self, id: PassengerId) -> StoreResult<Option<Passenger>> {
            self.inner.get_passenger(id)
        }
    }

    impl BookingRepository for FlakyStore {
        fn create_booking(&self, request: BookingRequest) -> StoreResult<Booking> {
            self.inner.create_booking(request)
        }

        fn get_booking(&self, id: BookingId) -> StoreResult<Option<Booking>> {
            self.inner.get_booking(id)
        }

        fn cancel_booking(&self, id: BookingId, expected_version: u64) -> StoreResult<Booking> {
            self.inner.cancel_booking(id, expected_version)
        }

        fn get_bookings_by_ride(&self, ride_id: RideId) -> StoreResult<Vec<Booking>> {
            self.inner.get_bookings_by_ride(ride_id)
        }
    }

    impl RideRepository for FlakyStore {
        fn get_ride(&self, id: RideId) -> StoreResult<Option<Ride>> {
            self.inner.get_ride(id)
        }

        fn get_waypoints(&self, ride_id: RideId) -> StoreResult<Vec<Waypoint>> {
            self.inner.get_waypoints(ride_id)
        }
    }

    impl VehicleRepository for FlakyStore {
        fn list_vehicles(&self) -> StoreResult<Vec<Vehicle>> {
            self.inner.list_vehicles()
        }

        fn ensure_default_pool(&self, seats: u32, luggage: u32, count: usize) -> StoreResult<()> {
            self.inner.ensure_default_pool(seats, luggage, count)
        }

        fn create_vehicle(&self, seats: u32, luggage: u32) -> StoreResult<Vehicle> {
            self.inner.create_vehicle(seats, luggage)
        }
    }

    impl TransactionalStore for FlakyStore {
        fn begin(&self, round_id: RoundId) -> StoreResult<Box<dyn MatchingTransaction + '_>> {
            Ok(Box::new(FlakyTransaction {
                inner: self.inner.begin(round_id)?,
                rides: &self.rides,
                fail_at: self.fail_at,
            }))
        }
    }

    impl MatchingTransaction for FlakyTransaction<'_> {
        fn round_id(&self) -> RoundId {
            self.inner.round_id()
        }

        fn claim_pending_bookings(&mut self) -> StoreResult<Vec<Booking>> {
            self.inner.claim_pending_bookings()
        }

        fn create_ride(&mut self, vehicle_id: VehicleId) -> StoreResult<Ride> {
            let ride = self.inner.create_ride(vehicle_id)?;
            self.rides.lock().push(ride.id);
            Ok(ride)
        }

        fn update_ride_aggregate(
            &mut self,
            ride_id: RideId,
            total_distance_km: f64,
            total_fare: Decimal,
        ) -> StoreResult<()> {
            self.inner
                .update_ride_aggregate(ride_id, total_distance_km, total_fare)
        }

        fn insert_waypoints(&mut self, ride_id: RideId, waypoints: &[Waypoint]) -> StoreResult<()> {
            self.inner.insert_waypoints(ride_id, waypoints)
        }

        fn mark_matched(
            &mut self,
            id: BookingId,
            ride_id: RideId,
            version: u64,
        ) -> StoreResult<()> {
            if self.fail_at == FailAt::MarkMatched {
                return Err(StoreError::Unavailable("connection reset".to_string()));
            }
            self.inner.mark_matched(id, ride_id, version)
        }

        fn commit(self: Box<Self>) -> StoreResult<()> {
            if self.fail_at == FailAt::Commit {
                self.inner.rollback();
                return Err(StoreError::Unavailable("commit lost".to_string()));
            }
            self.inner.commit()
        }

        fn rollback(self: Box<Self>) {
            self.inner.rollback()
        }
    }

    #[test]
    fn test_store_failure_rolls_back_whole_round() {
        let store = Arc::new(FlakyStore::new(FailAt::MarkMatched));
        let passenger = store.create_passenger("Meera").unwrap();
        let booking = store
            .create_booking(BookingRequest::new(passenger.id, AIRPORT, CITY))
            .unwrap();

        let (tx, rx) = unbounded();
        let orchestrator = MatchingOrchestrator::with_event_handler(
            Arc::clone(&store),
            PoolingConfig::default(),
            Arc::new(ChannelEventHandler::new(tx)),
        )
        .unwrap();

        let err = orchestrator.run_matching_round().unwrap_err();
        assert_eq!(
            err,
            PoolingError::Store(StoreError::Unavailable("connection reset".to_string()))
        );

        let rides = store.rides.lock().clone();
        assert_eq!(rides.len(), 1);
        assert!(store.get_ride(rides[0]).unwrap().is_none());
        assert!(store.get_waypoints(rides[0]).unwrap().is_empty());

        let stored = store.get_booking(booking.id).unwrap().unwrap();
        assert_eq!(stored.status, BookingStatus::Pending);
        assert_eq!(stored.version, 0);
        assert!(rx
            .try_iter()
            .any(|e| matches!(e, PoolingEvent::RoundAborted { .. })));

        // Claims were released: the booking can still be cancelled at once
        assert!(store.cancel_booking(booking.id, 0).is_ok());
    }

    #[test]
    fn test_failed_commit_publishes_no_matches() {
        let store = Arc::new(FlakyStore::new(FailAt::Commit));
        let passenger = store.create_passenger("Isha").unwrap();
        let booking = store
            .create_booking(BookingRequest::new(passenger.id, AIRPORT, CITY))
            .unwrap();

        let (tx, rx) = unbounded();
        let orchestrator = MatchingOrchestrator::with_event_handler(
            Arc::clone(&store),
            PoolingConfig::default(),
            Arc::new(ChannelEventHandler::new(tx)),
        )
        .unwrap();

        let err = orchestrator.run_matching_round().unwrap_err();
        assert_eq!(
            err,
            PoolingError::Store(StoreError::Unavailable("commit lost".to_string()))
        );

        let events: Vec<_> = rx.try_iter().collect();
        assert!(!events.iter().any(|e| matches!(
            e,
            PoolingEvent::RideCreated { .. } | PoolingEvent::BookingMatched { .. }
        )));
        assert!(matches!(events.last(), Some(PoolingEvent::RoundAborted { .. })));

        let stored = store.get_booking(booking.id).unwrap().unwrap();
        assert_eq!(stored.status, BookingStatus::Pending);
        assert_eq!(stored.version, 0);
    }

    #[test]
    fn test_matches_are_published_after_commit() {
        let store = Arc::new(InMemoryStore::new());
        book(&store, 0);
        let (tx, rx) = unbounded();
        let orchestrator = MatchingOrchestrator::with_event_handler(
            Arc::clone(&store),
            PoolingConfig::default(),
            Arc::new(ChannelEventHandler::new(tx)),
        )
        .unwrap();

        orchestrator.run_matching_round().unwrap();

        let events: Vec<_> = rx.try_iter().collect();
        let committed_at = events
            .iter()
            .position(|e| {
                matches!(
                    e,
                    PoolingEvent::RoundStateChanged {
                        to: RoundState::Committed,
                        ..
                    }
                )
            })
            .unwrap();
        let ride_at = events
            .iter()
            .position(|e| matches!(e, PoolingEvent::RideCreated { .. }))
            .unwrap();
        assert!(ride_at > committed_at);
    }

    #[test]
    fn test_far_off_booking_does_not_block_round() {
        let store = Arc::new(InMemoryStore::new());
        let local = book(&store, 0);
        let passenger = store.create_passenger("Noor").unwrap();
        let far = store
            .create_booking(BookingRequest::new(
                passenger.id,
                Coordinate::new(-82.0, -180.0),
                Coordinate::new(82.0, 0.0),
            ))
            .unwrap();

        let summary = orchestrator(&store).run_matching_round().unwrap();
        assert_eq!(summary.bookings_matched, 2);
        assert_eq!(summary.rides_created, 2);
        assert_eq!(store.pending_count(), 0);

        for id in [local.id, far.id] {
            let booking = store.get_booking(id).unwrap().unwrap();
            assert_eq!(booking.status, BookingStatus::Matched);
            let ride = store.get_ride(booking.ride_id.unwrap()).unwrap().unwrap();
            assert!(ride.total_fare.unwrap() > Decimal::ZERO);
        }
    }

    #[test]
    fn test_illegal_round_transition_is_a_state_error() {
        let mut round = RoundTracker::start(RoundId::new(), &NoOpEventHandler);
        let err = round.advance(RoundState::Persisted).unwrap_err();
        assert!(matches!(err, PoolingError::RoundState(_)));
        assert_eq!(round.state, RoundState::Start);
    }

    #[test]
    fn test_round_on_trait_object_store() {
        let store: Arc<dyn MatchingStore> = Arc::new(InMemoryStore::new());
        let passenger = store.create_passenger("Kabir").unwrap();
        store
            .create_booking(BookingRequest::new(passenger.id, AIRPORT, CITY))
            .unwrap();

        let orchestrator = MatchingOrchestrator::new(store, PoolingConfig::default()).unwrap();
        assert_eq!(orchestrator.run_matching_round().unwrap().rides_created, 1);
    }
}
