// ============================================================================
// In-Memory Store
// Transactional booking store with claim-and-skip semantics
// ============================================================================

use crate::domain::{
    Booking, BookingId, BookingRequest, Passenger, PassengerId, PoolingConfig, Ride, RideId,
    RoundId, Vehicle, VehicleId, Waypoint,
};
use crate::interfaces::{
    BookingRepository, MatchingTransaction, PassengerRepository, RideRepository, StoreError,
    StoreResult, TransactionalStore, VehicleRepository,
};
use crossbeam_skiplist::SkipMap;
use parking_lot::{Condvar, Mutex};
use rust_decimal::Decimal;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

// ============================================================================
// Tables
// ============================================================================

#[derive(Debug)]
struct BookingRow {
    booking: Booking,
    /// Round currently holding the row; other rounds skip it
    claimed_by: Option<RoundId>,
}

#[derive(Debug, Default)]
struct Tables {
    passengers: HashMap<PassengerId, Passenger>,
    bookings: HashMap<BookingId, BookingRow>,
    rides: HashMap<RideId, Ride>,
    waypoints: HashMap<RideId, Vec<Waypoint>>,
    vehicles: Vec<Vehicle>,
}

impl Tables {
    fn row(&self, id: BookingId) -> StoreResult<&BookingRow> {
        self.bookings.get(&id).ok_or_else(|| not_found("booking", id))
    }

    fn row_mut(&mut self, id: BookingId) -> StoreResult<&mut BookingRow> {
        self.bookings
            .get_mut(&id)
            .ok_or_else(|| not_found("booking", id))
    }

    fn release(&mut self, round_id: RoundId, claimed: impl IntoIterator<Item = BookingId>) {
        for id in claimed {
            if let Some(row) = self.bookings.get_mut(&id) {
                if row.claimed_by == Some(round_id) {
                    row.claimed_by = None;
                }
            }
        }
    }
}

fn not_found(entity: &'static str, id: impl ToString) -> StoreError {
    StoreError::NotFound {
        entity,
        id: id.to_string(),
    }
}

// ============================================================================
// Store
// ============================================================================

/// Thread-safe in-memory implementation of every store trait.
///
/// A matching round stamps the PENDING rows it claims with its `RoundId`.
/// Concurrent rounds skip stamped rows, so two rounds never share a
/// booking. A cancellation hitting a stamped row blocks until the round
/// releases it or `lock_timeout` expires.
pub struct InMemoryStore {
    tables: Mutex<Tables>,

    /// Signalled whenever a round releases its claims
    released: Condvar,

    /// PENDING bookings keyed by creation sequence
    pending: SkipMap<u64, BookingId>,

    /// Sequence counter for booking creation order
    sequence_counter: AtomicU64,

    lock_timeout: Duration,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::with_lock_timeout(crate::domain::config::DEFAULT_LOCK_TIMEOUT)
    }

    pub fn with_lock_timeout(lock_timeout: Duration) -> Self {
        Self {
            tables: Mutex::new(Tables::default()),
            released: Condvar::new(),
            pending: SkipMap::new(),
            sequence_counter: AtomicU64::new(0),
            lock_timeout,
        }
    }

    pub fn from_config(config: &PoolingConfig) -> Self {
        Self::with_lock_timeout(config.lock_timeout)
    }

    /// Number of PENDING bookings, claimed or not.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Stamp every unclaimed PENDING row with `round_id`, in creation order.
    fn claim(&self, round_id: RoundId) -> Vec<Booking> {
        let mut tables = self.tables.lock();
        let mut claimed = Vec::new();

        for entry in self.pending.iter() {
            let Some(row) = tables.bookings.get_mut(entry.value()) else {
                continue;
            };
            if row.claimed_by.is_some() || !row.booking.is_pending() {
                continue;
            }
            row.claimed_by = Some(round_id);
            claimed.push(row.booking.clone());
        }

        tracing::debug!(%round_id, claimed = claimed.len(), "claimed pending bookings");
        claimed
    }

    fn release(&self, round_id: RoundId, claimed: impl IntoIterator<Item = BookingId>) {
        self.tables.lock().release(round_id, claimed);
        self.released.notify_all();
    }
}

// ============================================================================
// Repositories
// ============================================================================

impl PassengerRepository for InMemoryStore {
    fn create_passenger(&self, name: &str) -> StoreResult<Passenger> {
        let passenger = Passenger::new(name);
        self.tables
            .lock()
            .passengers
            .insert(passenger.id, passenger.clone());
        Ok(passenger)
    }

    fn get_passenger(&self, id: PassengerId) -> StoreResult<Option<Passenger>> {
        Ok(self.tables.lock().passengers.get(&id).cloned())
    }
}

impl BookingRepository for InMemoryStore {
    fn create_booking(&self, request: BookingRequest) -> StoreResult<Booking> {
        let mut tables = self.tables.lock();
        if !tables.passengers.contains_key(&request.passenger_id) {
            return Err(not_found("passenger", request.passenger_id));
        }

        let sequence = self.sequence_counter.fetch_add(1, Ordering::AcqRel);
        let booking = Booking::from_request(request, sequence);
        tables.bookings.insert(
            booking.id,
            BookingRow {
                booking: booking.clone(),
                claimed_by: None,
            },
        );
        self.pending.insert(sequence, booking.id);
        Ok(booking)
    }

    fn get_booking(&self, id: BookingId) -> StoreResult<Option<Booking>> {
        Ok(self
            .tables
            .lock()
            .bookings
            .get(&id)
            .map(|row| row.booking.clone()))
    }

    fn cancel_booking(&self, id: BookingId, expected_version: u64) -> StoreResult<Booking> {
        let deadline = Instant::now() + self.lock_timeout;
        let mut tables = self.tables.lock();

        // Row lock: wait for the claiming round to commit or roll back
        while tables.row(id)?.claimed_by.is_some() {
            if self.released.wait_until(&mut tables, deadline).timed_out()
                && tables.row(id)?.claimed_by.is_some()
            {
                tracing::warn!(booking_id = %id, "cancel timed out waiting for matching round");
                return Err(StoreError::LockTimeout { booking_id: id });
            }
        }

        let row = tables.row_mut(id)?;
        if !row.booking.is_pending() || row.booking.version != expected_version {
            return Err(StoreError::VersionConflict {
                booking_id: id,
                expected: expected_version,
                actual: row.booking.version,
            });
        }

        row.booking
            .cancel()
            .map_err(|_| StoreError::VersionConflict {
                booking_id: id,
                expected: expected_version,
                actual: row.booking.version,
            })?;
        let booking = row.booking.clone();
        self.pending.remove(&booking.sequence);
        Ok(booking)
    }

    fn get_bookings_by_ride(&self, ride_id: RideId) -> StoreResult<Vec<Booking>> {
        let tables = self.tables.lock();
        let mut bookings: Vec<Booking> = tables
            .bookings
            .values()
            .filter(|row| row.booking.ride_id == Some(ride_id))
            .map(|row| row.booking.clone())
            .collect();
        bookings.sort_by_key(|b| b.sequence);
        Ok(bookings)
    }
}

impl RideRepository for InMemoryStore {
    fn get_ride(&self, id: RideId) -> StoreResult<Option<Ride>> {
        Ok(self.tables.lock().rides.get(&id).cloned())
    }

    fn get_waypoints(&self, ride_id: RideId) -> StoreResult<Vec<Waypoint>> {
        let tables = self.tables.lock();
        let mut waypoints = tables.waypoints.get(&ride_id).cloned().unwrap_or_default();
        waypoints.sort_by_key(|w| w.sequence);
        Ok(waypoints)
    }
}

impl VehicleRepository for InMemoryStore {
    fn list_vehicles(&self) -> StoreResult<Vec<Vehicle>> {
        Ok(self.tables.lock().vehicles.clone())
    }

    fn ensure_default_pool(
        &self,
        seats: u32,
        luggage_capacity: u32,
        count: usize,
    ) -> StoreResult<()> {
        let mut tables = self.tables.lock();
        if tables.vehicles.is_empty() {
            tables
                .vehicles
                .extend((0..count).map(|_| Vehicle::new(seats, luggage_capacity)));
            tracing::info!(count, seats, luggage_capacity, "provisioned default vehicle pool");
        }
        Ok(())
    }

    fn create_vehicle(&self, seats: u32, luggage_capacity: u32) -> StoreResult<Vehicle> {
        let vehicle = Vehicle::new(seats, luggage_capacity);
        self.tables.lock().vehicles.push(vehicle);
        Ok(vehicle)
    }
}

impl TransactionalStore for InMemoryStore {
    fn begin(&self, round_id: RoundId) -> StoreResult<Box<dyn MatchingTransaction + '_>> {
        Ok(Box::new(InMemoryTransaction::new(self, round_id)))
    }
}

// ============================================================================
// Transaction
// ============================================================================

/// Staged writes of one round. Applied atomically on commit; claims are
/// released on commit, rollback or drop.
pub struct InMemoryTransaction<'a> {
    store: &'a InMemoryStore,
    round_id: RoundId,
    /// Claimed booking -> version at claim time
    claimed: HashMap<BookingId, u64>,
    rides: Vec<Ride>,
    waypoints: HashMap<RideId, Vec<Waypoint>>,
    matches: Vec<(BookingId, RideId, u64)>,
    closed: bool,
}

impl<'a> InMemoryTransaction<'a> {
    fn new(store: &'a InMemoryStore, round_id: RoundId) -> Self {
        Self {
            store,
            round_id,
            claimed: HashMap::new(),
            rides: Vec::new(),
            waypoints: HashMap::new(),
            matches: Vec::new(),
            closed: false,
        }
    }

    fn ensure_open(&self) -> StoreResult<()> {
        if self.closed {
            return Err(StoreError::TransactionClosed);
        }
        Ok(())
    }

    fn staged_ride_mut(&mut self, ride_id: RideId) -> StoreResult<&mut Ride> {
        self.rides
            .iter_mut()
            .find(|r| r.id == ride_id)
            .ok_or_else(|| not_found("ride", ride_id))
    }

    fn release_claims(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        let claimed: Vec<BookingId> = self.claimed.keys().copied().collect();
        self.store.release(self.round_id, claimed);
    }
}

impl MatchingTransaction for InMemoryTransaction<'_> {
    fn round_id(&self) -> RoundId {
        self.round_id
    }

    fn claim_pending_bookings(&mut self) -> StoreResult<Vec<Booking>> {
        self.ensure_open()?;
        let bookings = self.store.claim(self.round_id);
        self.claimed
            .extend(bookings.iter().map(|b| (b.id, b.version)));
        Ok(bookings)
    }

    fn create_ride(&mut self, vehicle_id: VehicleId) -> StoreResult<Ride> {
        self.ensure_open()?;
        let ride = Ride::new(vehicle_id);
        self.rides.push(ride.clone());
        Ok(ride)
    }

    fn update_ride_aggregate(
        &mut self,
        ride_id: RideId,
        total_distance_km: f64,
        total_fare: Decimal,
    ) -> StoreResult<()> {
        self.ensure_open()?;
        let ride = self.staged_ride_mut(ride_id)?;
        ride.total_distance_km = Some(total_distance_km);
        ride.total_fare = Some(total_fare);
        Ok(())
    }

    fn insert_waypoints(&mut self, ride_id: RideId, waypoints: &[Waypoint]) -> StoreResult<()> {
        self.ensure_open()?;
        self.staged_ride_mut(ride_id)?;

        let staged = self.waypoints.entry(ride_id).or_default();
        let mut sequences: HashSet<u32> = staged.iter().map(|w| w.sequence).collect();
        for waypoint in waypoints {
            if !sequences.insert(waypoint.sequence) {
                return Err(StoreError::DuplicateWaypoint {
                    ride_id,
                    sequence: waypoint.sequence,
                });
            }
        }
        staged.extend_from_slice(waypoints);
        Ok(())
    }

    fn mark_matched(
        &mut self,
        booking_id: BookingId,
        ride_id: RideId,
        expected_version: u64,
    ) -> StoreResult<()> {
        self.ensure_open()?;
        let claimed_version = *self
            .claimed
            .get(&booking_id)
            .ok_or(StoreError::NotClaimed { booking_id })?;

        let already_matched = self.matches.iter().any(|(id, _, _)| *id == booking_id);
        let actual = if already_matched {
            claimed_version + 1
        } else {
            claimed_version
        };
        if actual != expected_version {
            return Err(StoreError::VersionConflict {
                booking_id,
                expected: expected_version,
                actual,
            });
        }

        self.staged_ride_mut(ride_id)?;
        self.matches.push((booking_id, ride_id, expected_version));
        Ok(())
    }

    fn commit(mut self: Box<Self>) -> StoreResult<()> {
        self.ensure_open()?;
        let round_id = self.round_id;
        let store = self.store;
        let rides = self.rides.len();

        let result = {
            let mut tables = store.tables.lock();
            let validated = validate_matches(&tables, round_id, &self.matches);

            if validated.is_ok() {
                for ride in self.rides.drain(..) {
                    tables.rides.insert(ride.id, ride);
                }
                for (ride_id, waypoints) in self.waypoints.drain() {
                    tables.waypoints.entry(ride_id).or_default().extend(waypoints);
                }
                for &(booking_id, ride_id, _) in &self.matches {
                    if let Some(row) = tables.bookings.get_mut(&booking_id) {
                        if row.booking.mark_matched(ride_id).is_ok() {
                            store.pending.remove(&row.booking.sequence);
                        }
                    }
                }
            }
            validated
        };

        match &result {
            Ok(()) => tracing::debug!(
                %round_id,
                rides,
                matched = self.matches.len(),
                "transaction committed"
            ),
            Err(err) => tracing::warn!(%round_id, error = %err, "commit rejected"),
        }

        self.release_claims();
        result
    }

    fn rollback(mut self: Box<Self>) {
        tracing::debug!(round_id = %self.round_id, "transaction rolled back");
        self.release_claims();
    }
}

/// Every staged match must still hold its claim at the claimed version.
fn validate_matches(
    tables: &Tables,
    round_id: RoundId,
    matches: &[(BookingId, RideId, u64)],
) -> StoreResult<()> {
    for &(booking_id, _, expected) in matches {
        let row = tables.row(booking_id)?;
        if row.claimed_by != Some(round_id) {
            return Err(StoreError::NotClaimed { booking_id });
        }
        if !row.booking.is_pending() || row.booking.version != expected {
            return Err(StoreError::VersionConflict {
                booking_id,
                expected,
                actual: row.booking.version,
            });
        }
    }
    Ok(())
}

impl Drop for InMemoryTransaction<'_> {
    fn drop(&mut self) {
        self.release_claims();
    }
}
