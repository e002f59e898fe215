// ============================================================================
// Greedy Pooling Engine
// Groups pending bookings into shared rides under capacity and detour limits
// ============================================================================

use crate::domain::config::{DEFAULT_VEHICLE_LUGGAGE, DEFAULT_VEHICLE_SEATS};
use crate::domain::{Booking, BookingId, PoolingConfig, Vehicle, VehiclePool};
use crate::engine::Route;
use crate::interfaces::{EventHandler, NoOpEventHandler, PoolingEvent};
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// ============================================================================
// Admission Results
// ============================================================================

/// Why a group refused a booking.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RejectReason {
    SeatCapacity { required: u32, available: u32 },
    LuggageCapacity { required: u64, available: u32 },
    /// Some passenger (not necessarily the newcomer) would ride too far
    DetourExceeded {
        booking_id: BookingId,
        detour_factor: f64,
        max_detour_factor: f64,
    },
}

/// Why a booking ended up in no group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum UnassignedReason {
    /// No vehicle in the pool can carry the booking on its own
    CapacityExceeded { luggage: u32 },
}

/// Outcome of the admission test. Never an error: a rejection is an
/// ordinary answer that sends the engine to the next group.
#[derive(Debug, Clone, PartialEq)]
pub struct Admission {
    pub admitted: bool,
    pub reason: Option<RejectReason>,
    /// The trial route including the candidate, present when admitted
    pub updated_route: Option<Route>,
}

impl Admission {
    fn accept(route: Route) -> Self {
        Self {
            admitted: true,
            reason: None,
            updated_route: Some(route),
        }
    }

    fn reject(reason: RejectReason) -> Self {
        Self {
            admitted: false,
            reason: Some(reason),
            updated_route: None,
        }
    }
}

// ============================================================================
// Ride Group
// ============================================================================

/// Bookings sharing one vehicle, with their resolved route.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RideGroup {
    pub vehicle: Vehicle,
    /// Members in the order they joined
    pub bookings: Vec<Booking>,
    pub route: Route,
    pub total_distance_km: f64,
}

impl RideGroup {
    /// Start a group with a single booking: pickup, then dropoff.
    pub fn open(booking: Booking, vehicle: Vehicle) -> Self {
        let route = Route::plan([&booking]);
        let total_distance_km = route.total_length_km();
        Self {
            vehicle,
            bookings: vec![booking],
            route,
            total_distance_km,
        }
    }

    pub fn len(&self) -> usize {
        self.bookings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bookings.is_empty()
    }

    pub fn seats_used(&self) -> u32 {
        self.bookings.len() as u32
    }

    /// Total luggage on board, summed wide so large counts cannot wrap.
    pub fn luggage_used(&self) -> u64 {
        self.bookings.iter().map(|b| u64::from(b.luggage)).sum()
    }

    pub fn contains(&self, booking_id: BookingId) -> bool {
        self.bookings.iter().any(|b| b.id == booking_id)
    }

    /// On-board distance of one member along the group's route.
    pub fn passenger_distance_km(&self, booking_id: BookingId) -> f64 {
        self.route.passenger_distance_km(booking_id)
    }

    /// Admission test for `candidate`.
    ///
    /// 1. Seats and luggage of the group plus the candidate must fit.
    /// 2. A trial route is planned over all members plus the candidate.
    /// 3. Every member's detour factor on the trial route must stay within
    ///    `max_detour_factor`; same-point requests are exempt.
    pub fn admit(&self, candidate: &Booking, max_detour_factor: f64) -> Admission {
        let seats_required = self.seats_used() + 1;
        if seats_required > self.vehicle.seats {
            return Admission::reject(RejectReason::SeatCapacity {
                required: seats_required,
                available: self.vehicle.seats,
            });
        }

        let luggage_required = self.luggage_used() + u64::from(candidate.luggage);
        if luggage_required > u64::from(self.vehicle.luggage_capacity) {
            return Admission::reject(RejectReason::LuggageCapacity {
                required: luggage_required,
                available: self.vehicle.luggage_capacity,
            });
        }

        let trial = Route::plan(self.bookings.iter().chain(std::iter::once(candidate)));

        for member in self.bookings.iter().chain(std::iter::once(candidate)) {
            if let Some(detour_factor) = trial.detour_factor(member) {
                if detour_factor > max_detour_factor {
                    return Admission::reject(RejectReason::DetourExceeded {
                        booking_id: member.id,
                        detour_factor,
                        max_detour_factor,
                    });
                }
            }
        }

        Admission::accept(trial)
    }

    fn join(&mut self, booking: Booking, route: Route) {
        self.bookings.push(booking);
        self.total_distance_km = route.total_length_km();
        self.route = route;
    }
}

// ============================================================================
// Pooling Outcome
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Unassigned {
    pub booking: Booking,
    pub reason: UnassignedReason,
}

/// Result of one pooling pass.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PoolingOutcome {
    /// Groups in creation order, open groups passed in first
    pub groups: Vec<RideGroup>,
    /// Bookings no vehicle could carry
    pub unassigned: Vec<Unassigned>,
}

impl PoolingOutcome {
    pub fn grouped_bookings(&self) -> usize {
        self.groups.iter().map(RideGroup::len).sum()
    }

    /// The group containing `booking_id`, if any.
    pub fn group_of(&self, booking_id: BookingId) -> Option<&RideGroup> {
        self.groups.iter().find(|g| g.contains(booking_id))
    }
}

// ============================================================================
// Vehicle Assignment
// ============================================================================

/// Round-robin cursor over a pool, local to one pooling pass.
struct VehicleCursor<'a> {
    pool: &'a VehiclePool,
    next: usize,
    fallback: Vehicle,
}

impl<'a> VehicleCursor<'a> {
    fn new(pool: &'a VehiclePool, fallback: Vehicle) -> Self {
        Self {
            pool,
            next: 0,
            fallback,
        }
    }

    /// Next vehicle, in rotation, able to carry `booking` alone.
    fn next_for(&mut self, booking: &Booking) -> Option<Vehicle> {
        if self.pool.is_empty() {
            return self
                .fallback
                .can_carry(1, booking.luggage)
                .then_some(self.fallback);
        }

        let n = self.pool.len();
        for offset in 0..n {
            let index = (self.next + offset) % n;
            if let Some(vehicle) = self.pool.get(index) {
                if vehicle.can_carry(1, booking.luggage) {
                    self.next = (index + 1) % n;
                    return Some(*vehicle);
                }
            }
        }
        None
    }
}

// ============================================================================
// Pooling
// ============================================================================

/// Greedy single-pass pooling.
///
/// Bookings are taken in creation order. Each joins the first open group
/// (in creation order) whose admission test passes; otherwise it opens a
/// new group on the next vehicle in round-robin order that can carry it.
/// A booking no vehicle can carry is returned in `unassigned`. An empty
/// pool falls back to a 4-seat, 4-bag placeholder vehicle.
///
/// Pure and deterministic. Complexity: O(P × R × W) for P bookings,
/// R groups and W waypoints per group.
///
/// # Example
/// ```
/// use ride_pooling::domain::{Booking, PassengerId, Vehicle, VehiclePool};
/// use ride_pooling::engine::pool;
/// use ride_pooling::geo::Coordinate;
///
/// let airport = Coordinate::new(28.5355, 77.391);
/// let city = Coordinate::new(28.6139, 77.209);
/// let x = Booking::new(PassengerId::new(), airport, city, 0).with_sequence(1);
/// let y = Booking::new(PassengerId::new(), airport, city, 0).with_sequence(2);
///
/// let vehicles = VehiclePool::from(vec![Vehicle::new(4, 4)]);
/// let outcome = pool(&[x, y], Vec::new(), &vehicles, 0.30);
/// assert_eq!(outcome.groups.len(), 1);
/// assert_eq!(outcome.groups[0].len(), 2);
/// ```
pub fn pool(
    pending: &[Booking],
    open_groups: Vec<RideGroup>,
    vehicles: &VehiclePool,
    max_detour_factor: f64,
) -> PoolingOutcome {
    pool_with(
        pending,
        open_groups,
        vehicles,
        max_detour_factor,
        Vehicle::placeholder(DEFAULT_VEHICLE_SEATS, DEFAULT_VEHICLE_LUGGAGE),
        &NoOpEventHandler,
    )
}

fn pool_with(
    pending: &[Booking],
    open_groups: Vec<RideGroup>,
    vehicles: &VehiclePool,
    max_detour_factor: f64,
    fallback: Vehicle,
    events: &dyn EventHandler,
) -> PoolingOutcome {
    let mut ordered: Vec<&Booking> = pending.iter().collect();
    ordered.sort_by_key(|b| b.creation_key());

    let mut groups = open_groups;
    let mut unassigned = Vec::new();
    let mut cursor = VehicleCursor::new(vehicles, fallback);

    for booking in ordered {
        let mut admitted = false;

        for (group_index, group) in groups.iter_mut().enumerate() {
            let admission = group.admit(booking, max_detour_factor);
            if let Some(route) = admission.updated_route {
                group.join(booking.clone(), route);
                events.on_event(PoolingEvent::BookingAdmitted {
                    group_index,
                    booking_id: booking.id,
                });
                admitted = true;
                break;
            }
            if let Some(reason) = admission.reason {
                events.on_event(PoolingEvent::InsertionRejected {
                    group_index,
                    booking_id: booking.id,
                    reason,
                });
            }
        }

        if admitted {
            continue;
        }

        match cursor.next_for(booking) {
            Some(vehicle) => {
                events.on_event(PoolingEvent::GroupOpened {
                    group_index: groups.len(),
                    booking_id: booking.id,
                    vehicle_id: vehicle.id,
                });
                groups.push(RideGroup::open(booking.clone(), vehicle));
            },
            None => {
                let reason = UnassignedReason::CapacityExceeded {
                    luggage: booking.luggage,
                };
                events.on_event(PoolingEvent::BookingUnassigned {
                    booking_id: booking.id,
                    reason,
                });
                unassigned.push(Unassigned {
                    booking: booking.clone(),
                    reason,
                });
            },
        }
    }

    PoolingOutcome { groups, unassigned }
}

/// Pooling bound to a configuration and an event sink.
pub struct PoolingEngine {
    config: PoolingConfig,
    event_handler: Arc<dyn EventHandler>,
}

impl PoolingEngine {
    pub fn new(config: PoolingConfig, event_handler: Arc<dyn EventHandler>) -> Self {
        Self {
            config,
            event_handler,
        }
    }

    pub fn config(&self) -> &PoolingConfig {
        &self.config
    }

    /// Run [`pool`] with this engine's detour limit and default vehicle,
    /// reporting every decision to the event handler.
    pub fn pool(
        &self,
        pending: &[Booking],
        open_groups: Vec<RideGroup>,
        vehicles: &VehiclePool,
    ) -> PoolingOutcome {
        pool_with(
            pending,
            open_groups,
            vehicles,
            self.config.max_detour_factor,
            Vehicle::placeholder(
                self.config.default_vehicle_seats,
                self.config.default_vehicle_luggage,
            ),
            self.event_handler.as_ref(),
        )
    }
}
