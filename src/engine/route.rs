// ============================================================================
// Route Planning
// Gather-then-disperse waypoint ordering for a ride group
// ============================================================================

use crate::domain::{Booking, BookingId, Waypoint, WaypointKind};
use crate::geo::{distance_km, route_length_km, Coordinate};
use smallvec::SmallVec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Ordered stops of a ride group.
///
/// Built by visiting every pickup in ascending latitude, then every dropoff
/// in ascending latitude. Ties keep the order in which bookings joined the
/// group. This fits airport-to-city geometry without solving a routing
/// problem; it ignores longitude and is not optimal.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Route {
    waypoints: Vec<Waypoint>,
}

impl Route {
    /// Plan a route for `bookings`, given in the order they joined the group.
    ///
    /// Complexity: O(B log B) for B bookings.
    pub fn plan<'a, I>(bookings: I) -> Self
    where
        I: IntoIterator<Item = &'a Booking>,
    {
        let mut stops: SmallVec<[(WaypointKind, Coordinate, BookingId); 8]> = SmallVec::new();
        for booking in bookings {
            stops.push((WaypointKind::Pickup, booking.pickup, booking.id));
            stops.push((WaypointKind::Dropoff, booking.dropoff, booking.id));
        }

        // Stable: equal latitudes keep insertion order
        stops.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.lat.total_cmp(&b.1.lat)));

        let waypoints = stops
            .into_iter()
            .enumerate()
            .map(|(i, (kind, location, booking_id))| Waypoint {
                booking_id,
                kind,
                sequence: i as u32 + 1,
                location,
            })
            .collect();

        Self { waypoints }
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Length of the whole route.
    pub fn total_length_km(&self) -> f64 {
        let points: Vec<Coordinate> = self.waypoints.iter().map(|w| w.location).collect();
        route_length_km(&points)
    }

    fn position(&self, booking_id: BookingId, kind: WaypointKind) -> Option<usize> {
        self.waypoints
            .iter()
            .position(|w| w.booking_id == booking_id && w.kind == kind)
    }

    /// Distance a passenger travels on board: the segments between their
    /// pickup and their dropoff. Zero if the booking is not on the route.
    pub fn passenger_distance_km(&self, booking_id: BookingId) -> f64 {
        let (Some(pickup), Some(dropoff)) = (
            self.position(booking_id, WaypointKind::Pickup),
            self.position(booking_id, WaypointKind::Dropoff),
        ) else {
            return 0.0;
        };

        if dropoff <= pickup {
            return 0.0;
        }

        self.waypoints[pickup..=dropoff]
            .windows(2)
            .map(|pair| distance_km(pair[0].location, pair[1].location))
            .sum()
    }

    /// Fractional excess of on-board distance over direct distance.
    ///
    /// `None` when the direct distance is zero (same-point request), in
    /// which case no detour limit applies.
    pub fn detour_factor(&self, booking: &Booking) -> Option<f64> {
        let direct = booking.direct_distance_km();
        if direct <= 0.0 {
            return None;
        }
        let on_board = self.passenger_distance_km(booking.id);
        Some((on_board - direct) / direct)
    }
}
