// ============================================================================
// Airport Pooling Demo
// ============================================================================

use ride_pooling::prelude::*;
use std::sync::Arc;

const AIRPORT: Coordinate = Coordinate::new(28.5355, 77.391);

const ZONES: [(&str, Coordinate); 7] = [
    ("Connaught Place", Coordinate::new(28.6139, 77.209)),
    ("Gurgaon", Coordinate::new(28.4089, 77.0585)),
    ("Noida", Coordinate::new(28.5921, 77.2064)),
    ("Dwarka", Coordinate::new(28.5921, 77.045)),
    ("North Delhi", Coordinate::new(28.7041, 77.1025)),
    ("South Delhi", Coordinate::new(28.5244, 77.1855)),
    ("Chikhalwadi", Coordinate::new(28.45, 77.35)),
];

struct Scenario {
    description: &'static str,
    /// (zone index, luggage)
    trips: &'static [(usize, u32)],
}

const SCENARIOS: [Scenario; 5] = [
    Scenario {
        description: "Close bookings (should pool)",
        trips: &[(0, 0), (0, 1), (0, 1), (0, 2), (0, 0)],
    },
    Scenario {
        description: "Far destinations (detour constraints)",
        trips: &[(2, 2), (3, 2), (4, 1)],
    },
    Scenario {
        description: "High luggage (capacity test)",
        trips: &[(0, 3), (0, 3), (0, 2), (1, 2)],
    },
    Scenario {
        description: "Oversized luggage (stays pending)",
        trips: &[(1, 6)],
    },
    Scenario {
        description: "Solo travellers",
        trips: &[(0, 0), (1, 0), (5, 0), (6, 0)],
    },
];

fn main() -> Result<(), PoolingError> {
    ride_pooling::init_logging();
    println!("=== Airport Ride Pooling ===\n");

    let config = PoolingConfig::from_env().map_err(PoolingError::Config)?;
    let store = Arc::new(InMemoryStore::from_config(&config));
    let service = BookingService::with_event_handler(
        Arc::clone(&store),
        config,
        Arc::new(LoggingEventHandler),
    )?;

    let mut rider = 0;
    for scenario in &SCENARIOS {
        println!("Scenario: {}", scenario.description);
        for &(zone, luggage) in scenario.trips {
            rider += 1;
            let passenger = service.register_passenger(&format!("Passenger {rider}"))?;
            let (name, dropoff) = ZONES[zone];
            let booking = service.create_booking(
                BookingRequest::new(passenger.id, AIRPORT, dropoff).with_luggage(luggage),
            )?;
            println!(
                "  {} -> {:<16} luggage {}  ({:.1} km direct)",
                passenger.name,
                name,
                luggage,
                booking.direct_distance_km()
            );
        }
    }

    println!("\n=== Matching Round ===");
    let summary = service.run_matching()?;
    println!(
        "Rides: {}  Matched: {}  Left pending: {}\n",
        summary.rides_created, summary.bookings_matched, summary.bookings_unassigned
    );

    for ride_id in &summary.ride_ids {
        let details = service.get_ride(*ride_id)?;
        println!(
            "Ride {}: {} passenger(s), {:.2} km, fare {}",
            details.ride.id,
            details.bookings.len(),
            details.ride.total_distance_km.unwrap_or_default(),
            details.ride.total_fare.unwrap_or_default()
        );
        for waypoint in &details.waypoints {
            println!(
                "  {:>2}. {:<7} {}",
                waypoint.sequence,
                waypoint.kind.as_str(),
                waypoint.location
            );
        }
    }

    println!("\nStill pending: {}", store.pending_count());
    Ok(())
}
