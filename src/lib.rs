// ============================================================================
// Ride Pooling Library
// Shared-cab matching with capacity and detour limits, pooled fares and
// exactly-once matching rounds
// ============================================================================

//! # Ride Pooling
//!
//! Groups pending ride requests into shared cabs, prices each passenger and
//! commits every matching round atomically.
//!
//! ## Features
//!
//! - **Greedy pooling** under seat, luggage and per-passenger detour limits
//! - **Pooled fares** with a sharing discount and a capped detour surcharge
//! - **All-or-nothing matching rounds** over a transactional store
//! - **Claim-and-skip concurrency**: parallel rounds never share a booking,
//!   and a cancel racing a match has exactly one winner
//! - **Periodic scheduler** on tokio (feature `async`)
//!
//! ## Example
//!
//! ```rust
//! use ride_pooling::prelude::*;
//! use std::sync::Arc;
//!
//! let store = Arc::new(InMemoryStore::new());
//! let service = BookingService::new(Arc::clone(&store), PoolingConfig::default()).unwrap();
//!
//! let airport = Coordinate::new(28.5355, 77.391);
//! let city = Coordinate::new(28.6139, 77.209);
//! for name in ["Asha", "Ravi"] {
//!     let passenger = service.register_passenger(name).unwrap();
//!     service
//!         .create_booking(BookingRequest::new(passenger.id, airport, city))
//!         .unwrap();
//! }
//!
//! let summary = service.run_matching().unwrap();
//! assert_eq!(summary.rides_created, 1);
//! assert_eq!(summary.bookings_matched, 2);
//!
//! let ride = service.get_ride(summary.ride_ids[0]).unwrap();
//! println!("Fare: {:?}", ride.ride.total_fare);
//! ```

pub mod domain;
pub mod engine;
pub mod error;
pub mod geo;
pub mod interfaces;
pub mod service;
pub mod store;

/// Install an env-filtered `fmt` subscriber (`RUST_LOG`, default `info`).
#[cfg(feature = "logging")]
pub fn init_logging() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // Already installed by the host: keep theirs
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

// Re-exports for convenience
pub mod prelude {
    pub use crate::domain::booking::state::{BookingStatus, BookingTransition};
    pub use crate::domain::{
        Booking, BookingId, BookingRequest, Passenger, PassengerId, PoolingConfig, Ride, RideId,
        RideStatus, RoundId, RoundState, RoundSummary, Vehicle, VehicleId, VehiclePool, Waypoint,
        WaypointKind,
    };
    pub use crate::engine::{
        pool, Admission, FareCalculator, MatchingOrchestrator, PoolingEngine, PoolingOutcome,
        RejectReason, RideGroup, Route, UnassignedReason,
    };
    #[cfg(feature = "async")]
    pub use crate::engine::{MatchingScheduler, SchedulerHandle};
    pub use crate::error::{PoolingError, PoolingResult, PricingError};
    pub use crate::geo::{distance_km, route_length_km, Coordinate};
    pub use crate::interfaces::{
        ChannelEventHandler, EventHandler, LoggingEventHandler, MatchingStore, NoOpEventHandler,
        PoolingEvent, StoreError,
    };
    pub use crate::service::{BookingService, RideDetails};
    pub use crate::store::InMemoryStore;
}
