// ============================================================================
// Engine Module
// Route planning, pooling, pricing and the matching round
// ============================================================================

mod fare;
mod orchestrator;
mod pooling;
mod route;

#[cfg(feature = "async")]
mod scheduler;

pub use fare::{FareCalculator, FareQuote, PassengerLeg};
pub use orchestrator::MatchingOrchestrator;
pub use pooling::{
    pool, Admission, PoolingEngine, PoolingOutcome, RejectReason, RideGroup, Unassigned,
    UnassignedReason,
};
pub use route::Route;

#[cfg(feature = "async")]
pub use scheduler::{MatchingScheduler, SchedulerHandle};
