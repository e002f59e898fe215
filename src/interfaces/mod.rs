// ============================================================================
// Interfaces Module
// Contains all trait definitions and contracts
// ============================================================================

mod event_handler;
mod store;

pub use event_handler::{
    ChannelEventHandler, EventHandler, LoggingEventHandler, NoOpEventHandler, PoolingEvent,
};
pub use store::{
    BookingRepository, MatchingStore, MatchingTransaction, PassengerRepository, RideRepository,
    StoreError, StoreResult, TransactionalStore, VehicleRepository,
};
