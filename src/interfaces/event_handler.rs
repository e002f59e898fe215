// ============================================================================
// Event Handler Interface
// Defines the contract for observing pooling and matching-round events
// ============================================================================

use crate::domain::{BookingId, RideId, RoundId, RoundState, RoundSummary, VehicleId};
use crate::engine::{RejectReason, UnassignedReason};
use chrono::{DateTime, Utc};
use crossbeam::channel::Sender;
use rust_decimal::Decimal;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Events emitted by the pooling engine and the matching orchestrator
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PoolingEvent {
    /// A booking could not join any open group and started its own
    GroupOpened {
        group_index: usize,
        booking_id: BookingId,
        vehicle_id: VehicleId,
    },

    /// A booking joined an existing group
    BookingAdmitted {
        group_index: usize,
        booking_id: BookingId,
    },

    /// A group refused a booking; the engine moves on to the next group
    InsertionRejected {
        group_index: usize,
        booking_id: BookingId,
        reason: RejectReason,
    },

    /// No vehicle can carry the booking; it stays pending
    BookingUnassigned {
        booking_id: BookingId,
        reason: UnassignedReason,
    },

    /// A matching round began
    RoundStarted {
        round_id: RoundId,
        timestamp: DateTime<Utc>,
    },

    /// A matching round moved through its state machine
    RoundStateChanged {
        round_id: RoundId,
        from: RoundState,
        to: RoundState,
        timestamp: DateTime<Utc>,
    },

    /// A ride was written inside the round's transaction
    RideCreated {
        round_id: RoundId,
        ride_id: RideId,
        vehicle_id: VehicleId,
        passengers: usize,
        total_distance_km: f64,
        total_fare: Decimal,
        timestamp: DateTime<Utc>,
    },

    /// A booking was bound to a ride with its fare
    BookingMatched {
        round_id: RoundId,
        booking_id: BookingId,
        ride_id: RideId,
        fare: Decimal,
        timestamp: DateTime<Utc>,
    },

    /// The round's writes became visible
    RoundCommitted {
        summary: RoundSummary,
        timestamp: DateTime<Utc>,
    },

    /// The round rolled back every write
    RoundAborted {
        round_id: RoundId,
        reason: String,
        timestamp: DateTime<Utc>,
    },
}

/// Event handler trait for processing pooling events
/// Implementations can handle logging, metrics, notifications, etc.
pub trait EventHandler: Send + Sync {
    /// Handle a pooling event
    fn on_event(&self, event: PoolingEvent);

    /// Batch event handler (optional optimization)
    fn on_events(&self, events: Vec<PoolingEvent>) {
        for event in events {
            self.on_event(event);
        }
    }
}

/// No-op event handler for testing
pub struct NoOpEventHandler;

impl EventHandler for NoOpEventHandler {
    fn on_event(&self, _event: PoolingEvent) {
        // Do nothing
    }
}

/// Logging event handler
pub struct LoggingEventHandler;

impl EventHandler for LoggingEventHandler {
    fn on_event(&self, event: PoolingEvent) {
        tracing::debug!("Pooling event: {:?}", event);
    }
}

/// Forwards every event into a channel.
///
/// Sends to a disconnected receiver are dropped silently.
pub struct ChannelEventHandler {
    sender: Sender<PoolingEvent>,
}

impl ChannelEventHandler {
    pub fn new(sender: Sender<PoolingEvent>) -> Self {
        Self { sender }
    }
}

impl EventHandler for ChannelEventHandler {
    fn on_event(&self, event: PoolingEvent) {
        let _ = self.sender.send(event);
    }
}
