// ============================================================================
// Matching Round Model
// Identity, lifecycle and result of one matching round
// ============================================================================

use crate::domain::RideId;
use uuid::Uuid;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Identifies one matching round. Claimed bookings are stamped with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RoundId(Uuid);

impl RoundId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for RoundId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RoundId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

// ============================================================================
// Round State Machine
// ============================================================================

/// ```text
/// Start -> Claimed -> Grouped -> Persisted -> Committed
///            |  \________________________________/^
///            |         (empty claim commits directly)
///   any non-terminal state -> Aborted
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RoundState {
    Start,
    Claimed,
    Grouped,
    Persisted,
    Committed,
    Aborted,
}

impl RoundState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, RoundState::Committed | RoundState::Aborted)
    }

    pub fn transition(&self, next: RoundState) -> Result<RoundState, String> {
        use RoundState::*;
        match (self, next) {
            (Start, Claimed)
            | (Claimed, Grouped)
            | (Claimed, Committed)
            | (Grouped, Persisted)
            | (Persisted, Committed) => Ok(next),
            (from, Aborted) if !from.is_terminal() => Ok(Aborted),
            _ => Err(format!("Invalid round transition from {:?} to {:?}", self, next)),
        }
    }
}

// ============================================================================
// Round Summary
// ============================================================================

/// What a committed round wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RoundSummary {
    pub round_id: RoundId,
    pub rides_created: usize,
    pub bookings_matched: usize,
    /// Claimed bookings no vehicle could carry; they stay PENDING
    pub bookings_unassigned: usize,
    pub ride_ids: Vec<RideId>,
}

impl RoundSummary {
    pub fn empty(round_id: RoundId) -> Self {
        Self {
            round_id,
            rides_created: 0,
            bookings_matched: 0,
            bookings_unassigned: 0,
            ride_ids: Vec::new(),
        }
    }

    /// True when the round created no rides and matched no bookings.
    pub fn is_empty(&self) -> bool {
        self.rides_created == 0 && self.bookings_matched == 0
    }
}
