// ============================================================================
// Passenger Domain Model
// ============================================================================

use chrono::{DateTime, Utc};
use uuid::Uuid;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PassengerId(Uuid);

impl PassengerId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for PassengerId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for PassengerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Maximum accepted length of a passenger name.
pub const MAX_PASSENGER_NAME_LEN: usize = 255;

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Passenger {
    pub id: PassengerId,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl Passenger {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: PassengerId::new(),
            name: name.into(),
            created_at: Utc::now(),
        }
    }

    /// Names must be non-blank and at most 255 characters.
    pub fn validate_name(name: &str) -> Result<(), String> {
        if name.trim().is_empty() {
            return Err("Passenger name must be a non-empty string".to_string());
        }
        if name.chars().count() > MAX_PASSENGER_NAME_LEN {
            return Err(format!(
                "Passenger name must not exceed {} characters",
                MAX_PASSENGER_NAME_LEN
            ));
        }
        Ok(())
    }
}
