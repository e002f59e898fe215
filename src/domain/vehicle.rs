// ============================================================================
// Vehicle Domain Model
// ============================================================================

use uuid::Uuid;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VehicleId(Uuid);

impl VehicleId {
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

impl Default for VehicleId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for VehicleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A cab. Immutable once created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Vehicle {
    pub id: VehicleId,
    pub seats: u32,
    pub luggage_capacity: u32,
}

impl Vehicle {
    pub fn new(seats: u32, luggage_capacity: u32) -> Self {
        Self {
            id: VehicleId::new(),
            seats,
            luggage_capacity,
        }
    }

    /// Stand-in vehicle for pooling against an empty pool. Carries the nil id.
    pub fn placeholder(seats: u32, luggage_capacity: u32) -> Self {
        Self {
            id: VehicleId::from_uuid(Uuid::nil()),
            seats,
            luggage_capacity,
        }
    }

    /// Whether `passengers` riders with `luggage` bags fit.
    #[inline]
    pub fn can_carry(&self, passengers: u32, luggage: u32) -> bool {
        passengers <= self.seats && luggage <= self.luggage_capacity
    }
}

// ============================================================================
// Vehicle Pool
// ============================================================================

/// The set of cabs available to one matching round.
///
/// Passed by value into every round; nothing about the pool outlives it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VehiclePool {
    vehicles: Vec<Vehicle>,
}

impl VehiclePool {
    pub fn new(vehicles: Vec<Vehicle>) -> Self {
        Self { vehicles }
    }

    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }

    pub fn len(&self) -> usize {
        self.vehicles.len()
    }

    pub fn get(&self, index: usize) -> Option<&Vehicle> {
        self.vehicles.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Vehicle> {
        self.vehicles.iter()
    }

    pub fn max_luggage_capacity(&self) -> Option<u32> {
        self.vehicles.iter().map(|v| v.luggage_capacity).max()
    }

    pub fn max_seats(&self) -> Option<u32> {
        self.vehicles.iter().map(|v| v.seats).max()
    }
}

impl From<Vec<Vehicle>> for VehiclePool {
    fn from(vehicles: Vec<Vehicle>) -> Self {
        Self::new(vehicles)
    }
}

impl<'a> IntoIterator for &'a VehiclePool {
    type Item = &'a Vehicle;
    type IntoIter = std::slice::Iter<'a, Vehicle>;

    fn into_iter(self) -> Self::IntoIter {
        self.vehicles.iter()
    }
}
