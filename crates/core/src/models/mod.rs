//! Shared domain models.

use serde::{Deserialize, Serialize};

/// Identifier of a station as handed out by the storage layer.
pub type StationId = i64;
/// Identifier of a line.
pub type LineId = i64;
/// Surrogate identifier of a persisted section row.
pub type SectionId = i64;

/// Line metadata relevant to fare computation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Line {
    /// Line identifier.
    pub id: LineId,
    /// Human-readable line name (e.g. `2호선`).
    pub name: String,
    /// Surcharge applied when a path rides this line.
    #[serde(default)]
    pub extra_fare: i64,
}

impl Line {
    /// Create a line record.
    pub fn new(id: LineId, name: impl Into<String>, extra_fare: i64) -> Self {
        Self {
            id,
            name: name.into(),
            extra_fare,
        }
    }
}

/// Parameters of a path query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathRequest {
    /// Departure station.
    pub source: StationId,
    /// Arrival station.
    pub target: StationId,
    /// Rider age in years.
    pub age: u32,
}

/// Result of a path query: stations ridden, total distance and fare.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathFare {
    /// Station ids from source to target, inclusive.
    pub stations: Vec<StationId>,
    /// Total distance of the path.
    pub distance: i64,
    /// Fare after surcharge and age discount.
    pub fare: i64,
}
