#![allow(missing_docs)]

use serde::Serialize;

use crate::{
    error::{Result, SubwayError},
    models::{LineId, SectionId, StationId},
};

/// One edge of track between two adjacent stations of a line.
///
/// Sections are validated on construction and never mutated; `split` and
/// `merge` hand back fresh values without a surrogate id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Section {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<SectionId>,
    line_id: LineId,
    up_station_id: StationId,
    down_station_id: StationId,
    distance: i64,
}

impl Section {
    /// Build a transient section.
    pub fn new(
        line_id: LineId,
        up_station_id: StationId,
        down_station_id: StationId,
        distance: i64,
    ) -> Result<Self> {
        if up_station_id == down_station_id {
            return Err(SubwayError::InvalidEndpoints {
                station: up_station_id,
            });
        }
        if distance < 1 {
            return Err(SubwayError::InvalidDistance { distance });
        }
        Ok(Self {
            id: None,
            line_id,
            up_station_id,
            down_station_id,
            distance,
        })
    }

    /// Build a section that mirrors a stored row.
    pub fn with_id(
        id: SectionId,
        line_id: LineId,
        up_station_id: StationId,
        down_station_id: StationId,
        distance: i64,
    ) -> Result<Self> {
        let mut section = Self::new(line_id, up_station_id, down_station_id, distance)?;
        section.id = Some(id);
        Ok(section)
    }

    pub fn id(&self) -> Option<SectionId> {
        self.id
    }

    pub fn line_id(&self) -> LineId {
        self.line_id
    }

    pub fn up_station_id(&self) -> StationId {
        self.up_station_id
    }

    pub fn down_station_id(&self) -> StationId {
        self.down_station_id
    }

    pub fn distance(&self) -> i64 {
        self.distance
    }

    /// Whether the station is either endpoint.
    pub fn contains(&self, station: StationId) -> bool {
        self.up_station_id == station || self.down_station_id == station
    }

    pub fn has_up(&self, station: StationId) -> bool {
        self.up_station_id == station
    }

    pub fn has_down(&self, station: StationId) -> bool {
        self.down_station_id == station
    }

    /// Replace this section by two, inserting the far endpoint of `new` as the joint.
    ///
    /// `new` must share exactly the up station or exactly the down station and be
    /// strictly shorter than `self`. The halves always sum to `self.distance()`.
    pub fn split(&self, new: &Section) -> Result<[Section; 2]> {
        let same_up = self.has_up(new.up_station_id);
        let same_down = self.has_down(new.down_station_id);
        if same_up && same_down {
            return Err(SubwayError::BothEndpointsAlreadyPresent {
                line: self.line_id,
                up: new.up_station_id,
                down: new.down_station_id,
            });
        }
        if !same_up && !same_down {
            return Err(SubwayError::NoMatchingEndpoint {
                line: self.line_id,
                up: new.up_station_id,
                down: new.down_station_id,
            });
        }
        if new.distance >= self.distance {
            return Err(SubwayError::DistanceTooLarge {
                existing: self.distance,
                requested: new.distance,
            });
        }

        let remainder = self.distance - new.distance;
        if same_up {
            Ok([
                Section::new(
                    self.line_id,
                    self.up_station_id,
                    new.down_station_id,
                    new.distance,
                )?,
                Section::new(
                    self.line_id,
                    new.down_station_id,
                    self.down_station_id,
                    remainder,
                )?,
            ])
        } else {
            Ok([
                Section::new(
                    self.line_id,
                    self.up_station_id,
                    new.up_station_id,
                    remainder,
                )?,
                Section::new(
                    self.line_id,
                    new.up_station_id,
                    self.down_station_id,
                    new.distance,
                )?,
            ])
        }
    }

    /// Join two adjacent sections of the same line, dropping the shared station.
    pub fn merge(&self, other: &Section) -> Result<Section> {
        let distance = self.distance + other.distance;
        if self.line_id == other.line_id {
            if self.down_station_id == other.up_station_id {
                return Section::new(
                    self.line_id,
                    self.up_station_id,
                    other.down_station_id,
                    distance,
                );
            }
            if other.down_station_id == self.up_station_id {
                return Section::new(
                    self.line_id,
                    other.up_station_id,
                    self.down_station_id,
                    distance,
                );
            }
        }
        Err(SubwayError::NotAdjacent {
            first: (self.up_station_id, self.down_station_id),
            second: (other.up_station_id, other.down_station_id),
        })
    }
}
