use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::{
    error::{Result, SubwayError},
    models::{LineId, SectionId, StationId},
};

use super::models::Section;

/// How a candidate section attaches to a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Insertion {
    /// The candidate hangs off a terminus and lengthens the line.
    Extend,
    /// The candidate falls inside `existing`, which is split in two.
    Split {
        /// Section that gets replaced by the two halves.
        existing: Section,
    },
}

/// Rows to drop and rows to add after a topology mutation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SectionChange {
    /// Sections that no longer exist; stored rows keep their ids.
    pub removed: Vec<Section>,
    /// Sections to store; these carry no id yet.
    pub added: Vec<Section>,
}

impl SectionChange {
    /// Produce the line's section list after the change.
    pub fn apply(&self, sections: &Sections) -> Sections {
        let mut next: Vec<Section> = sections
            .iter()
            .filter(|section| !self.removed.contains(section))
            .cloned()
            .collect();
        next.extend(self.added.iter().cloned());
        Sections::new(next)
    }
}

/// All sections of a single line, in no particular order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sections {
    sections: Vec<Section>,
}

impl Sections {
    /// Wrap the sections as loaded, without checking the chain.
    pub fn new(sections: Vec<Section>) -> Self {
        Self { sections }
    }

    /// Wrap the sections and check that they form one simple chain.
    pub fn validated(sections: Vec<Section>) -> Result<Self> {
        let sections = Self::new(sections);
        if sections.is_empty() {
            return Ok(sections);
        }

        let line = sections.line_id();
        let mut ups = HashSet::with_capacity(sections.len());
        let mut downs = HashSet::with_capacity(sections.len());
        for section in &sections.sections {
            if section.line_id() != line
                || !ups.insert(section.up_station_id())
                || !downs.insert(section.down_station_id())
            {
                return Err(SubwayError::BrokenChain {
                    line,
                    station: section.up_station_id(),
                });
            }
        }

        let ordered = sections.ordered_station_ids()?;
        let distinct: HashSet<_> = ordered.iter().collect();
        if distinct.len() != ordered.len() {
            return Err(SubwayError::BrokenChain {
                line,
                station: ordered[0],
            });
        }
        Ok(sections)
    }

    /// Number of sections.
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Whether the line has no sections at all.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Iterate over the sections in load order.
    pub fn iter(&self) -> impl Iterator<Item = &Section> {
        self.sections.iter()
    }

    /// Consume the aggregate, returning the raw sections.
    pub fn into_inner(self) -> Vec<Section> {
        self.sections
    }

    /// Line the sections belong to, `0` when empty.
    pub fn line_id(&self) -> LineId {
        self.sections
            .first()
            .map(Section::line_id)
            .unwrap_or_default()
    }

    /// Surrogate ids of the stored sections.
    pub fn section_ids(&self) -> Vec<SectionId> {
        self.sections.iter().filter_map(Section::id).collect()
    }

    /// Distinct stations referenced by any section.
    pub fn station_ids(&self) -> HashSet<StationId> {
        self.sections
            .iter()
            .flat_map(|section| [section.up_station_id(), section.down_station_id()])
            .collect()
    }

    /// Stations from the up terminus to the down terminus.
    pub fn ordered_station_ids(&self) -> Result<Vec<StationId>> {
        let Some(first) = self.sections.first() else {
            return Ok(Vec::new());
        };
        let line = self.line_id();

        let downs: HashSet<StationId> = self
            .sections
            .iter()
            .map(Section::down_station_id)
            .collect();
        let mut current = self
            .sections
            .iter()
            .map(Section::up_station_id)
            .find(|station| !downs.contains(station))
            .ok_or(SubwayError::BrokenChain {
                line,
                station: first.up_station_id(),
            })?;

        let by_up: HashMap<StationId, &Section> = self
            .sections
            .iter()
            .map(|section| (section.up_station_id(), section))
            .collect();

        let mut ordered = Vec::with_capacity(self.sections.len() + 1);
        ordered.push(current);
        while ordered.len() < self.sections.len() + 1 {
            let next = by_up
                .get(&current)
                .ok_or(SubwayError::BrokenChain {
                    line,
                    station: current,
                })?
                .down_station_id();
            ordered.push(next);
            current = next;
        }
        Ok(ordered)
    }

    /// Sections with the station at either end.
    pub fn sections_touching(&self, station: StationId) -> Vec<&Section> {
        self.sections
            .iter()
            .filter(|section| section.contains(station))
            .collect()
    }

    /// Sections that disappear when the station is removed from the line.
    pub fn sections_to_remove(&self, station: StationId) -> Result<Sections> {
        let line = self.line_id();
        if self.sections.len() == 1 {
            return Err(SubwayError::MinimumSectionCountViolation { line });
        }
        let touching: Vec<Section> = self
            .sections_touching(station)
            .into_iter()
            .cloned()
            .collect();
        if touching.is_empty() {
            return Err(SubwayError::StationNotFound { line, station });
        }
        Ok(Sections::new(touching))
    }

    /// Merge the sections around a removed interior station.
    ///
    /// Returns `None` for a terminus, where the single section is simply dropped.
    pub fn merge_adjacent(&self) -> Result<Option<Section>> {
        match self.sections.as_slice() {
            [] | [_] => Ok(None),
            [first, second] => first.merge(second).map(Some),
            [first, ..] => Err(SubwayError::BrokenChain {
                line: first.line_id(),
                station: first.up_station_id(),
            }),
        }
    }

    /// Decide whether the candidate extends the line or splits a section.
    pub fn classify_insertion(&self, candidate: &Section) -> Result<Insertion> {
        if self.is_empty() {
            return Ok(Insertion::Extend);
        }

        let stations = self.station_ids();
        let up = candidate.up_station_id();
        let down = candidate.down_station_id();
        let existing = match (stations.contains(&up), stations.contains(&down)) {
            (true, true) => {
                return Err(SubwayError::BothEndpointsAlreadyPresent {
                    line: self.line_id(),
                    up,
                    down,
                })
            }
            (false, false) => {
                return Err(SubwayError::NoMatchingEndpoint {
                    line: self.line_id(),
                    up,
                    down,
                })
            }
            // No section leaves `up` only when it is the down terminus.
            (true, false) => self.sections.iter().find(|s| s.has_up(up)),
            // No section arrives at `down` only when it is the up terminus.
            (false, true) => self.sections.iter().find(|s| s.has_down(down)),
        };

        Ok(match existing {
            Some(existing) => Insertion::Split {
                existing: existing.clone(),
            },
            None => Insertion::Extend,
        })
    }

    /// Add the candidate to the line, splitting a section when needed.
    pub fn insert(&self, candidate: Section) -> Result<SectionChange> {
        match self.classify_insertion(&candidate)? {
            Insertion::Extend => Ok(SectionChange {
                removed: Vec::new(),
                added: vec![candidate],
            }),
            Insertion::Split { existing } => {
                let halves = existing.split(&candidate)?;
                Ok(SectionChange {
                    removed: vec![existing],
                    added: halves.to_vec(),
                })
            }
        }
    }

    /// Remove the station from the line, merging its neighbours when interior.
    pub fn delete_station(&self, station: StationId) -> Result<SectionChange> {
        let removing = self.sections_to_remove(station)?;
        let merged = removing.merge_adjacent()?;
        Ok(SectionChange {
            removed: removing.into_inner(),
            added: merged.into_iter().collect(),
        })
    }
}

impl<'a> IntoIterator for &'a Sections {
    type Item = &'a Section;
    type IntoIter = std::slice::Iter<'a, Section>;

    fn into_iter(self) -> Self::IntoIter {
        self.sections.iter()
    }
}
