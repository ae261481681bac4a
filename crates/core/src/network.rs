//! Queries over a materialised network snapshot.

use tracing::info;

use crate::{
    error::{Result, SubwayError},
    fare::FareCalculator,
    models::{Line, LineId, PathFare, PathRequest, StationId},
    path::PathGraph,
    section::{Section, SectionChange, Sections},
};

/// All lines and sections, as loaded by the storage layer.
#[derive(Debug, Clone, Default)]
pub struct SubwayNetwork {
    lines: Vec<Line>,
    sections: Vec<Section>,
}

impl SubwayNetwork {
    /// Wrap already validated lines and sections.
    pub fn new(lines: Vec<Line>, sections: Vec<Section>) -> Self {
        Self { lines, sections }
    }

    /// Line metadata.
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Every section of every line.
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Look up a line by id.
    pub fn line(&self, line_id: LineId) -> Result<&Line> {
        self.lines
            .iter()
            .find(|line| line.id == line_id)
            .ok_or(SubwayError::LineNotRegistered { line: line_id })
    }

    /// Sections of one line, checked to form a single chain.
    pub fn line_sections(&self, line_id: LineId) -> Result<Sections> {
        self.line(line_id)?;
        Sections::validated(
            self.sections
                .iter()
                .filter(|section| section.line_id() == line_id)
                .cloned()
                .collect(),
        )
    }

    /// Stations of one line, up terminus first.
    pub fn line_stations(&self, line_id: LineId) -> Result<Vec<StationId>> {
        self.line_sections(line_id)?.ordered_station_ids()
    }

    /// Shortest path between two stations with its fare.
    pub fn find_path(&self, request: PathRequest, fares: &FareCalculator) -> Result<PathFare> {
        let graph = PathGraph::build(&self.sections);
        let path = graph.shortest_path(request.source, request.target)?;
        let fare = fares.calculate(path.distance, request.age, &path.line_ids, &self.lines)?;
        info!(
            source = request.source,
            target = request.target,
            age = request.age,
            distance = path.distance,
            lines = ?path.line_ids,
            fare,
            "Path fare computed"
        );
        Ok(PathFare {
            stations: path.stations,
            distance: path.distance,
            fare,
        })
    }

    /// Add a section to a line, splitting the section it falls inside.
    pub fn add_section(
        &self,
        line_id: LineId,
        up_station_id: StationId,
        down_station_id: StationId,
        distance: i64,
    ) -> Result<SectionChange> {
        let sections = self.line_sections(line_id)?;
        let candidate = Section::new(line_id, up_station_id, down_station_id, distance)?;
        let change = sections.insert(candidate)?;
        info!(
            line_id,
            up_station_id,
            down_station_id,
            distance,
            removed = change.removed.len(),
            added = change.added.len(),
            "Section added"
        );
        Ok(change)
    }

    /// Remove a station from a line, merging the sections around it.
    pub fn remove_station(&self, line_id: LineId, station_id: StationId) -> Result<SectionChange> {
        let sections = self.line_sections(line_id)?;
        let change = sections.delete_station(station_id)?;
        info!(
            line_id,
            station_id,
            removed = change.removed.len(),
            added = change.added.len(),
            "Station removed"
        );
        Ok(change)
    }
}
