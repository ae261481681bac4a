//! Shortest path over the union of every line's sections.

use std::collections::{BTreeSet, HashMap};

use petgraph::algo::astar;
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use serde::Serialize;
use tracing::debug;

use crate::{
    error::{Result, SubwayError},
    models::{LineId, StationId},
    section::Section,
};

/// Edge payload: the section's length and the line it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackEdge {
    /// Section length.
    pub distance: i64,
    /// Line owning the section.
    pub line_id: LineId,
}

/// Outcome of a shortest path query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShortestPath {
    /// Stations from source to target, inclusive.
    pub stations: Vec<StationId>,
    /// Sum of the section distances along the path.
    pub distance: i64,
    /// Distinct lines ridden, ascending.
    pub line_ids: Vec<LineId>,
}

/// Undirected station graph rebuilt for every query.
#[derive(Debug, Clone, Default)]
pub struct PathGraph {
    graph: UnGraph<StationId, TrackEdge>,
    station_to_index: HashMap<StationId, NodeIndex>,
}

impl PathGraph {
    /// One vertex per station, one edge per section across every line.
    pub fn build<'a>(sections: impl IntoIterator<Item = &'a Section>) -> Self {
        let mut path_graph = Self::default();
        for section in sections {
            let up = path_graph.add_or_get_station(section.up_station_id());
            let down = path_graph.add_or_get_station(section.down_station_id());
            path_graph.graph.add_edge(
                up,
                down,
                TrackEdge {
                    distance: section.distance(),
                    line_id: section.line_id(),
                },
            );
        }
        debug!(
            stations = path_graph.station_count(),
            sections = path_graph.section_count(),
            "Path graph built"
        );
        path_graph
    }

    fn add_or_get_station(&mut self, station: StationId) -> NodeIndex {
        if let Some(&index) = self.station_to_index.get(&station) {
            index
        } else {
            let index = self.graph.add_node(station);
            self.station_to_index.insert(station, index);
            index
        }
    }

    /// Number of distinct stations.
    pub fn station_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of sections, parallel ones included.
    pub fn section_count(&self) -> usize {
        self.graph.edge_count()
    }

    fn index_of(&self, station: StationId) -> Result<NodeIndex> {
        self.station_to_index
            .get(&station)
            .copied()
            .ok_or(SubwayError::StationNotRegistered { station })
    }

    /// Minimum-distance path between two registered stations.
    ///
    /// A query from a station to itself yields `[source]` at distance 0 without
    /// running the search.
    pub fn shortest_path(&self, source: StationId, target: StationId) -> Result<ShortestPath> {
        let start = self.index_of(source)?;
        let goal = self.index_of(target)?;
        if start == goal {
            return Ok(ShortestPath {
                stations: vec![source],
                distance: 0,
                line_ids: Vec::new(),
            });
        }

        // A zero heuristic turns A* into Dijkstra while keeping the path.
        let (distance, nodes) = astar(
            &self.graph,
            start,
            |node| node == goal,
            |edge| edge.weight().distance,
            |_| 0,
        )
        .ok_or(SubwayError::NoPath {
            departure: source,
            arrival: target,
        })?;

        let line_ids = self.lines_along(&nodes);
        let stations: Vec<StationId> = nodes.iter().map(|&node| self.graph[node]).collect();
        debug!(source, target, distance, hops = stations.len() - 1, "Shortest path found");
        Ok(ShortestPath {
            stations,
            distance,
            line_ids,
        })
    }

    /// Lines of the edges used between consecutive stations.
    ///
    /// Parallel edges from different lines resolve to the shortest one, which
    /// is the edge the search actually relaxed.
    fn lines_along(&self, nodes: &[NodeIndex]) -> Vec<LineId> {
        let lines: BTreeSet<LineId> = nodes
            .windows(2)
            .filter_map(|pair| {
                self.graph
                    .edges_connecting(pair[0], pair[1])
                    .min_by_key(|edge| edge.weight().distance)
                    .map(|edge| edge.weight().line_id)
            })
            .collect();
        lines.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn section(line: LineId, up: StationId, down: StationId, distance: i64) -> Section {
        Section::new(line, up, down, distance).expect("valid section")
    }

    fn sample_network() -> Vec<Section> {
        vec![section(1, 1, 2, 2), section(1, 2, 3, 3), section(2, 2, 4, 4)]
    }

    #[test]
    fn finds_path_across_lines() -> Result<()> {
        let graph = PathGraph::build(&sample_network());
        let path = graph.shortest_path(1, 4)?;
        assert_eq!(path.stations, vec![1, 2, 4]);
        assert_eq!(path.distance, 6);
        assert_eq!(path.line_ids, vec![1, 2]);
        Ok(())
    }

    #[test]
    fn travels_against_section_direction() -> Result<()> {
        let graph = PathGraph::build(&sample_network());
        let path = graph.shortest_path(4, 1)?;
        assert_eq!(path.stations, vec![4, 2, 1]);
        assert_eq!(path.distance, 6);
        Ok(())
    }

    #[test]
    fn prefers_shorter_detour() -> Result<()> {
        let sections = vec![
            section(1, 1, 2, 10),
            section(1, 2, 3, 10),
            section(2, 1, 4, 3),
            section(2, 4, 3, 4),
        ];
        let path = PathGraph::build(&sections).shortest_path(1, 3)?;
        assert_eq!(path.stations, vec![1, 4, 3]);
        assert_eq!(path.distance, 7);
        assert_eq!(path.line_ids, vec![2]);
        Ok(())
    }

    #[test]
    fn parallel_sections_use_shorter_line() -> Result<()> {
        let sections = vec![section(1, 1, 2, 9), section(2, 1, 2, 4)];
        let path = PathGraph::build(&sections).shortest_path(1, 2)?;
        assert_eq!(path.distance, 4);
        assert_eq!(path.line_ids, vec![2]);
        Ok(())
    }

    #[test]
    fn same_station_is_zero_length() -> Result<()> {
        let path = PathGraph::build(&sample_network()).shortest_path(3, 3)?;
        assert_eq!(path.stations, vec![3]);
        assert_eq!(path.distance, 0);
        assert!(path.line_ids.is_empty());
        Ok(())
    }

    #[test]
    fn unknown_station_is_not_registered() {
        let graph = PathGraph::build(&sample_network());
        assert_eq!(
            graph.shortest_path(1, 5),
            Err(SubwayError::StationNotRegistered { station: 5 })
        );
        assert_eq!(
            graph.shortest_path(5, 1),
            Err(SubwayError::StationNotRegistered { station: 5 })
        );
    }

    #[test]
    fn disconnected_components_have_no_path() {
        let sections = vec![
            section(1, 1, 2, 2),
            section(1, 2, 3, 3),
            section(2, 5, 4, 4),
        ];
        assert_eq!(
            PathGraph::build(&sections).shortest_path(1, 5),
            Err(SubwayError::NoPath {
                departure: 1,
                arrival: 5
            })
        );
    }

    proptest! {
        // Two lines between the same termini; the path never exceeds either one.
        #[test]
        fn path_is_never_longer_than_either_line(
            first in prop::collection::vec(1i64..50, 1..6),
            second in prop::collection::vec(1i64..50, 1..6)
        ) {
            let mut sections = Vec::new();
            let mut chain = |line: LineId, offset: StationId, distances: &[i64]| {
                let mut previous = 1;
                for (index, &distance) in distances.iter().enumerate() {
                    let next = if index + 1 == distances.len() { 2 } else { offset + index as StationId };
                    sections.push(section(line, previous, next, distance));
                    previous = next;
                }
            };
            chain(1, 100, &first);
            chain(2, 200, &second);

            let path = PathGraph::build(&sections).shortest_path(1, 2).expect("path");
            let first_total: i64 = first.iter().sum();
            let second_total: i64 = second.iter().sum();
            prop_assert_eq!(path.distance, first_total.min(second_total));
            let walked: i64 = path
                .stations
                .windows(2)
                .map(|pair| {
                    sections
                        .iter()
                        .filter(|s| s.contains(pair[0]) && s.contains(pair[1]))
                        .map(Section::distance)
                        .min()
                        .expect("edge")
                })
                .sum();
            prop_assert_eq!(walked, path.distance);
        }
    }
}
