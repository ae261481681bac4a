use std::fs;

use anyhow::Result;
use subway_core::{
    FareCalculator, Line, NetworkSnapshot, PathRequest, Section, SubwayError, SubwayNetwork,
};
use tempfile::tempdir;

fn section(line: i64, up: i64, down: i64, distance: i64) -> Section {
    Section::new(line, up, down, distance).expect("valid section")
}

#[test]
fn inserting_on_shared_up_station_splits_section() -> Result<()> {
    let network = SubwayNetwork::new(vec![Line::new(1, "2호선", 0)], vec![section(1, 1, 2, 10)]);
    let change = network.add_section(1, 1, 3, 5)?;
    assert_eq!(change.added, vec![section(1, 1, 3, 5), section(1, 3, 2, 5)]);
    Ok(())
}

#[test]
fn deleting_interior_station_merges_sections() -> Result<()> {
    let network = SubwayNetwork::new(
        vec![Line::new(1, "2호선", 0)],
        vec![section(1, 1, 2, 10), section(1, 2, 3, 10)],
    );
    let change = network.remove_station(1, 2)?;
    let next = change.apply(&network.line_sections(1)?);
    assert_eq!(next.into_inner(), vec![section(1, 1, 3, 20)]);
    Ok(())
}

#[test]
fn shortest_path_crosses_lines() -> Result<()> {
    let network = SubwayNetwork::new(
        vec![Line::new(1, "2호선", 0), Line::new(2, "3호선", 0)],
        vec![section(1, 1, 2, 2), section(1, 2, 3, 3), section(2, 2, 4, 4)],
    );
    let result = network.find_path(
        PathRequest {
            source: 1,
            target: 4,
            age: 30,
        },
        &FareCalculator::default(),
    )?;
    assert_eq!(result.stations, vec![1, 2, 4]);
    assert_eq!(result.distance, 6);
    assert_eq!(result.fare, 1250);
    Ok(())
}

#[test]
fn split_not_shorter_than_existing_is_rejected() -> Result<()> {
    let network = SubwayNetwork::new(vec![Line::new(1, "2호선", 0)], vec![section(1, 1, 2, 10)]);
    assert_eq!(
        network.add_section(1, 1, 4, 10),
        Err(SubwayError::DistanceTooLarge {
            existing: 10,
            requested: 10
        })
    );
    // Hanging off the down terminus extends the line instead.
    let change = network.add_section(1, 2, 4, 10)?;
    assert!(change.removed.is_empty());
    Ok(())
}

#[test]
fn demo_snapshot_answers_queries() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("network.json");
    fs::write(&path, include_str!("../../../demos/network.json"))?;

    let network = NetworkSnapshot::load(&path)?.into_network()?;
    assert_eq!(network.line_stations(1)?, vec![1, 2, 3]);
    assert_eq!(network.line_stations(2)?, vec![2, 4, 6]);
    assert_eq!(network.line_stations(3)?, vec![3, 4, 5]);

    let result = network.find_path(
        PathRequest {
            source: 1,
            target: 5,
            age: 30,
        },
        &FareCalculator::default(),
    )?;
    assert_eq!(result.stations, vec![1, 2, 4, 5]);
    assert_eq!(result.distance, 16);
    assert_eq!(result.fare, 1450 + 900);
    Ok(())
}
