//! Network snapshot handed over by the storage layer.

use std::{collections::HashSet, fs, path::Path};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{
    models::{Line, LineId, SectionId, StationId},
    network::SubwayNetwork,
    section::Section,
};

/// Stored section row, not yet validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionRecord {
    /// Surrogate id; absent for rows that were never stored.
    #[serde(default)]
    pub id: Option<SectionId>,
    /// Owning line.
    pub line_id: LineId,
    /// Up station.
    pub up_station_id: StationId,
    /// Down station.
    pub down_station_id: StationId,
    /// Distance between the two stations.
    pub distance: i64,
}

impl SectionRecord {
    fn to_section(&self) -> crate::error::Result<Section> {
        match self.id {
            Some(id) => Section::with_id(
                id,
                self.line_id,
                self.up_station_id,
                self.down_station_id,
                self.distance,
            ),
            None => Section::new(
                self.line_id,
                self.up_station_id,
                self.down_station_id,
                self.distance,
            ),
        }
    }
}

/// Every line and section of the network at one point in time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NetworkSnapshot {
    /// Line metadata.
    #[serde(default)]
    pub lines: Vec<Line>,
    /// Section rows across all lines.
    #[serde(default)]
    pub sections: Vec<SectionRecord>,
}

impl NetworkSnapshot {
    /// Load a snapshot from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read snapshot {}", path.display()))?;
        let snapshot = serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse snapshot {}", path.display()))?;
        Ok(snapshot)
    }

    /// Validate the rows and build the in-memory network.
    ///
    /// Sections of unknown lines are skipped with a warning; any other invalid
    /// row aborts the conversion.
    pub fn into_network(self) -> Result<SubwayNetwork> {
        let mut line_ids = HashSet::with_capacity(self.lines.len());
        for line in &self.lines {
            if !line_ids.insert(line.id) {
                bail!("line {} is listed twice", line.id);
            }
            if line.extra_fare < 0 {
                bail!("line {} has a negative extra fare {}", line.id, line.extra_fare);
            }
        }

        let mut sections = Vec::with_capacity(self.sections.len());
        for (row, record) in self.sections.iter().enumerate() {
            if !line_ids.contains(&record.line_id) {
                warn!(
                    row,
                    line_id = record.line_id,
                    "Skipping section of unknown line"
                );
                continue;
            }
            let section = record.to_section().with_context(|| {
                format!(
                    "invalid section row {row} (id {:?}, line {})",
                    record.id, record.line_id
                )
            })?;
            sections.push(section);
        }

        Ok(SubwayNetwork::new(self.lines, sections))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const SAMPLE: &str = r#"{
  "lines": [
    { "id": 1, "name": "2호선", "extra_fare": 0 },
    { "id": 2, "name": "3호선", "extra_fare": 500 }
  ],
  "sections": [
    { "id": 1, "line_id": 1, "up_station_id": 1, "down_station_id": 2, "distance": 2 },
    { "id": 2, "line_id": 1, "up_station_id": 2, "down_station_id": 3, "distance": 3 },
    { "id": 3, "line_id": 2, "up_station_id": 2, "down_station_id": 4, "distance": 4 },
    { "line_id": 9, "up_station_id": 7, "down_station_id": 8, "distance": 4 }
  ]
}"#;

    #[test]
    fn loads_and_converts_sample() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("network.json");
        fs::write(&path, SAMPLE)?;

        let snapshot = NetworkSnapshot::load(&path)?;
        assert_eq!(snapshot.lines.len(), 2);
        assert_eq!(snapshot.sections.len(), 4);
        assert_eq!(snapshot.sections[3].id, None);

        let network = snapshot.into_network()?;
        assert_eq!(network.sections().len(), 3);
        assert_eq!(network.lines().len(), 2);
        Ok(())
    }

    #[test]
    fn rejects_invalid_rows() {
        let snapshot = NetworkSnapshot {
            lines: vec![Line::new(1, "2호선", 0)],
            sections: vec![SectionRecord {
                id: Some(5),
                line_id: 1,
                up_station_id: 1,
                down_station_id: 1,
                distance: 3,
            }],
        };
        let err = snapshot.into_network().expect_err("same endpoints");
        assert!(err.to_string().contains("invalid section row 0"));
    }

    #[test]
    fn rejects_duplicate_lines_and_negative_fares() {
        let duplicate = NetworkSnapshot {
            lines: vec![Line::new(1, "a", 0), Line::new(1, "b", 0)],
            sections: Vec::new(),
        };
        assert!(duplicate.into_network().is_err());

        let negative = NetworkSnapshot {
            lines: vec![Line::new(1, "a", -100)],
            sections: Vec::new(),
        };
        assert!(negative.into_network().is_err());
    }

    #[test]
    fn missing_file_reports_path() {
        let err = NetworkSnapshot::load("/definitely/not/here.json").expect_err("missing");
        assert!(err.to_string().contains("/definitely/not/here.json"));
    }
}
