use std::{
    collections::HashMap,
    fs::{self, File},
    io::{BufWriter, Read, Write},
    path::Path,
};

use log::{error, info, warn};
use serde::{Deserialize, Serialize};

use crate::{
    action::ActionValues,
    error::LoadError,
    grid::{Cell, Grid},
};

/// One row of the serialized table
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PolicyEntry {
    pub x: i32,
    pub y: i32,
    #[serde(rename = "qValues")]
    pub q_values: ActionValues,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct PolicyData {
    rows: Vec<PolicyEntry>,
}

/// A table key that does not fit the grid it is replayed on
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mismatch {
    OutOfBounds(Cell),
    OnObstacle(Cell),
}

/// Immutable mapping from grid cell to the action values learned for it
///
/// Built once from a trained Q-table export; every lookup afterwards is read-only.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PolicyTable {
    entries: HashMap<Cell, ActionValues>,
}

impl PolicyTable {
    /// An empty table, on which every lookup fails
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from entries; a repeated cell keeps its last values
    pub fn from_entries(entries: impl IntoIterator<Item = PolicyEntry>) -> Self {
        let entries = entries
            .into_iter()
            .map(|e| (Cell::new(e.x, e.y), e.q_values))
            .collect();
        Self { entries }
    }

    /// Parse the `{"rows": [{"x", "y", "qValues"}]}` export format
    pub fn from_reader(reader: impl Read) -> Result<Self, LoadError> {
        let data: PolicyData = serde_json::from_reader(reader)?;
        Ok(Self::from_entries(data.rows))
    }

    pub fn try_load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| LoadError::io(path, e))?;
        let data: PolicyData =
            serde_json::from_str(&text).map_err(|e| LoadError::parse(path, e))?;
        Ok(Self::from_entries(data.rows))
    }

    /// Load a table, falling back to an empty one if the source is missing or malformed
    ///
    /// The fallback is logged as an error; an agent replaying an empty table halts on its
    /// first step.
    pub fn load(path: impl AsRef<Path>) -> Self {
        match Self::try_load(path) {
            Ok(table) => {
                info!("loaded policy table with {} states", table.len());
                table
            }
            Err(e) => {
                error!("{e}; continuing with an empty policy table");
                Self::empty()
            }
        }
    }

    pub fn lookup(&self, cell: Cell) -> Option<&ActionValues> {
        self.entries.get(&cell)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Cell, &ActionValues)> {
        self.entries.iter().map(|(&cell, values)| (cell, values))
    }

    /// Rows sorted by cell so exports are reproducible
    pub fn to_entries(&self) -> Vec<PolicyEntry> {
        let mut rows = self
            .iter()
            .map(|(cell, values)| PolicyEntry {
                x: cell.x,
                y: cell.y,
                q_values: *values,
            })
            .collect::<Vec<_>>();
        rows.sort_by_key(|e| (e.x, e.y));
        rows
    }

    pub fn to_writer(&self, writer: impl Write) -> Result<(), serde_json::Error> {
        let data = PolicyData {
            rows: self.to_entries(),
        };
        serde_json::to_writer_pretty(writer, &data)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), LoadError> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| LoadError::io(path, e))?;
        let mut writer = BufWriter::new(file);
        self.to_writer(&mut writer)
            .map_err(|e| LoadError::encode(path, e))?;
        writer.flush().map_err(|e| LoadError::io(path, e))
    }

    /// Check that every key is an in-bounds, unblocked cell of `grid`
    ///
    /// Mismatches are logged as warnings and returned; the table itself is untouched.
    pub fn validate(&self, grid: &Grid) -> Vec<Mismatch> {
        let mut mismatches = self
            .entries
            .keys()
            .filter_map(|&cell| {
                if !grid.in_bounds(cell) {
                    Some(Mismatch::OutOfBounds(cell))
                } else if grid.is_obstacle(cell) {
                    Some(Mismatch::OnObstacle(cell))
                } else {
                    None
                }
            })
            .collect::<Vec<_>>();
        mismatches.sort_by_key(|m| match *m {
            Mismatch::OutOfBounds(c) | Mismatch::OnObstacle(c) => c,
        });

        for m in &mismatches {
            match m {
                Mismatch::OutOfBounds(c) => warn!("policy state {c} lies outside the grid"),
                Mismatch::OnObstacle(c) => warn!("policy state {c} is an obstacle"),
            }
        }

        mismatches
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    const SAMPLE: &str = r#"{
        "rows": [
            { "x": 0, "y": 0, "qValues": [1.0, -2.5, 0.0, 3.25] },
            { "x": 1, "y": 0, "qValues": [0.5, 0.5, 0.5, 0.5] },
            { "x": -1, "y": 12, "qValues": [0.0, 0.0, 0.0, 0.0] }
        ]
    }"#;

    fn write_tmp(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    fn entry(x: i32, y: i32, q_values: ActionValues) -> PolicyEntry {
        PolicyEntry { x, y, q_values }
    }

    #[test]
    fn lookup_returns_stored_values() {
        let table = PolicyTable::from_reader(SAMPLE.as_bytes()).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.lookup(Cell::new(0, 0)), Some(&[1.0, -2.5, 0.0, 3.25]));
        assert_eq!(table.lookup(Cell::new(-1, 12)), Some(&[0.0; 4]));
        assert_eq!(table.lookup(Cell::new(5, 5)), None);
    }

    #[test]
    fn duplicates_last_write_wins() {
        let table = PolicyTable::from_entries([
            entry(2, 3, [1.0, 0.0, 0.0, 0.0]),
            entry(4, 4, [0.0; 4]),
            entry(2, 3, [0.0, 0.0, 0.0, 9.0]),
        ]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.lookup(Cell::new(2, 3)), Some(&[0.0, 0.0, 0.0, 9.0]));
    }

    #[test]
    fn load_is_idempotent() {
        let file = write_tmp(SAMPLE);
        let a = PolicyTable::load(file.path());
        let b = PolicyTable::load(file.path());
        assert!(!a.is_empty());
        for (cell, values) in a.iter() {
            assert_eq!(b.lookup(cell), Some(values));
        }
        assert_eq!(a, b);
    }

    #[test]
    fn missing_source_yields_empty_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("q_table_unity.json");
        assert!(matches!(
            PolicyTable::try_load(&path),
            Err(LoadError::Io { .. })
        ));

        let table = PolicyTable::load(&path);
        assert!(table.is_empty());
        assert_eq!(table.lookup(Cell::new(0, 0)), None);
    }

    #[test]
    fn malformed_source_yields_empty_table() {
        let file = write_tmp("{ \"rows\": [ { \"x\": 0, \"y\": 0 ");
        assert!(matches!(
            PolicyTable::try_load(file.path()),
            Err(LoadError::Parse { .. })
        ));
        assert!(PolicyTable::load(file.path()).is_empty());
    }

    #[test]
    fn reader_errors_share_load_error() {
        let err = PolicyTable::from_reader(r#"{"rows": [{"x": 1}]}"#.as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::Decode(_)));
    }

    #[test]
    fn wrong_value_count_rejects_source() {
        let file = write_tmp(r#"{"rows": [{"x": 0, "y": 0, "qValues": [1.0, 2.0, 3.0]}]}"#);
        assert!(PolicyTable::load(file.path()).is_empty());
    }

    #[test]
    fn save_then_load() {
        let table = PolicyTable::from_reader(SAMPLE.as_bytes()).unwrap();
        let file = NamedTempFile::new().unwrap();
        table.save(file.path()).unwrap();
        assert_eq!(PolicyTable::load(file.path()), table);
    }

    #[test]
    fn export_is_sorted() {
        let table = PolicyTable::from_entries([
            entry(3, 0, [0.0; 4]),
            entry(0, 2, [0.0; 4]),
            entry(0, 1, [0.0; 4]),
        ]);
        let cells = table
            .to_entries()
            .iter()
            .map(|e| (e.x, e.y))
            .collect::<Vec<_>>();
        assert_eq!(cells, [(0, 1), (0, 2), (3, 0)]);
    }

    #[test]
    fn validate_reports_mismatches() {
        let grid = Grid::default();
        let table = PolicyTable::from_entries([
            entry(0, 0, [0.0; 4]),
            entry(0, 1, [0.0; 4]),
            entry(11, 3, [0.0; 4]),
        ]);
        assert_eq!(
            table.validate(&grid),
            [
                Mismatch::OnObstacle(Cell::new(0, 1)),
                Mismatch::OutOfBounds(Cell::new(11, 3)),
            ]
        );
        assert_eq!(table.len(), 3, "validation leaves the table alone");
    }
}
