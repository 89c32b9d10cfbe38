//! Timetable loading.
//!
//! A timetable file is a JSON array of leg objects:
//!
//! ```json
//! [
//!   {
//!     "id": "R1",
//!     "origin": "Amsterdam",
//!     "destination": "Berlin",
//!     "departure": "08:00",
//!     "arrival": "14:10",
//!     "carrier": "Express",
//!     "days": "Mon-Fri",
//!     "fare_a": 120.0,
//!     "fare_b": 65.5
//!   }
//! ]
//! ```
//!
//! Every record is validated before it reaches the planner. Loading fails
//! on the first bad record rather than silently dropping it.

use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::{DomainError, LegRecord, RawLeg};
use crate::planner::RouteIndex;

/// Errors that can occur when loading a timetable.
#[derive(Debug, thiserror::Error)]
pub enum TimetableError {
    /// Reading the file failed
    #[error("failed to read timetable: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not a valid JSON leg list
    #[error("invalid timetable JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A record failed validation
    #[error("record {index} ({id:?}) rejected: {source}")]
    InvalidRecord {
        index: usize,
        id: String,
        #[source]
        source: DomainError,
    },

    /// Two records share an id
    #[error("duplicate leg id {0:?}")]
    DuplicateId(String),
}

/// A validated, immutable leg catalog.
#[derive(Debug, Clone, Default)]
pub struct Timetable {
    legs: Vec<Arc<LegRecord>>,
}

impl Timetable {
    /// Build a timetable from already-validated legs, rejecting duplicate ids.
    pub fn from_legs(legs: Vec<LegRecord>) -> Result<Self, TimetableError> {
        let mut seen = HashSet::with_capacity(legs.len());
        for leg in &legs {
            if !seen.insert(leg.id()) {
                warn!(id = leg.id(), "duplicate leg id");
                return Err(TimetableError::DuplicateId(leg.id().to_string()));
            }
        }

        Ok(Self {
            legs: legs.into_iter().map(Arc::new).collect(),
        })
    }

    /// Validate raw records in order.
    pub fn from_raw(raw: Vec<RawLeg>) -> Result<Self, TimetableError> {
        let legs = raw
            .into_iter()
            .enumerate()
            .map(|(index, record)| {
                let id = record.id.clone();
                LegRecord::try_from(record).map_err(|source| {
                    warn!(index, id = %id, error = %source, "rejected timetable record");
                    TimetableError::InvalidRecord { index, id, source }
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Self::from_legs(legs)
    }

    /// Parse a timetable from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self, TimetableError> {
        let raw: Vec<RawLeg> = serde_json::from_str(json)?;
        Self::from_raw(raw)
    }

    /// Read and parse a timetable file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TimetableError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        let timetable = Self::from_json_str(&json)?;
        info!(path = %path.display(), legs = timetable.len(), "loaded timetable");
        Ok(timetable)
    }

    /// Serialize the catalog back to pretty JSON.
    pub fn to_json_string(&self) -> Result<String, TimetableError> {
        let records: Vec<&LegRecord> = self.legs.iter().map(|l| l.as_ref()).collect();
        Ok(serde_json::to_string_pretty(&records)?)
    }

    /// All legs in file order.
    pub fn legs(&self) -> &[Arc<LegRecord>] {
        &self.legs
    }

    /// Look up a leg by id.
    pub fn get(&self, id: &str) -> Option<&Arc<LegRecord>> {
        self.legs.iter().find(|l| l.id() == id)
    }

    pub fn len(&self) -> usize {
        self.legs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.legs.is_empty()
    }

    /// Build the adjacency index for connection search.
    pub fn route_index(&self) -> RouteIndex {
        RouteIndex::build(&self.legs)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::domain::OperatingDays;

    const SAMPLE: &str = r#"[
        {"id": "R1", "origin": "Amsterdam", "destination": "Berlin",
         "departure": "08:00", "arrival": "14:10", "carrier": "Express",
         "days": "Mon-Fri", "fare_a": 120.0, "fare_b": 65.5},
        {"id": "R2", "origin": "Berlin", "destination": "Prague",
         "departure": "15:00", "arrival": "19:30", "carrier": "Regional",
         "days": "Daily", "fare_a": 60, "fare_b": 30}
    ]"#;

    #[test]
    fn parses_sample() {
        let tt = Timetable::from_json_str(SAMPLE).unwrap();

        assert_eq!(tt.len(), 2);
        let r2 = tt.get("R2").unwrap();
        assert_eq!(r2.days(), OperatingDays::DAILY);
        assert_eq!(r2.fare_b().amount(), 30.0);
        assert!(tt.get("R3").is_none());
    }

    #[test]
    fn builds_route_index() {
        let tt = Timetable::from_json_str(SAMPLE).unwrap();
        let index = tt.route_index();

        assert_eq!(index.leg_count(), 2);
        assert_eq!(index.legs_from("berlin")[0].id(), "R2");
    }

    #[test]
    fn empty_list() {
        let tt = Timetable::from_json_str("[]").unwrap();
        assert!(tt.is_empty());
    }

    #[test]
    fn rejects_malformed_json() {
        let err = Timetable::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, TimetableError::Json(_)));
    }

    #[test]
    fn rejects_bad_clock() {
        let json = SAMPLE.replace("\"14:10\"", "\"25:10\"");
        let err = Timetable::from_json_str(&json).unwrap_err();
        assert!(matches!(err, TimetableError::Json(_)));
    }

    #[test]
    fn rejects_unknown_day() {
        let json = SAMPLE.replace("\"Mon-Fri\"", "\"Mon-Funday\"");
        assert!(Timetable::from_json_str(&json).is_err());
    }

    #[test]
    fn rejects_invalid_record_with_index() {
        let json = SAMPLE.replace("\"Regional\"", "\"  \"");
        let err = Timetable::from_json_str(&json).unwrap_err();

        match err {
            TimetableError::InvalidRecord { index, id, .. } => {
                assert_eq!(index, 1);
                assert_eq!(id, "R2");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn rejects_duplicate_ids() {
        let json = SAMPLE.replace("\"R2\"", "\"R1\"");
        let err = Timetable::from_json_str(&json).unwrap_err();
        assert!(matches!(err, TimetableError::DuplicateId(id) if id == "R1"));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let tt = Timetable::load(file.path()).unwrap();
        assert_eq!(tt.len(), 2);
    }

    #[test]
    fn load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Timetable::load(dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, TimetableError::Io(_)));
    }

    #[test]
    fn json_round_trip_through_file() {
        let tt = Timetable::from_json_str(SAMPLE).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("timetable.json");
        fs::write(&path, tt.to_json_string().unwrap()).unwrap();

        let reloaded = Timetable::load(&path).unwrap();
        let ids: Vec<&str> = reloaded.legs().iter().map(|l| l.id()).collect();
        assert_eq!(ids, vec!["R1", "R2"]);
        assert_eq!(reloaded.get("R1").unwrap().days(), tt.get("R1").unwrap().days());
    }
}
