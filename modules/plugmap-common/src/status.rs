use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::grouping::LocationGroup;
use crate::types::{PlugStatus, StationStatus};

/// Response envelope of the status endpoint. A missing or null `data` field
/// reads as an empty list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatusEnvelope {
    #[serde(default)]
    pub data: Option<Vec<StationStatus>>,
}

impl StatusEnvelope {
    pub fn new(data: Vec<StationStatus>) -> Self {
        Self { data: Some(data) }
    }

    pub fn into_statuses(self) -> Vec<StationStatus> {
        self.data.unwrap_or_default()
    }
}

/// Latest known status per station id.
#[derive(Debug, Clone, Default)]
pub struct StatusBook {
    statuses: HashMap<String, StationStatus>,
}

impl StatusBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_statuses(statuses: Vec<StationStatus>) -> Self {
        let mut book = Self::new();
        book.replace_all(statuses);
        book
    }

    /// Discard everything and load the given snapshot. A repeated id keeps
    /// its last entry.
    pub fn replace_all(&mut self, statuses: Vec<StationStatus>) {
        self.statuses = statuses
            .into_iter()
            .map(|s| (s.station_id.clone(), s))
            .collect();
    }

    pub fn get(&self, station_id: &str) -> Option<&StationStatus> {
        self.statuses.get(station_id)
    }

    pub fn resolve(&self, station_id: &str) -> PlugStatus {
        self.get(station_id)
            .map(StationStatus::availability)
            .unwrap_or(PlugStatus::Unknown)
    }

    pub fn is_available(&self, station_id: &str) -> bool {
        self.resolve(station_id).is_available()
    }

    pub fn available_count(&self, group: &LocationGroup) -> usize {
        group
            .stations
            .iter()
            .filter(|s| self.is_available(&s.station_id))
            .count()
    }

    pub fn len(&self) -> usize {
        self.statuses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statuses.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StationStatus> {
        self.statuses.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grouping::tests::station;

    fn group(ids: &[&str]) -> LocationGroup {
        LocationGroup {
            latitude: 34.0,
            longitude: -118.0,
            stations: ids.iter().map(|id| station(id, 34.0, -118.0)).collect(),
        }
    }

    #[test]
    fn available_count_ignores_missing_stations() {
        let book = StatusBook::from_statuses(vec![StationStatus::new("A", "Available")]);
        assert_eq!(book.available_count(&group(&["A", "B"])), 1);
    }

    #[test]
    fn absent_station_is_unknown() {
        let book = StatusBook::new();
        assert_eq!(book.resolve("nope"), PlugStatus::Unknown);
    }

    #[test]
    fn replace_all_drops_previous_entries() {
        let mut book = StatusBook::from_statuses(vec![
            StationStatus::new("A", "Available"),
            StationStatus::new("B", "Available"),
        ]);
        book.replace_all(vec![StationStatus::new("B", "Unavailable")]);

        assert_eq!(book.len(), 1);
        assert_eq!(book.resolve("A"), PlugStatus::Unknown);
        assert_eq!(book.resolve("B"), PlugStatus::Unavailable);
    }

    #[test]
    fn duplicate_ids_keep_last_entry() {
        let book = StatusBook::from_statuses(vec![
            StationStatus::new("A", "Unavailable"),
            StationStatus::new("A", "available"),
        ]);
        assert_eq!(book.len(), 1);
        assert!(book.is_available("A"));
    }

    #[test]
    fn envelope_without_data_is_empty() {
        let env: StatusEnvelope = serde_json::from_str("{}").unwrap();
        assert!(env.into_statuses().is_empty());

        let env: StatusEnvelope = serde_json::from_str(r#"{"data":null}"#).unwrap();
        assert!(env.into_statuses().is_empty());
    }

    #[test]
    fn envelope_reads_status_entries() {
        let raw = r#"{"data":[{"station_id":"A","plug_status":"Available"},{"station_id":"B","plug_status":"Unavailable","connector":"CCS"}]}"#;
        let env: StatusEnvelope = serde_json::from_str(raw).unwrap();
        let book = StatusBook::from_statuses(env.into_statuses());
        assert_eq!(book.resolve("A"), PlugStatus::Available);
        assert_eq!(book.get("B").unwrap().extra["connector"], "CCS");
    }
}
