use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::Station;

/// Stations sharing one exact coordinate pair. Rendered as a single marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationGroup {
    pub latitude: f64,
    pub longitude: f64,
    pub stations: Vec<Station>,
}

impl LocationGroup {
    pub fn key(&self) -> String {
        location_key(self.latitude, self.longitude)
    }
}

/// Composite `"latitude,longitude"` key. Negative zero is folded into zero so
/// that keys agree with float equality.
pub fn location_key(latitude: f64, longitude: f64) -> String {
    format!("{},{}", latitude + 0.0, longitude + 0.0)
}

/// Group stations by exact coordinates. Groups appear in first-seen order and
/// keep their stations in input order.
pub fn group_by_location(stations: &[Station]) -> Vec<LocationGroup> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<LocationGroup> = Vec::new();

    for station in stations {
        let key = location_key(station.latitude, station.longitude);
        let slot = *index.entry(key).or_insert_with(|| {
            groups.push(LocationGroup {
                latitude: station.latitude,
                longitude: station.longitude,
                stations: Vec::new(),
            });
            groups.len() - 1
        });
        groups[slot].stations.push(station.clone());
    }

    groups
}
