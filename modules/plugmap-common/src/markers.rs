use serde::Serialize;

use crate::grouping::LocationGroup;
use crate::status::StatusBook;
use crate::types::PlugStatus;

/// Render-ready marker for one location group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerView {
    pub key: String,
    pub latitude: f64,
    pub longitude: f64,
    pub station_count: usize,
    pub available_count: usize,
    pub status: PlugStatus,
    pub icon_color: &'static str,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StationTally {
    pub total: usize,
    pub available: usize,
}

impl StationTally {
    /// Count every station in `groups` and how many of them are available.
    pub fn count(groups: &[LocationGroup], statuses: &StatusBook) -> Self {
        groups.iter().fold(Self::default(), |mut tally, group| {
            tally.total += group.stations.len();
            tally.available += statuses.available_count(group);
            tally
        })
    }

    pub fn label(&self) -> String {
        format!("{}/{} Available", self.available, self.total)
    }
}

/// Build one marker per group, recounting availability from `statuses`.
pub fn build_markers(groups: &[LocationGroup], statuses: &StatusBook) -> Vec<MarkerView> {
    groups
        .iter()
        .map(|group| {
            let available_count = statuses.available_count(group);

            let status = if available_count > 0 {
                PlugStatus::Available
            } else if group
                .stations
                .iter()
                .any(|s| statuses.resolve(&s.station_id) == PlugStatus::Unavailable)
            {
                PlugStatus::Unavailable
            } else {
                PlugStatus::Unknown
            };

            MarkerView {
                key: group.key(),
                latitude: group.latitude,
                longitude: group.longitude,
                station_count: group.stations.len(),
                available_count,
                status,
                icon_color: status.color(),
            }
        })
        .collect()
}

/// Keep only available stations, dropping groups left empty.
pub fn filter_available(groups: &[LocationGroup], statuses: &StatusBook) -> Vec<LocationGroup> {
    groups
        .iter()
        .filter_map(|group| {
            let stations: Vec<_> = group
                .stations
                .iter()
                .filter(|s| statuses.is_available(&s.station_id))
                .cloned()
                .collect();
            if stations.is_empty() {
                None
            } else {
                Some(LocationGroup {
                    latitude: group.latitude,
                    longitude: group.longitude,
                    stations,
                })
            }
        })
        .collect()
}
