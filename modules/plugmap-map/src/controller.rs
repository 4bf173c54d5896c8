use std::time::Duration;

use plugmap_common::{
    build_markers, filter_available, group_by_location, popup_rows, LatLng, LocationGroup,
    MarkerView, PopupRow, Station, StationTally, StatusBook,
};
use serde::Serialize;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::event::MapEvent;

/// How long an error banner stays on screen.
pub const BANNER_TTL: Duration = Duration::from_secs(5);

const LOAD_FAILED: &str = "Failed to load available stations. Please try again later.";
const UPDATE_FAILED: &str = "Failed to update station statuses. Please try again later.";

#[derive(Debug, Clone, PartialEq)]
pub struct Banner {
    pub message: String,
    pub shown_at: Instant,
}

impl Banner {
    pub fn is_visible(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.shown_at) < BANNER_TTL
    }
}

/// Owns everything the map shows: groups, statuses, markers, the user's
/// position and the error banner.
#[derive(Debug)]
pub struct MapController {
    groups: Vec<LocationGroup>,
    statuses: StatusBook,
    visible: Vec<LocationGroup>,
    markers: Vec<MarkerView>,
    tally: StationTally,
    user_location: Option<LatLng>,
    banner: Option<Banner>,
    available_only: bool,
    loaded: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct MarkerEntry {
    #[serde(flatten)]
    pub marker: MarkerView,
    pub popup: Vec<PopupRow>,
}

/// Serializable view of the controller for a given reference location.
#[derive(Debug, Clone, Serialize)]
pub struct MapSnapshot {
    pub loaded: bool,
    pub available_only: bool,
    pub markers: Vec<MarkerEntry>,
    pub tally: StationTally,
    pub tally_label: String,
    pub banner: Option<String>,
}

impl MapController {
    pub fn new(groups: Vec<LocationGroup>) -> Self {
        Self {
            tally: StationTally::count(&groups, &StatusBook::new()),
            groups,
            statuses: StatusBook::new(),
            visible: Vec::new(),
            markers: Vec::new(),
            user_location: None,
            banner: None,
            available_only: true,
            loaded: false,
        }
    }

    pub fn from_stations(stations: &[Station]) -> Self {
        Self::new(group_by_location(stations))
    }

    pub fn apply(&mut self, event: MapEvent, now: Instant) {
        match event {
            MapEvent::StatusesFetched(statuses) => {
                self.statuses.replace_all(statuses);
                self.loaded = true;
                self.rebuild_markers();
                debug!(
                    statuses = self.statuses.len(),
                    markers = self.markers.len(),
                    "Applied status snapshot"
                );
            }
            MapEvent::StatusFetchFailed(error) => {
                warn!(error = %error, loaded = self.loaded, "Status fetch failed");
                let message = if self.loaded { UPDATE_FAILED } else { LOAD_FAILED };
                self.banner = Some(Banner {
                    message: message.to_string(),
                    shown_at: now,
                });
            }
            MapEvent::UserLocated(position) => {
                self.user_location = Some(position);
            }
            MapEvent::LocationFailed(error) => {
                warn!(error = %error, "Error watching location");
            }
            MapEvent::AvailableOnly(enabled) => {
                info!(available_only = enabled, "Marker scope changed");
                self.available_only = enabled;
                if self.loaded {
                    self.rebuild_markers();
                }
            }
        }
    }

    fn rebuild_markers(&mut self) {
        self.visible = if self.available_only {
            filter_available(&self.groups, &self.statuses)
        } else {
            self.groups.clone()
        };
        self.markers = build_markers(&self.visible, &self.statuses);
        self.tally = StationTally::count(&self.groups, &self.statuses);
    }

    pub fn groups(&self) -> &[LocationGroup] {
        &self.groups
    }

    pub fn statuses(&self) -> &StatusBook {
        &self.statuses
    }

    pub fn markers(&self) -> &[MarkerView] {
        &self.markers
    }

    pub fn tally(&self) -> StationTally {
        self.tally
    }

    pub fn user_location(&self) -> Option<LatLng> {
        self.user_location
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn available_only(&self) -> bool {
        self.available_only
    }

    /// The banner, if one was shown less than [`BANNER_TTL`] before `now`.
    pub fn banner(&self, now: Instant) -> Option<&Banner> {
        self.banner.as_ref().filter(|b| b.is_visible(now))
    }

    pub fn find_station(&self, station_id: &str) -> Option<&Station> {
        self.groups
            .iter()
            .flat_map(|g| g.stations.iter())
            .find(|s| s.station_id == station_id)
    }

    /// Popup rows for the marker at `key`, sorted against the user's position.
    pub fn popup(&self, key: &str) -> Option<Vec<PopupRow>> {
        self.popup_from(key, self.user_location)
    }

    pub fn popup_from(&self, key: &str, reference: Option<LatLng>) -> Option<Vec<PopupRow>> {
        self.visible
            .iter()
            .find(|g| g.key() == key)
            .map(|g| popup_rows(g, &self.statuses, reference))
    }

    pub fn snapshot(&self, reference: Option<LatLng>, now: Instant) -> MapSnapshot {
        let reference = reference.or(self.user_location);
        let markers = self
            .visible
            .iter()
            .zip(self.markers.iter())
            .map(|(group, marker)| MarkerEntry {
                marker: marker.clone(),
                popup: popup_rows(group, &self.statuses, reference),
            })
            .collect();

        MapSnapshot {
            loaded: self.loaded,
            available_only: self.available_only,
            markers,
            tally: self.tally,
            tally_label: self.tally.label(),
            banner: self.banner(now).map(|b| b.message.clone()),
        }
    }
}
