use plugmap_common::{LatLng, StationStatus};

/// Everything that can change map state.
#[derive(Debug, Clone, PartialEq)]
pub enum MapEvent {
    /// A poll completed; the list replaces all known statuses.
    StatusesFetched(Vec<StationStatus>),
    /// A poll failed. Known statuses stay as they were.
    StatusFetchFailed(String),
    UserLocated(LatLng),
    LocationFailed(String),
    /// Show only available stations (`true`) or every station.
    AvailableOnly(bool),
}
