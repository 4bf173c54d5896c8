pub mod types;
pub mod grouping;
pub mod status;
pub mod popup;
pub mod markers;
pub mod stations;
pub mod config;
pub mod error;

pub use types::*;
pub use grouping::{group_by_location, location_key, LocationGroup};
pub use status::{StatusBook, StatusEnvelope};
pub use popup::{popup_rows, station_row, PopupRow};
pub use markers::{build_markers, filter_available, MarkerView, StationTally};
pub use stations::load_stations;
pub use config::Config;
pub use error::{PlugmapError, Result};
