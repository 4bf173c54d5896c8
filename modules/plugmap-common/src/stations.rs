use std::fs;
use std::path::Path;

use tracing::info;

use crate::error::{PlugmapError, Result};
use crate::types::Station;

/// Load the station snapshot: a JSON array of station records.
pub fn load_stations(path: &Path) -> Result<Vec<Station>> {
    let content = fs::read_to_string(path)
        .map_err(|e| PlugmapError::Data(format!("failed to read {}: {e}", path.display())))?;
    let stations: Vec<Station> = serde_json::from_str(&content)?;
    info!(count = stations.len(), path = %path.display(), "Loaded stations");
    Ok(stations)
}
