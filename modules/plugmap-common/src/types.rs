use serde::{Deserialize, Serialize};

// --- Geo Types ---

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Haversine great-circle distance between two lat/lng points in kilometers.
pub fn haversine_km(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    const EARTH_RADIUS_KM: f64 = 6371.0;
    let d_lat = (lat2 - lat1).to_radians();
    let d_lng = (lng2 - lng1).to_radians();
    let lat1_r = lat1.to_radians();
    let lat2_r = lat2.to_radians();

    let a = (d_lat / 2.0).sin().powi(2) + lat1_r.cos() * lat2_r.cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}

/// Display distance between two points, rounded to one decimal place.
pub fn distance_km(from: LatLng, to: LatLng) -> f64 {
    let km = haversine_km(from.lat, from.lng, to.lat, to.lng);
    (km * 10.0).round() / 10.0
}

// --- Stations ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub station_id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub name: String,
    pub address: String,
    pub city: String,
    pub max_electric_power: f64,
    pub price: f64,
    pub price_unit: String,
}

impl Station {
    pub fn position(&self) -> LatLng {
        LatLng::new(self.latitude, self.longitude)
    }

    pub fn detail_url(&self) -> String {
        format!("/station/{}", self.station_id)
    }
}

// --- Status ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlugStatus {
    Available,
    Unavailable,
    Unknown,
}

impl PlugStatus {
    /// Parse an endpoint label. Comparison ignores case; anything
    /// unrecognised is `Unknown`.
    pub fn from_label(label: &str) -> Self {
        let label = label.trim();
        if label.eq_ignore_ascii_case("available") {
            PlugStatus::Available
        } else if label.eq_ignore_ascii_case("unavailable") {
            PlugStatus::Unavailable
        } else {
            PlugStatus::Unknown
        }
    }

    pub fn is_available(self) -> bool {
        self == PlugStatus::Available
    }

    /// Marker colour used by the map for this status.
    pub fn color(self) -> &'static str {
        match self {
            PlugStatus::Available => "#28a745",
            PlugStatus::Unavailable => "#dc3545",
            PlugStatus::Unknown => "#2196F3",
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            PlugStatus::Available => "status-available",
            PlugStatus::Unavailable => "status-unavailable",
            PlugStatus::Unknown => "status-unknown",
        }
    }
}

impl std::fmt::Display for PlugStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlugStatus::Available => write!(f, "Available"),
            PlugStatus::Unavailable => write!(f, "Unavailable"),
            PlugStatus::Unknown => write!(f, "Unknown"),
        }
    }
}

/// One entry of the status endpoint's `data` array. Fields beyond the id and
/// label are kept as-is so they can be served back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationStatus {
    pub station_id: String,
    #[serde(default)]
    pub plug_status: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl StationStatus {
    pub fn new(station_id: impl Into<String>, plug_status: impl Into<String>) -> Self {
        Self {
            station_id: station_id.into(),
            plug_status: plug_status.into(),
            extra: serde_json::Map::new(),
        }
    }

    pub fn availability(&self) -> PlugStatus {
        PlugStatus::from_label(&self.plug_status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_point_is_zero_km() {
        assert_eq!(distance_km(LatLng::new(0.0, 0.0), LatLng::new(0.0, 0.0)), 0.0);
    }

    #[test]
    fn one_degree_of_longitude_at_equator() {
        assert_eq!(distance_km(LatLng::new(0.0, 0.0), LatLng::new(0.0, 1.0)), 111.2);
    }

    #[test]
    fn distance_is_symmetric() {
        let la = LatLng::new(34.0522, -118.2437);
        let sf = LatLng::new(37.7749, -122.4194);
        let d = distance_km(la, sf);
        assert_eq!(d, distance_km(sf, la));
        assert!((d - 559.1).abs() < 1.0, "got {d}");
    }

    #[test]
    fn plug_status_ignores_case() {
        assert_eq!(PlugStatus::from_label("Available"), PlugStatus::Available);
        assert_eq!(PlugStatus::from_label("AVAILABLE"), PlugStatus::Available);
        assert_eq!(PlugStatus::from_label("unavailable"), PlugStatus::Unavailable);
        assert_eq!(PlugStatus::from_label("Charging"), PlugStatus::Unknown);
        assert_eq!(PlugStatus::from_label(""), PlugStatus::Unknown);
    }

    #[test]
    fn status_keeps_extra_fields() {
        let raw = r#"{"station_id":"A","plug_status":"Available","updated_at":"2024-01-01"}"#;
        let status: StationStatus = serde_json::from_str(raw).unwrap();
        assert_eq!(status.availability(), PlugStatus::Available);
        assert_eq!(status.extra["updated_at"], "2024-01-01");

        let back = serde_json::to_value(&status).unwrap();
        assert_eq!(back["updated_at"], "2024-01-01");
    }

    #[test]
    fn missing_label_is_unknown() {
        let status: StationStatus = serde_json::from_str(r#"{"station_id":"A"}"#).unwrap();
        assert_eq!(status.availability(), PlugStatus::Unknown);
    }
}
