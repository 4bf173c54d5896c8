use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{PlugmapError, Result};
use crate::types::LatLng;

/// Web server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // Web server
    pub web_host: String,
    pub web_port: u16,

    // Data
    pub stations_path: PathBuf,
    pub status_url: String,
    pub status_poll_interval: Duration,

    // Initial map view
    pub map_center: LatLng,
    pub map_zoom: u8,
}

impl Config {
    /// Load configuration for the web server, reading `.env` first if present.
    pub fn web_from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let required = |key: &str| {
            lookup(key).ok_or_else(|| PlugmapError::Config(format!("{key} environment variable is required")))
        };

        Ok(Self {
            web_host: lookup("WEB_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            web_port: parsed(&lookup, "WEB_PORT", 3000)?,
            stations_path: PathBuf::from(required("STATIONS_PATH")?),
            status_url: required("STATUS_URL")?,
            status_poll_interval: Duration::from_secs(parsed(&lookup, "STATUS_POLL_SECS", 60)?),
            map_center: LatLng::new(
                parsed(&lookup, "MAP_CENTER_LAT", 34.0522)?,
                parsed(&lookup, "MAP_CENTER_LNG", -118.2437)?,
            ),
            map_zoom: parsed(&lookup, "MAP_ZOOM", 10)?,
        })
    }
}

fn parsed<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T> {
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| PlugmapError::Config(format!("{key} must be a number, got {raw:?}"))),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_only_required_set() {
        let config = load(&[("STATIONS_PATH", "stations.json"), ("STATUS_URL", "http://status")]).unwrap();
        assert_eq!(config.web_host, "0.0.0.0");
        assert_eq!(config.web_port, 3000);
        assert_eq!(config.status_poll_interval, Duration::from_secs(60));
        assert_eq!(config.map_center, LatLng::new(34.0522, -118.2437));
        assert_eq!(config.map_zoom, 10);
    }

    #[test]
    fn missing_required_is_config_error() {
        let err = load(&[("STATUS_URL", "http://status")]).unwrap_err();
        assert!(err.to_string().contains("STATIONS_PATH"));
    }

    #[test]
    fn bad_number_is_config_error() {
        let err = load(&[
            ("STATIONS_PATH", "s.json"),
            ("STATUS_URL", "http://status"),
            ("WEB_PORT", "eighty"),
        ])
        .unwrap_err();
        assert!(matches!(err, PlugmapError::Config(_)));
    }
}
