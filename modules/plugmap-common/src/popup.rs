use serde::Serialize;

use crate::grouping::LocationGroup;
use crate::status::StatusBook;
use crate::types::{distance_km, LatLng, PlugStatus, Station};

const DIRECTIONS_BASE: &str = "https://maps.google.com/";

/// One station line inside a marker popup.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PopupRow {
    pub station_id: String,
    pub name: String,
    pub detail_url: String,
    pub address_line: String,
    pub directions_url: String,
    pub power_label: String,
    pub price_label: String,
    pub status: PlugStatus,
    pub distance_km: Option<f64>,
}

/// Build the popup listing for a group: available stations first, then by
/// distance from `reference` when one is known. Ties keep input order.
pub fn popup_rows(
    group: &LocationGroup,
    statuses: &StatusBook,
    reference: Option<LatLng>,
) -> Vec<PopupRow> {
    let mut rows: Vec<PopupRow> = group
        .stations
        .iter()
        .map(|station| station_row(station, statuses, reference))
        .collect();

    // sort_by is stable
    rows.sort_by(|a, b| {
        let rank = |row: &PopupRow| if row.status.is_available() { 0 } else { 1 };
        rank(a).cmp(&rank(b)).then_with(|| match (a.distance_km, b.distance_km) {
            (Some(da), Some(db)) => da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal),
            _ => std::cmp::Ordering::Equal,
        })
    });

    rows
}

/// Row for a single station, without any ordering.
pub fn station_row(station: &Station, statuses: &StatusBook, reference: Option<LatLng>) -> PopupRow {
    let address_line = format!("{}, {}", station.address, station.city);
    PopupRow {
        station_id: station.station_id.clone(),
        name: station.name.clone(),
        detail_url: station.detail_url(),
        directions_url: directions_url(&address_line),
        address_line,
        power_label: format!("{}kW", station.max_electric_power),
        price_label: format!("${}/{}", station.price, station.price_unit),
        status: statuses.resolve(&station.station_id),
        distance_km: reference.map(|r| distance_km(r, station.position())),
    }
}

fn directions_url(query: &str) -> String {
    match url::Url::parse_with_params(DIRECTIONS_BASE, &[("q", query)]) {
        Ok(u) => u.to_string(),
        Err(_) => DIRECTIONS_BASE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grouping::tests::station;
    use crate::types::StationStatus;

    fn ids(rows: &[PopupRow]) -> Vec<&str> {
        rows.iter().map(|r| r.station_id.as_str()).collect()
    }

    #[test]
    fn available_first_then_input_order() {
        let group = LocationGroup {
            latitude: 34.0,
            longitude: -118.0,
            stations: vec![
                station("u", 34.0, -118.0),
                station("a", 34.0, -118.0),
                station("x", 34.0, -118.0),
            ],
        };
        let book = StatusBook::from_statuses(vec![
            StationStatus::new("u", "Unavailable"),
            StationStatus::new("a", "Available"),
        ]);

        let rows = popup_rows(&group, &book, None);
        assert_eq!(ids(&rows), vec!["a", "u", "x"]);
        assert_eq!(rows[2].status, PlugStatus::Unknown);
        assert!(rows.iter().all(|r| r.distance_km.is_none()));
    }

    #[test]
    fn reference_orders_by_distance_within_rank() {
        // Groups normally share one coordinate; mixed coordinates exercise
        // the distance tie-break.
        let group = LocationGroup {
            latitude: 0.0,
            longitude: 0.0,
            stations: vec![
                station("far", 0.0, 2.0),
                station("near", 0.0, 1.0),
                station("open", 0.0, 3.0),
            ],
        };
        let book = StatusBook::from_statuses(vec![StationStatus::new("open", "available")]);

        let rows = popup_rows(&group, &book, Some(LatLng::new(0.0, 0.0)));
        assert_eq!(ids(&rows), vec!["open", "near", "far"]);
        assert_eq!(rows[1].distance_km, Some(111.2));
    }

    #[test]
    fn row_labels_and_links() {
        let group = LocationGroup {
            latitude: 34.0,
            longitude: -118.0,
            stations: vec![station("st-9", 34.0, -118.0)],
        };
        let rows = popup_rows(&group, &StatusBook::new(), None);
        let row = &rows[0];

        assert_eq!(row.detail_url, "/station/st-9");
        assert_eq!(row.address_line, "1 Main St, Los Angeles");
        assert_eq!(row.power_label, "50kW");
        assert_eq!(row.price_label, "$0.35/kWh");
        assert!(row.directions_url.starts_with("https://maps.google.com/?q=1+Main+St%2C+Los+Angeles"));
    }
}
