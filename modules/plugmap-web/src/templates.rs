use std::time::Duration;

use plugmap_common::{LatLng, LocationGroup, PopupRow};

/// Initial view and refresh cadence baked into the map page.
#[derive(Debug, Clone, Copy)]
pub struct MapViewSettings {
    pub center: LatLng,
    pub zoom: u8,
    pub poll_interval: Duration,
}

/// Render the map page: location groups are embedded as JSON and picked up by
/// the client script, which handles clustering, popups and status polling.
pub fn render_map_view(groups: &[LocationGroup], settings: &MapViewSettings) -> serde_json::Result<String> {
    let payload = script_safe_json(&serde_json::to_string(groups)?);

    let script = MAP_SCRIPT
        .replace("__LOCATION_GROUPS__", &payload)
        .replace("__CENTER_LAT__", &settings.center.lat.to_string())
        .replace("__CENTER_LNG__", &settings.center.lng.to_string())
        .replace("__ZOOM__", &settings.zoom.to_string())
        .replace("__POLL_MS__", &settings.poll_interval.as_millis().to_string());

    let content = format!(
        r#"
<link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css" />
<link rel="stylesheet" href="https://unpkg.com/leaflet.markercluster@1.5.3/dist/MarkerCluster.css" />
<link rel="stylesheet" href="https://unpkg.com/leaflet.markercluster@1.5.3/dist/MarkerCluster.Default.css" />
<script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js"></script>
<script src="https://unpkg.com/leaflet.markercluster@1.5.3/dist/leaflet.markercluster.js"></script>

<div id="map"></div>
<div class="map-controls">
    <div id="stationCount"></div>
    <label class="filter-switch">
        <span class="switch"><input type="checkbox" id="availableOnly" checked><span class="slider"></span></span>
        Available only
    </label>
    <div id="loadingIndicator" class="loading-indicator hidden">Updating stations...</div>
</div>
<script>
{script}
</script>
"#
    );

    Ok(wrap_in_layout(&content, "Charging Stations Map", "map", MAP_STYLES))
}

/// Render the detail page for one station.
pub fn render_station_detail(row: &PopupRow, coordinates: LatLng) -> String {
    let content = format!(
        r#"<div class="container">
    <a href="/" class="back-link">&larr; Back to map</a>
    <div class="station-card">
        <h2>{name}</h2>
        <span class="status-indicator {status_class}">{status}</span>
        <dl class="detail-meta">
            <dt>Address</dt><dd><a href="{directions}" target="_blank" rel="noopener">{address}</a></dd>
            <dt>Max power</dt><dd>{power}</dd>
            <dt>Price</dt><dd>{price}</dd>
            <dt>Coordinates</dt><dd>{lat}, {lng}</dd>
        </dl>
    </div>
</div>"#,
        name = html_escape(&row.name),
        status_class = row.status.css_class(),
        status = row.status,
        directions = html_escape(&row.directions_url),
        address = html_escape(&row.address_line),
        power = html_escape(&row.power_label),
        price = html_escape(&row.price_label),
        lat = coordinates.lat,
        lng = coordinates.lng,
    );

    wrap_in_layout(&content, &row.name, "map", DETAIL_STYLES)
}

pub fn render_not_found(message: &str) -> String {
    let content = format!(
        r#"<div class="container"><h2>Not found</h2><p>{}</p><a href="/" class="back-link">&larr; Back to map</a></div>"#,
        html_escape(message)
    );
    wrap_in_layout(&content, "Not found", "", DETAIL_STYLES)
}

// --- Layout ---

struct NavItem {
    key: &'static str,
    label: &'static str,
    href: &'static str,
}

const NAV_ITEMS: &[NavItem] = &[
    NavItem { key: "map", label: "Map", href: "/" },
    NavItem { key: "status", label: "Status feed", href: "/api/status?city=all" },
];

/// Shared page shell: head, navigation with the active section marked, and
/// the page-specific style block.
pub fn wrap_in_layout(content: &str, title: &str, active_section: &str, styles: &str) -> String {
    let nav: String = NAV_ITEMS
        .iter()
        .map(|item| {
            let class = if item.key == active_section { " class=\"active\"" } else { "" };
            format!(r#"<a href="{}"{class}>{}</a>"#, html_escape(item.href), item.label)
        })
        .collect();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title} — PlugMap</title>
<style>
*{{margin:0;padding:0;box-sizing:border-box;}}
body{{font-family:-apple-system,BlinkMacSystemFont,"Segoe UI",Roboto,sans-serif;color:#1a1a1a;background:#fafafa;}}
.header{{background:#1a1a1a;color:#fff;padding:12px 24px;display:flex;align-items:center;justify-content:space-between;}}
.header h1{{font-size:18px;font-weight:600;}}
.header nav a{{color:#ccc;text-decoration:none;margin-left:20px;font-size:14px;}}
.header nav a:hover,.header nav a.active{{color:#fff;}}
.container{{max-width:960px;margin:0 auto;padding:24px;}}
.back-link{{font-size:13px;color:#0066cc;text-decoration:none;}}
</style>
<style>
{styles}
</style>
</head>
<body>
<div class="header">
    <h1>PlugMap</h1>
    <nav>{nav}</nav>
</div>
{content}
</body>
</html>"#,
        title = html_escape(title),
    )
}

// --- Helpers ---

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// JSON is valid JavaScript, but `</script>` inside a string would still end
/// the element early.
fn script_safe_json(json: &str) -> String {
    json.replace("</", "<\\/")
}

const DETAIL_STYLES: &str = r#"
.station-card { background: #fff; border: 1px solid #e0e0e0; border-radius: 8px; padding: 16px; margin-top: 12px; }
.station-card h2 { margin-bottom: 8px; }
.detail-meta { display: grid; grid-template-columns: 140px 1fr; gap: 8px; margin: 16px 0; font-size: 14px; }
.detail-meta dt { color: #888; }
.status-indicator { display: inline-block; padding: 4px 8px; border-radius: 4px; font-size: 0.9em; }
.status-available { background-color: #d4edda; color: #155724; }
.status-unavailable { background-color: #f8d7da; color: #721c24; }
.status-unknown { background-color: #e2e3e5; color: #383d41; }
"#;

const MAP_STYLES: &str = r#"
#map { height: 800px; width: 100%; border-radius: 8px; box-shadow: 0 2px 4px rgba(0,0,0,0.1); margin-top: 20px; }
.map-controls { position: absolute; top: 80px; right: 10px; z-index: 1000; background: white; padding: 10px; border-radius: 4px; box-shadow: 0 2px 4px rgba(0,0,0,0.1); }
.locate-button { width: 40px; height: 40px; background: white; border: 2px solid rgba(0,0,0,0.2); border-radius: 4px; cursor: pointer; display: flex; align-items: center; justify-content: center; box-shadow: 0 2px 4px rgba(0,0,0,0.2); margin-bottom: 10px; }
.locate-button:hover { background: #f4f4f4; }
.locate-button svg { width: 20px; height: 20px; fill: #666; }
.locate-button.active svg { fill: #2196F3; }
.user-location { background-color: #2196F3; border: 2px solid white; border-radius: 50%; box-shadow: 0 0 0 2px rgba(33,150,243,0.4); }
.filter-switch { display: flex; align-items: center; gap: 8px; margin: 10px 0; font-size: 14px; }
.switch { position: relative; display: inline-block; width: 50px; height: 24px; }
.switch input { opacity: 0; width: 0; height: 0; }
.slider { position: absolute; cursor: pointer; top: 0; left: 0; right: 0; bottom: 0; background-color: #ccc; transition: .4s; border-radius: 24px; }
.slider:before { position: absolute; content: ""; height: 16px; width: 16px; left: 4px; bottom: 4px; background-color: white; transition: .4s; border-radius: 50%; }
input:checked + .slider { background-color: #2196F3; }
input:checked + .slider:before { transform: translateX(26px); }
.status-indicator { display: inline-block; padding: 4px 8px; border-radius: 4px; font-size: 0.9em; margin-top: 4px; }
.status-available { background-color: #d4edda; color: #155724; }
.status-unavailable { background-color: #f8d7da; color: #721c24; }
.status-unknown { background-color: #e2e3e5; color: #383d41; }
.station-count { background: #28a745; color: white; border-radius: 50%; width: 24px; height: 24px; display: flex; align-items: center; justify-content: center; font-size: 12px; font-weight: bold; }
.station-list { list-style: none; max-height: 300px; overflow-y: auto; }
.station-item { padding: 6px 0; border-bottom: 1px solid #eee; }
.station-item h3 { font-size: 14px; margin-bottom: 2px; }
.loading-indicator { position: absolute; top: 20px; right: 20px; z-index: 1000; background: white; padding: 10px; border-radius: 4px; box-shadow: 0 2px 4px rgba(0,0,0,0.1); }
.loading-indicator.hidden { display: none; }
.error-message { position: absolute; top: 20px; right: 20px; z-index: 1000; background: #f8d7da; color: #721c24; padding: 10px; border-radius: 4px; box-shadow: 0 2px 4px rgba(0,0,0,0.1); }
"#;

const MAP_SCRIPT: &str = r##"
const locationGroups = __LOCATION_GROUPS__;
const STATUS_COLORS = { available: '#28a745', unavailable: '#dc3545', unknown: '#2196F3' };
const BANNER_MS = 5000;

const state = {
  statuses: {},
  loaded: false,
  availableOnly: true,
  userMarker: null,
};

const map = L.map('map').setView([__CENTER_LAT__, __CENTER_LNG__], __ZOOM__);
L.tileLayer('https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png', {
  maxZoom: 19,
  attribution: 'OpenStreetMap contributors'
}).addTo(map);

const clusterGroup = L.markerClusterGroup({
  chunkedLoading: true,
  maxClusterRadius: 50,
  spiderfyOnMaxZoom: true,
  showCoverageOnHover: false,
  zoomToBoundsOnClick: true
}).addTo(map);

function escapeHtml(value) {
  return String(value)
    .replace(/&/g, '&amp;').replace(/</g, '&lt;').replace(/>/g, '&gt;')
    .replace(/"/g, '&quot;').replace(/'/g, '&#39;');
}

function calculateDistance(lat1, lon1, lat2, lon2) {
  const R = 6371;
  const dLat = (lat2 - lat1) * Math.PI / 180;
  const dLon = (lon2 - lon1) * Math.PI / 180;
  const a = Math.sin(dLat / 2) * Math.sin(dLat / 2) +
    Math.cos(lat1 * Math.PI / 180) * Math.cos(lat2 * Math.PI / 180) *
    Math.sin(dLon / 2) * Math.sin(dLon / 2);
  const c = 2 * Math.atan2(Math.sqrt(a), Math.sqrt(1 - a));
  return Math.round(R * c * 10) / 10;
}

function resolveStatus(stationId) {
  const entry = state.statuses[stationId];
  const label = entry && entry.plug_status ? String(entry.plug_status).toLowerCase() : '';
  return label === 'available' || label === 'unavailable' ? label : 'unknown';
}

function userPosition() {
  return state.userMarker ? state.userMarker.getLatLng() : null;
}

function createCustomIcon(count, status) {
  return L.divIcon({
    html: `<div class="station-count" style="background-color: ${STATUS_COLORS[status]}">${count}</div>`,
    className: 'custom-marker',
    iconSize: [24, 24]
  });
}

function showError(message) {
  const errorDiv = document.createElement('div');
  errorDiv.className = 'error-message';
  errorDiv.textContent = message;
  document.body.appendChild(errorDiv);
  setTimeout(() => errorDiv.remove(), BANNER_MS);
}

function popupContent(group) {
  const pos = userPosition();
  const rows = group.stations.map((station, index) => ({
    station,
    index,
    status: resolveStatus(station.station_id),
    distance: pos ? calculateDistance(pos.lat, pos.lng, station.latitude, station.longitude) : null,
  }));

  rows.sort((a, b) => {
    const rankA = a.status === 'available' ? 0 : 1;
    const rankB = b.status === 'available' ? 0 : 1;
    if (rankA !== rankB) return rankA - rankB;
    if (a.distance !== null && b.distance !== null && a.distance !== b.distance) {
      return a.distance - b.distance;
    }
    return a.index - b.index;
  });

  const container = document.createElement('div');
  container.className = 'station-popup';
  const list = document.createElement('ul');
  list.className = 'station-list';

  rows.forEach(({ station, status, distance }) => {
    const where = `${station.address}, ${station.city}`;
    const item = document.createElement('li');
    item.className = 'station-item';
    item.innerHTML = `
      <h3><a href="/station/${encodeURIComponent(station.station_id)}">${escapeHtml(station.name)}</a></h3>
      <p><a href="https://maps.google.com/?q=${encodeURIComponent(where)}" target="_blank" rel="noopener">${escapeHtml(where)}</a></p>
      <p class="station-power">${escapeHtml(station.max_electric_power)}kW</p>
      <p class="station-price">$${escapeHtml(station.price)}/${escapeHtml(station.price_unit)}</p>
      <span class="status-indicator status-${status}">${status}</span>
      ${distance !== null ? `<p class="station-distance">${distance.toFixed(1)}km away</p>` : ''}
    `;
    list.appendChild(item);
  });

  container.appendChild(list);
  return container;
}

function visibleGroups() {
  if (!state.availableOnly) return locationGroups;
  return locationGroups
    .map(group => ({ ...group, stations: group.stations.filter(s => resolveStatus(s.station_id) === 'available') }))
    .filter(group => group.stations.length > 0);
}

function createMarkers() {
  clusterGroup.clearLayers();

  let total = 0;
  let available = 0;
  locationGroups.forEach(group => {
    total += group.stations.length;
    available += group.stations.filter(s => resolveStatus(s.station_id) === 'available').length;
  });

  visibleGroups().forEach(group => {
    const statuses = group.stations.map(s => resolveStatus(s.station_id));
    const status = statuses.includes('available') ? 'available'
      : statuses.includes('unavailable') ? 'unavailable' : 'unknown';

    const marker = L.marker([group.latitude, group.longitude], {
      icon: createCustomIcon(group.stations.length, status)
    }).bindPopup(() => popupContent(group));
    clusterGroup.addLayer(marker);
  });

  document.getElementById('stationCount').textContent = `${available}/${total} Available`;
}

async function fetchStationStatuses() {
  const loadingIndicator = document.getElementById('loadingIndicator');
  loadingIndicator.classList.remove('hidden');

  try {
    const response = await fetch('/api/status?city=all');
    if (!response.ok) {
      throw new Error(`HTTP error! status: ${response.status}`);
    }
    const result = await response.json();
    const next = {};
    (result.data || []).forEach(status => {
      next[status.station_id] = status;
    });
    state.statuses = next;
    return true;
  } catch (error) {
    showError(state.loaded
      ? 'Failed to update station statuses. Please try again later.'
      : 'Failed to load available stations. Please try again later.');
    return false;
  } finally {
    loadingIndicator.classList.add('hidden');
  }
}

async function refresh() {
  const ok = await fetchStationStatuses();
  if (!ok) return;
  const firstLoad = !state.loaded;
  state.loaded = true;
  createMarkers();
  if (firstLoad && clusterGroup.getLayers().length > 0) {
    map.fitBounds(clusterGroup.getBounds(), { padding: [50, 50] });
  }
}

function placeUserMarker(latitude, longitude) {
  if (!state.userMarker) {
    state.userMarker = L.marker([latitude, longitude], {
      icon: L.divIcon({ className: 'user-location', iconSize: [12, 12] })
    }).addTo(map);
  } else {
    state.userMarker.setLatLng([latitude, longitude]);
  }
}

function flashActive(container) {
  container.classList.add('active');
  setTimeout(() => container.classList.remove('active'), 2000);
}

L.Control.Locate = L.Control.extend({
  onAdd: function () {
    const container = L.DomUtil.create('div', 'locate-button leaflet-bar leaflet-control');
    container.innerHTML = `
      <button type="button" title="Show my location" aria-label="Show my location">
        <svg viewBox="0 0 24 24">
          <path d="M12 8c-2.21 0-4 1.79-4 4s1.79 4 4 4 4-1.79 4-4-1.79-4-4-4zm8.94 3A8.994 8.994 0 0 0 13 3.06V1h-2v2.06A8.994 8.994 0 0 0 3.06 11H1v2h2.06A8.994 8.994 0 0 0 11 20.94V23h2v-2.06A8.994 8.994 0 0 0 20.94 13H23v-2h-2.06zM12 19c-3.87 0-7-3.13-7-7s3.13-7 7-7 7 3.13 7 7-3.13 7-7 7z"/>
        </svg>
      </button>
    `;

    container.onclick = () => {
      const pos = userPosition();
      if (pos) {
        map.setView(pos, 15);
        flashActive(container);
      } else if ('geolocation' in navigator) {
        navigator.geolocation.getCurrentPosition(
          (position) => {
            const { latitude, longitude } = position.coords;
            placeUserMarker(latitude, longitude);
            map.setView([latitude, longitude], 15);
            flashActive(container);
          },
          (error) => console.error('Error getting location:', error),
          { enableHighAccuracy: true }
        );
      }
    };

    return container;
  }
});

new L.Control.Locate({ position: 'topleft' }).addTo(map);

if ('geolocation' in navigator) {
  navigator.geolocation.watchPosition(
    (position) => placeUserMarker(position.coords.latitude, position.coords.longitude),
    (error) => console.error('Error watching location:', error),
    { enableHighAccuracy: true }
  );
}

document.getElementById('availableOnly').addEventListener('change', (event) => {
  state.availableOnly = event.target.checked;
  if (state.loaded) createMarkers();
});

refresh();
setInterval(refresh, __POLL_MS__);
"##;
