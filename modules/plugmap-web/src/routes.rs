use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Json},
    routing::get,
    Router,
};
use plugmap_common::{station_row, LatLng, StationStatus, StatusEnvelope};
use plugmap_map::SharedController;
use serde::Deserialize;
use tokio::time::Instant;
use tower_http::set_header::SetResponseHeaderLayer;
use tracing::warn;

use crate::templates::{render_map_view, render_not_found, render_station_detail, MapViewSettings};

// --- App State ---

pub struct AppState {
    pub map: SharedController,
    pub view: MapViewSettings,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(map_page))
        .route("/station/{id}", get(station_page))
        .route("/api/status", get(api_status))
        .route("/api/markers", get(api_markers))
        .with_state(state)
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
        // Path only: query strings can carry the user's coordinates
        .layer(
            tower_http::trace::TraceLayer::new_for_http().make_span_with(
                |request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        path = %request.uri().path(),
                    )
                },
            ),
        )
}

// --- Handlers ---

async fn map_page(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let map = state.map.read().await;
    match render_map_view(map.groups(), &state.view) {
        Ok(html) => (StatusCode::OK, Html(html)),
        Err(e) => {
            warn!(error = %e, "Failed to render map view");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html("Error rendering map".to_string()),
            )
        }
    }
}

async fn station_page(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let map = state.map.read().await;
    match map.find_station(&id) {
        Some(station) => {
            let row = station_row(station, map.statuses(), None);
            (StatusCode::OK, Html(render_station_detail(&row, station.position())))
        }
        None => (
            StatusCode::NOT_FOUND,
            Html(render_not_found("Station not found")),
        ),
    }
}

#[derive(Deserialize)]
struct StatusQuery {
    city: Option<String>,
}

async fn api_status(
    State(state): State<Arc<AppState>>,
    Query(params): Query<StatusQuery>,
) -> Json<StatusEnvelope> {
    let city = params.city.unwrap_or_else(|| "all".to_string());
    let map = state.map.read().await;

    let mut data: Vec<StationStatus> = map
        .statuses()
        .iter()
        .filter(|status| {
            city.eq_ignore_ascii_case("all")
                || map
                    .find_station(&status.station_id)
                    .is_some_and(|s| s.city.eq_ignore_ascii_case(&city))
        })
        .cloned()
        .collect();
    data.sort_by(|a, b| a.station_id.cmp(&b.station_id));

    Json(StatusEnvelope::new(data))
}

#[derive(Deserialize)]
struct MarkersQuery {
    lat: Option<f64>,
    lng: Option<f64>,
}

async fn api_markers(
    State(state): State<Arc<AppState>>,
    Query(params): Query<MarkersQuery>,
) -> impl IntoResponse {
    let reference = match (params.lat, params.lng) {
        (Some(lat), Some(lng)) => Some(LatLng::new(lat, lng)),
        _ => None,
    };
    let map = state.map.read().await;
    Json(map.snapshot(reference, Instant::now()))
}
