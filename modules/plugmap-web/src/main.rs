use std::sync::Arc;

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use plugmap_common::{load_stations, Config};
use plugmap_map::{spawn_controller, spawn_status_poller, MapController};
use status_client::StatusClient;

mod routes;
mod templates;

use routes::{router, AppState};
use templates::MapViewSettings;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("plugmap=info".parse()?))
        .init();

    let config = Config::web_from_env()?;

    let stations = load_stations(&config.stations_path)?;
    let controller = MapController::from_stations(&stations);
    info!(
        stations = stations.len(),
        locations = controller.groups().len(),
        "Grouped stations by location"
    );

    let (tx, rx) = mpsc::channel(16);
    let (map, _controller_task) = spawn_controller(controller, rx);

    let client = StatusClient::new(&config.status_url)?;
    let _poller = spawn_status_poller(Arc::new(client), config.status_poll_interval, tx);

    let state = Arc::new(AppState {
        map,
        view: MapViewSettings {
            center: config.map_center,
            zoom: config.map_zoom,
            poll_interval: config.status_poll_interval,
        },
    });

    let addr = format!("{}:{}", config.web_host, config.web_port);
    info!("PlugMap web server starting on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router(state)).await?;

    Ok(())
}
