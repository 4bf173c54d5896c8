use std::sync::Arc;

use tokio::sync::{mpsc, RwLock};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::info;

use crate::controller::MapController;
use crate::event::MapEvent;

pub type SharedController = Arc<RwLock<MapController>>;

/// Apply events from `rx` to the controller until every sender is dropped.
pub fn spawn_controller(
    controller: MapController,
    mut rx: mpsc::Receiver<MapEvent>,
) -> (SharedController, JoinHandle<()>) {
    let shared = Arc::new(RwLock::new(controller));
    let state = shared.clone();

    let handle = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            state.write().await.apply(event, Instant::now());
        }
        info!("Map controller stopped");
    });

    (shared, handle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use plugmap_common::{LatLng, Station, StationStatus};

    fn station(id: &str) -> Station {
        Station {
            station_id: id.to_string(),
            latitude: 34.0,
            longitude: -118.0,
            name: id.to_string(),
            address: "1 Main St".to_string(),
            city: "Pasadena".to_string(),
            max_electric_power: 11.0,
            price: 0.3,
            price_unit: "kWh".to_string(),
        }
    }

    #[tokio::test]
    async fn applies_events_in_arrival_order() {
        let (tx, rx) = mpsc::channel(8);
        let (shared, handle) =
            spawn_controller(MapController::from_stations(&[station("A"), station("B")]), rx);

        tx.send(MapEvent::StatusesFetched(vec![StationStatus::new("A", "Available")]))
            .await
            .unwrap();
        tx.send(MapEvent::StatusesFetched(vec![StationStatus::new("B", "Available")]))
            .await
            .unwrap();
        tx.send(MapEvent::UserLocated(LatLng::new(34.0, -118.0))).await.unwrap();
        drop(tx);
        handle.await.unwrap();

        let map = shared.read().await;
        assert!(map.statuses().is_available("B"));
        assert!(!map.statuses().is_available("A"));
        assert_eq!(map.markers()[0].available_count, 1);
        assert_eq!(map.user_location(), Some(LatLng::new(34.0, -118.0)));
    }
}
