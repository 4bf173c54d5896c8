use futures::{Stream, StreamExt};
use plugmap_common::LatLng;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::event::MapEvent;

/// Forward a stream of position fixes (or error messages) to the controller.
pub fn spawn_location_watch<S>(fixes: S, tx: mpsc::Sender<MapEvent>) -> JoinHandle<()>
where
    S: Stream<Item = Result<LatLng, String>> + Send + 'static,
{
    tokio::spawn(async move {
        let mut fixes = Box::pin(fixes);
        while let Some(fix) = fixes.next().await {
            let event = match fix {
                Ok(position) => MapEvent::UserLocated(position),
                Err(error) => MapEvent::LocationFailed(error),
            };
            if tx.send(event).await.is_err() {
                break;
            }
        }
        debug!("Location watch ended");
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn forwards_fixes_and_errors_in_order() {
        let (tx, mut rx) = mpsc::channel(8);
        let fixes = futures::stream::iter(vec![
            Ok(LatLng::new(34.0, -118.0)),
            Err("User denied Geolocation".to_string()),
            Ok(LatLng::new(34.1, -118.1)),
        ]);
        spawn_location_watch(fixes, tx).await.unwrap();

        assert_eq!(rx.recv().await, Some(MapEvent::UserLocated(LatLng::new(34.0, -118.0))));
        assert_eq!(
            rx.recv().await,
            Some(MapEvent::LocationFailed("User denied Geolocation".into()))
        );
        assert_eq!(rx.recv().await, Some(MapEvent::UserLocated(LatLng::new(34.1, -118.1))));
        assert_eq!(rx.recv().await, None);
    }
}
