use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::event::MapEvent;
use crate::source::StatusSource;

const MIN_PERIOD: Duration = Duration::from_secs(1);

/// Poll `source` immediately and then every `period`, forwarding each result
/// as a [`MapEvent`]. Polls run one at a time; a slow fetch delays the next
/// tick instead of overlapping it. Stops once the receiver is gone.
pub fn spawn_status_poller(
    source: Arc<dyn StatusSource>,
    period: Duration,
    tx: mpsc::Sender<MapEvent>,
) -> JoinHandle<()> {
    let period = period.max(MIN_PERIOD);
    info!(period_secs = period.as_secs(), "Starting status poller");

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;

            let event = match source.fetch_statuses().await {
                Ok(statuses) => {
                    debug!(count = statuses.len(), "Status poll succeeded");
                    MapEvent::StatusesFetched(statuses)
                }
                Err(e) => {
                    warn!(error = %e, "Status poll failed");
                    MapEvent::StatusFetchFailed(e.to_string())
                }
            };

            if tx.send(event).await.is_err() {
                info!("Map controller closed, stopping status poller");
                break;
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use plugmap_common::StationStatus;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use tokio::time::Instant;

    struct ScriptedSource {
        replies: Mutex<VecDeque<anyhow::Result<Vec<StationStatus>>>>,
        calls: AtomicUsize,
    }

    impl ScriptedSource {
        fn new(replies: Vec<anyhow::Result<Vec<StationStatus>>>) -> Self {
            Self {
                replies: Mutex::new(replies.into()),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl StatusSource for ScriptedSource {
        async fn fetch_statuses(&self) -> anyhow::Result<Vec<StationStatus>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(Vec::new()))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn polls_on_start_then_every_period() {
        let source = Arc::new(ScriptedSource::new(vec![
            Ok(vec![StationStatus::new("A", "Available")]),
            Err(anyhow::anyhow!("HTTP error! status: 503")),
        ]));
        let (tx, mut rx) = mpsc::channel(8);
        let start = Instant::now();
        let _poller = spawn_status_poller(source.clone(), Duration::from_secs(60), tx);

        let first = rx.recv().await.unwrap();
        assert_eq!(first, MapEvent::StatusesFetched(vec![StationStatus::new("A", "Available")]));
        assert!(start.elapsed() < Duration::from_secs(1));

        let second = rx.recv().await.unwrap();
        assert!(matches!(second, MapEvent::StatusFetchFailed(ref m) if m.contains("503")));
        assert!(start.elapsed() >= Duration::from_secs(60));
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn stops_when_receiver_dropped() {
        let source = Arc::new(ScriptedSource::new(Vec::new()));
        let (tx, rx) = mpsc::channel(1);
        let poller = spawn_status_poller(source.clone(), Duration::from_secs(60), tx);
        drop(rx);

        poller.await.unwrap();
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }
}
