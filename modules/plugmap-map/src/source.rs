use async_trait::async_trait;
use plugmap_common::StationStatus;
use status_client::StatusClient;

/// Where the poller gets status snapshots from.
#[async_trait]
pub trait StatusSource: Send + Sync {
    async fn fetch_statuses(&self) -> anyhow::Result<Vec<StationStatus>>;
}

#[async_trait]
impl StatusSource for StatusClient {
    async fn fetch_statuses(&self) -> anyhow::Result<Vec<StationStatus>> {
        Ok(self.fetch("all").await?)
    }
}
