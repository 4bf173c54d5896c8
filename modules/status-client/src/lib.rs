pub mod error;

pub use error::{Result, StatusError};

use std::time::Duration;

use plugmap_common::{StationStatus, StatusEnvelope};
use tracing::debug;

pub struct StatusClient {
    client: reqwest::Client,
    base_url: String,
}

impl StatusClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch the status snapshot for a city (`"all"` for every station).
    pub async fn fetch(&self, city: &str) -> Result<Vec<StationStatus>> {
        let endpoint = format!("{}/api/status", self.base_url);

        let resp = self
            .client
            .get(&endpoint)
            .query(&[("city", city)])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(StatusError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = resp.text().await?;
        let envelope: StatusEnvelope = serde_json::from_str(&body)?;
        let statuses = envelope.into_statuses();
        debug!(count = statuses.len(), city, "Fetched station statuses");
        Ok(statuses)
    }
}
