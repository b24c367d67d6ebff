// HTTP snapshot source - polls a node's /telemetry endpoint
use crate::application::snapshot_source::{FetchError, FetchedSnapshot, SnapshotSource};
use crate::infrastructure::snapshot_codec::decode_json;
use anyhow::Context;
use async_trait::async_trait;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct HttpSnapshotSource {
    client: reqwest::Client,
    url: String,
}

impl HttpSnapshotSource {
    pub fn new(url: String, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { client, url })
    }
}

#[async_trait]
impl SnapshotSource for HttpSnapshotSource {
    async fn fetch(&self) -> Result<FetchedSnapshot, FetchError> {
        let started = Instant::now();
        let response = self
            .client
            .get(&self.url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(FetchError::Status(response.status().as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        let round_trip = started.elapsed();

        let snapshot = decode_json(&body).map_err(|e| FetchError::Malformed(e.to_string()))?;
        Ok(FetchedSnapshot {
            snapshot,
            round_trip,
        })
    }
}
