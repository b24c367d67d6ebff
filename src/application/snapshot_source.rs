// Snapshot source - where the monitor gets node snapshots from
use crate::domain::snapshot::TelemetrySnapshot;
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to node failed: {0}")]
    Transport(String),
    #[error("node answered with status {0}")]
    Status(u16),
    #[error("malformed snapshot: {0}")]
    Malformed(String),
}

#[derive(Debug, Clone)]
pub struct FetchedSnapshot {
    pub snapshot: TelemetrySnapshot,
    pub round_trip: Duration,
}

#[async_trait]
pub trait SnapshotSource: Send + Sync {
    async fn fetch(&self) -> Result<FetchedSnapshot, FetchError>;
}
