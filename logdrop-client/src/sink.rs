//! Log sink abstraction
//!
//! The importer depends on this trait rather than on `LokiClient` directly so
//! request handlers and the sample import job can be exercised against an
//! in-memory sink.

use async_trait::async_trait;
use logdrop_core::LogBatch;

use crate::LokiClient;
use crate::error::Result;

/// Destination for validated log batches
#[async_trait]
pub trait LogSink: Send + Sync {
    /// Delivers one batch; returns once the backend has accepted or refused it
    async fn push_batch(&self, batch: &LogBatch) -> Result<()>;
}

#[async_trait]
impl LogSink for LokiClient {
    async fn push_batch(&self, batch: &LogBatch) -> Result<()> {
        LokiClient::push_batch(self, batch).await
    }
}
