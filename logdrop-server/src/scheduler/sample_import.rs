//! Sample import job
//!
//! Pushes a fixed batch of example lines once, shortly after startup, so an
//! operator can confirm the Loki connection works before importing real logs.

use std::sync::Arc;
use std::time::Duration;

use logdrop_client::LogSink;
use logdrop_core::LogBatch;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::service::ImportError;

/// Service name the sample batch is labelled with
pub const SAMPLE_SERVICE_NAME: &str = "sample-app";

pub const SAMPLE_LOGS: [&str; 15] = [
    "2024-06-24 09:00:00 INFO Application startup initiated (example log)",
    "2024-06-24 09:00:01 INFO Loading configuration from config.yml (example log)",
    "2024-06-24 09:00:02 INFO Database connection pool initialized (max: 10) (example log)",
    "2024-06-24 09:00:03 INFO Starting HTTP server on port 8080 (example log)",
    "2024-06-24 09:00:04 INFO Authentication module loaded successfully (example log)",
    "2024-06-24 09:00:05 WARN High memory usage detected: 85% (example log)",
    "2024-06-24 09:00:06 INFO User session cache initialized (example log)",
    "2024-06-24 09:00:07 DEBUG Loading middleware: CORS, Auth, Logging (example log)",
    "2024-06-24 09:00:08 INFO Background job scheduler started (example log)",
    "2024-06-24 09:00:09 ERROR Failed to connect to external API: timeout (example log)",
    "2024-06-24 09:00:10 INFO Retrying external API connection... (example log)",
    "2024-06-24 09:00:11 INFO External API connection established (example log)",
    "2024-06-24 09:00:12 INFO Application ready to accept requests (example log)",
    "2024-06-24 09:00:13 INFO Health check endpoint active: /health (example log)",
    "2024-06-24 09:00:14 INFO Metrics endpoint active: /metrics (example log)",
];

/// One-shot job that pushes [`SAMPLE_LOGS`] after a delay
pub struct SampleImportJob {
    delay: Duration,
    sink: Arc<dyn LogSink>,
}

impl SampleImportJob {
    pub fn new(delay: Duration, sink: Arc<dyn LogSink>) -> Self {
        Self { delay, sink }
    }

    /// Runs the job on the tokio runtime; the outcome is only logged
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            match self.run().await {
                Ok(count) => info!("Successfully imported {} sample logs", count),
                Err(e) => error!("Failed to import sample logs: {}", e),
            }
        })
    }

    /// Waits for the configured delay, then pushes the sample batch
    pub async fn run(&self) -> Result<usize, ImportError> {
        tokio::time::sleep(self.delay).await;

        info!("Importing sample logs to verify setup...");

        let batch = LogBatch::new(SAMPLE_SERVICE_NAME, SAMPLE_LOGS)?;
        self.sink.push_batch(&batch).await?;

        Ok(batch.len())
    }
}
