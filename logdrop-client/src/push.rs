//! Push endpoint

use chrono::Utc;
use logdrop_core::LogBatch;
use logdrop_core::dto::push::PushRequest;
use reqwest::StatusCode;
use reqwest::header::CONTENT_TYPE;

use crate::LokiClient;
use crate::error::{ClientError, Result};

impl LokiClient {
    /// Format a batch and push it as a single stream
    ///
    /// Timestamps are assigned from one instant captured here, one microsecond
    /// apart, so the lines keep their submission order in Loki. Nothing is sent
    /// if no line survives formatting.
    pub async fn push_batch(&self, batch: &LogBatch) -> Result<()> {
        match PushRequest::from_batch(batch, Utc::now()) {
            Some(request) => self.push(&request).await,
            None => {
                tracing::debug!(
                    "Nothing to push for service '{}', skipping",
                    batch.service_name()
                );
                Ok(())
            }
        }
    }

    /// Send a prepared push request
    ///
    /// Only `204 No Content` counts as success. Any other status is returned as
    /// [`ClientError::Rejected`] carrying the response body.
    pub async fn push(&self, request: &PushRequest) -> Result<()> {
        let body = serde_json::to_vec(request)?;
        let url = self.push_url();

        tracing::debug!(
            "Pushing {} entries in {} stream(s) to {}",
            request.entry_count(),
            request.streams.len(),
            url
        );

        let response = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .inspect_err(|e| tracing::error!("Push to {} failed: {}", url, e))?;

        self.handle_push_response(response).await
    }

    async fn handle_push_response(&self, response: reqwest::Response) -> Result<()> {
        let status = response.status();

        if status != StatusCode::NO_CONTENT {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::warn!("Loki rejected push with status {}: {}", status.as_u16(), body);
            return Err(ClientError::rejected(status.as_u16(), body));
        }

        Ok(())
    }
}
