use chronicle_core::config::Config;
use chronicle_core::error::{ChronicleError, Result};
use chronicle_core::model::entry::{Envelope, IngestionRequest};
use chronicle_core::region::ingestion_url;
use chronicle_core::size::{len_after_extend, len_after_push, serialized_len};
use chronicle_core::transport::{Method, Transport};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::response::error_reason;

const JSON_HEADERS: &[(&str, &str)] = &[("Content-Type", "application/json")];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub requests: usize,
    pub entries: usize,
}

/// Packs records into `batchCreate` bodies no larger than the size threshold
/// and pushes them one request at a time.
pub struct LogBatcher<T> {
    transport: T,
    url: String,
    customer_id: String,
    namespace: Option<String>,
    size_threshold: usize,
    batch_size: usize,
}

impl<T: Transport> LogBatcher<T> {
    pub fn new(transport: T, cfg: &Config) -> Result<Self> {
        cfg.validate()?;
        Ok(Self {
            transport,
            url: ingestion_url(cfg),
            customer_id: cfg.customer_id.clone(),
            namespace: cfg.effective_namespace().map(str::to_string),
            size_threshold: cfg.size_threshold_bytes,
            batch_size: cfg.log_batch_size,
        })
    }

    /// Sends every record under `log_type`. Stops at the first rejected
    /// batch; batches already accepted stay ingested.
    pub async fn ingest<R: Serialize>(&self, records: &[R], log_type: &str) -> Result<BatchSummary> {
        let entries = records
            .iter()
            .map(Envelope::from_record)
            .collect::<Result<Vec<_>>>()?;

        let mut body = IngestionRequest::new(&self.customer_id, log_type, self.namespace.clone());
        let empty_len = serialized_len(&body)?;
        let mut summary = BatchSummary::default();
        let mut index = 0;

        while index < entries.len() {
            let end = (index + self.batch_size).min(entries.len());
            let probe = &entries[index..end];
            let body_len = serialized_len(&body)?;
            let probe_len = serialized_len(probe)?;
            let has_entries = !body.entries.is_empty();

            if probe_len < self.size_threshold
                && len_after_extend(body_len, has_entries, probe_len) <= self.size_threshold
            {
                debug!(count = probe.len(), "adding a batch of logs to the ingestion payload");
                body.entries.extend_from_slice(probe);
                index = end;
                continue;
            }

            // Windows that could never fit a request on their own are packed one
            // entry at a time. An empty body always takes the next entry, even
            // one over the threshold.
            let too_big_alone = probe_len >= self.size_threshold
                || len_after_extend(empty_len, false, probe_len) > self.size_threshold;
            if too_big_alone {
                debug!(
                    index,
                    probe_bytes = probe_len,
                    "next batch does not fit; packing logs one at a time"
                );
                let item_len = serialized_len(&entries[index])?;
                if !has_entries
                    || len_after_push(body_len, has_entries, item_len) <= self.size_threshold
                {
                    if item_len > self.size_threshold {
                        warn!(
                            index,
                            bytes = item_len,
                            threshold = self.size_threshold,
                            "single log exceeds the size threshold; sending it alone"
                        );
                    }
                    body.entries.push(entries[index].clone());
                    index += 1;
                    continue;
                }
            }

            self.flush(&mut body, &mut summary).await?;
        }

        if !body.entries.is_empty() {
            self.flush(&mut body, &mut summary).await?;
        }
        Ok(summary)
    }

    async fn flush(&self, body: &mut IngestionRequest, summary: &mut BatchSummary) -> Result<()> {
        let count = body.entries.len();
        info!(count, log_type = %body.log_type, "attempting to push logs to Chronicle");

        let payload = serde_json::to_vec(&*body)
            .map_err(|e| ChronicleError::Serialize(format!("failed to encode request: {e}")))?;
        let resp = self
            .transport
            .request(Method::Post, &self.url, Some(payload), JSON_HEADERS)
            .await?;

        if !resp.is_success() {
            let reason = error_reason(&resp.body);
            warn!(status = resp.status, reason = %reason, "Chronicle rejected log batch");
            return Err(ChronicleError::Ingestion {
                status: resp.status,
                reason,
            });
        }

        match resp.trimmed_body() {
            b"" | b"{}" => info!(count, "logs pushed successfully to Chronicle"),
            other => debug!(
                count,
                response = %String::from_utf8_lossy(other),
                "Chronicle accepted logs with a response body"
            ),
        }

        summary.requests += 1;
        summary.entries += count;
        body.entries.clear();
        Ok(())
    }
}
