pub mod auth;
pub mod batcher;
pub mod reference_list;
mod response;

use chronicle_core::config::Config;
use chronicle_core::error::Result;
use serde::Serialize;

pub use auth::{AuthorizedSession, BACKSTORY_SCOPE, Credentials, INGESTION_SCOPE, ServiceAccountKey};
pub use batcher::{BatchSummary, LogBatcher};
pub use reference_list::ReferenceListFetcher;

/// Authenticates with the ingestion scope and pushes `records` in
/// size-bounded batches.
pub async fn ingest<R: Serialize>(cfg: &Config, records: &[R], log_type: &str) -> Result<BatchSummary> {
    let session = AuthorizedSession::from_config(cfg, &[INGESTION_SCOPE])?;
    LogBatcher::new(session, cfg)?.ingest(records, log_type).await
}

/// Authenticates with the backstory scope and fetches one reference list.
pub async fn get_reference_list(cfg: &Config, list_name: &str) -> Result<Vec<String>> {
    let session = AuthorizedSession::from_config(cfg, &[BACKSTORY_SCOPE])?;
    ReferenceListFetcher::new(session, cfg).fetch(list_name).await
}
