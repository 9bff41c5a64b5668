use chronicle_core::config::Config;
use chronicle_core::error::{ChronicleError, Result};
use chronicle_core::model::reference_list::ReferenceListResponse;
use chronicle_core::region::reference_list_url;
use chronicle_core::transport::{Method, Transport};
use tracing::{debug, info, warn};

use crate::response::error_reason;

const JSON_HEADERS: &[(&str, &str)] = &[("Content-Type", "application/json")];

pub struct ReferenceListFetcher<T> {
    transport: T,
    config: Config,
}

impl<T: Transport> ReferenceListFetcher<T> {
    pub fn new(transport: T, cfg: &Config) -> Self {
        Self {
            transport,
            config: cfg.clone(),
        }
    }

    /// Trimmed, non-empty lines of `list_name`, in list order.
    pub async fn fetch(&self, list_name: &str) -> Result<Vec<String>> {
        info!(list = list_name, "fetching reference list data");
        let url = reference_list_url(&self.config, list_name)?;

        let resp = self
            .transport
            .request(Method::Get, &url, None, JSON_HEADERS)
            .await
            .map_err(|e| list_error(list_name, None, e.to_string()))?;

        if !resp.is_success() {
            let reason = error_reason(&resp.body);
            warn!(list = list_name, status = resp.status, reason = %reason, "reference list request failed");
            return Err(list_error(list_name, Some(resp.status), reason));
        }

        let body = resp.trimmed_body();
        if body.is_empty() {
            return Ok(Vec::new());
        }
        let parsed: ReferenceListResponse = serde_json::from_slice(body).map_err(|e| {
            list_error(
                list_name,
                Some(resp.status),
                format!("invalid reference list response: {e}"),
            )
        })?;

        let lines = parsed.into_lines();
        debug!(list = list_name, count = lines.len(), "reference list fetched");
        Ok(lines)
    }
}

fn list_error(name: &str, status: Option<u16>, reason: String) -> ChronicleError {
    ChronicleError::ReferenceList {
        name: name.to_string(),
        status,
        reason,
    }
}
