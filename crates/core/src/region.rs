use url::Url;

use crate::config::Config;
use crate::error::{ChronicleError, Result};

pub const BATCH_CREATE_PATH: &str = "/v2/unstructuredlogentries:batchCreate";
const LISTS_SEGMENTS: [&str; 2] = ["v2", "lists"];

/// Routes `host` to the regional instance; `us` (any case) or an empty region
/// maps to the bare host.
pub fn regional_host(region: &str, host: &str) -> String {
    let region = region.trim();
    if region.is_empty() || region.eq_ignore_ascii_case("us") {
        host.to_string()
    } else {
        format!("{}-{host}", region.to_ascii_lowercase())
    }
}

pub fn ingestion_url(cfg: &Config) -> String {
    format!(
        "{}://{}{BATCH_CREATE_PATH}",
        cfg.scheme,
        regional_host(&cfg.region, &cfg.ingestion_host)
    )
}

/// `list_name` is a single path segment; `/`, `?` and `#` are percent-encoded.
pub fn reference_list_url(cfg: &Config, list_name: &str) -> Result<String> {
    let base = format!(
        "{}://{}",
        cfg.scheme,
        regional_host(&cfg.region, &cfg.reference_list_host)
    );
    let mut url = Url::parse(&base)
        .map_err(|e| ChronicleError::Config(format!("bad reference list host {base}: {e}")))?;
    url.path_segments_mut()
        .map_err(|_| ChronicleError::Config(format!("reference list host {base} cannot carry a path")))?
        .clear()
        .extend(LISTS_SEGMENTS)
        .push(list_name);
    Ok(url.into())
}
