use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::{ChronicleError, Result};

pub const DEFAULT_REGION: &str = "us";
pub const INGESTION_API_HOST: &str = "malachiteingestion-pa.googleapis.com";
pub const REFERENCE_LIST_API_HOST: &str = "backstory.googleapis.com";
pub const SIZE_THRESHOLD_BYTES: usize = 950_000;
pub const LOG_BATCH_SIZE: usize = 100;

#[derive(Clone, PartialEq)]
pub struct Config {
    pub customer_id: String,
    pub region: String,
    pub namespace: Option<String>,
    pub service_account: Option<String>,
    pub service_account_file: Option<PathBuf>,
    pub access_token: Option<String>,
    pub scheme: String,
    pub ingestion_host: String,
    pub reference_list_host: String,
    pub size_threshold_bytes: usize,
    pub log_batch_size: usize,
    pub request_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            customer_id: String::new(),
            region: DEFAULT_REGION.to_string(),
            namespace: None,
            service_account: None,
            service_account_file: None,
            access_token: None,
            scheme: "https".to_string(),
            ingestion_host: INGESTION_API_HOST.to_string(),
            reference_list_host: REFERENCE_LIST_API_HOST.to_string(),
            size_threshold_bytes: SIZE_THRESHOLD_BYTES,
            log_batch_size: LOG_BATCH_SIZE,
            request_timeout: Duration::from_secs(60),
        }
    }
}

// Credentials never go to logs.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("customer_id", &self.customer_id)
            .field("region", &self.region)
            .field("namespace", &self.namespace)
            .field(
                "service_account",
                &self.service_account.as_ref().map(|_| "<redacted>"),
            )
            .field("service_account_file", &self.service_account_file)
            .field(
                "access_token",
                &self.access_token.as_ref().map(|_| "<redacted>"),
            )
            .field("scheme", &self.scheme)
            .field("ingestion_host", &self.ingestion_host)
            .field("reference_list_host", &self.reference_list_host)
            .field("size_threshold_bytes", &self.size_threshold_bytes)
            .field("log_batch_size", &self.log_batch_size)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let mut cfg = Self::default();
        let config_path = config_file_path();
        if let Some(file_overrides) = load_file_overrides(&config_path)? {
            apply_overrides(&mut cfg, file_overrides, "config file")?;
        }
        let env_overrides = load_env_overrides()?;
        apply_overrides(&mut cfg, env_overrides, "environment")?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if self.customer_id.trim().is_empty() {
            return Err(ChronicleError::Config(
                "customer_id is required (set CHRONICLE_CUSTOMER_ID)".to_string(),
            ));
        }
        if self.size_threshold_bytes == 0 {
            return Err(ChronicleError::Config(
                "size_threshold_bytes must be greater than zero".to_string(),
            ));
        }
        if self.log_batch_size == 0 {
            return Err(ChronicleError::Config(
                "log_batch_size must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Namespace to stamp on requests; blank values count as unset.
    pub fn effective_namespace(&self) -> Option<&str> {
        self.namespace
            .as_deref()
            .map(str::trim)
            .filter(|ns| !ns.is_empty())
    }

    /// Pre-issued bearer token, when one is configured instead of a service account.
    pub fn effective_access_token(&self) -> Option<&str> {
        self.access_token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }

    /// Raw service account JSON, inline value first, then the key file.
    pub fn service_account_json(&self) -> Result<String> {
        if let Some(raw) = self.service_account.as_ref().filter(|s| !s.trim().is_empty()) {
            return Ok(raw.clone());
        }
        if let Some(path) = &self.service_account_file {
            return fs::read_to_string(path).map_err(|e| {
                ChronicleError::Config(format!(
                    "failed reading service account {}: {e}",
                    path.display()
                ))
            });
        }
        Err(ChronicleError::Config(
            "no service account configured (set CHRONICLE_SERVICE_ACCOUNT or CHRONICLE_SERVICE_ACCOUNT_FILE)"
                .to_string(),
        ))
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigOverrides {
    customer_id: Option<String>,
    region: Option<String>,
    namespace: Option<String>,
    service_account: Option<String>,
    service_account_file: Option<PathBuf>,
    access_token: Option<String>,
    scheme: Option<String>,
    ingestion_host: Option<String>,
    reference_list_host: Option<String>,
    size_threshold_bytes: Option<usize>,
    log_batch_size: Option<usize>,
    request_timeout: Option<String>,
}

fn config_file_path() -> PathBuf {
    if let Ok(path) = env::var("CHRONICLE_CONFIG") {
        return PathBuf::from(path);
    }

    let home = env::var("HOME").unwrap_or_else(|_| ".".to_string());
    let config_home = env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(home).join(".config"));
    config_home.join("chronicle/config.toml")
}

fn load_file_overrides(path: &Path) -> Result<Option<ConfigOverrides>> {
    if !path.exists() {
        return Ok(None);
    }

    let raw = fs::read_to_string(path)
        .map_err(|e| ChronicleError::Config(format!("failed reading {}: {e}", path.display())))?;
    let parsed: ConfigOverrides = toml::from_str(&raw)
        .map_err(|e| ChronicleError::Config(format!("failed parsing {}: {e}", path.display())))?;
    Ok(Some(parsed))
}

fn load_env_overrides() -> Result<ConfigOverrides> {
    Ok(ConfigOverrides {
        customer_id: env::var("CHRONICLE_CUSTOMER_ID").ok(),
        region: env::var("CHRONICLE_REGION").ok(),
        namespace: env::var("CHRONICLE_NAMESPACE").ok(),
        service_account: env::var("CHRONICLE_SERVICE_ACCOUNT").ok(),
        service_account_file: env::var("CHRONICLE_SERVICE_ACCOUNT_FILE")
            .ok()
            .map(PathBuf::from),
        access_token: env::var("CHRONICLE_ACCESS_TOKEN").ok(),
        scheme: env::var("CHRONICLE_SCHEME").ok(),
        ingestion_host: env::var("CHRONICLE_INGESTION_HOST").ok(),
        reference_list_host: env::var("CHRONICLE_REFERENCE_LIST_HOST").ok(),
        size_threshold_bytes: parse_env_usize("CHRONICLE_SIZE_THRESHOLD_BYTES")?,
        log_batch_size: parse_env_usize("CHRONICLE_LOG_BATCH_SIZE")?,
        request_timeout: env::var("CHRONICLE_REQUEST_TIMEOUT").ok(),
    })
}

fn parse_env_usize(key: &str) -> Result<Option<usize>> {
    match env::var(key) {
        Ok(v) => Ok(Some(v.trim().parse::<usize>().map_err(|e| {
            ChronicleError::Config(format!("bad {key} in environment: {e}"))
        })?)),
        Err(_) => Ok(None),
    }
}

fn apply_overrides(cfg: &mut Config, overrides: ConfigOverrides, source: &str) -> Result<()> {
    if let Some(v) = overrides.customer_id {
        cfg.customer_id = v;
    }
    if let Some(v) = overrides.region {
        cfg.region = v;
    }
    if let Some(v) = overrides.namespace {
        cfg.namespace = Some(v);
    }
    if let Some(v) = overrides.service_account {
        cfg.service_account = Some(v);
    }
    if let Some(v) = overrides.service_account_file {
        cfg.service_account_file = Some(v);
    }
    if let Some(v) = overrides.access_token {
        cfg.access_token = Some(v);
    }
    if let Some(v) = overrides.scheme {
        cfg.scheme = v;
    }
    if let Some(v) = overrides.ingestion_host {
        cfg.ingestion_host = v;
    }
    if let Some(v) = overrides.reference_list_host {
        cfg.reference_list_host = v;
    }
    if let Some(v) = overrides.size_threshold_bytes {
        cfg.size_threshold_bytes = v;
    }
    if let Some(v) = overrides.log_batch_size {
        cfg.log_batch_size = v;
    }
    if let Some(v) = overrides.request_timeout {
        cfg.request_timeout = humantime::parse_duration(&v).map_err(|e| {
            ChronicleError::Config(format!("bad request_timeout in {source}: {e} (value={v})"))
        })?;
    }
    Ok(())
}
