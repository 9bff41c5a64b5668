use serde::{Deserialize, Serialize};

use crate::error::{ChronicleError, Result};

/// One raw log line as Chronicle expects it: the record's compact JSON text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Envelope {
    #[serde(rename = "logText")]
    pub log_text: String,
}

impl Envelope {
    pub fn from_record<T: Serialize + ?Sized>(record: &T) -> Result<Self> {
        let log_text = serde_json::to_string(record)
            .map_err(|e| ChronicleError::Serialize(format!("failed to encode log record: {e}")))?;
        Ok(Self { log_text })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct IngestionRequest {
    pub customer_id: String,
    pub log_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    pub entries: Vec<Envelope>,
}

impl IngestionRequest {
    pub fn new(
        customer_id: impl Into<String>,
        log_type: impl Into<String>,
        namespace: Option<String>,
    ) -> Self {
        Self {
            customer_id: customer_id.into(),
            log_type: log_type.into(),
            namespace,
            entries: Vec::new(),
        }
    }
}
