use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChronicleError {
    #[error("authentication error: {0}")]
    Auth(String),

    #[error(
        "error occurred while pushing logs to Chronicle. Status code {status}. Reason: {reason}"
    )]
    Ingestion { status: u16, reason: String },

    #[error(
        "error occurred while fetching reference list {name}. Status code: {}. Reason: {reason}",
        .status.map_or_else(|| "none".to_string(), |s| s.to_string())
    )]
    ReferenceList {
        name: String,
        status: Option<u16>,
        reason: String,
    },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("serialization error: {0}")]
    Serialize(String),

    #[error("transport error: {0}")]
    Transport(String),
}

impl ChronicleError {
    /// HTTP status attached to the error, when the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Ingestion { status, .. } => Some(*status),
            Self::ReferenceList { status, .. } => *status,
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ChronicleError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ingestion_error_carries_status_and_reason() {
        let err = ChronicleError::Ingestion {
            status: 400,
            reason: "invalid logType".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("Status code 400"));
        assert!(msg.contains("invalid logType"));
        assert_eq!(err.status(), Some(400));
    }

    #[test]
    fn reference_list_error_without_status() {
        let err = ChronicleError::ReferenceList {
            name: "allowlist".to_string(),
            status: None,
            reason: "connection refused".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "error occurred while fetching reference list allowlist. Status code: none. Reason: connection refused"
        );
        assert_eq!(err.status(), None);
    }
}
