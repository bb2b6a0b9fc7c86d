//! Cloud provider error types

use std::time::Duration;
use thiserror::Error;

/// Cloud provider errors
#[derive(Error, Debug)]
pub enum CloudError {
    /// The remote object does not exist (or no longer exists).
    #[error("Resource not found: {kind} {id}")]
    ResourceNotFound {
        kind: String,
        id: String,
        request_id: Option<String>,
    },

    /// The remote status reached one of the caller-declared fail states.
    #[error("Failed to reach target status. Current status is {status}")]
    FailedToReachTargetStatus { status: String },

    #[error("Malformed resource id '{id}': expected {expected} parts, found {found}")]
    MalformedId {
        id: String,
        expected: usize,
        found: usize,
    },

    #[error(
        "{action} for {id} kept failing with a transient fault for {timeout:?}: [{code}] {message}\nrequest: {request}"
    )]
    TransientFault {
        action: String,
        id: String,
        timeout: Duration,
        code: String,
        message: String,
        request: String,
    },

    #[error("{action} failed for {id}: [{code}] {message}\nrequest: {request}")]
    Remote {
        action: String,
        id: String,
        code: String,
        message: String,
        request: String,
    },

    #[error("Failed to get attribute {path} of {id}, response: {response}")]
    MissingAttribute {
        id: String,
        path: String,
        response: String,
    },

    #[error("Failed to decode {kind} {id}: {source}")]
    Decode {
        kind: String,
        id: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
}

/// Coarse classification of a [`CloudError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    PermanentFailure,
    MalformedInput,
    TransientFault,
    Remote,
    Decode,
    Config,
}

impl CloudError {
    pub fn not_found(kind: impl Into<String>, id: impl Into<String>) -> Self {
        CloudError::ResourceNotFound {
            kind: kind.into(),
            id: id.into(),
            request_id: None,
        }
    }

    pub fn error_kind(&self) -> ErrorKind {
        match self {
            CloudError::ResourceNotFound { .. } => ErrorKind::NotFound,
            CloudError::FailedToReachTargetStatus { .. } => ErrorKind::PermanentFailure,
            CloudError::MalformedId { .. } => ErrorKind::MalformedInput,
            CloudError::TransientFault { .. } => ErrorKind::TransientFault,
            CloudError::Remote { .. } => ErrorKind::Remote,
            CloudError::MissingAttribute { .. } | CloudError::Decode { .. } => ErrorKind::Decode,
            CloudError::InvalidConfig(_) | CloudError::MissingEnvVar(_) => ErrorKind::Config,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.error_kind() == ErrorKind::NotFound
    }

    pub fn is_failed_status(&self) -> bool {
        self.error_kind() == ErrorKind::PermanentFailure
    }
}

pub type Result<T> = std::result::Result<T, CloudError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind() {
        assert!(CloudError::not_found("RosStack", "s-1").is_not_found());
        assert!(
            CloudError::FailedToReachTargetStatus {
                status: "CREATE_FAILED".to_string()
            }
            .is_failed_status()
        );
        let malformed = CloudError::MalformedId {
            id: "a:b".to_string(),
            expected: 3,
            found: 2,
        };
        assert_eq!(malformed.error_kind(), ErrorKind::MalformedInput);
        assert!(!malformed.is_not_found());
    }

    #[test]
    fn test_display_includes_context() {
        let err = CloudError::Remote {
            action: "GetStack".to_string(),
            id: "s-1".to_string(),
            code: "Forbidden".to_string(),
            message: "denied".to_string(),
            request: r#"{"StackId":"s-1"}"#.to_string(),
        };
        let text = err.to_string();
        assert!(text.contains("GetStack"));
        assert!(text.contains("Forbidden"));
        assert!(text.contains(r#""StackId":"s-1""#));
    }

    #[test]
    fn test_transient_fault_echoes_request() {
        let err = CloudError::TransientFault {
            action: "GetStack".to_string(),
            id: "s-1".to_string(),
            timeout: Duration::from_secs(300),
            code: "Throttling".to_string(),
            message: "slow down".to_string(),
            request: r#"{"StackId":"s-1"}"#.to_string(),
        };
        assert_eq!(err.error_kind(), ErrorKind::TransientFault);
        let text = err.to_string();
        assert!(text.contains("300s"));
        assert!(text.contains(r#"request: {"StackId":"s-1"}"#));
    }
}
