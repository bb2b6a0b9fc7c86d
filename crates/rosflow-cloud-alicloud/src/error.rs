//! Alibaba Cloud RPC error types

use thiserror::Error;

pub use rosflow_cloud::{CloudError, Result};

/// Failure of a single RPC call, before any classification
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RpcError {
    #[error("[{code}] {message}")]
    Api {
        code: String,
        message: String,
        request_id: Option<String>,
        status_code: Option<u16>,
    },

    /// The request never produced an API response (connection reset, DNS, ...)
    #[error("transport error: {0}")]
    Transport(String),
}

impl RpcError {
    pub fn api(code: impl Into<String>, message: impl Into<String>) -> Self {
        RpcError::Api {
            code: code.into(),
            message: message.into(),
            request_id: None,
            status_code: None,
        }
    }

    pub fn with_request_id(self, id: impl Into<String>) -> Self {
        match self {
            RpcError::Api {
                code,
                message,
                status_code,
                ..
            } => RpcError::Api {
                code,
                message,
                request_id: Some(id.into()),
                status_code,
            },
            other => other,
        }
    }

    pub fn with_status_code(self, status: u16) -> Self {
        match self {
            RpcError::Api {
                code,
                message,
                request_id,
                ..
            } => RpcError::Api {
                code,
                message,
                request_id,
                status_code: Some(status),
            },
            other => other,
        }
    }

    /// Error code, `Transport` for transport failures
    pub fn code(&self) -> &str {
        match self {
            RpcError::Api { code, .. } => code,
            RpcError::Transport(_) => "Transport",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            RpcError::Api { message, .. } => message,
            RpcError::Transport(message) => message,
        }
    }

    pub fn request_id(&self) -> Option<&str> {
        match self {
            RpcError::Api { request_id, .. } => request_id.as_deref(),
            RpcError::Transport(_) => None,
        }
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            RpcError::Api { status_code, .. } => *status_code,
            RpcError::Transport(_) => None,
        }
    }
}
