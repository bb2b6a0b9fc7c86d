//! RPC client abstraction
//!
//! Alibaba Cloud RPC-style APIs take a flat string-keyed parameter map per
//! action. List parameters are encoded as 1-based indexed keys
//! (`ResourceId.1`, `Tag.1.Key`, `TagKey.2`, ...). Signing and HTTP transport
//! live behind [`RpcClient`].

use crate::error::RpcError;
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::sync::Arc;

/// Flat request parameters of one RPC action
pub type RpcRequest = Map<String, Value>;

pub const THROTTLING: &str = "Throttling";
pub const SERVICE_UNAVAILABLE: &str = "ServiceUnavailable";
pub const REJECTED_THROTTLING: &str = "Rejected.Throttling";

// Returned with HTTP 500 by services that are already enabled for the account.
const ALREADY_ACTIVATED_MARKER: &str = "code: 500, 您已开通过";

const CLIENT_TOKEN_MAX_LEN: usize = 64;

/// A connected client bound to credentials and an endpoint resolver
#[async_trait]
pub trait RpcClient: Send + Sync {
    /// Issue one RPC `action` against `product`/`version`
    async fn rpc_post(
        &self,
        product: &str,
        version: &str,
        action: &str,
        request: &RpcRequest,
        autoretry: bool,
    ) -> std::result::Result<Value, RpcError>;
}

#[async_trait]
impl<T: RpcClient + ?Sized> RpcClient for Arc<T> {
    async fn rpc_post(
        &self,
        product: &str,
        version: &str,
        action: &str,
        request: &RpcRequest,
        autoretry: bool,
    ) -> std::result::Result<Value, RpcError> {
        (**self)
            .rpc_post(product, version, action, request, autoretry)
            .await
    }
}

/// Whether the error carries one of `codes`, either as its code or inside its message
pub fn is_expected_error(err: &RpcError, codes: &[&str]) -> bool {
    codes
        .iter()
        .any(|code| err.code() == *code || err.message().contains(code))
}

/// Transient fault classification
pub fn need_retry(err: &RpcError) -> bool {
    match err {
        RpcError::Transport(_) => true,
        RpcError::Api {
            code,
            message,
            status_code,
            ..
        } => {
            if message.contains(ALREADY_ACTIVATED_MARKER) {
                return false;
            }
            code == SERVICE_UNAVAILABLE
                || code == REJECTED_THROTTLING
                || code.starts_with(THROTTLING)
                || status_code.is_some_and(|s| (500..600).contains(&s))
        }
    }
}

/// Only plain throttling is worth retrying
pub fn is_throttling(err: &RpcError) -> bool {
    is_expected_error(err, &[THROTTLING])
}

/// Idempotency token for actions that accept `ClientToken`
pub fn build_client_token(action: &str) -> String {
    let mut token = format!(
        "TF-{}-{}-{}",
        action,
        chrono::Utc::now().timestamp(),
        uuid::Uuid::new_v4().simple()
    );
    token.truncate(CLIENT_TOKEN_MAX_LEN);
    token
}

/// Trace one call with its request and either the response or the error
pub(crate) fn add_debug(
    action: &str,
    outcome: std::result::Result<&Value, &RpcError>,
    request: &RpcRequest,
) {
    let request = serde_json::Value::Object(request.clone());
    match outcome {
        Ok(response) => {
            tracing::debug!(action, request = %request, response = %response, "RPC call finished");
        }
        Err(err) => {
            tracing::debug!(action, request = %request, error = %err, "RPC call failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expected_error_by_code_or_message() {
        let err = RpcError::api("StackNotFound", "The Stack (s-1) could not be found.");
        assert!(is_expected_error(&err, &["StackNotFound"]));
        assert!(!is_expected_error(&err, &["ChangeSetNotFound"]));

        let wrapped = RpcError::api("InvalidParameter", "upstream: StackGroupNotFound");
        assert!(is_expected_error(&wrapped, &["StackGroupNotFound"]));
    }

    #[test]
    fn test_need_retry() {
        assert!(need_retry(&RpcError::api("Throttling.User", "slow down")));
        assert!(need_retry(&RpcError::api("ServiceUnavailable", "try later")));
        assert!(need_retry(&RpcError::api("Rejected.Throttling", "")));
        assert!(need_retry(&RpcError::Transport("connection reset".into())));
        assert!(need_retry(
            &RpcError::api("InternalError", "oops").with_status_code(503)
        ));
        assert!(!need_retry(
            &RpcError::api("InternalError", "code: 500, 您已开通过").with_status_code(500)
        ));
        assert!(!need_retry(&RpcError::api("StackNotFound", "gone").with_status_code(404)));
    }

    #[test]
    fn test_is_throttling() {
        assert!(is_throttling(&RpcError::api("Throttling", "")));
        assert!(is_throttling(&RpcError::api("Unknown", "Throttling: request was denied")));
        assert!(!is_throttling(&RpcError::api("Throttling.Api", "")));
        assert!(!is_throttling(&RpcError::api("ServiceUnavailable", "")));
    }

    #[test]
    fn test_client_token() {
        let token = build_client_token("GetStack");
        assert!(token.starts_with("TF-GetStack-"));
        assert!(token.len() <= 64);

        let long = build_client_token(&"A".repeat(80));
        assert_eq!(long.len(), 64);
    }
}
