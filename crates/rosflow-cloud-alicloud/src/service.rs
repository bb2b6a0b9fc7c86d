//! ROS describe and refresh operations

use crate::config::RosConfig;
use crate::error::RpcError;
use crate::kind::RosResourceKind;
use crate::model::{
    RosChangeSet, RosObject, RosStack, RosStackGroup, RosStackInstance, RosTemplate,
    RosTemplateScratch, StackPolicy,
};
use crate::rpc::{RpcClient, RpcRequest, add_debug, is_expected_error, need_retry};
use async_trait::async_trait;
use rosflow_cloud::{
    CloudError, Describe, Described, Refresher, Result, RetryError, RetryPolicy, parse_resource_id,
    retry_with,
};
use serde_json::Value;
use std::marker::PhantomData;

/// Accessor for ROS stacks, change sets, stack groups, templates and friends
///
/// The service holds no mutable state, so one instance can serve any number
/// of independent polls.
pub struct RosService<C> {
    client: C,
    config: RosConfig,
}

impl<C: RpcClient> RosService<C> {
    pub fn new(client: C, config: RosConfig) -> Self {
        Self { client, config }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn config(&self) -> &RosConfig {
        &self.config
    }

    /// Request map pre-filled with the region
    pub(crate) fn base_request(&self) -> RpcRequest {
        let mut request = RpcRequest::new();
        request.insert(
            "RegionId".to_string(),
            Value::String(self.config.region_id.clone()),
        );
        request
    }

    /// One RPC round trip, traced whatever the outcome
    pub(crate) async fn call(
        &self,
        action: &str,
        request: &RpcRequest,
        autoretry: bool,
    ) -> std::result::Result<Value, RpcError> {
        let outcome = self
            .client
            .rpc_post(
                &self.config.product,
                &self.config.api_version,
                action,
                request,
                autoretry,
            )
            .await;
        add_debug(action, outcome.as_ref(), request);
        outcome
    }

    /// [`call`](Self::call) retried while `is_retryable` holds and the policy allows
    pub(crate) async fn call_with_retry<R>(
        &self,
        policy: &RetryPolicy,
        is_retryable: R,
        action: &str,
        request: &RpcRequest,
        autoretry: bool,
    ) -> std::result::Result<Value, RetryError<RpcError>>
    where
        R: Fn(&RpcError) -> bool,
    {
        retry_with(policy, is_retryable, || self.call(action, request, autoretry)).await
    }

    /// Fetch the raw object of `kind` identified by `id`
    ///
    /// Composite ids are split before anything is sent; a wrong part count
    /// fails with [`CloudError::MalformedId`] and issues no call.
    pub async fn describe_raw(&self, kind: RosResourceKind, id: &str) -> Result<Value> {
        let action = kind.action();
        let fields = kind.id_fields();
        let parts = if fields.len() > 1 {
            parse_resource_id(id, fields.len())?
        } else {
            vec![id.to_string()]
        };

        let mut request = self.base_request();
        for (field, part) in fields.iter().zip(parts) {
            request.insert(field.to_string(), Value::String(part));
        }
        kind.extend_request(&mut request);

        let outcome = if kind.retries() {
            self.call_with_retry(&self.config.describe_retry, need_retry, action, &request, true)
                .await
        } else {
            self.call(action, &request, true)
                .await
                .map_err(RetryError::Permanent)
        };

        let response = match outcome {
            Ok(response) => response,
            Err(RetryError::Permanent(err)) if is_expected_error(&err, kind.not_found_codes()) => {
                return Err(not_found(kind, id, &err));
            }
            Err(err) => {
                return Err(remote_error(
                    action,
                    id,
                    &request,
                    &self.config.describe_retry,
                    err,
                ));
            }
        };

        let path = kind.path();
        match path.extract(&response) {
            Some(object) if object.is_object() => Ok(object.clone()),
            _ => Err(CloudError::MissingAttribute {
                id: id.to_string(),
                path: path.to_string(),
                response: response.to_string(),
            }),
        }
    }

    /// Fetch and decode a typed object
    pub async fn describe<T: RosObject>(&self, id: &str) -> Result<T> {
        let raw = self.describe_raw(T::KIND, id).await?;
        serde_json::from_value(raw).map_err(|source| CloudError::Decode {
            kind: T::KIND.label().to_string(),
            id: id.to_string(),
            source,
        })
    }

    pub async fn describe_ros_change_set(&self, id: &str) -> Result<RosChangeSet> {
        self.describe(id).await
    }

    pub async fn describe_ros_stack(&self, id: &str) -> Result<RosStack> {
        self.describe(id).await
    }

    pub async fn get_stack_policy(&self, id: &str) -> Result<StackPolicy> {
        self.describe(id).await
    }

    pub async fn describe_ros_stack_group(&self, id: &str) -> Result<RosStackGroup> {
        self.describe(id).await
    }

    pub async fn describe_ros_template(&self, id: &str) -> Result<RosTemplate> {
        self.describe(id).await
    }

    /// `id` is `<stack group name>:<account id>:<region id>`
    pub async fn describe_ros_stack_instance(&self, id: &str) -> Result<RosStackInstance> {
        self.describe(id).await
    }

    pub async fn describe_ros_template_scratch(&self, id: &str) -> Result<RosTemplateScratch> {
        self.describe(id).await
    }

    /// Single-shot refresh for any pollable kind
    pub fn state_refresh_func<T, I, S>(
        &self,
        id: impl Into<String>,
        fail_states: I,
    ) -> Refresher<RosDescribe<'_, C, T>>
    where
        T: RosObject + Described,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Refresher::new(
            RosDescribe {
                service: self,
                id: id.into(),
                _object: PhantomData,
            },
            fail_states,
        )
    }

    pub fn ros_change_set_state_refresh_func<I, S>(
        &self,
        id: impl Into<String>,
        fail_states: I,
    ) -> Refresher<RosDescribe<'_, C, RosChangeSet>>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.state_refresh_func(id, fail_states)
    }

    pub fn ros_stack_state_refresh_func<I, S>(
        &self,
        id: impl Into<String>,
        fail_states: I,
    ) -> Refresher<RosDescribe<'_, C, RosStack>>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.state_refresh_func(id, fail_states)
    }

    pub fn ros_stack_group_state_refresh_func<I, S>(
        &self,
        id: impl Into<String>,
        fail_states: I,
    ) -> Refresher<RosDescribe<'_, C, RosStackGroup>>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.state_refresh_func(id, fail_states)
    }

    pub fn ros_stack_instance_state_refresh_func<I, S>(
        &self,
        id: impl Into<String>,
        fail_states: I,
    ) -> Refresher<RosDescribe<'_, C, RosStackInstance>>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.state_refresh_func(id, fail_states)
    }

    pub fn ros_template_scratch_state_refresh_func<I, S>(
        &self,
        id: impl Into<String>,
        fail_states: I,
    ) -> Refresher<RosDescribe<'_, C, RosTemplateScratch>>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.state_refresh_func(id, fail_states)
    }
}

fn not_found(kind: RosResourceKind, id: &str, err: &RpcError) -> CloudError {
    tracing::debug!("{} {} not found: {}", kind.label(), id, err);
    let request_id = if kind.reports_request_id() {
        err.request_id().map(str::to_string)
    } else {
        None
    };
    CloudError::ResourceNotFound {
        kind: kind.label().to_string(),
        id: id.to_string(),
        request_id,
    }
}

/// Wrap a failed call with its action, id and request
pub(crate) fn remote_error(
    action: &str,
    id: &str,
    request: &RpcRequest,
    policy: &RetryPolicy,
    err: RetryError<RpcError>,
) -> CloudError {
    let request = Value::Object(request.clone()).to_string();
    match err {
        RetryError::Exhausted { last, .. } => CloudError::TransientFault {
            action: action.to_string(),
            id: id.to_string(),
            timeout: policy.timeout,
            code: last.code().to_string(),
            message: last.message().to_string(),
            request,
        },
        RetryError::Permanent(last) => CloudError::Remote {
            action: action.to_string(),
            id: id.to_string(),
            code: last.code().to_string(),
            message: last.message().to_string(),
            request,
        },
    }
}

/// Describe bound to one object, the building block of a [`Refresher`]
pub struct RosDescribe<'a, C, T> {
    service: &'a RosService<C>,
    id: String,
    _object: PhantomData<fn() -> T>,
}

#[async_trait]
impl<'a, C, T> Describe for RosDescribe<'a, C, T>
where
    C: RpcClient,
    T: RosObject + Described,
{
    type Object = T;

    async fn describe(&self) -> Result<T> {
        self.service.describe::<T>(&self.id).await
    }
}
