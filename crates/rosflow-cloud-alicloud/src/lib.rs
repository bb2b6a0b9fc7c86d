//! Alibaba Cloud ROS accessor for RosFlow
//!
//! Reads, polls and tags Resource Orchestration Service objects (stacks,
//! change sets, stack groups, stack instances, templates and template
//! scratches) through an RPC client supplied by the caller.
//!
//! # Features
//!
//! - Typed describe operations with per-kind not-found classification
//! - Single-shot state refresh for external convergence loops
//! - Paginated tag listing and diff-based tag updates
//!
//! # Example
//!
//! ```ignore
//! use rosflow_cloud::StateRefresh;
//! use rosflow_cloud_alicloud::{RosConfig, RosService};
//!
//! let service = RosService::new(client, RosConfig::from_env()?);
//!
//! let refresh = service.ros_stack_state_refresh_func(stack_id, ["CREATE_FAILED"]);
//! let (stack, status, err) = refresh.refresh().await.into_parts();
//! ```

pub mod config;
pub mod error;
pub mod kind;
pub mod model;
pub mod path;
pub mod rpc;
pub mod service;
pub mod tagging;

pub use config::RosConfig;
pub use error::{CloudError, Result, RpcError};
pub use kind::RosResourceKind;
pub use model::{
    Parameter, RosChangeSet, RosObject, RosStack, RosStackGroup, RosStackInstance, RosTemplate,
    RosTemplateScratch, StackPolicy, Tag, TagResource, tags_to_map,
};
pub use path::ResponsePath;
pub use rpc::{RpcClient, RpcRequest, build_client_token, is_expected_error, is_throttling, need_retry};
pub use service::{RosDescribe, RosService};
pub use tagging::TagResourceType;
