//! ROS resource kinds
//!
//! Every describe operation is the same RPC round trip parameterized by a
//! small descriptor: which action to call, how the id maps onto request
//! fields, which error codes mean "gone" and where the object sits in the
//! response.

use crate::path::ResponsePath;
use crate::rpc::{RpcRequest, build_client_token};
use serde_json::Value;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RosResourceKind {
    ChangeSet,
    Stack,
    StackPolicy,
    StackGroup,
    Template,
    StackInstance,
    TemplateScratch,
}

impl RosResourceKind {
    pub const ALL: [RosResourceKind; 7] = [
        RosResourceKind::ChangeSet,
        RosResourceKind::Stack,
        RosResourceKind::StackPolicy,
        RosResourceKind::StackGroup,
        RosResourceKind::Template,
        RosResourceKind::StackInstance,
        RosResourceKind::TemplateScratch,
    ];

    /// RPC action that returns the full representation
    pub fn action(&self) -> &'static str {
        match self {
            RosResourceKind::ChangeSet => "GetChangeSet",
            RosResourceKind::Stack => "GetStack",
            RosResourceKind::StackPolicy => "GetStackPolicy",
            RosResourceKind::StackGroup => "GetStackGroup",
            RosResourceKind::Template => "GetTemplate",
            RosResourceKind::StackInstance => "GetStackInstance",
            RosResourceKind::TemplateScratch => "GetTemplateScratch",
        }
    }

    /// Name used in not-found errors
    pub fn label(&self) -> &'static str {
        match self {
            RosResourceKind::ChangeSet => "RosChangeSet",
            RosResourceKind::Stack | RosResourceKind::StackPolicy => "RosStack",
            RosResourceKind::StackGroup => "RosStackGroup",
            RosResourceKind::Template => "RosTemplate",
            RosResourceKind::StackInstance => "ROS:StackInstance",
            RosResourceKind::TemplateScratch => "ROS:TemplateScratch",
        }
    }

    /// Request fields filled positionally from the (composite) id
    pub fn id_fields(&self) -> &'static [&'static str] {
        match self {
            RosResourceKind::ChangeSet => &["ChangeSetId"],
            RosResourceKind::Stack | RosResourceKind::StackPolicy => &["StackId"],
            RosResourceKind::StackGroup => &["StackGroupName"],
            RosResourceKind::Template => &["TemplateId"],
            RosResourceKind::StackInstance => &[
                "StackGroupName",
                "StackInstanceAccountId",
                "StackInstanceRegionId",
            ],
            RosResourceKind::TemplateScratch => &["TemplateScratchId"],
        }
    }

    /// Error codes that mean the object does not exist
    ///
    /// Templates also answer with change set and stack codes when the
    /// template is referenced through one of those.
    pub fn not_found_codes(&self) -> &'static [&'static str] {
        match self {
            RosResourceKind::ChangeSet => &["ChangeSetNotFound"],
            RosResourceKind::Stack | RosResourceKind::StackPolicy => &["StackNotFound"],
            RosResourceKind::StackGroup => &["StackGroupNotFound"],
            RosResourceKind::Template => {
                &["ChangeSetNotFound", "StackNotFound", "TemplateNotFound"]
            }
            RosResourceKind::StackInstance => &["StackInstanceNotFound", "StackGroupNotFound"],
            RosResourceKind::TemplateScratch => &["TemplateScratchNotFound"],
        }
    }

    /// Where the object sits in the response
    pub fn path(&self) -> ResponsePath {
        match self {
            RosResourceKind::StackGroup => ResponsePath::Field("StackGroup"),
            RosResourceKind::StackInstance => ResponsePath::Field("StackInstance"),
            RosResourceKind::TemplateScratch => ResponsePath::Field("TemplateScratch"),
            RosResourceKind::ChangeSet
            | RosResourceKind::Stack
            | RosResourceKind::StackPolicy
            | RosResourceKind::Template => ResponsePath::Root,
        }
    }

    /// Heavier reads retry transient faults under the describe policy
    pub fn retries(&self) -> bool {
        matches!(
            self,
            RosResourceKind::Stack
                | RosResourceKind::StackInstance
                | RosResourceKind::TemplateScratch
        )
    }

    /// Not-found errors carry the request id of the failed call
    pub fn reports_request_id(&self) -> bool {
        matches!(
            self,
            RosResourceKind::StackInstance | RosResourceKind::TemplateScratch
        )
    }

    /// Kind-specific request fields beyond region and id
    pub(crate) fn extend_request(&self, request: &mut RpcRequest) {
        match self {
            RosResourceKind::ChangeSet => {
                request.insert("ShowTemplate".to_string(), Value::Bool(true));
            }
            RosResourceKind::Stack => {
                request.insert(
                    "ClientToken".to_string(),
                    Value::String(build_client_token(self.action())),
                );
            }
            _ => {}
        }
    }
}

impl fmt::Display for RosResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
