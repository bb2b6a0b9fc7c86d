//! Typed ROS objects
//!
//! Field names follow the ROS API (PascalCase). Only the identifying fields
//! and `Status` are required; anything the API adds later is kept in `extra`.

use crate::kind::RosResourceKind;
use rosflow_cloud::{Described, deserialize_status};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// A typed object returned by one of the describe actions
pub trait RosObject: DeserializeOwned + Send {
    const KIND: RosResourceKind;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Parameter {
    pub parameter_key: String,
    #[serde(default)]
    pub parameter_value: Value,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Tag {
    pub key: String,
    #[serde(default)]
    pub value: String,
}

/// Stack (`GetStack`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RosStack {
    pub stack_id: String,
    pub stack_name: Option<String>,
    #[serde(deserialize_with = "deserialize_status")]
    pub status: String,
    pub status_reason: Option<String>,
    pub region_id: Option<String>,
    pub description: Option<String>,
    pub create_time: Option<String>,
    pub update_time: Option<String>,
    pub disable_rollback: Option<bool>,
    pub timeout_in_minutes: Option<i64>,
    pub parent_stack_id: Option<String>,
    pub deletion_protection: Option<String>,
    pub resource_group_id: Option<String>,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    #[serde(default)]
    pub outputs: Vec<Value>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RosStack {
    /// Parameter values keyed by name, pseudo parameters included
    pub fn parameter_map(&self) -> BTreeMap<String, Value> {
        self.parameters
            .iter()
            .map(|p| (p.parameter_key.clone(), p.parameter_value.clone()))
            .collect()
    }
}

/// Change set (`GetChangeSet`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RosChangeSet {
    pub change_set_id: String,
    pub change_set_name: Option<String>,
    pub change_set_type: Option<String>,
    pub stack_id: Option<String>,
    pub stack_name: Option<String>,
    #[serde(deserialize_with = "deserialize_status")]
    pub status: String,
    pub execution_status: Option<String>,
    pub status_reason: Option<String>,
    pub description: Option<String>,
    pub template_body: Option<String>,
    pub disable_rollback: Option<bool>,
    pub timeout_in_minutes: Option<i64>,
    pub create_time: Option<String>,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Stack group (`GetStackGroup`, `$.StackGroup`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RosStackGroup {
    pub stack_group_name: String,
    pub stack_group_id: Option<String>,
    #[serde(deserialize_with = "deserialize_status")]
    pub status: String,
    pub description: Option<String>,
    pub template_body: Option<String>,
    pub administration_role_name: Option<String>,
    pub execution_role_name: Option<String>,
    pub permission_model: Option<String>,
    pub resource_group_id: Option<String>,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Stack instance (`GetStackInstance`, `$.StackInstance`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RosStackInstance {
    pub stack_group_name: String,
    pub stack_group_id: Option<String>,
    pub account_id: Option<String>,
    pub region_id: Option<String>,
    pub stack_id: Option<String>,
    #[serde(deserialize_with = "deserialize_status")]
    pub status: String,
    pub status_reason: Option<String>,
    pub stack_drift_status: Option<String>,
    pub drift_detection_time: Option<String>,
    #[serde(default)]
    pub parameter_overrides: Vec<Parameter>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Template (`GetTemplate`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RosTemplate {
    pub template_id: Option<String>,
    pub template_name: Option<String>,
    #[serde(rename = "TemplateARN")]
    pub template_arn: Option<String>,
    pub template_body: Option<String>,
    pub template_version: Option<String>,
    pub description: Option<String>,
    pub share_type: Option<String>,
    pub owner_id: Option<String>,
    pub resource_group_id: Option<String>,
    pub create_time: Option<String>,
    pub update_time: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Template scratch (`GetTemplateScratch`, `$.TemplateScratch`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RosTemplateScratch {
    pub template_scratch_id: String,
    pub template_scratch_type: Option<String>,
    #[serde(deserialize_with = "deserialize_status")]
    pub status: String,
    pub status_reason: Option<String>,
    pub description: Option<String>,
    pub logical_id_strategy: Option<String>,
    pub resource_group_id: Option<String>,
    pub create_time: Option<String>,
    pub update_time: Option<String>,
    #[serde(default)]
    pub preference_parameters: Vec<Value>,
    #[serde(default)]
    pub source_resources: Vec<Value>,
    pub source_tag: Option<Value>,
    pub source_resource_group: Option<Value>,
    #[serde(default)]
    pub stacks: Vec<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Stack policy (`GetStackPolicy`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StackPolicy {
    pub stack_policy_body: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One tag binding returned by `ListTagResources`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TagResource {
    pub resource_id: String,
    pub resource_type: String,
    pub tag_key: String,
    #[serde(default)]
    pub tag_value: String,
}

/// Collapse tag bindings into a key/value map
pub fn tags_to_map(tags: &[TagResource]) -> BTreeMap<String, String> {
    tags.iter()
        .map(|t| (t.tag_key.clone(), t.tag_value.clone()))
        .collect()
}

macro_rules! ros_object {
    ($ty:ty, $kind:expr) => {
        impl RosObject for $ty {
            const KIND: RosResourceKind = $kind;
        }
    };
    ($ty:ty, $kind:expr, described) => {
        ros_object!($ty, $kind);

        impl Described for $ty {
            fn status(&self) -> &str {
                &self.status
            }
        }
    };
}

ros_object!(RosChangeSet, RosResourceKind::ChangeSet, described);
ros_object!(RosStack, RosResourceKind::Stack, described);
ros_object!(StackPolicy, RosResourceKind::StackPolicy);
ros_object!(RosStackGroup, RosResourceKind::StackGroup, described);
ros_object!(RosTemplate, RosResourceKind::Template);
ros_object!(RosStackInstance, RosResourceKind::StackInstance, described);
ros_object!(RosTemplateScratch, RosResourceKind::TemplateScratch, described);

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_stack_keeps_unknown_fields() {
        let stack: RosStack = serde_json::from_value(json!({
            "StackId": "4a6c9851-3b0f-4f5f-b4ca-a14bf691****",
            "StackName": "MyStack",
            "Status": "CREATE_COMPLETE",
            "DisableRollback": false,
            "TimeoutInMinutes": 60,
            "Parameters": [
                {"ParameterKey": "ALIYUN::Region", "ParameterValue": "cn-hangzhou"}
            ],
            "RequestId": "B288A0BE-D927-4888-B0F7-B35EF84B6E6F",
            "NotificationURLs": []
        }))
        .unwrap();

        assert_eq!(stack.status(), "CREATE_COMPLETE");
        assert_eq!(stack.timeout_in_minutes, Some(60));
        assert_eq!(
            stack.parameter_map().get("ALIYUN::Region"),
            Some(&json!("cn-hangzhou"))
        );
        assert!(stack.extra.contains_key("RequestId"));
        assert!(stack.extra.contains_key("NotificationURLs"));
    }

    #[test]
    fn test_stack_instance_numeric_status() {
        let instance: RosStackInstance = serde_json::from_value(json!({
            "StackGroupName": "group",
            "AccountId": "151266687691****",
            "RegionId": "cn-beijing",
            "Status": 1
        }))
        .unwrap();
        assert_eq!(instance.status(), "1");
    }

    #[test]
    fn test_missing_status_is_rejected() {
        let result = serde_json::from_value::<RosStackGroup>(json!({
            "StackGroupName": "group"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_tags_to_map() {
        let tags = vec![
            TagResource {
                resource_id: "s-1".into(),
                resource_type: "stack".into(),
                tag_key: "env".into(),
                tag_value: "prod".into(),
            },
            TagResource {
                resource_id: "s-1".into(),
                resource_type: "stack".into(),
                tag_key: "team".into(),
                tag_value: "infra".into(),
            },
        ];
        let map = tags_to_map(&tags);
        assert_eq!(map.len(), 2);
        assert_eq!(map["env"], "prod");
    }
}
