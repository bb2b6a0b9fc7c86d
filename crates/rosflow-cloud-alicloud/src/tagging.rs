//! Tag listing and tag updates for ROS resources

use crate::model::TagResource;
use crate::rpc::{RpcClient, RpcRequest, is_throttling, need_retry};
use crate::service::{RosService, remote_error};
use rosflow_cloud::{CloudError, Result, TagDiff, diff_tags, is_ignored_tag};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

const LIST_TAG_RESOURCES: &str = "ListTagResources";
const TAG_RESOURCES: &str = "TagResources";
const UNTAG_RESOURCES: &str = "UntagResources";

/// `ResourceType` accepted by the ROS tag actions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagResourceType {
    Stack,
    StackGroup,
    Template,
}

impl TagResourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TagResourceType::Stack => "stack",
            TagResourceType::StackGroup => "stackgroup",
            TagResourceType::Template => "template",
        }
    }
}

impl fmt::Display for TagResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl<C: RpcClient> RosService<C> {
    fn tag_request(&self, id: &str, resource_type: TagResourceType) -> RpcRequest {
        let mut request = self.base_request();
        request.insert(
            "ResourceType".to_string(),
            Value::String(resource_type.as_str().to_string()),
        );
        request.insert("ResourceId.1".to_string(), Value::String(id.to_string()));
        request
    }

    /// All tags bound to `id`, following `NextToken` until the last page
    ///
    /// Each page is retried on throttling only. Any other failure aborts the
    /// listing with that page's error.
    pub async fn list_tag_resources(
        &self,
        id: &str,
        resource_type: TagResourceType,
    ) -> Result<Vec<TagResource>> {
        let mut request = self.tag_request(id, resource_type);
        let mut tags = Vec::new();
        let policy = self.config().list_retry;

        loop {
            let response = self
                .call_with_retry(&policy, is_throttling, LIST_TAG_RESOURCES, &request, false)
                .await
                .map_err(|err| remote_error(LIST_TAG_RESOURCES, id, &request, &policy, err))?;

            let page = match response.get("TagResources") {
                Some(Value::Null) => Vec::new(),
                Some(value) if value.is_array() => {
                    serde_json::from_value::<Vec<TagResource>>(value.clone()).map_err(
                        |source| CloudError::Decode {
                            kind: "TagResource".to_string(),
                            id: id.to_string(),
                            source,
                        },
                    )?
                }
                _ => {
                    return Err(CloudError::MissingAttribute {
                        id: id.to_string(),
                        path: "$.TagResources".to_string(),
                        response: response.to_string(),
                    });
                }
            };
            tracing::debug!("Fetched {} tags for {} {}", page.len(), resource_type, id);
            tags.extend(page);

            match response.get("NextToken") {
                Some(Value::String(token)) if !token.is_empty() => {
                    request.insert("NextToken".to_string(), Value::String(token.clone()));
                }
                _ => break,
            }
        }

        Ok(tags)
    }

    /// Bring the tags of `id` from `previous` to `desired`
    ///
    /// Issues at most one `UntagResources` and one `TagResources` call, in that
    /// order. Reserved keys are never removed. When the untag call succeeds and
    /// the tag call fails the resource is left half-updated; the returned error
    /// is the only signal of that.
    pub async fn set_resource_tags(
        &self,
        id: &str,
        resource_type: TagResourceType,
        previous: &BTreeMap<String, String>,
        desired: &BTreeMap<String, String>,
    ) -> Result<TagDiff> {
        let diff = diff_tags(previous, desired);
        let removed: Vec<String> = diff
            .removed
            .into_iter()
            .filter(|key| !is_ignored_tag(key))
            .collect();
        let policy = self.config().mutate_retry;

        if !removed.is_empty() {
            let mut request = self.tag_request(id, resource_type);
            for (i, key) in removed.iter().enumerate() {
                request.insert(format!("TagKey.{}", i + 1), Value::String(key.clone()));
            }
            tracing::info!("Removing {} tags from {} {}", removed.len(), resource_type, id);
            self.call_with_retry(&policy, need_retry, UNTAG_RESOURCES, &request, false)
                .await
                .map_err(|err| remote_error(UNTAG_RESOURCES, id, &request, &policy, err))?;
        }

        if !diff.added.is_empty() {
            let mut request = self.tag_request(id, resource_type);
            for (i, (key, value)) in diff.added.iter().enumerate() {
                request.insert(format!("Tag.{}.Key", i + 1), Value::String(key.clone()));
                request.insert(format!("Tag.{}.Value", i + 1), Value::String(value.clone()));
            }
            tracing::info!("Adding {} tags to {} {}", diff.added.len(), resource_type, id);
            self.call_with_retry(&policy, need_retry, TAG_RESOURCES, &request, false)
                .await
                .map_err(|err| remote_error(TAG_RESOURCES, id, &request, &policy, err))?;
        }

        Ok(TagDiff {
            added: diff.added,
            removed,
        })
    }
}
