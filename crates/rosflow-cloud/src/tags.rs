//! Tag diffing

use std::collections::BTreeMap;

/// Tag keys with these prefixes are owned by the platform and never removed
pub const RESERVED_TAG_PREFIXES: &[&str] = &["aliyun", "acs:", "http://", "https://"];

/// Whether a tag belongs to the reserved system namespace
pub fn is_ignored_tag(key: &str) -> bool {
    RESERVED_TAG_PREFIXES
        .iter()
        .any(|prefix| key.starts_with(prefix))
}

/// Difference between the previous and the desired tag set
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagDiff {
    /// New or changed tags
    pub added: BTreeMap<String, String>,

    /// Keys dropped from the desired set
    pub removed: Vec<String>,
}

impl TagDiff {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Compute tags to add and keys to remove
///
/// Keys whose value changed show up in `added` only; tagging a key again
/// overwrites its value.
pub fn diff_tags(
    previous: &BTreeMap<String, String>,
    desired: &BTreeMap<String, String>,
) -> TagDiff {
    let added = desired
        .iter()
        .filter(|(k, v)| previous.get(*k) != Some(*v))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();

    let removed = previous
        .keys()
        .filter(|k| !desired.contains_key(*k))
        .cloned()
        .collect();

    TagDiff { added, removed }
}
