//! Composite resource ids
//!
//! Resources addressed by more than one key (e.g. a stack instance is
//! `group:account:region`) are stored as a single id joined with `:`.

use crate::error::{CloudError, Result};

pub const ID_DELIMITER: char = ':';

/// Split a composite id into exactly `expected` parts
pub fn parse_resource_id(id: &str, expected: usize) -> Result<Vec<String>> {
    let parts: Vec<String> = id.split(ID_DELIMITER).map(str::to_string).collect();
    if parts.len() != expected {
        return Err(CloudError::MalformedId {
            id: id.to_string(),
            expected,
            found: parts.len(),
        });
    }
    Ok(parts)
}

/// Join id parts with the composite delimiter
pub fn compose_resource_id<S: AsRef<str>>(parts: &[S]) -> String {
    parts
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(&ID_DELIMITER.to_string())
}
