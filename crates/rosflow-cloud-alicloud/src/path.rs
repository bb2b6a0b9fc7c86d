//! Response path extraction (`$` and `$.Field`)

use serde_json::Value;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponsePath {
    /// `$`
    Root,
    /// `$.<name>`
    Field(&'static str),
}

impl ResponsePath {
    /// Value at this path, `None` when a field is absent
    pub fn extract<'a>(&self, response: &'a Value) -> Option<&'a Value> {
        match self {
            ResponsePath::Root => Some(response),
            ResponsePath::Field(name) => response.as_object()?.get(*name),
        }
    }
}

impl fmt::Display for ResponsePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponsePath::Root => write!(f, "$"),
            ResponsePath::Field(name) => write!(f, "$.{}", name),
        }
    }
}
