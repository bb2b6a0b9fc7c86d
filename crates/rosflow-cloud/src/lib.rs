//! RosFlow Cloud primitives
//!
//! Provider-agnostic building blocks for reading and polling remote cloud
//! resources: the error taxonomy, deadline-bounded retry with incremental
//! backoff, the single-shot state refresh used by convergence loops, composite
//! id parsing and tag diffing.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────┐
//! │        convergence loop (owned by the caller)     │
//! │      calls StateRefresh::refresh() repeatedly     │
//! └─────────────────┬────────────────────────────────┘
//!                   │
//! ┌─────────────────▼────────────────────────────────┐
//! │                  rosflow-cloud                    │
//! │  ┌────────────┐  ┌────────────┐  ┌────────────┐  │
//! │  │  refresh   │  │   retry    │  │ tags / ids │  │
//! │  └────────────┘  └────────────┘  └────────────┘  │
//! └─────────────────┬────────────────────────────────┘
//!                   │
//! ┌─────────────────▼────────────────────────────────┐
//! │   rosflow-cloud-alicloud (ROS describe / tags)    │
//! └──────────────────────────────────────────────────┘
//! ```

pub mod error;
pub mod refresh;
pub mod resource_id;
pub mod retry;
pub mod status;
pub mod tags;

// Re-exports
pub use error::{CloudError, ErrorKind, Result};
pub use refresh::{Describe, Described, PollResult, Refresher, StateRefresh, evaluate};
pub use resource_id::{ID_DELIMITER, compose_resource_id, parse_resource_id};
pub use retry::{IncrementalWait, RetryError, RetryPolicy, retry_with};
pub use status::{coerce_to_string, deserialize_status};
pub use tags::{RESERVED_TAG_PREFIXES, TagDiff, diff_tags, is_ignored_tag};
