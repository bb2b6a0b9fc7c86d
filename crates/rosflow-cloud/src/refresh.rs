//! State refresh (one poll attempt)
//!
//! A refresh performs exactly one describe call and classifies the outcome.
//! It never sleeps and never loops: waiting for a target status is the job of
//! whatever drives it, which compares [`PollResult::status`] against its own
//! target and decides when to give up.

use crate::error::{CloudError, Result};
use async_trait::async_trait;

/// Typed remote state that carries a status
pub trait Described {
    fn status(&self) -> &str;
}

/// Issues one describe call for a single remote object
#[async_trait]
pub trait Describe: Send + Sync {
    type Object: Described + Send;

    async fn describe(&self) -> Result<Self::Object>;
}

/// Outcome of one poll attempt
#[derive(Debug)]
pub enum PollResult<T> {
    /// The object exists and its status is not a fail state
    Found { object: T, status: String },

    /// The status is one of the declared fail states
    Failed { object: T, status: String },

    /// The object is absent
    NotFound,

    /// The describe call itself failed
    Error(CloudError),
}

impl<T> PollResult<T> {
    /// Observed status, empty when nothing was observed
    pub fn status(&self) -> &str {
        match self {
            PollResult::Found { status, .. } | PollResult::Failed { status, .. } => status,
            PollResult::NotFound | PollResult::Error(_) => "",
        }
    }

    pub fn object(&self) -> Option<&T> {
        match self {
            PollResult::Found { object, .. } | PollResult::Failed { object, .. } => Some(object),
            PollResult::NotFound | PollResult::Error(_) => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, PollResult::NotFound)
    }

    /// Flatten into `(object, status, error)`
    ///
    /// `NotFound` becomes `(None, "", None)` so that a vanished object can
    /// satisfy a deletion target. A fail state keeps the object next to the
    /// [`CloudError::FailedToReachTargetStatus`] error.
    pub fn into_parts(self) -> (Option<T>, String, Option<CloudError>) {
        match self {
            PollResult::Found { object, status } => (Some(object), status, None),
            PollResult::Failed { object, status } => {
                let err = CloudError::FailedToReachTargetStatus {
                    status: status.clone(),
                };
                (Some(object), status, Some(err))
            }
            PollResult::NotFound => (None, String::new(), None),
            PollResult::Error(err) => (None, String::new(), Some(err)),
        }
    }
}

/// Classify the result of a describe call against the fail states
pub fn evaluate<T, S>(described: Result<T>, fail_states: &[S]) -> PollResult<T>
where
    T: Described,
    S: AsRef<str>,
{
    let object = match described {
        Ok(object) => object,
        Err(err) if err.is_not_found() => return PollResult::NotFound,
        Err(err) => return PollResult::Error(err),
    };

    let status = object.status().to_string();
    if fail_states.iter().any(|s| s.as_ref() == status) {
        tracing::debug!("Status {} is a fail state", status);
        return PollResult::Failed { object, status };
    }
    PollResult::Found { object, status }
}

/// One poll attempt, callable repeatedly by an external waiter
#[async_trait]
pub trait StateRefresh: Send + Sync {
    type Object: Send;

    async fn refresh(&self) -> PollResult<Self::Object>;
}

/// [`StateRefresh`] built from any [`Describe`] and a set of fail states
pub struct Refresher<D> {
    describe: D,
    fail_states: Vec<String>,
}

impl<D: Describe> Refresher<D> {
    pub fn new<I, S>(describe: D, fail_states: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            describe,
            fail_states: fail_states.into_iter().map(Into::into).collect(),
        }
    }

    pub fn fail_states(&self) -> &[String] {
        &self.fail_states
    }
}

#[async_trait]
impl<D: Describe> StateRefresh for Refresher<D> {
    type Object = D::Object;

    async fn refresh(&self) -> PollResult<Self::Object> {
        evaluate(self.describe.describe().await, &self.fail_states)
    }
}
