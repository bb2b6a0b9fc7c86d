//! ROS service configuration

use rosflow_cloud::{CloudError, Result, RetryPolicy};

pub const DEFAULT_PRODUCT: &str = "ROS";
pub const DEFAULT_API_VERSION: &str = "2019-09-10";
pub const DEFAULT_REGION: &str = "cn-hangzhou";

const REGION_ENV_VARS: &[&str] = &["ALIBABA_CLOUD_REGION_ID", "ALICLOUD_REGION"];

/// Configuration for [`RosService`](crate::RosService)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosConfig {
    pub region_id: String,
    pub product: String,
    pub api_version: String,

    /// Describe calls for stacks, stack instances and template scratches
    pub describe_retry: RetryPolicy,

    /// Each page of `ListTagResources`
    pub list_retry: RetryPolicy,

    /// `TagResources` / `UntagResources`
    pub mutate_retry: RetryPolicy,
}

impl Default for RosConfig {
    fn default() -> Self {
        Self::new(DEFAULT_REGION)
    }
}

impl RosConfig {
    pub fn new(region_id: impl Into<String>) -> Self {
        Self {
            region_id: region_id.into(),
            product: DEFAULT_PRODUCT.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            describe_retry: RetryPolicy::describe(),
            list_retry: RetryPolicy::list(),
            mutate_retry: RetryPolicy::mutate(),
        }
    }

    /// Create RosConfig from environment variables
    ///
    /// The region comes from `ALIBABA_CLOUD_REGION_ID`, falling back to
    /// `ALICLOUD_REGION`.
    pub fn from_env() -> Result<Self> {
        let region = REGION_ENV_VARS
            .iter()
            .find_map(|name| std::env::var(name).ok())
            .ok_or_else(|| CloudError::MissingEnvVar(REGION_ENV_VARS[0].to_string()))?;

        let config = Self::new(region.trim());
        config.validate()?;
        Ok(config)
    }

    pub fn with_retry(mut self, describe: RetryPolicy, list: RetryPolicy, mutate: RetryPolicy) -> Self {
        self.describe_retry = describe;
        self.list_retry = list;
        self.mutate_retry = mutate;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.region_id.trim().is_empty() {
            return Err(CloudError::InvalidConfig("region id is empty".to_string()));
        }
        if self.product.is_empty() || self.api_version.is_empty() {
            return Err(CloudError::InvalidConfig(
                "product and api version are required".to_string(),
            ));
        }
        Ok(())
    }
}
