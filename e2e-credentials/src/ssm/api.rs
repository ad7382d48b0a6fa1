//! Managed-instance API used by the SSM provider
//!
//! The provider only needs two calls: `CreateActivation` and
//! `DescribeInstanceInformation` filtered by instance id. `AwsSsmApi`
//! implements them over `aws-sdk-ssm`; tests use the devkit stub.

use crate::error::ApiError;
use std::future::Future;

/// Filter key used to look up a managed instance by id
pub const INSTANCE_IDS_FILTER_KEY: &str = "InstanceIds";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceTag {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivationRequest {
    pub default_instance_name: String,
    pub iam_role: String,
    pub registration_limit: i32,
    pub tags: Vec<ResourceTag>,
}

/// Raw `CreateActivation` output; the service may omit either field
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivationResponse {
    pub activation_id: Option<String>,
    pub activation_code: Option<String>,
}

/// Entry of the managed-instance inventory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagedInstance {
    pub instance_id: String,
    pub ping_status: Option<String>,
}

pub trait ManagedInstanceApi: Send + Sync {
    fn create_activation(
        &self,
        request: &ActivationRequest,
    ) -> impl Future<Output = Result<ActivationResponse, ApiError>> + Send;

    /// Inventory entries matching `instance_id` (empty once it deregistered)
    fn describe_instance_information(
        &self,
        instance_id: &str,
    ) -> impl Future<Output = Result<Vec<ManagedInstance>, ApiError>> + Send;
}
