//! `ManagedInstanceApi` over the AWS SDK SSM client

use crate::error::ApiError;
use crate::ssm::api::{
    ActivationRequest, ActivationResponse, ManagedInstance, ManagedInstanceApi,
    INSTANCE_IDS_FILTER_KEY,
};
use aws_sdk_ssm::config::Region;
use aws_sdk_ssm::error::{DisplayErrorContext, ProvideErrorMetadata};
use aws_sdk_ssm::types::{InstanceInformationStringFilter, Tag};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct AwsSsmApi {
    client: aws_sdk_ssm::Client,
}

impl AwsSsmApi {
    pub fn new(client: aws_sdk_ssm::Client) -> Self {
        Self { client }
    }

    /// Client from the ambient AWS environment (credentials chain, profile, region)
    pub async fn from_env(region: Option<String>) -> Self {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
        if let Some(region) = region {
            debug!("Using SSM region {}", region);
            loader = loader.region(Region::new(region));
        }
        let sdk_config = loader.load().await;
        Self::new(aws_sdk_ssm::Client::new(&sdk_config))
    }

    pub fn client(&self) -> &aws_sdk_ssm::Client {
        &self.client
    }
}

fn api_error<E>(err: &E) -> ApiError
where
    E: ProvideErrorMetadata + std::error::Error,
{
    ApiError {
        code: err.code().map(str::to_string),
        message: DisplayErrorContext(err).to_string(),
    }
}

impl ManagedInstanceApi for AwsSsmApi {
    async fn create_activation(
        &self,
        request: &ActivationRequest,
    ) -> Result<ActivationResponse, ApiError> {
        let mut call = self
            .client
            .create_activation()
            .default_instance_name(&request.default_instance_name)
            .iam_role(&request.iam_role)
            .registration_limit(request.registration_limit);

        for tag in &request.tags {
            let tag = Tag::builder()
                .key(&tag.key)
                .value(&tag.value)
                .build()
                .map_err(|e| ApiError::new(e.to_string()))?;
            call = call.tags(tag);
        }

        let output = call.send().await.map_err(|e| api_error(&e))?;

        Ok(ActivationResponse {
            activation_id: output.activation_id().map(str::to_string),
            activation_code: output.activation_code().map(str::to_string),
        })
    }

    async fn describe_instance_information(
        &self,
        instance_id: &str,
    ) -> Result<Vec<ManagedInstance>, ApiError> {
        let filter = InstanceInformationStringFilter::builder()
            .key(INSTANCE_IDS_FILTER_KEY)
            .values(instance_id)
            .build()
            .map_err(|e| ApiError::new(e.to_string()))?;

        let output = self
            .client
            .describe_instance_information()
            .filters(filter)
            .send()
            .await
            .map_err(|e| api_error(&e))?;

        Ok(output
            .instance_information_list()
            .iter()
            .map(|info| ManagedInstance {
                instance_id: info.instance_id().unwrap_or(instance_id).to_string(),
                ping_status: info.ping_status().map(|s| s.as_str().to_string()),
            })
            .collect())
    }
}
