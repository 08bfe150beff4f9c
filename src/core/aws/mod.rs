//! AWS client seam.
//!
//! Handlers never talk to the AWS SDK directly; they go through the narrow
//! traits defined here so the dispatch layer can be exercised against stub
//! clients. The production implementation lives in [`sdk`]. This layer adds
//! no retry, caching, or timeout policy of its own - those stay with the SDK
//! configuration.

mod convert;
pub mod sdk;
#[cfg(test)]
pub mod stub;
pub mod types;

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

pub use sdk::SdkClients;
pub use types::*;

/// Result type for AWS client calls.
pub type AwsResult<T> = Result<T, AwsError>;

/// Errors surfaced by the AWS client traits.
///
/// Every variant carries a display-ready message; handlers turn these into
/// `{"error": ...}` records, so no further classification happens here.
#[derive(Debug, Error)]
pub enum AwsError {
    /// The underlying service call failed (auth, throttling, not-found, ...).
    #[error("{0}")]
    Api(String),

    /// The service responded, but without the fields this layer relies on.
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl AwsError {
    pub fn api(msg: impl Into<String>) -> Self {
        Self::Api(msg.into())
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedResponse(msg.into())
    }
}

/// EC2 instance, image, template, and pricing-history operations.
#[async_trait]
pub trait Ec2Api: Send + Sync {
    async fn start_instances(
        &self,
        region: &str,
        instance_ids: &[String],
    ) -> AwsResult<Vec<InstanceStateChange>>;

    async fn stop_instances(
        &self,
        region: &str,
        instance_ids: &[String],
    ) -> AwsResult<Vec<InstanceStateChange>>;

    async fn reboot_instances(&self, region: &str, instance_ids: &[String]) -> AwsResult<()>;

    async fn terminate_instances(
        &self,
        region: &str,
        instance_ids: &[String],
    ) -> AwsResult<Vec<InstanceStateChange>>;

    async fn run_instances(
        &self,
        region: &str,
        request: RunInstancesRequest,
    ) -> AwsResult<Vec<LaunchedInstance>>;

    async fn run_instances_from_template(
        &self,
        region: &str,
        template_name: &str,
        version: &str,
        min_count: i32,
        max_count: i32,
    ) -> AwsResult<Vec<LaunchedInstance>>;

    async fn request_spot_instances(
        &self,
        region: &str,
        request: SpotInstanceRequest,
    ) -> AwsResult<Vec<SpotRequestDetail>>;

    async fn describe_instances(
        &self,
        region: &str,
        instance_ids: &[String],
        filters: &[Filter],
    ) -> AwsResult<Vec<InstanceDetail>>;

    async fn describe_spot_instance_requests(
        &self,
        region: &str,
        spot_request_ids: &[String],
        filters: &[Filter],
    ) -> AwsResult<Vec<SpotRequestDetail>>;

    async fn cancel_spot_instance_requests(
        &self,
        region: &str,
        spot_request_ids: &[String],
    ) -> AwsResult<Vec<CancelledSpotRequest>>;

    async fn describe_spot_price_history(
        &self,
        region: &str,
        query: SpotPriceQuery,
    ) -> AwsResult<Vec<SpotPriceEntry>>;

    async fn create_security_group(
        &self,
        region: &str,
        group_name: &str,
        description: &str,
        vpc_id: &str,
    ) -> AwsResult<String>;

    async fn delete_security_group(&self, region: &str, group_id: &str) -> AwsResult<()>;

    async fn authorize_security_group_ingress(
        &self,
        region: &str,
        group_id: &str,
        rules: &[IpPermissionSpec],
    ) -> AwsResult<()>;

    async fn revoke_security_group_ingress(
        &self,
        region: &str,
        group_id: &str,
        rules: &[IpPermissionSpec],
    ) -> AwsResult<()>;

    async fn describe_security_groups(
        &self,
        region: &str,
        filters: &[Filter],
    ) -> AwsResult<Vec<SecurityGroupDetail>>;

    async fn create_key_pair(&self, region: &str, key_name: &str) -> AwsResult<CreatedKeyPair>;

    async fn delete_key_pair(&self, region: &str, key_name: &str) -> AwsResult<()>;

    async fn describe_key_pairs(&self, region: &str) -> AwsResult<Vec<KeyPairDetail>>;

    async fn create_image(&self, region: &str, request: CreateImageRequest) -> AwsResult<String>;

    async fn describe_images(
        &self,
        region: &str,
        owners: &[String],
        image_ids: &[String],
        filters: &[Filter],
    ) -> AwsResult<Vec<ImageDetail>>;

    async fn deregister_image(&self, region: &str, image_id: &str) -> AwsResult<()>;

    async fn create_launch_template(
        &self,
        region: &str,
        name: &str,
        version_description: &str,
        data: LaunchTemplateData,
    ) -> AwsResult<LaunchTemplateDetail>;

    async fn create_launch_template_version(
        &self,
        region: &str,
        name: &str,
        version_description: &str,
        data: LaunchTemplateData,
    ) -> AwsResult<LaunchTemplateVersionDetail>;

    async fn describe_launch_templates(
        &self,
        region: &str,
        names: &[String],
        ids: &[String],
    ) -> AwsResult<Vec<LaunchTemplateDetail>>;

    async fn delete_launch_template(
        &self,
        region: &str,
        name: Option<&str>,
        id: Option<&str>,
    ) -> AwsResult<LaunchTemplateDetail>;

    /// Returns the instance's user data attribute, still base64-encoded.
    async fn describe_user_data(&self, region: &str, instance_id: &str)
    -> AwsResult<Option<String>>;

    async fn modify_instance_metadata_options(
        &self,
        region: &str,
        instance_id: &str,
        options: MetadataOptionsSpec,
    ) -> AwsResult<MetadataOptionsState>;
}

/// EBS volume and snapshot operations.
#[async_trait]
pub trait EbsApi: Send + Sync {
    async fn create_volume(
        &self,
        region: &str,
        request: CreateVolumeRequest,
    ) -> AwsResult<VolumeDetail>;

    async fn modify_volume(
        &self,
        region: &str,
        request: ModifyVolumeRequest,
    ) -> AwsResult<VolumeModificationDetail>;

    async fn delete_volume(&self, region: &str, volume_id: &str) -> AwsResult<()>;

    async fn describe_volumes(
        &self,
        region: &str,
        volume_ids: &[String],
        filters: &[Filter],
    ) -> AwsResult<Vec<VolumeDetail>>;

    async fn attach_volume(
        &self,
        region: &str,
        volume_id: &str,
        instance_id: &str,
        device: &str,
    ) -> AwsResult<VolumeAttachmentDetail>;

    async fn detach_volume(
        &self,
        region: &str,
        volume_id: &str,
        instance_id: Option<&str>,
        force: bool,
    ) -> AwsResult<VolumeAttachmentDetail>;

    async fn create_snapshot(
        &self,
        region: &str,
        volume_id: &str,
        description: &str,
        tags: Option<&BTreeMap<String, String>>,
    ) -> AwsResult<SnapshotDetail>;

    async fn describe_snapshots(
        &self,
        region: &str,
        snapshot_ids: &[String],
        owner_ids: &[String],
        filters: &[Filter],
    ) -> AwsResult<Vec<SnapshotDetail>>;

    async fn delete_snapshot(&self, region: &str, snapshot_id: &str) -> AwsResult<()>;

    /// Returns the new snapshot's ID.
    async fn copy_snapshot(&self, region: &str, request: CopySnapshotRequest) -> AwsResult<String>;

    async fn enable_fast_snapshot_restores(
        &self,
        region: &str,
        snapshot_id: &str,
        availability_zones: &[String],
    ) -> AwsResult<Vec<FastRestoreChange>>;

    async fn disable_fast_snapshot_restores(
        &self,
        region: &str,
        snapshot_id: &str,
        availability_zones: &[String],
    ) -> AwsResult<Vec<FastRestoreChange>>;
}

/// VPC and subnet lookups.
#[async_trait]
pub trait VpcApi: Send + Sync {
    async fn describe_vpcs(
        &self,
        region: &str,
        vpc_ids: &[String],
        filters: &[Filter],
    ) -> AwsResult<Vec<VpcDetail>>;

    async fn describe_subnets(
        &self,
        region: &str,
        subnet_ids: &[String],
        filters: &[Filter],
    ) -> AwsResult<Vec<SubnetDetail>>;
}

/// AWS Pricing API lookups (always served from us-east-1).
#[async_trait]
pub trait PricingApi: Send + Sync {
    /// Returns the parsed price-list documents matching the filters.
    async fn get_products(
        &self,
        service_code: &str,
        filters: &[PricingFilter],
    ) -> AwsResult<Vec<Value>>;
}

/// Client handles plus the configured default region.
///
/// Built exactly once at startup and passed to the server; nothing in this
/// struct is mutated afterwards.
#[derive(Clone)]
pub struct AwsContext {
    default_region: String,
    pub ec2: Arc<dyn Ec2Api>,
    pub ebs: Arc<dyn EbsApi>,
    pub vpc: Arc<dyn VpcApi>,
    pub pricing: Arc<dyn PricingApi>,
}

impl AwsContext {
    pub fn new(
        default_region: impl Into<String>,
        ec2: Arc<dyn Ec2Api>,
        ebs: Arc<dyn EbsApi>,
        vpc: Arc<dyn VpcApi>,
        pricing: Arc<dyn PricingApi>,
    ) -> Self {
        Self {
            default_region: default_region.into(),
            ec2,
            ebs,
            vpc,
            pricing,
        }
    }

    /// Build a context where one client implementation serves every trait.
    pub fn shared<C>(default_region: impl Into<String>, client: Arc<C>) -> Self
    where
        C: Ec2Api + EbsApi + VpcApi + PricingApi + 'static,
    {
        Self {
            default_region: default_region.into(),
            ec2: client.clone(),
            ebs: client.clone(),
            vpc: client.clone(),
            pricing: client,
        }
    }

    /// Resolve the per-call `region` override against the configured default.
    pub fn region<'a>(&'a self, requested: Option<&'a str>) -> &'a str {
        requested.unwrap_or(&self.default_region)
    }

    pub fn default_region(&self) -> &str {
        &self.default_region
    }
}
