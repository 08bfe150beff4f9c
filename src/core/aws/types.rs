//! Shared request and summary types for the AWS client seam.
//!
//! Request types mirror the wire-level field names accepted by the EC2 API
//! (PascalCase via serde renames) so the tool schemas line up with what AWS
//! users expect. Summary types are the flattened records handlers embed in
//! their results; the SDK layer maps service responses into them field by
//! field.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

// ============================================================================
// Request building blocks
// ============================================================================

/// An EC2 API filter (`{"Name": ..., "Values": [...]}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Filter {
    /// Filter name, e.g. `instance-state-name`.
    #[serde(rename = "Name")]
    pub name: String,

    /// Values to match against.
    #[serde(rename = "Values")]
    pub values: Vec<String>,
}

impl Filter {
    pub fn new(name: impl Into<String>, values: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            name: name.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }
}

/// A `{"Key": ..., "Value": ...}` tag pair as the EC2 API renders it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ResourceTag {
    #[serde(rename = "Key")]
    pub key: String,

    #[serde(rename = "Value")]
    pub value: String,
}

/// Tags to apply to a resource created by a launch-style call.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TagSpecificationSpec {
    /// Resource type the tags apply to, e.g. `instance` or `volume`.
    #[serde(rename = "ResourceType")]
    pub resource_type: String,

    #[serde(rename = "Tags")]
    pub tags: Vec<ResourceTag>,
}

/// EBS settings inside a block device mapping.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct EbsSpec {
    #[serde(rename = "VolumeSize")]
    pub volume_size: Option<i32>,

    #[serde(rename = "VolumeType")]
    pub volume_type: Option<String>,

    #[serde(rename = "DeleteOnTermination")]
    pub delete_on_termination: Option<bool>,

    #[serde(rename = "Encrypted")]
    pub encrypted: Option<bool>,

    #[serde(rename = "SnapshotId")]
    pub snapshot_id: Option<String>,
}

/// A block device mapping entry for instance or launch template creation.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct BlockDeviceMappingSpec {
    /// Device name, e.g. `/dev/sda1`.
    #[serde(rename = "DeviceName")]
    pub device_name: String,

    #[serde(rename = "Ebs")]
    pub ebs: Option<EbsSpec>,
}

/// A network interface attachment for instance or launch template creation.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct NetworkInterfaceSpec {
    #[serde(rename = "DeviceIndex")]
    pub device_index: i32,

    #[serde(rename = "SubnetId")]
    pub subnet_id: Option<String>,

    #[serde(rename = "Description")]
    pub description: Option<String>,

    /// Security group IDs attached to the interface.
    #[serde(rename = "Groups")]
    pub groups: Option<Vec<String>>,

    #[serde(rename = "DeleteOnTermination")]
    pub delete_on_termination: Option<bool>,

    #[serde(rename = "AssociatePublicIpAddress")]
    pub associate_public_ip_address: Option<bool>,
}

/// An IAM instance profile reference (by name or ARN).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct IamInstanceProfileSpec {
    #[serde(rename = "Name")]
    pub name: Option<String>,

    #[serde(rename = "Arn")]
    pub arn: Option<String>,
}

/// Instance metadata service settings (IMDS).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct MetadataOptionsSpec {
    /// `required` enforces IMDSv2; `optional` allows IMDSv1.
    #[serde(rename = "HttpTokens")]
    pub http_tokens: Option<String>,

    /// `enabled` or `disabled`.
    #[serde(rename = "HttpEndpoint")]
    pub http_endpoint: Option<String>,

    #[serde(rename = "HttpPutResponseHopLimit")]
    pub http_put_response_hop_limit: Option<i32>,
}

/// An inbound or outbound security group rule.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct IpPermissionSpec {
    /// Protocol: `tcp`, `udp`, `icmp`, or `-1` for all.
    pub protocol: String,

    /// Start of the port range.
    pub from_port: Option<i32>,

    /// End of the port range.
    pub to_port: Option<i32>,

    /// CIDR block, e.g. `0.0.0.0/0`.
    pub cidr: String,
}

// ============================================================================
// Composite requests
// ============================================================================

/// Everything `run_instances` forwards to the EC2 API.
#[derive(Debug, Clone, Default)]
pub struct RunInstancesRequest {
    pub image_id: String,
    pub instance_type: String,
    pub min_count: i32,
    pub max_count: i32,
    pub key_name: Option<String>,
    pub subnet_id: Option<String>,
    pub security_group_ids: Option<Vec<String>>,
    pub block_device_mappings: Option<Vec<BlockDeviceMappingSpec>>,
    pub network_interfaces: Option<Vec<NetworkInterfaceSpec>>,
    pub tag_specifications: Option<Vec<TagSpecificationSpec>>,
    pub iam_instance_profile: Option<IamInstanceProfileSpec>,
    pub metadata_options: Option<MetadataOptionsSpec>,
    pub user_data: Option<String>,
}

/// A one-time spot instance request.
#[derive(Debug, Clone, Default)]
pub struct SpotInstanceRequest {
    pub image_id: String,
    pub instance_type: String,
    pub max_price: Option<String>,
    pub key_name: Option<String>,
    pub subnet_id: Option<String>,
    pub security_group_ids: Option<Vec<String>>,
    pub block_device_mappings: Option<Vec<BlockDeviceMappingSpec>>,
    pub iam_instance_profile: Option<IamInstanceProfileSpec>,
    pub tag_specifications: Option<Vec<TagSpecificationSpec>>,
    pub user_data: Option<String>,
}

/// Fields for `create_image`.
#[derive(Debug, Clone, Default)]
pub struct CreateImageRequest {
    pub instance_id: String,
    pub name: String,
    pub description: Option<String>,
    pub no_reboot: bool,
    pub tags: Option<BTreeMap<String, String>>,
}

/// Launch template payload shared by create-template and create-version.
#[derive(Debug, Clone, Default)]
pub struct LaunchTemplateData {
    pub image_id: Option<String>,
    pub instance_type: Option<String>,
    pub key_name: Option<String>,
    pub security_group_ids: Option<Vec<String>>,
    pub subnet_id: Option<String>,
    pub user_data: Option<String>,
    pub tag_specifications: Option<Vec<TagSpecificationSpec>>,
    pub block_device_mappings: Option<Vec<BlockDeviceMappingSpec>>,
    pub network_interfaces: Option<Vec<NetworkInterfaceSpec>>,
    pub iam_instance_profile: Option<IamInstanceProfileSpec>,
    pub metadata_options: Option<MetadataOptionsSpec>,
}

/// Fields for `create_volume` (also used when restoring from a snapshot).
#[derive(Debug, Clone, Default)]
pub struct CreateVolumeRequest {
    pub availability_zone: String,
    pub volume_type: String,
    pub size: Option<i32>,
    pub snapshot_id: Option<String>,
    pub iops: Option<i32>,
    pub throughput: Option<i32>,
    pub encrypted: Option<bool>,
    pub kms_key_id: Option<String>,
    pub tags: Option<BTreeMap<String, String>>,
}

/// Fields for `modify_volume`.
#[derive(Debug, Clone, Default)]
pub struct ModifyVolumeRequest {
    pub volume_id: String,
    pub size: Option<i32>,
    pub volume_type: Option<String>,
    pub iops: Option<i32>,
    pub throughput: Option<i32>,
}

/// Fields for a cross-region `copy_snapshot`.
#[derive(Debug, Clone, Default)]
pub struct CopySnapshotRequest {
    pub source_region: String,
    pub source_snapshot_id: String,
    pub description: String,
    pub encrypted: Option<bool>,
    pub kms_key_id: Option<String>,
    pub tags: Option<BTreeMap<String, String>>,
}

/// Spot price history query.
#[derive(Debug, Clone, Default)]
pub struct SpotPriceQuery {
    pub instance_type: String,
    pub product_description: String,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub availability_zone: Option<String>,
}

/// A `TERM_MATCH` filter for the AWS Pricing API.
#[derive(Debug, Clone)]
pub struct PricingFilter {
    pub field: String,
    pub value: String,
}

impl PricingFilter {
    pub fn term(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }
}

// ============================================================================
// Response summaries
// ============================================================================

/// The state transition reported by start/stop/terminate calls.
#[derive(Debug, Clone, Serialize)]
pub struct InstanceStateChange {
    pub instance_id: String,
    pub current_state: String,
    pub previous_state: Option<String>,
}

/// Minimal view of a freshly launched instance.
#[derive(Debug, Clone, Serialize)]
pub struct LaunchedInstance {
    pub instance_id: String,
    pub instance_type: String,
    pub state: String,
    pub public_ip: Option<String>,
    pub private_ip: Option<String>,
}

/// A security group reference attached to an instance.
#[derive(Debug, Clone, Serialize)]
pub struct GroupRef {
    pub group_id: Option<String>,
    pub group_name: Option<String>,
}

/// Flattened view of a described instance.
#[derive(Debug, Clone, Serialize)]
pub struct InstanceDetail {
    pub instance_id: String,
    pub instance_type: Option<String>,
    pub state: Option<String>,
    pub public_ip: Option<String>,
    pub private_ip: Option<String>,
    pub key_name: Option<String>,
    pub image_id: Option<String>,
    pub vpc_id: Option<String>,
    pub subnet_id: Option<String>,
    pub availability_zone: Option<String>,
    pub launch_time: Option<String>,
    pub lifecycle: String,
    pub security_groups: Vec<GroupRef>,
    pub metadata_options: Option<MetadataOptionsState>,
    pub tags: Vec<ResourceTag>,
}

/// A spot instance request as reported by describe/request calls.
#[derive(Debug, Clone, Serialize)]
pub struct SpotRequestDetail {
    pub spot_request_id: String,
    pub state: Option<String>,
    pub status_code: Option<String>,
    pub status_message: Option<String>,
    pub instance_id: Option<String>,
    pub instance_type: Option<String>,
    pub spot_price: Option<String>,
    pub create_time: Option<String>,
}

/// A cancelled spot request entry.
#[derive(Debug, Clone, Serialize)]
pub struct CancelledSpotRequest {
    pub spot_request_id: String,
    pub state: Option<String>,
}

/// A single spot price observation.
#[derive(Debug, Clone, Serialize)]
pub struct SpotPriceEntry {
    pub timestamp: Option<String>,
    pub spot_price: Option<String>,
    pub instance_type: Option<String>,
    pub product_description: Option<String>,
    pub az: Option<String>,
}

/// One rule inside a described security group.
#[derive(Debug, Clone, Serialize)]
pub struct IpPermissionDetail {
    pub protocol: Option<String>,
    pub from_port: Option<i32>,
    pub to_port: Option<i32>,
    pub cidrs: Vec<String>,
}

/// Flattened view of a security group.
#[derive(Debug, Clone, Serialize)]
pub struct SecurityGroupDetail {
    pub group_id: Option<String>,
    pub group_name: Option<String>,
    pub description: Option<String>,
    pub vpc_id: Option<String>,
    pub ip_permissions: Vec<IpPermissionDetail>,
}

/// A key pair listed by `describe_key_pairs`.
#[derive(Debug, Clone, Serialize)]
pub struct KeyPairDetail {
    pub key_name: Option<String>,
    pub key_type: Option<String>,
    pub fingerprint: Option<String>,
}

/// A newly created key pair, including its PEM material.
#[derive(Debug, Clone, Serialize)]
pub struct CreatedKeyPair {
    pub key_name: String,
    pub key_type: String,
    pub key_material: String,
}

/// Flattened view of an AMI.
#[derive(Debug, Clone, Serialize)]
pub struct ImageDetail {
    pub image_id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub state: Option<String>,
    pub creation_date: Option<String>,
    pub owner_id: Option<String>,
    pub architecture: Option<String>,
    pub tags: Vec<ResourceTag>,
}

/// Flattened view of a launch template.
#[derive(Debug, Clone, Serialize)]
pub struct LaunchTemplateDetail {
    pub launch_template_id: Option<String>,
    pub launch_template_name: Option<String>,
    pub default_version_number: Option<i64>,
    pub latest_version_number: Option<i64>,
    pub create_time: Option<String>,
}

/// A launch template version created by `create_launch_template_version`.
#[derive(Debug, Clone, Serialize)]
pub struct LaunchTemplateVersionDetail {
    pub launch_template_id: Option<String>,
    pub launch_template_name: Option<String>,
    pub version_number: Option<i64>,
    pub version_description: Option<String>,
}

/// Effective instance metadata options.
#[derive(Debug, Clone, Serialize)]
pub struct MetadataOptionsState {
    pub state: Option<String>,
    pub http_tokens: Option<String>,
    pub http_endpoint: Option<String>,
    pub http_put_response_hop_limit: Option<i32>,
}

/// Flattened view of a VPC.
#[derive(Debug, Clone, Serialize)]
pub struct VpcDetail {
    pub vpc_id: Option<String>,
    pub cidr_block: Option<String>,
    pub state: Option<String>,
    pub is_default: bool,
    pub tags: Vec<ResourceTag>,
}

/// Flattened view of a subnet.
#[derive(Debug, Clone, Serialize)]
pub struct SubnetDetail {
    pub subnet_id: Option<String>,
    pub vpc_id: Option<String>,
    pub cidr_block: Option<String>,
    pub availability_zone: Option<String>,
    pub state: Option<String>,
    pub available_ip_address_count: Option<i32>,
    pub map_public_ip_on_launch: Option<bool>,
    pub default_for_az: Option<bool>,
    pub tags: Vec<ResourceTag>,
}

/// A volume-to-instance attachment.
#[derive(Debug, Clone, Serialize)]
pub struct VolumeAttachmentDetail {
    pub volume_id: Option<String>,
    pub instance_id: Option<String>,
    pub device: Option<String>,
    pub state: Option<String>,
}

/// Flattened view of an EBS volume.
#[derive(Debug, Clone, Serialize)]
pub struct VolumeDetail {
    pub volume_id: Option<String>,
    pub size: Option<i32>,
    pub volume_type: Option<String>,
    pub state: Option<String>,
    pub availability_zone: Option<String>,
    pub encrypted: Option<bool>,
    pub iops: Option<i32>,
    pub throughput: Option<i32>,
    pub snapshot_id: Option<String>,
    pub create_time: Option<String>,
    pub attachments: Vec<VolumeAttachmentDetail>,
    pub tags: Vec<ResourceTag>,
}

/// An in-flight volume modification.
#[derive(Debug, Clone, Serialize)]
pub struct VolumeModificationDetail {
    pub volume_id: Option<String>,
    pub modification_state: Option<String>,
    pub target_size: Option<i32>,
    pub target_volume_type: Option<String>,
    pub target_iops: Option<i32>,
    pub target_throughput: Option<i32>,
}

/// Flattened view of an EBS snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct SnapshotDetail {
    pub snapshot_id: Option<String>,
    pub volume_id: Option<String>,
    pub state: Option<String>,
    pub progress: Option<String>,
    pub start_time: Option<String>,
    pub description: Option<String>,
    pub encrypted: Option<bool>,
    pub volume_size: Option<i32>,
    pub owner_id: Option<String>,
    pub tags: Vec<ResourceTag>,
}

/// One availability-zone state change from a fast-snapshot-restore call.
#[derive(Debug, Clone, Serialize)]
pub struct FastRestoreChange {
    pub snapshot_id: Option<String>,
    pub availability_zone: Option<String>,
    pub state: Option<String>,
}
