//! EBS volume actions.

use std::collections::BTreeMap;
use std::slice;
use std::sync::Arc;

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::info;

use crate::core::aws::{AwsContext, CreateVolumeRequest, Filter, ModifyVolumeRequest};
use crate::domains::tools::registry::{ActionEntry, action};

fn default_volume_type() -> String {
    "gp3".to_string()
}

/// Parameters for creating a volume.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CreateVolumeParams {
    /// Availability zone the volume lives in, e.g. us-east-1a.
    #[serde(rename = "AvailabilityZone")]
    pub availability_zone: String,

    /// Volume type. Defaults to gp3.
    #[serde(rename = "VolumeType", default = "default_volume_type")]
    pub volume_type: String,

    /// Size in GiB. Required unless restoring from a snapshot.
    #[serde(rename = "Size")]
    pub size: Option<i32>,

    /// Snapshot to base the volume on.
    #[serde(rename = "SnapshotId")]
    pub snapshot_id: Option<String>,

    #[serde(rename = "Iops")]
    pub iops: Option<i32>,

    #[serde(rename = "Throughput")]
    pub throughput: Option<i32>,

    #[serde(rename = "Encrypted")]
    pub encrypted: Option<bool>,

    #[serde(rename = "KmsKeyId")]
    pub kms_key_id: Option<String>,

    /// Tags applied to the new volume.
    #[serde(rename = "Tags")]
    pub tags: Option<BTreeMap<String, String>>,

    pub region: Option<String>,
}

/// Parameters for modifying a volume.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ModifyVolumeParams {
    /// ID of the volume (vol-...).
    #[serde(rename = "VolumeId")]
    pub volume_id: String,

    #[serde(rename = "Size")]
    pub size: Option<i32>,

    #[serde(rename = "VolumeType")]
    pub volume_type: Option<String>,

    #[serde(rename = "Iops")]
    pub iops: Option<i32>,

    #[serde(rename = "Throughput")]
    pub throughput: Option<i32>,

    pub region: Option<String>,
}

/// Parameters identifying a volume.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct VolumeIdParams {
    /// ID of the volume (vol-...).
    #[serde(rename = "VolumeId")]
    pub volume_id: String,

    pub region: Option<String>,
}

/// Parameters for describing volumes.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DescribeVolumesParams {
    /// Describe one volume by ID; omit to list by filter.
    #[serde(rename = "VolumeId")]
    pub volume_id: Option<String>,

    /// EC2-compatible filter list.
    #[serde(rename = "Filters")]
    pub filters: Option<Vec<Filter>>,

    pub region: Option<String>,
}

async fn create_volume(ctx: Arc<AwsContext>, params: CreateVolumeParams) -> Value {
    let region = ctx.region(params.region.as_deref());
    info!(availability_zone = %params.availability_zone, region, "creating volume");

    let request = CreateVolumeRequest {
        availability_zone: params.availability_zone,
        volume_type: params.volume_type,
        size: params.size,
        snapshot_id: params.snapshot_id,
        iops: params.iops,
        throughput: params.throughput,
        encrypted: params.encrypted,
        kms_key_id: params.kms_key_id,
        tags: params.tags,
    };

    match ctx.ebs.create_volume(region, request).await {
        Ok(volume) => json!(volume),
        Err(e) => json!({ "error": e.to_string() }),
    }
}

async fn modify_volume(ctx: Arc<AwsContext>, params: ModifyVolumeParams) -> Value {
    let region = ctx.region(params.region.as_deref());
    info!(volume_id = %params.volume_id, region, "modifying volume");

    let request = ModifyVolumeRequest {
        volume_id: params.volume_id,
        size: params.size,
        volume_type: params.volume_type,
        iops: params.iops,
        throughput: params.throughput,
    };

    match ctx.ebs.modify_volume(region, request).await {
        Ok(modification) => json!({ "volume_modification": modification }),
        Err(e) => json!({ "error": e.to_string() }),
    }
}

async fn delete_volume(ctx: Arc<AwsContext>, params: VolumeIdParams) -> Value {
    let region = ctx.region(params.region.as_deref());
    info!(volume_id = %params.volume_id, region, "deleting volume");

    match ctx.ebs.delete_volume(region, &params.volume_id).await {
        Ok(()) => json!({ "deleted": true, "volume_id": params.volume_id }),
        Err(e) => json!({ "error": e.to_string(), "volume_id": params.volume_id }),
    }
}

async fn describe_volumes(ctx: Arc<AwsContext>, params: DescribeVolumesParams) -> Value {
    let region = ctx.region(params.region.as_deref());

    let result = match &params.volume_id {
        Some(volume_id) => {
            ctx.ebs
                .describe_volumes(region, slice::from_ref(volume_id), &[])
                .await
        }
        None => {
            let filters = params.filters.clone().unwrap_or_default();
            ctx.ebs.describe_volumes(region, &[], &filters).await
        }
    };

    match result {
        Ok(volumes) => json!(volumes),
        Err(e) => json!({ "error": e.to_string() }),
    }
}

pub(crate) fn actions() -> Vec<ActionEntry> {
    vec![
        action("create_volume", "Create a new EBS volume", create_volume),
        action(
            "modify_volume",
            "Modify an existing EBS volume's size, type, or performance",
            modify_volume,
        ),
        action("delete_volume", "Delete an EBS volume", delete_volume),
        action(
            "describe_volumes",
            "Describe one volume or list volumes by filter",
            describe_volumes,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::core::aws::stub::StubAws;
    use crate::domains::tools::definitions::ebs;

    fn args(value: serde_json::Value) -> rmcp::model::JsonObject {
        value.as_object().cloned().unwrap_or_default()
    }

    #[tokio::test]
    async fn test_create_volume() {
        let stub = StubAws::new("running");
        let registry = ebs::registry();

        let result = registry
            .dispatch(
                stub.context("us-east-1"),
                "create_volume",
                args(json!({ "AvailabilityZone": "us-east-1a", "Size": 20 })),
            )
            .await;

        assert_eq!(result["volume_id"], "vol-new123");
        assert_eq!(result["availability_zone"], "us-east-1a");
        assert_eq!(result["volume_type"], "gp3");
        assert_eq!(stub.calls(), vec!["create_volume".to_string()]);
    }

    #[tokio::test]
    async fn test_create_volume_missing_availability_zone() {
        let stub = StubAws::new("running");
        let registry = ebs::registry();

        let result = registry
            .dispatch(stub.context("us-east-1"), "create_volume", args(json!({})))
            .await;

        let message = result["validation_error"].as_str().unwrap_or_default();
        assert!(message.contains("AvailabilityZone"), "got: {message}");
        assert_eq!(stub.call_count(), 0);
    }

    #[tokio::test]
    async fn test_describe_volumes_by_id() {
        let stub = StubAws::new("running");
        let registry = ebs::registry();

        let result = registry
            .dispatch(
                stub.context("us-east-1"),
                "describe_volumes",
                args(json!({ "VolumeId": "vol-777" })),
            )
            .await;

        assert!(result.is_array());
        assert_eq!(result[0]["volume_id"], "vol-777");
    }

    #[tokio::test]
    async fn test_modify_volume() {
        let stub = StubAws::new("running");
        let registry = ebs::registry();

        let result = registry
            .dispatch(
                stub.context("us-east-1"),
                "modify_volume",
                args(json!({ "VolumeId": "vol-123", "Size": 200 })),
            )
            .await;

        assert_eq!(result["volume_modification"]["target_size"], 200);
    }
}
