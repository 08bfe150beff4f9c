//! EBS snapshot actions.

use std::collections::BTreeMap;
use std::slice;
use std::sync::Arc;

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::info;

use crate::core::aws::{AwsContext, CopySnapshotRequest, CreateVolumeRequest, Filter};
use crate::domains::tools::registry::{ActionEntry, action};

fn default_volume_type() -> String {
    "gp3".to_string()
}

/// Parameters for snapshotting a volume.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CreateSnapshotParams {
    /// ID of the volume to snapshot (vol-...).
    #[serde(rename = "VolumeId")]
    pub volume_id: String,

    #[serde(rename = "Description")]
    pub description: Option<String>,

    /// Tags applied to the new snapshot.
    #[serde(rename = "Tags")]
    pub tags: Option<BTreeMap<String, String>>,

    pub region: Option<String>,
}

/// Parameters for listing snapshots.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ListSnapshotsParams {
    /// Owner IDs, e.g. ["self"].
    #[serde(rename = "OwnerIds")]
    pub owner_ids: Option<Vec<String>>,

    /// EC2-compatible filter list.
    #[serde(rename = "Filters")]
    pub filters: Option<Vec<Filter>>,

    pub region: Option<String>,
}

/// Parameters identifying a snapshot.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SnapshotIdParams {
    /// ID of the snapshot (snap-...).
    #[serde(rename = "SnapshotId")]
    pub snapshot_id: String,

    pub region: Option<String>,
}

/// Parameters for a cross-region snapshot copy.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CopySnapshotParams {
    /// Region the source snapshot lives in.
    #[serde(rename = "SourceRegion")]
    pub source_region: String,

    /// ID of the source snapshot.
    #[serde(rename = "SourceSnapshotId")]
    pub source_snapshot_id: String,

    #[serde(rename = "Description")]
    pub description: Option<String>,

    #[serde(rename = "Encrypted")]
    pub encrypted: Option<bool>,

    #[serde(rename = "KmsKeyId")]
    pub kms_key_id: Option<String>,

    /// Tags applied to the copy.
    #[serde(rename = "Tags")]
    pub tags: Option<BTreeMap<String, String>>,

    /// Destination region. Defaults to the configured region.
    pub region: Option<String>,
}

/// Parameters for restoring a volume from a snapshot.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct RestoreVolumeParams {
    /// ID of the snapshot to restore (snap-...).
    #[serde(rename = "SnapshotId")]
    pub snapshot_id: String,

    /// Availability zone for the new volume.
    #[serde(rename = "AvailabilityZone")]
    pub availability_zone: String,

    /// Volume type. Defaults to gp3.
    #[serde(rename = "VolumeType", default = "default_volume_type")]
    pub volume_type: String,

    #[serde(rename = "Size")]
    pub size: Option<i32>,

    #[serde(rename = "Iops")]
    pub iops: Option<i32>,

    #[serde(rename = "Throughput")]
    pub throughput: Option<i32>,

    #[serde(rename = "Encrypted")]
    pub encrypted: Option<bool>,

    #[serde(rename = "KmsKeyId")]
    pub kms_key_id: Option<String>,

    pub region: Option<String>,
}

/// Parameters for enabling or disabling fast snapshot restore.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct FastRestoreParams {
    /// ID of the snapshot (snap-...).
    #[serde(rename = "SnapshotId")]
    pub snapshot_id: String,

    /// Availability zones to change.
    #[serde(rename = "AvailabilityZones")]
    pub availability_zones: Vec<String>,

    /// Either "enable" or "disable".
    #[serde(rename = "State")]
    pub state: String,

    pub region: Option<String>,
}

async fn create_snapshot(ctx: Arc<AwsContext>, params: CreateSnapshotParams) -> Value {
    let region = ctx.region(params.region.as_deref());
    info!(volume_id = %params.volume_id, region, "creating snapshot");

    let description = params
        .description
        .clone()
        .unwrap_or_else(|| format!("Snapshot of {}", params.volume_id));

    match ctx
        .ebs
        .create_snapshot(region, &params.volume_id, &description, params.tags.as_ref())
        .await
    {
        Ok(snapshot) => json!(snapshot),
        Err(e) => json!({ "error": e.to_string() }),
    }
}

async fn list_snapshots(ctx: Arc<AwsContext>, params: ListSnapshotsParams) -> Value {
    let region = ctx.region(params.region.as_deref());

    let owner_ids = params.owner_ids.unwrap_or_default();
    let filters = params.filters.unwrap_or_default();

    match ctx
        .ebs
        .describe_snapshots(region, &[], &owner_ids, &filters)
        .await
    {
        Ok(snapshots) => json!(snapshots),
        Err(e) => json!({ "error": e.to_string() }),
    }
}

async fn describe_snapshot(ctx: Arc<AwsContext>, params: SnapshotIdParams) -> Value {
    let region = ctx.region(params.region.as_deref());

    match ctx
        .ebs
        .describe_snapshots(region, slice::from_ref(&params.snapshot_id), &[], &[])
        .await
    {
        Ok(snapshots) => json!(snapshots),
        Err(e) => json!({ "error": e.to_string() }),
    }
}

async fn delete_snapshot(ctx: Arc<AwsContext>, params: SnapshotIdParams) -> Value {
    let region = ctx.region(params.region.as_deref());
    info!(snapshot_id = %params.snapshot_id, region, "deleting snapshot");

    match ctx.ebs.delete_snapshot(region, &params.snapshot_id).await {
        Ok(()) => json!({ "deleted": true, "snapshot_id": params.snapshot_id }),
        Err(e) => json!({ "error": e.to_string(), "snapshot_id": params.snapshot_id }),
    }
}

async fn copy_snapshot(ctx: Arc<AwsContext>, params: CopySnapshotParams) -> Value {
    let region = ctx.region(params.region.as_deref());
    info!(
        source_snapshot_id = %params.source_snapshot_id,
        source_region = %params.source_region,
        region,
        "copying snapshot"
    );

    let description = params
        .description
        .clone()
        .unwrap_or_else(|| format!("Copy of {}", params.source_snapshot_id));

    let request = CopySnapshotRequest {
        source_region: params.source_region.clone(),
        source_snapshot_id: params.source_snapshot_id.clone(),
        description,
        encrypted: params.encrypted,
        kms_key_id: params.kms_key_id,
        tags: params.tags,
    };

    match ctx.ebs.copy_snapshot(region, request).await {
        Ok(snapshot_id) => json!({
            "snapshot_id": snapshot_id,
            "source_snapshot_id": params.source_snapshot_id,
            "source_region": params.source_region,
        }),
        Err(e) => json!({ "error": e.to_string() }),
    }
}

async fn restore_volume_from_snapshot(ctx: Arc<AwsContext>, params: RestoreVolumeParams) -> Value {
    let region = ctx.region(params.region.as_deref());
    info!(snapshot_id = %params.snapshot_id, region, "restoring volume from snapshot");

    let request = CreateVolumeRequest {
        availability_zone: params.availability_zone,
        volume_type: params.volume_type,
        size: params.size,
        snapshot_id: Some(params.snapshot_id),
        iops: params.iops,
        throughput: params.throughput,
        encrypted: params.encrypted,
        kms_key_id: params.kms_key_id,
        tags: None,
    };

    match ctx.ebs.create_volume(region, request).await {
        Ok(volume) => json!(volume),
        Err(e) => json!({ "error": e.to_string() }),
    }
}

async fn manage_fast_snapshot_restore(ctx: Arc<AwsContext>, params: FastRestoreParams) -> Value {
    let region = ctx.region(params.region.as_deref());

    let result = match params.state.as_str() {
        "enable" => {
            ctx.ebs
                .enable_fast_snapshot_restores(
                    region,
                    &params.snapshot_id,
                    &params.availability_zones,
                )
                .await
        }
        "disable" => {
            ctx.ebs
                .disable_fast_snapshot_restores(
                    region,
                    &params.snapshot_id,
                    &params.availability_zones,
                )
                .await
        }
        _ => return json!({ "error": "State must be 'enable' or 'disable'" }),
    };

    match result {
        Ok(changes) => json!({
            "snapshot_id": params.snapshot_id,
            "requested_state": params.state,
            "changes": changes,
        }),
        Err(e) => json!({ "error": e.to_string() }),
    }
}

pub(crate) fn actions() -> Vec<ActionEntry> {
    vec![
        action(
            "create_snapshot",
            "Create a snapshot of an EBS volume",
            create_snapshot,
        ),
        action(
            "list_snapshots",
            "List snapshots by owner or filter",
            list_snapshots,
        ),
        action(
            "describe_snapshot",
            "Describe a specific snapshot",
            describe_snapshot,
        ),
        action("delete_snapshot", "Delete a snapshot", delete_snapshot),
        action(
            "copy_snapshot",
            "Copy a snapshot, optionally across regions",
            copy_snapshot,
        ),
        action(
            "restore_volume_from_snapshot",
            "Create a volume from a snapshot",
            restore_volume_from_snapshot,
        ),
        action(
            "manage_fast_snapshot_restore",
            "Enable or disable fast snapshot restore in given availability zones",
            manage_fast_snapshot_restore,
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
    async fn test_create_snapshot_default_description() {
        let stub = StubAws::new("running");
        let registry = ebs::registry();

        let result = registry
            .dispatch(
                stub.context("us-east-1"),
                "create_snapshot",
                args(json!({ "VolumeId": "vol-123" })),
            )
            .await;

        assert_eq!(result["description"], "Snapshot of vol-123");
        assert_eq!(result["snapshot_id"], "snap-new123");
    }

    #[tokio::test]
    async fn test_fast_restore_rejects_bad_state() {
        let stub = StubAws::new("running");
        let registry = ebs::registry();

        let result = registry
            .dispatch(
                stub.context("us-east-1"),
                "manage_fast_snapshot_restore",
                args(json!({
                    "SnapshotId": "snap-123",
                    "AvailabilityZones": ["us-east-1a"],
                    "State": "pause"
                })),
            )
            .await;

        assert_eq!(result["error"], "State must be 'enable' or 'disable'");
        assert_eq!(stub.call_count(), 0);
    }

    #[tokio::test]
    async fn test_fast_restore_enable() {
        let stub = StubAws::new("running");
        let registry = ebs::registry();

        let result = registry
            .dispatch(
                stub.context("us-east-1"),
                "manage_fast_snapshot_restore",
                args(json!({
                    "SnapshotId": "snap-123",
                    "AvailabilityZones": ["us-east-1a", "us-east-1b"],
                    "State": "enable"
                })),
            )
            .await;

        assert_eq!(result["requested_state"], "enable");
        assert_eq!(result["changes"].as_array().map(Vec::len), Some(2));
    }

    #[tokio::test]
    async fn test_restore_volume_from_snapshot() {
        let stub = StubAws::new("running");
        let registry = ebs::registry();

        let result = registry
            .dispatch(
                stub.context("us-east-1"),
                "restore_volume_from_snapshot",
                args(json!({ "SnapshotId": "snap-123", "AvailabilityZone": "us-east-1a" })),
            )
            .await;

        assert_eq!(result["volume_id"], "vol-new123");
        assert_eq!(stub.calls(), vec!["create_volume".to_string()]);
    }

    #[tokio::test]
    async fn test_copy_snapshot() {
        let stub = StubAws::new("running");
        let registry = ebs::registry();

        let result = registry
            .dispatch(
                stub.context("us-east-1"),
                "copy_snapshot",
                args(json!({ "SourceRegion": "eu-west-1", "SourceSnapshotId": "snap-123" })),
            )
            .await;

        assert_eq!(result["snapshot_id"], "snap-copy123");
        assert_eq!(result["source_region"], "eu-west-1");
    }
}
