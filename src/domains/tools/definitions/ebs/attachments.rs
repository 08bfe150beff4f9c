//! EBS attachment actions.

use std::sync::Arc;

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::info;

use crate::core::aws::AwsContext;
use crate::domains::tools::registry::{ActionEntry, action};

/// Parameters for attaching a volume to an instance.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct AttachVolumeParams {
    /// ID of the volume (vol-...).
    #[serde(rename = "VolumeId")]
    pub volume_id: String,

    /// ID of the instance to attach to.
    #[serde(rename = "InstanceId")]
    pub instance_id: String,

    /// Device name, e.g. /dev/sdf.
    #[serde(rename = "Device")]
    pub device: String,

    pub region: Option<String>,
}

/// Parameters for detaching a volume.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DetachVolumeParams {
    /// ID of the volume (vol-...).
    #[serde(rename = "VolumeId")]
    pub volume_id: String,

    /// Instance to detach from; needed when the volume has several
    /// attachments.
    #[serde(rename = "InstanceId")]
    pub instance_id: Option<String>,

    /// Force the detach even if the instance hasn't unmounted the volume.
    #[serde(rename = "Force", default)]
    pub force: bool,

    pub region: Option<String>,
}

async fn attach_volume(ctx: Arc<AwsContext>, params: AttachVolumeParams) -> Value {
    let region = ctx.region(params.region.as_deref());
    info!(volume_id = %params.volume_id, instance_id = %params.instance_id, region, "attaching volume");

    match ctx
        .ebs
        .attach_volume(region, &params.volume_id, &params.instance_id, &params.device)
        .await
    {
        Ok(attachment) => json!(attachment),
        Err(e) => json!({ "error": e.to_string(), "volume_id": params.volume_id }),
    }
}

async fn detach_volume(ctx: Arc<AwsContext>, params: DetachVolumeParams) -> Value {
    let region = ctx.region(params.region.as_deref());
    info!(volume_id = %params.volume_id, region, force = params.force, "detaching volume");

    match ctx
        .ebs
        .detach_volume(
            region,
            &params.volume_id,
            params.instance_id.as_deref(),
            params.force,
        )
        .await
    {
        Ok(attachment) => json!(attachment),
        Err(e) => json!({ "error": e.to_string(), "volume_id": params.volume_id }),
    }
}

pub(crate) fn actions() -> Vec<ActionEntry> {
    vec![
        action(
            "attach_volume",
            "Attach an EBS volume to an instance",
            attach_volume,
        ),
        action(
            "detach_volume",
            "Detach an EBS volume from its instance",
            detach_volume,
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
    async fn test_attach_volume() {
        let stub = StubAws::new("running");
        let registry = ebs::registry();

        let result = registry
            .dispatch(
                stub.context("us-east-1"),
                "attach_volume",
                args(json!({
                    "VolumeId": "vol-123",
                    "InstanceId": "i-1234",
                    "Device": "/dev/sdf"
                })),
            )
            .await;

        assert_eq!(result["state"], "attaching");
        assert_eq!(result["device"], "/dev/sdf");
    }

    #[tokio::test]
    async fn test_attach_volume_requires_device() {
        let stub = StubAws::new("running");
        let registry = ebs::registry();

        let result = registry
            .dispatch(
                stub.context("us-east-1"),
                "attach_volume",
                args(json!({ "VolumeId": "vol-123", "InstanceId": "i-1234" })),
            )
            .await;

        assert!(result.get("validation_error").is_some());
        assert_eq!(stub.call_count(), 0);
    }

    #[tokio::test]
    async fn test_detach_volume_defaults() {
        let stub = StubAws::new("running");
        let registry = ebs::registry();

        let result = registry
            .dispatch(
                stub.context("us-east-1"),
                "detach_volume",
                args(json!({ "VolumeId": "vol-123" })),
            )
            .await;

        assert_eq!(result["state"], "detaching");
    }
}
