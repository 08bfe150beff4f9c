//! Instance metadata actions: user data and IMDS options.

use std::slice;
use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::core::aws::{AwsContext, MetadataOptionsSpec};
use crate::domains::tools::registry::{ActionEntry, action};

/// Parameters identifying an instance.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct InstanceIdParams {
    /// ID of the EC2 instance.
    pub instance_id: String,

    pub region: Option<String>,
}

/// Parameters for updating IMDS settings on an instance.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ModifyMetadataOptionsParams {
    /// ID of the EC2 instance.
    pub instance_id: String,

    /// `required` enforces IMDSv2; `optional` allows IMDSv1.
    pub http_tokens: Option<String>,

    /// `enabled` or `disabled`.
    pub http_endpoint: Option<String>,

    pub http_put_response_hop_limit: Option<i32>,

    pub region: Option<String>,
}

async fn get_user_data(ctx: Arc<AwsContext>, params: InstanceIdParams) -> Value {
    let region = ctx.region(params.region.as_deref());

    match ctx.ec2.describe_user_data(region, &params.instance_id).await {
        Ok(None) => json!({ "instance_id": params.instance_id, "user_data": null }),
        Ok(Some(encoded)) => match BASE64.decode(encoded.as_bytes()) {
            Ok(bytes) => json!({
                "instance_id": params.instance_id,
                "user_data": String::from_utf8_lossy(&bytes),
            }),
            Err(e) => json!({
                "instance_id": params.instance_id,
                "error": format!("user data is not valid base64: {e}"),
            }),
        },
        Err(e) => json!({ "instance_id": params.instance_id, "error": e.to_string() }),
    }
}

async fn describe_metadata_options(ctx: Arc<AwsContext>, params: InstanceIdParams) -> Value {
    let region = ctx.region(params.region.as_deref());

    match ctx
        .ec2
        .describe_instances(region, slice::from_ref(&params.instance_id), &[])
        .await
    {
        Ok(instances) => match instances.first() {
            Some(instance) => json!({
                "instance_id": params.instance_id,
                "metadata_options": instance.metadata_options,
            }),
            None => json!({
                "instance_id": params.instance_id,
                "error": format!("Instance {} not found", params.instance_id),
            }),
        },
        Err(e) => json!({ "instance_id": params.instance_id, "error": e.to_string() }),
    }
}

async fn modify_metadata_options(ctx: Arc<AwsContext>, params: ModifyMetadataOptionsParams) -> Value {
    let region = ctx.region(params.region.as_deref());

    let options = MetadataOptionsSpec {
        http_tokens: params.http_tokens,
        http_endpoint: params.http_endpoint,
        http_put_response_hop_limit: params.http_put_response_hop_limit,
    };

    match ctx
        .ec2
        .modify_instance_metadata_options(region, &params.instance_id, options)
        .await
    {
        Ok(state) => json!({
            "instance_id": params.instance_id,
            "metadata_options": state,
        }),
        Err(e) => json!({ "instance_id": params.instance_id, "error": e.to_string() }),
    }
}

pub(crate) fn actions() -> Vec<ActionEntry> {
    vec![
        action(
            "get_user_data",
            "Fetch and decode an instance's user data",
            get_user_data,
        ),
        action(
            "describe_metadata_options",
            "Show an instance's IMDS settings",
            describe_metadata_options,
        ),
        action(
            "modify_metadata_options",
            "Update an instance's IMDS settings",
            modify_metadata_options,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::core::aws::stub::StubAws;
    use crate::domains::tools::definitions::ec2;

    fn args(value: serde_json::Value) -> rmcp::model::JsonObject {
        value.as_object().cloned().unwrap_or_default()
    }

    #[tokio::test]
    async fn test_get_user_data_decodes_base64() {
        let stub = StubAws::new("running");
        let registry = ec2::registry();

        let result = registry
            .dispatch(
                stub.context("us-east-1"),
                "get_user_data",
                args(json!({ "instance_id": "i-1234" })),
            )
            .await;

        assert_eq!(result["user_data"], "#!/bin/bash\necho hello\n");
    }

    #[tokio::test]
    async fn test_modify_metadata_options_echoes_new_state() {
        let stub = StubAws::new("running");
        let registry = ec2::registry();

        let result = registry
            .dispatch(
                stub.context("us-east-1"),
                "modify_metadata_options",
                args(json!({ "instance_id": "i-1234", "http_tokens": "required" })),
            )
            .await;

        assert_eq!(result["metadata_options"]["http_tokens"], "required");
    }
}
