//! Instance and spot request listing actions.

use std::slice;
use std::sync::Arc;

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::core::aws::{AwsContext, Filter};
use crate::domains::tools::registry::{ActionEntry, action};

/// Filterable instance listing parameters.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ListInstancesParams {
    /// AWS region to query. Defaults to the configured region.
    pub region: Option<String>,

    /// Restrict to these instance IDs.
    pub instance_ids: Option<Vec<String>>,

    /// Instance states to match, e.g. ["running", "stopped"].
    pub states: Option<Vec<String>>,

    /// Tag key to match (paired with tag_value).
    pub tag_key: Option<String>,

    /// Tag value to match (paired with tag_key).
    pub tag_value: Option<String>,

    pub instance_types: Option<Vec<String>>,
    pub vpc_ids: Option<Vec<String>>,
    pub subnet_ids: Option<Vec<String>>,
    pub security_group_ids: Option<Vec<String>>,

    /// If true, only return spot instances.
    #[serde(default)]
    pub spot_only: bool,

    /// If true, exclude spot instances (on-demand only).
    #[serde(default)]
    pub exclude_spot: bool,

    /// Restrict to instances created from this spot request ID.
    pub spot_request_id: Option<String>,

    /// Raw EC2 filter structures: [{"Name": ..., "Values": [...]}].
    pub custom_filters: Option<Vec<Filter>>,
}

/// Parameters identifying a single instance.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct InstanceIdParams {
    /// ID of the EC2 instance.
    pub instance_id: String,

    pub region: Option<String>,
}

/// Parameters for the running-instances shortcut.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ListRunningInstancesParams {
    pub region: Option<String>,

    /// If true, only return spot instances.
    #[serde(default)]
    pub spot_only: bool,
}

/// Parameters for the tag-scoped listing.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ListInstancesByTagParams {
    /// Tag key to match.
    pub tag_key: String,

    /// Tag value to match.
    pub tag_value: String,

    pub region: Option<String>,

    #[serde(default)]
    pub spot_only: bool,
}

/// Parameters for listing spot instance requests.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ListSpotRequestsParams {
    pub region: Option<String>,

    /// Specific spot request IDs to fetch.
    pub spot_request_ids: Option<Vec<String>>,

    /// Filter by state: open, active, closed, cancelled, failed.
    pub states: Option<Vec<String>>,
}

/// Parameters identifying a single spot request.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SpotRequestIdParams {
    /// The spot instance request ID (sir-xxxxxxxx).
    pub spot_request_id: String,

    pub region: Option<String>,
}

fn build_instance_filters(params: &ListInstancesParams) -> Vec<Filter> {
    let mut filters = Vec::new();

    if let Some(states) = &params.states {
        filters.push(Filter::new("instance-state-name", states.clone()));
    }
    if let Some(types) = &params.instance_types {
        filters.push(Filter::new("instance-type", types.clone()));
    }
    if let Some(vpc_ids) = &params.vpc_ids {
        filters.push(Filter::new("vpc-id", vpc_ids.clone()));
    }
    if let Some(subnet_ids) = &params.subnet_ids {
        filters.push(Filter::new("subnet-id", subnet_ids.clone()));
    }
    if let Some(group_ids) = &params.security_group_ids {
        filters.push(Filter::new("instance.group-id", group_ids.clone()));
    }
    if let (Some(key), Some(value)) = (&params.tag_key, &params.tag_value) {
        filters.push(Filter::new(format!("tag:{key}"), [value.clone()]));
    }

    if params.spot_only {
        filters.push(Filter::new("instance-lifecycle", ["spot"]));
    }
    if params.exclude_spot {
        filters.push(Filter::new("instance-lifecycle", ["on-demand"]));
    }
    if let Some(spot_request_id) = &params.spot_request_id {
        filters.push(Filter::new(
            "spot-instance-request-id",
            [spot_request_id.clone()],
        ));
    }

    if let Some(custom) = &params.custom_filters {
        filters.extend(custom.iter().cloned());
    }

    filters
}

async fn list_ec2_instances(ctx: Arc<AwsContext>, params: ListInstancesParams) -> Value {
    let region = ctx.region(params.region.as_deref()).to_string();
    let filters = build_instance_filters(&params);
    let instance_ids = params.instance_ids.clone().unwrap_or_default();

    match ctx
        .ec2
        .describe_instances(&region, &instance_ids, &filters)
        .await
    {
        Ok(instances) => json!({
            "region": region,
            "filters_applied": filters,
            "instances": instances,
        }),
        Err(e) => json!({ "region": region, "error": e.to_string() }),
    }
}

async fn get_instance_details(ctx: Arc<AwsContext>, params: InstanceIdParams) -> Value {
    let region = ctx.region(params.region.as_deref()).to_string();

    match ctx
        .ec2
        .describe_instances(&region, slice::from_ref(&params.instance_id), &[])
        .await
    {
        Ok(instances) => match instances.first() {
            Some(instance) => json!({
                "instance_id": params.instance_id,
                "region": region,
                "details": instance,
            }),
            None => json!({
                "instance_id": params.instance_id,
                "region": region,
                "details": null,
                "error": format!("Instance {} not found", params.instance_id),
            }),
        },
        Err(e) => json!({
            "instance_id": params.instance_id,
            "region": region,
            "error": e.to_string(),
        }),
    }
}

async fn get_instance_status(ctx: Arc<AwsContext>, params: InstanceIdParams) -> Value {
    let region = ctx.region(params.region.as_deref()).to_string();

    match ctx
        .ec2
        .describe_instances(&region, slice::from_ref(&params.instance_id), &[])
        .await
    {
        Ok(instances) => match instances.first() {
            Some(instance) => json!({
                "instance_id": params.instance_id,
                "state": instance.state,
                "public_ip": instance.public_ip,
                "instance_type": instance.instance_type,
                "launch_time": instance.launch_time,
                "lifecycle": instance.lifecycle,
            }),
            None => json!({
                "instance_id": params.instance_id,
                "state": "not_found",
                "public_ip": null,
                "instance_type": null,
            }),
        },
        Err(e) => json!({ "instance_id": params.instance_id, "error": e.to_string() }),
    }
}

async fn list_running_instances(ctx: Arc<AwsContext>, params: ListRunningInstancesParams) -> Value {
    let region = ctx.region(params.region.as_deref()).to_string();

    let mut filters = vec![Filter::new("instance-state-name", ["running"])];
    if params.spot_only {
        filters.push(Filter::new("instance-lifecycle", ["spot"]));
    }

    match ctx.ec2.describe_instances(&region, &[], &filters).await {
        Ok(instances) => json!(instances),
        Err(e) => json!({ "region": region, "error": e.to_string() }),
    }
}

async fn list_instances_by_tag(ctx: Arc<AwsContext>, params: ListInstancesByTagParams) -> Value {
    let region = ctx.region(params.region.as_deref()).to_string();

    let mut filters = vec![Filter::new(
        format!("tag:{}", params.tag_key),
        [params.tag_value.clone()],
    )];
    if params.spot_only {
        filters.push(Filter::new("instance-lifecycle", ["spot"]));
    }

    match ctx.ec2.describe_instances(&region, &[], &filters).await {
        Ok(instances) => json!(instances),
        Err(e) => json!({ "region": region, "error": e.to_string() }),
    }
}

async fn list_spot_requests(ctx: Arc<AwsContext>, params: ListSpotRequestsParams) -> Value {
    let region = ctx.region(params.region.as_deref()).to_string();

    let mut filters = Vec::new();
    if let Some(states) = &params.states {
        filters.push(Filter::new("state", states.clone()));
    }
    let spot_request_ids = params.spot_request_ids.clone().unwrap_or_default();

    match ctx
        .ec2
        .describe_spot_instance_requests(&region, &spot_request_ids, &filters)
        .await
    {
        Ok(requests) => json!({
            "region": region,
            "filters_applied": filters,
            "spot_requests": requests,
        }),
        Err(e) => json!({ "region": region, "error": e.to_string() }),
    }
}

async fn get_spot_request_details(ctx: Arc<AwsContext>, params: SpotRequestIdParams) -> Value {
    let region = ctx.region(params.region.as_deref()).to_string();

    match ctx
        .ec2
        .describe_spot_instance_requests(&region, slice::from_ref(&params.spot_request_id), &[])
        .await
    {
        Ok(requests) => match requests.first() {
            Some(request) => json!({
                "region": region,
                "spot_request_id": params.spot_request_id,
                "details": request,
            }),
            None => json!({
                "region": region,
                "spot_request_id": params.spot_request_id,
                "error": "Spot request not found",
            }),
        },
        Err(e) => json!({
            "region": region,
            "spot_request_id": params.spot_request_id,
            "error": e.to_string(),
        }),
    }
}

async fn cancel_spot_request(ctx: Arc<AwsContext>, params: SpotRequestIdParams) -> Value {
    let region = ctx.region(params.region.as_deref()).to_string();

    match ctx
        .ec2
        .cancel_spot_instance_requests(&region, slice::from_ref(&params.spot_request_id))
        .await
    {
        Ok(cancelled) => json!({
            "region": region,
            "spot_request_id": params.spot_request_id,
            "cancelled": cancelled,
        }),
        Err(e) => json!({
            "region": region,
            "spot_request_id": params.spot_request_id,
            "error": e.to_string(),
        }),
    }
}

pub(crate) fn actions() -> Vec<ActionEntry> {
    vec![
        action(
            "list_ec2_instances",
            "List EC2 instances with optional state, tag, network, and spot filters",
            list_ec2_instances,
        ),
        action(
            "get_instance_details",
            "Fetch the full details of one instance",
            get_instance_details,
        ),
        action(
            "get_instance_status",
            "Fetch the state, IP, and type of one instance",
            get_instance_status,
        ),
        action(
            "list_running_instances",
            "List running instances, optionally spot only",
            list_running_instances,
        ),
        action(
            "list_instances_by_tag",
            "List instances matching a tag key/value pair",
            list_instances_by_tag,
        ),
        action(
            "list_spot_requests",
            "List spot instance requests",
            list_spot_requests,
        ),
        action(
            "get_spot_request_details",
            "Fetch details of one spot instance request",
            get_spot_request_details,
        ),
        action(
            "cancel_spot_request",
            "Cancel a spot instance request",
            cancel_spot_request,
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

    #[test]
    fn test_build_instance_filters() {
        let params = ListInstancesParams {
            region: None,
            instance_ids: None,
            states: Some(vec!["running".to_string()]),
            tag_key: Some("env".to_string()),
            tag_value: Some("prod".to_string()),
            instance_types: None,
            vpc_ids: None,
            subnet_ids: None,
            security_group_ids: None,
            spot_only: true,
            exclude_spot: false,
            spot_request_id: None,
            custom_filters: Some(vec![Filter::new("availability-zone", ["us-east-1a"])]),
        };

        let filters = build_instance_filters(&params);
        assert_eq!(filters.len(), 4);
        assert_eq!(filters[0], Filter::new("instance-state-name", ["running"]));
        assert_eq!(filters[1], Filter::new("tag:env", ["prod"]));
        assert_eq!(filters[2], Filter::new("instance-lifecycle", ["spot"]));
        assert_eq!(filters[3], Filter::new("availability-zone", ["us-east-1a"]));
    }

    #[tokio::test]
    async fn test_list_ec2_instances_echoes_filters() {
        let stub = StubAws::new("running");
        let registry = ec2::registry();

        let result = registry
            .dispatch(
                stub.context("us-east-1"),
                "list_ec2_instances",
                args(json!({ "states": ["running"] })),
            )
            .await;

        assert_eq!(result["region"], "us-east-1");
        assert_eq!(
            result["filters_applied"][0]["Name"],
            "instance-state-name"
        );
        assert!(result["instances"].is_array());
    }

    #[tokio::test]
    async fn test_get_instance_status_shape() {
        let stub = StubAws::new("running");
        let registry = ec2::registry();

        let result = registry
            .dispatch(
                stub.context("us-east-1"),
                "get_instance_status",
                args(json!({ "instance_id": "i-1234" })),
            )
            .await;

        assert_eq!(result["instance_id"], "i-1234");
        assert_eq!(result["state"], "running");
        assert_eq!(result["lifecycle"], "on-demand");
    }

    #[tokio::test]
    async fn test_list_running_instances_returns_array() {
        let stub = StubAws::new("running");
        let registry = ec2::registry();

        let result = registry
            .dispatch(
                stub.context("us-east-1"),
                "list_running_instances",
                args(json!({})),
            )
            .await;

        assert!(result.is_array());
    }

    #[tokio::test]
    async fn test_cancel_spot_request() {
        let stub = StubAws::new("running");
        let registry = ec2::registry();

        let result = registry
            .dispatch(
                stub.context("us-east-1"),
                "cancel_spot_request",
                args(json!({ "spot_request_id": "sir-abc123" })),
            )
            .await;

        assert_eq!(result["cancelled"][0]["spot_request_id"], "sir-abc123");
        assert_eq!(result["cancelled"][0]["state"], "cancelled");
    }
}
