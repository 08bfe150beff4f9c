//! VPC and subnet lookup actions.

use std::slice;
use std::sync::Arc;

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::core::aws::{AwsContext, Filter};
use crate::domains::tools::registry::{ActionEntry, action};

/// Region-only parameters.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct RegionOnlyParams {
    /// AWS region to query. Defaults to the configured region.
    pub region: Option<String>,
}

/// Parameters for describing VPCs.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DescribeVpcParams {
    /// Describe one VPC by ID; omit to list all.
    pub vpc_id: Option<String>,

    pub region: Option<String>,
}

/// Parameters for describing subnets.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DescribeSubnetParams {
    /// Describe one subnet by ID.
    pub subnet_id: Option<String>,

    /// List subnets belonging to this VPC.
    pub vpc_id: Option<String>,

    pub region: Option<String>,
}

async fn list_vpcs(ctx: Arc<AwsContext>, params: RegionOnlyParams) -> Value {
    let region = ctx.region(params.region.as_deref()).to_string();

    match ctx.vpc.describe_vpcs(&region, &[], &[]).await {
        Ok(vpcs) => json!({ "region": region, "vpcs": vpcs }),
        Err(e) => json!({ "region": region, "error": e.to_string() }),
    }
}

async fn get_default_vpc(ctx: Arc<AwsContext>, params: RegionOnlyParams) -> Value {
    let region = ctx.region(params.region.as_deref()).to_string();
    let filters = vec![Filter::new("isDefault", ["true"])];

    match ctx.vpc.describe_vpcs(&region, &[], &filters).await {
        Ok(vpcs) => json!({ "region": region, "default_vpc": vpcs.first() }),
        Err(e) => json!({ "region": region, "error": e.to_string() }),
    }
}

async fn describe_vpc(ctx: Arc<AwsContext>, params: DescribeVpcParams) -> Value {
    let region = ctx.region(params.region.as_deref()).to_string();

    let result = match &params.vpc_id {
        Some(vpc_id) => {
            ctx.vpc
                .describe_vpcs(&region, slice::from_ref(vpc_id), &[])
                .await
        }
        None => ctx.vpc.describe_vpcs(&region, &[], &[]).await,
    };

    match result {
        Ok(vpcs) => json!({ "region": region, "vpcs": vpcs }),
        Err(e) => json!({ "region": region, "error": e.to_string() }),
    }
}

async fn list_subnets(ctx: Arc<AwsContext>, params: RegionOnlyParams) -> Value {
    let region = ctx.region(params.region.as_deref()).to_string();

    match ctx.vpc.describe_subnets(&region, &[], &[]).await {
        Ok(subnets) => json!({ "region": region, "subnets": subnets }),
        Err(e) => json!({ "region": region, "error": e.to_string() }),
    }
}

async fn get_default_subnets(ctx: Arc<AwsContext>, params: RegionOnlyParams) -> Value {
    let region = ctx.region(params.region.as_deref()).to_string();
    let filters = vec![Filter::new("isDefault", ["true"])];

    let vpcs = match ctx.vpc.describe_vpcs(&region, &[], &filters).await {
        Ok(vpcs) => vpcs,
        Err(e) => return json!({ "region": region, "error": e.to_string() }),
    };

    let Some(default_vpc_id) = vpcs.first().and_then(|vpc| vpc.vpc_id.clone()) else {
        return json!({
            "region": region,
            "error": "Default VPC not found",
            "subnets": [],
        });
    };

    let subnet_filters = vec![Filter::new("vpc-id", [default_vpc_id.clone()])];
    match ctx.vpc.describe_subnets(&region, &[], &subnet_filters).await {
        Ok(subnets) => json!({
            "region": region,
            "default_vpc_id": default_vpc_id,
            "subnets": subnets,
        }),
        Err(e) => json!({ "region": region, "error": e.to_string() }),
    }
}

async fn describe_subnet(ctx: Arc<AwsContext>, params: DescribeSubnetParams) -> Value {
    let region = ctx.region(params.region.as_deref()).to_string();

    let result = match &params.subnet_id {
        Some(subnet_id) => {
            ctx.vpc
                .describe_subnets(&region, slice::from_ref(subnet_id), &[])
                .await
        }
        None => {
            let mut filters = Vec::new();
            if let Some(vpc_id) = &params.vpc_id {
                filters.push(Filter::new("vpc-id", [vpc_id.clone()]));
            }
            ctx.vpc.describe_subnets(&region, &[], &filters).await
        }
    };

    match result {
        Ok(subnets) => json!({ "region": region, "subnets": subnets }),
        Err(e) => json!({ "region": region, "error": e.to_string() }),
    }
}

pub(crate) fn actions() -> Vec<ActionEntry> {
    vec![
        action("list_vpcs", "List all VPCs in a region", list_vpcs),
        action(
            "get_default_vpc",
            "Get the default VPC for a region",
            get_default_vpc,
        ),
        action(
            "describe_vpc",
            "Describe one VPC, or all VPCs when no ID is given",
            describe_vpc,
        ),
        action("list_subnets", "List all subnets in a region", list_subnets),
        action(
            "get_default_subnets",
            "List the subnets inside the default VPC",
            get_default_subnets,
        ),
        action(
            "describe_subnet",
            "Describe a specific subnet, or subnets filtered by VPC",
            describe_subnet,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::core::aws::stub::StubAws;
    use crate::domains::tools::definitions::vpc;

    fn args(value: serde_json::Value) -> rmcp::model::JsonObject {
        value.as_object().cloned().unwrap_or_default()
    }

    #[tokio::test]
    async fn test_list_vpcs() {
        let stub = StubAws::new("running");
        let registry = vpc::registry();

        let result = registry
            .dispatch(stub.context("us-east-1"), "list_vpcs", args(json!({})))
            .await;

        assert_eq!(result["region"], "us-east-1");
        assert_eq!(result["vpcs"].as_array().map(Vec::len), Some(2));
    }

    #[tokio::test]
    async fn test_get_default_vpc() {
        let stub = StubAws::new("running");
        let registry = vpc::registry();

        let result = registry
            .dispatch(stub.context("us-east-1"), "get_default_vpc", args(json!({})))
            .await;

        assert_eq!(result["default_vpc"]["vpc_id"], "vpc-default");
        assert_eq!(result["default_vpc"]["is_default"], true);
    }

    #[tokio::test]
    async fn test_get_default_subnets_walks_default_vpc() {
        let stub = StubAws::new("running");
        let registry = vpc::registry();

        let result = registry
            .dispatch(
                stub.context("us-east-1"),
                "get_default_subnets",
                args(json!({})),
            )
            .await;

        assert_eq!(result["default_vpc_id"], "vpc-default");
        assert_eq!(result["subnets"][0]["subnet_id"], "subnet-1");
        assert_eq!(
            stub.calls(),
            vec!["describe_vpcs".to_string(), "describe_subnets".to_string()]
        );
    }

    #[tokio::test]
    async fn test_region_override() {
        let stub = StubAws::new("running");
        let registry = vpc::registry();

        let result = registry
            .dispatch(
                stub.context("us-east-1"),
                "list_subnets",
                args(json!({ "region": "eu-west-1" })),
            )
            .await;

        assert_eq!(result["region"], "eu-west-1");
    }
}
