//! Security group actions.

use std::sync::Arc;

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::info;

use crate::core::aws::{AwsContext, Filter, IpPermissionSpec};
use crate::domains::tools::registry::{ActionEntry, action};

/// Parameters for creating a security group.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CreateSecurityGroupParams {
    /// Name of the new security group.
    pub group_name: String,

    /// Human-readable description.
    pub description: String,

    /// VPC the group belongs to.
    pub vpc_id: String,

    /// Inbound rules to authorize right after creation.
    pub inbound_rules: Option<Vec<IpPermissionSpec>>,

    pub region: Option<String>,
}

/// Parameters identifying a security group.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SecurityGroupIdParams {
    /// ID of the security group (sg-...).
    pub group_id: String,

    pub region: Option<String>,
}

/// Parameters for authorizing or revoking rules.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ModifyRulesParams {
    /// ID of the security group (sg-...).
    pub group_id: String,

    /// Rules to add or remove.
    pub rules: Vec<IpPermissionSpec>,

    pub region: Option<String>,
}

/// Parameters for describing security groups.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DescribeSecurityGroupParams {
    /// Match by group ID.
    pub group_id: Option<String>,

    /// Match by group name.
    pub group_name: Option<String>,

    pub region: Option<String>,
}

/// Region-only parameters for the listing action.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ListSecurityGroupsParams {
    pub region: Option<String>,
}

async fn create_security_group(ctx: Arc<AwsContext>, params: CreateSecurityGroupParams) -> Value {
    let region = ctx.region(params.region.as_deref()).to_string();
    info!(group_name = %params.group_name, vpc_id = %params.vpc_id, region, "creating security group");

    let group_id = match ctx
        .ec2
        .create_security_group(&region, &params.group_name, &params.description, &params.vpc_id)
        .await
    {
        Ok(group_id) => group_id,
        Err(e) => return json!({ "error": e.to_string() }),
    };

    if let Some(rules) = &params.inbound_rules {
        if let Err(e) = ctx
            .ec2
            .authorize_security_group_ingress(&region, &group_id, rules)
            .await
        {
            return json!({
                "group_name": params.group_name,
                "group_id": group_id,
                "inbound_rules_added": false,
                "error": e.to_string(),
            });
        }
    }

    json!({
        "group_name": params.group_name,
        "group_id": group_id,
        "inbound_rules_added": params.inbound_rules.is_some(),
    })
}

async fn delete_security_group(ctx: Arc<AwsContext>, params: SecurityGroupIdParams) -> Value {
    let region = ctx.region(params.region.as_deref());
    info!(group_id = %params.group_id, region, "deleting security group");

    match ctx.ec2.delete_security_group(region, &params.group_id).await {
        Ok(()) => json!({ "deleted": true, "group_id": params.group_id }),
        Err(e) => json!({ "error": e.to_string(), "group_id": params.group_id }),
    }
}

async fn authorize_security_group_rules(ctx: Arc<AwsContext>, params: ModifyRulesParams) -> Value {
    let region = ctx.region(params.region.as_deref());

    match ctx
        .ec2
        .authorize_security_group_ingress(region, &params.group_id, &params.rules)
        .await
    {
        Ok(()) => json!({
            "authorized": true,
            "group_id": params.group_id,
            "rules_added": params.rules.len(),
        }),
        Err(e) => json!({ "error": e.to_string(), "group_id": params.group_id }),
    }
}

async fn revoke_security_group_rules(ctx: Arc<AwsContext>, params: ModifyRulesParams) -> Value {
    let region = ctx.region(params.region.as_deref());

    match ctx
        .ec2
        .revoke_security_group_ingress(region, &params.group_id, &params.rules)
        .await
    {
        Ok(()) => json!({
            "revoked": true,
            "group_id": params.group_id,
            "rules_removed": params.rules.len(),
        }),
        Err(e) => json!({ "error": e.to_string(), "group_id": params.group_id }),
    }
}

async fn describe_security_group(ctx: Arc<AwsContext>, params: DescribeSecurityGroupParams) -> Value {
    let region = ctx.region(params.region.as_deref());

    let mut filters = Vec::new();
    if let Some(group_id) = &params.group_id {
        filters.push(Filter::new("group-id", [group_id.clone()]));
    }
    if let Some(group_name) = &params.group_name {
        filters.push(Filter::new("group-name", [group_name.clone()]));
    }

    match ctx.ec2.describe_security_groups(region, &filters).await {
        Ok(groups) => json!({ "security_groups": groups }),
        Err(e) => json!({ "error": e.to_string() }),
    }
}

async fn list_security_groups(ctx: Arc<AwsContext>, params: ListSecurityGroupsParams) -> Value {
    let region = ctx.region(params.region.as_deref()).to_string();

    match ctx.ec2.describe_security_groups(&region, &[]).await {
        Ok(groups) => {
            let summaries: Vec<Value> = groups
                .iter()
                .map(|group| {
                    json!({
                        "group_id": group.group_id,
                        "group_name": group.group_name,
                        "description": group.description,
                        "vpc_id": group.vpc_id,
                        "inbound_rule_count": group.ip_permissions.len(),
                    })
                })
                .collect();
            json!({ "region": region, "security_groups": summaries })
        }
        Err(e) => json!({ "error": e.to_string() }),
    }
}

pub(crate) fn actions() -> Vec<ActionEntry> {
    vec![
        action(
            "create_security_group",
            "Create a security group, optionally with initial inbound rules",
            create_security_group,
        ),
        action(
            "delete_security_group",
            "Delete a security group by ID",
            delete_security_group,
        ),
        action(
            "authorize_security_group_rules",
            "Add inbound rules to a security group",
            authorize_security_group_rules,
        ),
        action(
            "revoke_security_group_rules",
            "Remove inbound rules from a security group",
            revoke_security_group_rules,
        ),
        action(
            "describe_security_group",
            "Describe security groups by ID or name",
            describe_security_group,
        ),
        action(
            "list_security_groups",
            "List all security groups in a region",
            list_security_groups,
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
    async fn test_create_security_group_with_rules() {
        let stub = StubAws::new("running");
        let registry = ec2::registry();

        let result = registry
            .dispatch(
                stub.context("us-east-1"),
                "create_security_group",
                args(json!({
                    "group_name": "web",
                    "description": "web tier",
                    "vpc_id": "vpc-default",
                    "inbound_rules": [
                        { "protocol": "tcp", "from_port": 80, "to_port": 80, "cidr": "0.0.0.0/0" }
                    ]
                })),
            )
            .await;

        assert_eq!(result["group_id"], "sg-new123");
        assert_eq!(result["inbound_rules_added"], true);
        assert_eq!(
            stub.calls(),
            vec![
                "create_security_group".to_string(),
                "authorize_security_group_ingress".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_list_security_groups_summarizes_rule_count() {
        let stub = StubAws::new("running");
        let registry = ec2::registry();

        let result = registry
            .dispatch(
                stub.context("us-east-1"),
                "list_security_groups",
                args(json!({})),
            )
            .await;

        assert_eq!(result["security_groups"][0]["inbound_rule_count"], 1);
    }

    #[tokio::test]
    async fn test_revoke_rules_requires_rules_field() {
        let stub = StubAws::new("running");
        let registry = ec2::registry();

        let result = registry
            .dispatch(
                stub.context("us-east-1"),
                "revoke_security_group_rules",
                args(json!({ "group_id": "sg-123" })),
            )
            .await;

        assert!(result.get("validation_error").is_some());
        assert_eq!(stub.call_count(), 0);
    }
}
