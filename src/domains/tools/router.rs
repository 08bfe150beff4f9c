//! Tool Router - builds the rmcp ToolRouter from the service registries.
//!
//! For every service this registers the generic dispatcher tool plus one
//! generated route per action, all sharing the registry built at startup.
//! Tool invocations always resolve to a successful MCP result whose text is
//! the JSON record - error records included - so the host never sees a
//! transport-level failure for a failed call.

use std::sync::Arc;

use futures::FutureExt;
use rmcp::ErrorData as McpError;
use rmcp::handler::server::tool::{ToolCallContext, ToolRoute, ToolRouter};
use rmcp::model::{CallToolResult, Content};
use serde_json::Value;

use super::definitions::{ebs, ec2, vpc};
use super::registry::ServiceRegistry;
use crate::core::aws::AwsContext;

/// Render a dispatch record as the tool-call result.
fn record_result(value: Value) -> CallToolResult {
    let text = serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string());
    CallToolResult::success(vec![Content::text(text)])
}

/// Build the tool router with every service's dispatcher and action tools.
pub fn build_tool_router<S>(aws: Arc<AwsContext>) -> ToolRouter<S>
where
    S: Send + Sync + 'static,
{
    let mut router = ToolRouter::new();
    for registry in [ec2::registry(), ebs::registry(), vpc::registry()] {
        router = add_service_routes(router, Arc::new(registry), aws.clone());
    }
    router
}

fn add_service_routes<S>(
    mut router: ToolRouter<S>,
    registry: Arc<ServiceRegistry>,
    aws: Arc<AwsContext>,
) -> ToolRouter<S>
where
    S: Send + Sync + 'static,
{
    // The generic dispatcher route: {"action": ..., ...fields}.
    {
        let registry = registry.clone();
        let aws = aws.clone();
        router = router.with_route(ToolRoute::new_dyn(
            registry.dispatcher_tool(),
            move |call: ToolCallContext<'_, S>| {
                let args = call.arguments.clone().unwrap_or_default();
                let registry = registry.clone();
                let aws = aws.clone();
                async move {
                    let value = registry.dispatch_object(aws, args).await;
                    Ok::<CallToolResult, McpError>(record_result(value))
                }
                .boxed()
            },
        ));
    }

    // One pre-bound route per registered action.
    for (action, tool) in registry.individual_tools() {
        let registry = registry.clone();
        let aws = aws.clone();
        router = router.with_route(ToolRoute::new_dyn(
            tool,
            move |call: ToolCallContext<'_, S>| {
                let args = call.arguments.clone().unwrap_or_default();
                let registry = registry.clone();
                let aws = aws.clone();
                async move {
                    let value = registry.dispatch(aws, action, args).await;
                    Ok::<CallToolResult, McpError>(record_result(value))
                }
                .boxed()
            },
        ));
    }

    router
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::core::aws::stub::StubAws;

    struct TestServer {}

    fn test_aws() -> Arc<AwsContext> {
        StubAws::new("running").context("us-east-1")
    }

    #[test]
    fn test_build_router_registers_dispatchers_and_actions() {
        let router: ToolRouter<TestServer> = build_tool_router(test_aws());
        let tools = router.list_all();

        // 42 EC2 + 13 EBS + 6 VPC actions, plus 3 dispatchers.
        assert_eq!(tools.len(), 64);

        let names: Vec<_> = tools.iter().map(|t| t.name.as_ref()).collect();
        assert!(names.contains(&"aws_ec2"));
        assert!(names.contains(&"aws_ebs"));
        assert!(names.contains(&"aws_vpc"));
        assert!(names.contains(&"ec2_start_instance"));
        assert!(names.contains(&"ec2_get_latest_ami"));
        assert!(names.contains(&"ebs_attach_volume"));
        assert!(names.contains(&"vpc_list_vpcs"));
    }

    #[test]
    fn test_router_matches_registries() {
        let router: ToolRouter<TestServer> = build_tool_router(test_aws());
        let tools = router.list_all();
        let names: Vec<_> = tools.iter().map(|t| t.name.as_ref().to_string()).collect();

        for registry in [ec2::registry(), ebs::registry(), vpc::registry()] {
            assert!(names.contains(&registry.dispatcher_tool_name()));
            for action in registry.action_names() {
                let tool_name = format!("{}_{}", registry.service(), action);
                assert!(names.contains(&tool_name), "missing tool: {tool_name}");
            }
        }
    }

    #[test]
    fn test_build_router_is_idempotent() {
        let first: ToolRouter<TestServer> = build_tool_router(test_aws());
        let second: ToolRouter<TestServer> = build_tool_router(test_aws());

        let mut first_names: Vec<_> = first
            .list_all()
            .iter()
            .map(|t| t.name.as_ref().to_string())
            .collect();
        let mut second_names: Vec<_> = second
            .list_all()
            .iter()
            .map(|t| t.name.as_ref().to_string())
            .collect();
        first_names.sort();
        second_names.sort();

        assert_eq!(first_names.len(), second_names.len());
        assert_eq!(first_names, second_names);
    }

    #[test]
    fn test_individual_tool_schema_is_flat() {
        let registry = ec2::registry();
        let tools = registry.individual_tools();
        let (_, tool) = tools
            .iter()
            .find(|(name, _)| *name == "start_instance")
            .expect("start_instance tool");

        let props = tool.input_schema["properties"].as_object().unwrap();
        assert_eq!(props["instance_id"]["type"], "string");
        assert_eq!(props["region"]["type"], "string");
        assert_eq!(tool.input_schema["required"], json!(["instance_id"]));
    }
}
