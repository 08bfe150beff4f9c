//! Key pair actions.

use std::sync::Arc;

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::info;

use crate::core::aws::AwsContext;
use crate::domains::tools::registry::{ActionEntry, action};

/// Parameters naming a key pair.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct KeyPairNameParams {
    /// Name of the key pair.
    pub key_name: String,

    pub region: Option<String>,
}

/// Region-only parameters for the listing action.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ListKeyPairsParams {
    pub region: Option<String>,
}

async fn create_keypair(ctx: Arc<AwsContext>, params: KeyPairNameParams) -> Value {
    let region = ctx.region(params.region.as_deref());
    info!(key_name = %params.key_name, region, "creating key pair");

    match ctx.ec2.create_key_pair(region, &params.key_name).await {
        Ok(created) => json!({
            "key_name": created.key_name,
            "key_type": created.key_type,
            "key_material": created.key_material,
        }),
        Err(e) => json!({ "error": e.to_string(), "key_name": params.key_name }),
    }
}

async fn delete_keypair(ctx: Arc<AwsContext>, params: KeyPairNameParams) -> Value {
    let region = ctx.region(params.region.as_deref());
    info!(key_name = %params.key_name, region, "deleting key pair");

    match ctx.ec2.delete_key_pair(region, &params.key_name).await {
        Ok(()) => json!({ "deleted": true, "key_name": params.key_name }),
        Err(e) => json!({ "error": e.to_string(), "key_name": params.key_name }),
    }
}

async fn list_keypairs(ctx: Arc<AwsContext>, params: ListKeyPairsParams) -> Value {
    let region = ctx.region(params.region.as_deref()).to_string();

    match ctx.ec2.describe_key_pairs(&region).await {
        Ok(pairs) => {
            let keypairs: Vec<Value> = pairs
                .iter()
                .map(|pair| {
                    json!({
                        "key_name": pair.key_name,
                        "key_type": pair.key_type,
                        "fingerprint": pair.fingerprint,
                    })
                })
                .collect();
            json!({ "region": region, "keypairs": keypairs })
        }
        Err(e) => json!({ "error": e.to_string(), "region": region }),
    }
}

pub(crate) fn actions() -> Vec<ActionEntry> {
    vec![
        action(
            "create_keypair",
            "Create an EC2 key pair and return the PEM material",
            create_keypair,
        ),
        action(
            "delete_keypair",
            "Delete an EC2 key pair by name",
            delete_keypair,
        ),
        action(
            "list_keypairs",
            "List all key pairs in a region",
            list_keypairs,
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
    async fn test_create_keypair_returns_material() {
        let stub = StubAws::new("running");
        let registry = ec2::registry();

        let result = registry
            .dispatch(
                stub.context("us-east-1"),
                "create_keypair",
                args(json!({ "key_name": "deploy" })),
            )
            .await;

        assert_eq!(result["key_name"], "deploy");
        assert_eq!(result["key_type"], "rsa");
        assert!(
            result["key_material"]
                .as_str()
                .unwrap_or_default()
                .contains("PRIVATE KEY")
        );
    }

    #[tokio::test]
    async fn test_list_keypairs() {
        let stub = StubAws::new("running");
        let registry = ec2::registry();

        let result = registry
            .dispatch(
                stub.context("us-east-1"),
                "list_keypairs",
                args(json!({})),
            )
            .await;

        assert_eq!(result["region"], "us-east-1");
        assert_eq!(result["keypairs"][0]["key_name"], "dev-key");
    }
}
