//! Instance creation actions: on-demand, minimal, spot, and SSH hints.

use std::slice;
use std::sync::Arc;

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::info;

use crate::core::aws::{
    AwsContext, BlockDeviceMappingSpec, IamInstanceProfileSpec, MetadataOptionsSpec,
    NetworkInterfaceSpec, RunInstancesRequest, SpotInstanceRequest, TagSpecificationSpec,
};
use crate::domains::tools::registry::{ActionEntry, action};

fn default_count() -> i32 {
    1
}

/// Full launch parameters for an on-demand instance.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CreateInstanceParams {
    /// AMI ID to launch.
    #[serde(rename = "ImageId")]
    pub image_id: String,

    /// EC2 instance type.
    #[serde(rename = "InstanceType")]
    pub instance_type: String,

    #[serde(rename = "MinCount", default = "default_count")]
    pub min_count: i32,

    #[serde(rename = "MaxCount", default = "default_count")]
    pub max_count: i32,

    #[serde(rename = "KeyName")]
    pub key_name: Option<String>,

    #[serde(rename = "SubnetId")]
    pub subnet_id: Option<String>,

    #[serde(rename = "SecurityGroupIds")]
    pub security_group_ids: Option<Vec<String>>,

    #[serde(rename = "BlockDeviceMappings")]
    pub block_device_mappings: Option<Vec<BlockDeviceMappingSpec>>,

    #[serde(rename = "NetworkInterfaces")]
    pub network_interfaces: Option<Vec<NetworkInterfaceSpec>>,

    #[serde(rename = "TagSpecifications")]
    pub tag_specifications: Option<Vec<TagSpecificationSpec>>,

    #[serde(rename = "IamInstanceProfile")]
    pub iam_instance_profile: Option<IamInstanceProfileSpec>,

    #[serde(rename = "MetadataOptions")]
    pub metadata_options: Option<MetadataOptionsSpec>,

    /// Cloud-init user data, plain text.
    #[serde(rename = "UserData")]
    pub user_data: Option<String>,

    /// AWS region to launch in. Defaults to the configured region.
    pub region: Option<String>,
}

/// The short form: image, type, and the handful of common options.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CreateInstanceMinimalParams {
    /// AMI ID to launch.
    #[serde(rename = "ImageId")]
    pub image_id: String,

    /// EC2 instance type.
    #[serde(rename = "InstanceType")]
    pub instance_type: String,

    #[serde(rename = "KeyName")]
    pub key_name: Option<String>,

    #[serde(rename = "SecurityGroupIds")]
    pub security_group_ids: Option<Vec<String>>,

    #[serde(rename = "SubnetId")]
    pub subnet_id: Option<String>,

    #[serde(rename = "TagSpecifications")]
    pub tag_specifications: Option<Vec<TagSpecificationSpec>>,

    pub region: Option<String>,
}

/// Launch parameters for a one-time spot instance request.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CreateSpotInstanceParams {
    /// AMI ID to launch.
    #[serde(rename = "ImageId")]
    pub image_id: String,

    /// EC2 instance type.
    #[serde(rename = "InstanceType")]
    pub instance_type: String,

    /// Maximum bid price, e.g. "0.015". AWS uses the market price when
    /// omitted.
    #[serde(rename = "MaxPrice")]
    pub max_price: Option<String>,

    #[serde(rename = "KeyName")]
    pub key_name: Option<String>,

    #[serde(rename = "SecurityGroupIds")]
    pub security_group_ids: Option<Vec<String>>,

    #[serde(rename = "SubnetId")]
    pub subnet_id: Option<String>,

    #[serde(rename = "BlockDeviceMappings")]
    pub block_device_mappings: Option<Vec<BlockDeviceMappingSpec>>,

    #[serde(rename = "TagSpecifications")]
    pub tag_specifications: Option<Vec<TagSpecificationSpec>>,

    #[serde(rename = "IamInstanceProfile")]
    pub iam_instance_profile: Option<IamInstanceProfileSpec>,

    /// Cloud-init user data, plain text.
    #[serde(rename = "UserData")]
    pub user_data: Option<String>,

    pub region: Option<String>,
}

/// Parameters for the SSH connection hint.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct InstanceSshInstructionParams {
    /// ID of the EC2 instance.
    pub instance_id: String,

    /// Name of the keypair used for SSH.
    pub key_name: Option<String>,

    /// Local path where the PEM is saved.
    pub pem_path: Option<String>,

    pub region: Option<String>,
}

async fn create_instance(ctx: Arc<AwsContext>, params: CreateInstanceParams) -> Value {
    let region = ctx.region(params.region.as_deref()).to_string();
    info!(image_id = %params.image_id, instance_type = %params.instance_type, region, "launching instance");

    let request = RunInstancesRequest {
        image_id: params.image_id,
        instance_type: params.instance_type,
        min_count: params.min_count,
        max_count: params.max_count,
        key_name: params.key_name,
        subnet_id: params.subnet_id,
        security_group_ids: params.security_group_ids,
        block_device_mappings: params.block_device_mappings,
        network_interfaces: params.network_interfaces,
        tag_specifications: params.tag_specifications,
        iam_instance_profile: params.iam_instance_profile,
        metadata_options: params.metadata_options,
        user_data: params.user_data,
    };

    match ctx.ec2.run_instances(&region, request).await {
        Ok(instances) => match instances.first() {
            Some(instance) => json!({
                "region": region,
                "instance_id": instance.instance_id,
                "instance_type": instance.instance_type,
                "state": instance.state,
            }),
            None => json!({ "error": "no instance returned" }),
        },
        Err(e) => json!({ "error": e.to_string() }),
    }
}

async fn create_instance_minimal(ctx: Arc<AwsContext>, params: CreateInstanceMinimalParams) -> Value {
    let region = ctx.region(params.region.as_deref()).to_string();
    info!(image_id = %params.image_id, instance_type = %params.instance_type, region, "launching instance (minimal)");

    let request = RunInstancesRequest {
        image_id: params.image_id,
        instance_type: params.instance_type,
        min_count: 1,
        max_count: 1,
        key_name: params.key_name,
        subnet_id: params.subnet_id,
        security_group_ids: params.security_group_ids,
        tag_specifications: params.tag_specifications,
        ..Default::default()
    };

    match ctx.ec2.run_instances(&region, request).await {
        Ok(instances) => match instances.first() {
            Some(instance) => json!({
                "region": region,
                "instance_id": instance.instance_id,
                "public_ip": instance.public_ip,
                "state": instance.state,
            }),
            None => json!({ "error": "no instance returned" }),
        },
        Err(e) => json!({ "error": e.to_string() }),
    }
}

async fn create_spot_instance(ctx: Arc<AwsContext>, params: CreateSpotInstanceParams) -> Value {
    let region = ctx.region(params.region.as_deref()).to_string();
    info!(image_id = %params.image_id, instance_type = %params.instance_type, region, "requesting spot instance");

    let request = SpotInstanceRequest {
        image_id: params.image_id,
        instance_type: params.instance_type,
        max_price: params.max_price,
        key_name: params.key_name,
        subnet_id: params.subnet_id,
        security_group_ids: params.security_group_ids,
        block_device_mappings: params.block_device_mappings,
        iam_instance_profile: params.iam_instance_profile,
        tag_specifications: params.tag_specifications,
        user_data: params.user_data,
    };

    match ctx.ec2.request_spot_instances(&region, request).await {
        Ok(requests) => match requests.first() {
            Some(request) => json!({
                "region": region,
                "spot_request_id": request.spot_request_id,
                "state": request.state,
            }),
            None => json!({ "error": "no spot request returned" }),
        },
        Err(e) => json!({ "error": e.to_string() }),
    }
}

/// Best-effort default login user for an AMI.
fn guess_ssh_user(image_id: &str) -> &'static str {
    let image = image_id.to_lowercase();
    if image.contains("ubuntu") {
        "ubuntu"
    } else {
        "ec2-user"
    }
}

async fn generate_instance_ssh_instruction(
    ctx: Arc<AwsContext>,
    params: InstanceSshInstructionParams,
) -> Value {
    let region = ctx.region(params.region.as_deref()).to_string();

    let instances = match ctx
        .ec2
        .describe_instances(&region, slice::from_ref(&params.instance_id), &[])
        .await
    {
        Ok(instances) => instances,
        Err(e) => return json!({ "error": e.to_string() }),
    };

    let Some(instance) = instances.first() else {
        return json!({ "error": format!("Instance {} not found", params.instance_id) });
    };

    let Some(public_ip) = instance.public_ip.clone() else {
        return json!({ "error": "Instance has no public IP" });
    };

    let Some(key_name) = params.key_name.or_else(|| instance.key_name.clone()) else {
        return json!({ "error": "No KeyPair associated with instance" });
    };

    let pem_path = params
        .pem_path
        .unwrap_or_else(|| format!("~/{key_name}.pem"));
    let user = guess_ssh_user(instance.image_id.as_deref().unwrap_or_default());
    let ssh_command = format!("ssh -i {pem_path} {user}@{public_ip}");

    json!({
        "instance_id": params.instance_id,
        "region": region,
        "public_ip": public_ip,
        "key_name": key_name,
        "pem_path": pem_path,
        "recommended_user": user,
        "ssh_command": ssh_command,
    })
}

pub(crate) fn actions() -> Vec<ActionEntry> {
    vec![
        action(
            "create_instance",
            "Launch an on-demand EC2 instance with full configuration",
            create_instance,
        ),
        action(
            "create_instance_minimal",
            "Launch an EC2 instance with a minimal parameter set",
            create_instance_minimal,
        ),
        action(
            "create_spot_instance",
            "Request a one-time spot instance",
            create_spot_instance,
        ),
        action(
            "generate_instance_ssh_instruction",
            "Build the ssh command line for connecting to an instance",
            generate_instance_ssh_instruction,
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
    async fn test_create_instance_minimal() {
        let stub = StubAws::new("pending");
        let registry = ec2::registry();

        let result = registry
            .dispatch(
                stub.context("us-east-1"),
                "create_instance_minimal",
                args(json!({ "ImageId": "ami-0abc1234", "InstanceType": "t3.micro" })),
            )
            .await;

        assert_eq!(result["state"], "pending");
        assert_eq!(result["region"], "us-east-1");
        assert_eq!(stub.calls(), vec!["run_instances".to_string()]);
    }

    #[tokio::test]
    async fn test_create_instance_requires_image_id() {
        let stub = StubAws::new("pending");
        let registry = ec2::registry();

        let result = registry
            .dispatch(
                stub.context("us-east-1"),
                "create_instance",
                args(json!({ "InstanceType": "t3.micro" })),
            )
            .await;

        let message = result["validation_error"].as_str().unwrap_or_default();
        assert!(message.contains("ImageId"), "got: {message}");
        assert_eq!(stub.call_count(), 0);
    }

    #[tokio::test]
    async fn test_create_spot_instance() {
        let stub = StubAws::new("pending");
        let registry = ec2::registry();

        let result = registry
            .dispatch(
                stub.context("us-east-1"),
                "create_spot_instance",
                args(json!({
                    "ImageId": "ami-0abc1234",
                    "InstanceType": "t3.micro",
                    "MaxPrice": "0.015"
                })),
            )
            .await;

        assert_eq!(result["spot_request_id"], "sir-stub0001");
        assert_eq!(result["state"], "open");
    }

    #[tokio::test]
    async fn test_ssh_instruction_builds_command() {
        let stub = StubAws::new("running");
        let registry = ec2::registry();

        let result = registry
            .dispatch(
                stub.context("us-east-1"),
                "generate_instance_ssh_instruction",
                args(json!({ "instance_id": "i-1234" })),
            )
            .await;

        assert_eq!(result["recommended_user"], "ec2-user");
        assert_eq!(
            result["ssh_command"],
            "ssh -i ~/dev-key.pem ec2-user@203.0.113.10"
        );
    }

    #[test]
    fn test_guess_ssh_user() {
        assert_eq!(guess_ssh_user("ami-ubuntu-jammy"), "ubuntu");
        assert_eq!(guess_ssh_user("ami-amzn2"), "ec2-user");
        assert_eq!(guess_ssh_user(""), "ec2-user");
    }
}
