//! Launch template actions.

use std::sync::Arc;

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::info;

use crate::core::aws::{
    AwsContext, BlockDeviceMappingSpec, IamInstanceProfileSpec, LaunchTemplateData,
    MetadataOptionsSpec, NetworkInterfaceSpec, TagSpecificationSpec,
};
use crate::domains::tools::registry::{ActionEntry, action};

fn default_count() -> i32 {
    1
}

/// Parameters for creating a launch template.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CreateLaunchTemplateParams {
    /// Name of the new launch template.
    #[serde(rename = "LaunchTemplateName")]
    pub launch_template_name: String,

    /// AMI ID the template launches.
    #[serde(rename = "ImageId")]
    pub image_id: String,

    /// EC2 instance type.
    #[serde(rename = "InstanceType")]
    pub instance_type: String,

    #[serde(rename = "VersionDescription")]
    pub version_description: Option<String>,

    #[serde(rename = "KeyName")]
    pub key_name: Option<String>,

    #[serde(rename = "SecurityGroupIds")]
    pub security_group_ids: Option<Vec<String>>,

    #[serde(rename = "SubnetId")]
    pub subnet_id: Option<String>,

    /// Cloud-init user data, plain text.
    #[serde(rename = "UserData")]
    pub user_data: Option<String>,

    #[serde(rename = "TagSpecifications")]
    pub tag_specifications: Option<Vec<TagSpecificationSpec>>,

    #[serde(rename = "BlockDeviceMappings")]
    pub block_device_mappings: Option<Vec<BlockDeviceMappingSpec>>,

    #[serde(rename = "NetworkInterfaces")]
    pub network_interfaces: Option<Vec<NetworkInterfaceSpec>>,

    #[serde(rename = "IamInstanceProfile")]
    pub iam_instance_profile: Option<IamInstanceProfileSpec>,

    #[serde(rename = "MetadataOptions")]
    pub metadata_options: Option<MetadataOptionsSpec>,

    pub region: Option<String>,
}

/// Parameters for adding a version to an existing template. All launch
/// fields are optional; only the given ones land in the new version.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CreateLaunchTemplateVersionParams {
    /// Name of the launch template to version.
    #[serde(rename = "LaunchTemplateName")]
    pub launch_template_name: String,

    #[serde(rename = "VersionDescription")]
    pub version_description: Option<String>,

    #[serde(rename = "ImageId")]
    pub image_id: Option<String>,

    #[serde(rename = "InstanceType")]
    pub instance_type: Option<String>,

    #[serde(rename = "KeyName")]
    pub key_name: Option<String>,

    #[serde(rename = "SecurityGroupIds")]
    pub security_group_ids: Option<Vec<String>>,

    #[serde(rename = "SubnetId")]
    pub subnet_id: Option<String>,

    /// Cloud-init user data, plain text.
    #[serde(rename = "UserData")]
    pub user_data: Option<String>,

    #[serde(rename = "TagSpecifications")]
    pub tag_specifications: Option<Vec<TagSpecificationSpec>>,

    #[serde(rename = "BlockDeviceMappings")]
    pub block_device_mappings: Option<Vec<BlockDeviceMappingSpec>>,

    #[serde(rename = "NetworkInterfaces")]
    pub network_interfaces: Option<Vec<NetworkInterfaceSpec>>,

    #[serde(rename = "IamInstanceProfile")]
    pub iam_instance_profile: Option<IamInstanceProfileSpec>,

    #[serde(rename = "MetadataOptions")]
    pub metadata_options: Option<MetadataOptionsSpec>,

    pub region: Option<String>,
}

/// Parameters identifying a template by name or ID.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct LaunchTemplateRefParams {
    #[serde(rename = "LaunchTemplateName")]
    pub launch_template_name: Option<String>,

    #[serde(rename = "LaunchTemplateId")]
    pub launch_template_id: Option<String>,

    pub region: Option<String>,
}

/// Region-only parameters for the listing action.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ListLaunchTemplatesParams {
    pub region: Option<String>,
}

/// Parameters for launching instances from a template.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct LaunchFromTemplateParams {
    /// Name of the launch template.
    #[serde(rename = "LaunchTemplateName")]
    pub launch_template_name: String,

    /// Template version to use. Defaults to $Latest.
    #[serde(rename = "Version")]
    pub version: Option<String>,

    #[serde(rename = "MinCount", default = "default_count")]
    pub min_count: i32,

    #[serde(rename = "MaxCount", default = "default_count")]
    pub max_count: i32,

    pub region: Option<String>,
}

async fn create_launch_template(ctx: Arc<AwsContext>, params: CreateLaunchTemplateParams) -> Value {
    let region = ctx.region(params.region.as_deref());
    info!(name = %params.launch_template_name, region, "creating launch template");

    let data = LaunchTemplateData {
        image_id: Some(params.image_id),
        instance_type: Some(params.instance_type),
        key_name: params.key_name,
        security_group_ids: params.security_group_ids,
        subnet_id: params.subnet_id,
        user_data: params.user_data,
        tag_specifications: params.tag_specifications,
        block_device_mappings: params.block_device_mappings,
        network_interfaces: params.network_interfaces,
        iam_instance_profile: params.iam_instance_profile,
        metadata_options: params.metadata_options,
    };

    match ctx
        .ec2
        .create_launch_template(
            region,
            &params.launch_template_name,
            params.version_description.as_deref().unwrap_or(""),
            data,
        )
        .await
    {
        Ok(template) => json!({ "launch_template": template }),
        Err(e) => json!({ "error": e.to_string() }),
    }
}

async fn create_launch_template_version(
    ctx: Arc<AwsContext>,
    params: CreateLaunchTemplateVersionParams,
) -> Value {
    let region = ctx.region(params.region.as_deref());
    info!(name = %params.launch_template_name, region, "creating launch template version");

    let data = LaunchTemplateData {
        image_id: params.image_id,
        instance_type: params.instance_type,
        key_name: params.key_name,
        security_group_ids: params.security_group_ids,
        subnet_id: params.subnet_id,
        user_data: params.user_data,
        tag_specifications: params.tag_specifications,
        block_device_mappings: params.block_device_mappings,
        network_interfaces: params.network_interfaces,
        iam_instance_profile: params.iam_instance_profile,
        metadata_options: params.metadata_options,
    };

    match ctx
        .ec2
        .create_launch_template_version(
            region,
            &params.launch_template_name,
            params.version_description.as_deref().unwrap_or(""),
            data,
        )
        .await
    {
        Ok(version) => json!({ "launch_template_version": version }),
        Err(e) => json!({ "error": e.to_string() }),
    }
}

async fn describe_launch_template(ctx: Arc<AwsContext>, params: LaunchTemplateRefParams) -> Value {
    let region = ctx.region(params.region.as_deref());

    if params.launch_template_name.is_none() && params.launch_template_id.is_none() {
        return json!({
            "error": "either LaunchTemplateName or LaunchTemplateId is required"
        });
    }

    let names: Vec<String> = params.launch_template_name.into_iter().collect();
    let ids: Vec<String> = params.launch_template_id.into_iter().collect();

    match ctx.ec2.describe_launch_templates(region, &names, &ids).await {
        Ok(templates) => json!({ "launch_templates": templates }),
        Err(e) => json!({ "error": e.to_string() }),
    }
}

async fn delete_launch_template(ctx: Arc<AwsContext>, params: LaunchTemplateRefParams) -> Value {
    let region = ctx.region(params.region.as_deref());

    if params.launch_template_name.is_none() && params.launch_template_id.is_none() {
        return json!({
            "error": "either LaunchTemplateName or LaunchTemplateId is required"
        });
    }

    match ctx
        .ec2
        .delete_launch_template(
            region,
            params.launch_template_name.as_deref(),
            params.launch_template_id.as_deref(),
        )
        .await
    {
        Ok(template) => json!({ "deleted": true, "launch_template": template }),
        Err(e) => json!({ "error": e.to_string() }),
    }
}

async fn list_launch_templates(ctx: Arc<AwsContext>, params: ListLaunchTemplatesParams) -> Value {
    let region = ctx.region(params.region.as_deref()).to_string();

    match ctx.ec2.describe_launch_templates(&region, &[], &[]).await {
        Ok(templates) => json!({ "region": region, "launch_templates": templates }),
        Err(e) => json!({ "error": e.to_string() }),
    }
}

async fn launch_from_template(ctx: Arc<AwsContext>, params: LaunchFromTemplateParams) -> Value {
    let region = ctx.region(params.region.as_deref()).to_string();
    let version = params.version.as_deref().unwrap_or("$Latest");
    info!(name = %params.launch_template_name, version, region, "launching from template");

    match ctx
        .ec2
        .run_instances_from_template(
            &region,
            &params.launch_template_name,
            version,
            params.min_count,
            params.max_count,
        )
        .await
    {
        Ok(instances) => json!({ "region": region, "instances": instances }),
        Err(e) => json!({ "error": e.to_string() }),
    }
}

pub(crate) fn actions() -> Vec<ActionEntry> {
    vec![
        action(
            "create_launch_template",
            "Create a launch template",
            create_launch_template,
        ),
        action(
            "create_launch_template_version",
            "Add a new version to a launch template",
            create_launch_template_version,
        ),
        action(
            "describe_launch_template",
            "Describe a launch template by name or ID",
            describe_launch_template,
        ),
        action(
            "delete_launch_template",
            "Delete a launch template by name or ID",
            delete_launch_template,
        ),
        action(
            "list_launch_templates",
            "List all launch templates in a region",
            list_launch_templates,
        ),
        action(
            "launch_from_template",
            "Launch instances from a launch template",
            launch_from_template,
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
    async fn test_create_launch_template() {
        let stub = StubAws::new("running");
        let registry = ec2::registry();

        let result = registry
            .dispatch(
                stub.context("us-east-1"),
                "create_launch_template",
                args(json!({
                    "LaunchTemplateName": "web-tier",
                    "ImageId": "ami-0abc1234",
                    "InstanceType": "t3.micro"
                })),
            )
            .await;

        assert_eq!(
            result["launch_template"]["launch_template_name"],
            "web-tier"
        );
    }

    #[tokio::test]
    async fn test_describe_requires_name_or_id() {
        let stub = StubAws::new("running");
        let registry = ec2::registry();

        let result = registry
            .dispatch(
                stub.context("us-east-1"),
                "describe_launch_template",
                args(json!({})),
            )
            .await;

        assert_eq!(
            result["error"],
            "either LaunchTemplateName or LaunchTemplateId is required"
        );
        assert_eq!(stub.call_count(), 0);
    }

    #[tokio::test]
    async fn test_launch_from_template_defaults_to_latest() {
        let stub = StubAws::new("pending");
        let registry = ec2::registry();

        let result = registry
            .dispatch(
                stub.context("us-east-1"),
                "launch_from_template",
                args(json!({ "LaunchTemplateName": "web-tier" })),
            )
            .await;

        assert_eq!(result["instances"][0]["instance_id"], "i-new00002");
        assert_eq!(stub.calls(), vec!["run_instances_from_template".to_string()]);
    }
}
