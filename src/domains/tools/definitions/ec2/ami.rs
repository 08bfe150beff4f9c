//! AMI actions: create, describe, deregister, and latest-image lookup.

use std::collections::BTreeMap;
use std::sync::Arc;

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::info;

use crate::core::aws::{AwsContext, CreateImageRequest, Filter, ImageDetail};
use crate::domains::tools::registry::{ActionEntry, action};

/// Parameters for imaging an instance.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CreateAmiParams {
    /// Instance ID to create the AMI from.
    pub instance_id: String,

    /// Name of the resulting AMI.
    pub name: String,

    pub description: Option<String>,

    /// If true, the instance is not rebooted during imaging.
    #[serde(default)]
    pub no_reboot: bool,

    /// Tags to apply to the resulting AMI.
    pub tags: Option<BTreeMap<String, String>>,

    pub region: Option<String>,
}

/// Parameters for describing images.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DescribeImagesParams {
    /// Owners list, e.g. ["self", "amazon"].
    pub owners: Option<Vec<String>>,

    pub image_ids: Option<Vec<String>>,

    /// EC2-compatible filter list.
    pub filters: Option<Vec<Filter>>,

    pub region: Option<String>,
}

/// Parameters identifying an AMI.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ImageIdParams {
    /// AMI ID to deregister.
    pub image_id: String,

    pub region: Option<String>,
}

fn default_architecture() -> String {
    "x86_64".to_string()
}

/// Parameters for the latest-AMI lookup.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetLatestAmiParams {
    /// OS type: ubuntu, amazon-linux-2, amazon-linux-2023, windows-2022,
    /// windows-2019, debian, rhel, suse.
    pub os_type: String,

    /// Architecture: x86_64 or arm64.
    #[serde(default = "default_architecture")]
    pub architecture: String,

    pub region: Option<String>,
}

/// Owner and name pattern for each supported OS family.
fn os_image_query(os_type: &str) -> Option<(&'static str, &'static str)> {
    match os_type {
        "ubuntu" => Some(("099720109477", "ubuntu/images/hvm-ssd/ubuntu-jammy-22.04-*")),
        "amazon-linux-2" => Some(("amazon", "amzn2-ami-hvm-*-gp2")),
        "amazon-linux-2023" => Some(("amazon", "al2023-ami-*")),
        "windows-2022" => Some(("amazon", "Windows_Server-2022-English-Full-Base-*")),
        "windows-2019" => Some(("amazon", "Windows_Server-2019-English-Full-Base-*")),
        "debian" => Some(("136693071363", "debian-12-*")),
        "rhel" => Some(("309956199498", "RHEL-9.*_HVM-*")),
        "suse" => Some(("013907871322", "suse-sles-15-*")),
        _ => None,
    }
}

async fn create_ami(ctx: Arc<AwsContext>, params: CreateAmiParams) -> Value {
    let region = ctx.region(params.region.as_deref());
    info!(instance_id = %params.instance_id, name = %params.name, region, "creating AMI");

    let tags = params.tags.clone();
    let request = CreateImageRequest {
        instance_id: params.instance_id,
        name: params.name.clone(),
        description: params.description,
        no_reboot: params.no_reboot,
        tags: params.tags,
    };

    match ctx.ec2.create_image(region, request).await {
        Ok(image_id) => {
            let tag_list: Vec<Value> = tags
                .unwrap_or_default()
                .iter()
                .map(|(key, value)| json!({ "Key": key, "Value": value }))
                .collect();
            json!({
                "image_id": image_id,
                "state": "created",
                "name": params.name,
                "tags": tag_list,
            })
        }
        Err(e) => json!({ "error": e.to_string() }),
    }
}

async fn describe_images(ctx: Arc<AwsContext>, params: DescribeImagesParams) -> Value {
    let region = ctx.region(params.region.as_deref());

    let owners = params.owners.unwrap_or_default();
    let image_ids = params.image_ids.unwrap_or_default();
    let filters = params.filters.unwrap_or_default();

    match ctx
        .ec2
        .describe_images(region, &owners, &image_ids, &filters)
        .await
    {
        Ok(images) => json!({ "images": images }),
        Err(e) => json!({ "error": e.to_string() }),
    }
}

async fn deregister_ami(ctx: Arc<AwsContext>, params: ImageIdParams) -> Value {
    let region = ctx.region(params.region.as_deref());
    info!(image_id = %params.image_id, region, "deregistering AMI");

    match ctx.ec2.deregister_image(region, &params.image_id).await {
        Ok(()) => json!({ "image_id": params.image_id, "state": "deregistered" }),
        Err(e) => json!({ "error": e.to_string(), "image_id": params.image_id }),
    }
}

fn latest_by_creation_date(mut images: Vec<ImageDetail>) -> Option<ImageDetail> {
    images.sort_by(|a, b| b.creation_date.cmp(&a.creation_date));
    images.into_iter().next()
}

async fn get_latest_ami(ctx: Arc<AwsContext>, params: GetLatestAmiParams) -> Value {
    let region = ctx.region(params.region.as_deref()).to_string();
    let os_type = params.os_type.to_lowercase();

    let Some((owner, name_pattern)) = os_image_query(&os_type) else {
        return json!({ "error": format!("Unsupported OS type: {}", params.os_type) });
    };

    let filters = vec![
        Filter::new("name", [name_pattern]),
        Filter::new("architecture", [params.architecture.clone()]),
        Filter::new("state", ["available"]),
        Filter::new("virtualization-type", ["hvm"]),
    ];

    let owners = vec![owner.to_string()];
    let images = match ctx
        .ec2
        .describe_images(&region, &owners, &[], &filters)
        .await
    {
        Ok(images) => images,
        Err(e) => return json!({ "error": e.to_string() }),
    };

    match latest_by_creation_date(images) {
        Some(latest) => json!({
            "ami_id": latest.image_id,
            "name": latest.name,
            "description": latest.description,
            "creation_date": latest.creation_date,
            "os_type": os_type,
            "region": region,
            "architecture": params.architecture,
            "owner_id": latest.owner_id,
        }),
        None => json!({
            "ami_id": "",
            "name": "",
            "description": "No AMI found",
            "creation_date": "",
            "os_type": os_type,
            "region": region,
            "architecture": params.architecture,
            "owner_id": "",
        }),
    }
}

pub(crate) fn actions() -> Vec<ActionEntry> {
    vec![
        action(
            "create_ami",
            "Create an AMI from a running or stopped instance",
            create_ami,
        ),
        action(
            "describe_images",
            "Describe AMIs by owner, ID, or filter",
            describe_images,
        ),
        action(
            "deregister_ami",
            "Deregister an AMI by ID",
            deregister_ami,
        ),
        action(
            "get_latest_ami",
            "Find the newest AMI for a given OS family and architecture",
            get_latest_ami,
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
    async fn test_create_ami() {
        let stub = StubAws::new("running");
        let registry = ec2::registry();

        let result = registry
            .dispatch(
                stub.context("us-east-1"),
                "create_ami",
                args(json!({
                    "instance_id": "i-1234",
                    "name": "backup-2024",
                    "tags": { "purpose": "backup" }
                })),
            )
            .await;

        assert_eq!(result["image_id"], "ami-new12345");
        assert_eq!(result["state"], "created");
        assert_eq!(result["tags"][0]["Key"], "purpose");
    }

    #[tokio::test]
    async fn test_get_latest_ami_picks_newest() {
        let stub = StubAws::new("running");
        let registry = ec2::registry();

        let result = registry
            .dispatch(
                stub.context("us-east-1"),
                "get_latest_ami",
                args(json!({ "os_type": "ubuntu" })),
            )
            .await;

        assert_eq!(result["ami_id"], "ami-newest");
        assert_eq!(result["os_type"], "ubuntu");
        assert_eq!(result["architecture"], "x86_64");
    }

    #[tokio::test]
    async fn test_get_latest_ami_unsupported_os() {
        let stub = StubAws::new("running");
        let registry = ec2::registry();

        let result = registry
            .dispatch(
                stub.context("us-east-1"),
                "get_latest_ami",
                args(json!({ "os_type": "plan9" })),
            )
            .await;

        assert_eq!(result["error"], "Unsupported OS type: plan9");
        assert_eq!(stub.call_count(), 0);
    }

    #[test]
    fn test_os_image_query_table() {
        assert!(os_image_query("ubuntu").is_some());
        assert!(os_image_query("rhel").is_some());
        assert!(os_image_query("templeos").is_none());
    }
}
