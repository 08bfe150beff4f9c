//! VPC catalogue document.

use serde_json::json;

use super::catalogue;
use crate::domains::resources::service::ResourceEntry;

pub fn resources() -> Vec<ResourceEntry> {
    vec![network()]
}

fn network() -> ResourceEntry {
    catalogue(
        "resource://aws/vpc",
        "vpc_resource",
        "VPC and subnet actions routable through the aws_vpc dispatcher",
        json!({
            "service": "VPC",
            "description": "Manage VPC networks, subnets, and default infrastructure. Use the \
                            unified aws_vpc dispatcher with the actions below.",
            "actions": {
                "list_vpcs": {
                    "description": "List all VPCs in a region.",
                    "required_params": [],
                    "optional_params": ["region"],
                    "example": { "action": "list_vpcs", "region": "us-east-1" }
                },
                "get_default_vpc": {
                    "description": "Get the default VPC for a region.",
                    "required_params": [],
                    "optional_params": ["region"],
                    "example": { "action": "get_default_vpc" }
                },
                "describe_vpc": {
                    "description": "Describe one VPC or all VPCs if no ID is provided.",
                    "required_params": [],
                    "optional_params": ["vpc_id", "region"],
                    "example": { "action": "describe_vpc", "vpc_id": "vpc-123456" }
                },
                "list_subnets": {
                    "description": "List all subnets in the region.",
                    "required_params": [],
                    "optional_params": ["region"],
                    "example": { "action": "list_subnets" }
                },
                "get_default_subnets": {
                    "description": "Fetch all subnets inside the default VPC.",
                    "required_params": [],
                    "optional_params": ["region"],
                    "example": { "action": "get_default_subnets" }
                },
                "describe_subnet": {
                    "description": "Describe a specific subnet or list subnets by VPC.",
                    "required_params": [],
                    "optional_params": ["subnet_id", "vpc_id", "region"],
                    "example": { "action": "describe_subnet", "subnet_id": "subnet-123456" }
                }
            },
            "notes": [
                "All actions must be executed through the aws_vpc dispatcher.",
                "Subnets & VPCs are region-scoped; the configured default region applies \
                 when none is given."
            ]
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_documented_actions_exist_in_registry() {
        let registry = crate::domains::tools::definitions::vpc::registry();
        let entry = network();
        let document: serde_json::Value =
            serde_json::from_str(&entry.content).expect("valid json");
        for name in document["actions"].as_object().unwrap().keys() {
            assert!(
                registry.get(name).is_some(),
                "documented action missing from registry: {name}"
            );
        }
    }
}
