//! EC2 catalogue documents.

use serde_json::json;

use super::catalogue;
use crate::domains::resources::service::ResourceEntry;

pub fn resources() -> Vec<ResourceEntry> {
    vec![
        ami(),
        instance_creation(),
        instance_lifecycle(),
        keypair(),
        launch_templates(),
        instance_listing(),
        spot_requests(),
        metadata(),
        pricing(),
        security_groups(),
    ]
}

fn ami() -> ResourceEntry {
    catalogue(
        "resource://aws/ec2/ami",
        "ec2_ami_resource",
        "AMI actions routable through the aws_ec2 dispatcher",
        json!({
            "service": "EC2",
            "domain": "AMI",
            "description": "Operations related to Amazon Machine Images (AMIs). \
                            Use the aws_ec2 dispatcher tool with the actions listed below.",
            "actions": {
                "create_ami": {
                    "description": "Create an AMI from an EC2 instance.",
                    "required_params": ["instance_id", "name"],
                    "optional_params": ["description", "tags", "no_reboot", "region"],
                    "example": {
                        "action": "create_ami",
                        "instance_id": "i-0123456789abcdef0",
                        "name": "my-backup-image"
                    }
                },
                "describe_images": {
                    "description": "Describe AMIs using owners, image IDs, or filters.",
                    "required_params": [],
                    "optional_params": ["owners", "image_ids", "filters", "region"],
                    "example": { "action": "describe_images", "owners": ["amazon"] }
                },
                "deregister_ami": {
                    "description": "Delete/deregister an AMI.",
                    "required_params": ["image_id"],
                    "optional_params": ["region"],
                    "example": {
                        "action": "deregister_ami",
                        "image_id": "ami-0abcd1234example"
                    }
                },
                "get_latest_ami": {
                    "description": "Fetch the latest AMI for a given OS type \
                                    (ubuntu, amazon-linux-2, windows-2022, debian, etc.).",
                    "required_params": ["os_type"],
                    "optional_params": ["region", "architecture"],
                    "example": { "action": "get_latest_ami", "os_type": "ubuntu" }
                }
            },
            "notes": [
                "All AMI operations run via the aws_ec2 dispatcher tool.",
                "Ensure your IAM role has permissions: ec2:CreateImage, ec2:DeregisterImage, ec2:DescribeImages.",
                "get_latest_ami supports: ubuntu, amazon-linux-2, amazon-linux-2023, \
                 windows-2022, windows-2019, debian, rhel, suse."
            ]
        }),
    )
}

fn instance_creation() -> ResourceEntry {
    catalogue(
        "resource://aws/ec2/instance_creation",
        "ec2_instance_creation_resource",
        "Instance creation actions routable through the aws_ec2 dispatcher",
        json!({
            "service": "EC2",
            "domain": "instance_creation",
            "description": "Operations for creating EC2 instances: on-demand, minimal, spot, \
                            and SSH helper generation.",
            "actions": {
                "create_instance": {
                    "description": "Create a fully-configurable EC2 on-demand instance.",
                    "required_params": ["ImageId", "InstanceType"],
                    "optional_params": [
                        "MinCount", "MaxCount",
                        "KeyName", "SubnetId", "SecurityGroupIds",
                        "BlockDeviceMappings", "NetworkInterfaces",
                        "TagSpecifications", "IamInstanceProfile",
                        "MetadataOptions", "UserData",
                        "region"
                    ],
                    "example": {
                        "action": "create_instance",
                        "ImageId": "ami-0abcd1234example",
                        "InstanceType": "t3.micro"
                    }
                },
                "create_instance_minimal": {
                    "description": "Create an EC2 instance with only required fields. \
                                    This is the simplest and safest creation pathway.",
                    "required_params": ["ImageId", "InstanceType"],
                    "optional_params": [
                        "KeyName", "SecurityGroupIds",
                        "SubnetId", "TagSpecifications",
                        "region"
                    ],
                    "example": {
                        "action": "create_instance_minimal",
                        "ImageId": "ami-0abcd1234example",
                        "InstanceType": "t3.micro"
                    }
                },
                "create_spot_instance": {
                    "description": "Launch a spot EC2 instance using the request_spot_instances API.",
                    "required_params": ["ImageId", "InstanceType"],
                    "optional_params": [
                        "MaxPrice", "KeyName", "SecurityGroupIds",
                        "SubnetId", "BlockDeviceMappings",
                        "TagSpecifications", "IamInstanceProfile",
                        "UserData", "region"
                    ],
                    "example": {
                        "action": "create_spot_instance",
                        "ImageId": "ami-0abcd1234example",
                        "InstanceType": "t3.micro",
                        "MaxPrice": "0.0050"
                    }
                },
                "generate_instance_ssh_instruction": {
                    "description": "Generate SSH instructions (username + command) based on \
                                    AMI family and public IP.",
                    "required_params": ["instance_id"],
                    "optional_params": ["key_name", "pem_path", "region"],
                    "example": {
                        "action": "generate_instance_ssh_instruction",
                        "instance_id": "i-0123456789abcdef"
                    }
                }
            },
            "notes": [
                "create_instance offers the full run_instances flexibility.",
                "create_instance_minimal is recommended for basic setups.",
                "Spot instances may take time to fulfill depending on capacity/price.",
                "SSH usernames differ based on AMI (ubuntu -> ubuntu, amazon-linux -> ec2-user).",
                "All actions must be executed using the aws_ec2 dispatcher tool."
            ]
        }),
    )
}

fn instance_lifecycle() -> ResourceEntry {
    catalogue(
        "resource://aws/ec2/instance_lifecycle",
        "ec2_instance_lifecycle_resource",
        "Instance lifecycle actions routable through the aws_ec2 dispatcher",
        json!({
            "service": "EC2",
            "domain": "instance_lifecycle",
            "description": "Start, stop, reboot, hard-reboot, and terminate EC2 instances. \
                            Execute using the aws_ec2 dispatcher tool.",
            "actions": {
                "start_instance": {
                    "description": "Start an EC2 instance.",
                    "required_params": ["instance_id"],
                    "optional_params": ["region"],
                    "example": {
                        "action": "start_instance",
                        "instance_id": "i-0123456789abcdef"
                    }
                },
                "stop_instance": {
                    "description": "Stop a running EC2 instance.",
                    "required_params": ["instance_id"],
                    "optional_params": ["region"],
                    "example": {
                        "action": "stop_instance",
                        "instance_id": "i-0123456789abcdef"
                    }
                },
                "reboot_instance": {
                    "description": "Soft reboot an EC2 instance (graceful).",
                    "required_params": ["instance_id"],
                    "optional_params": ["region"],
                    "example": {
                        "action": "reboot_instance",
                        "instance_id": "i-0123456789abcdef"
                    }
                },
                "hard_reboot_instance": {
                    "description": "Hard reboot an EC2 instance. EC2 escalates to a forced \
                                    restart when the guest does not shut down cleanly.",
                    "required_params": ["instance_id"],
                    "optional_params": ["region"],
                    "example": {
                        "action": "hard_reboot_instance",
                        "instance_id": "i-0123456789abcdef"
                    }
                },
                "terminate_instance": {
                    "description": "Permanently terminate an EC2 instance (cannot be undone).",
                    "required_params": ["instance_id"],
                    "optional_params": ["region"],
                    "example": {
                        "action": "terminate_instance",
                        "instance_id": "i-0123456789abcdef"
                    }
                }
            },
            "notes": [
                "Lifecycle operations require the instance to be in a valid state.",
                "stop_instance works only on running instances.",
                "start_instance works only on stopped instances.",
                "terminate_instance is irreversible.",
                "All lifecycle actions must be used with the aws_ec2 dispatcher."
            ]
        }),
    )
}

fn keypair() -> ResourceEntry {
    catalogue(
        "resource://aws/ec2/keypair",
        "ec2_keypair_resource",
        "Key pair actions routable through the aws_ec2 dispatcher",
        json!({
            "service": "EC2",
            "domain": "keypair",
            "description": "Create, delete, and list EC2 SSH key pairs. \
                            Use the aws_ec2 dispatcher tool.",
            "actions": {
                "create_keypair": {
                    "description": "Create an EC2 key pair. Returns key material (PEM) that \
                                    you must save locally.",
                    "required_params": ["key_name"],
                    "optional_params": ["region"],
                    "example": { "action": "create_keypair", "key_name": "my-server-key" }
                },
                "delete_keypair": {
                    "description": "Delete an EC2 key pair by name.",
                    "required_params": ["key_name"],
                    "optional_params": ["region"],
                    "example": { "action": "delete_keypair", "key_name": "my-server-key" }
                },
                "list_keypairs": {
                    "description": "List all EC2 key pairs in the given region.",
                    "required_params": [],
                    "optional_params": ["region"],
                    "example": { "action": "list_keypairs" }
                }
            },
            "notes": [
                "Key pairs are required for SSH authentication for many AMIs.",
                "PEM material is returned only during creation - save it immediately.",
                "Deleting a key pair does NOT delete local PEM files.",
                "All keypair actions must be executed using the aws_ec2 dispatcher."
            ]
        }),
    )
}

fn launch_templates() -> ResourceEntry {
    catalogue(
        "resource://aws/ec2/launch_templates",
        "ec2_launch_templates_resource",
        "Launch template actions routable through the aws_ec2 dispatcher",
        json!({
            "service": "EC2",
            "domain": "launch_templates",
            "description": "Manage EC2 launch templates, including creation, versioning, \
                            description, deletion, listing, and launching instances from \
                            templates. Use the aws_ec2 dispatcher tool with the actions below.",
            "actions": {
                "create_launch_template": {
                    "description": "Create a new EC2 launch template.",
                    "required_params": ["LaunchTemplateName", "ImageId", "InstanceType"],
                    "optional_params": [
                        "VersionDescription", "KeyName", "SecurityGroupIds",
                        "SubnetId", "UserData", "TagSpecifications",
                        "BlockDeviceMappings", "NetworkInterfaces",
                        "IamInstanceProfile", "MetadataOptions", "region"
                    ],
                    "example": {
                        "action": "create_launch_template",
                        "LaunchTemplateName": "my-app-template",
                        "ImageId": "ami-0abcd1234example",
                        "InstanceType": "t3.micro"
                    }
                },
                "create_launch_template_version": {
                    "description": "Create a new version of an existing launch template.",
                    "required_params": ["LaunchTemplateName"],
                    "optional_params": [
                        "VersionDescription", "ImageId", "InstanceType",
                        "KeyName", "SecurityGroupIds", "SubnetId",
                        "UserData", "TagSpecifications", "BlockDeviceMappings",
                        "NetworkInterfaces", "IamInstanceProfile",
                        "MetadataOptions", "region"
                    ],
                    "example": {
                        "action": "create_launch_template_version",
                        "LaunchTemplateName": "my-app-template",
                        "ImageId": "ami-0abcd1234example"
                    }
                },
                "describe_launch_template": {
                    "description": "Describe a launch template by name or ID.",
                    "required_params": [],
                    "optional_params": ["LaunchTemplateName", "LaunchTemplateId", "region"],
                    "example": {
                        "action": "describe_launch_template",
                        "LaunchTemplateName": "my-app-template"
                    }
                },
                "delete_launch_template": {
                    "description": "Delete a launch template by name or ID.",
                    "required_params": [],
                    "optional_params": ["LaunchTemplateName", "LaunchTemplateId", "region"],
                    "example": {
                        "action": "delete_launch_template",
                        "LaunchTemplateName": "my-app-template"
                    }
                },
                "list_launch_templates": {
                    "description": "List all launch templates in a region.",
                    "required_params": [],
                    "optional_params": ["region"],
                    "example": { "action": "list_launch_templates" }
                },
                "launch_from_template": {
                    "description": "Launch an EC2 instance using a launch template. Uses the \
                                    specified version or falls back to $Latest.",
                    "required_params": ["LaunchTemplateName"],
                    "optional_params": ["Version", "MinCount", "MaxCount", "region"],
                    "example": {
                        "action": "launch_from_template",
                        "LaunchTemplateName": "my-app-template",
                        "Version": "$Latest"
                    }
                }
            },
            "notes": [
                "Launch templates allow reusable instance configuration.",
                "UserData is automatically base64-encoded inside the tool implementation.",
                "Versioning lets you maintain multiple configurations under one template name.",
                "Use launch_from_template when you want consistent reproducible instances.",
                "All actions must be executed through the aws_ec2 dispatcher."
            ]
        }),
    )
}

fn instance_listing() -> ResourceEntry {
    catalogue(
        "resource://aws/ec2/instance_listing",
        "ec2_instance_listing_resource",
        "Instance listing actions routable through the aws_ec2 dispatcher",
        json!({
            "service": "EC2",
            "domain": "instance_listing",
            "description": "Retrieve EC2 instance information: listings, filters, status, and \
                            tag-based queries. Use the aws_ec2 dispatcher tool with the \
                            actions below.",
            "actions": {
                "list_ec2_instances": {
                    "description": "List EC2 instances with advanced filtering options: state, \
                                    type, VPC, subnet, SG, spot filters and custom_filters.",
                    "required_params": [],
                    "optional_params": [
                        "region", "instance_ids", "states", "tag_key", "tag_value",
                        "instance_types", "vpc_ids", "subnet_ids", "security_group_ids",
                        "spot_only", "exclude_spot", "spot_request_id", "custom_filters"
                    ],
                    "example": { "action": "list_ec2_instances", "states": ["running"] }
                },
                "get_instance_details": {
                    "description": "Fetch full EC2 instance details by instance ID.",
                    "required_params": ["instance_id"],
                    "optional_params": ["region"],
                    "example": {
                        "action": "get_instance_details",
                        "instance_id": "i-0123456789abcdef0"
                    }
                },
                "get_instance_status": {
                    "description": "Get instance state, public IP, instance type, and lifecycle.",
                    "required_params": ["instance_id"],
                    "optional_params": ["region"],
                    "example": {
                        "action": "get_instance_status",
                        "instance_id": "i-0123456789abcdef0"
                    }
                },
                "list_running_instances": {
                    "description": "List only EC2 instances currently in the 'running' state.",
                    "required_params": [],
                    "optional_params": ["region", "spot_only"],
                    "example": { "action": "list_running_instances" }
                },
                "list_instances_by_tag": {
                    "description": "List instances filtered by tag key & value.",
                    "required_params": ["tag_key", "tag_value"],
                    "optional_params": ["region", "spot_only"],
                    "example": {
                        "action": "list_instances_by_tag",
                        "tag_key": "env",
                        "tag_value": "prod"
                    }
                }
            },
            "notes": [
                "This resource covers all non-spot EC2 listing operations.",
                "Use the EC2 spot requests resource for spot request APIs.",
                "All actions are routed via the aws_ec2 dispatcher."
            ]
        }),
    )
}

fn spot_requests() -> ResourceEntry {
    catalogue(
        "resource://aws/ec2/spot_requests",
        "ec2_spot_requests_resource",
        "Spot request actions routable through the aws_ec2 dispatcher",
        json!({
            "service": "EC2",
            "domain": "spot_requests",
            "description": "Manage EC2 spot instance requests: listing, detail lookup, and \
                            cancellation.",
            "actions": {
                "list_spot_requests": {
                    "description": "List AWS spot instance requests (SIRs).",
                    "required_params": [],
                    "optional_params": ["region", "spot_request_ids", "states"],
                    "example": {
                        "action": "list_spot_requests",
                        "states": ["open", "active"]
                    }
                },
                "get_spot_request_details": {
                    "description": "Retrieve details of a specific spot instance request.",
                    "required_params": ["spot_request_id"],
                    "optional_params": ["region"],
                    "example": {
                        "action": "get_spot_request_details",
                        "spot_request_id": "sir-1234567890abcdef"
                    }
                },
                "cancel_spot_request": {
                    "description": "Cancel a spot instance request. This does NOT terminate \
                                    any launched instance.",
                    "required_params": ["spot_request_id"],
                    "optional_params": ["region"],
                    "example": {
                        "action": "cancel_spot_request",
                        "spot_request_id": "sir-1234567890abcdef"
                    }
                }
            },
            "notes": [
                "Cancelling a spot request does NOT terminate the instance.",
                "Spot instance pricing/history is found in the EC2 pricing resource.",
                "All actions use the aws_ec2 dispatcher."
            ]
        }),
    )
}

fn metadata() -> ResourceEntry {
    catalogue(
        "resource://aws/ec2/metadata",
        "ec2_metadata_resource",
        "Instance metadata actions routable through the aws_ec2 dispatcher",
        json!({
            "service": "EC2",
            "domain": "metadata",
            "description": "Retrieve and modify EC2 instance metadata configuration including \
                            user-data and IMDSv2 settings. Use the aws_ec2 dispatcher tool \
                            with the actions below.",
            "actions": {
                "get_user_data": {
                    "description": "Fetch the user-data script of an EC2 instance. User-data \
                                    is base64-decoded in the response.",
                    "required_params": ["instance_id"],
                    "optional_params": ["region"],
                    "example": {
                        "action": "get_user_data",
                        "instance_id": "i-0123456789abcdef0"
                    }
                },
                "describe_metadata_options": {
                    "description": "Describe EC2 instance metadata options (IMDS version, \
                                    HttpTokens requirement, etc).",
                    "required_params": ["instance_id"],
                    "optional_params": ["region"],
                    "example": {
                        "action": "describe_metadata_options",
                        "instance_id": "i-0123456789abcdef0"
                    }
                },
                "modify_metadata_options": {
                    "description": "Modify EC2 metadata configuration. Useful for enforcing \
                                    IMDSv2 or adjusting hop limits.",
                    "required_params": ["instance_id"],
                    "optional_params": [
                        "region", "http_tokens", "http_endpoint",
                        "http_put_response_hop_limit"
                    ],
                    "example": {
                        "action": "modify_metadata_options",
                        "instance_id": "i-0123456789abcdef0",
                        "http_tokens": "required"
                    }
                }
            },
            "notes": [
                "User-data is only applied during instance launch unless explicitly re-run.",
                "IMDSv2 enforcement is recommended for security (http_tokens='required').",
                "HopLimit determines how many network hops metadata requests may traverse.",
                "All metadata actions must be executed via the aws_ec2 dispatcher tool."
            ]
        }),
    )
}

fn pricing() -> ResourceEntry {
    catalogue(
        "resource://aws/ec2/pricing",
        "ec2_pricing_resource",
        "Pricing actions routable through the aws_ec2 dispatcher",
        json!({
            "service": "EC2",
            "domain": "pricing",
            "description": "Query AWS EC2 on-demand pricing, spot pricing history, and monthly \
                            cost estimates. Use the aws_ec2 dispatcher tool with the actions \
                            below.",
            "actions": {
                "get_ondemand_price": {
                    "description": "Retrieve real-time on-demand pricing for an EC2 instance \
                                    type in a given region. Returns both hourly and monthly cost.",
                    "required_params": ["instance_type"],
                    "optional_params": ["operating_system", "region"],
                    "example": {
                        "action": "get_ondemand_price",
                        "instance_type": "t3.micro",
                        "region": "us-east-1"
                    }
                },
                "get_spot_price_history": {
                    "description": "Retrieve historical spot pricing data for a given instance \
                                    type. You may also filter by time range or an availability \
                                    zone.",
                    "required_params": ["instance_type"],
                    "optional_params": [
                        "product_description", "start_time", "end_time",
                        "availability_zone", "region"
                    ],
                    "example": {
                        "action": "get_spot_price_history",
                        "instance_type": "t3.large",
                        "availability_zone": "us-east-1a"
                    }
                },
                "estimate_instance_cost": {
                    "description": "Estimate monthly EC2 cost using on-demand pricing. \
                                    Defaults to 730 hours/month unless specified.",
                    "required_params": ["instance_type"],
                    "optional_params": ["hours_per_month", "operating_system", "region"],
                    "example": {
                        "action": "estimate_instance_cost",
                        "instance_type": "t3.micro",
                        "hours_per_month": 100
                    }
                }
            },
            "notes": [
                "On-demand pricing uses the AWS Pricing API (always queried via us-east-1).",
                "Spot pricing fluctuates by AZ, OS, market supply, and time.",
                "Monthly cost estimation is based on hourly on-demand price x hours_per_month.",
                "Region mapping automatically converts region -> AWS pricing location name.",
                "All pricing operations must be routed via the aws_ec2 dispatcher."
            ]
        }),
    )
}

fn security_groups() -> ResourceEntry {
    catalogue(
        "resource://aws/ec2/security_groups",
        "ec2_security_groups_resource",
        "Security group actions routable through the aws_ec2 dispatcher",
        json!({
            "service": "EC2",
            "domain": "security_groups",
            "description": "Manage EC2 security groups including creation, deletion, rule \
                            authorization, rule revocation, description, and listing. Use the \
                            aws_ec2 dispatcher tool with the actions below.",
            "actions": {
                "create_security_group": {
                    "description": "Create a security group within a VPC and optionally attach \
                                    inbound rules. Inbound rules use IpPermission objects \
                                    (protocol, from_port, to_port, cidr).",
                    "required_params": ["group_name", "description", "vpc_id"],
                    "optional_params": ["inbound_rules", "region"],
                    "example": {
                        "action": "create_security_group",
                        "group_name": "my-sg",
                        "description": "SG for web servers",
                        "vpc_id": "vpc-012abc345",
                        "inbound_rules": [
                            { "protocol": "tcp", "from_port": 80, "to_port": 80, "cidr": "0.0.0.0/0" }
                        ]
                    }
                },
                "delete_security_group": {
                    "description": "Delete an EC2 security group by group ID.",
                    "required_params": ["group_id"],
                    "optional_params": ["region"],
                    "example": {
                        "action": "delete_security_group",
                        "group_id": "sg-012abcd1234"
                    }
                },
                "authorize_security_group_rules": {
                    "description": "Add inbound rules to a security group. Each rule must \
                                    match the IpPermission schema.",
                    "required_params": ["group_id", "rules"],
                    "optional_params": ["region"],
                    "example": {
                        "action": "authorize_security_group_rules",
                        "group_id": "sg-012abcd1234",
                        "rules": [
                            { "protocol": "tcp", "from_port": 22, "to_port": 22, "cidr": "0.0.0.0/0" }
                        ]
                    }
                },
                "revoke_security_group_rules": {
                    "description": "Remove inbound rules from a security group. Rules must \
                                    match existing rules.",
                    "required_params": ["group_id", "rules"],
                    "optional_params": ["region"],
                    "example": {
                        "action": "revoke_security_group_rules",
                        "group_id": "sg-012abcd1234",
                        "rules": [
                            { "protocol": "tcp", "from_port": 22, "to_port": 22, "cidr": "0.0.0.0/0" }
                        ]
                    }
                },
                "describe_security_group": {
                    "description": "Describe one or more security groups by group_id or \
                                    group_name.",
                    "required_params": [],
                    "optional_params": ["group_id", "group_name", "region"],
                    "example": {
                        "action": "describe_security_group",
                        "group_id": "sg-012abcd1234"
                    }
                },
                "list_security_groups": {
                    "description": "List every security group in the region.",
                    "required_params": [],
                    "optional_params": ["region"],
                    "example": { "action": "list_security_groups" }
                }
            },
            "notes": [
                "Security groups are stateful - return traffic is automatically allowed.",
                "Only inbound rules are handled here.",
                "All rule definitions must match IpPermission { protocol, from_port, to_port, cidr }.",
                "SG operations require EC2 permissions: CreateSecurityGroup, \
                 AuthorizeSecurityGroupIngress, RevokeSecurityGroupIngress, \
                 DescribeSecurityGroups.",
                "All actions must be executed via the aws_ec2 dispatcher."
            ]
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ec2_resource_count() {
        assert_eq!(resources().len(), 10);
    }

    #[test]
    fn test_documents_share_catalogue_shape() {
        for entry in resources() {
            let document: serde_json::Value =
                serde_json::from_str(&entry.content).expect("valid json");
            assert_eq!(document["service"], "EC2");
            assert!(document["domain"].is_string());
            assert!(document["actions"].is_object(), "{}", entry.resource.raw.uri);
            assert!(document["notes"].is_array());

            for (name, action) in document["actions"].as_object().unwrap() {
                assert!(action["description"].is_string(), "{name}");
                assert!(action["required_params"].is_array(), "{name}");
                assert!(action["optional_params"].is_array(), "{name}");
                assert!(action["example"]["action"].is_string(), "{name}");
            }
        }
    }

    #[test]
    fn test_documented_actions_exist_in_registry() {
        let registry = crate::domains::tools::definitions::ec2::registry();
        for entry in resources() {
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
}
