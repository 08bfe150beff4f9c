//! EC2 action definitions.
//!
//! One file per concern; each exposes an `actions()` list that the service
//! registry merges. The module order below is the registration order, so a
//! name clash between files resolves in favor of the later file.

pub mod ami;
pub mod creation;
pub mod keypairs;
pub mod launch_templates;
pub mod lifecycle;
pub mod listing;
pub mod metadata;
pub mod pricing;
pub mod security_groups;

use crate::domains::tools::registry::ServiceRegistry;

/// Build the EC2 action registry.
pub fn registry() -> ServiceRegistry {
    ServiceRegistry::build(
        "ec2",
        "Unified EC2 dispatcher. Routes an action name plus that action's \
         fields to the matching EC2 operation.",
        &[
            lifecycle::actions,
            creation::actions,
            listing::actions,
            security_groups::actions,
            keypairs::actions,
            ami::actions,
            launch_templates::actions,
            metadata::actions,
            pricing::actions,
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_contains_all_actions() {
        let registry = registry();
        assert_eq!(registry.len(), 42);

        let names = registry.action_names();
        for expected in [
            "start_instance",
            "stop_instance",
            "reboot_instance",
            "hard_reboot_instance",
            "terminate_instance",
            "create_instance",
            "create_instance_minimal",
            "create_spot_instance",
            "generate_instance_ssh_instruction",
            "list_ec2_instances",
            "get_instance_details",
            "get_instance_status",
            "list_running_instances",
            "list_instances_by_tag",
            "list_spot_requests",
            "get_spot_request_details",
            "cancel_spot_request",
            "create_security_group",
            "delete_security_group",
            "authorize_security_group_rules",
            "revoke_security_group_rules",
            "describe_security_group",
            "list_security_groups",
            "create_keypair",
            "delete_keypair",
            "list_keypairs",
            "create_ami",
            "describe_images",
            "deregister_ami",
            "get_latest_ami",
            "create_launch_template",
            "create_launch_template_version",
            "describe_launch_template",
            "delete_launch_template",
            "list_launch_templates",
            "launch_from_template",
            "get_user_data",
            "describe_metadata_options",
            "modify_metadata_options",
            "get_ondemand_price",
            "get_spot_price_history",
            "estimate_instance_cost",
        ] {
            assert!(names.contains(&expected), "missing action: {expected}");
        }
    }

    #[test]
    fn test_registry_build_is_idempotent() {
        let first = registry();
        let second = registry();
        assert_eq!(first.len(), second.len());
        assert_eq!(first.action_names(), second.action_names());
    }
}
