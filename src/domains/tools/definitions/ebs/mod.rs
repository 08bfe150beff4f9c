//! EBS action definitions.
//!
//! Module order is registration order; later files win name clashes.

pub mod attachments;
pub mod snapshots;
pub mod volumes;

use crate::domains::tools::registry::ServiceRegistry;

/// Build the EBS action registry.
pub fn registry() -> ServiceRegistry {
    ServiceRegistry::build(
        "ebs",
        "Unified EBS dispatcher. Routes an action name plus that action's \
         fields to the matching volume, snapshot, or attachment operation.",
        &[volumes::actions, snapshots::actions, attachments::actions],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_contains_all_actions() {
        let registry = registry();
        assert_eq!(registry.len(), 13);

        let names = registry.action_names();
        for expected in [
            "create_volume",
            "modify_volume",
            "delete_volume",
            "describe_volumes",
            "create_snapshot",
            "list_snapshots",
            "describe_snapshot",
            "delete_snapshot",
            "copy_snapshot",
            "restore_volume_from_snapshot",
            "manage_fast_snapshot_restore",
            "attach_volume",
            "detach_volume",
        ] {
            assert!(names.contains(&expected), "missing action: {expected}");
        }
    }
}
