//! VPC action definitions.

pub mod network;

use crate::domains::tools::registry::ServiceRegistry;

/// Build the VPC action registry.
pub fn registry() -> ServiceRegistry {
    ServiceRegistry::build(
        "vpc",
        "Unified VPC dispatcher for VPC and subnet lookups.",
        &[network::actions],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_contains_all_actions() {
        let registry = registry();
        assert_eq!(registry.len(), 6);

        let names = registry.action_names();
        for expected in [
            "list_vpcs",
            "get_default_vpc",
            "describe_vpc",
            "list_subnets",
            "get_default_subnets",
            "describe_subnet",
        ] {
            assert!(names.contains(&expected), "missing action: {expected}");
        }
    }
}
