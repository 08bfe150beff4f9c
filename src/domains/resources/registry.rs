//! Resource Registry - merges every service's catalogue documents.
//!
//! Mirrors the tools side: each service definition file exposes a
//! `resources()` list and this module concatenates them in a fixed order.

use super::definitions::{ebs, ec2, vpc};
use super::service::ResourceEntry;

/// All catalogue resources, in service registration order.
pub fn get_all_resources() -> Vec<ResourceEntry> {
    let mut all = Vec::new();
    for service in [ec2::resources, ebs::resources, vpc::resources] {
        all.extend(service());
    }
    all
}

/// The list of registered resource URIs.
pub fn resource_uris() -> Vec<String> {
    get_all_resources()
        .iter()
        .map(|entry| entry.resource.raw.uri.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_all_resources() {
        let resources = get_all_resources();
        assert_eq!(resources.len(), 14);

        let uris = resource_uris();
        for expected in [
            "resource://aws/ec2/ami",
            "resource://aws/ec2/instance_creation",
            "resource://aws/ec2/instance_lifecycle",
            "resource://aws/ec2/keypair",
            "resource://aws/ec2/launch_templates",
            "resource://aws/ec2/instance_listing",
            "resource://aws/ec2/spot_requests",
            "resource://aws/ec2/metadata",
            "resource://aws/ec2/pricing",
            "resource://aws/ec2/security_groups",
            "resource://aws/ebs/volumes",
            "resource://aws/ebs/snapshots",
            "resource://aws/ebs/attachment",
            "resource://aws/vpc",
        ] {
            assert!(
                uris.contains(&expected.to_string()),
                "missing resource: {expected}"
            );
        }
    }

    #[test]
    fn test_load_is_idempotent() {
        let first = resource_uris();
        let second = resource_uris();
        assert_eq!(first.len(), second.len());
        assert_eq!(first, second);
    }

    #[test]
    fn test_uris_are_unique() {
        let mut uris = resource_uris();
        let total = uris.len();
        uris.sort();
        uris.dedup();
        assert_eq!(uris.len(), total);
    }
}
