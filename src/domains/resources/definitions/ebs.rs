//! EBS catalogue documents.

use serde_json::json;

use super::catalogue;
use crate::domains::resources::service::ResourceEntry;

pub fn resources() -> Vec<ResourceEntry> {
    vec![volumes(), snapshots(), attachment()]
}

fn volumes() -> ResourceEntry {
    catalogue(
        "resource://aws/ebs/volumes",
        "ebs_volumes_resource",
        "Volume actions routable through the aws_ebs dispatcher",
        json!({
            "service": "EBS",
            "domain": "volumes",
            "description": "Manage EBS volumes: create, modify, delete, describe.",
            "actions": {
                "create_volume": {
                    "description": "Create a new EBS volume.",
                    "required_params": ["AvailabilityZone"],
                    "optional_params": [
                        "VolumeType", "Size", "SnapshotId", "Iops", "Throughput",
                        "Encrypted", "KmsKeyId", "Tags", "region"
                    ],
                    "example": {
                        "action": "create_volume",
                        "AvailabilityZone": "us-east-1a",
                        "Size": 20
                    }
                },
                "modify_volume": {
                    "description": "Modify an existing EBS volume.",
                    "required_params": ["VolumeId"],
                    "optional_params": ["Size", "VolumeType", "Iops", "Throughput", "region"],
                    "example": { "action": "modify_volume", "VolumeId": "vol-123", "Size": 200 }
                },
                "delete_volume": {
                    "description": "Delete an EBS volume.",
                    "required_params": ["VolumeId"],
                    "optional_params": ["region"],
                    "example": { "action": "delete_volume", "VolumeId": "vol-123" }
                },
                "describe_volumes": {
                    "description": "Describe volume(s).",
                    "required_params": [],
                    "optional_params": ["VolumeId", "Filters", "region"],
                    "example": { "action": "describe_volumes" }
                }
            },
            "notes": [
                "Deleting a volume is permanent.",
                "Volumes must be detached before deletion."
            ]
        }),
    )
}

fn snapshots() -> ResourceEntry {
    catalogue(
        "resource://aws/ebs/snapshots",
        "ebs_snapshot_resource",
        "Snapshot actions routable through the aws_ebs dispatcher",
        json!({
            "service": "EBS",
            "domain": "snapshots",
            "description": "Manage EBS snapshots (create, list, copy, restore, delete).",
            "actions": {
                "create_snapshot": {
                    "description": "Create a snapshot from a volume.",
                    "required_params": ["VolumeId"],
                    "optional_params": ["Description", "Tags", "region"],
                    "example": { "action": "create_snapshot", "VolumeId": "vol-abc" }
                },
                "list_snapshots": {
                    "description": "List snapshots with optional filtering.",
                    "required_params": [],
                    "optional_params": ["OwnerIds", "Filters", "region"],
                    "example": { "action": "list_snapshots" }
                },
                "describe_snapshot": {
                    "description": "Describe a specific snapshot.",
                    "required_params": ["SnapshotId"],
                    "optional_params": ["region"],
                    "example": { "action": "describe_snapshot", "SnapshotId": "snap-123" }
                },
                "delete_snapshot": {
                    "description": "Delete a snapshot.",
                    "required_params": ["SnapshotId"],
                    "optional_params": ["region"],
                    "example": { "action": "delete_snapshot", "SnapshotId": "snap-999" }
                },
                "copy_snapshot": {
                    "description": "Copy a snapshot to another region.",
                    "required_params": ["SourceRegion", "SourceSnapshotId"],
                    "optional_params": ["Description", "Encrypted", "KmsKeyId", "Tags", "region"],
                    "example": {
                        "action": "copy_snapshot",
                        "SourceRegion": "us-east-1",
                        "SourceSnapshotId": "snap-111"
                    }
                },
                "restore_volume_from_snapshot": {
                    "description": "Restore/create volume from a snapshot.",
                    "required_params": ["SnapshotId", "AvailabilityZone"],
                    "optional_params": [
                        "VolumeType", "Size", "Iops", "Throughput",
                        "Encrypted", "KmsKeyId", "region"
                    ],
                    "example": {
                        "action": "restore_volume_from_snapshot",
                        "SnapshotId": "snap-111",
                        "AvailabilityZone": "us-east-1a"
                    }
                },
                "manage_fast_snapshot_restore": {
                    "description": "Enable/disable fast snapshot restore.",
                    "required_params": ["SnapshotId", "AvailabilityZones", "State"],
                    "optional_params": ["region"],
                    "example": {
                        "action": "manage_fast_snapshot_restore",
                        "SnapshotId": "snap-111",
                        "AvailabilityZones": ["us-east-1a"],
                        "State": "enable"
                    }
                }
            },
            "notes": [
                "Snapshot operations are asynchronous.",
                "Fast snapshot restore incurs extra cost."
            ]
        }),
    )
}

fn attachment() -> ResourceEntry {
    catalogue(
        "resource://aws/ebs/attachment",
        "ebs_attachment_resource",
        "Attachment actions routable through the aws_ebs dispatcher",
        json!({
            "service": "EBS",
            "domain": "attachment",
            "description": "Attach or detach EBS volumes from EC2 instances. Use the aws_ebs \
                            dispatcher tool with the below actions.",
            "actions": {
                "attach_volume": {
                    "description": "Attach an EBS volume to an EC2 instance.",
                    "required_params": ["VolumeId", "InstanceId", "Device"],
                    "optional_params": ["region"],
                    "example": {
                        "action": "attach_volume",
                        "VolumeId": "vol-123",
                        "InstanceId": "i-456",
                        "Device": "/dev/sdf"
                    }
                },
                "detach_volume": {
                    "description": "Detach an attached EBS volume.",
                    "required_params": ["VolumeId"],
                    "optional_params": ["InstanceId", "Force", "region"],
                    "example": { "action": "detach_volume", "VolumeId": "vol-123" }
                }
            },
            "notes": [
                "All actions flow through the unified aws_ebs dispatcher.",
                "Force detach may cause data loss if the instance is running."
            ]
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ebs_resource_count() {
        assert_eq!(resources().len(), 3);
    }

    #[test]
    fn test_documented_actions_exist_in_registry() {
        let registry = crate::domains::tools::definitions::ebs::registry();
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
