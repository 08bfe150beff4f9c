//! Mappings between AWS SDK types and the flattened summary/request types.
//!
//! All the field-by-field plumbing for the SDK-backed client lives here so
//! `sdk.rs` stays close to one call per method.

use aws_sdk_ec2::primitives::{DateTime, DateTimeFormat};
use aws_sdk_ec2::types as ec2;
use std::collections::BTreeMap;

use super::types::*;
use super::{AwsError, AwsResult};

pub(super) fn format_time(time: Option<&DateTime>) -> Option<String> {
    time.and_then(|t| t.fmt(DateTimeFormat::DateTime).ok())
}

pub(super) fn parse_time(value: &str) -> AwsResult<DateTime> {
    DateTime::from_str(value, DateTimeFormat::DateTime)
        .map_err(|e| AwsError::api(format!("invalid timestamp '{value}': {e}")))
}

pub(super) fn to_filters(filters: &[Filter]) -> Option<Vec<ec2::Filter>> {
    if filters.is_empty() {
        return None;
    }
    Some(
        filters
            .iter()
            .map(|f| {
                ec2::Filter::builder()
                    .name(&f.name)
                    .set_values(Some(f.values.clone()))
                    .build()
            })
            .collect(),
    )
}

pub(super) fn to_vec_opt(values: &[String]) -> Option<Vec<String>> {
    if values.is_empty() {
        None
    } else {
        Some(values.to_vec())
    }
}

pub(super) fn tags(tags: &[ec2::Tag]) -> Vec<ResourceTag> {
    tags.iter()
        .filter_map(|t| {
            Some(ResourceTag {
                key: t.key()?.to_string(),
                value: t.value()?.to_string(),
            })
        })
        .collect()
}

/// Build a `TagSpecification` for a resource type from a flat tag map.
pub(super) fn tag_specification(
    resource_type: ec2::ResourceType,
    tags: &BTreeMap<String, String>,
) -> ec2::TagSpecification {
    let mut builder = ec2::TagSpecification::builder().resource_type(resource_type);
    for (key, value) in tags {
        builder = builder.tags(ec2::Tag::builder().key(key).value(value).build());
    }
    builder.build()
}

pub(super) fn to_tag_specifications(
    specs: &[TagSpecificationSpec],
) -> Vec<ec2::TagSpecification> {
    specs
        .iter()
        .map(|spec| {
            let mut builder = ec2::TagSpecification::builder()
                .resource_type(ec2::ResourceType::from(spec.resource_type.as_str()));
            for tag in &spec.tags {
                builder = builder.tags(ec2::Tag::builder().key(&tag.key).value(&tag.value).build());
            }
            builder.build()
        })
        .collect()
}

pub(super) fn to_block_device_mappings(
    specs: &[BlockDeviceMappingSpec],
) -> Vec<ec2::BlockDeviceMapping> {
    specs
        .iter()
        .map(|spec| {
            let mut builder = ec2::BlockDeviceMapping::builder().device_name(&spec.device_name);
            if let Some(ebs) = &spec.ebs {
                builder = builder.ebs(
                    ec2::EbsBlockDevice::builder()
                        .set_volume_size(ebs.volume_size)
                        .set_volume_type(
                            ebs.volume_type
                                .as_deref()
                                .map(ec2::VolumeType::from),
                        )
                        .set_delete_on_termination(ebs.delete_on_termination)
                        .set_encrypted(ebs.encrypted)
                        .set_snapshot_id(ebs.snapshot_id.clone())
                        .build(),
                );
            }
            builder.build()
        })
        .collect()
}

pub(super) fn to_network_interfaces(
    specs: &[NetworkInterfaceSpec],
) -> Vec<ec2::InstanceNetworkInterfaceSpecification> {
    specs
        .iter()
        .map(|spec| {
            ec2::InstanceNetworkInterfaceSpecification::builder()
                .device_index(spec.device_index)
                .set_subnet_id(spec.subnet_id.clone())
                .set_description(spec.description.clone())
                .set_groups(spec.groups.clone())
                .set_delete_on_termination(spec.delete_on_termination)
                .set_associate_public_ip_address(spec.associate_public_ip_address)
                .build()
        })
        .collect()
}

pub(super) fn to_iam_profile(
    spec: &IamInstanceProfileSpec,
) -> ec2::IamInstanceProfileSpecification {
    ec2::IamInstanceProfileSpecification::builder()
        .set_name(spec.name.clone())
        .set_arn(spec.arn.clone())
        .build()
}

pub(super) fn to_metadata_options(
    spec: &MetadataOptionsSpec,
) -> ec2::InstanceMetadataOptionsRequest {
    ec2::InstanceMetadataOptionsRequest::builder()
        .set_http_tokens(spec.http_tokens.as_deref().map(ec2::HttpTokensState::from))
        .set_http_endpoint(
            spec.http_endpoint
                .as_deref()
                .map(ec2::InstanceMetadataEndpointState::from),
        )
        .set_http_put_response_hop_limit(spec.http_put_response_hop_limit)
        .build()
}

pub(super) fn to_ip_permissions(rules: &[IpPermissionSpec]) -> Vec<ec2::IpPermission> {
    rules
        .iter()
        .map(|rule| {
            ec2::IpPermission::builder()
                .ip_protocol(&rule.protocol)
                .set_from_port(rule.from_port)
                .set_to_port(rule.to_port)
                .ip_ranges(ec2::IpRange::builder().cidr_ip(&rule.cidr).build())
                .build()
        })
        .collect()
}

pub(super) fn state_change(change: &ec2::InstanceStateChange) -> InstanceStateChange {
    InstanceStateChange {
        instance_id: change.instance_id().unwrap_or_default().to_string(),
        current_state: change
            .current_state()
            .and_then(|s| s.name())
            .map(|n| n.as_str().to_string())
            .unwrap_or_default(),
        previous_state: change
            .previous_state()
            .and_then(|s| s.name())
            .map(|n| n.as_str().to_string()),
    }
}

pub(super) fn launched_instance(instance: &ec2::Instance) -> LaunchedInstance {
    LaunchedInstance {
        instance_id: instance.instance_id().unwrap_or_default().to_string(),
        instance_type: instance
            .instance_type()
            .map(|t| t.as_str().to_string())
            .unwrap_or_default(),
        state: instance
            .state()
            .and_then(|s| s.name())
            .map(|n| n.as_str().to_string())
            .unwrap_or_default(),
        public_ip: instance.public_ip_address().map(str::to_string),
        private_ip: instance.private_ip_address().map(str::to_string),
    }
}

pub(super) fn instance_detail(instance: &ec2::Instance) -> InstanceDetail {
    InstanceDetail {
        instance_id: instance.instance_id().unwrap_or_default().to_string(),
        instance_type: instance.instance_type().map(|t| t.as_str().to_string()),
        state: instance
            .state()
            .and_then(|s| s.name())
            .map(|n| n.as_str().to_string()),
        public_ip: instance.public_ip_address().map(str::to_string),
        private_ip: instance.private_ip_address().map(str::to_string),
        key_name: instance.key_name().map(str::to_string),
        image_id: instance.image_id().map(str::to_string),
        vpc_id: instance.vpc_id().map(str::to_string),
        subnet_id: instance.subnet_id().map(str::to_string),
        availability_zone: instance
            .placement()
            .and_then(|p| p.availability_zone())
            .map(str::to_string),
        launch_time: format_time(instance.launch_time()),
        lifecycle: instance
            .instance_lifecycle()
            .map(|l| l.as_str().to_string())
            .unwrap_or_else(|| "on-demand".to_string()),
        security_groups: instance
            .security_groups()
            .iter()
            .map(|g| GroupRef {
                group_id: g.group_id().map(str::to_string),
                group_name: g.group_name().map(str::to_string),
            })
            .collect(),
        metadata_options: instance.metadata_options().map(metadata_options_state),
        tags: tags(instance.tags()),
    }
}

pub(super) fn metadata_options_state(
    options: &ec2::InstanceMetadataOptionsResponse,
) -> MetadataOptionsState {
    MetadataOptionsState {
        state: options.state().map(|s| s.as_str().to_string()),
        http_tokens: options.http_tokens().map(|t| t.as_str().to_string()),
        http_endpoint: options.http_endpoint().map(|e| e.as_str().to_string()),
        http_put_response_hop_limit: options.http_put_response_hop_limit(),
    }
}

pub(super) fn spot_request_detail(request: &ec2::SpotInstanceRequest) -> SpotRequestDetail {
    SpotRequestDetail {
        spot_request_id: request
            .spot_instance_request_id()
            .unwrap_or_default()
            .to_string(),
        state: request.state().map(|s| s.as_str().to_string()),
        status_code: request
            .status()
            .and_then(|s| s.code())
            .map(str::to_string),
        status_message: request
            .status()
            .and_then(|s| s.message())
            .map(str::to_string),
        instance_id: request.instance_id().map(str::to_string),
        instance_type: request
            .launch_specification()
            .and_then(|l| l.instance_type())
            .map(|t| t.as_str().to_string()),
        spot_price: request.spot_price().map(str::to_string),
        create_time: format_time(request.create_time()),
    }
}

pub(super) fn spot_price_entry(price: &ec2::SpotPrice) -> SpotPriceEntry {
    SpotPriceEntry {
        timestamp: format_time(price.timestamp()),
        spot_price: price.spot_price().map(str::to_string),
        instance_type: price.instance_type().map(|t| t.as_str().to_string()),
        product_description: price
            .product_description()
            .map(|p| p.as_str().to_string()),
        az: price.availability_zone().map(str::to_string),
    }
}

pub(super) fn security_group_detail(group: &ec2::SecurityGroup) -> SecurityGroupDetail {
    SecurityGroupDetail {
        group_id: group.group_id().map(str::to_string),
        group_name: group.group_name().map(str::to_string),
        description: group.description().map(str::to_string),
        vpc_id: group.vpc_id().map(str::to_string),
        ip_permissions: group
            .ip_permissions()
            .iter()
            .map(|perm| IpPermissionDetail {
                protocol: perm.ip_protocol().map(str::to_string),
                from_port: perm.from_port(),
                to_port: perm.to_port(),
                cidrs: perm
                    .ip_ranges()
                    .iter()
                    .filter_map(|r| r.cidr_ip())
                    .map(str::to_string)
                    .collect(),
            })
            .collect(),
    }
}

pub(super) fn key_pair_detail(info: &ec2::KeyPairInfo) -> KeyPairDetail {
    KeyPairDetail {
        key_name: info.key_name().map(str::to_string),
        key_type: info.key_type().map(|t| t.as_str().to_string()),
        fingerprint: info.key_fingerprint().map(str::to_string),
    }
}

pub(super) fn image_detail(image: &ec2::Image) -> ImageDetail {
    ImageDetail {
        image_id: image.image_id().map(str::to_string),
        name: image.name().map(str::to_string),
        description: image.description().map(str::to_string),
        state: image.state().map(|s| s.as_str().to_string()),
        creation_date: image.creation_date().map(str::to_string),
        owner_id: image.owner_id().map(str::to_string),
        architecture: image.architecture().map(|a| a.as_str().to_string()),
        tags: tags(image.tags()),
    }
}

pub(super) fn launch_template_detail(template: &ec2::LaunchTemplate) -> LaunchTemplateDetail {
    LaunchTemplateDetail {
        launch_template_id: template.launch_template_id().map(str::to_string),
        launch_template_name: template.launch_template_name().map(str::to_string),
        default_version_number: template.default_version_number(),
        latest_version_number: template.latest_version_number(),
        create_time: format_time(template.create_time()),
    }
}

pub(super) fn launch_template_version_detail(
    version: &ec2::LaunchTemplateVersion,
) -> LaunchTemplateVersionDetail {
    LaunchTemplateVersionDetail {
        launch_template_id: version.launch_template_id().map(str::to_string),
        launch_template_name: version.launch_template_name().map(str::to_string),
        version_number: version.version_number(),
        version_description: version.version_description().map(str::to_string),
    }
}

pub(super) fn to_launch_template_data(
    data: &LaunchTemplateData,
    user_data_b64: Option<String>,
) -> ec2::RequestLaunchTemplateData {
    let mut builder = ec2::RequestLaunchTemplateData::builder()
        .set_image_id(data.image_id.clone())
        .set_instance_type(data.instance_type.as_deref().map(ec2::InstanceType::from))
        .set_key_name(data.key_name.clone())
        .set_security_group_ids(data.security_group_ids.clone())
        .set_user_data(user_data_b64);

    // The template data has no top-level subnet field; a bare subnet_id
    // becomes the primary network interface unless explicit interfaces are
    // given.
    if data.network_interfaces.is_none() {
        if let Some(subnet_id) = &data.subnet_id {
            builder = builder.network_interfaces(
                ec2::LaunchTemplateInstanceNetworkInterfaceSpecificationRequest::builder()
                    .device_index(0)
                    .subnet_id(subnet_id)
                    .build(),
            );
        }
    }
    if let Some(specs) = &data.tag_specifications {
        for spec in specs {
            let mut tag_builder = ec2::LaunchTemplateTagSpecificationRequest::builder()
                .resource_type(ec2::ResourceType::from(spec.resource_type.as_str()));
            for tag in &spec.tags {
                tag_builder = tag_builder
                    .tags(ec2::Tag::builder().key(&tag.key).value(&tag.value).build());
            }
            builder = builder.tag_specifications(tag_builder.build());
        }
    }
    if let Some(mappings) = &data.block_device_mappings {
        for mapping in mappings {
            let mut mapping_builder = ec2::LaunchTemplateBlockDeviceMappingRequest::builder()
                .device_name(&mapping.device_name);
            if let Some(ebs) = &mapping.ebs {
                mapping_builder = mapping_builder.ebs(
                    ec2::LaunchTemplateEbsBlockDeviceRequest::builder()
                        .set_volume_size(ebs.volume_size)
                        .set_volume_type(ebs.volume_type.as_deref().map(ec2::VolumeType::from))
                        .set_delete_on_termination(ebs.delete_on_termination)
                        .set_encrypted(ebs.encrypted)
                        .set_snapshot_id(ebs.snapshot_id.clone())
                        .build(),
                );
            }
            builder = builder.block_device_mappings(mapping_builder.build());
        }
    }
    if let Some(interfaces) = &data.network_interfaces {
        for spec in interfaces {
            builder = builder.network_interfaces(
                ec2::LaunchTemplateInstanceNetworkInterfaceSpecificationRequest::builder()
                    .device_index(spec.device_index)
                    .set_subnet_id(spec.subnet_id.clone())
                    .set_description(spec.description.clone())
                    .set_groups(spec.groups.clone())
                    .set_delete_on_termination(spec.delete_on_termination)
                    .set_associate_public_ip_address(spec.associate_public_ip_address)
                    .build(),
            );
        }
    }
    if let Some(profile) = &data.iam_instance_profile {
        builder = builder.iam_instance_profile(
            ec2::LaunchTemplateIamInstanceProfileSpecificationRequest::builder()
                .set_name(profile.name.clone())
                .set_arn(profile.arn.clone())
                .build(),
        );
    }
    if let Some(options) = &data.metadata_options {
        builder = builder.metadata_options(
            ec2::LaunchTemplateInstanceMetadataOptionsRequest::builder()
                .set_http_tokens(
                    options
                        .http_tokens
                        .as_deref()
                        .map(ec2::LaunchTemplateHttpTokensState::from),
                )
                .set_http_endpoint(
                    options
                        .http_endpoint
                        .as_deref()
                        .map(ec2::LaunchTemplateInstanceMetadataEndpointState::from),
                )
                .set_http_put_response_hop_limit(options.http_put_response_hop_limit)
                .build(),
        );
    }

    builder.build()
}

pub(super) fn vpc_detail(vpc: &ec2::Vpc) -> VpcDetail {
    VpcDetail {
        vpc_id: vpc.vpc_id().map(str::to_string),
        cidr_block: vpc.cidr_block().map(str::to_string),
        state: vpc.state().map(|s| s.as_str().to_string()),
        is_default: vpc.is_default().unwrap_or(false),
        tags: tags(vpc.tags()),
    }
}

pub(super) fn subnet_detail(subnet: &ec2::Subnet) -> SubnetDetail {
    SubnetDetail {
        subnet_id: subnet.subnet_id().map(str::to_string),
        vpc_id: subnet.vpc_id().map(str::to_string),
        cidr_block: subnet.cidr_block().map(str::to_string),
        availability_zone: subnet.availability_zone().map(str::to_string),
        state: subnet.state().map(|s| s.as_str().to_string()),
        available_ip_address_count: subnet.available_ip_address_count(),
        map_public_ip_on_launch: subnet.map_public_ip_on_launch(),
        default_for_az: subnet.default_for_az(),
        tags: tags(subnet.tags()),
    }
}

pub(super) fn volume_attachment(attachment: &ec2::VolumeAttachment) -> VolumeAttachmentDetail {
    VolumeAttachmentDetail {
        volume_id: attachment.volume_id().map(str::to_string),
        instance_id: attachment.instance_id().map(str::to_string),
        device: attachment.device().map(str::to_string),
        state: attachment.state().map(|s| s.as_str().to_string()),
    }
}

pub(super) fn volume_detail(volume: &ec2::Volume) -> VolumeDetail {
    VolumeDetail {
        volume_id: volume.volume_id().map(str::to_string),
        size: volume.size(),
        volume_type: volume.volume_type().map(|t| t.as_str().to_string()),
        state: volume.state().map(|s| s.as_str().to_string()),
        availability_zone: volume.availability_zone().map(str::to_string),
        encrypted: volume.encrypted(),
        iops: volume.iops(),
        throughput: volume.throughput(),
        snapshot_id: volume.snapshot_id().map(str::to_string),
        create_time: format_time(volume.create_time()),
        attachments: volume.attachments().iter().map(volume_attachment).collect(),
        tags: tags(volume.tags()),
    }
}

pub(super) fn volume_modification_detail(
    modification: &ec2::VolumeModification,
) -> VolumeModificationDetail {
    VolumeModificationDetail {
        volume_id: modification.volume_id().map(str::to_string),
        modification_state: modification
            .modification_state()
            .map(|s| s.as_str().to_string()),
        target_size: modification.target_size(),
        target_volume_type: modification
            .target_volume_type()
            .map(|t| t.as_str().to_string()),
        target_iops: modification.target_iops(),
        target_throughput: modification.target_throughput(),
    }
}

pub(super) fn snapshot_detail(snapshot: &ec2::Snapshot) -> SnapshotDetail {
    SnapshotDetail {
        snapshot_id: snapshot.snapshot_id().map(str::to_string),
        volume_id: snapshot.volume_id().map(str::to_string),
        state: snapshot.state().map(|s| s.as_str().to_string()),
        progress: snapshot.progress().map(str::to_string),
        start_time: format_time(snapshot.start_time()),
        description: snapshot.description().map(str::to_string),
        encrypted: snapshot.encrypted(),
        volume_size: snapshot.volume_size(),
        owner_id: snapshot.owner_id().map(str::to_string),
        tags: tags(snapshot.tags()),
    }
}
