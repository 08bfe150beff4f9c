//! AWS SDK-backed client implementation.
//!
//! One thin method per service operation: build the request from the typed
//! inputs, send it, and map the response through `convert`. Credentials,
//! retries, and timeouts all come from the ambient SDK configuration.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use aws_config::{Region, SdkConfig};
use aws_sdk_ec2::error::DisplayErrorContext;
use aws_sdk_ec2::types as ec2;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::debug;

use super::convert;
use super::types::*;
use super::{AwsError, AwsResult, EbsApi, Ec2Api, PricingApi, VpcApi};

/// The Pricing API is only served from us-east-1.
const PRICING_ENDPOINT_REGION: &str = "us-east-1";

/// Production AWS clients over the shared SDK configuration.
///
/// EC2 clients are built per region on first use and cached for the life of
/// the process; the registry hands out one of these wrapped in an `Arc`.
pub struct SdkClients {
    base: SdkConfig,
    ec2_clients: RwLock<HashMap<String, aws_sdk_ec2::Client>>,
    pricing: aws_sdk_pricing::Client,
}

impl SdkClients {
    pub fn new(base: SdkConfig) -> Self {
        let pricing_config = aws_sdk_pricing::config::Builder::from(&base)
            .region(Region::new(PRICING_ENDPOINT_REGION))
            .build();

        Self {
            base,
            ec2_clients: RwLock::new(HashMap::new()),
            pricing: aws_sdk_pricing::Client::from_conf(pricing_config),
        }
    }

    async fn ec2(&self, region: &str) -> aws_sdk_ec2::Client {
        {
            let cache = self.ec2_clients.read().await;
            if let Some(client) = cache.get(region) {
                return client.clone();
            }
        }

        debug!(region, "building EC2 client");
        let config = aws_sdk_ec2::config::Builder::from(&self.base)
            .region(Region::new(region.to_string()))
            .build();
        let client = aws_sdk_ec2::Client::from_conf(config);

        self.ec2_clients
            .write()
            .await
            .insert(region.to_string(), client.clone());
        client
    }
}

fn api_err<E>(err: E) -> AwsError
where
    E: std::error::Error + Send + Sync + 'static,
{
    AwsError::api(format!("{}", DisplayErrorContext(&err)))
}

fn encode_user_data(user_data: Option<String>) -> Option<String> {
    user_data.map(|data| BASE64.encode(data.as_bytes()))
}

#[async_trait]
impl Ec2Api for SdkClients {
    async fn start_instances(
        &self,
        region: &str,
        instance_ids: &[String],
    ) -> AwsResult<Vec<InstanceStateChange>> {
        let resp = self
            .ec2(region)
            .await
            .start_instances()
            .set_instance_ids(Some(instance_ids.to_vec()))
            .send()
            .await
            .map_err(api_err)?;
        Ok(resp.starting_instances().iter().map(convert::state_change).collect())
    }

    async fn stop_instances(
        &self,
        region: &str,
        instance_ids: &[String],
    ) -> AwsResult<Vec<InstanceStateChange>> {
        let resp = self
            .ec2(region)
            .await
            .stop_instances()
            .set_instance_ids(Some(instance_ids.to_vec()))
            .send()
            .await
            .map_err(api_err)?;
        Ok(resp.stopping_instances().iter().map(convert::state_change).collect())
    }

    async fn reboot_instances(&self, region: &str, instance_ids: &[String]) -> AwsResult<()> {
        self.ec2(region)
            .await
            .reboot_instances()
            .set_instance_ids(Some(instance_ids.to_vec()))
            .send()
            .await
            .map_err(api_err)?;
        Ok(())
    }

    async fn terminate_instances(
        &self,
        region: &str,
        instance_ids: &[String],
    ) -> AwsResult<Vec<InstanceStateChange>> {
        let resp = self
            .ec2(region)
            .await
            .terminate_instances()
            .set_instance_ids(Some(instance_ids.to_vec()))
            .send()
            .await
            .map_err(api_err)?;
        Ok(resp
            .terminating_instances()
            .iter()
            .map(convert::state_change)
            .collect())
    }

    async fn run_instances(
        &self,
        region: &str,
        request: RunInstancesRequest,
    ) -> AwsResult<Vec<LaunchedInstance>> {
        let mut call = self
            .ec2(region)
            .await
            .run_instances()
            .image_id(&request.image_id)
            .instance_type(ec2::InstanceType::from(request.instance_type.as_str()))
            .min_count(request.min_count)
            .max_count(request.max_count)
            .set_key_name(request.key_name.clone())
            .set_subnet_id(request.subnet_id.clone())
            .set_security_group_ids(request.security_group_ids.clone())
            .set_iam_instance_profile(request.iam_instance_profile.as_ref().map(convert::to_iam_profile))
            .set_metadata_options(request.metadata_options.as_ref().map(convert::to_metadata_options))
            .set_user_data(encode_user_data(request.user_data.clone()));

        if let Some(mappings) = &request.block_device_mappings {
            call = call.set_block_device_mappings(Some(convert::to_block_device_mappings(mappings)));
        }
        if let Some(interfaces) = &request.network_interfaces {
            call = call.set_network_interfaces(Some(convert::to_network_interfaces(interfaces)));
        }
        if let Some(specs) = &request.tag_specifications {
            call = call.set_tag_specifications(Some(convert::to_tag_specifications(specs)));
        }

        let resp = call.send().await.map_err(api_err)?;
        Ok(resp.instances().iter().map(convert::launched_instance).collect())
    }

    async fn run_instances_from_template(
        &self,
        region: &str,
        template_name: &str,
        version: &str,
        min_count: i32,
        max_count: i32,
    ) -> AwsResult<Vec<LaunchedInstance>> {
        let resp = self
            .ec2(region)
            .await
            .run_instances()
            .launch_template(
                ec2::LaunchTemplateSpecification::builder()
                    .launch_template_name(template_name)
                    .version(version)
                    .build(),
            )
            .min_count(min_count)
            .max_count(max_count)
            .send()
            .await
            .map_err(api_err)?;
        Ok(resp.instances().iter().map(convert::launched_instance).collect())
    }

    async fn request_spot_instances(
        &self,
        region: &str,
        request: SpotInstanceRequest,
    ) -> AwsResult<Vec<SpotRequestDetail>> {
        let mut spec = ec2::RequestSpotLaunchSpecification::builder()
            .image_id(&request.image_id)
            .instance_type(ec2::InstanceType::from(request.instance_type.as_str()))
            .set_key_name(request.key_name.clone())
            .set_subnet_id(request.subnet_id.clone())
            .set_security_group_ids(request.security_group_ids.clone())
            .set_iam_instance_profile(request.iam_instance_profile.as_ref().map(convert::to_iam_profile))
            .set_user_data(encode_user_data(request.user_data.clone()));

        if let Some(mappings) = &request.block_device_mappings {
            spec = spec.set_block_device_mappings(Some(convert::to_block_device_mappings(mappings)));
        }

        let mut call = self
            .ec2(region)
            .await
            .request_spot_instances()
            .launch_specification(spec.build())
            .instance_count(1)
            .r#type(ec2::SpotInstanceType::OneTime)
            .set_spot_price(request.max_price.clone());

        // Tags cannot ride inside the launch specification; they apply to
        // the spot request resource itself.
        if let Some(specs) = &request.tag_specifications {
            call = call.set_tag_specifications(Some(convert::to_tag_specifications(specs)));
        }

        let resp = call.send().await.map_err(api_err)?;
        Ok(resp
            .spot_instance_requests()
            .iter()
            .map(convert::spot_request_detail)
            .collect())
    }

    async fn describe_instances(
        &self,
        region: &str,
        instance_ids: &[String],
        filters: &[Filter],
    ) -> AwsResult<Vec<InstanceDetail>> {
        let resp = self
            .ec2(region)
            .await
            .describe_instances()
            .set_instance_ids(convert::to_vec_opt(instance_ids))
            .set_filters(convert::to_filters(filters))
            .send()
            .await
            .map_err(api_err)?;

        let mut instances = Vec::new();
        for reservation in resp.reservations() {
            instances.extend(reservation.instances().iter().map(convert::instance_detail));
        }
        Ok(instances)
    }

    async fn describe_spot_instance_requests(
        &self,
        region: &str,
        spot_request_ids: &[String],
        filters: &[Filter],
    ) -> AwsResult<Vec<SpotRequestDetail>> {
        let resp = self
            .ec2(region)
            .await
            .describe_spot_instance_requests()
            .set_spot_instance_request_ids(convert::to_vec_opt(spot_request_ids))
            .set_filters(convert::to_filters(filters))
            .send()
            .await
            .map_err(api_err)?;
        Ok(resp
            .spot_instance_requests()
            .iter()
            .map(convert::spot_request_detail)
            .collect())
    }

    async fn cancel_spot_instance_requests(
        &self,
        region: &str,
        spot_request_ids: &[String],
    ) -> AwsResult<Vec<CancelledSpotRequest>> {
        let resp = self
            .ec2(region)
            .await
            .cancel_spot_instance_requests()
            .set_spot_instance_request_ids(Some(spot_request_ids.to_vec()))
            .send()
            .await
            .map_err(api_err)?;
        Ok(resp
            .cancelled_spot_instance_requests()
            .iter()
            .map(|c| CancelledSpotRequest {
                spot_request_id: c.spot_instance_request_id().unwrap_or_default().to_string(),
                state: c.state().map(|s| s.as_str().to_string()),
            })
            .collect())
    }

    async fn describe_spot_price_history(
        &self,
        region: &str,
        query: SpotPriceQuery,
    ) -> AwsResult<Vec<SpotPriceEntry>> {
        let mut call = self
            .ec2(region)
            .await
            .describe_spot_price_history()
            .instance_types(ec2::InstanceType::from(query.instance_type.as_str()))
            .product_descriptions(&query.product_description)
            .set_availability_zone(query.availability_zone.clone());

        if let Some(start) = &query.start_time {
            call = call.start_time(convert::parse_time(start)?);
        }
        if let Some(end) = &query.end_time {
            call = call.end_time(convert::parse_time(end)?);
        }

        let resp = call.send().await.map_err(api_err)?;
        Ok(resp
            .spot_price_history()
            .iter()
            .map(convert::spot_price_entry)
            .collect())
    }

    async fn create_security_group(
        &self,
        region: &str,
        group_name: &str,
        description: &str,
        vpc_id: &str,
    ) -> AwsResult<String> {
        let resp = self
            .ec2(region)
            .await
            .create_security_group()
            .group_name(group_name)
            .description(description)
            .vpc_id(vpc_id)
            .send()
            .await
            .map_err(api_err)?;
        resp.group_id()
            .map(str::to_string)
            .ok_or_else(|| AwsError::malformed("create_security_group returned no group id"))
    }

    async fn delete_security_group(&self, region: &str, group_id: &str) -> AwsResult<()> {
        self.ec2(region)
            .await
            .delete_security_group()
            .group_id(group_id)
            .send()
            .await
            .map_err(api_err)?;
        Ok(())
    }

    async fn authorize_security_group_ingress(
        &self,
        region: &str,
        group_id: &str,
        rules: &[IpPermissionSpec],
    ) -> AwsResult<()> {
        self.ec2(region)
            .await
            .authorize_security_group_ingress()
            .group_id(group_id)
            .set_ip_permissions(Some(convert::to_ip_permissions(rules)))
            .send()
            .await
            .map_err(api_err)?;
        Ok(())
    }

    async fn revoke_security_group_ingress(
        &self,
        region: &str,
        group_id: &str,
        rules: &[IpPermissionSpec],
    ) -> AwsResult<()> {
        self.ec2(region)
            .await
            .revoke_security_group_ingress()
            .group_id(group_id)
            .set_ip_permissions(Some(convert::to_ip_permissions(rules)))
            .send()
            .await
            .map_err(api_err)?;
        Ok(())
    }

    async fn describe_security_groups(
        &self,
        region: &str,
        filters: &[Filter],
    ) -> AwsResult<Vec<SecurityGroupDetail>> {
        let resp = self
            .ec2(region)
            .await
            .describe_security_groups()
            .set_filters(convert::to_filters(filters))
            .send()
            .await
            .map_err(api_err)?;
        Ok(resp
            .security_groups()
            .iter()
            .map(convert::security_group_detail)
            .collect())
    }

    async fn create_key_pair(&self, region: &str, key_name: &str) -> AwsResult<CreatedKeyPair> {
        let resp = self
            .ec2(region)
            .await
            .create_key_pair()
            .key_name(key_name)
            .send()
            .await
            .map_err(api_err)?;
        Ok(CreatedKeyPair {
            key_name: resp.key_name().unwrap_or(key_name).to_string(),
            key_type: resp
                .key_type()
                .map(|t| t.as_str().to_string())
                .unwrap_or_else(|| "rsa".to_string()),
            key_material: resp
                .key_material()
                .map(str::to_string)
                .ok_or_else(|| AwsError::malformed("create_key_pair returned no key material"))?,
        })
    }

    async fn delete_key_pair(&self, region: &str, key_name: &str) -> AwsResult<()> {
        self.ec2(region)
            .await
            .delete_key_pair()
            .key_name(key_name)
            .send()
            .await
            .map_err(api_err)?;
        Ok(())
    }

    async fn describe_key_pairs(&self, region: &str) -> AwsResult<Vec<KeyPairDetail>> {
        let resp = self
            .ec2(region)
            .await
            .describe_key_pairs()
            .send()
            .await
            .map_err(api_err)?;
        Ok(resp.key_pairs().iter().map(convert::key_pair_detail).collect())
    }

    async fn create_image(&self, region: &str, request: CreateImageRequest) -> AwsResult<String> {
        let mut call = self
            .ec2(region)
            .await
            .create_image()
            .instance_id(&request.instance_id)
            .name(&request.name)
            .no_reboot(request.no_reboot)
            .set_description(request.description.clone());

        if let Some(tags) = &request.tags {
            call = call.tag_specifications(convert::tag_specification(
                ec2::ResourceType::Image,
                tags,
            ));
        }

        let resp = call.send().await.map_err(api_err)?;
        resp.image_id()
            .map(str::to_string)
            .ok_or_else(|| AwsError::malformed("create_image returned no image id"))
    }

    async fn describe_images(
        &self,
        region: &str,
        owners: &[String],
        image_ids: &[String],
        filters: &[Filter],
    ) -> AwsResult<Vec<ImageDetail>> {
        let resp = self
            .ec2(region)
            .await
            .describe_images()
            .set_owners(convert::to_vec_opt(owners))
            .set_image_ids(convert::to_vec_opt(image_ids))
            .set_filters(convert::to_filters(filters))
            .send()
            .await
            .map_err(api_err)?;
        Ok(resp.images().iter().map(convert::image_detail).collect())
    }

    async fn deregister_image(&self, region: &str, image_id: &str) -> AwsResult<()> {
        self.ec2(region)
            .await
            .deregister_image()
            .image_id(image_id)
            .send()
            .await
            .map_err(api_err)?;
        Ok(())
    }

    async fn create_launch_template(
        &self,
        region: &str,
        name: &str,
        version_description: &str,
        data: LaunchTemplateData,
    ) -> AwsResult<LaunchTemplateDetail> {
        let user_data = encode_user_data(data.user_data.clone());
        let resp = self
            .ec2(region)
            .await
            .create_launch_template()
            .launch_template_name(name)
            .version_description(version_description)
            .launch_template_data(convert::to_launch_template_data(&data, user_data))
            .send()
            .await
            .map_err(api_err)?;
        resp.launch_template()
            .map(convert::launch_template_detail)
            .ok_or_else(|| AwsError::malformed("create_launch_template returned no template"))
    }

    async fn create_launch_template_version(
        &self,
        region: &str,
        name: &str,
        version_description: &str,
        data: LaunchTemplateData,
    ) -> AwsResult<LaunchTemplateVersionDetail> {
        let user_data = encode_user_data(data.user_data.clone());
        let resp = self
            .ec2(region)
            .await
            .create_launch_template_version()
            .launch_template_name(name)
            .version_description(version_description)
            .launch_template_data(convert::to_launch_template_data(&data, user_data))
            .send()
            .await
            .map_err(api_err)?;
        resp.launch_template_version()
            .map(convert::launch_template_version_detail)
            .ok_or_else(|| {
                AwsError::malformed("create_launch_template_version returned no version")
            })
    }

    async fn describe_launch_templates(
        &self,
        region: &str,
        names: &[String],
        ids: &[String],
    ) -> AwsResult<Vec<LaunchTemplateDetail>> {
        let resp = self
            .ec2(region)
            .await
            .describe_launch_templates()
            .set_launch_template_names(convert::to_vec_opt(names))
            .set_launch_template_ids(convert::to_vec_opt(ids))
            .send()
            .await
            .map_err(api_err)?;
        Ok(resp
            .launch_templates()
            .iter()
            .map(convert::launch_template_detail)
            .collect())
    }

    async fn delete_launch_template(
        &self,
        region: &str,
        name: Option<&str>,
        id: Option<&str>,
    ) -> AwsResult<LaunchTemplateDetail> {
        let resp = self
            .ec2(region)
            .await
            .delete_launch_template()
            .set_launch_template_name(name.map(str::to_string))
            .set_launch_template_id(id.map(str::to_string))
            .send()
            .await
            .map_err(api_err)?;
        resp.launch_template()
            .map(convert::launch_template_detail)
            .ok_or_else(|| AwsError::malformed("delete_launch_template returned no template"))
    }

    async fn describe_user_data(
        &self,
        region: &str,
        instance_id: &str,
    ) -> AwsResult<Option<String>> {
        let resp = self
            .ec2(region)
            .await
            .describe_instance_attribute()
            .instance_id(instance_id)
            .attribute(ec2::InstanceAttributeName::UserData)
            .send()
            .await
            .map_err(api_err)?;
        Ok(resp.user_data().and_then(|u| u.value()).map(str::to_string))
    }

    async fn modify_instance_metadata_options(
        &self,
        region: &str,
        instance_id: &str,
        options: MetadataOptionsSpec,
    ) -> AwsResult<MetadataOptionsState> {
        let resp = self
            .ec2(region)
            .await
            .modify_instance_metadata_options()
            .instance_id(instance_id)
            .set_http_tokens(options.http_tokens.as_deref().map(ec2::HttpTokensState::from))
            .set_http_endpoint(
                options
                    .http_endpoint
                    .as_deref()
                    .map(ec2::InstanceMetadataEndpointState::from),
            )
            .set_http_put_response_hop_limit(options.http_put_response_hop_limit)
            .send()
            .await
            .map_err(api_err)?;
        resp.instance_metadata_options()
            .map(convert::metadata_options_state)
            .ok_or_else(|| {
                AwsError::malformed("modify_instance_metadata_options returned no state")
            })
    }
}

#[async_trait]
impl EbsApi for SdkClients {
    async fn create_volume(
        &self,
        region: &str,
        request: CreateVolumeRequest,
    ) -> AwsResult<VolumeDetail> {
        let mut call = self
            .ec2(region)
            .await
            .create_volume()
            .availability_zone(&request.availability_zone)
            .volume_type(ec2::VolumeType::from(request.volume_type.as_str()))
            .set_size(request.size)
            .set_snapshot_id(request.snapshot_id.clone())
            .set_iops(request.iops)
            .set_throughput(request.throughput)
            .set_encrypted(request.encrypted)
            .set_kms_key_id(request.kms_key_id.clone());

        if let Some(tags) = &request.tags {
            call = call.tag_specifications(convert::tag_specification(
                ec2::ResourceType::Volume,
                tags,
            ));
        }

        let resp = call.send().await.map_err(api_err)?;
        Ok(VolumeDetail {
            volume_id: resp.volume_id().map(str::to_string),
            size: resp.size(),
            volume_type: resp.volume_type().map(|t| t.as_str().to_string()),
            state: resp.state().map(|s| s.as_str().to_string()),
            availability_zone: resp.availability_zone().map(str::to_string),
            encrypted: resp.encrypted(),
            iops: resp.iops(),
            throughput: resp.throughput(),
            snapshot_id: resp.snapshot_id().map(str::to_string),
            create_time: convert::format_time(resp.create_time()),
            attachments: Vec::new(),
            tags: convert::tags(resp.tags()),
        })
    }

    async fn modify_volume(
        &self,
        region: &str,
        request: ModifyVolumeRequest,
    ) -> AwsResult<VolumeModificationDetail> {
        let resp = self
            .ec2(region)
            .await
            .modify_volume()
            .volume_id(&request.volume_id)
            .set_size(request.size)
            .set_volume_type(request.volume_type.as_deref().map(ec2::VolumeType::from))
            .set_iops(request.iops)
            .set_throughput(request.throughput)
            .send()
            .await
            .map_err(api_err)?;
        resp.volume_modification()
            .map(convert::volume_modification_detail)
            .ok_or_else(|| AwsError::malformed("modify_volume returned no modification"))
    }

    async fn delete_volume(&self, region: &str, volume_id: &str) -> AwsResult<()> {
        self.ec2(region)
            .await
            .delete_volume()
            .volume_id(volume_id)
            .send()
            .await
            .map_err(api_err)?;
        Ok(())
    }

    async fn describe_volumes(
        &self,
        region: &str,
        volume_ids: &[String],
        filters: &[Filter],
    ) -> AwsResult<Vec<VolumeDetail>> {
        let resp = self
            .ec2(region)
            .await
            .describe_volumes()
            .set_volume_ids(convert::to_vec_opt(volume_ids))
            .set_filters(convert::to_filters(filters))
            .send()
            .await
            .map_err(api_err)?;
        Ok(resp.volumes().iter().map(convert::volume_detail).collect())
    }

    async fn attach_volume(
        &self,
        region: &str,
        volume_id: &str,
        instance_id: &str,
        device: &str,
    ) -> AwsResult<VolumeAttachmentDetail> {
        let resp = self
            .ec2(region)
            .await
            .attach_volume()
            .volume_id(volume_id)
            .instance_id(instance_id)
            .device(device)
            .send()
            .await
            .map_err(api_err)?;
        Ok(VolumeAttachmentDetail {
            volume_id: resp.volume_id().map(str::to_string),
            instance_id: resp.instance_id().map(str::to_string),
            device: resp.device().map(str::to_string),
            state: resp.state().map(|s| s.as_str().to_string()),
        })
    }

    async fn detach_volume(
        &self,
        region: &str,
        volume_id: &str,
        instance_id: Option<&str>,
        force: bool,
    ) -> AwsResult<VolumeAttachmentDetail> {
        let resp = self
            .ec2(region)
            .await
            .detach_volume()
            .volume_id(volume_id)
            .set_instance_id(instance_id.map(str::to_string))
            .force(force)
            .send()
            .await
            .map_err(api_err)?;
        Ok(VolumeAttachmentDetail {
            volume_id: resp.volume_id().map(str::to_string),
            instance_id: resp.instance_id().map(str::to_string),
            device: resp.device().map(str::to_string),
            state: resp.state().map(|s| s.as_str().to_string()),
        })
    }

    async fn create_snapshot(
        &self,
        region: &str,
        volume_id: &str,
        description: &str,
        tags: Option<&BTreeMap<String, String>>,
    ) -> AwsResult<SnapshotDetail> {
        let mut call = self
            .ec2(region)
            .await
            .create_snapshot()
            .volume_id(volume_id)
            .description(description);

        if let Some(tags) = tags {
            call = call.tag_specifications(convert::tag_specification(
                ec2::ResourceType::Snapshot,
                tags,
            ));
        }

        let resp = call.send().await.map_err(api_err)?;
        Ok(SnapshotDetail {
            snapshot_id: resp.snapshot_id().map(str::to_string),
            volume_id: resp.volume_id().map(str::to_string),
            state: resp.state().map(|s| s.as_str().to_string()),
            progress: resp.progress().map(str::to_string),
            start_time: convert::format_time(resp.start_time()),
            description: resp.description().map(str::to_string),
            encrypted: resp.encrypted(),
            volume_size: resp.volume_size(),
            owner_id: resp.owner_id().map(str::to_string),
            tags: convert::tags(resp.tags()),
        })
    }

    async fn describe_snapshots(
        &self,
        region: &str,
        snapshot_ids: &[String],
        owner_ids: &[String],
        filters: &[Filter],
    ) -> AwsResult<Vec<SnapshotDetail>> {
        let resp = self
            .ec2(region)
            .await
            .describe_snapshots()
            .set_snapshot_ids(convert::to_vec_opt(snapshot_ids))
            .set_owner_ids(convert::to_vec_opt(owner_ids))
            .set_filters(convert::to_filters(filters))
            .send()
            .await
            .map_err(api_err)?;
        Ok(resp.snapshots().iter().map(convert::snapshot_detail).collect())
    }

    async fn delete_snapshot(&self, region: &str, snapshot_id: &str) -> AwsResult<()> {
        self.ec2(region)
            .await
            .delete_snapshot()
            .snapshot_id(snapshot_id)
            .send()
            .await
            .map_err(api_err)?;
        Ok(())
    }

    async fn copy_snapshot(&self, region: &str, request: CopySnapshotRequest) -> AwsResult<String> {
        let mut call = self
            .ec2(region)
            .await
            .copy_snapshot()
            .source_region(&request.source_region)
            .source_snapshot_id(&request.source_snapshot_id)
            .description(&request.description)
            .set_encrypted(request.encrypted)
            .set_kms_key_id(request.kms_key_id.clone());

        if let Some(tags) = &request.tags {
            call = call.tag_specifications(convert::tag_specification(
                ec2::ResourceType::Snapshot,
                tags,
            ));
        }

        let resp = call.send().await.map_err(api_err)?;
        resp.snapshot_id()
            .map(str::to_string)
            .ok_or_else(|| AwsError::malformed("copy_snapshot returned no snapshot id"))
    }

    async fn enable_fast_snapshot_restores(
        &self,
        region: &str,
        snapshot_id: &str,
        availability_zones: &[String],
    ) -> AwsResult<Vec<FastRestoreChange>> {
        let resp = self
            .ec2(region)
            .await
            .enable_fast_snapshot_restores()
            .source_snapshot_ids(snapshot_id)
            .set_availability_zones(Some(availability_zones.to_vec()))
            .send()
            .await
            .map_err(api_err)?;

        if resp.successful().is_empty() {
            if let Some(item) = resp.unsuccessful().first() {
                let reason = item
                    .fast_snapshot_restore_state_errors()
                    .first()
                    .and_then(|e| e.error())
                    .and_then(|e| e.message())
                    .unwrap_or("fast snapshot restore could not be enabled");
                return Err(AwsError::api(reason.to_string()));
            }
        }

        Ok(resp
            .successful()
            .iter()
            .map(|item| FastRestoreChange {
                snapshot_id: item.snapshot_id().map(str::to_string),
                availability_zone: item.availability_zone().map(str::to_string),
                state: item.state().map(|s| s.as_str().to_string()),
            })
            .collect())
    }

    async fn disable_fast_snapshot_restores(
        &self,
        region: &str,
        snapshot_id: &str,
        availability_zones: &[String],
    ) -> AwsResult<Vec<FastRestoreChange>> {
        let resp = self
            .ec2(region)
            .await
            .disable_fast_snapshot_restores()
            .source_snapshot_ids(snapshot_id)
            .set_availability_zones(Some(availability_zones.to_vec()))
            .send()
            .await
            .map_err(api_err)?;

        if resp.successful().is_empty() {
            if let Some(item) = resp.unsuccessful().first() {
                let reason = item
                    .fast_snapshot_restore_state_errors()
                    .first()
                    .and_then(|e| e.error())
                    .and_then(|e| e.message())
                    .unwrap_or("fast snapshot restore could not be disabled");
                return Err(AwsError::api(reason.to_string()));
            }
        }

        Ok(resp
            .successful()
            .iter()
            .map(|item| FastRestoreChange {
                snapshot_id: item.snapshot_id().map(str::to_string),
                availability_zone: item.availability_zone().map(str::to_string),
                state: item.state().map(|s| s.as_str().to_string()),
            })
            .collect())
    }
}

#[async_trait]
impl VpcApi for SdkClients {
    async fn describe_vpcs(
        &self,
        region: &str,
        vpc_ids: &[String],
        filters: &[Filter],
    ) -> AwsResult<Vec<VpcDetail>> {
        let resp = self
            .ec2(region)
            .await
            .describe_vpcs()
            .set_vpc_ids(convert::to_vec_opt(vpc_ids))
            .set_filters(convert::to_filters(filters))
            .send()
            .await
            .map_err(api_err)?;
        Ok(resp.vpcs().iter().map(convert::vpc_detail).collect())
    }

    async fn describe_subnets(
        &self,
        region: &str,
        subnet_ids: &[String],
        filters: &[Filter],
    ) -> AwsResult<Vec<SubnetDetail>> {
        let resp = self
            .ec2(region)
            .await
            .describe_subnets()
            .set_subnet_ids(convert::to_vec_opt(subnet_ids))
            .set_filters(convert::to_filters(filters))
            .send()
            .await
            .map_err(api_err)?;
        Ok(resp.subnets().iter().map(convert::subnet_detail).collect())
    }
}

#[async_trait]
impl PricingApi for SdkClients {
    async fn get_products(
        &self,
        service_code: &str,
        filters: &[PricingFilter],
    ) -> AwsResult<Vec<Value>> {
        let mut sdk_filters = Vec::with_capacity(filters.len());
        for filter in filters {
            sdk_filters.push(
                aws_sdk_pricing::types::Filter::builder()
                    .r#type(aws_sdk_pricing::types::FilterType::TermMatch)
                    .field(&filter.field)
                    .value(&filter.value)
                    .build()
                    .map_err(api_err)?,
            );
        }

        let resp = self
            .pricing
            .get_products()
            .service_code(service_code)
            .set_filters(Some(sdk_filters))
            .send()
            .await
            .map_err(api_err)?;

        let mut products = Vec::new();
        for item in resp.price_list() {
            let parsed: Value = serde_json::from_str(item)
                .map_err(|e| AwsError::malformed(format!("unparseable price list item: {e}")))?;
            products.push(parsed);
        }
        Ok(products)
    }
}
