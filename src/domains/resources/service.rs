//! Resource service implementation.
//!
//! The ResourceService holds the catalogue documents registered at startup
//! and serves listing and read requests. Content is rendered once when the
//! registry is built; nothing here changes afterwards.

use std::collections::HashMap;

use rmcp::model::{ReadResourceResult, Resource, ResourceContents};
use tracing::{debug, info};

use super::error::ResourceError;
use super::registry::get_all_resources;

/// An entry in the resource registry.
#[derive(Debug, Clone)]
pub struct ResourceEntry {
    /// The resource metadata.
    pub resource: Resource,

    /// Pre-rendered JSON content.
    pub content: String,
}

/// Service for listing and reading the catalogue resources.
pub struct ResourceService {
    /// Key: resource URI, Value: metadata plus content.
    resources: HashMap<String, ResourceEntry>,
}

impl ResourceService {
    pub fn new() -> Self {
        info!("Initializing ResourceService");

        let mut service = Self {
            resources: HashMap::new(),
        };
        for entry in get_all_resources() {
            service.register_resource(entry);
        }
        service
    }

    fn register_resource(&mut self, entry: ResourceEntry) {
        debug!("Registering resource: {}", entry.resource.raw.uri);
        self.resources
            .insert(entry.resource.raw.uri.to_string(), entry);
    }

    /// List all available resources.
    pub async fn list_resources(&self) -> Vec<Resource> {
        self.resources
            .values()
            .map(|entry| entry.resource.clone())
            .collect()
    }

    /// Read a resource by URI.
    pub async fn read_resource(&self, uri: &str) -> Result<ReadResourceResult, ResourceError> {
        let entry = self
            .resources
            .get(uri)
            .ok_or_else(|| ResourceError::not_found(uri))?;

        Ok(ReadResourceResult {
            contents: vec![ResourceContents::text(&entry.content, uri)],
        })
    }
}

impl Default for ResourceService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_resource_service_creation() {
        let service = ResourceService::new();
        let resources = service.list_resources().await;
        assert!(!resources.is_empty());
    }

    #[tokio::test]
    async fn test_read_existing_resource() {
        let service = ResourceService::new();
        let result = service.read_resource("resource://aws/vpc").await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_read_resource_content_is_json() {
        let service = ResourceService::new();
        let result = service
            .read_resource("resource://aws/ec2/instance_lifecycle")
            .await
            .expect("resource exists");

        let text = match &result.contents[0] {
            ResourceContents::TextResourceContents { text, .. } => text.clone(),
            other => panic!("expected text contents, got {other:?}"),
        };
        let document: serde_json::Value = serde_json::from_str(&text).expect("valid json");
        assert_eq!(document["service"], "EC2");
        assert!(document["actions"]["start_instance"].is_object());
    }

    #[tokio::test]
    async fn test_read_nonexistent_resource() {
        let service = ResourceService::new();
        let result = service.read_resource("resource://aws/nonexistent").await;
        assert!(result.is_err());
    }
}
