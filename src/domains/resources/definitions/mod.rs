//! Resource definitions, one file per AWS service.
//!
//! Each file builds the static catalogue documents for its service:
//! `{service, domain, description, actions: {name: {description,
//! required_params, optional_params, example}}, notes}`.

pub mod ebs;
pub mod ec2;
pub mod vpc;

use rmcp::model::{AnnotateAble, RawResource};
use serde_json::Value;

use super::service::ResourceEntry;

/// Build a catalogue entry from a document.
pub(super) fn catalogue(
    uri: &'static str,
    name: &'static str,
    description: &'static str,
    document: Value,
) -> ResourceEntry {
    let mut raw = RawResource::new(uri, name);
    raw.description = Some(description.to_string());
    raw.mime_type = Some("application/json".to_string());

    let content =
        serde_json::to_string_pretty(&document).unwrap_or_else(|_| document.to_string());

    ResourceEntry {
        resource: raw.no_annotation(),
        content,
    }
}
