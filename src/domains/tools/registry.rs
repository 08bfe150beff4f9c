//! Action registries - the central registration and dispatch mechanism.
//!
//! Each service (EC2, EBS, VPC) builds one [`ServiceRegistry`] at startup
//! from an explicit, compile-time-checked list of definition modules. Every
//! module contributes `action name -> (schema, handler)` entries; duplicate
//! names resolve last-write-wins in module order, which is an explicit
//! contract of this layer (see the tests).
//!
//! A registry powers two tool shapes:
//! - the generic per-service dispatcher (`aws_<service>`), which takes an
//!   `action` name plus a free-form argument bag, and
//! - one generated single-action tool per entry (`<service>_<action>`),
//!   whose invocation is the dispatcher pre-bound to that action.

use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;
use rmcp::handler::server::tool::cached_schema_for_type;
use rmcp::model::{JsonObject, Tool};
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};
use tracing::warn;

use crate::core::aws::AwsContext;

/// The type-erased run function stored in a registry entry.
///
/// Validates the raw argument object against the action's parameter struct
/// and, on success, awaits the handler. Always resolves to a JSON record -
/// validation failures become `{"validation_error": ...}` and handler
/// failures are already `{"error": ...}`-shaped, so nothing here can
/// surface as a protocol-level fault.
pub type ActionFn =
    Arc<dyn Fn(Arc<AwsContext>, JsonObject) -> BoxFuture<'static, Value> + Send + Sync>;

/// One registered action: schema and handler under a unique name.
#[derive(Clone)]
pub struct ActionEntry {
    name: &'static str,
    description: &'static str,
    input_schema: Arc<JsonObject>,
    run: ActionFn,
}

impl ActionEntry {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn description(&self) -> &'static str {
        self.description
    }

    pub fn input_schema(&self) -> &Arc<JsonObject> {
        &self.input_schema
    }

    /// Validate `args` and run the handler.
    pub fn run(&self, ctx: Arc<AwsContext>, args: JsonObject) -> BoxFuture<'static, Value> {
        (self.run)(ctx, args)
    }
}

/// Build a registry entry from a parameter struct and an async handler.
///
/// The schema is derived from `P` at compile time via schemars; required
/// fields are exactly the non-optional ones, so a missing required field
/// fails deserialization before the handler is ever called.
pub fn action<P, F, Fut>(name: &'static str, description: &'static str, handler: F) -> ActionEntry
where
    P: DeserializeOwned + JsonSchema + Send + 'static,
    F: Fn(Arc<AwsContext>, P) -> Fut + Send + Sync + Clone + 'static,
    Fut: Future<Output = Value> + Send + 'static,
{
    let run: ActionFn = Arc::new(move |ctx, args| {
        let handler = handler.clone();
        async move {
            match serde_json::from_value::<P>(Value::Object(args)) {
                Ok(params) => handler(ctx, params).await,
                Err(e) => json!({ "validation_error": e.to_string() }),
            }
        }
        .boxed()
    });

    ActionEntry {
        name,
        description,
        input_schema: cached_schema_for_type::<P>(),
        run,
    }
}

/// The read-only action table for one service.
pub struct ServiceRegistry {
    service: &'static str,
    dispatcher_description: &'static str,
    entries: BTreeMap<&'static str, ActionEntry>,
}

impl ServiceRegistry {
    /// Merge the given definition modules into one registry.
    ///
    /// Modules are processed in list order; a module registering an action
    /// name that an earlier module already claimed silently replaces it
    /// (last write wins), with a log line as the only trace.
    pub fn build(
        service: &'static str,
        dispatcher_description: &'static str,
        modules: &[fn() -> Vec<ActionEntry>],
    ) -> Self {
        let mut entries = BTreeMap::new();
        for module in modules {
            for entry in module() {
                let name = entry.name;
                if entries.insert(name, entry).is_some() {
                    warn!(
                        service,
                        action = name,
                        "action redefined; later registration wins"
                    );
                }
            }
        }
        Self {
            service,
            dispatcher_description,
            entries,
        }
    }

    pub fn service(&self) -> &'static str {
        self.service
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, action: &str) -> Option<&ActionEntry> {
        self.entries.get(action)
    }

    pub fn action_names(&self) -> Vec<&'static str> {
        self.entries.keys().copied().collect()
    }

    /// Route an action by name.
    ///
    /// Unknown names come back as a structured error record, never as a
    /// protocol error - the host is expected to treat it as a normal,
    /// recoverable result.
    pub async fn dispatch(&self, ctx: Arc<AwsContext>, action: &str, args: JsonObject) -> Value {
        match self.entries.get(action) {
            Some(entry) => entry.run(ctx, args).await,
            None => {
                warn!(service = self.service, action, "unknown action requested");
                json!({ "error": format!("Unknown action '{action}'") })
            }
        }
    }

    /// Dispatch from a raw argument object that carries its own `action`
    /// field (the generic dispatcher tool's input shape).
    pub async fn dispatch_object(&self, ctx: Arc<AwsContext>, mut args: JsonObject) -> Value {
        match args.remove("action") {
            Some(Value::String(action)) => self.dispatch(ctx, &action, args).await,
            Some(_) => json!({ "validation_error": "field 'action' must be a string" }),
            None => json!({ "validation_error": "missing required field 'action'" }),
        }
    }

    // ========================================================================
    // Tool metadata
    // ========================================================================

    pub fn dispatcher_tool_name(&self) -> String {
        format!("aws_{}", self.service)
    }

    /// The generic dispatcher tool: `action` plus free-form fields.
    pub fn dispatcher_tool(&self) -> Tool {
        let mut schema = Map::new();
        schema.insert("type".to_string(), json!("object"));
        schema.insert(
            "properties".to_string(),
            json!({
                "action": {
                    "type": "string",
                    "description": "Action to perform; the remaining fields are that action's parameters"
                }
            }),
        );
        schema.insert("required".to_string(), json!(["action"]));
        schema.insert("additionalProperties".to_string(), json!(true));

        Tool {
            name: self.dispatcher_tool_name().into(),
            description: Some(self.dispatcher_description.into()),
            input_schema: Arc::new(schema),
            annotations: None,
            output_schema: None,
            icons: None,
            meta: None,
            title: None,
        }
    }

    /// The generated single-action tools, one per entry.
    pub fn individual_tools(&self) -> Vec<(&'static str, Tool)> {
        self.entries
            .values()
            .map(|entry| {
                let tool = Tool {
                    name: format!("{}_{}", self.service, entry.name).into(),
                    description: Some(entry.description.into()),
                    input_schema: Arc::new(flattened_parameter_schema(&entry.input_schema)),
                    annotations: None,
                    output_schema: None,
                    icons: None,
                    meta: None,
                    title: None,
                };
                (entry.name, tool)
            })
            .collect()
    }
}

/// Derive the generic parameter description for a single-action tool.
///
/// Every property of the derived schema becomes a flat, generically-typed
/// parameter; `required` is reproduced as-is. Fields whose declared type is
/// not a plain scalar or container (nested structs, unions) fall back to a
/// permissive string type rather than failing generation.
pub fn flattened_parameter_schema(schema: &JsonObject) -> JsonObject {
    let mut properties = Map::new();
    if let Some(Value::Object(props)) = schema.get("properties") {
        for (field, prop) in props {
            let description = prop
                .get("description")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| format!("{field} parameter"));
            properties.insert(
                field.clone(),
                json!({ "type": declared_type(prop), "description": description }),
            );
        }
    }

    let required = schema.get("required").cloned().unwrap_or_else(|| json!([]));

    let mut flat = Map::new();
    flat.insert("type".to_string(), json!("object"));
    flat.insert("properties".to_string(), Value::Object(properties));
    flat.insert("required".to_string(), required);
    flat
}

/// Best declared type for a property, with a string fallback.
fn declared_type(prop: &Value) -> &'static str {
    match prop.get("type") {
        Some(Value::String(ty)) => simple_type(ty),
        // Optional fields come out as ["<type>", "null"].
        Some(Value::Array(types)) => types
            .iter()
            .filter_map(Value::as_str)
            .find(|ty| *ty != "null")
            .map(simple_type)
            .unwrap_or("string"),
        _ => "string",
    }
}

fn simple_type(ty: &str) -> &'static str {
    match ty {
        "string" => "string",
        "integer" => "integer",
        "number" => "number",
        "boolean" => "boolean",
        "array" => "array",
        "object" => "object",
        _ => "string",
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use schemars::JsonSchema;
    use serde::Deserialize;

    use super::*;
    use crate::core::aws::stub::StubAws;

    #[derive(Debug, Deserialize, JsonSchema)]
    struct ProbeParams {
        /// Name of the probe target.
        target: String,
        /// Optional retry budget.
        attempts: Option<i64>,
        #[serde(default)]
        labels: Vec<String>,
    }

    fn ctx() -> Arc<AwsContext> {
        StubAws::new("running").context("us-east-1")
    }

    fn args(value: Value) -> JsonObject {
        value.as_object().cloned().unwrap_or_default()
    }

    fn counted_entry(
        name: &'static str,
        marker: &'static str,
        counter: Arc<AtomicUsize>,
    ) -> ActionEntry {
        action(
            name,
            "test probe",
            move |_ctx: Arc<AwsContext>, params: ProbeParams| {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    json!({ "handled_by": marker, "target": params.target })
                }
            },
        )
    }

    fn registry_with(entries: Vec<ActionEntry>) -> ServiceRegistry {
        let mut map = BTreeMap::new();
        for entry in entries {
            map.insert(entry.name, entry);
        }
        ServiceRegistry {
            service: "probe",
            dispatcher_description: "test dispatcher",
            entries: map,
        }
    }

    #[tokio::test]
    async fn test_dispatch_invokes_registered_handler() {
        let counter = Arc::new(AtomicUsize::new(0));
        let other = Arc::new(AtomicUsize::new(0));
        let registry = registry_with(vec![
            counted_entry("ping", "ping", counter.clone()),
            counted_entry("trace", "trace", other.clone()),
        ]);

        let result = registry
            .dispatch(ctx(), "ping", args(json!({ "target": "host-a" })))
            .await;

        assert_eq!(result["handled_by"], "ping");
        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert_eq!(other.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_dispatch_unknown_action() {
        let registry = ServiceRegistry::build("probe", "test dispatcher", &[]);
        let result = registry
            .dispatch(ctx(), "nonexistent_action", JsonObject::new())
            .await;
        assert_eq!(result["error"], "Unknown action 'nonexistent_action'");
    }

    #[tokio::test]
    async fn test_validation_failure_short_circuits_handler() {
        let counter = Arc::new(AtomicUsize::new(0));
        let entry = counted_entry("ping", "ping", counter.clone());

        // "target" is required; omit it.
        let result = entry.run(ctx(), args(json!({ "attempts": 3 }))).await;

        assert!(result.get("validation_error").is_some());
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unknown_fields_are_ignored() {
        let counter = Arc::new(AtomicUsize::new(0));
        let entry = counted_entry("ping", "ping", counter.clone());

        let result = entry
            .run(ctx(), args(json!({ "target": "host-a", "extra": true })))
            .await;

        assert_eq!(result["target"], "host-a");
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_dispatch_object_requires_action() {
        let registry = ServiceRegistry::build("probe", "test dispatcher", &[]);

        let result = registry.dispatch_object(ctx(), JsonObject::new()).await;
        assert_eq!(
            result["validation_error"],
            "missing required field 'action'"
        );

        let result = registry
            .dispatch_object(ctx(), args(json!({ "action": 7 })))
            .await;
        assert_eq!(result["validation_error"], "field 'action' must be a string");
    }

    #[tokio::test]
    async fn test_last_registration_wins_in_module_order() {
        fn module_a() -> Vec<ActionEntry> {
            vec![action(
                "ping",
                "from module a",
                |_ctx: Arc<AwsContext>, params: ProbeParams| async move {
                    json!({ "handled_by": "a", "target": params.target })
                },
            )]
        }
        fn module_b() -> Vec<ActionEntry> {
            vec![action(
                "ping",
                "from module b",
                |_ctx: Arc<AwsContext>, params: ProbeParams| async move {
                    json!({ "handled_by": "b", "target": params.target })
                },
            )]
        }

        let registry = ServiceRegistry::build("probe", "test dispatcher", &[module_a, module_b]);
        assert_eq!(registry.len(), 1);
        let result = registry
            .dispatch(ctx(), "ping", args(json!({ "target": "host-a" })))
            .await;
        assert_eq!(result["handled_by"], "b");

        // Reversed module order keeps the other handler instead.
        let registry = ServiceRegistry::build("probe", "test dispatcher", &[module_b, module_a]);
        let result = registry
            .dispatch(ctx(), "ping", args(json!({ "target": "host-a" })))
            .await;
        assert_eq!(result["handled_by"], "a");
    }

    #[test]
    fn test_dispatcher_tool_schema() {
        let registry = ServiceRegistry::build("probe", "test dispatcher", &[]);
        let tool = registry.dispatcher_tool();
        assert_eq!(tool.name.as_ref(), "aws_probe");
        assert_eq!(tool.input_schema["required"], json!(["action"]));
        assert_eq!(tool.input_schema["additionalProperties"], json!(true));
    }

    #[test]
    fn test_flattened_parameter_schema_types_and_required() {
        let schema = cached_schema_for_type::<ProbeParams>();
        let flat = flattened_parameter_schema(&schema);

        let props = flat["properties"].as_object().unwrap();
        assert_eq!(props["target"]["type"], "string");
        assert_eq!(props["attempts"]["type"], "integer");
        assert_eq!(props["labels"]["type"], "array");
        assert_eq!(props["target"]["description"], "Name of the probe target.");

        let required = flat["required"].as_array().unwrap();
        assert!(required.contains(&json!("target")));
        assert!(!required.contains(&json!("attempts")));
    }
}
