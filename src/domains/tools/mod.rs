//! Tools domain module.
//!
//! Everything callable by MCP clients lives here:
//!
//! - `registry.rs` - the per-service action registries and dispatch
//! - `definitions/` - action implementations, one module tree per service
//! - `router.rs` - startup-built ToolRouter (dispatchers + generated tools)
//!
//! ## Adding a new action
//!
//! 1. Add the parameter struct and handler to the right file under
//!    `definitions/<service>/` (or a new file)
//! 2. Append it to that file's `actions()` list
//! 3. If it is a new file, add it to the service's module list in
//!    `definitions/<service>/mod.rs`
//!
//! The dispatcher, the generated single-action tool, and the router pick it
//! up from the registry; nothing else changes.

pub mod definitions;
pub mod registry;
pub mod router;

pub use registry::{ActionEntry, ServiceRegistry, action};
pub use router::build_tool_router;
