//! Engine - Registry, per-root instances, host event routing
//!
//! - [`Engine`] owns the host and the root registry and exposes the entry
//!   points the host drives.
//! - [`Instance`] is the per-root state bundle the `state`, `layout` and
//!   `reload` modules operate on.

mod instance;
mod registry;

pub use instance::Instance;
pub use registry::Engine;
