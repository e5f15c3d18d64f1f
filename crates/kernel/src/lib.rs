//! Kernel for Libris: layered settings, the module lifecycle trait, and the
//! registry that drives module startup and shutdown.

pub mod module;
pub mod registry;
pub mod settings;

pub use module::{InitCtx, Module};
pub use registry::ModuleRegistry;
