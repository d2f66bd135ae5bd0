//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod repository;
mod schema;

pub use repository::PostRepository;
pub use schema::{
    BootstrapError, DEFAULT_BOOTSTRAP_LOCK_KEY, BootstrapReport, SchemaBootstrap, SchemaObject,
};
