use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

/// Default advisory lock key serializing schema bootstrap across instances.
pub const DEFAULT_BOOTSTRAP_LOCK_KEY: i64 = 0x5155_494c_4c00_0001;

/// Database objects installed by the schema bootstrap, in install order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaObject {
    /// `get_post_by_title(post_title TEXT) RETURNS SETOF post`
    LookupFunction,
    /// `before_insert_post() RETURNS TRIGGER`
    NormalizationFunction,
    /// `trg_before_insert_post` on `post`
    InsertTrigger,
}

impl SchemaObject {
    pub const ALL: [SchemaObject; 3] = [
        SchemaObject::LookupFunction,
        SchemaObject::NormalizationFunction,
        SchemaObject::InsertTrigger,
    ];

    /// The object's name inside the database.
    pub fn name(&self) -> &'static str {
        match self {
            SchemaObject::LookupFunction => "get_post_by_title",
            SchemaObject::NormalizationFunction => "before_insert_post",
            SchemaObject::InsertTrigger => "trg_before_insert_post",
        }
    }
}

impl fmt::Display for SchemaObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Outcome of a successful bootstrap run.
#[derive(Debug, Clone)]
pub struct BootstrapReport {
    pub installed: Vec<SchemaObject>,
    pub elapsed: Duration,
}

/// Bootstrap failures. All of them are fatal to startup.
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("Failed to open bootstrap transaction: {0}")]
    Begin(String),

    #[error("Failed to acquire bootstrap lock: {0}")]
    Lock(String),

    #[error("Failed to install {object}: {reason}")]
    Install { object: SchemaObject, reason: String },

    #[error("Failed to commit schema bootstrap: {0}")]
    Commit(String),
}

/// Installs the database-side objects the post gateway depends on.
///
/// Implementations must be idempotent: running twice leaves exactly one
/// definition of each object.
#[async_trait]
pub trait SchemaBootstrap: Send + Sync {
    async fn bootstrap(&self) -> Result<BootstrapReport, BootstrapError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn objects_are_listed_in_install_order() {
        let names: Vec<_> = SchemaObject::ALL.iter().map(SchemaObject::name).collect();
        assert_eq!(
            names,
            ["get_post_by_title", "before_insert_post", "trg_before_insert_post"]
        );
    }

    #[test]
    fn begin_and_lock_failures_are_distinct() {
        let begin = BootstrapError::Begin("pool timed out".to_string());
        let lock = BootstrapError::Lock("deadlock detected".to_string());
        assert_eq!(
            begin.to_string(),
            "Failed to open bootstrap transaction: pool timed out"
        );
        assert_eq!(
            lock.to_string(),
            "Failed to acquire bootstrap lock: deadlock detected"
        );
    }

    #[test]
    fn install_error_names_the_object() {
        let err = BootstrapError::Install {
            object: SchemaObject::InsertTrigger,
            reason: "permission denied".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Failed to install trg_before_insert_post: permission denied"
        );
    }
}
