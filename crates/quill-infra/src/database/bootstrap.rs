//! Startup installation of the post lookup function, the title
//! normalization trigger function and its trigger binding.

use std::time::Instant;

use async_trait::async_trait;
use sea_orm::{ConnectionTrait, DbConn, Statement, TransactionTrait};

use quill_core::ports::{
    BootstrapError, BootstrapReport, DEFAULT_BOOTSTRAP_LOCK_KEY, SchemaBootstrap, SchemaObject,
};

const CREATE_LOOKUP_FUNCTION: &str = r#"
CREATE OR REPLACE FUNCTION get_post_by_title(post_title TEXT)
RETURNS SETOF post AS $$
BEGIN
    RETURN QUERY SELECT * FROM post WHERE title = post_title;
END;
$$ LANGUAGE plpgsql;
"#;

const CREATE_NORMALIZATION_FUNCTION: &str = r#"
CREATE OR REPLACE FUNCTION before_insert_post()
RETURNS TRIGGER AS $$
BEGIN
    NEW.title := UPPER(NEW.title);
    RETURN NEW;
END;
$$ LANGUAGE plpgsql;
"#;

const DROP_INSERT_TRIGGER: &str = "DROP TRIGGER IF EXISTS trg_before_insert_post ON post;";

const CREATE_INSERT_TRIGGER: &str = r#"
CREATE TRIGGER trg_before_insert_post
BEFORE INSERT ON post
FOR EACH ROW
EXECUTE FUNCTION before_insert_post();
"#;

/// One bootstrap step: the object it installs and the DDL that does it.
#[derive(Debug, Clone, Copy)]
pub struct InstallStep {
    pub object: SchemaObject,
    pub statements: &'static [&'static str],
}

/// Bootstrap steps in execution order.
pub const INSTALL_STEPS: [InstallStep; 3] = [
    InstallStep {
        object: SchemaObject::LookupFunction,
        statements: &[CREATE_LOOKUP_FUNCTION],
    },
    InstallStep {
        object: SchemaObject::NormalizationFunction,
        statements: &[CREATE_NORMALIZATION_FUNCTION],
    },
    InstallStep {
        object: SchemaObject::InsertTrigger,
        statements: &[DROP_INSERT_TRIGGER, CREATE_INSERT_TRIGGER],
    },
];

/// Installs [`INSTALL_STEPS`] on every start, with no version check.
///
/// The steps run in one transaction holding a transaction-scoped advisory
/// lock, so concurrent instances serialize and a failed step leaves no
/// partial install behind.
pub struct PostgresSchemaBootstrapper<'a> {
    db: &'a DbConn,
    lock_key: i64,
}

impl<'a> PostgresSchemaBootstrapper<'a> {
    pub fn new(db: &'a DbConn) -> Self {
        Self {
            db,
            lock_key: DEFAULT_BOOTSTRAP_LOCK_KEY,
        }
    }

    pub fn with_lock_key(mut self, lock_key: i64) -> Self {
        self.lock_key = lock_key;
        self
    }

    pub fn lock_key(&self) -> i64 {
        self.lock_key
    }
}

#[async_trait]
impl SchemaBootstrap for PostgresSchemaBootstrapper<'_> {
    async fn bootstrap(&self) -> Result<BootstrapReport, BootstrapError> {
        let started = Instant::now();
        tracing::info!(lock_key = self.lock_key, "Bootstrapping post schema objects");

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| BootstrapError::Begin(e.to_string()))?;

        txn.execute(Statement::from_sql_and_values(
            txn.get_database_backend(),
            "SELECT pg_advisory_xact_lock($1)",
            [self.lock_key.into()],
        ))
        .await
        .map_err(|e| BootstrapError::Lock(e.to_string()))?;

        let mut installed = Vec::with_capacity(INSTALL_STEPS.len());
        for step in INSTALL_STEPS {
            for sql in step.statements {
                txn.execute_unprepared(sql).await.map_err(|e| {
                    tracing::error!(object = %step.object, error = %e, "Schema bootstrap failed");
                    BootstrapError::Install {
                        object: step.object,
                        reason: e.to_string(),
                    }
                })?;
            }
            tracing::info!(object = %step.object, "Installed");
            installed.push(step.object);
        }

        txn.commit()
            .await
            .map_err(|e| BootstrapError::Commit(e.to_string()))?;

        let elapsed = started.elapsed();
        tracing::info!(
            objects = installed.len(),
            elapsed_ms = elapsed.as_millis() as u64,
            "Post schema bootstrap complete"
        );

        Ok(BootstrapReport { installed, elapsed })
    }
}
