//! Table migrations for the Quill post service.
//!
//! Only the `post` table lives here. The lookup function and the insert
//! trigger are reinstalled by the api-server on every start.

pub use sea_orm_migration::prelude::*;

mod m20250101_000001_create_post_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20250101_000001_create_post_table::Migration)]
    }
}
