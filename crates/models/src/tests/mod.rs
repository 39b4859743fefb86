/// CRUD operations tests against an in-memory SQLite schema
pub mod crud_tests;

use migration::MigratorTrait;
use sea_orm::DatabaseConnection;

pub(crate) async fn memory_db() -> anyhow::Result<DatabaseConnection> {
    let db = crate::db::connect_in_memory().await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}
