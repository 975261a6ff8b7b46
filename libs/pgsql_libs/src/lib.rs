use std::time::Duration;

use sqlx::{migrate::MigrateError, postgres::PgPoolOptions, PgPool};

pub type DbPool = PgPool;

pub async fn create_db_pool(
    db_url: String,
    min_connection: u32,
    max_connection: u32,
) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .min_connections(min_connection)
        .max_connections(max_connection)
        .acquire_timeout(Duration::from_secs(5))
        .connect(&db_url)
        .await
}

/// Applies the embedded `user`/`posts` schema.
pub async fn run_migrations(db_pool: &DbPool) -> Result<(), MigrateError> {
    sqlx::migrate!("./migrations").run(db_pool).await
}
