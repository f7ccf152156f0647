use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

pub const MIGRATIONS: &str = include_str!("schema.sql");

pub async fn init_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(8)
        .connect(database_url)
        .await
}

/// Apply the schema. Every statement is `IF NOT EXISTS`, so this runs on every start.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::raw_sql(MIGRATIONS).execute(pool).await?;
    log::info!("Database migrations complete");
    Ok(())
}
