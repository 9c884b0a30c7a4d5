//! MySQL connectivity for the clinic service

use std::collections::HashSet;
use std::time::Duration;

use anyhow::Context;
use clinic_kernel::{settings::DatabaseSettings, Migration};
use sqlx::mysql::{MySqlPool, MySqlPoolOptions};

const MIGRATIONS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS schema_migrations (
        module     VARCHAR(64)  NOT NULL,
        id         VARCHAR(128) NOT NULL,
        applied_at TIMESTAMP    NOT NULL DEFAULT CURRENT_TIMESTAMP,
        PRIMARY KEY (module, id)
    )
"#;

/// Open a connection pool against the configured database
pub async fn connect(settings: &DatabaseSettings) -> anyhow::Result<MySqlPool> {
    tracing::info!(
        target: "clinic-db",
        max_connections = settings.max_connections,
        "connecting to database"
    );

    MySqlPoolOptions::new()
        .max_connections(settings.max_connections)
        .acquire_timeout(Duration::from_millis(settings.acquire_timeout_ms))
        .connect(&settings.url)
        .await
        .with_context(|| "failed to connect to database")
}

/// Apply every migration not yet recorded in `schema_migrations`.
///
/// Returns the number of migrations applied.
pub async fn run_migrations(
    pool: &MySqlPool,
    migrations: &[(String, Migration)],
) -> anyhow::Result<usize> {
    sqlx::raw_sql(MIGRATIONS_TABLE)
        .execute(pool)
        .await
        .with_context(|| "failed to create schema_migrations table")?;

    let applied: HashSet<(String, String)> =
        sqlx::query_as::<_, (String, String)>("SELECT module, id FROM schema_migrations")
            .fetch_all(pool)
            .await
            .with_context(|| "failed to read applied migrations")?
            .into_iter()
            .collect();

    let todo = pending(migrations, &applied);
    for (module, migration) in &todo {
        tracing::info!(target: "clinic-db", module = %module, id = migration.id, "applying migration");

        sqlx::raw_sql(migration.up)
            .execute(pool)
            .await
            .with_context(|| format!("migration {}/{} failed", module, migration.id))?;

        sqlx::query("INSERT INTO schema_migrations (module, id) VALUES (?, ?)")
            .bind(module.as_str())
            .bind(migration.id)
            .execute(pool)
            .await
            .with_context(|| format!("failed to record migration {}/{}", module, migration.id))?;
    }

    Ok(todo.len())
}

/// Migrations from `all` that are absent from `applied`, in input order
pub fn pending<'a>(
    all: &'a [(String, Migration)],
    applied: &HashSet<(String, String)>,
) -> Vec<&'a (String, Migration)> {
    all.iter()
        .filter(|(module, migration)| !applied.contains(&(module.clone(), migration.id.to_string())))
        .collect()
}
