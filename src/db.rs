use std::str::FromStr;

use anyhow::Context;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};

pub async fn connect_pool(database_url: &str, max_connections: u32) -> anyhow::Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)
        .with_context(|| format!("parse database url {database_url}"))?
        .create_if_missing(true)
        .foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await
        .with_context(|| format!("connect to sqlite via {database_url}"))
}

// Interactions rely on the implicit rowid for insertion order.
const SCHEMA: [&str; 7] = [
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id          TEXT PRIMARY KEY,
        email       TEXT,
        name        TEXT NOT NULL,
        verified    BOOLEAN NOT NULL DEFAULT 0,
        created_at  TEXT NOT NULL
    );"#,
    r#"
    CREATE TABLE IF NOT EXISTS listings (
        id           BLOB PRIMARY KEY,
        owner_id     TEXT NOT NULL,
        title        TEXT NOT NULL,
        description  TEXT NOT NULL,
        price        REAL NOT NULL,
        location     TEXT NOT NULL,
        availability BOOLEAN NOT NULL,
        created_at   TEXT NOT NULL,
        updated_at   TEXT NOT NULL
    );"#,
    "CREATE INDEX IF NOT EXISTS listings_owner ON listings (owner_id);",
    "CREATE INDEX IF NOT EXISTS listings_available ON listings (availability);",
    r#"
    CREATE TABLE IF NOT EXISTS interactions (
        id              BLOB NOT NULL UNIQUE,
        sender_id       TEXT NOT NULL,
        counterpart_id  TEXT NOT NULL,
        message         TEXT NOT NULL,
        timestamp       TEXT NOT NULL,
        recorded_at     TEXT NOT NULL,
        CHECK (sender_id <> counterpart_id)
    );"#,
    "CREATE INDEX IF NOT EXISTS interactions_sender ON interactions (sender_id);",
    "CREATE INDEX IF NOT EXISTS interactions_counterpart ON interactions (counterpart_id);",
];

pub async fn run_migrations(db_pool: &SqlitePool) -> anyhow::Result<()> {
    for statement in SCHEMA {
        sqlx::query(statement)
            .execute(db_pool)
            .await
            .with_context(|| {
                format!("apply migration: {}", statement.trim().lines().next().unwrap_or_default())
            })?;
    }
    tracing::debug!(statements = SCHEMA.len(), "schema up to date");
    Ok(())
}
