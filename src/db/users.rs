// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! SQL-backed store for authenticated users.
//!
//! One table, keyed by the identity provider's subject id. Rows are created
//! on first login and never updated.

use crate::db::tables;
use crate::error::AppError;
use crate::models::User;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

const MAX_CONNECTIONS: u32 = 5;

/// User store client.
#[derive(Clone)]
pub struct UserStore {
    pool: SqlitePool,
}

impl UserStore {
    /// Open a connection pool for `database_url`.
    ///
    /// In-memory databases are per-connection in SQLite, so those get a
    /// single pooled connection that is never recycled.
    pub async fn connect(database_url: &str) -> Result<Self, AppError> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| AppError::Database(format!("Invalid database URL: {}", e)))?;

        let in_memory = database_url.contains(":memory:");
        let max_connections = if in_memory { 1 } else { MAX_CONNECTIONS };

        let mut pool_options = SqlitePoolOptions::new().max_connections(max_connections);
        if in_memory {
            // Closing the only connection would drop the database.
            pool_options = pool_options.idle_timeout(None).max_lifetime(None);
        }

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to database: {}", e)))?;

        tracing::info!(max_connections, "Connected to user store");

        Ok(Self { pool })
    }

    /// Create the schema. Safe to run repeatedly.
    pub async fn create_tables(&self) -> Result<(), AppError> {
        sqlx::query(&format!(
            r#"
            CREATE TABLE IF NOT EXISTS "{}" (
                id TEXT PRIMARY KEY NOT NULL,
                name VARCHAR(128) NOT NULL,
                email VARCHAR(128) NOT NULL
            )
            "#,
            tables::USER
        ))
        .execute(&self.pool)
        .await?;

        tracing::info!(table = tables::USER, "Tables created");
        Ok(())
    }

    /// Drop the schema and all stored users.
    pub async fn delete_tables(&self) -> Result<(), AppError> {
        sqlx::query(&format!(r#"DROP TABLE IF EXISTS "{}""#, tables::USER))
            .execute(&self.pool)
            .await?;

        tracing::warn!(table = tables::USER, "Tables dropped");
        Ok(())
    }

    /// Get a user by exact id.
    pub async fn get(&self, id: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"SELECT id, name, email FROM "{}" WHERE id = ?"#,
            tables::USER
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Insert a user unless a row with the same id already exists.
    ///
    /// Returns `true` when a row was inserted.
    pub async fn create(&self, user: &User) -> Result<bool, AppError> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(&format!(
            r#"
            INSERT INTO "{}" (id, name, email)
            VALUES (?, ?, ?)
            ON CONFLICT (id) DO NOTHING
            "#,
            tables::USER
        ))
        .bind(&user.id)
        .bind(&user.name)
        .bind(&user.email)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        let inserted = result.rows_affected() == 1;
        if inserted {
            tracing::info!(user_id = %user.id, "User created");
        }
        Ok(inserted)
    }

    /// Remove a user. Returns `true` if a row was deleted.
    pub async fn delete(&self, id: &str) -> Result<bool, AppError> {
        let result = sqlx::query(&format!(r#"DELETE FROM "{}" WHERE id = ?"#, tables::USER))
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Number of stored users.
    pub async fn count(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar(&format!(r#"SELECT COUNT(*) FROM "{}""#, tables::USER))
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
