// SPDX-License-Identifier: MIT

//! SQLite store for user records.
//!
//! All queries go through a single pooled connection (pool capped at one),
//! so database access is serialized.

use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

use crate::models::{NewUser, User};

const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        email TEXT NOT NULL UNIQUE,
        name TEXT NOT NULL,
        password TEXT,
        oauth_provider TEXT,
        oauth_id TEXT
    )",
    "CREATE UNIQUE INDEX IF NOT EXISTS idx_users_oauth
        ON users (oauth_provider, oauth_id)",
];

/// Database connection wrapper.
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Connect and apply the schema.
    pub async fn connect(url: &str) -> Result<Self, sqlx::Error> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(url)
            .await?;
        for statement in SCHEMA {
            sqlx::query(statement).execute(&pool).await?;
        }
        Ok(Self { pool })
    }

    // ─── User store ──────────────────────────────────────────

    pub async fn get_all_users(&self) -> Result<Vec<User>, sqlx::Error> {
        sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY id")
            .fetch_all(&self.pool)
            .await
    }

    pub async fn insert_user(&self, user: &NewUser) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(
            "INSERT INTO users (email, name, password) VALUES (?, ?, ?) RETURNING *",
        )
        .bind(&user.email)
        .bind(&user.name)
        .bind(&user.password)
        .fetch_one(&self.pool)
        .await
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
    }

    /// Update a user record. Returns `None` if the ID does not exist.
    pub async fn update_user(
        &self,
        id: i64,
        user: &NewUser,
    ) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            "UPDATE users SET email = ?, name = ?, password = ? WHERE id = ? RETURNING *",
        )
        .bind(&user.email)
        .bind(&user.name)
        .bind(&user.password)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Delete a user record, returning it. `None` if the ID does not exist.
    pub async fn delete_user(&self, id: i64) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>("DELETE FROM users WHERE id = ? RETURNING *")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    // ─── Auth store ──────────────────────────────────────────

    pub async fn get_user_by_oauth(
        &self,
        provider: &str,
        oauth_id: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE oauth_provider = ? AND oauth_id = ?",
        )
        .bind(provider)
        .bind(oauth_id)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn insert_oauth_user(
        &self,
        email: &str,
        name: &str,
        provider: &str,
        oauth_id: &str,
    ) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(
            "INSERT INTO users (email, name, oauth_provider, oauth_id)
             VALUES (?, ?, ?, ?) RETURNING *",
        )
        .bind(email)
        .bind(name)
        .bind(provider)
        .bind(oauth_id)
        .fetch_one(&self.pool)
        .await
    }
}
