// src/repo/user.rs

use chrono::Utc;
use sqlx::SqlitePool;

use crate::{
    error::AppError,
    models::user::User,
    utils::hash::{hash_password, verify_password},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterOutcome {
    Created,
    AlreadyExists,
}

#[derive(Clone)]
pub struct UserRepo {
    pool: SqlitePool,
}

impl UserRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Stores a new user with an Argon2 hash of `password`.
    ///
    /// A taken username leaves the table untouched and reports `AlreadyExists`.
    pub async fn register(&self, username: &str, password: &str) -> Result<RegisterOutcome, AppError> {
        let password_hash = hash_password(password)?;

        let inserted = sqlx::query(
            r#"
            INSERT INTO users (username, password_hash, created_at)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(username)
        .bind(&password_hash)
        .bind(Utc::now())
        .execute(&self.pool)
        .await;

        match inserted {
            Ok(_) => Ok(RegisterOutcome::Created),
            Err(sqlx::Error::Database(db))
                if db.is_unique_violation() || db.message().contains("UNIQUE constraint failed") =>
            {
                Ok(RegisterOutcome::AlreadyExists)
            }
            Err(e) => {
                tracing::error!("Failed to register user: {:?}", e);
                Err(AppError::from(e))
            }
        }
    }

    pub async fn find(&self, username: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT username, password_hash, created_at
            FROM users
            WHERE username = ?
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Login DB error: {:?}", e);
            AppError::InternalServerError(e.to_string())
        })?;

        Ok(user)
    }

    /// True when `username` exists and `password` matches its stored hash.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<bool, AppError> {
        match self.find(username).await? {
            Some(user) => verify_password(password, &user.password_hash),
            None => Ok(false),
        }
    }
}
