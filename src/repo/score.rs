// src/repo/score.rs

use chrono::Utc;
use sqlx::SqlitePool;

use crate::{error::AppError, models::score::ScoreRecord};

#[derive(Clone)]
pub struct ScoreRepo {
    pool: SqlitePool,
}

impl ScoreRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Appends one score row, stamped with the current time.
    pub async fn record_result(
        &self,
        username: &str,
        topic: &str,
        score: u32,
        total: u32,
    ) -> Result<ScoreRecord, AppError> {
        let percentage = if total == 0 {
            0.0
        } else {
            score as f64 / total as f64 * 100.0
        };

        let record = sqlx::query_as::<_, ScoreRecord>(
            r#"
            INSERT INTO scores (username, topic, score, total, percentage, taken_at)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING id, username, topic, score, total, percentage, taken_at
            "#,
        )
        .bind(username)
        .bind(topic)
        .bind(score as i64)
        .bind(total as i64)
        .bind(percentage)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to insert score record: {:?}", e);
            AppError::InternalServerError(e.to_string())
        })?;

        Ok(record)
    }

    /// All of a user's results, most recent first.
    pub async fn fetch_history(&self, username: &str) -> Result<Vec<ScoreRecord>, AppError> {
        let records = sqlx::query_as::<_, ScoreRecord>(
            r#"
            SELECT id, username, topic, score, total, percentage, taken_at
            FROM scores
            WHERE username = ?
            ORDER BY taken_at DESC, id DESC
            "#,
        )
        .bind(username)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }
}
