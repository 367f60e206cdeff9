// src/handlers/history.rs

use axum::{Extension, Json, extract::State, response::IntoResponse};
use sqlx::SqlitePool;

use crate::{
    error::AppError,
    models::score::{HistoryResponse, HistorySummary},
    repo::ScoreRepo,
    utils::jwt::Claims,
};

/// Lists the caller's score records, most recent first, with aggregates for
/// the summary cards and the trend chart.
pub async fn get_history(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let records = ScoreRepo::new(pool).fetch_history(&claims.sub).await?;
    let summary = HistorySummary::from_records(&records);

    Ok(Json(HistoryResponse { records, summary }))
}
