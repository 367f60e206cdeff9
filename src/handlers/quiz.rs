// src/handlers/quiz.rs

use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{Query, State},
    response::IntoResponse,
};
use chrono::{Local, NaiveDate};
use sqlx::SqlitePool;
use tokio::sync::Mutex;

use crate::{
    config::Config,
    error::AppError,
    models::quiz::{AnswerRequest, QuizQuery, RetryRequest, SubmitRequest, SubmitResponse, TopicEntry},
    quiz::{
        QuestionSource, QuizMode, build_question_set,
        session::{QuizSession, SessionKey, SessionStore, SessionView},
    },
    repo::ScoreRepo,
    utils::jwt::Claims,
};

/// Calendar date the daily challenge is keyed on.
fn today() -> NaiveDate {
    Local::now().date_naive()
}

async fn create_or_resume(
    sessions: &SessionStore,
    username: &str,
    key: SessionKey,
    today: NaiveDate,
) -> Arc<Mutex<QuizSession>> {
    sessions
        .get_or_create(username, key, || {
            build_question_set(key.mode, key.source, today, &mut rand::thread_rng())
        })
        .await
}

async fn active_session(
    sessions: &SessionStore,
    username: &str,
    mode: QuizMode,
    source: QuestionSource,
) -> Result<Arc<Mutex<QuizSession>>, AppError> {
    let missing = || AppError::NotFound(format!("No active {} quiz", mode));
    let key = sessions
        .existing_key(username, mode, source, today())
        .await
        .ok_or_else(missing)?;
    sessions.find(username, key).await.ok_or_else(missing)
}

/// Lists the entries of the topic selector.
pub async fn list_topics() -> impl IntoResponse {
    let entries: Vec<TopicEntry> = QuizMode::selector()
        .into_iter()
        .map(|mode| TopicEntry {
            name: mode.name(),
            daily: mode == QuizMode::Daily,
        })
        .collect();

    Json(entries)
}

/// Returns the caller's quiz for the selected mode, creating it on first access.
///
/// Reloading returns the same questions and selections until the quiz is
/// retried, the topic changes or (for the daily challenge) the date changes.
pub async fn current_quiz(
    State(sessions): State<SessionStore>,
    State(config): State<Config>,
    Extension(claims): Extension<Claims>,
    Query(query): Query<QuizQuery>,
) -> Result<Json<SessionView>, AppError> {
    let source = query.source.unwrap_or(config.question_source);
    let today = today();
    let key = sessions.key_for(&claims.sub, query.mode, source, today).await;

    let handle = create_or_resume(&sessions, &claims.sub, key, today).await;
    let view = handle.lock().await.view();

    Ok(Json(view))
}

/// Records one selection in the active quiz.
pub async fn answer(
    State(sessions): State<SessionStore>,
    State(config): State<Config>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<AnswerRequest>,
) -> Result<Json<SessionView>, AppError> {
    let source = req.source.unwrap_or(config.question_source);
    let handle = active_session(&sessions, &claims.sub, req.mode, source).await?;

    let mut session = handle.lock().await;
    session.select(req.question_id, &req.option)?;

    Ok(Json(session.view()))
}

/// Grades the active quiz and writes its score record.
///
/// * Selections in the body are applied first, unless the quiz was already submitted.
///   One bad selection rejects the whole request and leaves the quiz unchanged.
/// * Unanswered questions count as incorrect.
/// * The score record is written once per quiz; repeated submits return the
///   stored result with `recorded: false`.
pub async fn submit(
    State(pool): State<SqlitePool>,
    State(sessions): State<SessionStore>,
    State(config): State<Config>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<SubmitRequest>,
) -> Result<Json<SubmitResponse>, AppError> {
    let source = req.source.unwrap_or(config.question_source);
    let handle = active_session(&sessions, &claims.sub, req.mode, source).await?;

    // Held across the write so a double submit cannot record twice.
    let mut session = handle.lock().await;

    if !session.is_submitted() {
        session.select_all(&req.answers)?;
        let result = session.submit();
        tracing::info!(
            "{} scored {}/{} on {}",
            claims.sub,
            result.score,
            result.total,
            req.mode
        );
    }

    let mut recorded = false;
    if let Some(result) = session.take_unsaved_result() {
        if let Err(e) = ScoreRepo::new(pool)
            .record_result(&claims.sub, req.mode.name(), result.score, result.total)
            .await
        {
            session.mark_unsaved();
            return Err(e);
        }
        recorded = true;
    }

    let result = session.result()?.clone();

    Ok(Json(SubmitResponse { result, recorded }))
}

/// Returns the graded result of the active quiz without writing anything.
pub async fn get_result(
    State(sessions): State<SessionStore>,
    State(config): State<Config>,
    Extension(claims): Extension<Claims>,
    Query(query): Query<QuizQuery>,
) -> Result<impl IntoResponse, AppError> {
    let source = query.source.unwrap_or(config.question_source);
    let handle = active_session(&sessions, &claims.sub, query.mode, source).await?;

    let session = handle.lock().await;
    let result = session.result()?.clone();

    Ok(Json(result))
}

/// Discards the active quiz for the mode and starts a new one.
///
/// Practice quizzes get new questions; the daily challenge keeps today's set
/// with cleared selections.
pub async fn retry(
    State(sessions): State<SessionStore>,
    State(config): State<Config>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<RetryRequest>,
) -> Result<Json<SessionView>, AppError> {
    let source = req.source.unwrap_or(config.question_source);
    let today = today();
    let key = sessions.retry(&claims.sub, req.mode, source, today).await;

    let handle = create_or_resume(&sessions, &claims.sub, key, today).await;
    let view = handle.lock().await.view();

    Ok(Json(view))
}
