// src/models/quiz.rs

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::quiz::{QuestionSource, QuizMode, session::QuizResult};

/// Query parameters identifying which quiz the user is looking at.
#[derive(Debug, Deserialize)]
pub struct QuizQuery {
    pub mode: QuizMode,
    /// Falls back to the configured source when absent.
    pub source: Option<QuestionSource>,
}

/// DTO for recording one selection.
#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    pub mode: QuizMode,
    pub source: Option<QuestionSource>,
    pub question_id: u8,
    pub option: String,
}

/// DTO for submitting a quiz.
#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    pub mode: QuizMode,
    pub source: Option<QuestionSource>,

    /// Selections sent together with the submission.
    /// Key: question id (0..=9)
    /// Value: selected option
    #[serde(default)]
    pub answers: HashMap<u8, String>,
}

/// DTO for discarding a quiz and starting over.
#[derive(Debug, Deserialize)]
pub struct RetryRequest {
    pub mode: QuizMode,
    pub source: Option<QuestionSource>,
}

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    #[serde(flatten)]
    pub result: QuizResult,
    /// True when this call wrote the score record.
    pub recorded: bool,
}

/// One entry of the topic selector.
#[derive(Debug, Serialize)]
pub struct TopicEntry {
    pub name: &'static str,
    pub daily: bool,
}
