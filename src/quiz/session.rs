// src/quiz/session.rs

//! Per-user quiz sessions.
//!
//! A [`QuizSession`] owns one question set together with the user's
//! selections and, once submitted, its graded result. The [`SessionStore`]
//! keeps at most one active session per user, keyed by [`SessionKey`], so that
//! reloading the page never reshuffles questions that are already on screen.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::NaiveDate;
use serde::Serialize;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use super::{PublicQuestion, QuestionSource, QuizMode, Question, Topic};

/// What makes one quiz distinct from another for the same user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionVariant {
    /// Daily challenge: shared by everyone on this date.
    Date(NaiveDate),
    /// Practice: a nonce minted per user and topic, renewed on retry.
    Nonce(Uuid),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct SessionKey {
    pub mode: QuizMode,
    pub source: QuestionSource,
    pub variant: SessionVariant,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionError {
    UnknownQuestion(u8),
    InvalidOption { question_id: u8, option: String },
    AlreadySubmitted,
    NotSubmitted,
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::UnknownQuestion(id) => write!(f, "Question {} is not part of this quiz", id),
            SessionError::InvalidOption {
                question_id,
                option,
            } => write!(f, "'{}' is not an option of question {}", option, question_id),
            SessionError::AlreadySubmitted => write!(f, "Quiz has already been submitted"),
            SessionError::NotSubmitted => write!(f, "Quiz has not been submitted yet"),
        }
    }
}

impl std::error::Error for SessionError {}

/// Outcome of one question after submission.
#[derive(Debug, Clone, Serialize)]
pub struct QuestionFeedback {
    pub question_id: u8,
    pub prompt: String,
    pub selected: Option<String>,
    pub correct_answer: String,
    pub is_correct: bool,
    pub explanation: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuizResult {
    pub score: u32,
    pub total: u32,
    pub percentage: f64,
    pub message: String,
    pub feedback: Vec<QuestionFeedback>,
}

/// Encouragement shown next to the final score.
pub fn message_for(percentage: f64) -> &'static str {
    if percentage >= 80.0 {
        "Amazing job! You are a Math Wizard!"
    } else if percentage >= 50.0 {
        "Good effort! Keep practicing!"
    } else {
        "Don't give up! Review the explanations above."
    }
}

/// Grades by exact string equality. Unanswered questions count as incorrect.
pub fn grade(questions: &[Question], answers: &HashMap<u8, String>) -> QuizResult {
    let feedback: Vec<QuestionFeedback> = questions
        .iter()
        .map(|q| {
            let selected = answers.get(&q.id).cloned();
            QuestionFeedback {
                question_id: q.id,
                prompt: q.prompt.clone(),
                is_correct: selected.as_deref() == Some(q.answer.as_str()),
                selected,
                correct_answer: q.answer.clone(),
                explanation: q.explanation.clone(),
            }
        })
        .collect();

    let score = feedback.iter().filter(|f| f.is_correct).count() as u32;
    let total = questions.len() as u32;
    let percentage = if total == 0 {
        0.0
    } else {
        score as f64 / total as f64 * 100.0
    };

    QuizResult {
        score,
        total,
        percentage,
        message: message_for(percentage).to_string(),
        feedback,
    }
}

/// What the client sees of a session.
#[derive(Debug, Serialize)]
pub struct SessionView {
    pub mode: QuizMode,
    pub source: QuestionSource,
    pub date: Option<NaiveDate>,
    pub notice: String,
    pub questions: Vec<PublicQuestion>,
    pub answers: HashMap<u8, String>,
    pub submitted: bool,
    pub result: Option<QuizResult>,
}

#[derive(Debug)]
pub struct QuizSession {
    key: SessionKey,
    questions: Vec<Question>,
    answers: HashMap<u8, String>,
    result: Option<QuizResult>,
    saved: bool,
}

impl QuizSession {
    pub fn new(key: SessionKey, questions: Vec<Question>) -> Self {
        Self {
            key,
            questions,
            answers: HashMap::new(),
            result: None,
            saved: false,
        }
    }

    pub fn key(&self) -> SessionKey {
        self.key
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn answers(&self) -> &HashMap<u8, String> {
        &self.answers
    }

    pub fn is_submitted(&self) -> bool {
        self.result.is_some()
    }

    pub fn result(&self) -> Result<&QuizResult, SessionError> {
        self.result.as_ref().ok_or(SessionError::NotSubmitted)
    }

    fn check(&self, question_id: u8, option: &str) -> Result<(), SessionError> {
        if self.is_submitted() {
            return Err(SessionError::AlreadySubmitted);
        }

        let question = self
            .questions
            .iter()
            .find(|q| q.id == question_id)
            .ok_or(SessionError::UnknownQuestion(question_id))?;

        if !question.options.iter().any(|o| o == option) {
            return Err(SessionError::InvalidOption {
                question_id,
                option: option.to_string(),
            });
        }
        Ok(())
    }

    /// Records (or replaces) the selected option for one question.
    pub fn select(&mut self, question_id: u8, option: &str) -> Result<(), SessionError> {
        self.check(question_id, option)?;
        self.answers.insert(question_id, option.to_string());
        Ok(())
    }

    /// Records a batch of selections, all or nothing.
    pub fn select_all(&mut self, picks: &HashMap<u8, String>) -> Result<(), SessionError> {
        for (question_id, option) in picks {
            self.check(*question_id, option)?;
        }
        self.answers
            .extend(picks.iter().map(|(id, option)| (*id, option.clone())));
        Ok(())
    }

    /// Grades the session. Calling it again returns the first result.
    pub fn submit(&mut self) -> &QuizResult {
        let questions = &self.questions;
        let answers = &self.answers;
        self.result.get_or_insert_with(|| grade(questions, answers))
    }

    /// Hands out the result for persisting, once per session.
    pub fn take_unsaved_result(&mut self) -> Option<QuizResult> {
        if self.saved {
            return None;
        }
        let result = self.result.clone()?;
        self.saved = true;
        Some(result)
    }

    /// Re-arms saving after a failed write.
    pub fn mark_unsaved(&mut self) {
        self.saved = false;
    }

    pub fn view(&self) -> SessionView {
        let (date, notice) = match (self.key.mode, self.key.variant) {
            (QuizMode::Daily, SessionVariant::Date(date)) => (
                Some(date),
                format!("Date: {} | These questions refresh automatically tomorrow!", date),
            ),
            (mode, _) => (
                None,
                format!("Practicing {}. Retry to get a new set of random questions.", mode),
            ),
        };

        SessionView {
            mode: self.key.mode,
            source: self.key.source,
            date,
            notice,
            questions: self.questions.iter().map(PublicQuestion::from).collect(),
            answers: self.answers.clone(),
            submitted: self.is_submitted(),
            result: self.result.clone(),
        }
    }
}

struct UserQuizzes {
    nonces: HashMap<Topic, Uuid>,
    active_key: Option<SessionKey>,
    active: Option<Arc<Mutex<QuizSession>>>,
    last_seen: Instant,
}

impl Default for UserQuizzes {
    fn default() -> Self {
        Self {
            nonces: HashMap::new(),
            active_key: None,
            active: None,
            last_seen: Instant::now(),
        }
    }
}

/// Idle time after which a user's quizzes are dropped when no other limit is given.
const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(24 * 60 * 60);

/// In-memory home of every user's active quiz.
///
/// The outer lock only guards map lookups; each session has its own mutex so
/// one user grading and saving never blocks another. Users idle for longer
/// than `idle_timeout` are pruned whenever a new quiz is created.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<String, UserQuizzes>>>,
    idle_timeout: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_idle_timeout(DEFAULT_IDLE_TIMEOUT)
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_idle_timeout(idle_timeout: Duration) -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
            idle_timeout,
        }
    }

    /// Key of the quiz `username` already has for `mode`, without minting anything.
    pub async fn existing_key(
        &self,
        username: &str,
        mode: QuizMode,
        source: QuestionSource,
        today: NaiveDate,
    ) -> Option<SessionKey> {
        let variant = match mode {
            QuizMode::Daily => SessionVariant::Date(today),
            QuizMode::Practice(topic) => {
                let users = self.inner.read().await;
                SessionVariant::Nonce(*users.get(username)?.nonces.get(&topic)?)
            }
        };

        Some(SessionKey {
            mode,
            source,
            variant,
        })
    }

    /// Key of the quiz `username` should currently see for `mode`.
    pub async fn key_for(
        &self,
        username: &str,
        mode: QuizMode,
        source: QuestionSource,
        today: NaiveDate,
    ) -> SessionKey {
        let variant = match mode {
            QuizMode::Daily => SessionVariant::Date(today),
            QuizMode::Practice(topic) => {
                let mut users = self.inner.write().await;
                let user = users.entry(username.to_string()).or_default();
                user.last_seen = Instant::now();
                SessionVariant::Nonce(*user.nonces.entry(topic).or_insert_with(Uuid::new_v4))
            }
        };

        SessionKey {
            mode,
            source,
            variant,
        }
    }

    /// Returns the active session when it matches `key`, otherwise replaces it
    /// with a new one built from `make_questions`.
    pub async fn get_or_create<F>(
        &self,
        username: &str,
        key: SessionKey,
        make_questions: F,
    ) -> Arc<Mutex<QuizSession>>
    where
        F: FnOnce() -> Vec<Question>,
    {
        let mut users = self.inner.write().await;
        let idle_timeout = self.idle_timeout;
        users.retain(|name, user| name == username || user.last_seen.elapsed() < idle_timeout);

        let user = users.entry(username.to_string()).or_default();
        user.last_seen = Instant::now();

        if let (Some(active_key), Some(active)) = (user.active_key, &user.active) {
            if active_key == key {
                return active.clone();
            }
        }

        tracing::debug!("Creating {} quiz for {}", key.mode, username);
        let session = Arc::new(Mutex::new(QuizSession::new(key, make_questions())));
        user.active_key = Some(key);
        user.active = Some(session.clone());
        session
    }

    /// The active session, only if it is the one identified by `key`.
    pub async fn find(&self, username: &str, key: SessionKey) -> Option<Arc<Mutex<QuizSession>>> {
        let mut users = self.inner.write().await;
        let user = users.get_mut(username)?;
        user.last_seen = Instant::now();
        match (user.active_key, &user.active) {
            (Some(active_key), Some(active)) if active_key == key => Some(active.clone()),
            _ => None,
        }
    }

    /// Discards the active quiz for `mode` and returns the key of its replacement.
    ///
    /// Practice quizzes get a fresh nonce; the daily key stays tied to the date.
    pub async fn retry(
        &self,
        username: &str,
        mode: QuizMode,
        source: QuestionSource,
        today: NaiveDate,
    ) -> SessionKey {
        {
            let mut users = self.inner.write().await;
            let user = users.entry(username.to_string()).or_default();

            if user.active_key.is_some_and(|k| k.mode == mode) {
                user.active_key = None;
                user.active = None;
            }
            if let QuizMode::Practice(topic) = mode {
                user.nonces.insert(topic, Uuid::new_v4());
            }
        }

        self.key_for(username, mode, source, today).await
    }

    /// Forgets everything about `username`.
    pub async fn clear(&self, username: &str) {
        self.inner.write().await.remove(username);
    }
}
