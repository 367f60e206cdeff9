// src/config.rs

use std::env;
use std::str::FromStr;

use dotenvy::dotenv;

use crate::quiz::QuestionSource;

/// Number of questions in one quiz.
pub const QUIZ_LENGTH: usize = 10;

/// Number of options shown for every generated question.
pub const OPTION_COUNT: usize = 4;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_expiration: u64,
    pub rust_log: String,
    pub bind_addr: String,
    pub static_dir: String,
    /// Where quiz questions come from when the client does not ask for a source.
    pub question_source: QuestionSource,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://math_quiz.db?mode=rwc".to_string());

        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET must be set");

        let jwt_expiration = env::var("JWT_EXPIRATION")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(86_400);

        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

        let static_dir = env::var("STATIC_DIR").unwrap_or_else(|_| "static".to_string());

        let question_source = env::var("QUESTION_SOURCE")
            .ok()
            .and_then(|v| QuestionSource::from_str(&v).ok())
            .unwrap_or_default();

        Self {
            database_url,
            jwt_secret,
            jwt_expiration,
            rust_log,
            bind_addr,
            static_dir,
            question_source,
        }
    }
}
