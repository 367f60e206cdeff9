// src/repo/mod.rs

//! Persistence store: thin wrappers around parameterised SQLite queries.

pub mod score;
pub mod user;

pub use score::ScoreRepo;
pub use user::{RegisterOutcome, UserRepo};
