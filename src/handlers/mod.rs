// src/handlers/mod.rs

pub mod auth;
pub mod history;
pub mod quiz;
