// src/models/score.rs

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Represents the 'scores' table in the database.
/// One row per submitted quiz; rows are never updated.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub id: i64,
    pub username: String,
    /// "Daily Challenge" or the topic name.
    pub topic: String,
    pub score: i64,
    pub total: i64,
    pub percentage: f64,
    pub taken_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TopicSummary {
    pub topic: String,
    pub attempts: usize,
    pub average_percentage: f64,
    pub best_percentage: f64,
}

/// One point of the progress chart.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TrendPoint {
    pub taken_at: DateTime<Utc>,
    pub topic: String,
    pub percentage: f64,
}

/// Aggregates shown above the history table.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct HistorySummary {
    pub attempts: usize,
    pub average_percentage: f64,
    pub best_percentage: f64,
    pub topics: Vec<TopicSummary>,
    /// Oldest first, ready to plot.
    pub trend: Vec<TrendPoint>,
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

fn best(values: &[f64]) -> f64 {
    values.iter().copied().fold(0.0, f64::max)
}

impl HistorySummary {
    /// Builds the summary from records ordered most recent first.
    pub fn from_records(records: &[ScoreRecord]) -> Self {
        let all: Vec<f64> = records.iter().map(|r| r.percentage).collect();

        let mut by_topic: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
        for record in records {
            by_topic
                .entry(record.topic.as_str())
                .or_default()
                .push(record.percentage);
        }

        let topics = by_topic
            .into_iter()
            .map(|(topic, values)| TopicSummary {
                topic: topic.to_string(),
                attempts: values.len(),
                average_percentage: mean(&values),
                best_percentage: best(&values),
            })
            .collect();

        let trend = records
            .iter()
            .rev()
            .map(|r| TrendPoint {
                taken_at: r.taken_at,
                topic: r.topic.clone(),
                percentage: r.percentage,
            })
            .collect();

        Self {
            attempts: records.len(),
            average_percentage: mean(&all),
            best_percentage: best(&all),
            topics,
            trend,
        }
    }
}

/// Body of `GET /api/history`.
#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub records: Vec<ScoreRecord>,
    pub summary: HistorySummary,
}
