// src/quiz/mod.rs

//! Quiz domain: topics, modes, question records and question-set assembly.

pub mod bank;
pub mod generator;
pub mod session;

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use rand::{RngCore, SeedableRng, rngs::StdRng};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// The four syllabus strands a question can belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Topic {
    Algebra,
    Geometry,
    Number,
    #[serde(rename = "Data Handling")]
    DataHandling,
}

impl Topic {
    pub const ALL: [Topic; 4] = [
        Topic::Algebra,
        Topic::Geometry,
        Topic::Number,
        Topic::DataHandling,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Topic::Algebra => "Algebra",
            Topic::Geometry => "Geometry",
            Topic::Number => "Number",
            Topic::DataHandling => "Data Handling",
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Topic {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['_', '-'], " ");
        match normalized.as_str() {
            "algebra" => Ok(Topic::Algebra),
            "geometry" => Ok(Topic::Geometry),
            "number" => Ok(Topic::Number),
            "data handling" | "datahandling" => Ok(Topic::DataHandling),
            _ => Err(format!("Unknown topic '{}'", s)),
        }
    }
}

/// What the user picked in the topic selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuizMode {
    /// Same questions for every user on a calendar date.
    Daily,
    /// Fresh random questions from a single topic.
    Practice(Topic),
}

impl QuizMode {
    pub const DAILY_NAME: &'static str = "Daily Challenge";

    /// Entries of the topic selector, in display order.
    pub fn selector() -> Vec<QuizMode> {
        std::iter::once(QuizMode::Daily)
            .chain(Topic::ALL.into_iter().map(QuizMode::Practice))
            .collect()
    }

    pub fn name(self) -> &'static str {
        match self {
            QuizMode::Daily => Self::DAILY_NAME,
            QuizMode::Practice(topic) => topic.name(),
        }
    }
}

impl fmt::Display for QuizMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for QuizMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['_', '-'], " ");
        match normalized.as_str() {
            "daily" | "daily challenge" => Ok(QuizMode::Daily),
            _ => Topic::from_str(s)
                .map(QuizMode::Practice)
                .map_err(|_| format!("Unknown quiz mode '{}'", s)),
        }
    }
}

impl Serialize for QuizMode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for QuizMode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Where the questions of a quiz come from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionSource {
    /// The fixed, hand-written question bank.
    #[default]
    Bank,
    /// Template questions with randomised operands.
    Generated,
}

impl FromStr for QuestionSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bank" => Ok(QuestionSource::Bank),
            "generated" => Ok(QuestionSource::Generated),
            _ => Err(format!("Unknown question source '{}'", s)),
        }
    }
}

/// One multiple-choice question.
///
/// `id` is the position inside the generated set (0..=9), not a global key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: u8,
    pub topic: Topic,
    pub prompt: String,
    pub options: Vec<String>,
    pub answer: String,
    pub explanation: String,
}

/// Question as shown to a user who has not submitted yet (no answer, no explanation).
#[derive(Debug, Clone, Serialize)]
pub struct PublicQuestion {
    pub id: u8,
    pub topic: Topic,
    pub prompt: String,
    pub options: Vec<String>,
}

impl From<&Question> for PublicQuestion {
    fn from(q: &Question) -> Self {
        Self {
            id: q.id,
            topic: q.topic,
            prompt: q.prompt.clone(),
            options: q.options.clone(),
        }
    }
}

/// Seed for the daily challenge: the proleptic Gregorian ordinal of the date,
/// where 0001-01-01 is day 1.
pub fn daily_seed(date: NaiveDate) -> u64 {
    date.num_days_from_ce() as u64
}

/// A generator that yields the same sequence for everyone on `date`.
pub fn daily_rng(date: NaiveDate) -> StdRng {
    StdRng::seed_from_u64(daily_seed(date))
}

/// Builds the question set for a quiz.
///
/// The daily challenge ignores `rng` and draws from [`daily_rng`] so the
/// ordered set only depends on `today` and `source`.
pub fn build_question_set(
    mode: QuizMode,
    source: QuestionSource,
    today: NaiveDate,
    rng: &mut dyn RngCore,
) -> Vec<Question> {
    let drawn = match mode {
        QuizMode::Daily => {
            let mut daily = daily_rng(today);
            match source {
                QuestionSource::Bank => bank::daily_selection(&mut daily),
                QuestionSource::Generated => generator::generate_daily(&mut daily),
            }
        }
        QuizMode::Practice(topic) => match source {
            QuestionSource::Bank => bank::topic_selection(topic, rng),
            QuestionSource::Generated => generator::generate(topic, rng),
        },
    };

    drawn
        .into_iter()
        .enumerate()
        .map(|(position, mut question)| {
            question.id = position as u8;
            question
        })
        .collect()
}
