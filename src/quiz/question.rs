use std::fmt;
use std::str::FromStr;

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

pub const OPTIONS_PER_QUESTION: usize = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

/// Which questions are played. `All` keeps the full loaded set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DifficultyFilter {
    #[default]
    All,
    Easy,
    Medium,
    Hard,
}

impl DifficultyFilter {
    pub const ALL: [DifficultyFilter; 4] = [
        DifficultyFilter::All,
        DifficultyFilter::Easy,
        DifficultyFilter::Medium,
        DifficultyFilter::Hard,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DifficultyFilter::All => "all",
            DifficultyFilter::Easy => "easy",
            DifficultyFilter::Medium => "medium",
            DifficultyFilter::Hard => "hard",
        }
    }

    pub fn matches(self, difficulty: Difficulty) -> bool {
        match self {
            DifficultyFilter::All => true,
            DifficultyFilter::Easy => difficulty == Difficulty::Easy,
            DifficultyFilter::Medium => difficulty == Difficulty::Medium,
            DifficultyFilter::Hard => difficulty == Difficulty::Hard,
        }
    }

    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        let idx = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        if idx == 0 {
            Self::ALL[Self::ALL.len() - 1]
        } else {
            Self::ALL[idx - 1]
        }
    }
}

impl fmt::Display for DifficultyFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DifficultyFilter {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(DifficultyFilter::All),
            "easy" => Ok(DifficultyFilter::Easy),
            "medium" => Ok(DifficultyFilter::Medium),
            "hard" => Ok(DifficultyFilter::Hard),
            other => bail!("Unknown difficulty: {other} (expected all, easy, medium or hard)"),
        }
    }
}

/// Question ids are opaque; json-server hands out numbers, hand-written files
/// tend to use strings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QuestionId {
    Number(u64),
    Text(String),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<QuestionId>,
    #[serde(rename = "question")]
    pub text: String,
    pub options: Vec<String>,
    pub correct_option: usize,
    pub points: u32,
    pub difficulty: Difficulty,
}

impl Question {
    pub fn is_correct(&self, choice: usize) -> bool {
        choice == self.correct_option
    }

    pub fn validate(&self) -> Result<()> {
        if self.options.len() != OPTIONS_PER_QUESTION {
            bail!(
                "Question {:?} has {} options (expected {OPTIONS_PER_QUESTION})",
                self.text,
                self.options.len()
            );
        }
        if self.correct_option >= self.options.len() {
            bail!(
                "Question {:?} has correct option {} out of range",
                self.text,
                self.correct_option
            );
        }
        if self.points == 0 {
            bail!("Question {:?} awards no points", self.text);
        }
        Ok(())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum QuestionPayload {
    List(Vec<Question>),
    Wrapped { questions: Vec<Question> },
}

/// Decode a question payload, either a bare array or `{"questions": [...]}`,
/// and reject it if any record is malformed.
pub fn parse_questions(json: &str) -> Result<Vec<Question>> {
    let payload: QuestionPayload = serde_json::from_str(json)?;
    let questions = match payload {
        QuestionPayload::List(questions) => questions,
        QuestionPayload::Wrapped { questions } => questions,
    };
    for question in &questions {
        question.validate()?;
    }
    Ok(questions)
}

pub fn total_points(questions: &[Question]) -> u32 {
    questions.iter().map(|q| q.points).sum()
}
