use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::quiz::question::DifficultyFilter;
use crate::quiz::state::SECS_PER_QUESTION;

const MIN_SECONDS_PER_QUESTION: u32 = 5;
const MAX_SECONDS_PER_QUESTION: u32 = 600;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_questions_url")]
    pub questions_url: String,
    /// Local JSON file used instead of `questions_url` when set.
    #[serde(default)]
    pub questions_file: Option<PathBuf>,
    #[serde(default = "default_seconds_per_question")]
    pub seconds_per_question: u32,
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_difficulty")]
    pub difficulty: String,
    /// No timeout unless set; a hung request keeps the loading screen up.
    #[serde(default)]
    pub fetch_timeout_secs: Option<u64>,
}

fn default_questions_url() -> String {
    "http://localhost:8000/questions".to_string()
}
fn default_seconds_per_question() -> u32 {
    SECS_PER_QUESTION
}
fn default_theme() -> String {
    "catppuccin-mocha".to_string()
}
fn default_difficulty() -> String {
    "all".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            questions_url: default_questions_url(),
            questions_file: None,
            seconds_per_question: default_seconds_per_question(),
            theme: default_theme(),
            difficulty: default_difficulty(),
            fetch_timeout_secs: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("quizr")
            .join("config.toml")
    }

    /// Clamp out-of-range values and reset unknown names to their defaults.
    pub fn validate(&mut self) {
        self.seconds_per_question = self
            .seconds_per_question
            .clamp(MIN_SECONDS_PER_QUESTION, MAX_SECONDS_PER_QUESTION);
        if self.difficulty.parse::<DifficultyFilter>().is_err() {
            self.difficulty = default_difficulty();
        }
        if self.questions_url.trim().is_empty() {
            self.questions_url = default_questions_url();
        }
    }

    pub fn difficulty_filter(&self) -> DifficultyFilter {
        self.difficulty.parse().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_serde_defaults_from_empty() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.questions_url, "http://localhost:8000/questions");
        assert_eq!(config.seconds_per_question, 30);
        assert_eq!(config.difficulty, "all");
        assert!(config.questions_file.is_none());
        assert!(config.fetch_timeout_secs.is_none());
    }

    #[test]
    fn test_config_partial_file_keeps_other_defaults() {
        let toml_str = r#"
questions_url = "https://quiz.example.com/questions"
seconds_per_question = 20
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.questions_url, "https://quiz.example.com/questions");
        assert_eq!(config.seconds_per_question, 20);
        assert_eq!(config.theme, "catppuccin-mocha");
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let mut config = Config::default();
        config.fetch_timeout_secs = Some(15);
        let serialized = toml::to_string_pretty(&config).unwrap();
        let deserialized: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(config.questions_url, deserialized.questions_url);
        assert_eq!(deserialized.fetch_timeout_secs, Some(15));
    }

    #[test]
    fn test_validate_clamps_seconds() {
        let mut config = Config::default();
        config.seconds_per_question = 0;
        config.validate();
        assert_eq!(config.seconds_per_question, 5);

        config.seconds_per_question = 10_000;
        config.validate();
        assert_eq!(config.seconds_per_question, 600);
    }

    #[test]
    fn test_validate_resets_unknown_difficulty() {
        let mut config = Config::default();
        config.difficulty = "nightmare".to_string();
        config.validate();
        assert_eq!(config.difficulty, "all");
        assert_eq!(config.difficulty_filter(), DifficultyFilter::All);
    }

    #[test]
    fn test_difficulty_filter_parses_config_value() {
        let mut config = Config::default();
        config.difficulty = "hard".to_string();
        assert_eq!(config.difficulty_filter(), DifficultyFilter::Hard);
    }
}
