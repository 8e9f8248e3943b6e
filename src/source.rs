use std::fs;
use std::path::PathBuf;
use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{error, info};

use crate::event::AppEvent;
use crate::quiz::action::Action;
use crate::quiz::question::{self, Question};

/// Where questions come from. Fetched exactly once per session.
pub trait QuestionSource {
    fn fetch(&self) -> Result<Vec<Question>>;
    fn describe(&self) -> String;
}

pub struct HttpSource {
    url: String,
    timeout: Option<Duration>,
}

impl HttpSource {
    pub fn new(url: &str, timeout: Option<Duration>) -> Self {
        Self {
            url: url.to_string(),
            timeout,
        }
    }
}

impl QuestionSource for HttpSource {
    #[cfg(feature = "network")]
    fn fetch(&self) -> Result<Vec<Question>> {
        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()?;
        let body = client
            .get(&self.url)
            .send()
            .with_context(|| format!("request to {} failed", self.url))?
            .error_for_status()?
            .text()?;
        question::parse_questions(&body)
    }

    #[cfg(not(feature = "network"))]
    fn fetch(&self) -> Result<Vec<Question>> {
        let _ = self.timeout;
        anyhow::bail!("built without network support; cannot fetch {}", self.url)
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl QuestionSource for FileSource {
    fn fetch(&self) -> Result<Vec<Question>> {
        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("could not read {}", self.path.display()))?;
        question::parse_questions(&content)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Run one fetch and collapse the outcome to the action the quiz understands.
/// Failure detail goes to the log only.
pub fn load_action(source: &dyn QuestionSource) -> Action {
    match source.fetch() {
        Ok(questions) => {
            info!(source = %source.describe(), count = questions.len(), "questions loaded");
            Action::QuestionsLoaded(questions)
        }
        Err(e) => {
            error!(source = %source.describe(), error = %format!("{e:#}"), "question fetch failed");
            Action::QuestionsLoadFailed
        }
    }
}

pub fn spawn_loader(
    source: Box<dyn QuestionSource + Send>,
    tx: Sender<AppEvent>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let action = load_action(source.as_ref());
        let _ = tx.send(AppEvent::Loaded(action));
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use tempfile::TempDir;

    const ONE_QUESTION: &str = r#"[{"question": "2 + 2?", "options": ["3", "4", "5", "22"],
        "correctOption": 1, "points": 10, "difficulty": "easy"}]"#;

    struct FailingSource;

    impl QuestionSource for FailingSource {
        fn fetch(&self) -> Result<Vec<Question>> {
            anyhow::bail!("connection refused")
        }

        fn describe(&self) -> String {
            "nowhere".to_string()
        }
    }

    #[test]
    fn test_file_source_reads_questions() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("questions.json");
        fs::write(&path, ONE_QUESTION).unwrap();

        let questions = FileSource::new(path).fetch().unwrap();
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].options[1], "4");
    }

    #[test]
    fn test_file_source_missing_file_errors() {
        let dir = TempDir::new().unwrap();
        let source = FileSource::new(dir.path().join("absent.json"));
        let err = format!("{:#}", source.fetch().unwrap_err());
        assert!(err.contains("could not read"));
    }

    #[test]
    fn test_load_action_collapses_failure() {
        assert_eq!(load_action(&FailingSource), Action::QuestionsLoadFailed);
    }

    #[test]
    fn test_load_action_on_malformed_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("questions.json");
        fs::write(&path, "{ not json").unwrap();
        assert_eq!(load_action(&FileSource::new(path)), Action::QuestionsLoadFailed);
    }

    #[test]
    fn test_spawn_loader_sends_exactly_one_event() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("questions.json");
        fs::write(&path, ONE_QUESTION).unwrap();

        let (tx, rx) = mpsc::channel();
        spawn_loader(Box::new(FileSource::new(path)), tx).join().unwrap();

        match rx.recv().unwrap() {
            AppEvent::Loaded(Action::QuestionsLoaded(questions)) => assert_eq!(questions.len(), 1),
            _ => panic!("expected a QuestionsLoaded event"),
        }
        assert!(rx.try_recv().is_err());
    }
}
