use std::fs;
use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, warn};

use crate::store::HighScoreStore;

const HIGH_SCORE_FILE: &str = "highscore.json";

/// File-backed store under the user's data directory. Each slot is one JSON
/// document, replaced atomically on write.
pub struct JsonStore {
    base_dir: PathBuf,
}

impl JsonStore {
    pub fn new() -> Result<Self> {
        let base_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("quizr");
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    pub fn with_base_dir(base_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    fn file_path(&self, name: &str) -> PathBuf {
        self.base_dir.join(name)
    }

    fn load_slot<T: DeserializeOwned + Default>(&self, name: &str) -> T {
        let path = self.file_path(name);
        if !path.exists() {
            return T::default();
        }
        match fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(content.trim()).unwrap_or_else(|e| {
                warn!(path = %path.display(), error = %e, "discarding malformed slot");
                T::default()
            }),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "could not read slot");
                T::default()
            }
        }
    }

    fn save_slot<T: Serialize>(&self, name: &str, data: &T) -> Result<()> {
        let path = self.file_path(name);
        let tmp_path = path.with_extension("tmp");

        let json = serde_json::to_string(data)?;
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;

        fs::rename(&tmp_path, &path)?;
        debug!(path = %path.display(), "slot written");
        Ok(())
    }
}

impl HighScoreStore for JsonStore {
    fn load(&self) -> u32 {
        self.load_slot(HIGH_SCORE_FILE)
    }

    fn save(&mut self, high_score: u32) -> Result<()> {
        self.save_slot(HIGH_SCORE_FILE, &high_score)
    }
}
