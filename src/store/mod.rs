pub mod json_store;

use anyhow::Result;

/// Read/write access to the single persisted high-score slot.
pub trait HighScoreStore {
    /// Stored high score, or 0 when the slot is absent or unreadable.
    fn load(&self) -> u32;
    fn save(&mut self, high_score: u32) -> Result<()>;
}

impl<S: HighScoreStore + ?Sized> HighScoreStore for Box<S> {
    fn load(&self) -> u32 {
        (**self).load()
    }

    fn save(&mut self, high_score: u32) -> Result<()> {
        (**self).save(high_score)
    }
}

/// Keeps the high score in memory only. Used for replays and tests, and as the
/// fallback when the data directory is unusable.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemoryStore {
    pub high_score: Option<u32>,
    pub writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_high_score(high_score: u32) -> Self {
        Self {
            high_score: Some(high_score),
            writes: 0,
        }
    }
}

impl HighScoreStore for MemoryStore {
    fn load(&self) -> u32 {
        self.high_score.unwrap_or(0)
    }

    fn save(&mut self, high_score: u32) -> Result<()> {
        self.high_score = Some(high_score);
        self.writes += 1;
        Ok(())
    }
}
