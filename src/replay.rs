use anyhow::{Context, Result};
use tracing::debug;

use crate::quiz::machine::QuizMachine;
use crate::store::HighScoreStore;

/// Feed a script of wire-form actions, one JSON object per line, into the
/// machine. Blank lines and `#` comments are skipped. Stops at the first
/// action that fails to decode; everything before it stays applied.
pub fn run_script<S: HighScoreStore>(machine: &mut QuizMachine<S>, script: &str) -> Result<usize> {
    let mut applied = 0;
    for (lineno, line) in script.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        machine
            .dispatch_raw(line)
            .with_context(|| format!("line {}", lineno + 1))?;
        applied += 1;
    }
    debug!(applied, "replay finished");
    Ok(applied)
}
