use tracing::{debug, info, warn};

use crate::quiz::action::{Action, QuizError};
use crate::quiz::state::{QuizState, Status};
use crate::store::HighScoreStore;

/// Owns the quiz state and the high-score store it persists to. All changes go
/// through [`QuizMachine::dispatch`].
pub struct QuizMachine<S: HighScoreStore> {
    state: QuizState,
    store: S,
}

impl<S: HighScoreStore> QuizMachine<S> {
    /// Start a session in `Loading`, seeded with the stored high score.
    pub fn new(store: S, seconds_per_question: u32) -> Self {
        let high_score = store.load();
        debug!(high_score, "loaded high score");
        Self {
            state: QuizState::new(high_score, seconds_per_question),
            store,
        }
    }

    pub fn state(&self) -> &QuizState {
        &self.state
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn dispatch(&mut self, action: Action) {
        let name = action.name();
        let finishing = matches!(action, Action::Finish) && self.state.status == Status::Active;
        let previous_high = self.state.high_score;
        let previous_status = self.state.status;

        let state = std::mem::take(&mut self.state);
        self.state = state.apply(action);

        if self.state.status != previous_status {
            debug!(
                action = name,
                from = ?previous_status,
                to = ?self.state.status,
                "status changed"
            );
        }

        if finishing && self.state.high_score > previous_high {
            info!(high_score = self.state.high_score, "new high score");
            if let Err(e) = self.store.save(self.state.high_score) {
                warn!(error = %e, "could not persist high score");
            }
        }
    }

    /// Decode and dispatch one wire-form action. On error nothing is applied.
    pub fn dispatch_raw(&mut self, raw: &str) -> Result<(), QuizError> {
        let action = Action::from_json(raw)?;
        self.dispatch(action);
        Ok(())
    }
}
