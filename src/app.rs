use tracing::debug;

use crate::config::Config;
use crate::quiz::action::Action;
use crate::quiz::machine::QuizMachine;
use crate::quiz::question::{DifficultyFilter, OPTIONS_PER_QUESTION};
use crate::quiz::state::{QuizState, Status};
use crate::store::HighScoreStore;
use crate::ui::theme::Theme;

/// Presentation-side state wrapped around the quiz machine: which option the
/// cursor is on, where questions come from, and whether to quit.
pub struct App {
    pub machine: QuizMachine<Box<dyn HighScoreStore>>,
    pub theme: &'static Theme,
    pub config: Config,
    pub source_label: String,
    pub option_cursor: usize,
    pub should_quit: bool,
}

impl App {
    pub fn new(
        config: Config,
        store: Box<dyn HighScoreStore>,
        theme: &'static Theme,
        source_label: String,
    ) -> Self {
        let machine = QuizMachine::new(store, config.seconds_per_question);
        Self {
            machine,
            theme,
            config,
            source_label,
            option_cursor: 0,
            should_quit: false,
        }
    }

    pub fn state(&self) -> &QuizState {
        self.machine.state()
    }

    /// Apply the loader's outcome, then the configured starting difficulty.
    pub fn questions_arrived(&mut self, action: Action) {
        self.machine.dispatch(action);
        let filter = self.config.difficulty_filter();
        if self.state().status == Status::Ready && filter != DifficultyFilter::All {
            self.machine.dispatch(Action::SetDifficulty(filter));
        }
    }

    pub fn start(&mut self) {
        self.option_cursor = 0;
        self.machine.dispatch(Action::Start);
    }

    pub fn cycle_difficulty(&mut self, forward: bool) {
        let current = self.state().difficulty_filter;
        let next = if forward { current.next() } else { current.prev() };
        self.machine.dispatch(Action::SetDifficulty(next));
    }

    pub fn select_next_option(&mut self) {
        self.option_cursor = (self.option_cursor + 1) % OPTIONS_PER_QUESTION;
    }

    pub fn select_prev_option(&mut self) {
        self.option_cursor = (self.option_cursor + OPTIONS_PER_QUESTION - 1) % OPTIONS_PER_QUESTION;
    }

    pub fn submit_selected(&mut self) {
        self.submit(self.option_cursor);
    }

    pub fn submit(&mut self, choice: usize) {
        self.option_cursor = choice;
        self.machine.dispatch(Action::AnswerSubmitted(choice));
    }

    /// Move on once the current question is answered; the last question
    /// finishes the quiz instead.
    pub fn next_or_finish(&mut self) {
        let state = self.state();
        if state.status != Status::Active || !state.has_answered() {
            return;
        }
        if state.is_last_question() {
            self.machine.dispatch(Action::Finish);
        } else {
            self.option_cursor = 0;
            self.machine.dispatch(Action::AdvanceQuestion);
        }
    }

    pub fn restart(&mut self) {
        self.option_cursor = 0;
        self.machine.dispatch(Action::Restart);
    }

    /// Countdown ticks only matter while a quiz is running.
    pub fn on_tick(&mut self) {
        if self.state().status == Status::Active {
            self.machine.dispatch(Action::Tick);
            if self.state().status == Status::Finished {
                debug!("time ran out");
            }
        }
    }
}
