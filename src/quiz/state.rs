use serde::Serialize;

use crate::quiz::action::Action;
use crate::quiz::question::{self, DifficultyFilter, Question};

pub const SECS_PER_QUESTION: u32 = 30;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Loading,
    Error,
    Ready,
    Active,
    Finished,
}

/// Snapshot of a quiz session. Screens render it; only [`QuizState::apply`]
/// changes it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizState {
    pub all_questions: Vec<Question>,
    pub active_questions: Vec<Question>,
    pub status: Status,
    pub current_index: usize,
    pub current_answer: Option<usize>,
    pub answered_history: Vec<Option<usize>>,
    pub score: u32,
    pub high_score: u32,
    pub seconds_remaining: u32,
    pub difficulty_filter: DifficultyFilter,
    pub seconds_per_question: u32,
}

impl Default for QuizState {
    fn default() -> Self {
        Self::new(0, SECS_PER_QUESTION)
    }
}

impl QuizState {
    pub fn new(high_score: u32, seconds_per_question: u32) -> Self {
        Self {
            all_questions: Vec::new(),
            active_questions: Vec::new(),
            status: Status::Loading,
            current_index: 0,
            current_answer: None,
            answered_history: Vec::new(),
            score: 0,
            high_score,
            seconds_remaining: 0,
            difficulty_filter: DifficultyFilter::All,
            seconds_per_question,
        }
    }

    pub fn num_questions(&self) -> usize {
        self.active_questions.len()
    }

    pub fn max_possible_points(&self) -> u32 {
        question::total_points(&self.active_questions)
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.active_questions.get(self.current_index)
    }

    pub fn is_last_question(&self) -> bool {
        self.current_index + 1 >= self.active_questions.len()
    }

    pub fn has_answered(&self) -> bool {
        self.current_answer.is_some()
    }

    /// Apply one action and return the next state. Actions whose precondition
    /// does not hold leave the state as it was.
    pub fn apply(mut self, action: Action) -> Self {
        match action {
            Action::QuestionsLoaded(questions) => {
                if self.status == Status::Loading {
                    self.active_questions = questions.clone();
                    self.all_questions = questions;
                    self.status = Status::Ready;
                }
            }
            Action::QuestionsLoadFailed => {
                if self.status == Status::Loading {
                    self.status = Status::Error;
                }
            }
            Action::Start => {
                if self.status == Status::Ready && !self.active_questions.is_empty() {
                    self.status = Status::Active;
                    let count = u32::try_from(self.active_questions.len()).unwrap_or(u32::MAX);
                    self.seconds_remaining = count.saturating_mul(self.seconds_per_question);
                }
            }
            Action::AnswerSubmitted(choice) => {
                if self.status != Status::Active || self.current_answer.is_some() {
                    return self;
                }
                let Some(question) = self.active_questions.get(self.current_index) else {
                    return self;
                };
                if choice >= question.options.len() {
                    return self;
                }
                if question.is_correct(choice) {
                    self.score += question.points;
                }
                // Only navigation reads answered_history; nothing records into it.
                self.current_answer = Some(choice);
            }
            Action::AdvanceQuestion => {
                if self.status == Status::Active && !self.is_last_question() {
                    self.current_index += 1;
                    self.current_answer = self
                        .answered_history
                        .get(self.current_index)
                        .copied()
                        .flatten();
                }
            }
            Action::Finish => {
                if self.status == Status::Active {
                    self.high_score = self.high_score.max(self.score);
                    self.status = Status::Finished;
                }
            }
            Action::Restart => {
                let fresh = Self {
                    all_questions: self.all_questions,
                    active_questions: self.active_questions,
                    status: Status::Ready,
                    high_score: self.high_score,
                    difficulty_filter: self.difficulty_filter,
                    ..Self::new(0, self.seconds_per_question)
                };
                return fresh;
            }
            Action::Tick => {
                if self.status == Status::Active {
                    let before = self.seconds_remaining;
                    self.seconds_remaining = before.saturating_sub(1);
                    if before == 0 {
                        self.status = Status::Finished;
                    }
                }
            }
            Action::SetDifficulty(filter) => {
                // Only before a round starts; a swapped set would strand
                // current_index or leave score above the new maximum.
                if matches!(self.status, Status::Loading | Status::Error | Status::Ready) {
                    self.difficulty_filter = filter;
                    self.active_questions = match filter {
                        DifficultyFilter::All => self.all_questions.clone(),
                        _ => self
                            .all_questions
                            .iter()
                            .filter(|q| filter.matches(q.difficulty))
                            .cloned()
                            .collect(),
                    };
                }
            }
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::question::Difficulty;

    fn question(correct: usize, points: u32, difficulty: Difficulty) -> Question {
        Question {
            id: None,
            text: format!("q worth {points}"),
            options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            correct_option: correct,
            points,
            difficulty,
        }
    }

    fn two_question_state() -> QuizState {
        QuizState::default().apply(Action::QuestionsLoaded(vec![
            question(0, 10, Difficulty::Easy),
            question(1, 10, Difficulty::Hard),
        ]))
    }

    fn mixed_state() -> QuizState {
        QuizState::default().apply(Action::QuestionsLoaded(vec![
            question(0, 10, Difficulty::Easy),
            question(1, 20, Difficulty::Medium),
            question(2, 30, Difficulty::Hard),
            question(3, 10, Difficulty::Easy),
        ]))
    }

    #[test]
    fn test_initial_state_is_loading() {
        let state = QuizState::new(42, SECS_PER_QUESTION);
        assert_eq!(state.status, Status::Loading);
        assert_eq!(state.high_score, 42);
        assert_eq!(state.difficulty_filter, DifficultyFilter::All);
        assert!(state.current_question().is_none());
    }

    #[test]
    fn test_loaded_sets_both_question_lists() {
        let state = two_question_state();
        assert_eq!(state.status, Status::Ready);
        assert_eq!(state.all_questions, state.active_questions);
        assert_eq!(state.num_questions(), 2);
        assert_eq!(state.max_possible_points(), 20);
    }

    #[test]
    fn test_load_failed_only_from_loading() {
        let state = QuizState::default().apply(Action::QuestionsLoadFailed);
        assert_eq!(state.status, Status::Error);

        let ready = two_question_state().apply(Action::QuestionsLoadFailed);
        assert_eq!(ready.status, Status::Ready);
    }

    #[test]
    fn test_second_load_is_ignored() {
        let state = two_question_state().apply(Action::QuestionsLoaded(Vec::new()));
        assert_eq!(state.all_questions.len(), 2);
    }

    #[test]
    fn test_two_question_walkthrough() {
        let state = two_question_state().apply(Action::Start);
        assert_eq!(state.status, Status::Active);
        assert_eq!(state.seconds_remaining, 60);

        let state = state.apply(Action::AnswerSubmitted(0));
        assert_eq!(state.score, 10);
        assert_eq!(state.current_answer, Some(0));

        let state = state.apply(Action::AdvanceQuestion);
        assert_eq!(state.current_index, 1);
        assert_eq!(state.current_answer, None);

        let state = state.apply(Action::AnswerSubmitted(1));
        assert_eq!(state.score, 20);

        let state = state.apply(Action::Finish);
        assert_eq!(state.status, Status::Finished);
        assert_eq!(state.high_score, 20);
    }

    #[test]
    fn test_wrong_answer_keeps_score() {
        let state = two_question_state()
            .apply(Action::Start)
            .apply(Action::AnswerSubmitted(3));
        assert_eq!(state.score, 0);
        assert_eq!(state.current_answer, Some(3));
    }

    #[test]
    fn test_answer_does_not_record_history() {
        let state = two_question_state()
            .apply(Action::Start)
            .apply(Action::AnswerSubmitted(0));
        assert!(state.answered_history.is_empty());
    }

    #[test]
    fn test_second_answer_on_same_question_is_ignored() {
        let state = two_question_state()
            .apply(Action::Start)
            .apply(Action::AnswerSubmitted(0))
            .apply(Action::AnswerSubmitted(0));
        assert_eq!(state.score, 10);
    }

    #[test]
    fn test_out_of_range_choice_is_ignored() {
        let state = two_question_state()
            .apply(Action::Start)
            .apply(Action::AnswerSubmitted(7));
        assert_eq!(state.current_answer, None);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_answer_before_start_is_noop() {
        let state = two_question_state().apply(Action::AnswerSubmitted(0));
        assert_eq!(state.score, 0);
        assert_eq!(state.current_answer, None);
    }

    #[test]
    fn test_advance_stops_at_last_question() {
        let state = two_question_state()
            .apply(Action::Start)
            .apply(Action::AdvanceQuestion)
            .apply(Action::AnswerSubmitted(1))
            .apply(Action::AdvanceQuestion);
        assert_eq!(state.current_index, 1);
        assert_eq!(state.current_answer, Some(1));
        assert!(state.is_last_question());

        // The answer survives, so it cannot be scored twice.
        let state = state.apply(Action::AnswerSubmitted(1));
        assert_eq!(state.score, 10);
    }

    #[test]
    fn test_advance_restores_answer_from_history() {
        let mut state = two_question_state().apply(Action::Start);
        state.answered_history = vec![None, Some(2)];
        let state = state.apply(Action::AdvanceQuestion);
        assert_eq!(state.current_answer, Some(2));
    }

    #[test]
    fn test_start_uses_configured_seconds() {
        let state = QuizState::new(0, 12)
            .apply(Action::QuestionsLoaded(vec![question(0, 5, Difficulty::Easy)]))
            .apply(Action::Start);
        assert_eq!(state.seconds_remaining, 12);
    }

    #[test]
    fn test_start_with_no_active_questions_is_noop() {
        let state = two_question_state()
            .apply(Action::SetDifficulty(DifficultyFilter::Medium))
            .apply(Action::Start);
        assert_eq!(state.status, Status::Ready);
    }

    #[test]
    fn test_start_only_from_ready() {
        let state = QuizState::default().apply(Action::Start);
        assert_eq!(state.status, Status::Loading);
    }

    #[test]
    fn test_tick_finishes_after_zero_is_observed() {
        let mut state = two_question_state().apply(Action::Start);
        state.seconds_remaining = 1;

        let state = state.apply(Action::Tick);
        assert_eq!(state.seconds_remaining, 0);
        assert_eq!(state.status, Status::Active);

        let state = state.apply(Action::Tick);
        assert_eq!(state.seconds_remaining, 0);
        assert_eq!(state.status, Status::Finished);
    }

    #[test]
    fn test_tick_outside_active_is_noop() {
        let state = two_question_state().apply(Action::Tick);
        assert_eq!(state.seconds_remaining, 0);
        assert_eq!(state.status, Status::Ready);
    }

    #[test]
    fn test_timeout_does_not_touch_high_score() {
        let mut state = two_question_state()
            .apply(Action::Start)
            .apply(Action::AnswerSubmitted(0));
        state.seconds_remaining = 0;
        let state = state.apply(Action::Tick);
        assert_eq!(state.status, Status::Finished);
        assert_eq!(state.high_score, 0);
    }

    #[test]
    fn test_finish_keeps_higher_previous_high_score() {
        let state = QuizState::new(100, SECS_PER_QUESTION)
            .apply(Action::QuestionsLoaded(vec![question(0, 10, Difficulty::Easy)]))
            .apply(Action::Start)
            .apply(Action::AnswerSubmitted(0))
            .apply(Action::Finish);
        assert_eq!(state.high_score, 100);
    }

    #[test]
    fn test_finish_only_from_active() {
        let state = two_question_state().apply(Action::Finish);
        assert_eq!(state.status, Status::Ready);
    }

    #[test]
    fn test_restart_resets_progress_and_keeps_selection() {
        let before = mixed_state()
            .apply(Action::SetDifficulty(DifficultyFilter::Easy))
            .apply(Action::Start)
            .apply(Action::AnswerSubmitted(0))
            .apply(Action::AdvanceQuestion)
            .apply(Action::Finish);
        let after = before.clone().apply(Action::Restart);

        assert_eq!(after.status, Status::Ready);
        assert_eq!(after.score, 0);
        assert_eq!(after.current_index, 0);
        assert_eq!(after.current_answer, None);
        assert_eq!(after.seconds_remaining, 0);
        assert_eq!(after.high_score, before.high_score);
        assert_eq!(after.all_questions, before.all_questions);
        assert_eq!(after.active_questions, before.active_questions);
        assert_eq!(after.difficulty_filter, DifficultyFilter::Easy);
    }

    #[test]
    fn test_restart_from_loading_goes_ready() {
        let state = QuizState::default().apply(Action::Restart);
        assert_eq!(state.status, Status::Ready);
        assert!(state.active_questions.is_empty());
    }

    #[test]
    fn test_set_difficulty_filters_and_round_trips() {
        let state = mixed_state().apply(Action::SetDifficulty(DifficultyFilter::Easy));
        assert_eq!(state.difficulty_filter, DifficultyFilter::Easy);
        assert_eq!(state.num_questions(), 2);
        assert!(state.active_questions.iter().all(|q| q.difficulty == Difficulty::Easy));
        assert_eq!(state.max_possible_points(), 20);

        let state = state.apply(Action::SetDifficulty(DifficultyFilter::All));
        assert_eq!(state.active_questions, state.all_questions);
    }

    #[test]
    fn test_set_difficulty_ignored_while_active() {
        let state = mixed_state()
            .apply(Action::Start)
            .apply(Action::SetDifficulty(DifficultyFilter::Hard));
        assert_eq!(state.difficulty_filter, DifficultyFilter::All);
        assert_eq!(state.num_questions(), 4);
    }

    #[test]
    fn test_set_difficulty_ignored_after_finish() {
        let mut state = mixed_state().apply(Action::Start);
        loop {
            let correct = state.current_question().map(|q| q.correct_option).unwrap();
            state = state.apply(Action::AnswerSubmitted(correct));
            if state.is_last_question() {
                break;
            }
            state = state.apply(Action::AdvanceQuestion);
        }
        let state = state
            .apply(Action::Finish)
            .apply(Action::SetDifficulty(DifficultyFilter::Easy));
        assert_eq!(state.status, Status::Finished);
        assert_eq!(state.difficulty_filter, DifficultyFilter::All);
        assert_eq!(state.score, 70);
        assert!(state.score <= state.max_possible_points());

        let state = state
            .apply(Action::Restart)
            .apply(Action::SetDifficulty(DifficultyFilter::Easy));
        assert_eq!(state.difficulty_filter, DifficultyFilter::Easy);
        assert_eq!(state.max_possible_points(), 20);
    }

    #[test]
    fn test_start_saturates_huge_time_budget() {
        let state = QuizState::new(0, u32::MAX)
            .apply(Action::QuestionsLoaded(vec![
                question(0, 10, Difficulty::Easy),
                question(1, 10, Difficulty::Easy),
            ]))
            .apply(Action::Start);
        assert_eq!(state.status, Status::Active);
        assert_eq!(state.seconds_remaining, u32::MAX);
    }

    #[test]
    fn test_score_never_exceeds_max_for_answer_spam() {
        let mut state = mixed_state().apply(Action::Start);
        for _ in 0..10 {
            let correct = state.current_question().map(|q| q.correct_option).unwrap();
            for _ in 0..3 {
                state = state.apply(Action::AnswerSubmitted(correct));
            }
            state = state.apply(Action::AdvanceQuestion);
            assert!(state.score <= state.max_possible_points());
        }
        assert_eq!(state.score, state.max_possible_points());
    }
}
