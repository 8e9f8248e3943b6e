pub mod action;
pub mod machine;
pub mod question;
pub mod state;

pub use action::{Action, QuizError};
pub use machine::QuizMachine;
pub use question::{Difficulty, DifficultyFilter, Question};
pub use state::{QuizState, Status};
