pub mod finish_screen;
pub mod progress_bar;
pub mod question_view;
pub mod start_screen;
pub mod timer;
