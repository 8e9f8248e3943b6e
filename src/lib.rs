//! Terminal trivia quiz. The binary in `main.rs` owns the terminal; this
//! library holds everything it drives so tests can reach it as `quizr::*`.

pub mod app;
pub mod config;
pub mod event;
pub mod quiz;
pub mod replay;
pub mod source;
pub mod store;
pub mod ui;
