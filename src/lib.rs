//! Command line pomodoro application. Work is split into poms that get estimated, started and
//! finished. At the end of a day finished poms are archived together with how far off the
//! estimates were.
//!

pub mod cli;
pub mod engine;
pub mod error;
pub mod fs;
pub mod storage;
pub mod tracker;
pub mod utils;
