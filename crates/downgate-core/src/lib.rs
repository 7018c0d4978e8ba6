pub mod config;
pub mod logging;

pub mod checker;
pub mod control;
pub mod download;
pub mod filename;
pub mod prompt;
pub mod reserve;
pub mod target;
pub mod verdict;
