//! Shared utilities

pub mod config;
pub mod process;
pub mod words;

pub use config::{Config, Settings};
pub use process::{ProcessBuilder, ProcessError};
