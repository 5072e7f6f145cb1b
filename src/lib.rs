use std::fmt;

pub mod builder;
pub mod engine;
pub mod match_data;
pub mod regex;
pub mod util;

pub use builder::Builder;
pub use engine::{CaptureColumns, Config, DefaultEngine, Engine};
pub use match_data::{Key, MatchData, MatchDataError};
pub use crate::regex::{Matched, Regex};

/// The engine failed to compile a pattern. This is never reported as a
/// failed match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileError(String);

impl CompileError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }

    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl core::error::Error for CompileError {}

/// Compiles a delimited pattern (e.g. `~^foo$~i`) with the default engine,
/// returning the underlying `regex::Regex`.
pub fn compile(pattern: &str) -> Result<::regex::Regex, CompileError> {
    engine::compile_delimited(pattern)
}
