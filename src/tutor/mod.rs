//! Tutor prompt layer: grade levels, subjects and prompt composition.
//!
//! - **guidance**: immutable directive tables loaded once at startup.
//! - **prompt**: pure composition of the system + user messages.
//!
//! Levels and subjects are closed enumerations. Input is normalised before
//! lookup (levels uppercased, subjects lowercased) and the normalised text is
//! what appears in error messages.

mod guidance;
mod prompt;

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

pub use guidance::{Guidance, SYSTEM_DIRECTIVE};
pub use prompt::{ComposedPrompt, build};

// ── Error ─────────────────────────────────────────────────────────────────────

/// Validation failures. The display text is the child-facing French message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PromptError {
    #[error("Niveau '{0}' non reconnu.")]
    UnknownLevel(String),
    #[error("Matière '{0}' non reconnue.")]
    UnknownSubject(String),
}

// ── Level ─────────────────────────────────────────────────────────────────────

/// French primary-school grade, CP through CM2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Level {
    Cp,
    Ce1,
    Ce2,
    Cm1,
    Cm2,
}

impl Level {
    pub const ALL: [Level; 5] = [Level::Cp, Level::Ce1, Level::Ce2, Level::Cm1, Level::Cm2];

    pub fn label(self) -> &'static str {
        match self {
            Level::Cp => "CP",
            Level::Ce1 => "CE1",
            Level::Ce2 => "CE2",
            Level::Cm1 => "CM1",
            Level::Cm2 => "CM2",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl FromStr for Level {
    type Err = PromptError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalised = raw.to_uppercase();
        Level::ALL
            .into_iter()
            .find(|l| l.label() == normalised)
            .ok_or(PromptError::UnknownLevel(normalised))
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ── Subject ───────────────────────────────────────────────────────────────────

/// Teaching domain; selects the tutor persona.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Subject {
    Maths,
    Histoire,
    Culture,
}

impl Subject {
    pub const ALL: [Subject; 3] = [Subject::Maths, Subject::Histoire, Subject::Culture];

    pub fn label(self) -> &'static str {
        match self {
            Subject::Maths => "maths",
            Subject::Histoire => "histoire",
            Subject::Culture => "culture",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl FromStr for Subject {
    type Err = PromptError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalised = raw.to_lowercase();
        Subject::ALL
            .into_iter()
            .find(|s| s.label() == normalised)
            .ok_or(PromptError::UnknownSubject(normalised))
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
