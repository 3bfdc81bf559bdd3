//! Free-text survey parsing.
//!
//! Brace-delimited text goes through the quasi-structured reader in [`quasi`];
//! everything else is read line by line in [`lines`]. Neither path fails: a
//! brace-shaped submission that does not follow the quasi grammar comes back as
//! [`ParseOutcome::Degraded`] with no answers, leaving the guardrail to reject it.

mod lines;
mod quasi;

pub use quasi::{Found, QuasiParseError};

use super::answers::AnswerMap;

/// Result of parsing one survey text.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseOutcome {
    /// Brace-delimited text parsed by the quasi-structured reader.
    Structured(AnswerMap),
    /// `key: value` lines.
    Lines(AnswerMap),
    /// Brace-delimited text that violated the quasi grammar; no fields recognized.
    Degraded(QuasiParseError),
}

impl ParseOutcome {
    pub fn answers(&self) -> Option<&AnswerMap> {
        match self {
            ParseOutcome::Structured(answers) | ParseOutcome::Lines(answers) => Some(answers),
            ParseOutcome::Degraded(_) => None,
        }
    }

    pub fn into_answers(self) -> AnswerMap {
        match self {
            ParseOutcome::Structured(answers) | ParseOutcome::Lines(answers) => answers,
            ParseOutcome::Degraded(_) => AnswerMap::new(),
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, ParseOutcome::Degraded(_))
    }

    pub fn strategy_label(&self) -> &'static str {
        match self {
            ParseOutcome::Structured(_) => "structured",
            ParseOutcome::Lines(_) => "lines",
            ParseOutcome::Degraded(_) => "degraded",
        }
    }
}

/// Parses raw survey text into answers, picking the strategy from the text's shape.
pub fn parse_survey_text(raw: &str) -> ParseOutcome {
    let text = raw.trim();
    if text.starts_with('{') && text.ends_with('}') {
        match quasi::parse_quasi_object(text) {
            Ok(answers) => ParseOutcome::Structured(answers),
            Err(error) => {
                tracing::debug!(%error, "quasi-structured survey text degraded to empty answers");
                ParseOutcome::Degraded(error)
            }
        }
    } else {
        ParseOutcome::Lines(lines::parse_lines(text))
    }
}
