//! Reader for brace-delimited survey text with unquoted identifiers, e.g.
//! `{age: 45, smoker: yes, diet: "high fat"}`.
//!
//! Grammar:
//!
//! ```text
//! object := '{' [ member ( ',' member )* ] '}'
//! member := atom ':' atom
//! atom   := word | quoted
//! word   := [A-Za-z0-9_]+
//! quoted := '"' [^"\\\n]* '"'
//! ```
//!
//! Whitespace may separate tokens. Nesting, escapes and trailing commas are not
//! part of the grammar. Keys and values are taken as written, without case folding.

use std::fmt;

use crate::profiler::answers::{coerce_text_answer, is_expected_field, AnswerMap};

/// Grammar violation in quasi-structured text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("expected {expected} at offset {offset}, found {found}")]
pub struct QuasiParseError {
    pub offset: usize,
    pub expected: &'static str,
    pub found: Found,
}

/// What the reader encountered where the grammar demanded something else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Found {
    Char(char),
    End,
}

impl fmt::Display for Found {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Found::Char(ch) => write!(f, "{ch:?}"),
            Found::End => f.write_str("end of input"),
        }
    }
}

pub(super) fn parse_quasi_object(text: &str) -> Result<AnswerMap, QuasiParseError> {
    let mut reader = Reader::new(text);
    let mut answers = AnswerMap::new();

    reader.expect('{', "'{'")?;
    reader.skip_whitespace();

    if reader.peek() != Some('}') {
        loop {
            let key = reader.atom("a key")?;
            reader.skip_whitespace();
            reader.expect(':', "':' after key")?;
            reader.skip_whitespace();
            let value = reader.atom("a value")?;
            reader.skip_whitespace();

            if is_expected_field(key) {
                answers.insert(key, coerce_text_answer(key, value.trim()));
            }

            match reader.peek() {
                Some(',') => {
                    reader.bump();
                    reader.skip_whitespace();
                }
                _ => break,
            }
        }
    }

    reader.expect('}', "',' or '}'")?;
    reader.skip_whitespace();
    match reader.peek() {
        None => Ok(answers),
        Some(other) => Err(reader.error("end of input", Found::Char(other))),
    }
}

struct Reader<'a> {
    text: &'a str,
    offset: usize,
}

impl<'a> Reader<'a> {
    fn new(text: &'a str) -> Self {
        Self { text, offset: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.text[self.offset..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.offset += ch.len_utf8();
        Some(ch)
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn found(&self) -> Found {
        self.peek().map(Found::Char).unwrap_or(Found::End)
    }

    fn error(&self, expected: &'static str, found: Found) -> QuasiParseError {
        QuasiParseError {
            offset: self.offset,
            expected,
            found,
        }
    }

    fn expect(&mut self, wanted: char, expected: &'static str) -> Result<(), QuasiParseError> {
        if self.peek() == Some(wanted) {
            self.bump();
            Ok(())
        } else {
            Err(self.error(expected, self.found()))
        }
    }

    fn atom(&mut self, expected: &'static str) -> Result<&'a str, QuasiParseError> {
        match self.peek() {
            Some('"') => self.quoted(),
            Some(ch) if is_word_char(ch) => Ok(self.word()),
            _ => Err(self.error(expected, self.found())),
        }
    }

    fn word(&mut self) -> &'a str {
        let text = self.text;
        let start = self.offset;
        while self.peek().is_some_and(is_word_char) {
            self.bump();
        }
        &text[start..self.offset]
    }

    fn quoted(&mut self) -> Result<&'a str, QuasiParseError> {
        let text = self.text;
        self.bump();
        let start = self.offset;
        loop {
            match self.peek() {
                Some('"') => {
                    let value = &text[start..self.offset];
                    self.bump();
                    return Ok(value);
                }
                Some('\\') | Some('\n') | None => {
                    return Err(self.error("closing '\"'", self.found()));
                }
                Some(_) => {
                    self.bump();
                }
            }
        }
    }
}

fn is_word_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}
