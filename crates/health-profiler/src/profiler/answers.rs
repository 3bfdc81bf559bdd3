use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::parser::ParseOutcome;

/// Survey fields every submission is expected to answer, in reporting order.
pub const EXPECTED_FIELDS: [&str; 4] = ["age", "smoker", "exercise", "diet"];

pub const AGE: &str = "age";
pub const SMOKER: &str = "smoker";
pub const EXERCISE: &str = "exercise";
pub const DIET: &str = "diet";

pub fn is_expected_field(key: &str) -> bool {
    EXPECTED_FIELDS.contains(&key)
}

/// A single normalized answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Integer(i64),
    Boolean(bool),
    Text(String),
    Null,
    /// Caller-supplied value for a key outside the expected field set.
    Raw(serde_json::Value),
}

impl AnswerValue {
    pub fn is_truthy(&self) -> bool {
        match self {
            AnswerValue::Integer(value) => *value != 0,
            AnswerValue::Boolean(value) => *value,
            AnswerValue::Text(value) => !value.is_empty(),
            AnswerValue::Null => false,
            AnswerValue::Raw(value) => json_truthy(value),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            AnswerValue::Text(value) => Some(value.as_str()),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            AnswerValue::Integer(value) => Some(*value),
            _ => None,
        }
    }
}

impl fmt::Display for AnswerValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnswerValue::Integer(value) => write!(f, "{value}"),
            AnswerValue::Boolean(value) => write!(f, "{value}"),
            AnswerValue::Text(value) => f.write_str(value),
            AnswerValue::Null => f.write_str("null"),
            AnswerValue::Raw(value) => write!(f, "{value}"),
        }
    }
}

fn json_truthy(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Null => false,
        serde_json::Value::Bool(flag) => *flag,
        serde_json::Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        serde_json::Value::String(text) => !text.is_empty(),
        serde_json::Value::Array(_) | serde_json::Value::Object(_) => true,
    }
}

/// Normalized field-to-answer mapping extracted from one submission.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerMap {
    entries: BTreeMap<String, AnswerValue>,
}

impl AnswerMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an answer; a repeated key replaces the earlier value.
    pub fn insert(&mut self, key: impl Into<String>, value: AnswerValue) {
        self.entries.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&AnswerValue> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AnswerValue)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Expected fields absent from the map, in `EXPECTED_FIELDS` order.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        EXPECTED_FIELDS
            .iter()
            .copied()
            .filter(|field| !self.contains_key(field))
            .collect()
    }

    /// Renders the map back into `key: value` survey lines.
    pub fn to_survey_text(&self) -> String {
        self.iter()
            .map(|(key, value)| format!("{key}: {value}"))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl FromIterator<(String, AnswerValue)> for AnswerMap {
    fn from_iter<I: IntoIterator<Item = (String, AnswerValue)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Answers tagged by provenance.
#[derive(Debug, Clone, PartialEq)]
pub enum SurveyAnswers {
    /// Structured answers supplied by the caller and type-checked at intake.
    Trusted(AnswerMap),
    /// Answers recovered from free text or an extracted image.
    Parsed(ParseOutcome),
}

impl SurveyAnswers {
    pub fn source_label(&self) -> &'static str {
        match self {
            SurveyAnswers::Trusted(_) => "trusted",
            SurveyAnswers::Parsed(outcome) => outcome.strategy_label(),
        }
    }

    pub fn into_answers(self) -> AnswerMap {
        match self {
            SurveyAnswers::Trusted(answers) => answers,
            SurveyAnswers::Parsed(outcome) => outcome.into_answers(),
        }
    }
}

/// Parses the leading integer of `raw`, tolerating trailing noise such as `"45 years"`.
pub(crate) fn leading_integer(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (sign, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (-1, &trimmed[1..]),
        Some(b'+') => (1, &trimmed[1..]),
        _ => (1, trimmed),
    };
    let end = digits
        .char_indices()
        .find(|(_, ch)| !ch.is_ascii_digit())
        .map(|(index, _)| index)
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    // Overlong digit runs saturate rather than read as unanswered.
    let value = digits[..end]
        .bytes()
        .fold(0i64, |acc, digit| {
            acc.saturating_mul(10).saturating_add(i64::from(digit - b'0'))
        });
    Some(if sign < 0 { value.saturating_neg() } else { value })
}

/// Applies the field typing shared by every text strategy.
pub(crate) fn coerce_text_answer(key: &str, value: &str) -> AnswerValue {
    match key {
        AGE => leading_integer(value)
            .map(AnswerValue::Integer)
            .unwrap_or(AnswerValue::Null),
        SMOKER => {
            let value = value.trim();
            AnswerValue::Boolean(
                value.eq_ignore_ascii_case("yes") || value.eq_ignore_ascii_case("true"),
            )
        }
        _ => AnswerValue::Text(value.to_string()),
    }
}
