use crate::profiler::answers::{coerce_text_answer, is_expected_field, AnswerMap};

/// Reads `key: value` lines, keeping only expected fields.
///
/// A line counts only when both sides of its first colon are non-empty. Keys and
/// values are trimmed and lowercased before typing.
pub(super) fn parse_lines(text: &str) -> AnswerMap {
    let mut answers = AnswerMap::new();

    for line in text.lines() {
        let Some((raw_key, raw_value)) = line.split_once(':') else {
            continue;
        };
        if raw_key.is_empty() || raw_value.is_empty() {
            continue;
        }

        let key = raw_key.trim().to_lowercase();
        if !is_expected_field(&key) {
            continue;
        }
        let value = raw_value.trim().to_lowercase();
        let answer = coerce_text_answer(&key, &value);
        answers.insert(key, answer);
    }

    answers
}
