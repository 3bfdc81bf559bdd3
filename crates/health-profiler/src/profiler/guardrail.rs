use serde::Serialize;

use super::answers::{AnswerMap, EXPECTED_FIELDS};

/// Completeness verdict for a set of answers.
#[derive(Debug, Clone, PartialEq)]
pub enum GuardrailResult {
    Accepted(AnswerMap),
    Rejected(GuardrailRejection),
}

/// Reason a submission was turned away before scoring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GuardrailRejection {
    pub reason: String,
    pub missing_fields: Vec<String>,
}

/// Rejects answer sets missing more than half of the expected fields.
///
/// Extra keys are passed through untouched on acceptance.
pub fn check_completeness(answers: AnswerMap) -> GuardrailResult {
    let missing = answers.missing_fields();

    if missing.len() as f64 > EXPECTED_FIELDS.len() as f64 / 2.0 {
        let reason = format!(
            "more than half of the expected fields are missing: {}",
            missing.join(", ")
        );
        return GuardrailResult::Rejected(GuardrailRejection {
            reason,
            missing_fields: missing.into_iter().map(str::to_string).collect(),
        });
    }

    GuardrailResult::Accepted(answers)
}
