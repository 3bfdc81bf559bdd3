use serde_json::Value;

use super::answers::{
    coerce_text_answer, leading_integer, AnswerMap, AnswerValue, AGE, DIET, EXERCISE, SMOKER,
};
use super::collaborators::{ImageUpload, TextExtractor};

/// Incoming payload before classification; at most one shape is used.
#[derive(Debug, Clone, Default)]
pub struct SurveySubmission {
    pub answers: Option<Value>,
    pub text: Option<String>,
    pub image: Option<ImageUpload>,
}

impl SurveySubmission {
    pub fn from_answers(answers: Value) -> Self {
        Self {
            answers: Some(answers),
            ..Self::default()
        }
    }

    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    pub fn from_image(image: ImageUpload) -> Self {
        Self {
            image: Some(image),
            ..Self::default()
        }
    }
}

/// Classified submission: typed answers, or text awaiting the parser.
#[derive(Debug, Clone, PartialEq)]
pub enum NormalizedInput {
    Answers(AnswerMap),
    Text(String),
}

/// Intake failures reported to the caller.
#[derive(Debug, thiserror::Error)]
pub enum IntakeError {
    #[error("Please provide survey data.")]
    MissingInput,
    #[error("invalid survey answers: {0}")]
    InvalidAnswers(String),
    #[error("{0}")]
    TextExtractionFailed(String),
}

/// Classifies a submission. Structured answers win over text, text over images.
pub async fn normalize<E>(
    submission: SurveySubmission,
    extractor: &E,
) -> Result<NormalizedInput, IntakeError>
where
    E: TextExtractor + ?Sized,
{
    let SurveySubmission {
        answers,
        text,
        image,
    } = submission;

    if let Some(answers) = answers {
        tracing::debug!("survey input classified as structured answers");
        return typed_answers(answers).map(NormalizedInput::Answers);
    }

    if let Some(text) = text.filter(|text| !text.is_empty()) {
        tracing::debug!(text_len = text.len(), "survey input classified as text");
        return Ok(NormalizedInput::Text(text));
    }

    if let Some(image) = image {
        tracing::debug!(image_bytes = image.bytes.len(), "survey input classified as image");
        let text = extractor
            .extract_text(&image)
            .await
            .map_err(|error| IntakeError::TextExtractionFailed(error.to_string()))?;
        return Ok(NormalizedInput::Text(text.trim().to_string()));
    }

    Err(IntakeError::MissingInput)
}

/// Type-checks caller-supplied answers with the same rules applied to parsed text.
///
/// Keys outside the expected set are carried as [`AnswerValue::Raw`].
pub fn typed_answers(answers: Value) -> Result<AnswerMap, IntakeError> {
    let Value::Object(fields) = answers else {
        return Err(IntakeError::InvalidAnswers(
            "answers must be a JSON object".to_string(),
        ));
    };

    let mut typed = AnswerMap::new();
    for (key, value) in fields {
        let answer = match key.as_str() {
            AGE => typed_age(value)?,
            SMOKER => typed_smoker(value)?,
            EXERCISE | DIET => typed_text(&key, value)?,
            _ => AnswerValue::Raw(value),
        };
        typed.insert(key, answer);
    }
    Ok(typed)
}

fn typed_age(value: Value) -> Result<AnswerValue, IntakeError> {
    match value {
        Value::Null => Ok(AnswerValue::Null),
        Value::Number(number) => Ok(whole_years(&number)
            .map(AnswerValue::Integer)
            .unwrap_or(AnswerValue::Null)),
        Value::String(raw) => Ok(leading_integer(&raw)
            .map(AnswerValue::Integer)
            .unwrap_or(AnswerValue::Null)),
        other => Err(mismatch(AGE, "a number or numeric string", &other)),
    }
}

/// Truncates fractional ages toward zero, matching the leading-integer read of text answers.
fn whole_years(number: &serde_json::Number) -> Option<i64> {
    number.as_i64().or_else(|| {
        number
            .as_f64()
            .filter(|value| value.is_finite())
            .map(|value| value.trunc() as i64)
    })
}

fn typed_smoker(value: Value) -> Result<AnswerValue, IntakeError> {
    match value {
        Value::Null => Ok(AnswerValue::Null),
        Value::Bool(flag) => Ok(AnswerValue::Boolean(flag)),
        Value::String(raw) => Ok(coerce_text_answer(SMOKER, &raw.trim().to_lowercase())),
        other => Err(mismatch(SMOKER, "a boolean or yes/no string", &other)),
    }
}

fn typed_text(key: &str, value: Value) -> Result<AnswerValue, IntakeError> {
    match value {
        Value::Null => Ok(AnswerValue::Null),
        Value::String(raw) => Ok(AnswerValue::Text(raw.trim().to_lowercase())),
        other => Err(mismatch(key, "a string", &other)),
    }
}

fn mismatch(key: &str, expected: &str, found: &Value) -> IntakeError {
    let kind = match found {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    };
    IntakeError::InvalidAnswers(format!("'{key}' must be {expected}, got {kind}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profiler::collaborators::ExtractionError;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FakeExtractor {
        result: Result<&'static str, &'static str>,
        calls: AtomicUsize,
    }

    impl FakeExtractor {
        fn new(result: Result<&'static str, &'static str>) -> Self {
            Self {
                result,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl TextExtractor for FakeExtractor {
        async fn extract_text(&self, _image: &ImageUpload) -> Result<String, ExtractionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.result
                .map(str::to_string)
                .map_err(|message| ExtractionError::Unavailable(message.to_string()))
        }
    }

    #[tokio::test]
    async fn structured_answers_take_precedence() {
        let extractor = FakeExtractor::new(Ok("age: 1"));
        let submission = SurveySubmission {
            answers: Some(json!({ "age": 44 })),
            text: Some("age: 70".to_string()),
            image: Some(ImageUpload::new(vec![1, 2, 3])),
        };

        let normalized = normalize(submission, &extractor).await.expect("normalizes");

        let NormalizedInput::Answers(answers) = normalized else {
            panic!("expected answers, got {normalized:?}");
        };
        assert_eq!(answers.get("age"), Some(&AnswerValue::Integer(44)));
        assert_eq!(extractor.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn text_passes_through_unchanged() {
        let extractor = FakeExtractor::new(Ok("unused"));

        let normalized = normalize(SurveySubmission::from_text("  Age: 30\n"), &extractor)
            .await
            .expect("normalizes");

        assert_eq!(normalized, NormalizedInput::Text("  Age: 30\n".to_string()));
    }

    #[tokio::test]
    async fn empty_text_falls_through_to_image() {
        let extractor = FakeExtractor::new(Ok("\n Smoker: yes \n"));
        let submission = SurveySubmission {
            text: Some(String::new()),
            image: Some(ImageUpload::new(vec![0xff, 0xd8])),
            ..SurveySubmission::default()
        };

        let normalized = normalize(submission, &extractor).await.expect("normalizes");

        assert_eq!(normalized, NormalizedInput::Text("Smoker: yes".to_string()));
        assert_eq!(extractor.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn extraction_failure_surfaces_engine_message() {
        let extractor = FakeExtractor::new(Err("engine crashed"));

        let error = normalize(SurveySubmission::from_image(ImageUpload::new(vec![0])), &extractor)
            .await
            .expect_err("extraction fails");

        match error {
            IntakeError::TextExtractionFailed(message) => {
                assert!(message.contains("engine crashed"))
            }
            other => panic!("expected extraction failure, got {other:?}"),
        }
        assert_eq!(extractor.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn nothing_usable_is_missing_input() {
        let extractor = FakeExtractor::new(Ok("unused"));

        let error = normalize(SurveySubmission::default(), &extractor)
            .await
            .expect_err("no payload");

        assert!(matches!(error, IntakeError::MissingInput));
    }

    #[test]
    fn typed_answers_apply_text_coercions() {
        let answers = typed_answers(json!({
            "age": "61",
            "smoker": " Yes ",
            "exercise": "  Rarely",
            "diet": null,
            "bmi": 31.2
        }))
        .expect("answers type-check");

        assert_eq!(answers.get("age"), Some(&AnswerValue::Integer(61)));
        assert_eq!(answers.get("smoker"), Some(&AnswerValue::Boolean(true)));
        assert_eq!(answers.get("exercise").and_then(AnswerValue::as_text), Some("rarely"));
        assert_eq!(answers.get("diet"), Some(&AnswerValue::Null));
        assert_eq!(answers.get("bmi"), Some(&AnswerValue::Raw(json!(31.2))));
    }

    #[test]
    fn typed_answers_reject_mismatched_types() {
        let error = typed_answers(json!({ "smoker": 1 })).expect_err("number smoker");
        assert_eq!(
            error.to_string(),
            "invalid survey answers: 'smoker' must be a boolean or yes/no string, got a number"
        );

        assert!(typed_answers(json!({ "exercise": ["daily"] })).is_err());
        assert!(typed_answers(json!({ "age": true })).is_err());
        assert!(typed_answers(json!(["age", 40])).is_err());
    }

    #[test]
    fn fractional_age_truncates_like_text_answers() {
        let answers = typed_answers(json!({ "age": 52.5 })).expect("answers type-check");
        assert_eq!(answers.get("age"), Some(&AnswerValue::Integer(52)));

        let answers = typed_answers(json!({ "age": 60.0 })).expect("answers type-check");
        assert_eq!(answers.get("age"), Some(&AnswerValue::Integer(60)));

        let from_text = typed_answers(json!({ "age": "75.5" })).expect("answers type-check");
        let from_number = typed_answers(json!({ "age": 75.5 })).expect("answers type-check");
        assert_eq!(from_text.get("age"), from_number.get("age"));
    }

    #[test]
    fn huge_numeric_age_saturates() {
        let answers = typed_answers(json!({ "age": 1e20 })).expect("answers type-check");

        assert_eq!(answers.get("age"), Some(&AnswerValue::Integer(i64::MAX)));
    }
}
