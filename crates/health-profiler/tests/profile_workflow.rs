//! End-to-end scenarios for survey profiling through the public service facade.

mod common {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use async_trait::async_trait;
    use health_profiler::profiler::{
        AdvisoryError, AdvisoryGenerator, ExtractionError, HealthProfiler, ImageUpload,
        ScoringConfig, TextExtractor,
    };

    pub(super) struct NoImages;

    #[async_trait]
    impl TextExtractor for NoImages {
        async fn extract_text(&self, _image: &ImageUpload) -> Result<String, ExtractionError> {
            Err(ExtractionError::Unavailable("no engine in tests".to_string()))
        }
    }

    #[derive(Default)]
    pub(super) struct CountingAdvisor {
        pub(super) calls: AtomicUsize,
    }

    #[async_trait]
    impl AdvisoryGenerator for CountingAdvisor {
        async fn generate(&self, prompt: &str) -> Result<String, AdvisoryError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            assert!(prompt.contains("non-diagnostic"));
            Ok("[\"Walk after lunch\", \"Cook one meal at home\", \"Plan a smoke-free day\"]"
                .to_string())
        }
    }

    impl CountingAdvisor {
        pub(super) fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    pub(super) fn profiler() -> (HealthProfiler<NoImages, CountingAdvisor>, Arc<CountingAdvisor>) {
        let advisor = Arc::new(CountingAdvisor::default());
        let service = HealthProfiler::new(
            Arc::new(NoImages),
            advisor.clone(),
            ScoringConfig::standard(),
        );
        (service, advisor)
    }
}

use common::profiler;
use health_profiler::profiler::{
    check_completeness, parse_survey_text, AnswerMap, AnswerValue, GuardrailResult, ProfileError,
    RiskFactor, RiskScorer, RiskTier, SurveySubmission, EXPECTED_FIELDS, HEALTHY_TIP,
};

#[tokio::test]
async fn every_risk_factor_present_scores_high() {
    let (service, advisor) = profiler();

    let profile = service
        .profile(SurveySubmission::from_text(
            "Age: 60\nSmoker: yes\nExercise: never\nDiet: high sugar",
        ))
        .await
        .expect("profile builds");

    assert_eq!(
        profile.factors,
        vec![
            RiskFactor::Smoking,
            RiskFactor::LowExercise,
            RiskFactor::PoorDiet,
            RiskFactor::AgeOver50
        ]
    );
    assert_eq!(profile.score, 85);
    assert_eq!(profile.tier, RiskTier::High);
    assert_eq!(profile.recommendations.len(), 3);
    assert_eq!(advisor.calls(), 1);

    let json = serde_json::to_value(&profile).expect("profile serializes");
    assert_eq!(json["tier"], "high");
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn two_answers_pass_the_guardrail() {
    let (service, advisor) = profiler();

    let profile = service
        .profile(SurveySubmission::from_text("Age: 30\nExercise: daily"))
        .await
        .expect("two missing is not more than half");

    assert_eq!(profile.score, 0);
    assert_eq!(profile.tier, RiskTier::Low);
    assert_eq!(profile.recommendations, vec![HEALTHY_TIP.to_string()]);
    assert_eq!(advisor.calls(), 0);
}

#[tokio::test]
async fn one_answer_is_rejected() {
    let (service, _) = profiler();

    let error = service
        .profile(SurveySubmission::from_text("Exercise: often"))
        .await
        .expect_err("three missing is more than half");

    match error {
        ProfileError::Incomplete(rejection) => {
            assert_eq!(rejection.missing_fields, vec!["age", "smoker", "diet"]);
            assert_eq!(
                rejection.reason,
                "more than half of the expected fields are missing: age, smoker, diet"
            );
        }
        other => panic!("expected rejection, got {other:?}"),
    }
}

#[test]
fn guardrail_accepts_any_complete_answer_set() {
    let samples = [
        AnswerValue::Null,
        AnswerValue::Integer(0),
        AnswerValue::Boolean(true),
        AnswerValue::Text("anything".to_string()),
    ];

    for sample in samples {
        let answers: AnswerMap = EXPECTED_FIELDS
            .iter()
            .map(|field| (field.to_string(), sample.clone()))
            .collect();
        assert!(matches!(
            check_completeness(answers),
            GuardrailResult::Accepted(_)
        ));
    }
}

#[test]
fn guardrail_lists_missing_fields_for_every_sparse_subset() {
    for present in 0..EXPECTED_FIELDS.len() {
        let answers: AnswerMap = [(EXPECTED_FIELDS[present].to_string(), AnswerValue::Null)]
            .into_iter()
            .collect();
        let expected: Vec<&str> = EXPECTED_FIELDS
            .iter()
            .copied()
            .filter(|field| *field != EXPECTED_FIELDS[present])
            .collect();

        match check_completeness(answers) {
            GuardrailResult::Rejected(rejection) => {
                assert_eq!(rejection.missing_fields, expected);
                assert!(rejection.reason.ends_with(&expected.join(", ")));
            }
            other => panic!("expected rejection when only {present} is present, got {other:?}"),
        }
    }
}

#[test]
fn line_parsing_is_idempotent_on_normalized_text() {
    let text = "age: 48\nsmoker: true\nexercise: weekly\ndiet: high fat";
    let first = parse_survey_text(text).into_answers();
    let second = parse_survey_text(&first.to_survey_text()).into_answers();

    assert_eq!(first, second);
}

#[test]
fn scorer_ignores_input_order() {
    let scorer = RiskScorer::default();
    let forward = parse_survey_text("smoker: yes\nexercise: rarely\ndiet: high fat\nage: 70").into_answers();
    let reversed = parse_survey_text("age: 70\ndiet: high fat\nexercise: rarely\nsmoker: yes").into_answers();

    let a = scorer.assess(&forward);
    let b = scorer.assess(&reversed);

    assert_eq!(a, b);
    assert_eq!(
        a.factors,
        vec![
            RiskFactor::Smoking,
            RiskFactor::LowExercise,
            RiskFactor::PoorDiet,
            RiskFactor::AgeOver50
        ]
    );
}

#[test]
fn malformed_quasi_structured_text_parses_to_nothing() {
    let outcome = parse_survey_text("{age: 45, smoker yes}");

    assert!(outcome.is_degraded());
    assert!(outcome.into_answers().is_empty());
}

#[tokio::test]
async fn numeric_json_ages_over_fifty_count_as_risk() {
    for age in [serde_json::json!(60.0), serde_json::json!(75.5), serde_json::json!("75.5")] {
        let (service, _) = profiler();

        let profile = service
            .profile(SurveySubmission::from_answers(serde_json::json!({
                "age": age,
                "smoker": false,
                "exercise": "daily",
                "diet": "balanced"
            })))
            .await
            .expect("profile builds");

        assert_eq!(profile.factors, vec![RiskFactor::AgeOver50], "age {age}");
        assert_eq!(profile.score, 10);
    }
}

#[tokio::test]
async fn capitalized_smoker_answer_in_braced_text_counts() {
    let (service, _) = profiler();

    let profile = service
        .profile(SurveySubmission::from_text(
            "{age: 60, smoker: Yes, exercise: daily, diet: balanced}",
        ))
        .await
        .expect("profile builds");

    assert_eq!(
        profile.factors,
        vec![RiskFactor::Smoking, RiskFactor::AgeOver50]
    );
    assert_eq!(profile.score, 40);
    assert_eq!(profile.tier, RiskTier::Medium);
}
