use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::answers::SurveyAnswers;
use super::collaborators::{AdvisoryGenerator, TextExtractor};
use super::guardrail::{check_completeness, GuardrailRejection, GuardrailResult};
use super::intake::{self, IntakeError, NormalizedInput, SurveySubmission};
use super::parser::parse_survey_text;
use super::recommendations::RecommendationAdapter;
use super::scoring::{RiskFactor, RiskScorer, RiskTier, ScoringConfig};

/// Final result returned for an accepted submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskProfile {
    pub tier: RiskTier,
    pub factors: Vec<RiskFactor>,
    pub score: u32,
    pub recommendations: Vec<String>,
    pub status: ProfileStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileStatus {
    Ok,
}

/// Service running a submission through intake, parsing, guardrail, scoring and advice.
pub struct HealthProfiler<E: ?Sized, G: ?Sized> {
    extractor: Arc<E>,
    advisor: RecommendationAdapter<G>,
    scorer: RiskScorer,
}

impl<E, G> HealthProfiler<E, G>
where
    E: TextExtractor + ?Sized + 'static,
    G: AdvisoryGenerator + ?Sized + 'static,
{
    pub fn new(extractor: Arc<E>, generator: Arc<G>, config: ScoringConfig) -> Self {
        Self {
            extractor,
            advisor: RecommendationAdapter::new(generator),
            scorer: RiskScorer::new(config),
        }
    }

    /// Classify and profile a raw submission.
    pub async fn profile(&self, submission: SurveySubmission) -> Result<RiskProfile, ProfileError> {
        let survey = match intake::normalize(submission, self.extractor.as_ref()).await? {
            NormalizedInput::Answers(answers) => SurveyAnswers::Trusted(answers),
            NormalizedInput::Text(text) => SurveyAnswers::Parsed(parse_survey_text(&text)),
        };
        self.profile_answers(survey).await
    }

    /// Profile answers that have already been classified.
    pub async fn profile_answers(&self, survey: SurveyAnswers) -> Result<RiskProfile, ProfileError> {
        let source = survey.source_label();
        let answers = survey.into_answers();
        tracing::info!(source, fields = answers.len(), "survey answers normalized");

        let answers = match check_completeness(answers) {
            GuardrailResult::Accepted(answers) => answers,
            GuardrailResult::Rejected(rejection) => {
                tracing::info!(
                    missing = %rejection.missing_fields.join(","),
                    "survey rejected by completeness guardrail"
                );
                return Err(ProfileError::Incomplete(rejection));
            }
        };

        let assessment = self.scorer.assess(&answers);
        tracing::info!(
            score = assessment.score,
            tier = assessment.tier.label(),
            factors = assessment.factors.len(),
            "risk assessed"
        );
        for component in &assessment.components {
            tracing::debug!(factor = component.factor.label(), score = component.score, notes = %component.notes);
        }

        let recommendations = self.advisor.recommend(&assessment.factors).await;

        Ok(RiskProfile {
            tier: assessment.tier,
            factors: assessment.factors,
            score: assessment.score,
            recommendations,
            status: ProfileStatus::Ok,
        })
    }
}

/// Failures the caller sees; everything else degrades to a fallback.
#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error(transparent)]
    Intake(#[from] IntakeError),
    #[error("{}", .0.reason)]
    Incomplete(GuardrailRejection),
}
