//! Survey profiling pipeline: intake, parsing, completeness guardrail, scoring
//! and recommendations.

pub mod answers;
pub mod collaborators;
pub mod guardrail;
pub mod intake;
pub mod parser;
pub mod recommendations;
pub mod router;
pub mod scoring;
pub mod service;

#[cfg(test)]
mod tests;

pub use answers::{AnswerMap, AnswerValue, SurveyAnswers, EXPECTED_FIELDS};
pub use collaborators::{
    AdvisoryError, AdvisoryGenerator, ExtractionError, GeminiClient, GeminiSettings, ImageUpload,
    OfflineAdvisor, TesseractCli, TextExtractor,
};
pub use guardrail::{check_completeness, GuardrailRejection, GuardrailResult};
pub use intake::{normalize, IntakeError, NormalizedInput, SurveySubmission};
pub use parser::{parse_survey_text, ParseOutcome, QuasiParseError};
pub use recommendations::{RecommendationAdapter, FALLBACK_TIP, HEALTHY_TIP};
pub use router::profile_router;
pub use scoring::{RiskAssessment, RiskFactor, RiskScorer, RiskTier, ScoreComponent, ScoringConfig};
pub use service::{HealthProfiler, ProfileError, ProfileStatus, RiskProfile};
