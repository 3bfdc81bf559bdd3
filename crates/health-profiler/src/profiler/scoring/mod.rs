//! Rule-based risk scoring over normalized answers.

mod config;
mod rules;

pub use config::ScoringConfig;

use serde::{Deserialize, Serialize};

use super::answers::AnswerMap;

/// Named condition contributing to the risk score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskFactor {
    #[serde(rename = "smoking")]
    Smoking,
    #[serde(rename = "low_exercise")]
    LowExercise,
    #[serde(rename = "poor_diet")]
    PoorDiet,
    #[serde(rename = "age_over_50")]
    AgeOver50,
}

impl RiskFactor {
    pub fn label(&self) -> &'static str {
        match self {
            RiskFactor::Smoking => "smoking",
            RiskFactor::LowExercise => "low exercise",
            RiskFactor::PoorDiet => "poor diet",
            RiskFactor::AgeOver50 => "age over 50",
        }
    }
}

/// Coarse classification derived from the numeric score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

impl RiskTier {
    pub fn from_score(score: u32, config: &ScoringConfig) -> Self {
        if score >= config.high_tier_min {
            RiskTier::High
        } else if score >= config.medium_tier_min {
            RiskTier::Medium
        } else {
            RiskTier::Low
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RiskTier::Low => "low",
            RiskTier::Medium => "medium",
            RiskTier::High => "high",
        }
    }
}

/// Contribution of a single rule, kept for audit logging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub factor: RiskFactor,
    pub score: u32,
    pub notes: String,
}

/// Scorer output: matched factors in rule order, total score and tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub factors: Vec<RiskFactor>,
    pub score: u32,
    pub tier: RiskTier,
    pub components: Vec<ScoreComponent>,
}

/// Stateless scorer applying a rule table to answers.
#[derive(Debug, Clone)]
pub struct RiskScorer {
    config: ScoringConfig,
}

impl RiskScorer {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn assess(&self, answers: &AnswerMap) -> RiskAssessment {
        let (components, score) = rules::score_answers(answers, &self.config);
        let factors = components.iter().map(|component| component.factor).collect();
        let tier = RiskTier::from_score(score, &self.config);

        RiskAssessment {
            factors,
            score,
            tier,
            components,
        }
    }
}

impl Default for RiskScorer {
    fn default() -> Self {
        Self::new(ScoringConfig::standard())
    }
}
