use serde::{Deserialize, Serialize};

/// Weights and thresholds applied by the risk rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub smoking_weight: u32,
    pub low_exercise_weight: u32,
    pub low_exercise_answers: Vec<String>,
    pub poor_diet_weight: u32,
    pub poor_diet_answers: Vec<String>,
    pub age_weight: u32,
    /// Ages strictly above this value count as a risk factor.
    pub age_threshold: i64,
    pub medium_tier_min: u32,
    pub high_tier_min: u32,
}

impl ScoringConfig {
    /// Rule table used for classification; changing it changes tiers.
    pub fn standard() -> Self {
        Self {
            smoking_weight: 30,
            low_exercise_weight: 20,
            low_exercise_answers: vec!["rarely".to_string(), "never".to_string()],
            poor_diet_weight: 25,
            poor_diet_answers: vec!["high sugar".to_string(), "high fat".to_string()],
            age_weight: 10,
            age_threshold: 50,
            medium_tier_min: 25,
            high_tier_min: 50,
        }
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self::standard()
    }
}
