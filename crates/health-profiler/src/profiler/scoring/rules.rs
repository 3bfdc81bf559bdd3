use super::super::answers::{AnswerMap, AGE, DIET, EXERCISE, SMOKER};
use super::config::ScoringConfig;
use super::{RiskFactor, ScoreComponent};

pub(crate) fn score_answers(answers: &AnswerMap, config: &ScoringConfig) -> (Vec<ScoreComponent>, u32) {
    let mut components = Vec::new();
    let mut total_score: u32 = 0;

    if answers.get(SMOKER).is_some_and(|value| value.is_truthy()) {
        components.push(ScoreComponent {
            factor: RiskFactor::Smoking,
            score: config.smoking_weight,
            notes: "reports smoking".to_string(),
        });
        total_score = total_score.saturating_add(config.smoking_weight);
    }

    if let Some(exercise) = answers.get(EXERCISE).and_then(|value| value.as_text()) {
        if matches_any(exercise, &config.low_exercise_answers) {
            components.push(ScoreComponent {
                factor: RiskFactor::LowExercise,
                score: config.low_exercise_weight,
                notes: format!("exercises {exercise}"),
            });
            total_score = total_score.saturating_add(config.low_exercise_weight);
        }
    }

    if let Some(diet) = answers.get(DIET).and_then(|value| value.as_text()) {
        if matches_any(diet, &config.poor_diet_answers) {
            components.push(ScoreComponent {
                factor: RiskFactor::PoorDiet,
                score: config.poor_diet_weight,
                notes: format!("{diet} diet"),
            });
            total_score = total_score.saturating_add(config.poor_diet_weight);
        }
    }

    if let Some(age) = answers.get(AGE).and_then(|value| value.as_integer()) {
        if age > config.age_threshold {
            components.push(ScoreComponent {
                factor: RiskFactor::AgeOver50,
                score: config.age_weight,
                notes: format!("age {age} above {}", config.age_threshold),
            });
            total_score = total_score.saturating_add(config.age_weight);
        }
    }

    (components, total_score)
}

fn matches_any(answer: &str, candidates: &[String]) -> bool {
    candidates.iter().any(|candidate| candidate == answer)
}
