use std::sync::Arc;

use super::collaborators::AdvisoryGenerator;
use super::scoring::RiskFactor;

pub const HEALTHY_TIP: &str = "maintain your healthy lifestyle habits";
pub const FALLBACK_TIP: &str = "focus on a balanced diet and regular exercise";

const TIP_COUNT: usize = 3;

/// Turns risk factors into advisory tips through an external generator.
///
/// Generator failures never escape: any unusable response yields [`FALLBACK_TIP`].
pub struct RecommendationAdapter<G: ?Sized> {
    generator: Arc<G>,
}

impl<G> RecommendationAdapter<G>
where
    G: AdvisoryGenerator + ?Sized,
{
    pub fn new(generator: Arc<G>) -> Self {
        Self { generator }
    }

    pub async fn recommend(&self, factors: &[RiskFactor]) -> Vec<String> {
        if factors.is_empty() {
            return vec![HEALTHY_TIP.to_string()];
        }

        let prompt = advisory_prompt(factors);
        match self.generator.generate(&prompt).await {
            Ok(response) => match parse_tips(&response) {
                Some(tips) => tips,
                None => {
                    tracing::warn!(
                        response_len = response.len(),
                        "advisory response was not a list of three tips; using fallback"
                    );
                    vec![FALLBACK_TIP.to_string()]
                }
            },
            Err(error) => {
                tracing::warn!(%error, "advisory generation failed; using fallback");
                vec![FALLBACK_TIP.to_string()]
            }
        }
    }
}

pub(crate) fn advisory_prompt(factors: &[RiskFactor]) -> String {
    let labels = factors
        .iter()
        .map(RiskFactor::label)
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "A person completed a lifestyle survey with these risk factors: {labels}.\n\
         Write exactly {TIP_COUNT} short, encouraging, non-diagnostic lifestyle tips that address them.\n\
         Do not give medical advice, diagnoses, or medication guidance.\n\
         Respond with only a JSON array of {TIP_COUNT} strings."
    )
}

/// Strips a surrounding code fence, then expects a JSON array of exactly three strings.
pub(crate) fn parse_tips(response: &str) -> Option<Vec<String>> {
    let body = strip_code_fence(response);
    let tips: Vec<String> = serde_json::from_str(body).ok()?;
    (tips.len() == TIP_COUNT).then_some(tips)
}

fn strip_code_fence(response: &str) -> &str {
    let trimmed = response.trim();
    let Some(after_open) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(inner) = after_open.strip_suffix("```") else {
        return trimmed;
    };

    // Drop the info string, e.g. ```json
    match inner.split_once('\n') {
        Some((info, rest)) if !info.trim_start().starts_with('[') => rest.trim(),
        _ => inner.trim(),
    }
}
