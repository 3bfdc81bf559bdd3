use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::to_bytes;
use axum::response::Response;
use serde_json::Value;

use crate::profiler::collaborators::{
    AdvisoryError, AdvisoryGenerator, ExtractionError, ImageUpload, TextExtractor,
};
use crate::profiler::{HealthProfiler, ScoringConfig};

pub(super) const THREE_TIPS: &str =
    "```json\n[\"Take the stairs today\", \"Add a vegetable to dinner\", \"Call a quit line\"]\n```";

/// Extractor returning canned text and remembering what it was handed.
pub(super) struct CannedExtractor {
    reply: Result<String, String>,
    pub(super) seen: Mutex<Vec<ImageUpload>>,
}

impl CannedExtractor {
    pub(super) fn text(reply: &str) -> Self {
        Self {
            reply: Ok(reply.to_string()),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub(super) fn failing(message: &str) -> Self {
        Self {
            reply: Err(message.to_string()),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub(super) fn calls(&self) -> usize {
        self.seen.lock().expect("extractor mutex poisoned").len()
    }
}

#[async_trait]
impl TextExtractor for CannedExtractor {
    async fn extract_text(&self, image: &ImageUpload) -> Result<String, ExtractionError> {
        self.seen
            .lock()
            .expect("extractor mutex poisoned")
            .push(image.clone());
        self.reply
            .clone()
            .map_err(|message| ExtractionError::Engine {
                status: "exit status: 1".to_string(),
                stderr: message,
            })
    }
}

/// Advisory generator with a fixed reply and a call counter.
pub(super) struct CannedAdvisor {
    reply: Option<String>,
    calls: AtomicUsize,
}

impl CannedAdvisor {
    pub(super) fn replying(reply: &str) -> Self {
        Self {
            reply: Some(reply.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub(super) fn unavailable() -> Self {
        Self {
            reply: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub(super) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AdvisoryGenerator for CannedAdvisor {
    async fn generate(&self, _prompt: &str) -> Result<String, AdvisoryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.reply
            .clone()
            .ok_or_else(|| AdvisoryError::Unavailable("service down".to_string()))
    }
}

pub(super) type TestProfiler = HealthProfiler<CannedExtractor, CannedAdvisor>;

pub(super) fn build_service(
    extractor: CannedExtractor,
    advisor: CannedAdvisor,
) -> (Arc<TestProfiler>, Arc<CannedExtractor>, Arc<CannedAdvisor>) {
    let extractor = Arc::new(extractor);
    let advisor = Arc::new(advisor);
    let service = Arc::new(HealthProfiler::new(
        extractor.clone(),
        advisor.clone(),
        ScoringConfig::standard(),
    ));
    (service, extractor, advisor)
}

pub(super) fn default_service() -> (Arc<TestProfiler>, Arc<CannedExtractor>, Arc<CannedAdvisor>) {
    build_service(
        CannedExtractor::text("Age: 30\nSmoker: no\nExercise: daily\nDiet: balanced"),
        CannedAdvisor::replying(THREE_TIPS),
    )
}

pub(super) async fn json_body(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    serde_json::from_slice(&bytes).expect("body is JSON")
}
