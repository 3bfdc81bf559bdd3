//! Capabilities the pipeline borrows from outside: reading text off an image and
//! writing advisory tips. Both are traits so the pipeline can run against fakes.

mod gemini;
mod tesseract;

pub use gemini::{GeminiClient, GeminiSettings};
pub use tesseract::TesseractCli;

use async_trait::async_trait;

/// Image bytes submitted in place of survey text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub bytes: Vec<u8>,
    pub content_type: Option<mime::Mime>,
    pub file_name: Option<String>,
}

impl ImageUpload {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            content_type: None,
            file_name: None,
        }
    }

    pub fn with_content_type(mut self, content_type: mime::Mime) -> Self {
        self.content_type = Some(content_type);
        self
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }
}

/// Optical text extraction engine.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    async fn extract_text(&self, image: &ImageUpload) -> Result<String, ExtractionError>;
}

/// Natural-language generator for advisory tips.
#[async_trait]
pub trait AdvisoryGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, AdvisoryError>;
}

/// Failure reported by a text extraction engine.
#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("failed to launch text extraction engine '{binary}': {source}")]
    Spawn {
        binary: String,
        #[source]
        source: std::io::Error,
    },
    #[error("text extraction engine exited with {status}: {stderr}")]
    Engine { status: String, stderr: String },
    #[error("text extraction engine returned non UTF-8 output")]
    Encoding,
    #[error("text extraction unavailable: {0}")]
    Unavailable(String),
}

/// Failure reported by an advisory generator.
#[derive(Debug, thiserror::Error)]
pub enum AdvisoryError {
    #[error("advisory request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("advisory service responded with {status}: {body}")]
    Service { status: u16, body: String },
    #[error("advisory response carried no text")]
    EmptyResponse,
    #[error("advisory generation unavailable: {0}")]
    Unavailable(String),
}

/// Generator used when no advisory service is configured; every call fails.
#[derive(Debug, Clone, Default)]
pub struct OfflineAdvisor;

#[async_trait]
impl AdvisoryGenerator for OfflineAdvisor {
    async fn generate(&self, _prompt: &str) -> Result<String, AdvisoryError> {
        Err(AdvisoryError::Unavailable(
            "no advisory service configured".to_string(),
        ))
    }
}
