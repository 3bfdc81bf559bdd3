use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use super::{ExtractionError, ImageUpload, TextExtractor};

const STDERR_SNIPPET_CHARS: usize = 300;

/// Runs the `tesseract` command line engine over image bytes piped through stdin.
#[derive(Debug, Clone)]
pub struct TesseractCli {
    binary: PathBuf,
}

impl TesseractCli {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    fn binary_label(&self) -> String {
        self.binary.display().to_string()
    }
}

impl Default for TesseractCli {
    fn default() -> Self {
        Self::new("tesseract")
    }
}

#[async_trait]
impl TextExtractor for TesseractCli {
    async fn extract_text(&self, image: &ImageUpload) -> Result<String, ExtractionError> {
        let spawn_error = |source| ExtractionError::Spawn {
            binary: self.binary_label(),
            source,
        };

        let mut child = Command::new(&self.binary)
            .args(["stdin", "stdout", "-l", "eng"])
            .kill_on_drop(true)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(spawn_error)?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(&image.bytes).await.map_err(spawn_error)?;
        }

        let output = child.wait_with_output().await.map_err(spawn_error)?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ExtractionError::Engine {
                status: output.status.to_string(),
                stderr: stderr.trim().chars().take(STDERR_SNIPPET_CHARS).collect(),
            });
        }

        let text = String::from_utf8(output.stdout).map_err(|_| ExtractionError::Encoding)?;
        tracing::debug!(
            engine = %self.binary_label(),
            image_bytes = image.bytes.len(),
            text_len = text.len(),
            "image text extracted"
        );
        Ok(text)
    }
}
