use std::path::{Path, PathBuf};

use clap::Args;
use health_profiler::config::AppConfig;
use health_profiler::error::AppError;
use health_profiler::profiler::{ImageUpload, ProfileError, SurveySubmission};
use health_profiler::telemetry;
use serde_json::json;

use crate::infra::build_profiler;

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
pub(crate) struct ProfileArgs {
    /// JSON file holding structured survey answers
    #[arg(long)]
    pub(crate) answers: Option<PathBuf>,
    /// Plain-text survey, one `field: value` per line
    #[arg(long)]
    pub(crate) text: Option<PathBuf>,
    /// Photo or scan of a paper survey
    #[arg(long)]
    pub(crate) image: Option<PathBuf>,
}

pub(crate) async fn run_profile(args: ProfileArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let submission = load_submission(args).await?;
    let profiler = build_profiler(&config.collaborators)?;

    let output = match profiler.profile(submission).await {
        Ok(profile) => serde_json::to_value(&profile)?,
        Err(ProfileError::Incomplete(rejection)) => json!({
            "status": "rejected",
            "reason": rejection.reason,
            "missing_fields": rejection.missing_fields,
        }),
        Err(other) => return Err(other.into()),
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

async fn load_submission(args: ProfileArgs) -> Result<SurveySubmission, AppError> {
    if let Some(path) = args.answers {
        let raw = tokio::fs::read(&path).await?;
        return Ok(SurveySubmission::from_answers(serde_json::from_slice(&raw)?));
    }

    if let Some(path) = args.text {
        let text = tokio::fs::read_to_string(&path).await?;
        return Ok(SurveySubmission::from_text(text));
    }

    if let Some(path) = args.image {
        let bytes = tokio::fs::read(&path).await?;
        return Ok(SurveySubmission::from_image(image_upload(&path, bytes)));
    }

    Ok(SurveySubmission::default())
}

fn image_upload(path: &Path, bytes: Vec<u8>) -> ImageUpload {
    let mut upload = ImageUpload::new(bytes);
    if let Some(content_type) = mime_guess::from_path(path).first() {
        upload = upload.with_content_type(content_type);
    }
    if let Some(name) = path.file_name() {
        upload = upload.with_file_name(name.to_string_lossy());
    }
    upload
}
