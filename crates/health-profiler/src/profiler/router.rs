use std::sync::Arc;

use axum::{
    extract::{FromRequest, Multipart, Request, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde_json::{json, Value};

use super::collaborators::{AdvisoryGenerator, ImageUpload, TextExtractor};
use super::intake::{IntakeError, SurveySubmission};
use super::service::{HealthProfiler, ProfileError};

/// Router builder exposing the survey profiling endpoint.
pub fn profile_router<E, G>(service: Arc<HealthProfiler<E, G>>) -> Router
where
    E: TextExtractor + ?Sized + 'static,
    G: AdvisoryGenerator + ?Sized + 'static,
{
    Router::new()
        .route("/api/v1/profile", post(profile_handler::<E, G>))
        .with_state(service)
}

pub(crate) async fn profile_handler<E, G>(
    State(service): State<Arc<HealthProfiler<E, G>>>,
    request: Request,
) -> Response
where
    E: TextExtractor + ?Sized + 'static,
    G: AdvisoryGenerator + ?Sized + 'static,
{
    let submission = match read_submission(request).await {
        Ok(submission) => submission,
        Err(message) => return error_body(StatusCode::UNPROCESSABLE_ENTITY, "error", &message),
    };

    match service.profile(submission).await {
        Ok(profile) => (StatusCode::OK, Json(profile)).into_response(),
        Err(ProfileError::Incomplete(rejection)) => {
            let payload = json!({
                "status": "rejected",
                "reason": rejection.reason,
                "missing_fields": rejection.missing_fields,
            });
            (StatusCode::BAD_REQUEST, Json(payload)).into_response()
        }
        Err(ProfileError::Intake(error @ IntakeError::MissingInput)) => {
            error_body(StatusCode::BAD_REQUEST, "error", &error.to_string())
        }
        Err(ProfileError::Intake(error @ IntakeError::InvalidAnswers(_))) => {
            error_body(StatusCode::UNPROCESSABLE_ENTITY, "error", &error.to_string())
        }
        Err(ProfileError::Intake(IntakeError::TextExtractionFailed(message))) => {
            tracing::error!(%message, "image text extraction failed");
            error_body(StatusCode::INTERNAL_SERVER_ERROR, "ocr_failed", &message)
        }
    }
}

fn error_body(status: StatusCode, label: &str, message: &str) -> Response {
    let payload = json!({
        "status": label,
        "message": message,
    });
    (status, Json(payload)).into_response()
}

/// Reads a JSON answers body or a multipart form with `text` and `image` fields.
async fn read_submission(request: Request) -> Result<SurveySubmission, String> {
    let content_type = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<mime::Mime>().ok());

    let Some(content_type) = content_type else {
        return Ok(SurveySubmission::default());
    };

    if content_type.essence_str() == mime::APPLICATION_JSON.essence_str() {
        let Json(answers) = Json::<Value>::from_request(request, &())
            .await
            .map_err(|rejection| rejection.body_text())?;
        return Ok(SurveySubmission::from_answers(answers));
    }

    if content_type.essence_str() == mime::MULTIPART_FORM_DATA.essence_str() {
        let multipart = Multipart::from_request(request, &())
            .await
            .map_err(|rejection| rejection.body_text())?;
        return read_multipart(multipart).await;
    }

    Ok(SurveySubmission::default())
}

async fn read_multipart(mut multipart: Multipart) -> Result<SurveySubmission, String> {
    let mut submission = SurveySubmission::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|error| error.body_text())?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "text" => {
                let text = field.text().await.map_err(|error| error.body_text())?;
                submission.text = Some(text);
            }
            "image" => {
                let file_name = field.file_name().map(str::to_string);
                let content_type = field
                    .content_type()
                    .and_then(|value| value.parse::<mime::Mime>().ok())
                    .filter(|value| *value != mime::APPLICATION_OCTET_STREAM);
                if let Some(declared) = &content_type {
                    if declared.type_() != mime::IMAGE {
                        return Err(format!("image upload must be an image, got {declared}"));
                    }
                }
                let bytes = field.bytes().await.map_err(|error| error.body_text())?;
                if bytes.is_empty() {
                    continue;
                }

                let mut image = ImageUpload::new(bytes.to_vec());
                image.content_type = content_type;
                image.file_name = file_name;
                submission.image = Some(image);
            }
            _ => {}
        }
    }

    Ok(submission)
}
