use std::sync::Arc;

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use bs_core::{recommend, Error};
use bs_prescription::PrescriptionForm;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::AppState;

const ALLOWED_IMAGE_TYPES: &[&str] = &["image/jpeg", "image/png"];

#[derive(Serialize)]
pub struct AnalysisResponse {
    pub model: String,
    pub label: &'static str,
    pub raw_score: f32,
    pub confidence_percent: String,
    pub recommendations: Vec<&'static str>,
}

#[derive(Serialize)]
pub struct PrescriptionResponse {
    pub id: String,
    pub issued_at: DateTime<Utc>,
    pub filename: String,
    pub pdf_data_uri: String,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

pub struct ApiError(Error);

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            Error::Catalog(name) => (StatusCode::BAD_REQUEST, format!("Unknown model: {}", name)),
            Error::Validation(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg.clone()),
            Error::UnsupportedMedia(ct) => (
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                format!("Unsupported image type: {}", ct),
            ),
            Error::Image(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Error analyzing the image: {}", e),
            ),
            Error::Inference(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Error analyzing the image: {}", msg),
            ),
            other => (StatusCode::INTERNAL_SERVER_ERROR, other.to_string()),
        };
        (status, Json(ErrorBody { error: message })).into_response()
    }
}

pub async fn list_models(State(_state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(bs_models::catalog::model_names())
}

/// Multipart upload: a `model` field carrying the display name and an
/// `image` field carrying a JPEG or PNG X-ray.
pub async fn analyze_image(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<AnalysisResponse>, ApiError> {
    let mut model_name: Option<String> = None;
    let mut image_bytes: Option<Vec<u8>> = None;

    while let Some(field) = multipart.next_field().await.map_err(field_error)? {
        match field.name() {
            Some("model") => {
                model_name = Some(field.text().await.map_err(field_error)?);
            }
            Some("image") => {
                if let Some(content_type) = field.content_type() {
                    if !ALLOWED_IMAGE_TYPES.contains(&content_type) {
                        return Err(Error::UnsupportedMedia(content_type.to_string()).into());
                    }
                }
                image_bytes = Some(field.bytes().await.map_err(field_error)?.to_vec());
            }
            _ => {}
        }
    }

    let model_name =
        model_name.ok_or_else(|| Error::Validation("missing field: model".to_string()))?;
    let image_bytes =
        image_bytes.ok_or_else(|| Error::Validation("missing field: image".to_string()))?;

    // The declared content type above is only a fast gate; what decides is
    // the payload itself.
    bs_inference::sniff_format(&image_bytes)?;

    let model = state.registry.get_or_load(&model_name).await?;
    let result = bs_inference::analyze(&model, &image_bytes)?;
    info!(
        "🔍 {}: {} ({})",
        model_name,
        result.verdict.label(),
        result.confidence_display()
    );

    Ok(Json(AnalysisResponse {
        model: model_name,
        label: result.verdict.label(),
        raw_score: result.raw_score,
        confidence_percent: result.confidence_display(),
        recommendations: recommend::recommendations(result.verdict).to_vec(),
    }))
}

/// Validate the submitted form, render the document and hand the bytes back
/// inline; nothing is written to disk.
pub async fn create_prescription(
    State(_state): State<Arc<AppState>>,
    Json(form): Json<PrescriptionForm>,
) -> Result<Json<PrescriptionResponse>, ApiError> {
    let prescription = form.validate()?;
    let pdf_bytes = bs_prescription::render(&prescription)?;
    info!(
        "📄 Generated prescription {} ({} bytes)",
        prescription.id,
        pdf_bytes.len()
    );

    Ok(Json(PrescriptionResponse {
        filename: bs_prescription::suggested_filename(&prescription),
        pdf_data_uri: bs_prescription::to_data_uri(&pdf_bytes),
        id: prescription.id,
        issued_at: prescription.issued_at,
    }))
}

fn field_error(e: axum::extract::multipart::MultipartError) -> ApiError {
    Error::Validation(e.to_string()).into()
}
