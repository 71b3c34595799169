use axum::{
    extract::{Multipart, Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::display::DisplayConfig;
use crate::errors::AppError;
use crate::form::attachment::{PhotoAttachment, PhotoInfo, ACCEPTED_PHOTO_TYPES};
use crate::form::evaluator::{evaluate, FieldEvaluation};
use crate::form::progress::{summarize, ProgressSummary};
use crate::form::record::{FormRecord, TextField, TrackedField, STYLE_OPTIONS};
use crate::form::session::{FormEvent, FormSession};
use crate::generator::ArtifactId;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescriptor {
    pub name: &'static str,
    pub label: &'static str,
    pub required: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleOption {
    pub value: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormConfigResponse {
    pub display: DisplayConfig,
    pub fields: Vec<FieldDescriptor>,
    pub style_options: Vec<StyleOption>,
    pub accepted_photo_types: &'static [&'static str],
    pub max_photo_bytes: usize,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRequest {
    #[serde(default)]
    pub record: FormRecord,
    #[serde(default)]
    pub photo_present: bool,
}

#[derive(Debug, Serialize)]
pub struct FieldStatus {
    pub field: &'static str,
    pub label: &'static str,
    pub evaluation: FieldEvaluation,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressResponse {
    #[serde(flatten)]
    pub summary: ProgressSummary,
    pub fields: Vec<FieldStatus>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    pub id: ArtifactId,
    pub submission_id: Uuid,
    pub submitted_at: DateTime<Utc>,
    pub file_name: String,
    pub download_url: String,
    pub photo: Option<PhotoInfo>,
    pub progress: ProgressSummary,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadQuery {
    pub file_name: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/form/config
pub async fn handle_form_config(State(state): State<AppState>) -> Json<FormConfigResponse> {
    let fields = TrackedField::all()
        .map(|f| FieldDescriptor {
            name: f.wire_name(),
            label: f.label(),
            required: matches!(f, TrackedField::Text(t) if t.is_required()),
        })
        .collect();

    let style_options = STYLE_OPTIONS
        .iter()
        .map(|&(value, description)| StyleOption { value, description })
        .collect();

    Json(FormConfigResponse {
        display: state.config.display,
        fields,
        style_options,
        accepted_photo_types: ACCEPTED_PHOTO_TYPES,
        max_photo_bytes: state.config.max_photo_bytes,
    })
}

/// POST /api/v1/form/progress
///
/// Recomputes progress from the full record snapshot sent by the form.
pub async fn handle_progress(Json(req): Json<ProgressRequest>) -> Json<ProgressResponse> {
    let evaluations = evaluate(&req.record, req.photo_present);
    let summary = summarize(&evaluations);
    let fields = evaluations
        .iter()
        .map(|r| FieldStatus {
            field: r.field.wire_name(),
            label: r.field.label(),
            evaluation: r.evaluation,
        })
        .collect();

    Json(ProgressResponse { summary, fields })
}

/// POST /api/v1/form/submit
///
/// Replays the multipart parts into a fresh form session, gates on the
/// required fields and forwards the submission to the document service.
pub async fn handle_submit(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<SubmitResponse>, AppError> {
    let session = read_session(multipart, state.config.max_photo_bytes).await?;

    let validation = session.validate_for_submit();
    if !validation.passed {
        return Err(AppError::Validation(validation.message()));
    }

    let progress = session.summary();
    let submission = session.into_submission();
    let submission_id = Uuid::new_v4();
    info!(
        %submission_id,
        progress = progress.percentage,
        with_photo = submission.photo.is_some(),
        "Forwarding submission to document service"
    );

    let id = state.generator.generate(&submission).await?;
    let file_name = submission.package_file_name();
    info!(%submission_id, package = %id, "Package generated");

    Ok(Json(SubmitResponse {
        download_url: package_download_url(&id, &file_name),
        id,
        submission_id,
        submitted_at: Utc::now(),
        file_name,
        photo: submission.photo.as_ref().map(PhotoAttachment::info),
        progress,
    }))
}

/// GET /api/v1/packages/:id
pub async fn handle_download(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<DownloadQuery>,
) -> Result<Response, AppError> {
    let id = ArtifactId::parse(&id)
        .ok_or_else(|| AppError::BadRequest(format!("Invalid package id '{id}'")))?;
    let bytes = state.generator.download(&id).await?;

    let file_name = query
        .file_name
        .map(|n| sanitize_file_name(&n))
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| sanitize_file_name(&format!("CV_Package_{id}.zip")));

    Ok((
        [
            (header::CONTENT_TYPE, "application/zip".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        bytes,
    )
        .into_response())
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

struct PhotoPart {
    file_name: String,
    content_type: String,
    bytes: bytes::Bytes,
}

async fn read_session(mut multipart: Multipart, max_photo_bytes: usize) -> Result<FormSession, AppError> {
    let mut session = FormSession::new();
    let mut photo: Option<PhotoPart> = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "photo" => {
                let file_name = field.file_name().unwrap_or("photo").to_string();
                let content_type = field.content_type().unwrap_or_default().to_string();
                let bytes = field.bytes().await?;
                // Browsers send an empty part when no file was picked.
                if !bytes.is_empty() {
                    photo = Some(PhotoPart {
                        file_name,
                        content_type,
                        bytes,
                    });
                }
            }
            "includePhoto" => {
                let value = field.text().await?;
                session.apply(FormEvent::SetIncludePhoto(parse_flag(&value)));
            }
            other => match TextField::from_wire_name(other) {
                Some(text_field) => {
                    let value = field.text().await?;
                    session.apply(FormEvent::SetText {
                        field: text_field,
                        value,
                    });
                }
                None => debug!("Ignoring unknown form part '{other}'"),
            },
        }
    }

    // Attach last so the include flag is settled regardless of part order.
    if let Some(part) = photo {
        if session.record().include_photo {
            let attachment = PhotoAttachment::new(
                part.file_name,
                &part.content_type,
                part.bytes,
                max_photo_bytes,
            )?;
            session.apply(FormEvent::AttachPhoto(attachment));
        } else {
            debug!("Dropping photo part: includePhoto is not set");
        }
    }

    Ok(session)
}

/// Relative link to the download proxy, carrying the suggested file name.
fn package_download_url(id: &ArtifactId, file_name: &str) -> String {
    // Only used to borrow the url crate's path and query encoding.
    let mut url = match Url::parse("http://cvform.local/api/v1/packages") {
        Ok(url) => url,
        Err(_) => return format!("/api/v1/packages/{id}"),
    };
    if let Ok(mut path) = url.path_segments_mut() {
        path.push(&id.0);
    }
    url.query_pairs_mut().append_pair("fileName", file_name);
    format!("{}?{}", url.path(), url.query().unwrap_or_default())
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "on" | "1" | "yes"
    )
}

fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_control() && !matches!(c, '"' | '\\' | '/'))
        .collect::<String>()
        .trim()
        .to_string()
}
