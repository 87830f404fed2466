use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    dto::resume_dto::{ResumeUploadForm, ResumeUploadResponse, RESPONSE_TEXT_CHARS},
    error::{Error, Result},
    services::resume_service::{truncate_chars, ResumeSource},
    AppState,
};

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[utoipa::path(
    post,
    path = "/resume/upload",
    request_body(content = ResumeUploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Candidate created from resume", body = ResumeUploadResponse),
        (status = 400, description = "Neither a PDF nor a profile URL was supplied, or the PDF is unreadable")
    )
)]
#[axum::debug_handler]
pub async fn upload_resume(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse> {
    let mut pdf: Option<Vec<u8>> = None;
    let mut profile_url = None;
    let mut name = None;
    let mut email = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        tracing::error!("Failed to get next field: {}", e);
        Error::BadRequest(e.to_string())
    })? {
        let field_name = field.name().unwrap_or_default().to_string();
        match field_name.as_str() {
            "file" => {
                let data = field.bytes().await.map_err(|e| {
                    tracing::error!("Failed to read resume bytes: {}", e);
                    Error::BadRequest("Failed to read file upload".into())
                })?;
                if !data.is_empty() {
                    pdf = Some(data.to_vec());
                }
            }
            "linkedin_url" => profile_url = non_blank(field.text().await?),
            "name" => name = non_blank(field.text().await?),
            "email" => email = non_blank(field.text().await?),
            _ => {}
        }
    }

    let source = match (pdf, profile_url) {
        (Some(bytes), _) => Some(ResumeSource::Pdf(bytes)),
        (None, Some(url)) => Some(ResumeSource::ProfileUrl(url)),
        (None, None) => None,
    };

    let candidate = state.resume_service.ingest(source, name, email).await?;
    let text = candidate.resume_text.as_deref().unwrap_or_default();

    Ok((
        StatusCode::CREATED,
        Json(ResumeUploadResponse {
            candidate_id: candidate.id,
            skills: candidate.skills.clone(),
            text: truncate_chars(text, RESPONSE_TEXT_CHARS),
        }),
    ))
}
