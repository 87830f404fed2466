use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Characters of extracted resume text echoed back to the uploader.
pub const RESPONSE_TEXT_CHARS: usize = 500;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ResumeUploadResponse {
    pub candidate_id: Uuid,
    pub skills: Vec<String>,
    pub text: String,
}

/// Multipart form accepted by the upload endpoint; documentation only.
#[allow(dead_code)]
#[derive(ToSchema)]
pub struct ResumeUploadForm {
    /// PDF resume.
    #[schema(value_type = Option<String>, format = Binary)]
    pub file: Option<Vec<u8>>,
    pub linkedin_url: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
}
