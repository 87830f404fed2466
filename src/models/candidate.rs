use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Candidate {
    pub id: Uuid,
    pub name: Option<String>,
    pub email: Option<String>,
    pub resume_text: Option<String>,
    pub skills: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Fields of a candidate known at ingestion time.
#[derive(Debug, Clone, Default)]
pub struct NewCandidate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub resume_text: Option<String>,
    pub skills: Vec<String>,
}
