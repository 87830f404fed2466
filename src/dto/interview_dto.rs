use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::answer::ScoreRecord;
use crate::services::interview_service::{AdvanceOutcome, StartOutcome};

fn default_role() -> String {
    "Software Engineer".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct StartInterviewRequest {
    pub candidate_id: Uuid,
    #[serde(default = "default_role")]
    #[validate(length(min = 1, max = 200))]
    pub role: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StartInterviewResponse {
    pub status: String,
    pub interview_id: Uuid,
    pub question: Option<String>,
    pub total_questions: usize,
}

impl From<StartOutcome> for StartInterviewResponse {
    fn from(outcome: StartOutcome) -> Self {
        Self {
            status: "started".to_string(),
            interview_id: outcome.interview_id,
            question: outcome.question,
            total_questions: outcome.total_questions,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct NextQuestionRequest {
    pub interview_id: Uuid,
    #[validate(length(min = 1, max = 20000))]
    pub answer: String,
}

/// Either the next question with the score of the previous answer, the final
/// score, or a bare message once the interview is over.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NextQuestionResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<ScoreRecord>,
}

impl From<AdvanceOutcome> for NextQuestionResponse {
    fn from(outcome: AdvanceOutcome) -> Self {
        match outcome {
            AdvanceOutcome::Next { question, score } => Self {
                question: Some(question),
                message: None,
                score: Some(score),
            },
            AdvanceOutcome::Completed { score } => Self {
                question: None,
                message: Some("Interview complete".to_string()),
                score: Some(score),
            },
            AdvanceOutcome::AlreadyComplete => Self {
                question: None,
                message: Some("Interview already complete".to_string()),
                score: None,
            },
        }
    }
}
