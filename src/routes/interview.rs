use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::interview_dto::{
        NextQuestionRequest, NextQuestionResponse, StartInterviewRequest, StartInterviewResponse,
    },
    error::Result,
    services::interview_service::InterviewStatus,
    AppState,
};

#[utoipa::path(
    post,
    path = "/interview/start",
    request_body = StartInterviewRequest,
    responses(
        (status = 200, description = "Interview started", body = StartInterviewResponse),
        (status = 400, description = "Invalid payload"),
        (status = 404, description = "Candidate not found")
    )
)]
#[axum::debug_handler]
pub async fn start_interview(
    State(state): State<AppState>,
    Json(payload): Json<StartInterviewRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let outcome = state
        .interview_service
        .start(payload.candidate_id, &payload.role)
        .await?;
    Ok(Json(StartInterviewResponse::from(outcome)))
}

#[utoipa::path(
    post,
    path = "/interview/next",
    request_body = NextQuestionRequest,
    responses(
        (status = 200, description = "Answer scored; next question, final score or completion notice", body = NextQuestionResponse),
        (status = 400, description = "Invalid payload"),
        (status = 404, description = "Interview not found"),
        (status = 409, description = "Answer raced with another submission")
    )
)]
#[axum::debug_handler]
pub async fn next_question(
    State(state): State<AppState>,
    Json(payload): Json<NextQuestionRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let outcome = state
        .interview_service
        .advance(payload.interview_id, &payload.answer)
        .await?;
    Ok(Json(NextQuestionResponse::from(outcome)))
}

#[utoipa::path(
    get,
    path = "/interview/{id}",
    params(
        ("id" = Uuid, Path, description = "Interview ID")
    ),
    responses(
        (status = 200, description = "Progress of the interview", body = InterviewStatus),
        (status = 404, description = "Interview not found")
    )
)]
#[axum::debug_handler]
pub async fn interview_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    Ok(Json(state.interview_service.status(id).await?))
}
