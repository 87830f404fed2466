use axum::{response::IntoResponse, Json};
use utoipa::OpenApi;

use crate::dto::interview_dto::{
    NextQuestionRequest, NextQuestionResponse, StartInterviewRequest, StartInterviewResponse,
};
use crate::dto::resume_dto::{ResumeUploadForm, ResumeUploadResponse};
use crate::models::answer::{ScoreRecord, SubScores};
use crate::models::candidate::Candidate;
use crate::models::interview::InterviewState;
use crate::models::report::{
    AggregateReport, AnswerDetail, FeedbackVerdict, HiringRecommendation, Potential,
};
use crate::services::interview_service::{Difficulty, Focus, InterviewStatus, Pacing};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health::health,
        crate::routes::resume::upload_resume,
        crate::routes::candidate_routes::get_candidate,
        crate::routes::interview::start_interview,
        crate::routes::interview::next_question,
        crate::routes::interview::interview_status,
        crate::routes::report::report_data,
        crate::routes::report::download_report,
    ),
    components(schemas(
        ResumeUploadForm,
        ResumeUploadResponse,
        Candidate,
        StartInterviewRequest,
        StartInterviewResponse,
        NextQuestionRequest,
        NextQuestionResponse,
        ScoreRecord,
        SubScores,
        InterviewState,
        InterviewStatus,
        Pacing,
        Difficulty,
        Focus,
        AggregateReport,
        AnswerDetail,
        FeedbackVerdict,
        Potential,
        HiringRecommendation,
    )),
    tags(
        (name = "interview-backend", description = "Automated technical interview API")
    )
)]
pub struct ApiDoc;

pub async fn openapi_json() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}
