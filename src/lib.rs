pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::database::InterviewStore;
use crate::error::Result;
use crate::middleware::rate_limit::{rps_middleware, RateLimiter};
use crate::services::{
    feedback_service::FeedbackService, interview_service::InterviewService,
    llm_service::LlmService, question_service::QuestionService, report_service::ReportService,
    resume_service::ResumeService, scoring_service::ScoringService,
};

const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn InterviewStore>,
    pub llm: LlmService,
    pub interview_service: InterviewService,
    pub report_service: ReportService,
    pub resume_service: ResumeService,
}

impl AppState {
    pub fn new(store: Arc<dyn InterviewStore>, llm: LlmService, question_count: usize) -> Result<Self> {
        let interview_service = InterviewService::new(
            store.clone(),
            QuestionService::new(llm.clone()),
            ScoringService::new(llm.clone()),
            question_count,
        );
        let report_service = ReportService::new(store.clone(), FeedbackService::new(llm.clone()));
        let resume_service = ResumeService::new(store.clone())?;

        Ok(Self {
            store,
            llm,
            interview_service,
            report_service,
            resume_service,
        })
    }
}

pub fn build_router(state: AppState, public_rps: u32) -> Router {
    let base_routes = Router::new()
        .route("/health", get(routes::health::health))
        .route("/api-docs/openapi.json", get(routes::openapi::openapi_json));

    let public_api = Router::new()
        .route("/resume/upload", post(routes::resume::upload_resume))
        .route("/candidates/:id", get(routes::candidate_routes::get_candidate))
        .route("/interview/start", post(routes::interview::start_interview))
        .route("/interview/next", post(routes::interview::next_question))
        .route("/interview/:id", get(routes::interview::interview_status))
        .route("/report/:id/data", get(routes::report::report_data))
        .route("/report/:id", get(routes::report::download_report))
        .layer(axum::middleware::from_fn_with_state(
            RateLimiter::new(public_rps),
            rps_middleware,
        ));

    base_routes
        .merge(public_api)
        .with_state(state)
        .layer(middleware::cors::cors_layer())
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
}
