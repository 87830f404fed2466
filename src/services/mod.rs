pub mod export_service;
pub mod feedback_service;
pub mod interview_service;
pub mod llm_service;
pub mod question_service;
pub mod report_service;
pub mod resume_service;
pub mod scoring_service;
