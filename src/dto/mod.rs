pub mod interview_dto;
pub mod resume_dto;
