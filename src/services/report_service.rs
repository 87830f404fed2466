use std::sync::Arc;

use uuid::Uuid;

use crate::database::InterviewStore;
use crate::error::{Error, Result};
use crate::models::answer::AnswerRecord;
use crate::models::report::{AggregateReport, AnswerDetail};
use crate::services::feedback_service::FeedbackService;
use crate::utils::rounding::{mean, round1};

#[derive(Clone)]
pub struct ReportService {
    store: Arc<dyn InterviewStore>,
    feedback: FeedbackService,
}

impl ReportService {
    pub fn new(store: Arc<dyn InterviewStore>, feedback: FeedbackService) -> Self {
        Self { store, feedback }
    }

    /// Derives the aggregate report for a session from its stored answer records.
    pub async fn build_report(&self, interview_id: Uuid) -> Result<AggregateReport> {
        let interview = self
            .store
            .get_interview(interview_id)
            .await?
            .ok_or_else(|| Error::NotFound("Interview not found".to_string()))?;
        let candidate = self.store.get_candidate(interview.candidate_id).await?;
        let answers = self.store.list_answers(interview_id).await?;

        let scores: Vec<f64> = answers.iter().map(|a| a.score.score).collect();
        let total_score = round1(scores.iter().sum());
        let average_score = mean(&scores).map(round1).unwrap_or(0.0);

        let verdict = self.feedback.compile_feedback(&answers).await;
        let summary = self.feedback.summarize(&interview.role, &answers).await;

        tracing::debug!(%interview_id, answers = answers.len(), average_score, "Report compiled");

        Ok(AggregateReport {
            interview_id,
            candidate_name: candidate
                .and_then(|c| c.name)
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| "Unknown".to_string()),
            role: interview.role,
            total_score,
            average_score,
            summary,
            answers: answers.iter().map(answer_detail).collect(),
            verdict,
        })
    }
}

fn answer_detail(record: &AnswerRecord) -> AnswerDetail {
    let s = &record.score.sub_scores;
    AnswerDetail {
        question_index: record.question_index,
        question: record.question.clone(),
        answer: record.answer.clone(),
        score: record.score.score,
        technical_depth: s.technical_depth,
        problem_solving: s.problem_solving,
        communication: s.communication,
        experience: s.experience,
        critical_thinking: s.critical_thinking,
        feedback: record.score.feedback.clone(),
    }
}
