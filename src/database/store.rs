//! Persistence contract for candidates, interview sessions and answer records.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::models::answer::{AnswerRecord, NewAnswer};
use crate::models::candidate::{Candidate, NewCandidate};
use crate::models::interview::Interview;

#[async_trait]
pub trait InterviewStore: Send + Sync {
    async fn create_candidate(&self, candidate: NewCandidate) -> Result<Candidate>;

    async fn get_candidate(&self, id: Uuid) -> Result<Option<Candidate>>;

    /// Persists a new in-progress session together with its question list.
    async fn create_interview(
        &self,
        candidate_id: Uuid,
        role: &str,
        questions: &[String],
    ) -> Result<Interview>;

    async fn get_interview(&self, id: Uuid) -> Result<Option<Interview>>;

    /// Appends an answer and advances the session counter as one atomic unit.
    ///
    /// Fails with `Error::Conflict` unless the session's `answer_count` equals
    /// `answer.question_index` and the session is still in progress. When
    /// `completes` is set the session's completion timestamp is recorded in the
    /// same unit.
    async fn append_answer(
        &self,
        interview_id: Uuid,
        answer: NewAnswer,
        completes: bool,
    ) -> Result<AnswerRecord>;

    async fn count_answers(&self, interview_id: Uuid) -> Result<i64>;

    /// Answer records of a session ordered by question index.
    async fn list_answers(&self, interview_id: Uuid) -> Result<Vec<AnswerRecord>>;
}
