//! In-process store used when no `DATABASE_URL` is configured, and by tests.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::database::store::InterviewStore;
use crate::error::{Error, Result};
use crate::models::answer::{AnswerRecord, NewAnswer};
use crate::models::candidate::{Candidate, NewCandidate};
use crate::models::interview::Interview;

#[derive(Default)]
struct Tables {
    candidates: HashMap<Uuid, Candidate>,
    interviews: HashMap<Uuid, Interview>,
    answers: HashMap<Uuid, Vec<AnswerRecord>>,
}

#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl InterviewStore for MemoryStore {
    async fn create_candidate(&self, candidate: NewCandidate) -> Result<Candidate> {
        let created = Candidate {
            id: Uuid::new_v4(),
            name: candidate.name,
            email: candidate.email,
            resume_text: candidate.resume_text,
            skills: candidate.skills,
            created_at: Utc::now(),
        };
        self.tables
            .write()
            .await
            .candidates
            .insert(created.id, created.clone());
        Ok(created)
    }

    async fn get_candidate(&self, id: Uuid) -> Result<Option<Candidate>> {
        Ok(self.tables.read().await.candidates.get(&id).cloned())
    }

    async fn create_interview(
        &self,
        candidate_id: Uuid,
        role: &str,
        questions: &[String],
    ) -> Result<Interview> {
        let mut tables = self.tables.write().await;
        if !tables.candidates.contains_key(&candidate_id) {
            return Err(Error::NotFound("Candidate not found".to_string()));
        }
        let interview = Interview {
            id: Uuid::new_v4(),
            candidate_id,
            role: role.to_string(),
            questions: questions.to_vec(),
            answer_count: 0,
            started_at: Utc::now(),
            completed_at: None,
        };
        tables.interviews.insert(interview.id, interview.clone());
        Ok(interview)
    }

    async fn get_interview(&self, id: Uuid) -> Result<Option<Interview>> {
        Ok(self.tables.read().await.interviews.get(&id).cloned())
    }

    async fn append_answer(
        &self,
        interview_id: Uuid,
        answer: NewAnswer,
        completes: bool,
    ) -> Result<AnswerRecord> {
        let mut tables = self.tables.write().await;
        let interview = tables
            .interviews
            .get_mut(&interview_id)
            .ok_or_else(|| Error::NotFound("Interview not found".to_string()))?;

        if interview.completed_at.is_some() || interview.answer_count != answer.question_index {
            return Err(Error::Conflict(format!(
                "Interview {} is at answer {}, cannot record answer {}",
                interview_id, interview.answer_count, answer.question_index
            )));
        }

        let now = Utc::now();
        interview.answer_count += 1;
        if completes {
            interview.completed_at = Some(now);
        }

        let record = AnswerRecord {
            id: Uuid::new_v4(),
            interview_id,
            question_index: answer.question_index,
            question: answer.question,
            answer: answer.answer,
            score: answer.score,
            created_at: now,
        };
        tables
            .answers
            .entry(interview_id)
            .or_default()
            .push(record.clone());
        Ok(record)
    }

    async fn count_answers(&self, interview_id: Uuid) -> Result<i64> {
        let tables = self.tables.read().await;
        Ok(tables
            .answers
            .get(&interview_id)
            .map(|a| a.len() as i64)
            .unwrap_or(0))
    }

    async fn list_answers(&self, interview_id: Uuid) -> Result<Vec<AnswerRecord>> {
        let tables = self.tables.read().await;
        let mut answers = tables.answers.get(&interview_id).cloned().unwrap_or_default();
        answers.sort_by_key(|a| a.question_index);
        Ok(answers)
    }
}
