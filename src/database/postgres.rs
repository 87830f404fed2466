use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Row};
use uuid::Uuid;

use crate::database::store::InterviewStore;
use crate::error::{Error, Result};
use crate::models::answer::{AnswerRecord, NewAnswer, ScoreRecord, SubScores};
use crate::models::candidate::{Candidate, NewCandidate};
use crate::models::interview::Interview;

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct AnswerRow {
    id: Uuid,
    interview_id: Uuid,
    question_index: i32,
    question: String,
    answer: String,
    score: f64,
    technical_depth: f64,
    problem_solving: f64,
    communication: f64,
    experience: f64,
    critical_thinking: f64,
    feedback: String,
    strengths: Vec<String>,
    improvements: Vec<String>,
    suggestions: Vec<String>,
    overall_assessment: String,
    created_at: DateTime<Utc>,
}

impl AnswerRow {
    fn into_record(self) -> AnswerRecord {
        AnswerRecord {
            id: self.id,
            interview_id: self.interview_id,
            question_index: self.question_index,
            question: self.question,
            answer: self.answer,
            score: ScoreRecord {
                score: self.score,
                sub_scores: SubScores {
                    technical_depth: self.technical_depth,
                    problem_solving: self.problem_solving,
                    communication: self.communication,
                    experience: self.experience,
                    critical_thinking: self.critical_thinking,
                },
                feedback: self.feedback,
                strengths: self.strengths,
                improvements: self.improvements,
                suggestions: self.suggestions,
                overall_assessment: self.overall_assessment,
            },
            created_at: self.created_at,
        }
    }
}

#[async_trait]
impl InterviewStore for PgStore {
    async fn create_candidate(&self, candidate: NewCandidate) -> Result<Candidate> {
        let created = sqlx::query_as::<_, Candidate>(
            r#"
            INSERT INTO candidates (id, name, email, resume_text, skills)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, email, resume_text, skills, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(candidate.name)
        .bind(candidate.email)
        .bind(candidate.resume_text)
        .bind(candidate.skills)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    async fn get_candidate(&self, id: Uuid) -> Result<Option<Candidate>> {
        let candidate = sqlx::query_as::<_, Candidate>(
            r#"SELECT id, name, email, resume_text, skills, created_at FROM candidates WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(candidate)
    }

    async fn create_interview(
        &self,
        candidate_id: Uuid,
        role: &str,
        questions: &[String],
    ) -> Result<Interview> {
        let interview = sqlx::query_as::<_, Interview>(
            r#"
            INSERT INTO interviews (id, candidate_id, role, questions, answer_count)
            VALUES ($1, $2, $3, $4, 0)
            RETURNING id, candidate_id, role, questions, answer_count, started_at, completed_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(candidate_id)
        .bind(role)
        .bind(questions)
        .fetch_one(&self.pool)
        .await?;
        Ok(interview)
    }

    async fn get_interview(&self, id: Uuid) -> Result<Option<Interview>> {
        let interview = sqlx::query_as::<_, Interview>(
            r#"
            SELECT id, candidate_id, role, questions, answer_count, started_at, completed_at
            FROM interviews WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(interview)
    }

    async fn append_answer(
        &self,
        interview_id: Uuid,
        answer: NewAnswer,
        completes: bool,
    ) -> Result<AnswerRecord> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query(
            r#"SELECT answer_count, completed_at FROM interviews WHERE id = $1 FOR UPDATE"#,
        )
        .bind(interview_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| Error::NotFound("Interview not found".to_string()))?;

        let answer_count: i32 = row.try_get("answer_count")?;
        let completed_at: Option<DateTime<Utc>> = row.try_get("completed_at")?;
        if completed_at.is_some() || answer_count != answer.question_index {
            return Err(Error::Conflict(format!(
                "Interview {} is at answer {}, cannot record answer {}",
                interview_id, answer_count, answer.question_index
            )));
        }

        let score = answer.score;
        let inserted = sqlx::query_as::<_, AnswerRow>(
            r#"
            INSERT INTO answers (
                id, interview_id, question_index, question, answer, score,
                technical_depth, problem_solving, communication, experience, critical_thinking,
                feedback, strengths, improvements, suggestions, overall_assessment
            ) VALUES (
                $1, $2, $3, $4, $5, $6,
                $7, $8, $9, $10, $11,
                $12, $13, $14, $15, $16
            )
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(interview_id)
        .bind(answer.question_index)
        .bind(answer.question)
        .bind(answer.answer)
        .bind(score.score)
        .bind(score.sub_scores.technical_depth)
        .bind(score.sub_scores.problem_solving)
        .bind(score.sub_scores.communication)
        .bind(score.sub_scores.experience)
        .bind(score.sub_scores.critical_thinking)
        .bind(score.feedback)
        .bind(score.strengths)
        .bind(score.improvements)
        .bind(score.suggestions)
        .bind(score.overall_assessment)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            UPDATE interviews
            SET answer_count = answer_count + 1,
                completed_at = CASE WHEN $2 THEN NOW() ELSE completed_at END
            WHERE id = $1
            "#,
        )
        .bind(interview_id)
        .bind(completes)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(inserted.into_record())
    }

    async fn count_answers(&self, interview_id: Uuid) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(r#"SELECT COUNT(*) FROM answers WHERE interview_id = $1"#)
            .bind(interview_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn list_answers(&self, interview_id: Uuid) -> Result<Vec<AnswerRecord>> {
        let rows = sqlx::query_as::<_, AnswerRow>(
            r#"SELECT * FROM answers WHERE interview_id = $1 ORDER BY question_index ASC"#,
        )
        .bind(interview_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(AnswerRow::into_record).collect())
    }
}
