use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::database::InterviewStore;
use crate::error::{Error, Result};
use crate::models::answer::{NewAnswer, ScoreRecord};
use crate::models::interview::InterviewState;
use crate::services::question_service::QuestionService;
use crate::services::scoring_service::ScoringService;
use crate::utils::rounding::{mean, round1};

/// One async mutex per in-flight session; advances on the same session run
/// one at a time while distinct sessions proceed in parallel. An entry lives
/// only while some advance holds or waits on it.
#[derive(Default)]
pub struct SessionLocks {
    inner: Mutex<HashMap<Uuid, Arc<tokio::sync::Mutex<()>>>>,
}

impl SessionLocks {
    async fn acquire(self: &Arc<Self>, id: Uuid) -> SessionGuard {
        // Created before waiting so a cancelled advance still prunes its entry.
        let mut session = SessionGuard {
            id,
            locks: self.clone(),
            guard: None,
        };
        let lock = {
            let mut map = self.inner.lock().unwrap_or_else(|e| e.into_inner());
            map.entry(id).or_default().clone()
        };
        session.guard = Some(lock.lock_owned().await);
        session
    }

    fn prune(&self, id: Uuid) {
        let mut map = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        // Handles are only cloned under the map mutex, so a count of one means
        // nobody else holds or waits on this session.
        if map.get(&id).is_some_and(|lock| Arc::strong_count(lock) == 1) {
            map.remove(&id);
        }
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

/// Holds a session lock; dropping it unlocks and prunes the idle entry.
struct SessionGuard {
    id: Uuid,
    locks: Arc<SessionLocks>,
    guard: Option<tokio::sync::OwnedMutexGuard<()>>,
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        drop(self.guard.take());
        self.locks.prune(self.id);
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StartOutcome {
    pub interview_id: Uuid,
    /// `None` when no questions could be produced for the session.
    pub question: Option<String>,
    pub total_questions: usize,
}

#[derive(Debug, Clone)]
pub enum AdvanceOutcome {
    Next { question: String, score: ScoreRecord },
    Completed { score: ScoreRecord },
    AlreadyComplete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Increase,
    Maintain,
    Decrease,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Focus {
    AdvancedTechnical,
    Balanced,
    Fundamentals,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct Pacing {
    pub difficulty: Difficulty,
    pub focus: Focus,
}

impl Pacing {
    pub fn from_average(average: Option<f64>) -> Self {
        match average {
            Some(avg) if avg >= 8.0 => Pacing {
                difficulty: Difficulty::Increase,
                focus: Focus::AdvancedTechnical,
            },
            Some(avg) if avg < 6.0 => Pacing {
                difficulty: Difficulty::Decrease,
                focus: Focus::Fundamentals,
            },
            _ => Pacing {
                difficulty: Difficulty::Maintain,
                focus: Focus::Balanced,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct InterviewStatus {
    pub interview_id: Uuid,
    pub candidate_id: Uuid,
    pub role: String,
    pub state: InterviewState,
    pub answered: usize,
    pub total_questions: usize,
    pub current_question: Option<String>,
    pub average_score: Option<f64>,
    pub pacing: Pacing,
}

#[derive(Clone)]
pub struct InterviewService {
    store: Arc<dyn InterviewStore>,
    questions: QuestionService,
    scoring: ScoringService,
    locks: Arc<SessionLocks>,
    question_count: usize,
}

impl InterviewService {
    pub fn new(
        store: Arc<dyn InterviewStore>,
        questions: QuestionService,
        scoring: ScoringService,
        question_count: usize,
    ) -> Self {
        Self {
            store,
            questions,
            scoring,
            locks: Arc::new(SessionLocks::default()),
            question_count,
        }
    }

    pub async fn start(&self, candidate_id: Uuid, role: &str) -> Result<StartOutcome> {
        let candidate = self
            .store
            .get_candidate(candidate_id)
            .await?
            .ok_or_else(|| Error::NotFound("Candidate not found".to_string()))?;

        let questions = self
            .questions
            .generate_questions(&candidate.skills, role, self.question_count)
            .await;
        let interview = self
            .store
            .create_interview(candidate.id, role, &questions)
            .await?;

        tracing::info!(
            interview_id = %interview.id,
            candidate_id = %candidate.id,
            total_questions = interview.total_questions(),
            "Interview started"
        );

        Ok(StartOutcome {
            interview_id: interview.id,
            question: interview.current_question().map(str::to_string),
            total_questions: interview.total_questions(),
        })
    }

    /// Scores `answer` against the session's current question and moves the
    /// session forward. Submissions past the last question are a no-op.
    pub async fn advance(&self, interview_id: Uuid, answer: &str) -> Result<AdvanceOutcome> {
        let existing = self
            .store
            .get_interview(interview_id)
            .await?
            .ok_or_else(|| Error::NotFound("Interview not found".to_string()))?;
        if existing.current_question().is_none() {
            return Ok(AdvanceOutcome::AlreadyComplete);
        }

        let _guard = self.locks.acquire(interview_id).await;

        // Re-read under the lock; a concurrent advance may have moved the counter.
        let interview = self
            .store
            .get_interview(interview_id)
            .await?
            .ok_or_else(|| Error::NotFound("Interview not found".to_string()))?;

        let index = interview.answered();
        let total = interview.total_questions();
        let Some(question) = interview.current_question().map(str::to_string) else {
            tracing::debug!(%interview_id, answered = index, total, "Answer submitted to finished interview");
            return Ok(AdvanceOutcome::AlreadyComplete);
        };
        if interview.state() == InterviewState::Completed {
            return Ok(AdvanceOutcome::AlreadyComplete);
        }

        let score = self.scoring.score_answer(&question, answer).await;
        let completes = index + 1 == total;

        self.store
            .append_answer(
                interview_id,
                NewAnswer {
                    question_index: index as i32,
                    question,
                    answer: answer.to_string(),
                    score: score.clone(),
                },
                completes,
            )
            .await?;

        tracing::info!(%interview_id, question_index = index, score = score.score, "Answer recorded");

        if completes {
            tracing::info!(%interview_id, total, "Interview completed");
            return Ok(AdvanceOutcome::Completed { score });
        }

        let next = interview.questions[index + 1].clone();
        Ok(AdvanceOutcome::Next { question: next, score })
    }

    pub async fn status(&self, interview_id: Uuid) -> Result<InterviewStatus> {
        let interview = self
            .store
            .get_interview(interview_id)
            .await?
            .ok_or_else(|| Error::NotFound("Interview not found".to_string()))?;
        let answers = self.store.list_answers(interview_id).await?;

        let scores: Vec<f64> = answers.iter().map(|a| a.score.score).collect();
        let average = mean(&scores);

        Ok(InterviewStatus {
            interview_id: interview.id,
            candidate_id: interview.candidate_id,
            role: interview.role.clone(),
            state: interview.state(),
            answered: interview.answered(),
            total_questions: interview.total_questions(),
            current_question: interview.current_question().map(str::to_string),
            average_score: average.map(round1),
            pacing: Pacing::from_average(average),
        })
    }
}
