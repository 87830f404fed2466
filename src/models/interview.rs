use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum InterviewState {
    InProgress,
    Completed,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Interview {
    pub id: Uuid,
    pub candidate_id: Uuid,
    pub role: String,
    /// Generated once when the interview starts; the index of each entry is the
    /// `question_index` of the answer that responds to it.
    pub questions: Vec<String>,
    pub answer_count: i32,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Interview {
    pub fn state(&self) -> InterviewState {
        if self.completed_at.is_some() {
            InterviewState::Completed
        } else {
            InterviewState::InProgress
        }
    }

    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    pub fn answered(&self) -> usize {
        self.answer_count.max(0) as usize
    }

    /// The question awaiting an answer, if any remain.
    pub fn current_question(&self) -> Option<&str> {
        self.questions.get(self.answered()).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn interview(questions: &[&str], answer_count: i32) -> Interview {
        Interview {
            id: Uuid::new_v4(),
            candidate_id: Uuid::new_v4(),
            role: "Software Engineer".into(),
            questions: questions.iter().map(|q| q.to_string()).collect(),
            answer_count,
            started_at: Utc::now(),
            completed_at: None,
        }
    }

    #[test]
    fn current_question_follows_answer_count() {
        let iv = interview(&["q1", "q2"], 1);
        assert_eq!(iv.current_question(), Some("q2"));
        assert_eq!(iv.state(), InterviewState::InProgress);
    }

    #[test]
    fn no_current_question_once_exhausted() {
        let mut iv = interview(&["q1"], 1);
        iv.completed_at = Some(Utc::now());
        assert_eq!(iv.current_question(), None);
        assert_eq!(iv.state(), InterviewState::Completed);
    }
}
