use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::utils::rounding::round1;

/// The five evaluation dimensions every answer is scored on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreCategory {
    TechnicalDepth,
    ProblemSolving,
    Communication,
    Experience,
    CriticalThinking,
}

impl ScoreCategory {
    pub const ALL: [ScoreCategory; 5] = [
        ScoreCategory::TechnicalDepth,
        ScoreCategory::ProblemSolving,
        ScoreCategory::Communication,
        ScoreCategory::Experience,
        ScoreCategory::CriticalThinking,
    ];

    pub fn key(self) -> &'static str {
        match self {
            ScoreCategory::TechnicalDepth => "technical_depth",
            ScoreCategory::ProblemSolving => "problem_solving",
            ScoreCategory::Communication => "communication",
            ScoreCategory::Experience => "experience",
            ScoreCategory::CriticalThinking => "critical_thinking",
        }
    }

    /// Human readable name, e.g. "technical depth".
    pub fn label(self) -> &'static str {
        match self {
            ScoreCategory::TechnicalDepth => "technical depth",
            ScoreCategory::ProblemSolving => "problem solving",
            ScoreCategory::Communication => "communication",
            ScoreCategory::Experience => "experience",
            ScoreCategory::CriticalThinking => "critical thinking",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SubScores {
    pub technical_depth: f64,
    pub problem_solving: f64,
    pub communication: f64,
    pub experience: f64,
    pub critical_thinking: f64,
}

impl SubScores {
    pub fn uniform(score: f64) -> Self {
        Self {
            technical_depth: score,
            problem_solving: score,
            communication: score,
            experience: score,
            critical_thinking: score,
        }
    }

    pub fn get(&self, category: ScoreCategory) -> f64 {
        match category {
            ScoreCategory::TechnicalDepth => self.technical_depth,
            ScoreCategory::ProblemSolving => self.problem_solving,
            ScoreCategory::Communication => self.communication,
            ScoreCategory::Experience => self.experience,
            ScoreCategory::CriticalThinking => self.critical_thinking,
        }
    }

    pub fn set(&mut self, category: ScoreCategory, value: f64) {
        match category {
            ScoreCategory::TechnicalDepth => self.technical_depth = value,
            ScoreCategory::ProblemSolving => self.problem_solving = value,
            ScoreCategory::Communication => self.communication = value,
            ScoreCategory::Experience => self.experience = value,
            ScoreCategory::CriticalThinking => self.critical_thinking = value,
        }
    }

    /// Overall score: mean of the five sub-scores, one decimal.
    pub fn overall(&self) -> f64 {
        let sum: f64 = ScoreCategory::ALL.iter().map(|c| self.get(*c)).sum();
        round1(sum / ScoreCategory::ALL.len() as f64)
    }
}

/// Outcome of scoring one answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ScoreRecord {
    pub score: f64,
    #[serde(flatten)]
    pub sub_scores: SubScores,
    pub feedback: String,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    pub suggestions: Vec<String>,
    pub overall_assessment: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AnswerRecord {
    pub id: Uuid,
    pub interview_id: Uuid,
    pub question_index: i32,
    pub question: String,
    pub answer: String,
    #[serde(flatten)]
    pub score: ScoreRecord,
    pub created_at: DateTime<Utc>,
}

/// An answer ready to be appended to a session.
#[derive(Debug, Clone)]
pub struct NewAnswer {
    pub question_index: i32,
    pub question: String,
    pub answer: String,
    pub score: ScoreRecord,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overall_is_rounded_mean() {
        let scores = SubScores {
            technical_depth: 6.0,
            problem_solving: 7.0,
            communication: 7.0,
            experience: 7.0,
            critical_thinking: 6.0,
        };
        assert_eq!(scores.overall(), 6.6);
    }

    #[test]
    fn set_and_get_round_trip_per_category() {
        let mut scores = SubScores::uniform(5.0);
        scores.set(ScoreCategory::Experience, 9.0);
        assert_eq!(scores.get(ScoreCategory::Experience), 9.0);
        assert_eq!(scores.get(ScoreCategory::Communication), 5.0);
    }

    #[test]
    fn score_record_serializes_flat() {
        let record = ScoreRecord {
            score: 5.0,
            sub_scores: SubScores::uniform(5.0),
            feedback: "ok".into(),
            strengths: vec![],
            improvements: vec![],
            suggestions: vec![],
            overall_assessment: "fine".into(),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["technical_depth"], 5.0);
        assert_eq!(json["score"], 5.0);
    }
}
