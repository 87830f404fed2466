use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Potential {
    High,
    Medium,
    Low,
    Unknown,
}

impl Potential {
    /// Parses the values a language model may return; anything unrecognised is `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "high" => Some(Potential::High),
            "medium" => Some(Potential::Medium),
            "low" => Some(Potential::Low),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Potential::High => "high",
            Potential::Medium => "medium",
            Potential::Low => "low",
            Potential::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum HiringRecommendation {
    StrongHire,
    Consider,
    Reject,
    Incomplete,
}

impl HiringRecommendation {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().replace([' ', '-'], "_").as_str() {
            "strong_hire" => Some(HiringRecommendation::StrongHire),
            "consider" => Some(HiringRecommendation::Consider),
            "reject" => Some(HiringRecommendation::Reject),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            HiringRecommendation::StrongHire => "strong_hire",
            HiringRecommendation::Consider => "consider",
            HiringRecommendation::Reject => "reject",
            HiringRecommendation::Incomplete => "incomplete",
        }
    }
}

/// Overall verdict compiled from all answers of an interview.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FeedbackVerdict {
    pub overall_feedback: String,
    /// Keyed by category (`technical_depth`, `problem_solving`, ...).
    pub category_analysis: BTreeMap<String, String>,
    pub strengths: Vec<String>,
    pub critical_weaknesses: Vec<String>,
    pub recommendations: Vec<String>,
    pub potential: Potential,
    pub next_steps: Vec<String>,
    pub hiring_recommendation: HiringRecommendation,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AnswerDetail {
    pub question_index: i32,
    pub question: String,
    pub answer: String,
    pub score: f64,
    pub technical_depth: f64,
    pub problem_solving: f64,
    pub communication: f64,
    pub experience: f64,
    pub critical_thinking: f64,
    pub feedback: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AggregateReport {
    pub interview_id: Uuid,
    pub candidate_name: String,
    pub role: String,
    pub total_score: f64,
    pub average_score: f64,
    pub summary: String,
    pub answers: Vec<AnswerDetail>,
    #[serde(flatten)]
    pub verdict: FeedbackVerdict,
}
