use std::collections::BTreeMap;

use crate::models::answer::{AnswerRecord, ScoreCategory};
use crate::models::report::{FeedbackVerdict, HiringRecommendation, Potential};
use crate::services::llm_service::{CapabilityOutput, GenerationConfig, LlmService};
use crate::utils::json_extract::{parse_object_span, string_field, string_list_field};
use crate::utils::rounding::{mean, round1};

#[derive(Clone)]
pub struct FeedbackService {
    llm: LlmService,
}

impl FeedbackService {
    pub fn new(llm: LlmService) -> Self {
        Self { llm }
    }

    /// Folds all answer records of a session into one verdict.
    pub async fn compile_feedback(&self, answers: &[AnswerRecord]) -> FeedbackVerdict {
        if answers.is_empty() {
            return incomplete_verdict();
        }

        let prompt = build_prompt(answers);
        let Some(raw) = self
            .llm
            .generate("overall_feedback", &prompt, GenerationConfig::new(0.3, 2048))
            .await
        else {
            return fallback_verdict(answers);
        };

        match parse_verdict_response(&raw) {
            CapabilityOutput::Parsed(verdict) => verdict,
            CapabilityOutput::Malformed(_) => {
                tracing::warn!(answers = answers.len(), "LLM feedback output unusable, using heuristic verdict");
                fallback_verdict(answers)
            }
        }
    }

    /// Short prose summary of the transcript for the report header.
    pub async fn summarize(&self, role: &str, answers: &[AnswerRecord]) -> String {
        if answers.is_empty() {
            return fallback_summary(answers);
        }

        let prompt = build_summary_prompt(role, answers);
        match self
            .llm
            .generate("interview_summary", &prompt, GenerationConfig::new(0.3, 500))
            .await
        {
            Some(text) if !text.trim().is_empty() => text.trim().to_string(),
            _ => fallback_summary(answers),
        }
    }
}

pub fn fallback_summary(answers: &[AnswerRecord]) -> String {
    let avg = round1(average_score(answers));
    format!(
        "Candidate provided {} answers with average score {:.1}/10.",
        answers.len(),
        avg
    )
}

fn build_summary_prompt(role: &str, answers: &[AnswerRecord]) -> String {
    let transcript = answers
        .iter()
        .enumerate()
        .map(|(i, a)| format!("Q{}: {}\nA: {}\nScore: {}/10", i + 1, a.question, a.answer, a.score.score))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"Create a professional interview summary for a {role} position.

{transcript}

Include the overall assessment, strengths identified, areas for improvement, technical competency, communication skills and a recommendation.
Write a few sentences of plain prose in a professional, objective tone."#
    )
}

pub fn incomplete_verdict() -> FeedbackVerdict {
    FeedbackVerdict {
        overall_feedback: "No answers provided for evaluation.".to_string(),
        category_analysis: BTreeMap::new(),
        strengths: vec![],
        critical_weaknesses: vec!["Complete the interview to receive feedback".to_string()],
        recommendations: vec!["Please complete the interview process".to_string()],
        potential: Potential::Unknown,
        next_steps: vec!["Complete the interview".to_string()],
        hiring_recommendation: HiringRecommendation::Incomplete,
    }
}

fn category_means(answers: &[AnswerRecord]) -> Vec<(ScoreCategory, f64)> {
    ScoreCategory::ALL
        .iter()
        .map(|c| {
            let values: Vec<f64> = answers.iter().map(|a| a.score.sub_scores.get(*c)).collect();
            (*c, mean(&values).unwrap_or(0.0))
        })
        .collect()
}

fn average_score(answers: &[AnswerRecord]) -> f64 {
    let scores: Vec<f64> = answers.iter().map(|a| a.score.score).collect();
    mean(&scores).unwrap_or(0.0)
}

fn build_prompt(answers: &[AnswerRecord]) -> String {
    let summary = answers
        .iter()
        .enumerate()
        .map(|(i, a)| {
            let s = &a.score.sub_scores;
            format!(
                "Q{}: {}\nA: {}\nScores: Technical: {}/10, Problem Solving: {}/10, Communication: {}/10, Experience: {}/10, Critical Thinking: {}/10",
                i + 1,
                a.question,
                a.answer,
                s.technical_depth,
                s.problem_solving,
                s.communication,
                s.experience,
                s.critical_thinking
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let category_averages = category_means(answers)
        .iter()
        .map(|(c, v)| format!("{}: {:.1}", c.key(), v))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        r#"You are an expert technical interviewer providing comprehensive feedback for a candidate.

Interview Summary:
- Total Questions: {total}
- Average Score: {average:.1}/10
- Category Averages: {category_averages}

Individual Answers:
{summary}

Provide a rigorous evaluation including:
1. Overall assessment with specific strengths and weaknesses
2. Detailed analysis of each evaluation category (technical depth, problem-solving, communication, experience, critical thinking)
3. Specific areas where the candidate excels
4. Critical areas that need improvement
5. Actionable recommendations for growth
6. Whether the candidate shows potential for the role
7. Next steps for the candidate's development

Respond with ONLY this JSON object:
{{
    "overall_assessment": "<comprehensive_assessment>",
    "category_analysis": {{
        "technical_depth": "<analysis>",
        "problem_solving": "<analysis>",
        "communication": "<analysis>",
        "experience": "<analysis>",
        "critical_thinking": "<analysis>"
    }},
    "strengths": ["<strength1>", "<strength2>", "<strength3>"],
    "critical_weaknesses": ["<weakness1>", "<weakness2>"],
    "recommendations": ["<rec1>", "<rec2>", "<rec3>"],
    "potential": "<high/medium/low>",
    "next_steps": ["<step1>", "<step2>"],
    "hiring_recommendation": "<strong_hire/consider/reject>"
}}

Be strict and honest. Reserve "high" potential and "strong_hire" for truly exceptional candidates."#,
        total = answers.len(),
        average = average_score(answers),
    )
}

pub fn parse_verdict_response(raw: &str) -> CapabilityOutput<FeedbackVerdict> {
    let Some(map) = parse_object_span(raw) else {
        return CapabilityOutput::Malformed(raw.to_string());
    };

    let category_analysis = map
        .get("category_analysis")
        .and_then(|v| v.as_object())
        .map(|obj| {
            obj.iter()
                .filter_map(|(k, v)| v.as_str().map(|s| (k.clone(), s.trim().to_string())))
                .filter(|(_, s)| !s.is_empty())
                .collect()
        })
        .unwrap_or_default();

    CapabilityOutput::Parsed(FeedbackVerdict {
        overall_feedback: string_field(&map, "overall_assessment")
            .unwrap_or_else(|| "Good performance overall.".to_string()),
        category_analysis,
        strengths: string_list_field(&map, "strengths"),
        critical_weaknesses: string_list_field(&map, "critical_weaknesses"),
        recommendations: string_list_field(&map, "recommendations"),
        potential: string_field(&map, "potential")
            .and_then(|p| Potential::parse(&p))
            .unwrap_or(Potential::Medium),
        next_steps: string_list_field(&map, "next_steps"),
        hiring_recommendation: string_field(&map, "hiring_recommendation")
            .and_then(|h| HiringRecommendation::parse(&h))
            .unwrap_or(HiringRecommendation::Consider),
    })
}

/// Band-based verdict used without a language model.
pub fn fallback_verdict(answers: &[AnswerRecord]) -> FeedbackVerdict {
    if answers.is_empty() {
        return incomplete_verdict();
    }

    let category_analysis = category_means(answers)
        .into_iter()
        .map(|(category, avg)| {
            let name = category.label();
            let text = if avg >= 8.0 {
                format!("Excellent {} demonstrated consistently.", name)
            } else if avg >= 6.0 {
                format!("Good {} with room for improvement.", name)
            } else {
                format!("Needs significant improvement in {}.", name)
            };
            (category.key().to_string(), text)
        })
        .collect();

    // Banded on the one-decimal average the report publishes.
    let avg = round1(average_score(answers));
    let (overall, potential, hiring) = if avg >= 8.0 {
        (
            "Excellent performance demonstrating strong technical knowledge, problem-solving skills, and communication.",
            Potential::High,
            HiringRecommendation::StrongHire,
        )
    } else if avg >= 6.0 {
        (
            "Good performance with solid technical foundation and room for growth.",
            Potential::Medium,
            HiringRecommendation::Consider,
        )
    } else {
        (
            "Performance indicates need for improvement in technical knowledge and communication.",
            Potential::Low,
            HiringRecommendation::Reject,
        )
    };

    FeedbackVerdict {
        overall_feedback: overall.to_string(),
        category_analysis,
        strengths: owned(&["Technical knowledge", "Communication skills"]),
        critical_weaknesses: owned(&["Could provide more specific examples", "Consider expanding technical depth"]),
        recommendations: owned(&[
            "Continue learning new technologies",
            "Practice technical interviews",
            "Build more projects",
        ]),
        potential,
        next_steps: owned(&["Review technical concepts", "Practice coding problems", "Build portfolio projects"]),
        hiring_recommendation: hiring,
    }
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
