use crate::models::answer::{ScoreCategory, ScoreRecord, SubScores};
use crate::services::llm_service::{CapabilityOutput, GenerationConfig, LlmService};
use crate::utils::json_extract::{number_field, object_span, parse_object_span, string_field, string_list_field};
use crate::utils::rounding::mean;

const MIN_SUB_SCORE: i32 = 1;
const MAX_SUB_SCORE: i32 = 10;
const BASE_SUB_SCORE: i32 = 5;
const LONG_ANSWER_CHARS: usize = 200;
const SHORT_ANSWER_CHARS: usize = 100;
const STRENGTH_THRESHOLD: f64 = 7.0;

const TECH_KEYWORDS: [&str; 7] = [
    "algorithm",
    "complexity",
    "optimization",
    "architecture",
    "framework",
    "methodology",
    "pattern",
];
const EXPERIENCE_KEYWORDS: [&str; 6] = ["project", "experience", "worked on", "implemented", "developed", "built"];
const PROBLEM_SOLVING_KEYWORDS: [&str; 6] = ["step", "approach", "process", "method", "strategy", "solution"];
const CRITICAL_THINKING_KEYWORDS: [&str; 6] = ["consider", "trade-off", "alternative", "challenge", "limitation", "future"];
const COMMUNICATION_KEYWORDS: [&str; 6] = ["clearly", "specifically", "example", "because", "therefore", "however"];

const DEFAULT_FEEDBACK: &str = "Good answer with room for improvement.";
const DEFAULT_ASSESSMENT: &str = "Solid performance with areas for growth.";

#[derive(Clone)]
pub struct ScoringService {
    llm: LlmService,
}

impl ScoringService {
    pub fn new(llm: LlmService) -> Self {
        Self { llm }
    }

    /// Scores one answer. Never fails: unusable language model output degrades to
    /// [`fallback_score`].
    pub async fn score_answer(&self, question: &str, answer: &str) -> ScoreRecord {
        let prompt = build_prompt(question, answer);
        let Some(raw) = self
            .llm
            .generate("answer_scoring", &prompt, GenerationConfig::new(0.2, 1024))
            .await
        else {
            return fallback_score(answer);
        };

        match parse_score_response(&raw) {
            CapabilityOutput::Parsed(record) => record,
            CapabilityOutput::Malformed(_) => {
                tracing::warn!("LLM score output unusable, using heuristic scoring");
                fallback_score(answer)
            }
        }
    }
}

fn build_prompt(question: &str, answer: &str) -> String {
    format!(
        r#"You are an expert technical interviewer conducting a rigorous evaluation of a candidate's answer.

Question: {question}
Candidate's Answer: {answer}

Evaluate this answer using the following strict criteria:

1. TECHNICAL DEPTH (0-10 points):
   - Demonstrates deep understanding of concepts
   - Shows practical experience and real-world application
   - Mentions specific technologies, frameworks, or methodologies
   - Explains complex concepts clearly

2. PROBLEM-SOLVING APPROACH (0-10 points):
   - Shows systematic thinking and logical reasoning
   - Demonstrates analytical skills
   - Provides step-by-step solutions
   - Considers edge cases and trade-offs

3. COMMUNICATION SKILLS (0-10 points):
   - Clear, concise, and well-structured response
   - Uses appropriate technical terminology
   - Explains complex ideas in understandable terms
   - Shows confidence and professionalism

4. EXPERIENCE & EXAMPLES (0-10 points):
   - Provides specific, relevant examples from experience
   - Shows hands-on experience with technologies
   - Demonstrates learning from challenges and failures
   - Shows growth and continuous learning

5. CRITICAL THINKING (0-10 points):
   - Questions assumptions and considers alternatives
   - Shows awareness of industry trends and best practices
   - Demonstrates strategic thinking
   - Shows ability to think beyond immediate solutions

The overall score is the average of the five criteria (0-10 scale).

Respond with ONLY this JSON object:
{{
    "score": <average_score_0-10>,
    "technical_depth": <score_0-10>,
    "problem_solving": <score_0-10>,
    "communication": <score_0-10>,
    "experience": <score_0-10>,
    "critical_thinking": <score_0-10>,
    "feedback": "<detailed_feedback_explaining_scores>",
    "strengths": ["<strength1>", "<strength2>", "<strength3>"],
    "improvements": ["<improvement1>", "<improvement2>", "<improvement3>"],
    "suggestions": ["<suggestion1>", "<suggestion2>", "<suggestion3>"],
    "overall_assessment": "<comprehensive_assessment>"
}}

Be strict and honest in your evaluation. A score of 8-10 should be reserved for truly exceptional answers."#
    )
}

/// Interprets a scoring response: the JSON object span first, then a line scan.
pub fn parse_score_response(raw: &str) -> CapabilityOutput<ScoreRecord> {
    if object_span(raw).is_some() {
        if let Some(record) = parse_score_object(raw) {
            return CapabilityOutput::Parsed(record);
        }
    }
    match scan_score_lines(raw) {
        Some(record) => CapabilityOutput::Parsed(record),
        None => CapabilityOutput::Malformed(raw.to_string()),
    }
}

fn parse_score_object(raw: &str) -> Option<ScoreRecord> {
    let map = parse_object_span(raw)?;
    let present: Vec<(ScoreCategory, f64)> = ScoreCategory::ALL
        .iter()
        .filter_map(|c| number_field(&map, c.key()).map(|v| (*c, clamp_score(v))))
        .collect();

    // Missing dimensions take the supplied overall, else the mean of those present.
    let filler = match number_field(&map, "score") {
        Some(v) => clamp_score(v),
        None => mean(&present.iter().map(|(_, v)| *v).collect::<Vec<_>>())?,
    };

    let mut sub_scores = SubScores::uniform(filler);
    for (category, value) in present {
        sub_scores.set(category, value);
    }

    Some(ScoreRecord {
        score: sub_scores.overall(),
        sub_scores,
        feedback: string_field(&map, "feedback").unwrap_or_else(|| DEFAULT_FEEDBACK.to_string()),
        strengths: string_list_field(&map, "strengths"),
        improvements: string_list_field(&map, "improvements"),
        suggestions: string_list_field(&map, "suggestions"),
        overall_assessment: string_field(&map, "overall_assessment")
            .unwrap_or_else(|| DEFAULT_ASSESSMENT.to_string()),
    })
}

fn clamp_score(value: f64) -> f64 {
    value.clamp(0.0, MAX_SUB_SCORE as f64)
}

/// Last-resort reading of prose output: a 0-10 integer on a line mentioning
/// "score", and a line mentioning "feedback" or "evaluation".
fn scan_score_lines(raw: &str) -> Option<ScoreRecord> {
    let mut score: Option<i32> = None;
    let mut feedback: Option<String> = None;

    for line in raw.lines() {
        let line = line.trim().to_lowercase();
        if line.contains("score") && line.chars().any(|c| c.is_ascii_digit()) {
            if score.is_none() {
                score = line.split_whitespace().find_map(score_token);
            }
        } else if line.contains("feedback") || line.contains("evaluation") {
            let text = line.replace("feedback:", "").replace("evaluation:", "");
            let text = text.trim();
            if !text.is_empty() {
                feedback = Some(text.to_string());
            }
        }
    }

    let score = score?.clamp(MIN_SUB_SCORE, MAX_SUB_SCORE) as f64;
    let sub_scores = SubScores::uniform(score);
    Some(ScoreRecord {
        score: sub_scores.overall(),
        sub_scores,
        feedback: feedback.unwrap_or_else(|| DEFAULT_FEEDBACK.to_string()),
        strengths: vec!["Good technical understanding".to_string()],
        improvements: vec!["Could provide more specific examples".to_string()],
        suggestions: vec!["Consider adding more context and examples".to_string()],
        overall_assessment: DEFAULT_ASSESSMENT.to_string(),
    })
}

/// Accepts tokens like `7`, `7,`, `(7)` or `7/10`.
fn score_token(token: &str) -> Option<i32> {
    let head = token.split('/').next().unwrap_or(token);
    let digits = head.trim_matches(|c: char| !c.is_ascii_digit());
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    digits.parse::<i32>().ok().filter(|v| (0..=MAX_SUB_SCORE).contains(v))
}

fn count_keywords(text_lower: &str, keywords: &[&str]) -> usize {
    keywords.iter().filter(|k| text_lower.contains(*k)).count()
}

/// Deterministic keyword and length heuristic used without a language model.
pub fn fallback_score(answer: &str) -> ScoreRecord {
    let mut technical_depth = BASE_SUB_SCORE;
    let mut problem_solving = BASE_SUB_SCORE;
    let mut communication = BASE_SUB_SCORE;
    let mut experience = BASE_SUB_SCORE;
    let mut critical_thinking = BASE_SUB_SCORE;

    let length = answer.chars().count();
    if length > LONG_ANSWER_CHARS {
        communication += 2;
        experience += 1;
    } else if length < SHORT_ANSWER_CHARS {
        communication -= 2;
        experience -= 1;
    }

    let lower = answer.to_lowercase();

    match count_keywords(&lower, &TECH_KEYWORDS) {
        n if n >= 3 => {
            technical_depth += 3;
            problem_solving += 2;
        }
        n if n >= 1 => {
            technical_depth += 1;
            problem_solving += 1;
        }
        _ => technical_depth -= 1,
    }

    match count_keywords(&lower, &EXPERIENCE_KEYWORDS) {
        n if n >= 2 => {
            experience += 3;
            technical_depth += 1;
        }
        1 => experience += 1,
        _ => experience -= 2,
    }

    match count_keywords(&lower, &PROBLEM_SOLVING_KEYWORDS) {
        n if n >= 2 => {
            problem_solving += 2;
            critical_thinking += 1;
        }
        1 => problem_solving += 1,
        _ => {}
    }

    match count_keywords(&lower, &CRITICAL_THINKING_KEYWORDS) {
        n if n >= 2 => critical_thinking += 3,
        1 => critical_thinking += 1,
        _ => critical_thinking -= 1,
    }

    match count_keywords(&lower, &COMMUNICATION_KEYWORDS) {
        n if n >= 3 => communication += 2,
        n if n >= 1 => communication += 1,
        _ => {}
    }

    let clamp = |v: i32| v.clamp(MIN_SUB_SCORE, MAX_SUB_SCORE) as f64;
    let sub_scores = SubScores {
        technical_depth: clamp(technical_depth),
        problem_solving: clamp(problem_solving),
        communication: clamp(communication),
        experience: clamp(experience),
        critical_thinking: clamp(critical_thinking),
    };

    let mut strengths = Vec::new();
    let mut improvements = Vec::new();
    let mut suggestions = Vec::new();
    for category in ScoreCategory::ALL {
        let (strength, improvement, suggestion) = category_phrases(category);
        if sub_scores.get(category) >= STRENGTH_THRESHOLD {
            strengths.push(strength.to_string());
        } else {
            improvements.push(improvement.to_string());
            suggestions.push(suggestion.to_string());
        }
    }

    let score = sub_scores.overall();
    let overall_assessment = if score >= 8.0 {
        "Excellent answer demonstrating strong technical knowledge, problem-solving skills, and communication."
    } else if score >= 6.0 {
        "Good answer showing solid understanding with room for improvement in specific areas."
    } else {
        "Answer needs improvement in multiple areas. Focus on providing more specific examples and technical depth."
    };

    ScoreRecord {
        score,
        sub_scores,
        feedback: format!(
            "Technical Depth: {}/10, Problem Solving: {}/10, Communication: {}/10, Experience: {}/10, Critical Thinking: {}/10",
            sub_scores.technical_depth,
            sub_scores.problem_solving,
            sub_scores.communication,
            sub_scores.experience,
            sub_scores.critical_thinking
        ),
        strengths,
        improvements,
        suggestions,
        overall_assessment: overall_assessment.to_string(),
    }
}

fn category_phrases(category: ScoreCategory) -> (&'static str, &'static str, &'static str) {
    match category {
        ScoreCategory::TechnicalDepth => (
            "Strong technical knowledge",
            "Could demonstrate deeper technical understanding",
            "Provide more technical details and specific technologies",
        ),
        ScoreCategory::ProblemSolving => (
            "Good problem-solving approach",
            "Could show more systematic problem-solving",
            "Break down problems into steps and explain your reasoning",
        ),
        ScoreCategory::Communication => (
            "Clear communication",
            "Could improve clarity and structure",
            "Organize your thoughts and provide specific examples",
        ),
        ScoreCategory::Experience => (
            "Good practical experience",
            "Could provide more specific examples",
            "Share concrete examples from your work experience",
        ),
        ScoreCategory::CriticalThinking => (
            "Shows critical thinking",
            "Could demonstrate more analytical thinking",
            "Consider trade-offs and alternative approaches",
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::services::llm_service::MockLanguageModel;
    use std::sync::Arc;
    use std::time::Duration;

    fn service_with(mock: MockLanguageModel) -> ScoringService {
        ScoringService::new(LlmService::new(Some(Arc::new(mock)), Duration::from_secs(5)))
    }

    fn pad_to(mut text: String, len: usize) -> String {
        while text.chars().count() < len {
            text.push('.');
        }
        text
    }

    #[test]
    fn keyword_rich_long_answer_scores_well() {
        let base = "I implemented a caching algorithm and focused on optimization. My approach weighed each trade-off".to_string();
        let answer = pad_to(base, 250);
        assert_eq!(answer.chars().count(), 250);

        let record = fallback_score(&answer);
        let s = record.sub_scores;
        assert_eq!(s.technical_depth, 6.0);
        assert_eq!(s.problem_solving, 7.0);
        assert_eq!(s.communication, 7.0);
        assert_eq!(s.experience, 7.0);
        assert_eq!(s.critical_thinking, 6.0);
        assert_eq!(record.score, 6.6);
        assert!(record.overall_assessment.starts_with("Good answer"));
    }

    #[test]
    fn short_empty_answer_is_clamped_low() {
        let record = fallback_score("");
        let s = record.sub_scores;
        assert_eq!(s.technical_depth, 4.0);
        assert_eq!(s.problem_solving, 5.0);
        assert_eq!(s.communication, 3.0);
        assert_eq!(s.experience, 2.0);
        assert_eq!(s.critical_thinking, 4.0);
        assert_eq!(record.score, 3.6);
        assert!(record.strengths.is_empty());
        assert_eq!(record.improvements.len(), 5);
        assert_eq!(record.suggestions.len(), 5);
    }

    #[test]
    fn saturated_answer_stays_within_bounds() {
        let all: Vec<&str> = TECH_KEYWORDS
            .iter()
            .chain(EXPERIENCE_KEYWORDS.iter())
            .chain(PROBLEM_SOLVING_KEYWORDS.iter())
            .chain(CRITICAL_THINKING_KEYWORDS.iter())
            .chain(COMMUNICATION_KEYWORDS.iter())
            .copied()
            .collect();
        let answer = pad_to(all.join(" "), 400);
        let record = fallback_score(&answer);
        for category in ScoreCategory::ALL {
            let v = record.sub_scores.get(category);
            assert!((1.0..=10.0).contains(&v), "{:?} = {}", category, v);
        }
        assert_eq!(record.score, record.sub_scores.overall());
        assert_eq!(record.strengths.len(), 5);
    }

    #[test]
    fn fallback_bounds_hold_for_varied_inputs() {
        let repeated = "project ".repeat(80);
        let samples: [&str; 5] = [
            "",
            "yes",
            "Because of the architecture pattern, I built it step by step.",
            repeated.as_str(),
            "ÜNICODE ñ answer with challenge and alternative and future limitation consider",
        ];
        for sample in samples {
            let record = fallback_score(sample);
            for category in ScoreCategory::ALL {
                let v = record.sub_scores.get(category);
                assert!((1.0..=10.0).contains(&v));
            }
            assert_eq!(record.score, record.sub_scores.overall());
        }
    }

    #[test]
    fn feedback_lists_each_sub_score() {
        let record = fallback_score("");
        assert_eq!(
            record.feedback,
            "Technical Depth: 4/10, Problem Solving: 5/10, Communication: 3/10, Experience: 2/10, Critical Thinking: 4/10"
        );
    }

    #[test]
    fn json_in_prose_is_parsed_and_overall_recomputed() {
        let raw = r#"Here is the evaluation:
{"score": 9, "technical_depth": 8, "problem_solving": 7, "communication": 6, "experience": 5, "critical_thinking": 4,
 "feedback": "Decent", "strengths": ["depth"], "improvements": [], "suggestions": ["more examples"],
 "overall_assessment": "Okay"}
Hope this helps."#;
        let CapabilityOutput::Parsed(record) = parse_score_response(raw) else {
            panic!("expected parsed record");
        };
        assert_eq!(record.score, 6.0);
        assert_eq!(record.sub_scores.technical_depth, 8.0);
        assert_eq!(record.feedback, "Decent");
        assert_eq!(record.strengths, vec!["depth"]);
        assert_eq!(record.suggestions, vec!["more examples"]);
    }

    #[test]
    fn missing_sub_scores_default_to_overall() {
        let raw = r#"{"score": 7, "technical_depth": 9}"#;
        let record = parse_score_response(raw).parsed().expect("parsed");
        assert_eq!(record.sub_scores.technical_depth, 9.0);
        assert_eq!(record.sub_scores.communication, 7.0);
        assert_eq!(record.score, 7.4);
        assert_eq!(record.feedback, DEFAULT_FEEDBACK);
        assert!(record.improvements.is_empty());
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let raw = r#"{"technical_depth": 14, "problem_solving": -3, "communication": 5, "experience": 5, "critical_thinking": 5}"#;
        let record = parse_score_response(raw).parsed().expect("parsed");
        assert_eq!(record.sub_scores.technical_depth, 10.0);
        assert_eq!(record.sub_scores.problem_solving, 0.0);
        assert_eq!(record.score, 5.0);
    }

    #[test]
    fn line_scan_recovers_score_and_feedback() {
        let raw = "{broken json\nOverall Score: 8/10\nFeedback: clear and well structured\n}";
        let record = parse_score_response(raw).parsed().expect("parsed");
        assert_eq!(record.score, 8.0);
        assert_eq!(record.sub_scores.experience, 8.0);
        assert_eq!(record.feedback, "clear and well structured");
    }

    #[test]
    fn line_scan_clamps_zero_to_one() {
        let record = parse_score_response("score 0").parsed().expect("parsed");
        assert_eq!(record.score, 1.0);
    }

    #[test]
    fn prose_without_score_is_malformed() {
        assert!(matches!(
            parse_score_response("I cannot evaluate this answer."),
            CapabilityOutput::Malformed(_)
        ));
    }

    #[test]
    fn object_without_any_score_is_malformed() {
        assert!(matches!(
            parse_score_response(r#"{"feedback": "nice"}"#),
            CapabilityOutput::Malformed(_)
        ));
    }

    #[tokio::test]
    async fn non_json_capability_output_still_yields_valid_record() {
        let mut mock = MockLanguageModel::new();
        mock.expect_generate()
            .returning(|_, _| Ok("<html>502 Bad Gateway</html>".to_string()));
        let record = service_with(mock).score_answer("Q?", "short").await;
        assert_eq!(record, fallback_score("short"));
    }

    #[tokio::test]
    async fn capability_error_uses_fallback() {
        let mut mock = MockLanguageModel::new();
        mock.expect_generate()
            .returning(|_, _| Err(Error::Llm("timeout".into())));
        let record = service_with(mock).score_answer("Q?", "answer").await;
        assert_eq!(record, fallback_score("answer"));
    }

    #[tokio::test]
    async fn capability_json_is_used() {
        let mut mock = MockLanguageModel::new();
        mock.expect_generate()
            .withf(|prompt, _| prompt.contains("Question: Explain CAP") && prompt.contains("Candidate's Answer: Pick two"))
            .returning(|_, _| {
                Ok(r#"```json
{"score": 3, "technical_depth": 3, "problem_solving": 3, "communication": 3, "experience": 3, "critical_thinking": 3}
```"#
                    .to_string())
            });
        let record = service_with(mock).score_answer("Explain CAP", "Pick two").await;
        assert_eq!(record.score, 3.0);
        assert_eq!(record.overall_assessment, DEFAULT_ASSESSMENT);
    }
}
