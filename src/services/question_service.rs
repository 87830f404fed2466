use serde_json::Value as JsonValue;

use crate::services::llm_service::{CapabilityOutput, GenerationConfig, LlmService};
use crate::utils::json_extract::strip_code_fences;

pub const DEFAULT_QUESTION_COUNT: usize = 10;

const TECHNICAL_DEPTH_QUESTIONS: [&str; 4] = [
    "Can you walk me through a complex algorithm you've implemented? What was the time complexity and how did you optimize it?",
    "Describe a challenging debugging scenario you encountered. What was the root cause and how did you solve it?",
    "Tell me about a performance optimization you made to an existing system. What metrics did you use to measure improvement?",
    "How would you design a scalable microservices architecture? What considerations would you keep in mind?",
];

const SYSTEM_DESIGN_QUESTIONS: [&str; 3] = [
    "Design a real-time chat application that can handle millions of users. What components would you use?",
    "How would you design a distributed cache system? What challenges would you face?",
    "Explain how you would implement a recommendation system. What algorithms would you consider?",
];

const SOFTWARE_ENGINEER_QUESTIONS: [&str; 4] = [
    "Describe your development workflow. How do you approach debugging and problem-solving?",
    "Tell me about a time when you had to learn a new technology quickly for a project.",
    "How do you handle code reviews and collaboration with team members?",
    "What's your approach to testing? How do you ensure code quality?",
];

const DATA_SCIENCE_QUESTIONS: [&str; 4] = [
    "Walk me through a machine learning project from start to finish.",
    "How do you evaluate model performance and handle overfitting?",
    "Describe a time when you had to explain complex technical concepts to non-technical stakeholders.",
    "What's your experience with A/B testing and statistical analysis?",
];

const GENERAL_ROLE_QUESTIONS: [&str; 4] = [
    "Describe a challenging project you worked on. What was your role and what was the outcome?",
    "How do you stay updated with industry trends and new technologies?",
    "Tell me about a time when you had to work under pressure or meet a tight deadline.",
    "How do you handle conflicting requirements from different stakeholders?",
];

const LEADERSHIP_QUESTIONS: [&str; 4] = [
    "Tell me about a time when you had to lead a team through a difficult technical challenge.",
    "Describe a situation where you had to mentor a junior developer. What was your approach?",
    "How do you handle disagreements with team members about technical decisions?",
    "What's your approach to learning new technologies and staying current with industry trends?",
];

const INDUSTRY_QUESTIONS: [&str; 3] = [
    "What emerging technologies do you think will have the biggest impact on our industry in the next 5 years?",
    "How do you think AI and machine learning will change software development?",
    "What's your opinion on the current state of software development practices and tools?",
];

const CODE_QUALITY_QUESTIONS: [&str; 3] = [
    "How do you ensure your code is maintainable and readable? What practices do you follow?",
    "Tell me about your experience with CI/CD pipelines. What tools have you used?",
    "How do you approach security in your applications? What considerations do you keep in mind?",
];

const LANGUAGE_SKILLS: [&str; 5] = ["python", "java", "javascript", "react", "node"];
const ML_SKILLS: [&str; 3] = ["machine learning", "deep learning", "ai"];
const DATA_CLOUD_SKILLS: [&str; 4] = ["sql", "database", "aws", "cloud"];

const SOFTWARE_ENGINEER_ROLES: [&str; 3] = ["software engineer", "developer", "programmer"];
const DATA_SCIENCE_ROLES: [&str; 2] = ["data scientist", "ml engineer"];

/// Only this many skills get a dedicated fallback question.
const SKILL_QUESTION_LIMIT: usize = 3;

#[derive(Clone)]
pub struct QuestionService {
    llm: LlmService,
}

impl QuestionService {
    pub fn new(llm: LlmService) -> Self {
        Self { llm }
    }

    /// Produces at most `count` questions for the skills and role. Falls back to
    /// [`fallback_questions`] whenever the language model is unavailable or its
    /// output is not a JSON array of strings.
    pub async fn generate_questions(&self, skills: &[String], role: &str, count: usize) -> Vec<String> {
        let prompt = build_prompt(skills, role, count);
        let Some(raw) = self
            .llm
            .generate("question_generation", &prompt, GenerationConfig::new(0.7, 2048))
            .await
        else {
            return fallback_questions(skills, role, count);
        };

        match parse_question_list(&raw) {
            CapabilityOutput::Parsed(mut questions) => {
                questions.truncate(count);
                tracing::info!(count = questions.len(), role, "Generated interview questions with LLM");
                questions
            }
            CapabilityOutput::Malformed(raw) => {
                tracing::warn!(
                    preview = %raw.chars().take(200).collect::<String>(),
                    "LLM question output was not a JSON array of strings, using fallback"
                );
                fallback_questions(skills, role, count)
            }
        }
    }
}

fn build_prompt(skills: &[String], role: &str, count: usize) -> String {
    let skills_str = if skills.is_empty() {
        "general skills".to_string()
    } else {
        skills.join(", ")
    };

    format!(
        "You are an expert technical interviewer conducting a comprehensive interview.\n\
         Generate exactly {count} diverse, challenging, and role-specific interview questions for a candidate applying for the role of '{role}'.\n\
         The candidate's key skills are: {skills_str}.\n\
         Questions should cover:\n\
         1. Technical depth and problem-solving (3-4 questions)\n\
         2. System design and architecture (2-3 questions)\n\
         3. Behavioral and leadership (2-3 questions)\n\
         4. Industry knowledge and trends (1-2 questions)\n\
         5. Code quality and best practices (1-2 questions)\n\
         Make questions progressively more challenging.\n\
         Respond with ONLY a JSON array of {count} strings, one question per element, and no other text."
    )
}

/// Strict contract: a JSON array whose string elements are the questions.
pub fn parse_question_list(raw: &str) -> CapabilityOutput<Vec<String>> {
    let body = strip_code_fences(raw);
    let Ok(JsonValue::Array(items)) = serde_json::from_str::<JsonValue>(body) else {
        return CapabilityOutput::Malformed(raw.to_string());
    };

    let questions: Vec<String> = items
        .iter()
        .filter_map(|item| item.as_str())
        .map(|q| q.trim().to_string())
        .filter(|q| !q.is_empty())
        .collect();

    if questions.is_empty() {
        CapabilityOutput::Malformed(raw.to_string())
    } else {
        CapabilityOutput::Parsed(questions)
    }
}

/// Deterministic question list used when no language model output is usable.
pub fn fallback_questions(skills: &[String], role: &str, count: usize) -> Vec<String> {
    let mut questions: Vec<String> = Vec::new();

    questions.extend(TECHNICAL_DEPTH_QUESTIONS.iter().map(|q| q.to_string()));
    questions.extend(SYSTEM_DESIGN_QUESTIONS.iter().map(|q| q.to_string()));

    for skill in skills.iter().take(SKILL_QUESTION_LIMIT) {
        questions.push(skill_question(skill));
    }

    let role_lower = role.trim().to_lowercase();
    let role_questions = if SOFTWARE_ENGINEER_ROLES.contains(&role_lower.as_str()) {
        &SOFTWARE_ENGINEER_QUESTIONS
    } else if DATA_SCIENCE_ROLES.contains(&role_lower.as_str()) {
        &DATA_SCIENCE_QUESTIONS
    } else {
        &GENERAL_ROLE_QUESTIONS
    };
    questions.extend(role_questions.iter().map(|q| q.to_string()));

    questions.extend(LEADERSHIP_QUESTIONS.iter().map(|q| q.to_string()));
    questions.extend(INDUSTRY_QUESTIONS.iter().map(|q| q.to_string()));
    questions.extend(CODE_QUALITY_QUESTIONS.iter().map(|q| q.to_string()));

    questions.truncate(count);
    questions
}

fn skill_question(skill: &str) -> String {
    let key = skill.trim().to_lowercase();
    if LANGUAGE_SKILLS.contains(&key.as_str()) {
        format!(
            "Can you walk me through a project where you used {}? What were the challenges and how did you solve them?",
            skill
        )
    } else if ML_SKILLS.contains(&key.as_str()) {
        format!(
            "Tell me about your experience with {}. What algorithms or frameworks have you worked with?",
            skill
        )
    } else if DATA_CLOUD_SKILLS.contains(&key.as_str()) {
        "Describe a database or cloud project you've worked on. What technologies did you use and what was the outcome?".to_string()
    } else {
        format!("How have you applied {} in your previous work?", skill)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::services::llm_service::MockLanguageModel;
    use std::sync::Arc;
    use std::time::Duration;

    fn skills(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn service_with(mock: MockLanguageModel) -> QuestionService {
        QuestionService::new(LlmService::new(Some(Arc::new(mock)), Duration::from_secs(5)))
    }

    #[test]
    fn fallback_for_python_aws_software_engineer() {
        let questions = fallback_questions(&skills(&["python", "aws"]), "Software Engineer", 10);

        assert_eq!(questions.len(), 10);
        assert_eq!(questions[0], TECHNICAL_DEPTH_QUESTIONS[0]);
        assert_eq!(questions[3], TECHNICAL_DEPTH_QUESTIONS[3]);
        assert_eq!(questions[6], SYSTEM_DESIGN_QUESTIONS[2]);
        assert_eq!(
            questions[7],
            "Can you walk me through a project where you used python? What were the challenges and how did you solve them?"
        );
        assert!(questions[8].starts_with("Describe a database or cloud project"));
        assert_eq!(questions[9], SOFTWARE_ENGINEER_QUESTIONS[0]);
    }

    #[test]
    fn fallback_is_deterministic() {
        let s = skills(&["rust", "machine learning", "sql", "react"]);
        let first = fallback_questions(&s, "Data Scientist", 30);
        let second = fallback_questions(&s, "Data Scientist", 30);
        assert_eq!(first, second);
    }

    #[test]
    fn fallback_uses_only_first_three_skills() {
        let s = skills(&["rust", "machine learning", "sql", "react"]);
        let questions = fallback_questions(&s, "Data Scientist", 100);

        assert_eq!(questions[7], "How have you applied rust in your previous work?");
        assert!(questions[8].contains("experience with machine learning"));
        assert!(questions[9].starts_with("Describe a database or cloud project"));
        assert_eq!(questions[10], DATA_SCIENCE_QUESTIONS[0]);
        assert!(!questions.iter().any(|q| q.contains("used react")));
        // 4 + 3 + 3 skills + 4 role + 4 + 3 + 3
        assert_eq!(questions.len(), 24);
    }

    #[test]
    fn unknown_role_gets_general_questions() {
        let questions = fallback_questions(&[], "Product Manager", 100);
        assert_eq!(questions[7], GENERAL_ROLE_QUESTIONS[0]);
        assert_eq!(questions.last().map(String::as_str), Some(CODE_QUALITY_QUESTIONS[2]));
    }

    #[test]
    fn role_match_is_case_insensitive() {
        let questions = fallback_questions(&[], "DEVELOPER", 8);
        assert_eq!(questions[7], SOFTWARE_ENGINEER_QUESTIONS[0]);
    }

    #[test]
    fn zero_count_yields_no_questions() {
        assert!(fallback_questions(&skills(&["python"]), "Developer", 0).is_empty());
    }

    #[test]
    fn parses_fenced_json_array() {
        let raw = "```json\n[\"What is ownership?\", \"  \", 3, \"Explain lifetimes.\"]\n```";
        assert_eq!(
            parse_question_list(raw),
            CapabilityOutput::Parsed(vec![
                "What is ownership?".to_string(),
                "Explain lifetimes.".to_string()
            ])
        );
    }

    #[test]
    fn numbered_lists_are_malformed() {
        let raw = "1. What is ownership?\n2. Explain lifetimes.";
        assert!(matches!(parse_question_list(raw), CapabilityOutput::Malformed(_)));
    }

    #[test]
    fn objects_and_empty_arrays_are_malformed() {
        assert!(matches!(parse_question_list(r#"{"questions": ["a"]}"#), CapabilityOutput::Malformed(_)));
        assert!(matches!(parse_question_list("[]"), CapabilityOutput::Malformed(_)));
    }

    #[tokio::test]
    async fn uses_llm_questions_and_truncates() {
        let mut mock = MockLanguageModel::new();
        mock.expect_generate()
            .times(1)
            .returning(|_, _| Ok(r#"["q1", "q2", "q3"]"#.to_string()));
        let questions = service_with(mock)
            .generate_questions(&skills(&["python"]), "Developer", 2)
            .await;
        assert_eq!(questions, vec!["q1", "q2"]);
    }

    #[tokio::test]
    async fn malformed_llm_output_falls_back() {
        let mut mock = MockLanguageModel::new();
        mock.expect_generate()
            .returning(|_, _| Ok("Sure! Here are some questions: ...".to_string()));
        let s = skills(&["python", "aws"]);
        let questions = service_with(mock).generate_questions(&s, "Software Engineer", 10).await;
        assert_eq!(questions, fallback_questions(&s, "Software Engineer", 10));
    }

    #[tokio::test]
    async fn llm_failure_falls_back() {
        let mut mock = MockLanguageModel::new();
        mock.expect_generate()
            .returning(|_, _| Err(Error::Llm("unauthorized".into())));
        let questions = service_with(mock).generate_questions(&[], "Developer", 5).await;
        assert_eq!(questions.len(), 5);
        assert_eq!(questions[0], TECHNICAL_DEPTH_QUESTIONS[0]);
    }

    #[tokio::test]
    async fn prompt_mentions_skills_and_role() {
        let mut mock = MockLanguageModel::new();
        mock.expect_generate()
            .withf(|prompt, _| prompt.contains("python, aws") && prompt.contains("'Backend Engineer'"))
            .returning(|_, _| Ok(r#"["q"]"#.to_string()));
        let questions = service_with(mock)
            .generate_questions(&skills(&["python", "aws"]), "Backend Engineer", 10)
            .await;
        assert_eq!(questions, vec!["q"]);
    }
}
