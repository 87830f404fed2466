use std::sync::Arc;

use regex::Regex;

use crate::database::InterviewStore;
use crate::error::{Error, Result};
use crate::models::candidate::{Candidate, NewCandidate};

/// Keywords recognised as skills, reported in this order.
pub const SKILL_KEYWORDS: [&str; 21] = [
    "python",
    "java",
    "c++",
    "machine learning",
    "deep learning",
    "react",
    "node",
    "sql",
    "aws",
    "docker",
    "kubernetes",
    "project management",
    "communication",
    "leadership",
    "data analysis",
    "nlp",
    "devops",
    "cloud",
    "api",
    "typescript",
    "javascript",
];

const STORED_TEXT_CHARS: usize = 1000;

/// Where a resume comes from.
#[derive(Debug, Clone)]
pub enum ResumeSource {
    Pdf(Vec<u8>),
    ProfileUrl(String),
}

pub fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

pub async fn extract_pdf_text(bytes: Vec<u8>) -> Result<String> {
    // pdf-extract is synchronous and can panic on malformed input.
    tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
        .await
        .map_err(|e| Error::BadRequest(format!("Could not read PDF: {}", e)))?
        .map_err(|e| Error::BadRequest(format!("PDF extraction error: {}", e)))
}

#[derive(Clone)]
pub struct ResumeService {
    store: Arc<dyn InterviewStore>,
    matchers: Arc<Vec<(&'static str, Regex)>>,
}

impl ResumeService {
    pub fn new(store: Arc<dyn InterviewStore>) -> Result<Self> {
        let matchers = SKILL_KEYWORDS
            .iter()
            .map(|skill| {
                // `\b` cannot sit next to `+`, so boundaries are spelled out.
                let pattern = format!(r"(?i)(?:^|\W){}(?:\W|$)", regex::escape(skill));
                Regex::new(&pattern)
                    .map(|re| (*skill, re))
                    .map_err(|e| Error::Internal(format!("Invalid skill pattern: {}", e)))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            store,
            matchers: Arc::new(matchers),
        })
    }

    /// Whole-word, case-insensitive skill matches in catalog order.
    pub fn extract_skills(&self, text: &str) -> Vec<String> {
        self.matchers
            .iter()
            .filter(|(_, re)| re.is_match(text))
            .map(|(skill, _)| skill.to_string())
            .collect()
    }

    pub async fn ingest(
        &self,
        source: Option<ResumeSource>,
        name: Option<String>,
        email: Option<String>,
    ) -> Result<Candidate> {
        let (resume_text, skills) = match source {
            Some(ResumeSource::Pdf(bytes)) => {
                let text = extract_pdf_text(bytes).await?;
                let skills = self.extract_skills(&text);
                (Some(truncate_chars(&text, STORED_TEXT_CHARS)), skills)
            }
            Some(ResumeSource::ProfileUrl(url)) => {
                tracing::info!(%url, "Profile URL submitted; profile import is not supported, storing empty resume");
                (Some(String::new()), Vec::new())
            }
            None => {
                return Err(Error::BadRequest(
                    "Either a PDF file or a profile URL is required".to_string(),
                ))
            }
        };

        let candidate = self
            .store
            .create_candidate(NewCandidate {
                name,
                email,
                resume_text,
                skills,
            })
            .await?;

        tracing::info!(candidate_id = %candidate.id, skills = candidate.skills.len(), "Candidate created from resume");
        Ok(candidate)
    }
}
