use serde::{Deserialize, Serialize};
use std::fmt;
use time::OffsetDateTime;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterviewTurn {
    pub question: String,
    pub answer: String,
    pub score: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CandidateStatus {
    Recommended,
    NeedsReview,
    Rejected,
}

impl fmt::Display for CandidateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CandidateStatus::Recommended => "recommended",
            CandidateStatus::NeedsReview => "needs-review",
            CandidateStatus::Rejected => "rejected",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: String,
    pub name: String,
    pub experience: String,
    pub skills: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub semantic_score: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interview_score: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_score: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<CandidateStatus>,
    #[serde(default)]
    pub highlights: Vec<String>,
    #[serde(default)]
    pub concerns: Vec<String>,
    #[serde(default)]
    pub interview_responses: Vec<InterviewTurn>,
}

impl Candidate {
    /// Identity fields only, as produced by CV intake.
    pub fn profile(&self) -> Candidate {
        Candidate {
            id: self.id.clone(),
            name: self.name.clone(),
            experience: self.experience.clone(),
            skills: self.skills.clone(),
            semantic_score: None,
            interview_score: None,
            final_score: None,
            status: None,
            highlights: Vec::new(),
            concerns: Vec::new(),
            interview_responses: Vec::new(),
        }
    }

    pub fn semantic(&self) -> u8 {
        self.semantic_score.unwrap_or(0)
    }

    pub fn interview(&self) -> u8 {
        self.interview_score.unwrap_or(0)
    }

    pub fn confidence(&self) -> u8 {
        self.final_score.unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobData {
    pub title: String,
    pub description: String,
    pub requirements: Vec<String>,
    pub unwritten_needs: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Approve,
    Reject,
}

impl Decision {
    pub fn past_tense(self) -> &'static str {
        match self {
            Decision::Approve => "approved",
            Decision::Reject => "rejected",
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Decision::Approve => "approve",
            Decision::Reject => "reject",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HumanDecision {
    pub candidate_id: String,
    pub decision: Decision,
    pub rationale: String,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearningInsight {
    pub pattern: String,
    pub insight: String,
    pub confidence: u8,
    pub sample_size: u32,
}
