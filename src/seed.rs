use crate::{
    config::Config,
    model::{Candidate, CandidateStatus, InterviewTurn, JobData, LearningInsight},
};
use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Job posting plus the candidates screened against it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roster {
    pub job: JobData,
    pub candidates: Vec<Candidate>,
}

impl Roster {
    /// The roster named by `seed.roster_path`, or the built-in one.
    pub fn from_config(cfg: &Config) -> Result<Self> {
        if cfg.seed.roster_path.is_empty() {
            return Ok(Self::builtin());
        }
        Self::load(Path::new(&cfg.seed.roster_path))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading roster: {}", path.display()))?;
        let roster: Roster =
            toml::from_str(&raw).with_context(|| format!("parsing roster: {}", path.display()))?;
        roster.validate()?;
        Ok(roster)
    }

    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for c in &self.candidates {
            if c.id.trim().is_empty() {
                return Err(anyhow!("candidate with empty id: {}", c.name));
            }
            if !seen.insert(c.id.as_str()) {
                return Err(anyhow!("duplicate candidate id: {}", c.id));
            }
            for (label, score) in [
                ("semantic_score", c.semantic_score),
                ("interview_score", c.interview_score),
                ("final_score", c.final_score),
            ] {
                if let Some(s) = score {
                    if s > 100 {
                        return Err(anyhow!("{label} out of range for {}: {s}", c.id));
                    }
                }
            }
        }
        Ok(())
    }

    pub fn find(&self, candidate_id: &str) -> Option<&Candidate> {
        self.candidates.iter().find(|c| c.id == candidate_id)
    }

    pub fn builtin() -> Self {
        Self {
            job: builtin_job(),
            candidates: vec![sarah_ahmed(), john_doe()],
        }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn turn(question: &str, answer: &str, score: u8) -> InterviewTurn {
    InterviewTurn {
        question: question.into(),
        answer: answer.into(),
        score,
    }
}

fn builtin_job() -> JobData {
    JobData {
        title: "Frontend Engineer".into(),
        description: "Frontend Engineer with React & accessibility focus. Mentor junior devs. \
                      Collaborate with cross-functional teams."
            .into(),
        requirements: strings(&["React", "JavaScript", "CSS", "Accessibility", "Mentoring"]),
        unwritten_needs: strings(&[
            "Team collaboration",
            "Growth mindset",
            "Communication skills",
            "Mentorship potential",
        ]),
    }
}

fn sarah_ahmed() -> Candidate {
    Candidate {
        id: "1".into(),
        name: "Sarah Ahmed".into(),
        experience: "5 yrs React, 1 yr WCAG work, led team workshops. \
                     Created Storybook design system for GovTech."
            .into(),
        skills: strings(&["React", "WCAG", "Storybook", "Team Leadership", "Design Systems"]),
        semantic_score: Some(94),
        interview_score: Some(90),
        final_score: Some(92),
        status: Some(CandidateStatus::Recommended),
        highlights: strings(&[
            "Strong accessibility experience with WCAG",
            "Proven mentorship through team workshops",
            "Design system creation shows systematic thinking",
            "Government sector experience indicates attention to compliance",
        ]),
        concerns: Vec::new(),
        interview_responses: vec![
            turn(
                "Tell me about a time you led accessibility work.",
                "I led the accessibility audit for our government portal, implementing WCAG 2.1 AA \
                 standards. I created training materials and conducted workshops for the team, \
                 resulting in 100% compliance and improved user satisfaction scores.",
                95,
            ),
            turn(
                "How do you handle feedback?",
                "I view feedback as growth opportunities. When our design system received \
                 criticism, I organized stakeholder sessions to understand concerns and \
                 iteratively improved it based on user needs.",
                88,
            ),
            turn(
                "What excites you about frontend work?",
                "Creating inclusive experiences that work for everyone. I love the challenge of \
                 making complex interfaces simple and accessible, especially when it helps \
                 underserved communities access important services.",
                92,
            ),
        ],
    }
}

fn john_doe() -> Candidate {
    Candidate {
        id: "2".into(),
        name: "John Doe".into(),
        experience: "7 yrs React, high-speed prototyping. No accessibility experience. \
                     Strong solo contributor."
            .into(),
        skills: strings(&["React", "Prototyping", "Performance Optimization", "Solo Work"]),
        semantic_score: Some(72),
        interview_score: Some(45),
        final_score: Some(56),
        status: Some(CandidateStatus::NeedsReview),
        highlights: strings(&[
            "Extensive React experience (7 years)",
            "Strong technical prototyping skills",
            "Performance optimization expertise",
        ]),
        concerns: strings(&[
            "No accessibility experience",
            "Limited team collaboration evidence",
            "Weak mentorship indicators",
            "Poor communication in interview responses",
        ]),
        interview_responses: vec![
            turn(
                "Tell me about a time you led accessibility work.",
                "I haven't really worked on accessibility stuff. I focus more on making things \
                 fast and functional.",
                20,
            ),
            turn(
                "How do you handle feedback?",
                "I usually know what I'm doing so I don't need much feedback. If someone has an \
                 issue I'll fix it.",
                35,
            ),
            turn(
                "What excites you about frontend work?",
                "Building cool features and solving technical challenges. I like working on \
                 complex algorithms and optimization problems.",
                65,
            ),
        ],
    }
}

/// Patterns the memory stage reports. Static content, not derived from the run.
pub fn learning_insights() -> Vec<LearningInsight> {
    vec![
        LearningInsight {
            pattern: "Accessibility Experience".into(),
            insight: "Candidates with WCAG experience show 40% higher success rate".into(),
            confidence: 85,
            sample_size: 12,
        },
        LearningInsight {
            pattern: "Communication Style".into(),
            insight: "Detailed, empathetic responses correlate with team fit".into(),
            confidence: 78,
            sample_size: 8,
        },
        LearningInsight {
            pattern: "Solo vs Team Work".into(),
            insight: "Pure solo contributors struggle in collaborative roles".into(),
            confidence: 92,
            sample_size: 15,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_roster_is_valid() {
        let roster = Roster::builtin();
        roster.validate().unwrap();
        assert_eq!(roster.candidates.len(), 2);
        assert_eq!(roster.find("2").unwrap().final_score, Some(56));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let mut roster = Roster::builtin();
        roster.candidates[1].id = "1".into();
        assert!(roster.validate().is_err());
    }

    #[test]
    fn out_of_range_score_is_rejected() {
        let mut roster = Roster::builtin();
        roster.candidates[0].final_score = Some(101);
        assert!(roster.validate().is_err());
    }
}
