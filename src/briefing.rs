//! Read-only candidate briefing assembled from pipeline state.

use crate::{
    audit::AgentAction,
    config::Scoring,
    error::PipelineError,
    model::{Candidate, CandidateStatus, Decision, HumanDecision},
    scoring::{self, ScoreTier},
    state::PipelineState,
};
use serde::Serialize;

/// Skills that count as a strong match for the role.
const STRONG_MATCH_SKILLS: [&str; 5] = [
    "React",
    "WCAG",
    "Accessibility",
    "Team Leadership",
    "Mentoring",
];
const ALIGNMENT_SKILLS: usize = 4;
const REASONING_HIGHLIGHTS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileReading {
    Leadership,
    IndividualContributor,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkillMatch {
    pub skill: String,
    pub strong: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NextStep {
    #[serde(rename = "Panel Interview")]
    PanelInterview,
    Rejection,
    #[serde(rename = "Further Review")]
    FurtherReview,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnQuality {
    Excellent,
    Adequate,
    Poor,
}

impl From<ScoreTier> for TurnQuality {
    fn from(tier: ScoreTier) -> Self {
        match tier {
            ScoreTier::Strong => TurnQuality::Excellent,
            ScoreTier::Moderate => TurnQuality::Adequate,
            ScoreTier::Weak => TurnQuality::Poor,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TurnReading {
    pub question: String,
    pub score: u8,
    pub quality: TurnQuality,
}

/// How the reviewer's call compares with the score-derived recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Alignment {
    pub ai_recommendation: Decision,
    pub human_decision: Decision,
    pub overridden: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "level", content = "concerns", rename_all = "snake_case")]
pub enum RiskAssessment {
    NoSignificantRisk,
    Concerns(Vec<String>),
}

#[derive(Debug, Clone, Serialize)]
pub struct Briefing {
    pub candidate: Candidate,
    pub profile: ProfileReading,
    pub skill_alignment: Vec<SkillMatch>,
    pub semantic_strength: ScoreTier,
    pub semantic_summary: String,
    pub semantic_reasoning: Vec<String>,
    pub interview_strength: ScoreTier,
    pub interview_turns: Vec<TurnReading>,
    pub risk: RiskAssessment,
    pub next_step: NextStep,
    pub decision: Option<HumanDecision>,
    pub alignment: Option<Alignment>,
    pub actions: Vec<AgentAction>,
}

impl Briefing {
    /// Prefers the ranked record (with a resolved status) when the run has
    /// reached ranking, otherwise the live candidate.
    pub fn build(
        cfg: &Scoring,
        state: &PipelineState,
        candidate_id: &str,
    ) -> Result<Self, PipelineError> {
        let candidate = state
            .ranking
            .iter()
            .find(|c| c.id == candidate_id)
            .or_else(|| state.candidate(candidate_id))
            .cloned()
            .ok_or_else(|| PipelineError::UnknownCandidate(candidate_id.to_string()))?;

        let profile = if candidate.skills.iter().any(|s| s == "Team Leadership") {
            ProfileReading::Leadership
        } else {
            ProfileReading::IndividualContributor
        };

        let skill_alignment = candidate
            .skills
            .iter()
            .take(ALIGNMENT_SKILLS)
            .map(|s| SkillMatch {
                skill: s.clone(),
                strong: STRONG_MATCH_SKILLS.contains(&s.as_str()),
            })
            .collect();

        let next_step = match candidate.status {
            Some(CandidateStatus::Recommended) => NextStep::PanelInterview,
            Some(CandidateStatus::Rejected) => NextStep::Rejection,
            _ => NextStep::FurtherReview,
        };

        let semantic_strength = scoring::tier(cfg, candidate.semantic());
        let semantic_summary = format!(
            "Semantic analysis reveals {} alignment with role requirements. \
             Key factors: {} positive indicators, {} areas of concern.",
            semantic_strength.as_str(),
            candidate.highlights.len(),
            candidate.concerns.len()
        );

        let interview_turns = candidate
            .interview_responses
            .iter()
            .map(|t| TurnReading {
                question: t.question.clone(),
                score: t.score,
                quality: scoring::tier(cfg, t.score).into(),
            })
            .collect();

        let risk = if candidate.concerns.is_empty() {
            RiskAssessment::NoSignificantRisk
        } else {
            RiskAssessment::Concerns(candidate.concerns.clone())
        };

        let decision = state.decision_for(candidate_id).cloned();
        let alignment = decision.as_ref().map(|d| {
            let ai = scoring::ai_recommendation(cfg, &candidate);
            Alignment {
                ai_recommendation: ai,
                human_decision: d.decision,
                overridden: ai != d.decision,
            }
        });

        Ok(Self {
            profile,
            skill_alignment,
            semantic_strength,
            semantic_summary,
            semantic_reasoning: candidate
                .highlights
                .iter()
                .take(REASONING_HIGHLIGHTS)
                .cloned()
                .collect(),
            interview_strength: scoring::tier(cfg, candidate.interview()),
            interview_turns,
            risk,
            next_step,
            decision,
            alignment,
            actions: state.log.for_candidate(candidate_id).cloned().collect(),
            candidate,
        })
    }
}
