use crate::{
    audit::Outcome,
    config::Scoring,
    model::{Candidate, CandidateStatus, Decision},
};
use serde::{Deserialize, Serialize};

/// Three-way reading of a 0-100 score. Only colors log entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreTier {
    Strong,
    Moderate,
    Weak,
}

impl ScoreTier {
    pub fn outcome(self) -> Outcome {
        match self {
            ScoreTier::Strong => Outcome::Success,
            ScoreTier::Moderate => Outcome::Warning,
            ScoreTier::Weak => Outcome::Error,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ScoreTier::Strong => "strong",
            ScoreTier::Moderate => "moderate",
            ScoreTier::Weak => "weak",
        }
    }
}

pub fn tier(cfg: &Scoring, score: u8) -> ScoreTier {
    if score >= cfg.success_tier {
        ScoreTier::Strong
    } else if score >= cfg.warning_tier {
        ScoreTier::Moderate
    } else {
        ScoreTier::Weak
    }
}

/// Low confidence or any recorded concern sends a candidate to the gate.
pub fn needs_review(cfg: &Scoring, candidate: &Candidate) -> bool {
    candidate.confidence() < cfg.review_threshold || !candidate.concerns.is_empty()
}

/// What the pipeline would decide on its own.
pub fn ai_recommendation(cfg: &Scoring, candidate: &Candidate) -> Decision {
    if candidate.confidence() >= cfg.review_threshold {
        Decision::Approve
    } else {
        Decision::Reject
    }
}

pub fn default_status(cfg: &Scoring, candidate: &Candidate) -> CandidateStatus {
    if candidate.confidence() >= cfg.review_threshold {
        CandidateStatus::Recommended
    } else {
        CandidateStatus::NeedsReview
    }
}

/// A recorded human decision always wins over the score-derived default.
pub fn resolve_status(
    cfg: &Scoring,
    candidate: &Candidate,
    decision: Option<Decision>,
) -> CandidateStatus {
    match decision {
        Some(Decision::Approve) => CandidateStatus::Recommended,
        Some(Decision::Reject) => CandidateStatus::Rejected,
        None => default_status(cfg, candidate),
    }
}

pub fn status_outcome(status: CandidateStatus) -> Outcome {
    match status {
        CandidateStatus::Recommended => Outcome::Success,
        CandidateStatus::NeedsReview => Outcome::Warning,
        CandidateStatus::Rejected => Outcome::Error,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_boundaries_are_inclusive() {
        let cfg = Scoring::default();
        assert_eq!(tier(&cfg, 80), ScoreTier::Strong);
        assert_eq!(tier(&cfg, 79), ScoreTier::Moderate);
        assert_eq!(tier(&cfg, 60), ScoreTier::Moderate);
        assert_eq!(tier(&cfg, 59), ScoreTier::Weak);
        assert_eq!(tier(&cfg, 59).outcome(), Outcome::Error);
    }
}
