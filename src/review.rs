use crate::{
    error::PipelineError,
    model::{Decision, HumanDecision},
    pipeline::Pipeline,
    scheduler::Scheduler,
    state::{PipelineState, RunStatus},
};
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Input surface for one flagged candidate: shows the AI confidence and
/// concerns, collects a rationale, and submits the decision.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewCard {
    pub candidate_id: String,
    pub candidate_name: String,
    pub confidence: u8,
    pub concerns: Vec<String>,
    pub existing: Option<HumanDecision>,
    #[serde(skip)]
    rationale: String,
}

impl ReviewCard {
    pub fn open(state: &PipelineState, candidate_id: &str) -> Result<Self, PipelineError> {
        let flagged = state
            .pending_review
            .iter()
            .find(|c| c.id == candidate_id)
            .or_else(|| {
                state
                    .decision_for(candidate_id)
                    .and_then(|_| state.candidate(candidate_id))
            });
        let Some(c) = flagged else {
            return if state.candidate(candidate_id).is_some() {
                Err(PipelineError::NotPending(candidate_id.to_string()))
            } else {
                Err(PipelineError::UnknownCandidate(candidate_id.to_string()))
            };
        };

        Ok(Self {
            candidate_id: c.id.clone(),
            candidate_name: c.name.clone(),
            confidence: c.confidence(),
            concerns: c.concerns.clone(),
            existing: state.decision_for(candidate_id).cloned(),
            rationale: String::new(),
        })
    }

    /// One-line summary the reviewer sees above the input.
    pub fn headline(&self) -> String {
        let concerns = if self.concerns.is_empty() {
            "None".to_string()
        } else {
            self.concerns.join(", ")
        };
        format!("AI Confidence: {}% - Concerns: {}", self.confidence, concerns)
    }

    pub fn set_rationale(&mut self, text: impl Into<String>) {
        self.rationale = text.into();
    }

    pub fn rationale(&self) -> &str {
        &self.rationale
    }

    pub fn is_decided(&self) -> bool {
        self.existing.is_some()
    }

    pub fn approve<S: Scheduler>(&mut self, pipeline: &mut Pipeline<S>) -> Result<RunStatus, PipelineError> {
        self.submit(pipeline, Decision::Approve)
    }

    pub fn reject<S: Scheduler>(&mut self, pipeline: &mut Pipeline<S>) -> Result<RunStatus, PipelineError> {
        self.submit(pipeline, Decision::Reject)
    }

    /// Normalizes the rationale, records the decision, and clears the input.
    /// A card that already holds a decision refuses further input.
    pub fn submit<S: Scheduler>(
        &mut self,
        pipeline: &mut Pipeline<S>,
        decision: Decision,
    ) -> Result<RunStatus, PipelineError> {
        if self.existing.is_some() {
            return Err(PipelineError::NotPending(self.candidate_id.clone()));
        }
        let rationale = normalize_rationale(&self.rationale);
        let status = pipeline.record_decision(&self.candidate_id, decision, &rationale)?;
        self.rationale.clear();
        self.existing = pipeline
            .state()
            .decision_for(&self.candidate_id)
            .cloned();
        Ok(status)
    }
}

/// NFKC, whitespace runs collapsed to one space, trimmed.
pub fn normalize_rationale(raw: &str) -> String {
    let nfkc: String = raw.nfkc().collect();
    WHITESPACE.replace_all(nfkc.trim(), " ").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rationale_is_normalized() {
        assert_eq!(
            normalize_rationale("  Strong\tReact\n\n background\u{00A0}here "),
            "Strong React background here"
        );
        assert_eq!(normalize_rationale("ﬁne"), "fine");
        assert_eq!(normalize_rationale("   "), "");
    }

    #[test]
    fn headline_lists_concerns() {
        let card = ReviewCard {
            candidate_id: "2".into(),
            candidate_name: "John Doe".into(),
            confidence: 56,
            concerns: vec!["No accessibility experience".into()],
            existing: None,
            rationale: String::new(),
        };
        assert_eq!(
            card.headline(),
            "AI Confidence: 56% - Concerns: No accessibility experience"
        );
    }
}
