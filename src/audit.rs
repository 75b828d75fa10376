use crate::model::{CandidateStatus, Decision, LearningInsight};
use crate::stage::StageId;
use serde::Serialize;
use time::OffsetDateTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Success,
    Warning,
    Error,
}

/// Who emitted an entry: one of the stages, or the pipeline itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionSource {
    System,
    Stage(StageId),
}

impl ActionSource {
    pub fn name(self) -> &'static str {
        match self {
            ActionSource::System => "System",
            ActionSource::Stage(stage) => stage.agent_name(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ActionPayload {
    SemanticScore {
        score: u8,
        threshold: u8,
    },
    InterviewScore {
        score: u8,
        responses: usize,
    },
    ReviewFlag {
        reasons: Vec<String>,
        ai_score: u8,
    },
    Decision {
        decision: Decision,
        rationale: String,
        ai_score: u8,
    },
    Override {
        ai_recommendation: Decision,
        human_decision: Decision,
    },
    Insight(LearningInsight),
    Ranking {
        final_status: CandidateStatus,
        final_score: u8,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgentAction {
    pub id: u64,
    pub source: ActionSource,
    pub agent_name: &'static str,
    pub action: String,
    pub details: String,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    pub outcome: Outcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub candidate_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub candidate_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<ActionPayload>,
}

/// Entry under construction; the log assigns id and name on append.
#[derive(Debug, Clone)]
pub struct NewAction {
    pub source: ActionSource,
    pub action: String,
    pub details: String,
    pub outcome: Outcome,
    pub candidate: Option<(String, String)>,
    pub payload: Option<ActionPayload>,
}

impl NewAction {
    pub fn new(source: ActionSource, action: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            source,
            action: action.into(),
            details: details.into(),
            outcome: Outcome::Success,
            candidate: None,
            payload: None,
        }
    }

    pub fn outcome(mut self, outcome: Outcome) -> Self {
        self.outcome = outcome;
        self
    }

    pub fn candidate(mut self, id: impl Into<String>, name: impl Into<String>) -> Self {
        self.candidate = Some((id.into(), name.into()));
        self
    }

    pub fn payload(mut self, payload: ActionPayload) -> Self {
        self.payload = Some(payload);
        self
    }
}

/// Append-only record of everything the pipeline did during one run.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct AuditLog {
    entries: Vec<AgentAction>,
}

impl AuditLog {
    pub fn append(&mut self, new: NewAction, at: OffsetDateTime) -> &AgentAction {
        let (candidate_id, candidate_name) = match new.candidate {
            Some((id, name)) => (Some(id), Some(name)),
            None => (None, None),
        };
        let entry = AgentAction {
            id: self.entries.len() as u64 + 1,
            source: new.source,
            agent_name: new.source.name(),
            action: new.action,
            details: new.details,
            timestamp: at,
            outcome: new.outcome,
            candidate_id,
            candidate_name,
            payload: new.payload,
        };
        self.entries.push(entry);
        &self.entries[self.entries.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[AgentAction] {
        &self.entries
    }

    /// Chronological order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &AgentAction> {
        self.entries.iter()
    }

    /// Newest first.
    pub fn newest_first(&self) -> impl Iterator<Item = &AgentAction> {
        self.entries.iter().rev()
    }

    pub fn for_candidate<'a>(&'a self, candidate_id: &'a str) -> impl Iterator<Item = &'a AgentAction> {
        self.entries
            .iter()
            .filter(move |a| a.candidate_id.as_deref() == Some(candidate_id))
    }

    pub fn with_action<'a>(&'a self, action: &'a str) -> impl Iterator<Item = &'a AgentAction> {
        self.entries.iter().filter(move |a| a.action == action)
    }

    /// Entries tagged warning or error.
    pub fn issues(&self) -> impl Iterator<Item = &AgentAction> {
        self.entries
            .iter()
            .filter(|a| matches!(a.outcome, Outcome::Warning | Outcome::Error))
    }

    pub fn overrides(&self) -> impl Iterator<Item = &AgentAction> {
        self.entries
            .iter()
            .filter(|a| matches!(a.payload, Some(ActionPayload::Override { .. })))
    }

    pub fn summary(&self) -> AuditSummary {
        AuditSummary {
            successes: self
                .entries
                .iter()
                .filter(|a| a.outcome == Outcome::Success)
                .count(),
            issues: self.issues().count(),
            overrides: self.overrides().count(),
        }
    }
}

/// Counts behind the automation-issues view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct AuditSummary {
    pub successes: usize,
    pub issues: usize,
    pub overrides: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_sequential_and_order_is_kept() {
        let mut log = AuditLog::default();
        let at = OffsetDateTime::UNIX_EPOCH;
        log.append(NewAction::new(ActionSource::System, "A", "first"), at);
        log.append(
            NewAction::new(ActionSource::Stage(StageId::Semantic), "B", "second")
                .candidate("2", "John Doe")
                .outcome(Outcome::Error),
            at,
        );

        let ids: Vec<u64> = log.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![1, 2]);
        let newest: Vec<&str> = log.newest_first().map(|a| a.action.as_str()).collect();
        assert_eq!(newest, vec!["B", "A"]);
        assert_eq!(log.entries()[1].agent_name, "Semantic Matcher");
        assert_eq!(log.for_candidate("2").count(), 1);
        assert_eq!(log.for_candidate("1").count(), 0);
        assert_eq!(log.issues().map(|a| a.id).collect::<Vec<_>>(), vec![2]);
        assert_eq!(
            log.summary(),
            AuditSummary {
                successes: 1,
                issues: 1,
                overrides: 0
            }
        );
    }
}
