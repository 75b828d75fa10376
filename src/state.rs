//! The single owned state container behind a pipeline run.
//!
//! Every change goes through [`PipelineState::apply`]; the sequencer decides
//! *what* happens next and the reducer only records it.

use crate::{
    audit::{AuditLog, NewAction},
    model::{Candidate, HumanDecision, JobData, LearningInsight},
    stage::{StageBoard, StageId, StageStatus},
};
use serde::Serialize;
use std::fmt;
use time::OffsetDateTime;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    #[default]
    Idle,
    Running,
    AwaitingReview,
    Done,
}

impl RunStatus {
    pub fn can_start(self) -> bool {
        matches!(self, RunStatus::Idle | RunStatus::Done)
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RunStatus::Idle => "idle",
            RunStatus::Running => "running",
            RunStatus::AwaitingReview => "awaiting_review",
            RunStatus::Done => "done",
        })
    }
}

#[derive(Debug, Clone)]
pub enum Event {
    Reset,
    Run(RunStatus),
    Stage(StageId, StageStatus),
    Logged { action: NewAction, at: OffsetDateTime },
    JobLoaded(JobData),
    ProfilesLoaded(Vec<Candidate>),
    Processing(Option<String>),
    SemanticScored(Candidate),
    Interviewed(Candidate),
    ReviewOpened(Vec<Candidate>),
    DecisionRecorded(HumanDecision),
    InsightsLearned(Vec<LearningInsight>),
    Ranked(Vec<Candidate>),
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct PipelineState {
    pub run: RunStatus,
    pub stages: StageBoard,
    pub job: Option<JobData>,
    pub candidates: Vec<Candidate>,
    pub current_candidate: Option<String>,
    pub semantic_results: Vec<Candidate>,
    pub interview_results: Vec<Candidate>,
    pub pending_review: Vec<Candidate>,
    pub decisions: Vec<HumanDecision>,
    pub insights: Vec<LearningInsight>,
    pub ranking: Vec<Candidate>,
    pub log: AuditLog,
}

impl PipelineState {
    pub fn apply(&mut self, event: Event) {
        match event {
            Event::Reset => *self = PipelineState::default(),
            Event::Run(status) => self.run = status,
            Event::Stage(stage, status) => {
                if !self.stages.advance(stage, status) {
                    warn!(
                        "ignored stage transition {stage}: {:?} -> {:?}",
                        self.stages.get(stage),
                        status
                    );
                }
            }
            Event::Logged { action, at } => {
                self.log.append(action, at);
            }
            Event::JobLoaded(job) => self.job = Some(job),
            Event::ProfilesLoaded(profiles) => self.candidates = profiles,
            Event::Processing(id) => self.current_candidate = id,
            Event::SemanticScored(scored) => {
                if let Some(c) = self.candidate_mut(&scored.id) {
                    c.semantic_score = scored.semantic_score;
                    c.highlights = scored.highlights.clone();
                    c.concerns = scored.concerns.clone();
                }
                self.semantic_results.push(scored);
            }
            Event::Interviewed(interviewed) => {
                if let Some(c) = self.candidate_mut(&interviewed.id) {
                    c.interview_score = interviewed.interview_score;
                    c.final_score = interviewed.final_score;
                    c.interview_responses = interviewed.interview_responses.clone();
                }
                self.interview_results.push(interviewed);
            }
            Event::ReviewOpened(flagged) => self.pending_review = flagged,
            Event::DecisionRecorded(decision) => {
                self.pending_review.retain(|c| c.id != decision.candidate_id);
                self.decisions.push(decision);
            }
            Event::InsightsLearned(insights) => self.insights = insights,
            Event::Ranked(ranking) => {
                for ranked in &ranking {
                    if let Some(c) = self.candidate_mut(&ranked.id) {
                        c.status = ranked.status;
                    }
                }
                self.ranking = ranking;
            }
        }
    }

    pub fn candidate(&self, id: &str) -> Option<&Candidate> {
        self.candidates.iter().find(|c| c.id == id)
    }

    fn candidate_mut(&mut self, id: &str) -> Option<&mut Candidate> {
        self.candidates.iter_mut().find(|c| c.id == id)
    }

    pub fn is_pending(&self, id: &str) -> bool {
        self.pending_review.iter().any(|c| c.id == id)
    }

    pub fn decision_for(&self, id: &str) -> Option<&HumanDecision> {
        self.decisions.iter().find(|d| d.candidate_id == id)
    }
}
