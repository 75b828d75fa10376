use crate::{
    audit::{AgentAction, AuditSummary},
    model::{Candidate, HumanDecision, JobData, LearningInsight},
    pipeline::Pipeline,
    scheduler::Scheduler,
    stage::StageBoard,
    state::RunStatus,
};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub run_id: String,
    pub started: String,
    pub finished: String,
    pub status: RunStatus,
    pub progress_percent: f32,
    pub stages: StageBoard,
    pub job: Option<JobData>,
    pub ranking: Vec<Candidate>,
    pub pending_review: Vec<PendingReport>,
    pub decisions: Vec<HumanDecision>,
    pub insights: Vec<LearningInsight>,
    pub audit: AuditSummary,
    pub issues: Vec<AgentAction>,
    pub overrides: Vec<AgentAction>,
    pub log: Vec<AgentAction>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PendingReport {
    pub candidate_id: String,
    pub name: String,
    pub confidence: u8,
    pub concerns: Vec<String>,
}

impl RunReport {
    pub fn from_pipeline<S: Scheduler>(
        pipeline: &Pipeline<S>,
        run_id: String,
        started: String,
        finished: String,
        newest_first: bool,
    ) -> Self {
        let state = pipeline.state();
        let log = if newest_first {
            state.log.newest_first().cloned().collect()
        } else {
            state.log.iter().cloned().collect()
        };
        Self {
            run_id,
            started,
            finished,
            status: state.run,
            progress_percent: state.stages.progress_percent(),
            stages: state.stages,
            job: state.job.clone(),
            ranking: state.ranking.clone(),
            pending_review: state
                .pending_review
                .iter()
                .map(|c| PendingReport {
                    candidate_id: c.id.clone(),
                    name: c.name.clone(),
                    confidence: c.confidence(),
                    concerns: c.concerns.clone(),
                })
                .collect(),
            decisions: state.decisions.clone(),
            insights: state.insights.clone(),
            audit: state.log.summary(),
            issues: state.log.issues().cloned().collect(),
            overrides: state.log.overrides().cloned().collect(),
            log,
        }
    }
}
