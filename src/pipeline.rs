use crate::{
    audit::{ActionPayload, ActionSource, AgentAction, AuditLog, NewAction, Outcome},
    briefing::Briefing,
    config::Config,
    error::PipelineError,
    model::{Candidate, CandidateStatus, Decision, HumanDecision},
    review::ReviewCard,
    scheduler::Scheduler,
    scoring,
    seed::{self, Roster},
    stage::{StageBoard, StageId, StageStatus},
    state::{Event, PipelineState, RunStatus},
};
use tracing::{debug, info, warn};

const SYSTEM: ActionSource = ActionSource::System;
const INTAKE: ActionSource = ActionSource::Stage(StageId::Intake);
const SEMANTIC: ActionSource = ActionSource::Stage(StageId::Semantic);
const INTERVIEW: ActionSource = ActionSource::Stage(StageId::Interview);
const HUMAN: ActionSource = ActionSource::Stage(StageId::Human);
const MEMORY: ActionSource = ActionSource::Stage(StageId::Memory);
const RECOMMENDATION: ActionSource = ActionSource::Stage(StageId::Recommendation);

/// Scripted hiring pipeline: six stages run in order, with a blocking human
/// review gate between interview scoring and learning.
pub struct Pipeline<S: Scheduler> {
    cfg: Config,
    roster: Roster,
    scheduler: S,
    state: PipelineState,
}

impl<S: Scheduler> Pipeline<S> {
    pub fn new(cfg: &Config, roster: Roster, scheduler: S) -> Self {
        Self {
            cfg: cfg.clone(),
            roster,
            scheduler,
            state: PipelineState::default(),
        }
    }

    /// Reset and run every stage up to the human review gate.
    ///
    /// Returns once the gate is waiting for decisions, or once the whole run
    /// is done when no candidate was flagged.
    pub fn start(&mut self) -> Result<RunStatus, PipelineError> {
        if !self.state.run.can_start() {
            return Err(PipelineError::AlreadyRunning(self.state.run));
        }

        self.emit(Event::Reset);
        self.emit(Event::Run(RunStatus::Running));
        info!("pipeline started candidates={}", self.roster.candidates.len());
        self.log(NewAction::new(
            SYSTEM,
            "Pipeline Started",
            "Multi-agent hiring pipeline initiated",
        ));

        self.run_intake();
        self.run_semantic();
        self.run_interview();
        self.open_review();

        if self.state.pending_review.is_empty() {
            info!("no candidates flagged; skipping the review wait");
            self.finish();
        }
        Ok(self.state.run)
    }

    /// Record a reviewer's call on a flagged candidate. The last outstanding
    /// decision releases the gate and runs the remaining stages.
    pub fn record_decision(
        &mut self,
        candidate_id: &str,
        decision: Decision,
        rationale: &str,
    ) -> Result<RunStatus, PipelineError> {
        if self.state.run != RunStatus::AwaitingReview {
            return Err(PipelineError::NotAwaitingReview(self.state.run));
        }
        if self.roster.find(candidate_id).is_none() {
            return Err(PipelineError::UnknownCandidate(candidate_id.to_string()));
        }
        let Some(flagged) = self
            .state
            .pending_review
            .iter()
            .find(|c| c.id == candidate_id)
            .cloned()
        else {
            return Err(PipelineError::NotPending(candidate_id.to_string()));
        };

        let ai_score = flagged.confidence();
        let timestamp = self.scheduler.now();
        self.emit(Event::DecisionRecorded(HumanDecision {
            candidate_id: flagged.id.clone(),
            decision,
            rationale: rationale.to_string(),
            timestamp,
        }));
        info!(
            "decision candidate={} decision={} remaining={}",
            flagged.id,
            decision,
            self.state.pending_review.len()
        );

        let outcome = match decision {
            Decision::Approve => Outcome::Success,
            Decision::Reject => Outcome::Error,
        };
        self.log(
            NewAction::new(
                HUMAN,
                "Decision Made",
                format!("Human {} {}: {}", decision.past_tense(), flagged.name, rationale),
            )
            .outcome(outcome)
            .candidate(&flagged.id, &flagged.name)
            .payload(ActionPayload::Decision {
                decision,
                rationale: rationale.to_string(),
                ai_score,
            }),
        );

        let ai = scoring::ai_recommendation(&self.cfg.scoring, &flagged);
        if ai != decision {
            warn!(
                "human override candidate={} ai={} human={}",
                flagged.id, ai, decision
            );
            self.log(
                NewAction::new(
                    HUMAN,
                    "AI Override",
                    format!(
                        "Human overrode AI recommendation for {} (AI: {}, Human: {})",
                        flagged.name, ai, decision
                    ),
                )
                .outcome(Outcome::Warning)
                .candidate(&flagged.id, &flagged.name)
                .payload(ActionPayload::Override {
                    ai_recommendation: ai,
                    human_decision: decision,
                }),
            );
        }

        if self.state.pending_review.is_empty() {
            self.finish();
        }
        Ok(self.state.run)
    }

    /// Summary of one candidate, logged as viewed.
    pub fn view_briefing(&mut self, candidate_id: &str) -> Result<Briefing, PipelineError> {
        let Some(candidate) = self.state.candidate(candidate_id).cloned() else {
            return Err(PipelineError::UnknownCandidate(candidate_id.to_string()));
        };
        self.log(
            NewAction::new(
                SYSTEM,
                "Briefing Viewed",
                format!("User viewed detailed briefing for {}", candidate.name),
            )
            .candidate(&candidate.id, &candidate.name),
        );
        Briefing::build(&self.cfg.scoring, &self.state, candidate_id)
    }

    /// Review card for a flagged candidate, pending or already decided.
    pub fn review_card(&self, candidate_id: &str) -> Result<ReviewCard, PipelineError> {
        ReviewCard::open(&self.state, candidate_id)
    }

    pub fn state(&self) -> &PipelineState {
        &self.state
    }

    pub fn status(&self) -> RunStatus {
        self.state.run
    }

    pub fn stages(&self) -> &StageBoard {
        &self.state.stages
    }

    pub fn stage(&self, stage: StageId) -> StageStatus {
        self.state.stages.get(stage)
    }

    pub fn progress_percent(&self) -> f32 {
        self.state.stages.progress_percent()
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.state.candidates
    }

    pub fn pending_review(&self) -> &[Candidate] {
        &self.state.pending_review
    }

    pub fn decisions(&self) -> &[HumanDecision] {
        &self.state.decisions
    }

    pub fn ranking(&self) -> &[Candidate] {
        &self.state.ranking
    }

    pub fn audit_log(&self) -> &AuditLog {
        &self.state.log
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    fn emit(&mut self, event: Event) {
        self.state.apply(event);
    }

    fn log(&mut self, action: NewAction) {
        let at = self.scheduler.now();
        self.emit(Event::Logged { action, at });
    }

    fn last_logged(&self) -> Option<&AgentAction> {
        self.state.log.entries().last()
    }

    fn run_intake(&mut self) {
        self.emit(Event::Stage(StageId::Intake, StageStatus::Processing));
        self.log(NewAction::new(
            INTAKE,
            "Processing Started",
            "Parsing job description and CVs",
        ));

        self.scheduler.pause(self.cfg.delays.job_load());
        let job = self.roster.job.clone();
        self.log(NewAction::new(
            INTAKE,
            "Job Analysis Complete",
            format!(
                "Analyzed {} role with {} requirements and {} unwritten needs",
                job.title,
                job.requirements.len(),
                job.unwritten_needs.len()
            ),
        ));
        self.emit(Event::JobLoaded(job));

        self.scheduler.pause(self.cfg.delays.roster_load());
        let profiles: Vec<Candidate> = self.roster.candidates.iter().map(Candidate::profile).collect();
        let count = profiles.len();
        self.emit(Event::ProfilesLoaded(profiles));
        self.log(NewAction::new(
            INTAKE,
            "CV Processing Complete",
            format!("Successfully processed {count} candidate CVs"),
        ));
        self.emit(Event::Stage(StageId::Intake, StageStatus::Completed));
        info!("stage {} completed", StageId::Intake);
    }

    fn run_semantic(&mut self) {
        self.emit(Event::Stage(StageId::Semantic, StageStatus::Processing));
        self.log(NewAction::new(
            SEMANTIC,
            "Analysis Started",
            "Beginning semantic analysis of candidates",
        ));

        let threshold = self.cfg.scoring.review_threshold;
        for entry in self.roster.candidates.clone() {
            self.emit(Event::Processing(Some(entry.id.clone())));
            self.log(
                NewAction::new(
                    SEMANTIC,
                    "Candidate Analysis",
                    format!("Analyzing semantic match for {}", entry.name),
                )
                .candidate(&entry.id, &entry.name),
            );

            self.scheduler.pause(self.cfg.delays.semantic_per_candidate());

            let score = entry.semantic();
            let mut scored = entry.profile();
            scored.semantic_score = entry.semantic_score;
            scored.highlights = entry.highlights.clone();
            scored.concerns = entry.concerns.clone();
            self.emit(Event::SemanticScored(scored));

            let note = if score < threshold { " - Below threshold" } else { "" };
            self.log(
                NewAction::new(
                    SEMANTIC,
                    "Score Calculated",
                    format!("{} scored {}% semantic match{}", entry.name, score, note),
                )
                .outcome(scoring::tier(&self.cfg.scoring, score).outcome())
                .candidate(&entry.id, &entry.name)
                .payload(ActionPayload::SemanticScore { score, threshold }),
            );
            debug!(candidate = %entry.id, score, "semantic score");
        }

        self.emit(Event::Processing(None));
        self.emit(Event::Stage(StageId::Semantic, StageStatus::Completed));
        info!("stage {} completed", StageId::Semantic);
    }

    fn run_interview(&mut self) {
        self.emit(Event::Stage(StageId::Interview, StageStatus::Processing));
        self.log(NewAction::new(
            INTERVIEW,
            "Interviews Started",
            "Conducting async screening interviews",
        ));

        for entry in self.roster.candidates.clone() {
            self.emit(Event::Processing(Some(entry.id.clone())));
            self.log(
                NewAction::new(
                    INTERVIEW,
                    "Interview Started",
                    format!(
                        "Conducting {}-question interview with {}",
                        entry.interview_responses.len(),
                        entry.name
                    ),
                )
                .candidate(&entry.id, &entry.name),
            );

            self.scheduler.pause(self.cfg.delays.interview_per_candidate());

            let score = entry.interview();
            let responses = entry.interview_responses.len();
            self.emit(Event::Interviewed(entry.clone()));

            let note = if score < self.cfg.scoring.interview_concern_tier {
                " - Poor communication detected"
            } else {
                ""
            };
            self.log(
                NewAction::new(
                    INTERVIEW,
                    "Interview Complete",
                    format!("{} scored {}% in interview{}", entry.name, score, note),
                )
                .outcome(scoring::tier(&self.cfg.scoring, score).outcome())
                .candidate(&entry.id, &entry.name)
                .payload(ActionPayload::InterviewScore { score, responses }),
            );
            debug!(candidate = %entry.id, score, responses, "interview score");
        }

        self.emit(Event::Processing(None));
        self.emit(Event::Stage(StageId::Interview, StageStatus::Completed));
        info!("stage {} completed", StageId::Interview);
    }

    /// Flag candidates for review from the seed snapshot; the set is not
    /// recomputed as decisions arrive.
    fn open_review(&mut self) {
        self.emit(Event::Stage(StageId::Human, StageStatus::NeedsReview));

        let flagged: Vec<Candidate> = self
            .roster
            .candidates
            .iter()
            .filter(|c| scoring::needs_review(&self.cfg.scoring, c))
            .cloned()
            .collect();
        self.emit(Event::ReviewOpened(flagged.clone()));

        self.log(
            NewAction::new(
                HUMAN,
                "Review Required",
                format!(
                    "{} candidates flagged for human review due to low confidence or conflicting signals",
                    flagged.len()
                ),
            )
            .outcome(Outcome::Warning),
        );
        for c in &flagged {
            warn!("candidate flagged for review id={} score={}", c.id, c.confidence());
            self.log(
                NewAction::new(
                    HUMAN,
                    "Candidate Flagged",
                    format!(
                        "{} requires human review - AI confidence: {}%",
                        c.name,
                        c.confidence()
                    ),
                )
                .outcome(Outcome::Warning)
                .candidate(&c.id, &c.name)
                .payload(ActionPayload::ReviewFlag {
                    reasons: c.concerns.clone(),
                    ai_score: c.confidence(),
                }),
            );
        }

        self.emit(Event::Run(RunStatus::AwaitingReview));
    }

    fn finish(&mut self) {
        self.emit(Event::Run(RunStatus::Running));
        self.emit(Event::Stage(StageId::Human, StageStatus::Completed));
        info!("stage {} completed", StageId::Human);
        self.run_memory();
        self.run_recommendation();
        self.emit(Event::Run(RunStatus::Done));
    }

    fn run_memory(&mut self) {
        self.emit(Event::Stage(StageId::Memory, StageStatus::Processing));
        self.log(NewAction::new(
            MEMORY,
            "Learning Started",
            "Analyzing hiring patterns and human decisions for future improvements",
        ));

        self.scheduler.pause(self.cfg.delays.learning());

        let insights = seed::learning_insights();
        self.emit(Event::InsightsLearned(insights.clone()));
        for insight in insights {
            self.log(
                NewAction::new(
                    MEMORY,
                    "Pattern Discovered",
                    format!("{}: {}", insight.pattern, insight.insight),
                )
                .payload(ActionPayload::Insight(insight)),
            );
        }

        self.emit(Event::Stage(StageId::Memory, StageStatus::Completed));
        info!("stage {} completed", StageId::Memory);
    }

    fn run_recommendation(&mut self) {
        self.emit(Event::Stage(StageId::Recommendation, StageStatus::Processing));
        self.log(NewAction::new(
            RECOMMENDATION,
            "Generating Rankings",
            "Compiling final candidate recommendations based on all agent inputs",
        ));

        self.scheduler.pause(self.cfg.delays.ranking());

        let ranking = rank(&self.cfg, &self.state);
        self.emit(Event::Ranked(ranking.clone()));

        for c in &ranking {
            let status = c.status.unwrap_or(CandidateStatus::NeedsReview);
            self.log(
                NewAction::new(
                    RECOMMENDATION,
                    "Candidate Ranked",
                    format!(
                        "{} - Final Status: {} (Score: {}%)",
                        c.name,
                        status,
                        c.confidence()
                    ),
                )
                .outcome(scoring::status_outcome(status))
                .candidate(&c.id, &c.name)
                .payload(ActionPayload::Ranking {
                    final_status: status,
                    final_score: c.confidence(),
                }),
            );
        }
        self.emit(Event::Stage(StageId::Recommendation, StageStatus::Completed));

        let recommended = ranking
            .iter()
            .filter(|c| c.status == Some(CandidateStatus::Recommended))
            .count();
        self.log(NewAction::new(
            SYSTEM,
            "Pipeline Complete",
            format!(
                "Hiring pipeline completed successfully. {recommended} candidates recommended for panel interviews"
            ),
        ));
        if let Some(last) = self.last_logged() {
            info!("{}", last.details);
        }
    }
}

/// Resolve every candidate's status and order by confidence, highest first.
/// The sort is stable, so equal scores keep roster order.
pub fn rank(cfg: &Config, state: &PipelineState) -> Vec<Candidate> {
    let mut ranked: Vec<Candidate> = state
        .candidates
        .iter()
        .map(|c| {
            let decision = state.decision_for(&c.id).map(|d| d.decision);
            let mut c = c.clone();
            c.status = Some(scoring::resolve_status(&cfg.scoring, &c, decision));
            c
        })
        .collect();
    ranked.sort_by(|a, b| b.confidence().cmp(&a.confidence()));
    ranked
}
