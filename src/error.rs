use crate::state::RunStatus;
use thiserror::Error;

/// Ways a pipeline operation can be refused. A refused call leaves the
/// pipeline state untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    #[error("pipeline is already running (status: {0})")]
    AlreadyRunning(RunStatus),
    #[error("pipeline is not awaiting review (status: {0})")]
    NotAwaitingReview(RunStatus),
    #[error("unknown candidate: {0}")]
    UnknownCandidate(String),
    #[error("candidate is not pending review: {0}")]
    NotPending(String),
}
