pub mod audit;
pub mod briefing;
pub mod cli;
pub mod config;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod report;
pub mod review;
pub mod scheduler;
pub mod scoring;
pub mod seed;
pub mod stage;
pub mod state;
pub mod util;

pub use error::PipelineError;
pub use pipeline::Pipeline;
