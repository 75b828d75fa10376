use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub scoring: Scoring,
    #[serde(default)]
    pub delays: Delays,
    #[serde(default)]
    pub seed: Seed,
    #[serde(default)]
    pub logging: Logging,
    #[serde(default)]
    pub output: Output,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config: {}", path.display()))?;
        let cfg: Config = toml::from_str(&raw).with_context(|| "parsing TOML")?;
        Ok(cfg)
    }

    /// A stable, normalization-friendly string for hashing.
    pub fn normalized_for_hash(&self) -> String {
        toml::to_string(self).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scoring {
    /// Confidence below this sends a candidate to human review.
    pub review_threshold: u8,
    pub success_tier: u8,
    pub warning_tier: u8,
    /// Interview scores below this get a communication note in the log.
    pub interview_concern_tier: u8,
}
impl Default for Scoring {
    fn default() -> Self {
        Self {
            review_threshold: 70,
            success_tier: 80,
            warning_tier: 60,
            interview_concern_tier: 60,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Delays {
    pub pace: bool,
    pub job_load_ms: u64,
    pub roster_load_ms: u64,
    pub semantic_per_candidate_ms: u64,
    pub interview_per_candidate_ms: u64,
    pub learning_ms: u64,
    pub ranking_ms: u64,
}
impl Default for Delays {
    fn default() -> Self {
        Self {
            pace: true,
            job_load_ms: 1500,
            roster_load_ms: 1000,
            semantic_per_candidate_ms: 2000,
            interview_per_candidate_ms: 2500,
            learning_ms: 1500,
            ranking_ms: 1000,
        }
    }
}

impl Delays {
    pub fn job_load(&self) -> Duration {
        Duration::from_millis(self.job_load_ms)
    }
    pub fn roster_load(&self) -> Duration {
        Duration::from_millis(self.roster_load_ms)
    }
    pub fn semantic_per_candidate(&self) -> Duration {
        Duration::from_millis(self.semantic_per_candidate_ms)
    }
    pub fn interview_per_candidate(&self) -> Duration {
        Duration::from_millis(self.interview_per_candidate_ms)
    }
    pub fn learning(&self) -> Duration {
        Duration::from_millis(self.learning_ms)
    }
    pub fn ranking(&self) -> Duration {
        Duration::from_millis(self.ranking_ms)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Seed {
    /// TOML roster file. Empty means the built-in roster.
    pub roster_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Logging {
    pub level: String,
    pub json: bool,
    pub write_to_file: bool,
    pub file_path: String,
}
impl Default for Logging {
    fn default() -> Self {
        Self {
            level: "info".into(),
            json: false,
            write_to_file: false,
            file_path: "".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Output {
    pub print_summary: bool,
    pub reverse_log: bool,
}
impl Default for Output {
    fn default() -> Self {
        Self {
            print_summary: true,
            reverse_log: false,
        }
    }
}
