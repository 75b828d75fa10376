use crate::{
    config::Config,
    model::Decision,
    pipeline::Pipeline,
    report::RunReport,
    scheduler::SystemScheduler,
    seed::Roster,
    state::RunStatus,
    util::{ensure_dir, now_rfc3339, run_id},
};
use anyhow::{Context, Result, anyhow};
use clap::{Args as ClapArgs, Parser, Subcommand};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "talentflow")]
#[command(about = "Scripted multi-agent hiring pipeline (staged scoring + human review gate + ranking)")]
pub struct Args {
    #[command(subcommand)]
    pub cmd: Command,

    /// Path to config TOML. If omitted, uses ./talentflow.toml if present.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Override log level (trace/debug/info/warn/error).
    #[arg(long)]
    pub log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the job and candidate roster the pipeline will screen.
    Roster {},
    /// Run the pipeline, apply review decisions, print the run report.
    Run {
        #[command(flatten)]
        review: ReviewArgs,
        /// Print the audit log newest first.
        #[arg(long)]
        reverse_log: bool,
    },
    /// Run the pipeline and print the briefing for one candidate.
    Briefing {
        #[arg(long)]
        candidate: String,
        #[command(flatten)]
        review: ReviewArgs,
    },
}

#[derive(ClapArgs, Debug, Default)]
pub struct ReviewArgs {
    /// Approve a flagged candidate (repeatable).
    #[arg(long, value_name = "ID")]
    pub approve: Vec<String>,
    /// Reject a flagged candidate (repeatable).
    #[arg(long, value_name = "ID")]
    pub reject: Vec<String>,
    /// Rationale attached to --approve/--reject decisions.
    #[arg(long, default_value = "")]
    pub rationale: String,
    /// TOML file with [[decision]] entries.
    #[arg(long)]
    pub decisions: Option<PathBuf>,
    /// Skip the stage delays.
    #[arg(long)]
    pub no_pace: bool,
}

#[derive(Debug, Deserialize)]
struct DecisionFile {
    #[serde(default)]
    decision: Vec<DecisionEntry>,
}

#[derive(Debug, Deserialize)]
struct DecisionEntry {
    candidate: String,
    decision: Decision,
    #[serde(default)]
    rationale: String,
}

pub fn dispatch(args: Args) -> Result<()> {
    let cfg = match resolve_config_path(args.config.as_deref()) {
        Some(path) => Config::load(&path)?,
        None => Config::default(),
    };
    let log_path = resolve_log_path(&cfg);
    let _guard = init_logging(&args, &cfg, log_path.as_deref())?;
    let roster = Roster::from_config(&cfg)?;

    match &args.cmd {
        Command::Roster {} => {
            println!("{}", serde_json::to_string_pretty(&roster)?);
            Ok(())
        }
        Command::Run {
            review,
            reverse_log,
        } => run(&cfg, roster, review, *reverse_log || cfg.output.reverse_log),
        Command::Briefing { candidate, review } => briefing(&cfg, roster, candidate, review),
    }
}

fn resolve_config_path(user: Option<&Path>) -> Option<PathBuf> {
    if let Some(p) = user {
        return Some(p.to_path_buf());
    }
    ["talentflow.toml", "talentflow.example.toml"]
        .into_iter()
        .map(PathBuf::from)
        .find(|p| p.exists())
}

fn init_logging(args: &Args, cfg: &Config, file_path: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let level = args
        .log_level
        .as_deref()
        .unwrap_or(cfg.logging.level.as_str());

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // stdout carries the JSON report
    let stderr_layer = if cfg.logging.json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(true)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .boxed()
    };

    let (file_layer, guard) = if let Some(path) = file_path {
        let parent = path.parent().unwrap_or_else(|| Path::new("."));
        ensure_dir(parent)?;
        let file = std::fs::File::create(path)
            .with_context(|| format!("create log file: {}", path.display()))?;
        let (non_blocking, guard) = tracing_appender::non_blocking(file);
        let layer = tracing_subscriber::fmt::layer()
            .with_writer(non_blocking)
            .with_ansi(false)
            .with_target(true)
            .boxed();
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow!("failed to init logging: {e}"))?;

    Ok(guard)
}

fn resolve_log_path(cfg: &Config) -> Option<PathBuf> {
    if !cfg.logging.write_to_file {
        return None;
    }
    if !cfg.logging.file_path.is_empty() {
        return Some(PathBuf::from(&cfg.logging.file_path));
    }
    Some(PathBuf::from("talentflow.log"))
}

fn run(cfg: &Config, roster: Roster, review: &ReviewArgs, reverse_log: bool) -> Result<()> {
    let id = run_id(cfg, &roster)?;
    info!("run_id={id}");

    let started = now_rfc3339();
    let pipeline = run_with_review(cfg, roster, review)?;

    if cfg.output.print_summary {
        let report = RunReport::from_pipeline(&pipeline, id, started, now_rfc3339(), reverse_log);
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    ensure_done(&pipeline)
}

fn briefing(cfg: &Config, roster: Roster, candidate: &str, review: &ReviewArgs) -> Result<()> {
    let mut pipeline = run_with_review(cfg, roster, review)?;
    let briefing = pipeline
        .view_briefing(candidate)
        .with_context(|| format!("briefing for candidate {candidate}"))?;
    println!("{}", serde_json::to_string_pretty(&briefing)?);
    if pipeline.status() != RunStatus::Done {
        warn!("briefing generated before the review gate was cleared");
    }
    Ok(())
}

fn run_with_review(
    cfg: &Config,
    roster: Roster,
    review: &ReviewArgs,
) -> Result<Pipeline<SystemScheduler>> {
    let decisions = collect_decisions(review)?;
    let scheduler = SystemScheduler::new(cfg.delays.pace && !review.no_pace);
    let mut pipeline = Pipeline::new(cfg, roster, scheduler);
    pipeline.start()?;

    for entry in decisions {
        let mut card = pipeline
            .review_card(&entry.candidate)
            .with_context(|| format!("opening review for candidate {}", entry.candidate))?;
        info!("{}: {}", card.candidate_name, card.headline());
        card.set_rationale(entry.rationale);
        card.submit(&mut pipeline, entry.decision)
            .with_context(|| format!("recording decision for candidate {}", entry.candidate))?;
    }
    Ok(pipeline)
}

fn collect_decisions(review: &ReviewArgs) -> Result<Vec<DecisionEntry>> {
    let mut out = Vec::new();
    if let Some(path) = &review.decisions {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading decisions: {}", path.display()))?;
        let file: DecisionFile = toml::from_str(&raw)
            .with_context(|| format!("parsing decisions: {}", path.display()))?;
        out.extend(file.decision);
    }
    for (ids, decision) in [
        (&review.approve, Decision::Approve),
        (&review.reject, Decision::Reject),
    ] {
        out.extend(ids.iter().map(|id| DecisionEntry {
            candidate: id.clone(),
            decision,
            rationale: review.rationale.clone(),
        }));
    }
    Ok(out)
}

fn ensure_done(pipeline: &Pipeline<SystemScheduler>) -> Result<()> {
    if pipeline.status() == RunStatus::Done {
        return Ok(());
    }
    let waiting: Vec<&str> = pipeline
        .pending_review()
        .iter()
        .map(|c| c.id.as_str())
        .collect();
    Err(anyhow!(
        "{} candidate(s) still awaiting review: {}",
        waiting.len(),
        waiting.join(", ")
    ))
}
