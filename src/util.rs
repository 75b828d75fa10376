use crate::{config::Config, seed::Roster};
use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use std::path::Path;
use time::format_description::well_known::Rfc3339;

pub fn ensure_dir(p: &Path) -> Result<()> {
    std::fs::create_dir_all(p).with_context(|| format!("create_dir_all {}", p.display()))
}

pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut h = Sha256::new();
    h.update(bytes);
    format!("{:x}", h.finalize())
}

pub fn now_rfc3339() -> String {
    time::OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| "1970-01-01T00:00:00Z".to_string())
}

/// Same config and roster always give the same id.
pub fn run_id(cfg: &Config, roster: &Roster) -> Result<String> {
    let cfg_hash = sha256_hex(cfg.normalized_for_hash().as_bytes());
    let roster_json = serde_json::to_string(roster).context("serializing roster")?;
    let roster_hash = sha256_hex(roster_json.as_bytes());
    Ok(sha256_hex(format!("{cfg_hash}:{roster_hash}").as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_id_is_stable_and_input_sensitive() {
        let cfg = Config::default();
        let roster = Roster::builtin();
        let a = run_id(&cfg, &roster).unwrap();
        assert_eq!(a, run_id(&cfg, &roster).unwrap());
        assert_eq!(a.len(), 64);

        let mut other = cfg.clone();
        other.scoring.review_threshold = 60;
        assert_ne!(a, run_id(&other, &roster).unwrap());
    }
}
