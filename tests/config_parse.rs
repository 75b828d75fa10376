use talentflow::config::Config;

#[test]
fn parse_example_config() {
    let raw = include_str!("../talentflow.example.toml");
    let cfg: Config = toml::from_str(raw).expect("parse TOML");
    assert_eq!(cfg.scoring.review_threshold, 70);
    assert_eq!(cfg.delays.interview_per_candidate_ms, 2500);
    assert!(cfg.seed.roster_path.is_empty());
}

#[test]
fn missing_sections_fall_back_to_defaults() {
    let cfg: Config = toml::from_str("[scoring]\nreview_threshold = 75\nsuccess_tier = 85\nwarning_tier = 65\ninterview_concern_tier = 50\n")
        .expect("parse TOML");
    assert_eq!(cfg.scoring.review_threshold, 75);
    assert_eq!(cfg.delays.job_load_ms, 1500);
    assert!(cfg.output.print_summary);
}
