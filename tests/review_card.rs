use talentflow::{
    Pipeline, PipelineError,
    briefing::{NextStep, ProfileReading, RiskAssessment, TurnQuality},
    config::Config,
    model::Decision,
    scheduler::ManualScheduler,
    scoring::ScoreTier,
    seed::Roster,
    state::RunStatus,
};

fn started() -> Pipeline<ManualScheduler> {
    let mut p = Pipeline::new(&Config::default(), Roster::builtin(), ManualScheduler::new());
    p.start().unwrap();
    p
}

#[test]
fn card_submits_normalized_rationale() {
    let mut p = started();
    let mut card = p.review_card("2").unwrap();
    assert!(!card.is_decided());
    assert!(card.headline().starts_with("AI Confidence: 56% - Concerns: No accessibility experience"));

    card.set_rationale("  Great   React\tdepth ");
    assert_eq!(card.approve(&mut p).unwrap(), RunStatus::Done);
    assert_eq!(card.rationale(), "");
    assert_eq!(p.decisions()[0].rationale, "Great React depth");
    assert_eq!(card.existing.as_ref().map(|d| d.decision), Some(Decision::Approve));
}

#[test]
fn decided_card_refuses_second_submission() {
    let mut p = started();
    let mut card = p.review_card("2").unwrap();
    card.reject(&mut p).unwrap();

    let mut reopened = p.review_card("2").unwrap();
    assert!(reopened.is_decided());
    assert_eq!(
        reopened.approve(&mut p),
        Err(PipelineError::NotPending("2".into()))
    );
    assert_eq!(p.decisions().len(), 1);
}

#[test]
fn card_only_opens_for_flagged_candidates() {
    let p = started();
    assert_eq!(
        p.review_card("1").unwrap_err(),
        PipelineError::NotPending("1".into())
    );
    assert_eq!(
        p.review_card("42").unwrap_err(),
        PipelineError::UnknownCandidate("42".into())
    );
}

#[test]
fn briefing_collects_candidate_history() {
    let mut p = started();
    p.record_decision("2", Decision::Approve, "worth a panel").unwrap();

    let b = p.view_briefing("2").unwrap();
    assert_eq!(b.candidate.id, "2");
    assert_eq!(b.profile, ProfileReading::IndividualContributor);
    assert_eq!(b.semantic_strength, ScoreTier::Moderate);
    assert_eq!(b.interview_strength, ScoreTier::Weak);
    assert_eq!(b.next_step, NextStep::PanelInterview);
    assert_eq!(b.decision.as_ref().map(|d| d.rationale.as_str()), Some("worth a panel"));
    assert!(b.actions.iter().all(|a| a.candidate_id.as_deref() == Some("2")));
    assert_eq!(b.actions.last().map(|a| a.action.as_str()), Some("Briefing Viewed"));

    let strong: Vec<(&str, bool)> = b
        .skill_alignment
        .iter()
        .map(|s| (s.skill.as_str(), s.strong))
        .collect();
    assert_eq!(
        strong,
        vec![
            ("React", true),
            ("Prototyping", false),
            ("Performance Optimization", false),
            ("Solo Work", false),
        ]
    );
}

#[test]
fn briefing_before_ranking_suggests_further_review() {
    let mut p = started();
    let b = p.view_briefing("1").unwrap();
    assert_eq!(b.profile, ProfileReading::Leadership);
    assert_eq!(b.next_step, NextStep::FurtherReview);
    assert!(b.decision.is_none());
    assert_eq!(b.skill_alignment.len(), 4);
}

#[test]
fn briefing_for_unknown_candidate_is_refused() {
    let mut p = started();
    let before = p.audit_log().len();
    assert!(matches!(
        p.view_briefing("nope"),
        Err(PipelineError::UnknownCandidate(_))
    ));
    assert_eq!(p.audit_log().len(), before);
}

#[test]
fn approving_low_score_candidate_reads_as_override() {
    let mut p = started();
    p.record_decision("2", Decision::Approve, "worth a panel").unwrap();

    let alignment = p.view_briefing("2").unwrap().alignment.unwrap();
    assert_eq!(alignment.ai_recommendation, Decision::Reject);
    assert_eq!(alignment.human_decision, Decision::Approve);
    assert!(alignment.overridden);
}

#[test]
fn rejecting_low_score_candidate_agrees_with_ai() {
    let mut p = started();
    p.record_decision("2", Decision::Reject, "").unwrap();

    let alignment = p.view_briefing("2").unwrap().alignment.unwrap();
    assert_eq!(alignment.ai_recommendation, Decision::Reject);
    assert!(!alignment.overridden);
}

#[test]
fn undecided_candidate_has_no_alignment() {
    let mut p = started();
    assert!(p.view_briefing("2").unwrap().alignment.is_none());
    assert!(p.view_briefing("1").unwrap().alignment.is_none());
}

#[test]
fn briefing_reads_interview_turns_and_risk() {
    let mut p = started();
    let john = p.view_briefing("2").unwrap();
    let readings: Vec<(u8, TurnQuality)> = john
        .interview_turns
        .iter()
        .map(|t| (t.score, t.quality))
        .collect();
    assert_eq!(
        readings,
        vec![
            (20, TurnQuality::Poor),
            (35, TurnQuality::Poor),
            (65, TurnQuality::Adequate),
        ]
    );
    assert_eq!(
        john.risk,
        RiskAssessment::Concerns(vec![
            "No accessibility experience".into(),
            "Limited team collaboration evidence".into(),
            "Weak mentorship indicators".into(),
            "Poor communication in interview responses".into(),
        ])
    );
    assert_eq!(
        john.semantic_summary,
        "Semantic analysis reveals moderate alignment with role requirements. \
         Key factors: 3 positive indicators, 4 areas of concern."
    );

    let sarah = p.view_briefing("1").unwrap();
    assert_eq!(sarah.risk, RiskAssessment::NoSignificantRisk);
    assert_eq!(sarah.semantic_reasoning.len(), 3);
    assert_eq!(
        sarah.semantic_reasoning[0],
        "Strong accessibility experience with WCAG"
    );
    assert_eq!(sarah.interview_turns[0].quality, TurnQuality::Excellent);
}
