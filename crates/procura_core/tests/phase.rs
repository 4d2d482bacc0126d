use procura_core::{
    infer_phase, infer_phase_from_lines, pill_states, PhaseTracker, PillState, WorkflowPhase,
};

#[test]
fn empty_log_is_submitted_with_or_without_request() {
    assert_eq!(infer_phase("", false), WorkflowPhase::Submitted);
    assert_eq!(infer_phase("", true), WorkflowPhase::Submitted);
    assert_eq!(
        infer_phase("request started: 42\nchat sent to orchestrator", true),
        WorkflowPhase::Submitted
    );
}

#[test]
fn later_phase_keywords_win() {
    assert_eq!(
        infer_phase("scout agent online\nsending to negotiator", true),
        WorkflowPhase::Negotiate
    );
    assert_eq!(
        infer_phase("scout\ncudos job queued\nbuyer accepted offer", true),
        WorkflowPhase::Finalize
    );
}

#[test]
fn each_group_is_recognised() {
    let cases = [
        ("catalog loaded", WorkflowPhase::Scout),
        ("retrieved 40 laptops", WorkflowPhase::Scout),
        ("found 7 candidates", WorkflowPhase::Scout),
        ("dispatching batch 1", WorkflowPhase::Compute),
        ("queued for evaluation", WorkflowPhase::Compute),
        ("metta kb loaded", WorkflowPhase::Evaluate),
        ("compute scoring complete", WorkflowPhase::Evaluate),
        ("symbolic rules applied", WorkflowPhase::Evaluate),
        ("bulk discount applied", WorkflowPhase::Negotiate),
        ("tier 2 pricing", WorkflowPhase::Negotiate),
        ("total savings: $500", WorkflowPhase::Finalize),
        ("evaluation result delivered", WorkflowPhase::Finalize),
    ];
    for (text, expected) in cases {
        assert_eq!(infer_phase(text, true), expected, "text: {text}");
    }
}

#[test]
fn gap_phrases_do_not_cross_line_breaks() {
    assert_eq!(
        infer_phase("retrieved from cache\n12 laptops", true),
        WorkflowPhase::Submitted
    );
}

#[test]
fn lines_are_lowercased_before_matching() {
    let lines = ["Request Started: abc", "EVALUATOR ready"];
    assert_eq!(infer_phase_from_lines(&lines, true), WorkflowPhase::Evaluate);
}

#[test]
fn tracker_matches_full_rescan() {
    let lines = [
        "Request Started: abc",
        "Scout Agent online",
        "Dispatching batch to CUDOS",
        "Hybrid evaluator scoring",
        "catalog refreshed",
        "Negotiator applying tier pricing",
        "scout again",
        "Savings: $120",
    ];
    let mut tracker = PhaseTracker::new();
    for end in 0..=lines.len() {
        let prefix = &lines[..end];
        assert_eq!(
            tracker.observe(prefix, true),
            infer_phase_from_lines(prefix, true),
            "after {end} lines"
        );
    }
}

#[test]
fn tracker_resets_when_log_shrinks() {
    let mut tracker = PhaseTracker::new();
    tracker.observe(&["negotiator"], true);
    assert_eq!(tracker.phase(), WorkflowPhase::Negotiate);
    let empty: [&str; 0] = [];
    assert_eq!(tracker.observe(&empty, false), WorkflowPhase::Submitted);
}

#[test]
fn pills_follow_current_phase() {
    let pills = pill_states(WorkflowPhase::Evaluate);
    let states: Vec<_> = pills.iter().map(|p| p.state).collect();
    assert_eq!(
        states,
        vec![
            PillState::Done,
            PillState::Done,
            PillState::Done,
            PillState::Active,
            PillState::Upcoming,
            PillState::Upcoming,
        ]
    );
    let labels: Vec<_> = pills.iter().map(|p| p.label).collect();
    assert_eq!(
        labels,
        vec!["Submitted", "Scout", "Compute", "Evaluate", "Negotiate", "Finalize"]
    );
}
