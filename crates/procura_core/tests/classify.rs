use pretty_assertions::assert_eq;
use procura_core::{classify, ClassifiedEvent, Classifier, RuleSpec, STANDARD_RULES};

fn log(text: &str) -> ClassifiedEvent {
    ClassifiedEvent::Log {
        text: text.to_string(),
    }
}

#[test]
fn degenerate_inputs_fall_back_to_log() {
    assert_eq!(classify(""), log(""));
    assert_eq!(classify("   "), log(""));
    assert_eq!(classify("[2025-01-01T00:00:00Z]"), log(""));
    assert_eq!(classify("[STREAM CLOSED]"), log(""));
    assert_eq!(classify("🔌 Stream connected"), log("🔌 Stream connected"));
}

#[test]
fn model_selection_is_extracted_and_trimmed() {
    assert_eq!(
        classify("[12:00:01] Sending top choice to Negotiator:   ASUS ProArt P16  "),
        ClassifiedEvent::Model {
            name: "ASUS ProArt P16".to_string()
        }
    );
}

#[test]
fn model_rule_takes_precedence_over_done() {
    assert_eq!(
        classify("sending top choice to negotiator: Dell XPS 15 (scout done)"),
        ClassifiedEvent::Model {
            name: "Dell XPS 15 (scout done)".to_string()
        }
    );
}

#[test]
fn empty_model_name_falls_through() {
    assert_eq!(
        classify("Sending top choice to Negotiator:   "),
        log("Sending top choice to Negotiator:")
    );
}

#[test]
fn scout_counts_are_extracted() {
    assert_eq!(
        classify("Scout Agent found 5 candidates"),
        ClassifiedEvent::ScoutCount { count: 5 }
    );
    assert_eq!(
        classify("scout found12"),
        ClassifiedEvent::ScoutCount { count: 12 }
    );
    assert_eq!(
        classify("[10:00:00Z] 🔎 SCOUT agent: catalog scan found 31 laptops"),
        ClassifiedEvent::ScoutCount { count: 31 }
    );
}

#[test]
fn scout_must_be_a_whole_word() {
    for line in ["Rescouting found 4 laptops", "Scouting pass found 3 laptops"] {
        assert_eq!(classify(line), log(line));
    }
}

#[test]
fn oversized_scout_count_falls_through() {
    let line = "scout found 99999999999999999999";
    assert_eq!(classify(line), log(line));
}

#[test]
fn negotiated_prices_are_normalised() {
    assert_eq!(
        classify("Final negotiated price per unit: $1,299.99"),
        ClassifiedEvent::NegotiationResult {
            final_unit: 1299.99
        }
    );
    assert_eq!(
        classify("[t] final price: 950"),
        ClassifiedEvent::NegotiationResult { final_unit: 950.0 }
    );
    assert_eq!(
        classify("Negotiated price is now €2,100.50 after bulk discount"),
        ClassifiedEvent::NegotiationResult {
            final_unit: 2100.5
        }
    );
}

#[test]
fn unparseable_price_falls_through_to_later_rules() {
    // "1.2.3" is not a number; the line still says "accepted".
    assert_eq!(
        classify("Final price: 1.2.3 accepted"),
        ClassifiedEvent::Done
    );
    assert_eq!(classify("final price: ,,,"), log("final price: ,,,"));
}

#[test]
fn completion_phrases_signal_done() {
    for line in [
        "Deal complete",
        "[12:00:01] Deal complete",
        "Offer ACCEPTED by buyer",
        "Evaluation result delivered to gateway",
        "all done",
    ] {
        assert_eq!(classify(line), ClassifiedEvent::Done, "line: {line}");
    }
}

#[test]
fn timestamp_prefix_is_stripped_once() {
    assert_eq!(classify("[12:00:01] Deal complete"), classify("Deal complete"));
    assert_eq!(
        classify("[a] [b] queued for evaluation"),
        log("[b] queued for evaluation")
    );
}

#[test]
fn unrecognised_text_passes_through_verbatim() {
    assert_eq!(
        classify("[2025-11-02T10:00:00Z]   📨 Chat sent to orchestrator  "),
        log("📨 Chat sent to orchestrator")
    );
}

#[test]
fn custom_rule_tables_are_supported() {
    fn shout(_: &regex::Captures<'_>) -> Option<ClassifiedEvent> {
        Some(ClassifiedEvent::Done)
    }
    let rules = [RuleSpec {
        name: "shout",
        patterns: &["^FIN$"],
        extract: shout,
    }];
    let classifier = Classifier::new(&rules).expect("valid rules");
    assert_eq!(classifier.classify("[x] FIN"), ClassifiedEvent::Done);
    assert_eq!(classifier.classify("deal complete"), log("deal complete"));
}

#[test]
fn standard_rules_keep_their_order() {
    let names: Vec<_> = Classifier::standard().rule_names().collect();
    assert_eq!(
        names,
        vec!["model", "scout_count", "negotiation_result", "done"]
    );
    assert_eq!(STANDARD_RULES.len(), 4);
}

#[test]
fn invalid_patterns_are_reported() {
    fn never(_: &regex::Captures<'_>) -> Option<ClassifiedEvent> {
        None
    }
    let rules = [RuleSpec {
        name: "broken",
        patterns: &["(unclosed"],
        extract: never,
    }];
    assert!(Classifier::new(&rules).is_err());
}
