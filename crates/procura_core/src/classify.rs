//! Best-effort classification of agent log lines into typed events.
//!
//! The upstream agents emit human-readable lines rather than a typed
//! protocol. Each line is normalised (leading `[...]` token stripped, then
//! trimmed) and run through an ordered rule table; the first rule whose
//! extractor yields an event wins. Anything left over becomes
//! [`ClassifiedEvent::Log`], so classification is total.

use std::sync::LazyLock;

use regex::{Captures, Regex};

/// One typed event extracted from a raw stream line.
#[derive(Debug, Clone, PartialEq)]
pub enum ClassifiedEvent {
    /// The negotiator was handed a specific product.
    Model { name: String },
    /// A scouting pass reported how many candidates it found.
    ScoutCount { count: u32 },
    /// Final agreed unit price.
    NegotiationResult { final_unit: f64 },
    /// Terminal signal; no further meaningful state changes are expected.
    Done,
    /// Anything unrecognised, passed through for display.
    Log { text: String },
}

/// Turns the captures of a matching pattern into an event, or declines.
///
/// Declining (returning `None`) lets the next pattern, then the next rule,
/// have a go.
pub type Extractor = fn(&Captures<'_>) -> Option<ClassifiedEvent>;

/// A named classification rule: patterns tried in order, one extractor.
#[derive(Debug, Clone, Copy)]
pub struct RuleSpec {
    pub name: &'static str,
    pub patterns: &'static [&'static str],
    pub extract: Extractor,
}

/// Rules for the procurement agents, in precedence order.
pub const STANDARD_RULES: &[RuleSpec] = &[
    RuleSpec {
        name: "model",
        patterns: &[r"(?i)sending top choice to negotiator:\s*(.*)"],
        extract: extract_model,
    },
    RuleSpec {
        name: "scout_count",
        patterns: &[r"(?i)\bscout(?:\s+agent)?\b.*?\bfound\s*(\d+)"],
        extract: extract_scout_count,
    },
    RuleSpec {
        name: "negotiation_result",
        patterns: &[
            r"(?i)final (?:negotiated )?price(?: per unit)?:?\s*\p{Sc}?([\d.,]+)",
            r"(?i)negotiated price.*?\p{Sc}?([\d.,]+)",
        ],
        extract: extract_price,
    },
    RuleSpec {
        name: "done",
        patterns: &[r"(?i)deal complete|accepted|evaluation result delivered|done"],
        extract: extract_done,
    },
];

static PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*\[.*?\]\s*").expect("prefix pattern is valid")
});

static STANDARD: LazyLock<Classifier> = LazyLock::new(|| {
    Classifier::new(STANDARD_RULES).expect("standard classifier patterns are valid")
});

#[derive(Debug, Clone)]
struct CompiledRule {
    name: &'static str,
    patterns: Vec<Regex>,
    extract: Extractor,
}

/// An ordered, compiled rule table.
#[derive(Debug, Clone)]
pub struct Classifier {
    rules: Vec<CompiledRule>,
}

impl Classifier {
    /// Compile a rule table. Fails only on an invalid pattern.
    pub fn new(rules: &[RuleSpec]) -> Result<Self, regex::Error> {
        let rules = rules
            .iter()
            .map(|rule| {
                let patterns = rule
                    .patterns
                    .iter()
                    .map(|pattern| Regex::new(pattern))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(CompiledRule {
                    name: rule.name,
                    patterns,
                    extract: rule.extract,
                })
            })
            .collect::<Result<Vec<_>, regex::Error>>()?;
        Ok(Self { rules })
    }

    /// The shared classifier built from [`STANDARD_RULES`].
    pub fn standard() -> &'static Classifier {
        &STANDARD
    }

    /// Rule names in evaluation order.
    pub fn rule_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.rules.iter().map(|rule| rule.name)
    }

    pub fn classify(&self, raw: &str) -> ClassifiedEvent {
        let msg = normalize(raw);
        for rule in &self.rules {
            for pattern in &rule.patterns {
                let Some(caps) = pattern.captures(msg) else {
                    continue;
                };
                if let Some(event) = (rule.extract)(&caps) {
                    return event;
                }
            }
        }
        ClassifiedEvent::Log {
            text: msg.to_string(),
        }
    }
}

/// Classify one raw stream line with the standard rules.
pub fn classify(raw: &str) -> ClassifiedEvent {
    Classifier::standard().classify(raw)
}

/// Strip one leading bracketed token (usually a timestamp) and trim.
pub fn normalize(raw: &str) -> &str {
    match PREFIX.find(raw) {
        Some(prefix) => raw[prefix.end()..].trim(),
        None => raw.trim(),
    }
}

fn extract_model(caps: &Captures<'_>) -> Option<ClassifiedEvent> {
    let name = caps.get(1)?.as_str().trim();
    if name.is_empty() {
        return None;
    }
    Some(ClassifiedEvent::Model {
        name: name.to_string(),
    })
}

fn extract_scout_count(caps: &Captures<'_>) -> Option<ClassifiedEvent> {
    let count = caps.get(1)?.as_str().parse::<u32>().ok()?;
    Some(ClassifiedEvent::ScoutCount { count })
}

fn extract_price(caps: &Captures<'_>) -> Option<ClassifiedEvent> {
    let digits = caps.get(1)?.as_str().replace(',', "");
    let final_unit = digits.parse::<f64>().ok().filter(|v| v.is_finite())?;
    Some(ClassifiedEvent::NegotiationResult { final_unit })
}

fn extract_done(_caps: &Captures<'_>) -> Option<ClassifiedEvent> {
    Some(ClassifiedEvent::Done)
}
