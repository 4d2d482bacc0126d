//! Workflow phase inference over the accumulated stream log.
//!
//! The backend never announces phases. The current phase is the most
//! advanced one whose keywords appear anywhere in the log so far, so later
//! lines can move the timeline forward but earlier keywords never pull it
//! back.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum WorkflowPhase {
    #[default]
    Submitted,
    Scout,
    Compute,
    Evaluate,
    Negotiate,
    Finalize,
}

impl WorkflowPhase {
    /// Timeline order.
    pub const ALL: [WorkflowPhase; 6] = [
        WorkflowPhase::Submitted,
        WorkflowPhase::Scout,
        WorkflowPhase::Compute,
        WorkflowPhase::Evaluate,
        WorkflowPhase::Negotiate,
        WorkflowPhase::Finalize,
    ];

    pub fn label(self) -> &'static str {
        match self {
            WorkflowPhase::Submitted => "Submitted",
            WorkflowPhase::Scout => "Scout",
            WorkflowPhase::Compute => "Compute",
            WorkflowPhase::Evaluate => "Evaluate",
            WorkflowPhase::Negotiate => "Negotiate",
            WorkflowPhase::Finalize => "Finalize",
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for WorkflowPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Keyword groups, most advanced phase first. Patterns expect lowercased text.
const PHASE_KEYWORDS: &[(WorkflowPhase, &str)] = &[
    (
        WorkflowPhase::Finalize,
        r"savings|accepted|final price|deal complete|evaluation result delivered",
    ),
    (WorkflowPhase::Negotiate, r"negotiator|bulk discount|tier"),
    (
        WorkflowPhase::Evaluate,
        r"evaluator|metta|hybrid|symbolic|compute scoring complete",
    ),
    (
        WorkflowPhase::Compute,
        r"cudos|compute|queued for evaluation|dispatching batch",
    ),
    (
        WorkflowPhase::Scout,
        r"scout|catalog|retrieved .* laptops|found .* candidates",
    ),
];

static PHASE_PATTERNS: LazyLock<Vec<(WorkflowPhase, Regex)>> = LazyLock::new(|| {
    PHASE_KEYWORDS
        .iter()
        .map(|(phase, pattern)| {
            let regex = Regex::new(pattern).expect("phase keyword patterns are valid");
            (*phase, regex)
        })
        .collect()
});

/// Infer the phase from the whole log, joined with `\n` and lowercased.
///
/// `_has_active_request` is accepted for parity with callers that track it;
/// with no keyword hit the answer is [`WorkflowPhase::Submitted`] either way.
pub fn infer_phase(all_lines_joined_lowercased: &str, _has_active_request: bool) -> WorkflowPhase {
    PHASE_PATTERNS
        .iter()
        .find(|(_, regex)| regex.is_match(all_lines_joined_lowercased))
        .map(|(phase, _)| *phase)
        .unwrap_or(WorkflowPhase::Submitted)
}

/// Convenience wrapper that does the joining and lowercasing.
pub fn infer_phase_from_lines<S: AsRef<str>>(lines: &[S], has_active_request: bool) -> WorkflowPhase {
    let text = lines
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join("\n")
        .to_lowercase();
    infer_phase(&text, has_active_request)
}

/// Incremental form of [`infer_phase_from_lines`].
///
/// No keyword spans a line break and the most advanced hit wins, so the
/// phase of the whole log equals the maximum over its lines. The tracker only
/// scans lines it has not seen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PhaseTracker {
    phase: WorkflowPhase,
    lines_seen: usize,
}

impl PhaseTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> WorkflowPhase {
        self.phase
    }

    /// Scan any lines appended since the last call. `lines` must be the same
    /// append-only log each time; a shorter log resets the tracker.
    pub fn observe<S: AsRef<str>>(&mut self, lines: &[S], has_active_request: bool) -> WorkflowPhase {
        if lines.len() < self.lines_seen {
            *self = Self::default();
        }
        for line in &lines[self.lines_seen..] {
            let line_phase = infer_phase(&line.as_ref().to_lowercase(), has_active_request);
            self.phase = self.phase.max(line_phase);
        }
        self.lines_seen = lines.len();
        self.phase
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Rendering state of one pill on the workflow timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PillState {
    Done,
    Active,
    Upcoming,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhasePill {
    pub phase: WorkflowPhase,
    pub label: &'static str,
    pub state: PillState,
}

/// The six timeline pills relative to `current`.
pub fn pill_states(current: WorkflowPhase) -> Vec<PhasePill> {
    WorkflowPhase::ALL
        .iter()
        .map(|&phase| {
            let state = match phase.index().cmp(&current.index()) {
                std::cmp::Ordering::Less => PillState::Done,
                std::cmp::Ordering::Equal => PillState::Active,
                std::cmp::Ordering::Greater => PillState::Upcoming,
            };
            PhasePill {
                phase,
                label: phase.label(),
                state,
            }
        })
        .collect()
}
