use std::io::{self, Write};

use procura_core::{AppViewModel, ExportStatus, PillState, WorkflowPhase};

/// Prints what changed between successive view models: new log lines, the
/// workflow timeline when the phase moves, and the summary when a KPI moves.
pub struct Renderer<W: Write> {
    out: W,
    printed_messages: usize,
    last_phase: Option<WorkflowPhase>,
    last_summary: Option<String>,
    last_export: Option<ExportStatus>,
}

impl<W: Write> Renderer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            printed_messages: 0,
            last_phase: None,
            last_summary: None,
            last_export: None,
        }
    }

    pub fn render(&mut self, view: &AppViewModel) -> io::Result<()> {
        if view.messages.len() < self.printed_messages {
            // A new run reset the log.
            self.printed_messages = 0;
        }
        for (index, message) in view.messages.iter().enumerate().skip(self.printed_messages) {
            let mut lines = message.lines();
            let first = lines.next().unwrap_or("");
            writeln!(self.out, "{:02}  {}", index + 1, first)?;
            for continuation in lines {
                writeln!(self.out, "    {continuation}")?;
            }
        }
        self.printed_messages = view.messages.len();

        if self.last_phase != Some(view.phase) {
            writeln!(self.out, "{}", timeline(view))?;
            self.last_phase = Some(view.phase);
        }

        let summary = summary_line(view);
        if self.last_summary.as_deref() != Some(summary.as_str()) {
            writeln!(self.out, "{summary}")?;
            self.last_summary = Some(summary);
        }

        if view.last_export != self.last_export {
            match &view.last_export {
                Some(ExportStatus::Written { path }) => {
                    writeln!(self.out, "Purchase order written to {path}")?
                }
                Some(ExportStatus::Failed { message }) => {
                    writeln!(self.out, "Purchase order export failed: {message}")?
                }
                None => {}
            }
            self.last_export = view.last_export.clone();
        }

        self.out.flush()
    }

    pub fn finish(&mut self, view: &AppViewModel) -> io::Result<()> {
        writeln!(self.out)?;
        writeln!(self.out, "Summary")?;
        if let Some(request_id) = &view.request_id {
            writeln!(self.out, "  Request ID:        {request_id}")?;
        }
        if let Some(model) = &view.selected_model {
            writeln!(self.out, "  Selected model:    {model}")?;
        }
        writeln!(self.out, "  Scout candidates:  {}", view.scout_candidates)?;
        writeln!(self.out, "  Final price / unit: {}", view.final_price)?;
        writeln!(self.out, "  Total cost:        {}", view.total_cost)?;
        writeln!(self.out, "  Status:            {}", view.status_label)?;
        self.out.flush()
    }
}

fn timeline(view: &AppViewModel) -> String {
    let pills: Vec<String> = view
        .pills
        .iter()
        .map(|pill| {
            let marker = match pill.state {
                PillState::Done => '✓',
                PillState::Active => '●',
                PillState::Upcoming => '○',
            };
            format!("{marker} {}", pill.label)
        })
        .collect();
    format!("Workflow: {}", pills.join("  "))
}

fn summary_line(view: &AppViewModel) -> String {
    format!(
        "Summary: scout candidates {} | price/unit {} | total {} | status {}",
        view.scout_candidates, view.final_price, view.total_cost, view.status_label
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use procura_core::{update, AppState, Msg, ProcurementRequest};

    fn run(lines: &[&str]) -> AppState {
        let (state, _) = update(
            AppState::new(),
            Msg::StartClicked(ProcurementRequest::new("gaming", 2, 1800.0)),
        );
        let (state, _) = update(
            state,
            Msg::RequestAccepted {
                request_id: "req-1".to_string(),
            },
        );
        lines.iter().fold(state, |state, line| {
            update(
                state,
                Msg::StreamLine {
                    request_id: "req-1".to_string(),
                    line: line.to_string(),
                },
            )
            .0
        })
    }

    fn rendered(renderer: &Renderer<Vec<u8>>) -> String {
        String::from_utf8(renderer.out.clone()).unwrap()
    }

    #[test]
    fn prints_only_new_lines_and_changes() {
        let mut renderer = Renderer::new(Vec::new());
        let state = run(&["[t] Stream connected"]);
        renderer.render(&state.view()).unwrap();
        let first = rendered(&renderer);
        assert!(first.contains("01  Request Started: req-1"));
        assert!(first.contains("02  Stream connected"));
        assert!(first.contains("● Submitted"));

        renderer.render(&state.view()).unwrap();
        assert_eq!(rendered(&renderer), first);

        let state = run(&["[t] Stream connected", "scout online", "scout found 4"]);
        renderer.render(&state.view()).unwrap();
        let second = rendered(&renderer)[first.len()..].to_string();
        assert!(second.contains("03  scout online"));
        assert!(!second.contains("Stream connected"));
        assert!(second.contains("✓ Submitted  ● Scout  ○ Compute"));
        assert!(second.contains("scout candidates 4"));
    }

    #[test]
    fn finish_prints_final_summary() {
        let mut renderer = Renderer::new(Vec::new());
        let state = run(&[
            "Sending top choice to Negotiator: HP Omen",
            "final price: 1,750",
            "deal complete",
        ]);
        renderer.finish(&state.view()).unwrap();
        let out = rendered(&renderer);
        assert!(out.contains("Selected model:    HP Omen"));
        assert!(out.contains("Final price / unit: $1,750"));
        assert!(out.contains("Total cost:        $3,500"));
        assert!(out.contains("Status:            Completed"));
    }
}
