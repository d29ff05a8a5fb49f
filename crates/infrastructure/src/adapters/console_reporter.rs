//! Human-readable progress report.

use std::io::{self, Stdout, Write};

use apiprobe_application::ports::Reporter;
use apiprobe_domain::{CheckOutcome, CheckSpec, RunSummary, ScenarioId, ScenarioResult};

const RULE_WIDTH: usize = 60;

/// Writes progress lines and the final summary to a writer, stdout by
/// default.
///
/// Write errors are ignored: a closed stdout must not change the outcome
/// of the run.
#[derive(Debug)]
pub struct ConsoleReporter<W = Stdout> {
    out: W,
}

impl ConsoleReporter<Stdout> {
    /// Creates a reporter writing to stdout.
    #[must_use]
    pub fn stdout() -> Self {
        Self { out: io::stdout() }
    }
}

impl<W: Write + Send> ConsoleReporter<W> {
    /// Creates a reporter writing to `out`.
    pub const fn new(out: W) -> Self {
        Self { out }
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn rule(&mut self) {
        writeln!(self.out, "{}", "=".repeat(RULE_WIDTH)).ok();
    }
}

impl<W: Write + Send> Reporter for ConsoleReporter<W> {
    fn scenario_started(&mut self, id: ScenarioId) {
        writeln!(self.out, "\n--- {} ({id}) ---", id.title()).ok();
    }

    fn check_started(&mut self, index: usize, spec: &CheckSpec) {
        writeln!(
            self.out,
            "Test {index}: {} [{} {}]",
            spec.name, spec.method, spec.path
        )
        .ok();
    }

    fn check_finished(&mut self, outcome: &CheckOutcome) {
        let elapsed = outcome.duration.as_millis();
        if outcome.passed {
            let status = outcome.actual_status.unwrap_or_default();
            writeln!(self.out, "   PASS ({status}, {elapsed} ms)").ok();
        } else {
            let reason = outcome.error.as_deref().unwrap_or("failed");
            writeln!(self.out, "   FAIL - {reason}").ok();
        }
    }

    fn note(&mut self, message: &str) {
        writeln!(self.out, "   {message}").ok();
    }

    fn scenario_finished(&mut self, result: &ScenarioResult) {
        for failure in &result.failures {
            writeln!(self.out, "   FAIL - {failure}").ok();
        }
    }

    fn summary(&mut self, summary: &RunSummary) {
        writeln!(self.out).ok();
        self.rule();
        writeln!(self.out, "TEST SUMMARY").ok();
        self.rule();
        writeln!(self.out, "Total tests:  {}", summary.attempted).ok();
        writeln!(self.out, "Passed:       {}", summary.passed).ok();
        writeln!(self.out, "Failed:       {}", summary.failed).ok();
        writeln!(self.out, "Success rate: {:.1}%", summary.success_rate).ok();

        let failed: Vec<&str> = summary.failed_scenarios().map(|s| s.id.as_str()).collect();
        if failed.is_empty() {
            writeln!(self.out, "\nAll scenarios passed.").ok();
        } else {
            writeln!(self.out, "\nFailed scenarios: {}", failed.join(", ")).ok();
        }
        self.out.flush().ok();
    }
}

/// Discards every event. Used when the summary is printed as JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentReporter;

impl Reporter for SilentReporter {
    fn scenario_started(&mut self, _id: ScenarioId) {}

    fn check_started(&mut self, _index: usize, _spec: &CheckSpec) {}

    fn check_finished(&mut self, _outcome: &CheckOutcome) {}

    fn note(&mut self, _message: &str) {}

    fn scenario_finished(&mut self, _result: &ScenarioResult) {}

    fn summary(&mut self, _summary: &RunSummary) {}
}
