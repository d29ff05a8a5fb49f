//! Progress reporting port

use apiprobe_domain::{CheckOutcome, CheckSpec, RunSummary, ScenarioId, ScenarioResult};

/// Receives human-facing progress events during a run.
///
/// Reporting is a side channel: implementations must not fail the run,
/// so every method is infallible.
pub trait Reporter: Send {
    /// A scenario is about to run.
    fn scenario_started(&mut self, id: ScenarioId);

    /// Check number `index` (1-based, run-wide) is about to be sent.
    fn check_started(&mut self, index: usize, spec: &CheckSpec);

    /// A check finished.
    fn check_finished(&mut self, outcome: &CheckOutcome);

    /// Free-form detail about the running scenario (received token, ids).
    fn note(&mut self, message: &str);

    /// A scenario finished.
    fn scenario_finished(&mut self, result: &ScenarioResult);

    /// The run finished.
    fn summary(&mut self, summary: &RunSummary);
}
