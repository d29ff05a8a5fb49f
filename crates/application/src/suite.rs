//! Whole-run orchestration.

use apiprobe_domain::{RunSummary, ScenarioId, ScenarioPlan, SessionState};
use tracing::{Instrument, info, info_span};
use uuid::Uuid;

use crate::error::{ApplicationError, ApplicationResult};
use crate::ports::{Clock, HttpClient, Reporter};
use crate::scenarios::ScenarioRunner;

/// Resolves the scenarios to run.
///
/// An empty selection means the standard plan. Prerequisites of selected
/// scenarios are pulled in. Page checks are appended when `pages` is set.
///
/// The resolved order is checked with [`ScenarioPlan::new`] before it is
/// returned.
///
/// # Errors
///
/// Returns [`ApplicationError::EmptyPlan`] if nothing would run and
/// [`ApplicationError::Domain`] if the order breaks a prerequisite.
pub fn resolve_plan(only: &[ScenarioId], pages: bool) -> ApplicationResult<ScenarioPlan> {
    let plan = if only.is_empty() {
        ScenarioPlan::standard()
    } else {
        ScenarioPlan::select(only)
    };
    let plan = if pages { plan.with_pages() } else { plan };

    if plan.is_empty() {
        return Err(ApplicationError::EmptyPlan);
    }
    Ok(ScenarioPlan::new(plan.steps().to_vec())?)
}

/// Runs a plan and produces the summary.
pub struct RunSuite<C, R, K> {
    runner: ScenarioRunner<C, R, K>,
}

impl<C: HttpClient, R: Reporter, K: Clock> RunSuite<C, R, K> {
    /// Creates a suite around a scenario runner.
    pub const fn new(runner: ScenarioRunner<C, R, K>) -> Self {
        Self { runner }
    }

    /// Runs every scenario of `plan` in order against `session`.
    ///
    /// Scenario failures never abort the run. Counters start from zero on
    /// every call.
    pub async fn run(&mut self, plan: &ScenarioPlan, session: &mut SessionState) -> RunSummary {
        let run_id = Uuid::now_v7().to_string();
        let span = info_span!("run", run_id = %run_id, base_url = %session.base_url());
        self.runner.reset_tally();

        info!(parent: &span, scenarios = plan.len(), "starting run");
        let mut scenarios = Vec::with_capacity(plan.len());
        for &id in plan.steps() {
            let result = self
                .runner
                .run(id, session)
                .instrument(info_span!(parent: &span, "scenario", scenario = %id))
                .await;
            info!(
                parent: &span,
                scenario = %id,
                passed = result.passed(),
                checks = result.checks.len(),
                "scenario finished"
            );
            scenarios.push(result);
        }

        let summary = RunSummary::new(run_id, self.runner.tally(), scenarios);
        info!(
            parent: &span,
            attempted = summary.attempted,
            passed = summary.passed,
            failed = summary.failed,
            success_rate = summary.success_rate,
            "run finished"
        );
        self.runner.reporter_mut().summary(&summary);
        summary
    }

    /// Returns the reporter.
    pub const fn reporter_mut(&mut self) -> &mut R {
        self.runner.reporter_mut()
    }
}
