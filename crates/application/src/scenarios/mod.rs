//! Scenario procedures.
//!
//! A scenario is a named group of dependent checks. [`ScenarioRunner::run`]
//! dispatches on the [`ScenarioId`] and collects the outcomes of every check
//! it issued, plus any response-validation failures, into a
//! [`ScenarioResult`]. Scenarios share one [`SessionState`] so that the
//! token and resource ids produced by one are visible to the next.

mod auth;
mod pages;
mod public;
mod resources;

use apiprobe_domain::{
    CheckSpec, PageProbe, ResponseRecord, RunTally, ScenarioId, ScenarioResult, SessionState,
    ValidationError, decode, decode_list,
};
use serde::Serialize;
use tracing::warn;

use crate::invoker::CheckInvoker;
use crate::ports::{Clock, HttpClient, Reporter};

/// Failure recorded when a token-dependent scenario runs without a token.
pub const NO_TOKEN: &str = "no auth token available";

/// Knobs of the scenario procedures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioSettings {
    /// Domain of the generated registration email.
    pub email_domain: String,
    /// Password of the generated test user.
    pub password: String,
    /// Base address of the public site probed by the pages scenario.
    /// Falls back to the API base address.
    pub pages_base_url: Option<String>,
    /// Pages probed by the pages scenario.
    pub pages: Vec<PageProbe>,
}

impl Default for ScenarioSettings {
    fn default() -> Self {
        Self {
            email_domain: "doxa.test".to_string(),
            password: "TestPass123!".to_string(),
            pages_base_url: None,
            pages: PageProbe::defaults(),
        }
    }
}

/// Runs scenarios against a session.
pub struct ScenarioRunner<C, R, K> {
    invoker: CheckInvoker<C, R>,
    clock: K,
    settings: ScenarioSettings,
}

impl<C: HttpClient, R: Reporter, K: Clock> ScenarioRunner<C, R, K> {
    /// Creates a runner.
    pub const fn new(invoker: CheckInvoker<C, R>, clock: K, settings: ScenarioSettings) -> Self {
        Self {
            invoker,
            clock,
            settings,
        }
    }

    /// Runs one scenario, updating `session` with whatever it produces.
    ///
    /// Never fails: every problem is recorded in the returned result. A
    /// scenario that needs a token and finds none fails without sending a
    /// request.
    pub async fn run(&mut self, id: ScenarioId, session: &mut SessionState) -> ScenarioResult {
        self.invoker.reporter_mut().scenario_started(id);
        let mut result = ScenarioResult::new(id);

        if id.requires_token() && !session.has_token() {
            warn!(scenario = %id, "skipping checks: {NO_TOKEN}");
            result.fail(NO_TOKEN);
        } else {
            match id {
                ScenarioId::Health => self.health(session, &mut result).await,
                ScenarioId::Branches => self.branches(session, &mut result).await,
                ScenarioId::Register => self.register(session, &mut result).await,
                ScenarioId::Login => self.login(session, &mut result).await,
                ScenarioId::Profile => self.profile(session, &mut result).await,
                ScenarioId::Orders => self.orders(session, &mut result).await,
                ScenarioId::Messages => self.messages(session, &mut result).await,
                ScenarioId::Quotes => self.quotes(session, &mut result).await,
                ScenarioId::Prospects => self.prospects(session, &mut result).await,
                ScenarioId::AuthGuard => self.auth_guard(session, &mut result).await,
                ScenarioId::Pages => self.pages(session, &mut result).await,
            }
        }

        self.invoker.reporter_mut().scenario_finished(&result);
        result
    }

    /// Returns the counters of every check issued so far.
    pub const fn tally(&self) -> RunTally {
        self.invoker.tally()
    }

    /// Clears the counters.
    pub const fn reset_tally(&mut self) {
        self.invoker.reset_tally();
    }

    /// Returns the reporter.
    pub const fn reporter_mut(&mut self) -> &mut R {
        self.invoker.reporter_mut()
    }

    /// Sends `spec` and decodes the body as `T` when the status matched.
    async fn expect<T: ResponseRecord>(
        &mut self,
        session: &SessionState,
        result: &mut ScenarioResult,
        spec: CheckSpec,
    ) -> Option<T> {
        let outcome = result.push(self.invoker.invoke(session, &spec).await);
        if !outcome.passed {
            return None;
        }
        match decode::<T>(outcome.body()) {
            Ok(record) => Some(record),
            Err(error) => {
                self.reject(result, &spec.name, &error);
                None
            }
        }
    }

    /// Sends `spec` and decodes the body as a list of `T`.
    async fn expect_list<T: ResponseRecord>(
        &mut self,
        session: &SessionState,
        result: &mut ScenarioResult,
        spec: CheckSpec,
    ) -> Option<Vec<T>> {
        let outcome = result.push(self.invoker.invoke(session, &spec).await);
        if !outcome.passed {
            return None;
        }
        match decode_list::<T>(outcome.body()) {
            Ok(records) => Some(records),
            Err(error) => {
                self.reject(result, &spec.name, &error);
                None
            }
        }
    }

    /// Sends `spec` and reports only whether the status matched.
    async fn expect_status(
        &mut self,
        session: &SessionState,
        result: &mut ScenarioResult,
        spec: CheckSpec,
    ) -> bool {
        result.push(self.invoker.invoke(session, &spec).await).passed
    }

    fn reject(&mut self, result: &mut ScenarioResult, check: &str, error: &ValidationError) {
        warn!(scenario = %result.id, check, %error, "response failed validation");
        self.note(&format!("invalid response to {check}: {error}"));
        result.fail(format!("{check}: {error}"));
    }

    fn note(&mut self, message: &str) {
        self.invoker.reporter_mut().note(message);
    }
}

/// Builds a POST check, recording a failure if the body cannot be encoded.
fn post_check<T: Serialize>(
    result: &mut ScenarioResult,
    name: &str,
    path: &str,
    body: &T,
) -> Option<CheckSpec> {
    match CheckSpec::post(name, path, 200, body) {
        Ok(spec) => Some(spec),
        Err(error) => {
            result.fail(format!("{name}: {error}"));
            None
        }
    }
}

/// Returns the first `max` characters of a token for display.
fn token_preview(token: &str, max: usize) -> String {
    let preview: String = token.chars().take(max).collect();
    format!("{preview}...")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_support::{FixedClock, MockHttpClient, RecordingReporter};
    use apiprobe_domain::request::HttpMethod;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::sync::Arc;

    pub(super) fn runner(
        client: &Arc<MockHttpClient>,
    ) -> ScenarioRunner<MockHttpClient, RecordingReporter, FixedClock> {
        ScenarioRunner::new(
            CheckInvoker::new(Arc::clone(client), RecordingReporter::default()),
            FixedClock::default(),
            ScenarioSettings::default(),
        )
    }

    pub(super) fn session() -> SessionState {
        SessionState::new("https://api.example.com").unwrap()
    }

    #[tokio::test]
    async fn test_token_scenarios_fail_without_token() {
        let client = Arc::new(MockHttpClient::new());
        let mut runner = runner(&client);
        let mut session = session();

        for id in [
            ScenarioId::Profile,
            ScenarioId::Orders,
            ScenarioId::Messages,
            ScenarioId::AuthGuard,
        ] {
            let result = runner.run(id, &mut session).await;
            assert!(!result.passed(), "{id}");
            assert_eq!(result.failures, vec![NO_TOKEN.to_string()]);
            assert!(result.checks.is_empty());
        }

        assert!(client.requests().is_empty());
        assert_eq!(runner.tally(), RunTally::default());
    }

    #[tokio::test]
    async fn test_reporter_sees_scenario_boundaries() {
        let client = Arc::new(
            MockHttpClient::new().on(HttpMethod::Get, "api/health", 200, json!({"status": "healthy"})),
        );
        let mut runner = runner(&client);

        runner.run(ScenarioId::Health, &mut session()).await;

        assert_eq!(
            runner.reporter_mut().events,
            vec![
                "start health".to_string(),
                "check 1: Health Check".to_string(),
                "finished Health Check: passed".to_string(),
                "note Backend is healthy and running".to_string(),
                "end health: passed".to_string(),
            ]
        );
    }

    #[test]
    fn test_token_preview() {
        assert_eq!(token_preview("abcdefghijklmnopqrstuvwxyz", 20), "abcdefghijklmnopqrst...");
        assert_eq!(token_preview("short", 20), "short...");
    }
}
