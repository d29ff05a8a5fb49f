//! The HTTP invocation primitive every scenario is built from.
//!
//! [`CheckInvoker::invoke`] turns a [`CheckSpec`] into a request against the
//! session's base address, sends it, compares the status and counts the
//! result. It never fails: transport errors become failed outcomes.

use std::sync::Arc;
use std::time::Duration;

use apiprobe_domain::request::{DEFAULT_TIMEOUT_MS, Headers, RequestSpec};
use apiprobe_domain::response::ResponseSpec;
use apiprobe_domain::{CheckOutcome, CheckSpec, RunTally, SessionState};
use tracing::{debug, info, warn};

use crate::ports::{HttpClient, Reporter};

/// Sends checks, keeps the run tally and forwards progress to a reporter.
pub struct CheckInvoker<C, R> {
    client: Arc<C>,
    reporter: R,
    timeout_ms: u64,
    tally: RunTally,
}

impl<C: HttpClient, R: Reporter> CheckInvoker<C, R> {
    /// Creates an invoker with the default 10 second timeout.
    pub const fn new(client: Arc<C>, reporter: R) -> Self {
        Self {
            client,
            reporter,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            tally: RunTally {
                attempted: 0,
                passed: 0,
            },
        }
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Builds the request for `spec` in the context of `session`.
    ///
    /// Defaults are a JSON content type and, when the session holds a
    /// token, a bearer authorization header. Headers set on the check override
    /// both.
    #[must_use]
    pub fn build_request(&self, session: &SessionState, spec: &CheckSpec) -> RequestSpec {
        let mut headers = Headers::new();
        headers.set("Content-Type", "application/json");
        if let Some(token) = session.auth_token() {
            headers.set("Authorization", format!("Bearer {token}"));
        }
        headers.extend_from(&spec.headers);

        let mut request = RequestSpec::new(&spec.name, spec.method, session.url_for(&spec.path));
        request.headers = headers;
        request.body = spec.body.clone();
        request.timeout_ms = self.timeout_ms;
        request
    }

    /// Executes a check and returns its outcome.
    pub async fn invoke(&mut self, session: &SessionState, spec: &CheckSpec) -> CheckOutcome {
        self.invoke_raw(session, spec).await.0
    }

    /// Executes a check and also returns the raw response, if one arrived.
    pub async fn invoke_raw(
        &mut self,
        session: &SessionState,
        spec: &CheckSpec,
    ) -> (CheckOutcome, Option<ResponseSpec>) {
        let request = self.build_request(session, spec);
        self.reporter.check_started(self.tally.attempted + 1, spec);
        debug!(
            check = %spec.name,
            method = %request.method,
            url = %request.url,
            authorized = session.has_token(),
            "sending check"
        );

        let (outcome, response) = match self.client.execute(&request).await {
            Ok(response) => (CheckOutcome::from_response(spec, &response), Some(response)),
            Err(error) => (CheckOutcome::transport_failure(spec, error.to_string()), None),
        };

        self.tally.record(outcome.passed);
        if outcome.passed {
            info!(check = %spec.name, status = ?outcome.actual_status, "check passed");
        } else {
            warn!(
                check = %spec.name,
                expected = spec.expected_status,
                actual = ?outcome.actual_status,
                error = outcome.error.as_deref().unwrap_or_default(),
                "check failed"
            );
        }
        self.reporter.check_finished(&outcome);

        (outcome, response)
    }

    /// Returns the counters accumulated since the last reset.
    pub const fn tally(&self) -> RunTally {
        self.tally
    }

    /// Clears the counters.
    pub const fn reset_tally(&mut self) {
        self.tally = RunTally {
            attempted: 0,
            passed: 0,
        };
    }

    /// Returns the reporter, for scenario-level events.
    pub const fn reporter_mut(&mut self) -> &mut R {
        &mut self.reporter
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::ports::HttpClientError;
    use crate::test_support::{MockHttpClient, RecordingReporter};
    use apiprobe_domain::request::HttpMethod;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn session() -> SessionState {
        SessionState::new("https://api.example.com").unwrap()
    }

    #[test]
    fn test_build_request_without_token() {
        let invoker = CheckInvoker::new(Arc::new(MockHttpClient::new()), RecordingReporter::default());
        let request = invoker.build_request(&session(), &CheckSpec::get("Health", "api/health", 200));

        assert_eq!(request.url, "https://api.example.com/api/health");
        assert_eq!(request.headers.get("content-type"), Some("application/json"));
        assert_eq!(request.headers.get("authorization"), None);
        assert_eq!(request.timeout_ms, 10_000);
    }

    #[test]
    fn test_build_request_adds_bearer_and_honours_overrides() {
        let invoker = CheckInvoker::new(Arc::new(MockHttpClient::new()), RecordingReporter::default())
            .with_timeout(Duration::from_secs(3));
        let mut session = session();
        session.set_auth_token("abc");

        let plain = invoker.build_request(&session, &CheckSpec::get("Me", "api/auth/me", 200));
        assert_eq!(plain.headers.get("Authorization"), Some("Bearer abc"));
        assert_eq!(plain.timeout_ms, 3_000);

        let spec = CheckSpec::get("Me", "api/auth/me", 401).with_header("authorization", "Basic xyz");
        let overridden = invoker.build_request(&session, &spec);
        assert_eq!(overridden.headers.get("Authorization"), Some("Basic xyz"));
        assert_eq!(overridden.headers.len(), 2);
    }

    #[tokio::test]
    async fn test_invoke_counts_passes_and_mismatches() {
        let client = MockHttpClient::new()
            .on(HttpMethod::Get, "api/health", 200, json!({"status": "healthy"}))
            .on(HttpMethod::Get, "api/branches", 500, json!({"detail": "boom"}));
        let mut invoker = CheckInvoker::new(Arc::new(client), RecordingReporter::default());
        let session = session();

        let ok = invoker
            .invoke(&session, &CheckSpec::get("Health", "api/health", 200))
            .await;
        let bad = invoker
            .invoke(&session, &CheckSpec::get("Branches", "api/branches", 200))
            .await;

        assert!(ok.passed);
        assert_eq!(ok.body(), Some(&json!({"status": "healthy"})));
        assert!(!bad.passed);
        assert_eq!(bad.actual_status, Some(500));
        assert_eq!(invoker.tally(), RunTally { attempted: 2, passed: 1 });
        assert_eq!(
            invoker.reporter_mut().events,
            vec![
                "check 1: Health".to_string(),
                "finished Health: passed".to_string(),
                "check 2: Branches".to_string(),
                "finished Branches: failed".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_transport_error_becomes_failed_outcome() {
        let client = MockHttpClient::new().fail(
            HttpMethod::Get,
            "api/health",
            HttpClientError::Timeout { timeout_ms: 10_000 },
        );
        let mut invoker = CheckInvoker::new(Arc::new(client), RecordingReporter::default());

        let (outcome, response) = invoker
            .invoke_raw(&session(), &CheckSpec::get("Health", "api/health", 200))
            .await;

        assert!(!outcome.passed);
        assert!(response.is_none());
        assert_eq!(outcome.actual_status, None);
        assert_eq!(
            outcome.error.as_deref(),
            Some("request timed out after 10000 ms")
        );
        assert_eq!(invoker.tally(), RunTally { attempted: 1, passed: 0 });
    }

    #[tokio::test]
    async fn test_reset_tally() {
        let client = MockHttpClient::new().on(HttpMethod::Get, "api/health", 200, json!({}));
        let mut invoker = CheckInvoker::new(Arc::new(client), RecordingReporter::default());
        invoker
            .invoke(&session(), &CheckSpec::get("Health", "api/health", 200))
            .await;
        invoker.reset_tally();
        assert_eq!(invoker.tally(), RunTally::default());
    }
}
