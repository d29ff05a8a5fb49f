//! Test doubles shared by the unit tests of this crate.

#![allow(clippy::unwrap_used)]

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;
use std::time::Duration;

use apiprobe_domain::request::{HttpMethod, RequestSpec};
use apiprobe_domain::response::ResponseSpec;
use apiprobe_domain::{CheckOutcome, CheckSpec, RunSummary, ScenarioId, ScenarioResult};
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

use crate::ports::{Clock, HttpClient, HttpClientError, Reporter};

type Responder = Box<dyn Fn(&RequestSpec) -> Result<ResponseSpec, HttpClientError> + Send + Sync>;

struct Route {
    method: HttpMethod,
    path: String,
    respond: Responder,
}

/// Routes requests by method and URL suffix to canned responses and
/// records everything it receives. Unrouted requests get a 404.
pub struct MockHttpClient {
    routes: Vec<Route>,
    requests: Mutex<Vec<RequestSpec>>,
}

pub fn json_response(status: u16, body: &Value) -> ResponseSpec {
    ResponseSpec::new(
        status,
        HashMap::new(),
        serde_json::to_vec(body).unwrap(),
        Duration::from_millis(5),
    )
}

impl MockHttpClient {
    pub fn new() -> Self {
        Self {
            routes: Vec::new(),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn on(self, method: HttpMethod, path: &str, status: u16, body: Value) -> Self {
        self.on_with(method, path, move |_| Ok(json_response(status, &body)))
    }

    pub fn on_with(
        mut self,
        method: HttpMethod,
        path: &str,
        respond: impl Fn(&RequestSpec) -> Result<ResponseSpec, HttpClientError> + Send + Sync + 'static,
    ) -> Self {
        self.routes.push(Route {
            method,
            path: path.to_string(),
            respond: Box::new(respond),
        });
        self
    }

    pub fn fail(self, method: HttpMethod, path: &str, error: HttpClientError) -> Self {
        self.on_with(method, path, move |_| Err(error.clone()))
    }

    pub fn requests(&self) -> Vec<RequestSpec> {
        self.requests.lock().unwrap().clone()
    }

    pub fn requests_to(&self, method: HttpMethod, path: &str) -> Vec<RequestSpec> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method && r.url.ends_with(path))
            .collect()
    }

    fn respond(&self, request: &RequestSpec) -> Result<ResponseSpec, HttpClientError> {
        self.requests.lock().unwrap().push(request.clone());
        self.routes
            .iter()
            .find(|route| route.method == request.method && request.url.ends_with(&route.path))
            .map_or_else(
                || Ok(json_response(404, &serde_json::json!({"detail": "Not Found"}))),
                |route| (route.respond)(request),
            )
    }
}

impl HttpClient for MockHttpClient {
    fn execute(
        &self,
        request: &RequestSpec,
    ) -> Pin<Box<dyn Future<Output = Result<ResponseSpec, HttpClientError>> + Send + '_>> {
        let result = self.respond(request);
        Box::pin(async move { result })
    }
}

/// A clock stopped at 15:30:45 UTC.
pub struct FixedClock(pub DateTime<Utc>);

impl Default for FixedClock {
    fn default() -> Self {
        Self(Utc.with_ymd_and_hms(2026, 3, 14, 15, 30, 45).unwrap())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Records reporter events as short strings.
#[derive(Debug, Default)]
pub struct RecordingReporter {
    pub events: Vec<String>,
}

impl Reporter for RecordingReporter {
    fn scenario_started(&mut self, id: ScenarioId) {
        self.events.push(format!("start {id}"));
    }

    fn check_started(&mut self, index: usize, spec: &CheckSpec) {
        self.events.push(format!("check {index}: {}", spec.name));
    }

    fn check_finished(&mut self, outcome: &CheckOutcome) {
        let verdict = if outcome.passed { "passed" } else { "failed" };
        self.events
            .push(format!("finished {}: {verdict}", outcome.name));
    }

    fn note(&mut self, message: &str) {
        self.events.push(format!("note {message}"));
    }

    fn scenario_finished(&mut self, result: &ScenarioResult) {
        let verdict = if result.passed() { "passed" } else { "failed" };
        self.events.push(format!("end {}: {verdict}", result.id));
    }

    fn summary(&mut self, summary: &RunSummary) {
        self.events
            .push(format!("summary {}/{}", summary.passed, summary.attempted));
    }
}
