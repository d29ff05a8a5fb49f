//! Check definitions, outcomes and run summaries.
//!
//! A [`CheckSpec`] describes one HTTP request plus the status it must
//! answer with. Executing it yields a [`CheckOutcome`]. Outcomes are grouped
//! per scenario in a [`ScenarioResult`], and the whole run is summarised in
//! a [`RunSummary`].

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::plan::ScenarioId;
use crate::request::{Headers, HttpMethod};
use crate::response::ResponseSpec;

/// Number of body characters kept in a status-mismatch diagnostic.
const MISMATCH_EXCERPT_CHARS: usize = 200;

/// Definition of a single check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckSpec {
    /// Human-readable name.
    pub name: String,
    /// HTTP method.
    pub method: HttpMethod,
    /// Path relative to the session base address, or an absolute URL.
    pub path: String,
    /// Status code the check expects.
    pub expected_status: u16,
    /// JSON request body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<serde_json::Value>,
    /// Headers applied on top of the session defaults.
    #[serde(default, skip_serializing_if = "Headers::is_empty")]
    pub headers: Headers,
}

impl CheckSpec {
    /// Creates a check with no body and no extra headers.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        method: HttpMethod,
        path: impl Into<String>,
        expected_status: u16,
    ) -> Self {
        Self {
            name: name.into(),
            method,
            path: path.into(),
            expected_status,
            body: None,
            headers: Headers::new(),
        }
    }

    /// Creates a GET check.
    #[must_use]
    pub fn get(name: impl Into<String>, path: impl Into<String>, expected_status: u16) -> Self {
        Self::new(name, HttpMethod::Get, path, expected_status)
    }

    /// Creates a POST check carrying `body` serialized as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidBody`] if `body` cannot be represented
    /// as JSON.
    pub fn post<T: Serialize>(
        name: impl Into<String>,
        path: impl Into<String>,
        expected_status: u16,
        body: &T,
    ) -> DomainResult<Self> {
        let body =
            serde_json::to_value(body).map_err(|e| DomainError::InvalidBody(e.to_string()))?;
        Ok(Self::new(name, HttpMethod::Post, path, expected_status).with_body(body))
    }

    /// Sets the JSON body.
    #[must_use]
    pub fn with_body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Adds a header that overrides the session defaults.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.set(name, value);
        self
    }
}

/// Result of executing one check. Immutable once recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckOutcome {
    /// Name of the check.
    pub name: String,
    /// HTTP method used.
    pub method: HttpMethod,
    /// Path or URL requested.
    pub path: String,
    /// Expected status code.
    pub expected_status: u16,
    /// Observed status code; `None` when no response was received.
    pub actual_status: Option<u16>,
    /// Whether the observed status matched.
    pub passed: bool,
    /// Parsed response body; `None` when no response was received.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<serde_json::Value>,
    /// Transport error or status-mismatch diagnostic.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Time spent waiting for the response.
    #[serde(with = "duration_millis")]
    pub duration: Duration,
}

impl CheckOutcome {
    /// Builds the outcome of a check that received `response`.
    #[must_use]
    pub fn from_response(spec: &CheckSpec, response: &ResponseSpec) -> Self {
        let passed = response.status == spec.expected_status;
        let error = (!passed).then(|| {
            format!(
                "expected status {}, got {}: {}",
                spec.expected_status,
                response.status,
                response.body_excerpt(MISMATCH_EXCERPT_CHARS)
            )
        });

        Self {
            name: spec.name.clone(),
            method: spec.method,
            path: spec.path.clone(),
            expected_status: spec.expected_status,
            actual_status: Some(response.status),
            passed,
            body: Some(response.json_or_empty()),
            error,
            duration: response.duration,
        }
    }

    /// Builds the outcome of a check whose request never got a response.
    #[must_use]
    pub fn transport_failure(spec: &CheckSpec, error: impl Into<String>) -> Self {
        Self {
            name: spec.name.clone(),
            method: spec.method,
            path: spec.path.clone(),
            expected_status: spec.expected_status,
            actual_status: None,
            passed: false,
            body: None,
            error: Some(error.into()),
            duration: Duration::ZERO,
        }
    }

    /// Returns the parsed body, if a response was received.
    #[must_use]
    pub const fn body(&self) -> Option<&serde_json::Value> {
        self.body.as_ref()
    }
}

/// Attempted and passed check counters for a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunTally {
    /// Checks issued.
    pub attempted: usize,
    /// Checks whose status matched.
    pub passed: usize,
}

impl RunTally {
    /// Counts one check.
    pub const fn record(&mut self, passed: bool) {
        self.attempted += 1;
        if passed {
            self.passed += 1;
        }
    }

    /// Checks that did not pass.
    #[must_use]
    pub const fn failed(&self) -> usize {
        self.attempted - self.passed
    }

    /// Percentage of passed checks; 0 when nothing was attempted.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn success_rate(&self) -> f64 {
        if self.attempted == 0 {
            0.0
        } else {
            self.passed as f64 / self.attempted as f64 * 100.0
        }
    }
}

/// Result of one scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioResult {
    /// Which scenario ran.
    pub id: ScenarioId,
    /// Checks issued by the scenario, in order.
    pub checks: Vec<CheckOutcome>,
    /// Scenario-level failures (missing preconditions, invalid bodies).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<String>,
}

impl ScenarioResult {
    /// Starts an empty result for `id`.
    #[must_use]
    pub const fn new(id: ScenarioId) -> Self {
        Self {
            id,
            checks: Vec::new(),
            failures: Vec::new(),
        }
    }

    /// Appends a check outcome and returns it.
    pub fn push(&mut self, outcome: CheckOutcome) -> &CheckOutcome {
        self.checks.push(outcome);
        &self.checks[self.checks.len() - 1]
    }

    /// Records a scenario-level failure.
    pub fn fail(&mut self, reason: impl Into<String>) {
        self.failures.push(reason.into());
    }

    /// True when at least one check ran, every check passed and no
    /// scenario-level failure was recorded.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.failures.is_empty()
            && !self.checks.is_empty()
            && self.checks.iter().all(|check| check.passed)
    }
}

/// Summary of a complete run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Identifier of the run, for correlating logs.
    pub run_id: String,
    /// Checks issued.
    pub attempted: usize,
    /// Checks whose status matched.
    pub passed: usize,
    /// Checks that failed.
    pub failed: usize,
    /// Percentage of passed checks, rounded to one decimal.
    pub success_rate: f64,
    /// Per-scenario results in execution order.
    pub scenarios: Vec<ScenarioResult>,
}

impl RunSummary {
    /// Builds the summary from the run tally and scenario results.
    #[must_use]
    pub fn new(run_id: impl Into<String>, tally: RunTally, scenarios: Vec<ScenarioResult>) -> Self {
        Self {
            run_id: run_id.into(),
            attempted: tally.attempted,
            passed: tally.passed,
            failed: tally.failed(),
            success_rate: (tally.success_rate() * 10.0).round() / 10.0,
            scenarios,
        }
    }

    /// True when every scenario and every check passed.
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.passed == self.attempted && self.scenarios.iter().all(ScenarioResult::passed)
    }

    /// Scenarios that did not pass.
    pub fn failed_scenarios(&self) -> impl Iterator<Item = &ScenarioResult> {
        self.scenarios.iter().filter(|s| !s.passed())
    }

    /// Process exit status: 0 on full success, 1 otherwise.
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        u8::from(!self.all_passed())
    }
}

mod duration_millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    #[allow(clippy::cast_possible_truncation)]
    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_millis() as u64)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Duration::from_millis(u64::deserialize(deserializer)?))
    }
}
