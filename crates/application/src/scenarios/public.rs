//! Scenarios against endpoints that need no authentication.

use apiprobe_domain::payloads::{NewProspect, QuoteRequest};
use apiprobe_domain::records::{Branch, HealthStatus, ProspectReceipt, QuoteReceipt};
use apiprobe_domain::{CheckSpec, ResourceKind, ScenarioResult, SessionState, ValidationError};

use super::{ScenarioRunner, post_check};
use crate::ports::{Clock, HttpClient, Reporter};

/// Number of business branches the API is seeded with.
pub const EXPECTED_BRANCHES: usize = 7;

impl<C: HttpClient, R: Reporter, K: Clock> ScenarioRunner<C, R, K> {
    pub(super) async fn health(&mut self, session: &SessionState, result: &mut ScenarioResult) {
        let spec = CheckSpec::get("Health Check", "api/health", 200);
        if self
            .expect::<HealthStatus>(session, result, spec)
            .await
            .is_some()
        {
            self.note("Backend is healthy and running");
        }
    }

    pub(super) async fn branches(&mut self, session: &SessionState, result: &mut ScenarioResult) {
        let spec = CheckSpec::get("Get Business Branches", "api/branches", 200);
        let Some(branches) = self.expect_list::<Branch>(session, result, spec).await else {
            return;
        };

        if branches.len() != EXPECTED_BRANCHES {
            let error = ValidationError::UnexpectedCount {
                expected: EXPECTED_BRANCHES,
                actual: branches.len(),
            };
            self.reject(result, "Get Business Branches", &error);
            return;
        }

        let names: Vec<&str> = branches.iter().take(3).map(|b| b.name.as_str()).collect();
        self.note(&format!(
            "Found {} business branches: {}...",
            branches.len(),
            names.join(", ")
        ));
    }

    /// Quote requests are public: the token is withheld even if one is held.
    pub(super) async fn quotes(&mut self, session: &mut SessionState, result: &mut ScenarioResult) {
        let Some(spec) = post_check(
            result,
            "Request Quote (Public)",
            "api/quotes",
            &QuoteRequest::fixture(),
        ) else {
            return;
        };

        let mut public = session.override_token(None);
        if let Some(receipt) = self.expect::<QuoteReceipt>(&public, result, spec).await {
            self.note(&format!("Quote request created: {}", receipt.quote_id));
            public.record_id(ResourceKind::Quote, receipt.quote_id);
        }
    }

    /// Prospect creation is public: the token is withheld even if one is held.
    pub(super) async fn prospects(
        &mut self,
        session: &mut SessionState,
        result: &mut ScenarioResult,
    ) {
        let Some(spec) = post_check(
            result,
            "Create Prospect",
            "api/prospects",
            &NewProspect::fixture(),
        ) else {
            return;
        };

        let public = session.override_token(None);
        if let Some(receipt) = self.expect::<ProspectReceipt>(&public, result, spec).await {
            self.note(&format!("Prospect created: {}", receipt.message));
        }
    }
}
