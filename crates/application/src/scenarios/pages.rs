//! Page smoke checks against the public site.

use apiprobe_domain::{CheckSpec, ScenarioResult, SessionState};
use tracing::warn;

use super::ScenarioRunner;
use crate::ports::{Clock, HttpClient, Reporter};

impl<C: HttpClient, R: Reporter, K: Clock> ScenarioRunner<C, R, K> {
    /// Fetches each configured page and looks for its keywords.
    ///
    /// Pages are requested from a separate, unauthenticated session so the
    /// API token never reaches the site.
    pub(super) async fn pages(&mut self, session: &SessionState, result: &mut ScenarioResult) {
        if self.settings.pages.is_empty() {
            result.fail("no pages configured");
            return;
        }

        let base = self
            .settings
            .pages_base_url
            .as_deref()
            .unwrap_or_else(|| session.base_url());
        let site = match SessionState::new(base) {
            Ok(site) => site,
            Err(error) => {
                result.fail(format!("pages base address: {error}"));
                return;
            }
        };

        for probe in self.settings.pages.clone() {
            let spec = CheckSpec::get(&probe.name, &probe.path, probe.expected_status)
                .with_header("Accept", "text/html");
            let (outcome, response) = self.invoker.invoke_raw(&site, &spec).await;
            let passed = result.push(outcome).passed;
            let Some(response) = response.filter(|_| passed) else {
                continue;
            };

            let missing = probe.missing_keywords(&response.body);
            if missing.is_empty() {
                self.note(&format!("{}: content verified", probe.name));
            } else {
                warn!(page = %probe.name, ?missing, "page is missing expected content");
                result.fail(format!(
                    "{}: missing content: {}",
                    probe.name,
                    missing.join(", ")
                ));
            }
        }
    }
}
