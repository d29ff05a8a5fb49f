//! Registration, login, profile and the protected-endpoint guard.

use apiprobe_domain::payloads::Registration;
use apiprobe_domain::records::{AuthGrant, UserProfile, expect_eq};
use apiprobe_domain::{CheckSpec, Credentials, ResourceKind, ScenarioResult, SessionState};

use super::{ScenarioRunner, post_check, token_preview};
use crate::ports::{Clock, HttpClient, Reporter};

/// Token sent to check that forged credentials are rejected.
pub const INVALID_TOKEN: &str = "invalid_token_12345";

const TOKEN_PREVIEW_CHARS: usize = 20;

impl<C: HttpClient, R: Reporter, K: Clock> ScenarioRunner<C, R, K> {
    /// Email unique to the second the run started registering.
    fn unique_email(&self) -> String {
        format!(
            "test_user_{}@{}",
            self.clock.now().format("%H%M%S"),
            self.settings.email_domain
        )
    }

    /// Registers a fresh user and adopts its token and credentials.
    pub(super) async fn register(
        &mut self,
        session: &mut SessionState,
        result: &mut ScenarioResult,
    ) {
        let credentials = Credentials::new(self.unique_email(), &self.settings.password);
        let Some(spec) = post_check(
            result,
            "Register New User",
            "api/auth/register",
            &Registration::fixture(&credentials),
        ) else {
            return;
        };

        let Some(grant) = self.expect::<AuthGrant>(session, result, spec).await else {
            return;
        };

        self.note(&format!(
            "Token received: {}",
            token_preview(&grant.access_token, TOKEN_PREVIEW_CHARS)
        ));
        session.set_auth_token(grant.access_token.as_str());
        session.set_credentials(credentials);

        match grant.require_user() {
            Ok(user) => {
                if let Some(id) = user.id_text() {
                    self.note(&format!("User ID: {id}"));
                    session.record_id(ResourceKind::User, id);
                }
            }
            Err(error) => self.reject(result, "Register New User", &error),
        }
    }

    /// Logs in with the registered credentials.
    ///
    /// The request is sent without a token. A successful login replaces the
    /// session token; a failed one leaves the previous token in place.
    pub(super) async fn login(&mut self, session: &mut SessionState, result: &mut ScenarioResult) {
        let Some(credentials) = session.credentials().cloned() else {
            result.fail("no registered credentials to log in with");
            return;
        };
        let Some(spec) = post_check(result, "Login Existing User", "api/auth/login", &credentials)
        else {
            return;
        };

        let mut anonymous = session.override_token(None);
        let Some(grant) = self.expect::<AuthGrant>(&anonymous, result, spec).await else {
            return;
        };

        self.note(&format!(
            "Login successful, token: {}",
            token_preview(&grant.access_token, TOKEN_PREVIEW_CHARS)
        ));
        anonymous.set_auth_token(grant.access_token);
        anonymous.commit();
    }

    /// Fetches the current profile and compares it with the registered user.
    pub(super) async fn profile(&mut self, session: &SessionState, result: &mut ScenarioResult) {
        let spec = CheckSpec::get("Get Current User Profile", "api/auth/me", 200);
        let Some(profile) = self.expect::<UserProfile>(session, result, spec).await else {
            return;
        };

        self.note(&format!("Profile: {} ({})", profile.full_name, profile.email));
        match session.credentials() {
            Some(credentials) => {
                if let Err(error) = expect_eq("email", &credentials.email, &profile.email) {
                    self.reject(result, "Get Current User Profile", &error);
                }
            }
            None => result.fail("no registered credentials to compare the profile with"),
        }
    }

    /// Checks that the protected profile endpoint rejects a missing and a
    /// forged token. The session token is restored afterwards.
    pub(super) async fn auth_guard(
        &mut self,
        session: &mut SessionState,
        result: &mut ScenarioResult,
    ) {
        let mut guard = session.override_token(None);

        let without = CheckSpec::get("Access Protected Endpoint Without Token", "api/auth/me", 401);
        if self.expect_status(&guard, result, without).await {
            self.note("Protected endpoint correctly rejects unauthenticated requests");
        }

        guard.replace(Some(INVALID_TOKEN.to_string()));
        let forged = CheckSpec::get("Access With Invalid Token", "api/auth/me", 401);
        if self.expect_status(&guard, result, forged).await {
            self.note("Invalid tokens are correctly rejected");
        }
    }
}
