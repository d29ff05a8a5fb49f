//! Session state carried between dependent checks.
//!
//! A [`SessionState`] lives for exactly one run. It holds the base address
//! every check path is joined to, the bearer token obtained by the auth
//! scenarios, the credentials that produced it and the identifiers of
//! resources created along the way.

use std::collections::HashMap;
use std::fmt;
use std::ops::{Deref, DerefMut};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{DomainError, DomainResult};

/// Kinds of resources whose identifiers later checks depend on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    /// The registered test user.
    User,
    /// An order created through `api/orders`.
    Order,
    /// A support ticket created through `api/messages`.
    Ticket,
    /// A quote requested through `api/quotes`.
    Quote,
}

impl ResourceKind {
    /// Returns the kind as a static string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Order => "order",
            Self::Ticket => "ticket",
            Self::Quote => "quote",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Login credentials of the user registered during the run.
///
/// Serializes to the `api/auth/login` request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// Account email.
    pub email: String,
    /// Account password.
    pub password: String,
}

impl Credentials {
    /// Creates a credentials pair.
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

/// Mutable state shared by the checks of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    base_url: String,
    auth_token: Option<String>,
    credentials: Option<Credentials>,
    created_ids: HashMap<ResourceKind, String>,
}

impl SessionState {
    /// Creates an unauthenticated session against `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidUrl`] unless `base_url` is an absolute
    /// `http` or `https` URL.
    pub fn new(base_url: impl Into<String>) -> DomainResult<Self> {
        let base_url = base_url.into();
        let parsed =
            Url::parse(&base_url).map_err(|e| DomainError::InvalidUrl(format!("{e}: {base_url}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(DomainError::InvalidUrl(format!(
                "unsupported scheme '{}': {base_url}",
                parsed.scheme()
            )));
        }

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_token: None,
            credentials: None,
            created_ids: HashMap::new(),
        })
    }

    /// Returns the base address, without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Joins `path` onto the base address.
    ///
    /// Absolute `http(s)` URLs are returned unchanged so a check can target
    /// another host.
    #[must_use]
    pub fn url_for(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Returns the bearer token currently held, if any.
    #[must_use]
    pub fn auth_token(&self) -> Option<&str> {
        self.auth_token.as_deref()
    }

    /// Returns true if a bearer token is held.
    #[must_use]
    pub const fn has_token(&self) -> bool {
        self.auth_token.is_some()
    }

    /// Stores a bearer token, replacing the previous one.
    pub fn set_auth_token(&mut self, token: impl Into<String>) {
        self.auth_token = Some(token.into());
    }

    /// Temporarily replaces the token.
    ///
    /// The previous token is put back when the returned guard is dropped,
    /// unless the guard is [committed](TokenOverride::commit).
    pub fn override_token(&mut self, token: Option<String>) -> TokenOverride<'_> {
        let saved = std::mem::replace(&mut self.auth_token, token);
        TokenOverride {
            session: self,
            saved: Some(saved),
        }
    }

    /// Returns the credentials of the registered user, if any.
    #[must_use]
    pub const fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    /// Stores the credentials of the registered user.
    pub fn set_credentials(&mut self, credentials: Credentials) {
        self.credentials = Some(credentials);
    }

    /// Records the identifier of a created resource.
    pub fn record_id(&mut self, kind: ResourceKind, id: impl Into<String>) {
        self.created_ids.insert(kind, id.into());
    }

    /// Returns the identifier recorded for `kind`, if any.
    #[must_use]
    pub fn id(&self, kind: ResourceKind) -> Option<&str> {
        self.created_ids.get(&kind).map(String::as_str)
    }
}

/// Scoped token replacement on a [`SessionState`].
///
/// Dereferences to the session, so checks can be issued through the guard
/// while the replacement token is in effect.
#[derive(Debug)]
pub struct TokenOverride<'a> {
    session: &'a mut SessionState,
    saved: Option<Option<String>>,
}

impl TokenOverride<'_> {
    /// Replaces the token again while the override is active.
    pub fn replace(&mut self, token: Option<String>) {
        self.session.auth_token = token;
    }

    /// Keeps the current token and discards the saved one.
    pub fn commit(mut self) {
        self.saved = None;
    }
}

impl Deref for TokenOverride<'_> {
    type Target = SessionState;

    fn deref(&self) -> &SessionState {
        self.session
    }
}

impl DerefMut for TokenOverride<'_> {
    fn deref_mut(&mut self) -> &mut SessionState {
        self.session
    }
}

impl Drop for TokenOverride<'_> {
    fn drop(&mut self) {
        if let Some(saved) = self.saved.take() {
            self.session.auth_token = saved;
        }
    }
}
