//! Scenario identifiers and the dependency-ordered run plan.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// A named group of related checks representing one feature area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScenarioId {
    /// `GET api/health`.
    Health,
    /// `GET api/branches`.
    Branches,
    /// `POST api/auth/register`.
    Register,
    /// `POST api/auth/login`.
    Login,
    /// `GET api/auth/me`.
    Profile,
    /// Create, list and fetch orders.
    Orders,
    /// Create and list support messages.
    Messages,
    /// Public quote request.
    Quotes,
    /// Public prospect creation.
    Prospects,
    /// Protected endpoint rejects missing and invalid tokens.
    AuthGuard,
    /// Page smoke checks against the public site.
    Pages,
}

impl ScenarioId {
    /// Every scenario in default execution order.
    pub const ALL: [Self; 11] = [
        Self::Health,
        Self::Branches,
        Self::Register,
        Self::Login,
        Self::Profile,
        Self::Orders,
        Self::Messages,
        Self::Quotes,
        Self::Prospects,
        Self::AuthGuard,
        Self::Pages,
    ];

    /// Returns the kebab-case name used on the command line.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Health => "health",
            Self::Branches => "branches",
            Self::Register => "register",
            Self::Login => "login",
            Self::Profile => "profile",
            Self::Orders => "orders",
            Self::Messages => "messages",
            Self::Quotes => "quotes",
            Self::Prospects => "prospects",
            Self::AuthGuard => "auth-guard",
            Self::Pages => "pages",
        }
    }

    /// Returns the heading printed when the scenario starts.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Health => "Health check",
            Self::Branches => "Business branches",
            Self::Register => "User registration",
            Self::Login => "User login",
            Self::Profile => "User profile",
            Self::Orders => "Order management",
            Self::Messages => "Support messages",
            Self::Quotes => "Quote requests",
            Self::Prospects => "Prospect management",
            Self::AuthGuard => "Authentication security",
            Self::Pages => "Page smoke checks",
        }
    }

    /// Scenarios that must have run before this one.
    #[must_use]
    pub const fn prerequisites(self) -> &'static [Self] {
        match self {
            Self::Login | Self::Profile | Self::Orders | Self::Messages | Self::AuthGuard => {
                &[Self::Register]
            }
            Self::Health
            | Self::Branches
            | Self::Register
            | Self::Quotes
            | Self::Prospects
            | Self::Pages => &[],
        }
    }

    /// Returns true if the scenario cannot run without a bearer token.
    #[must_use]
    pub const fn requires_token(self) -> bool {
        matches!(
            self,
            Self::Profile | Self::Orders | Self::Messages | Self::AuthGuard
        )
    }

    const fn position(self) -> usize {
        self as usize
    }
}

impl fmt::Display for ScenarioId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScenarioId {
    type Err = DomainError;

    fn from_str(s: &str) -> DomainResult<Self> {
        let wanted = s.trim().to_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|id| id.as_str() == wanted)
            .ok_or_else(|| DomainError::UnknownScenario(s.to_string()))
    }
}

/// An ordered list of scenarios whose prerequisites are all satisfied.
///
/// A plan can only be built through [`ScenarioPlan::new`] (or the helpers
/// that call it), so holding one means the ordering has been verified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ScenarioPlan {
    steps: Vec<ScenarioId>,
}

impl ScenarioPlan {
    /// Builds a plan from an explicit ordering.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::DuplicateScenario`] if a scenario is listed
    /// twice, or [`DomainError::PrerequisiteOrder`] if a scenario appears
    /// before (or without) one of its prerequisites.
    pub fn new(steps: Vec<ScenarioId>) -> DomainResult<Self> {
        for (index, step) in steps.iter().enumerate() {
            if steps[..index].contains(step) {
                return Err(DomainError::DuplicateScenario(step.to_string()));
            }
            if let Some(missing) = step
                .prerequisites()
                .iter()
                .find(|prerequisite| !steps[..index].contains(prerequisite))
            {
                return Err(DomainError::PrerequisiteOrder {
                    scenario: step.to_string(),
                    prerequisite: missing.to_string(),
                });
            }
        }
        Ok(Self { steps })
    }

    /// The full API plan: every scenario except the page smoke checks.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            steps: ScenarioId::ALL
                .into_iter()
                .filter(|id| *id != ScenarioId::Pages)
                .collect(),
        }
    }

    /// Builds a plan containing `wanted` plus all of their transitive
    /// prerequisites, in default order.
    #[must_use]
    pub fn select(wanted: &[ScenarioId]) -> Self {
        let mut included = [false; ScenarioId::ALL.len()];
        let mut pending: Vec<ScenarioId> = wanted.to_vec();
        while let Some(id) = pending.pop() {
            if !included[id.position()] {
                included[id.position()] = true;
                pending.extend_from_slice(id.prerequisites());
            }
        }

        Self {
            steps: ScenarioId::ALL
                .into_iter()
                .filter(|id| included[id.position()])
                .collect(),
        }
    }

    /// Returns this plan with the page smoke checks appended.
    #[must_use]
    pub fn with_pages(mut self) -> Self {
        if !self.steps.contains(&ScenarioId::Pages) {
            self.steps.push(ScenarioId::Pages);
        }
        self
    }

    /// Returns the scenarios in execution order.
    #[must_use]
    pub fn steps(&self) -> &[ScenarioId] {
        &self.steps
    }

    /// Returns the number of scenarios.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)] // Vec::len is not const in stable
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Returns true if the plan has no scenarios.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)] // Vec::is_empty is not const in stable
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl Default for ScenarioPlan {
    fn default() -> Self {
        Self::standard()
    }
}
