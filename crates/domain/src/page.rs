//! Page smoke probes.
//!
//! A probe fetches a page of the public site and checks its status and,
//! optionally, that a set of keywords appears in the HTML.

use serde::{Deserialize, Serialize};

const fn default_expected_status() -> u16 {
    200
}

/// One page to probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageProbe {
    /// Human-readable name.
    pub name: String,
    /// Path relative to the pages base address, or an absolute URL.
    pub path: String,
    /// Status the page must answer with.
    #[serde(default = "default_expected_status")]
    pub expected_status: u16,
    /// Text fragments the body must contain.
    #[serde(default)]
    pub expected_keywords: Vec<String>,
    /// Only check the status; ignore the body.
    #[serde(default)]
    pub status_only: bool,
}

impl PageProbe {
    /// Creates a probe expecting a 200 and the given keywords.
    #[must_use]
    pub fn new(name: impl Into<String>, path: impl Into<String>, keywords: &[&str]) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            expected_status: default_expected_status(),
            expected_keywords: keywords.iter().map(ToString::to_string).collect(),
            status_only: false,
        }
    }

    /// Sets the expected status.
    #[must_use]
    pub const fn expecting(mut self, status: u16) -> Self {
        self.expected_status = status;
        self
    }

    /// Ignores the body and checks only the status.
    #[must_use]
    pub fn status_only(mut self) -> Self {
        self.status_only = true;
        self.expected_keywords.clear();
        self
    }

    /// Keywords absent from `body`, in declaration order.
    #[must_use]
    pub fn missing_keywords(&self, body: &str) -> Vec<&str> {
        if self.status_only {
            return Vec::new();
        }
        self.expected_keywords
            .iter()
            .map(String::as_str)
            .filter(|keyword| !body.contains(keyword))
            .collect()
    }

    /// The pages the public site is expected to serve.
    #[must_use]
    pub fn defaults() -> Vec<Self> {
        vec![
            Self::new(
                "Home page",
                "/",
                &["DOXA Investments", "Services", "État du Système"],
            ),
            Self::new(
                "Custom 404 page",
                "/page-inexistante",
                &["404", "Page non trouvée", "DOXA"],
            )
            .expecting(404),
            Self::new(
                "Maintenance page",
                "/maintenance.html",
                &["Maintenance", "Progression", "DOXA"],
            ),
            Self::new("Frontend application", "/frontend/", &["root"]),
            Self::new("Backend API", "/backend/api.php", &[]).status_only(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_missing_keywords() {
        let probe = PageProbe::new("Home", "/", &["DOXA", "Services", "Contact"]);
        let body = "<html><h1>DOXA</h1><nav>Services</nav></html>";
        assert_eq!(probe.missing_keywords(body), vec!["Contact"]);
    }

    #[test]
    fn test_status_only_ignores_body() {
        let probe = PageProbe::new("API", "/backend/api.php", &["never"]).status_only();
        assert!(probe.missing_keywords("").is_empty());
    }

    #[test]
    fn test_deserialize_defaults() {
        let probe: PageProbe =
            serde_json::from_str(r#"{"name": "Home", "path": "/"}"#).expect("valid probe");
        assert_eq!(probe.expected_status, 200);
        assert!(probe.expected_keywords.is_empty());
        assert!(!probe.status_only);
    }

    #[test]
    fn test_defaults_include_not_found_page() {
        let defaults = PageProbe::defaults();
        assert_eq!(defaults.len(), 5);
        assert_eq!(defaults[1].expected_status, 404);
        assert!(defaults[4].status_only);
    }
}
