//! Host rules for private registry credentials
//!
//! Host rules are passed explicitly into the authenticator rather than read
//! from process-wide state, so the pipeline stays testable in isolation.

use serde::{Deserialize, Serialize};

/// A credential rule targeting one host or URL prefix
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostRule {
    /// Host or URL prefix the rule applies to
    pub match_host: String,
    /// Stored authentication token, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl HostRule {
    pub fn new(match_host: impl Into<String>, token: Option<String>) -> Self {
        Self {
            match_host: match_host.into(),
            token,
        }
    }

    /// Returns true if this rule applies to `url`.
    ///
    /// A rule matches when the URL starts with the rule's prefix, or when the
    /// rule names a bare host contained in the URL's authority.
    fn matches(&self, url: &str) -> bool {
        if url.starts_with(&self.match_host) {
            return true;
        }
        host_of(url).is_some_and(|host| {
            host == self.match_host || host.ends_with(&format!(".{}", self.match_host))
        })
    }
}

/// Extracts the authority host from a URL-ish string
fn host_of(url: &str) -> Option<&str> {
    let rest = url.split_once("://").map(|(_, rest)| rest).unwrap_or(url);
    let host = rest.split(['/', ':']).next()?;
    if host.is_empty() {
        None
    } else {
        Some(host)
    }
}

/// Ordered collection of host rules
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostRules {
    rules: Vec<HostRule>,
}

impl HostRules {
    pub fn new(rules: Vec<HostRule>) -> Self {
        Self { rules }
    }

    /// All rules in declaration order
    pub fn get_all(&self) -> &[HostRule] {
        &self.rules
    }

    /// Token of the first rule matching `url`, if that rule carries one
    pub fn find(&self, url: &str) -> Option<&str> {
        self.rules
            .iter()
            .find(|rule| rule.matches(url))
            .and_then(|rule| rule.token.as_deref())
    }
}

/// A private-registry organization paired with its stored token
///
/// Derived transiently per invocation; never cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrganizationCredential {
    pub organization: String,
    pub token: String,
}

impl OrganizationCredential {
    pub fn new(organization: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            organization: organization.into(),
            token: token.into(),
        }
    }
}
