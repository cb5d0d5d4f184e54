//! Private registry authentication
//!
//! Decides *which* organizations need authentication for one artifact
//! update and pairs each with its stored token. Rendering the credential
//! into a concrete command line is the ecosystem capability's job; host
//! rules arrive as an explicit parameter, never from process-wide state.

use crate::domain::{Dependency, HostRules, OrganizationCredential};
use crate::ecosystems::RegistryAuth;
use std::collections::BTreeSet;
use tracing::debug;

/// Collects credentials for every organization referenced by host rules or
/// by updated-dependency identifiers.
///
/// Organizations without a stored token are skipped silently; a missing
/// credential is not an error. Output order is the deduplicated set's
/// iteration order.
pub fn build_auth_credentials(
    host_rules: &HostRules,
    updated_deps: &[Dependency],
    registry: &RegistryAuth,
) -> Vec<OrganizationCredential> {
    let mut organizations: BTreeSet<String> = BTreeSet::new();

    for rule in host_rules.get_all() {
        if let Some(organization) = registry.organization_from_host(&rule.match_host) {
            organizations.insert(organization);
        }
    }

    for dep in updated_deps {
        if let Some(organization) = dep.organization(registry.namespace_separator()) {
            organizations.insert(organization.to_string());
        }
    }

    organizations
        .into_iter()
        .filter_map(|organization| {
            let url = registry.organization_url(&organization);
            match host_rules.find(&url) {
                Some(token) => Some(OrganizationCredential::new(organization, token)),
                None => {
                    debug!(%organization, "no stored credential, skipping");
                    None
                }
            }
        })
        .collect()
}
