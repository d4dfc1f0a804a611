//! API resource discovery.
//!
//! Every invocation discovers afresh; nothing is cached on disk.

use k8s_openapi::apimachinery::pkg::apis::meta::v1::APIResource;

pub mod client;

/// Group recorded for resources served by the legacy `/api` endpoint.
pub const CORE_GROUP: &str = "core";

/// Fill in `group`/`version` from the owning list's group version and drop subresources.
///
/// Discovery responses usually leave both fields empty on each entry.
pub fn normalize_resources(
    group: &str,
    version: &str,
    resources: Vec<APIResource>,
) -> Vec<APIResource> {
    resources
        .into_iter()
        .filter(|resource| !resource.name.contains('/'))
        .map(|mut resource| {
            if resource.group.as_deref().is_none_or(str::is_empty) {
                resource.group = Some(group.to_string());
            }
            if resource.version.as_deref().is_none_or(str::is_empty) {
                resource.version = Some(version.to_string());
            }
            resource
        })
        .collect()
}

/// Split an `apiVersion` such as `apps/v1` into group and version.
/// A bare version belongs to the core group.
pub fn split_group_version(group_version: &str) -> (&str, &str) {
    match group_version.split_once('/') {
        Some((group, version)) => (group, version),
        None => (CORE_GROUP, group_version),
    }
}

#[cfg(test)]
mod tests {
    use super::{normalize_resources, split_group_version};
    use crate::testing::api_resource;

    #[test]
    fn splits_group_versions() {
        assert_eq!(split_group_version("apps/v1"), ("apps", "v1"));
        assert_eq!(split_group_version("v1"), ("core", "v1"));
    }

    #[test]
    fn normalizes_discovered_entries() {
        let mut pods = api_resource("pods", "Pod", "", true, &["po"]);
        pods.group = None;
        pods.version = None;
        let status = api_resource("pods/status", "Pod", "", true, &[]);

        let resources = normalize_resources("core", "v1", vec![pods, status]);

        assert_eq!(resources.len(), 1);
        assert_eq!(resources[0].group.as_deref(), Some("core"));
        assert_eq!(resources[0].version.as_deref(), Some("v1"));
    }
}
