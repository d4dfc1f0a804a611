use anyhow::Context;
use futures::future::join_all;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::APIResource;
use kube::Client;
use tracing::{debug, warn};

use super::{CORE_GROUP, normalize_resources, split_group_version};

/// Lists the API resources a cluster serves.
#[derive(Clone)]
pub struct DiscoverClient {
    client: Client,
}

impl DiscoverClient {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// List core resources first, then the preferred version of every API group.
    ///
    /// A group whose resource list cannot be fetched (an unavailable aggregated
    /// API, typically) is skipped with a warning.
    pub async fn list_api_resources(&self) -> anyhow::Result<Vec<APIResource>> {
        let mut resources = Vec::new();

        let core_versions = self
            .client
            .list_core_api_versions()
            .await
            .context("Failed to list core API versions")?;
        for version in &core_versions.versions {
            let list = self
                .client
                .list_core_api_resources(version)
                .await
                .with_context(|| format!("Failed to list core API resources for {version}"))?;
            resources.extend(normalize_resources(CORE_GROUP, version, list.resources));
        }

        let groups = self
            .client
            .list_api_groups()
            .await
            .context("Failed to list API groups")?;
        let group_versions: Vec<String> = groups
            .groups
            .into_iter()
            .filter_map(|group| {
                group
                    .preferred_version
                    .or_else(|| group.versions.into_iter().next())
                    .map(|gv| gv.group_version)
            })
            .collect();

        let lists = join_all(
            group_versions
                .iter()
                .map(|gv| self.client.list_api_group_resources(gv)),
        )
        .await;
        for (group_version, list) in group_versions.iter().zip(lists) {
            match list {
                Ok(list) => {
                    let (group, version) = split_group_version(group_version);
                    resources.extend(normalize_resources(group, version, list.resources));
                }
                Err(error) => warn!(%group_version, %error, "skipping API group"),
            }
        }

        debug!(count = resources.len(), "discovered API resources");
        Ok(resources)
    }
}
