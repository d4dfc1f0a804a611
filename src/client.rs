use k8s_openapi::apimachinery::pkg::apis::meta::v1::APIResource;
use kube::{
    Api, Client, Error as KubeError,
    api::{DeleteParams, ListParams},
};

use crate::{
    discover::client::DiscoverClient,
    dynamic::DynamicObject,
    error::{Error, Result},
    resolve_target,
    scope::{ResourceAccess, Scope, ScopedAccessor},
    select::ResourceRef,
};

/// [`ResourceAccess`] backed by a live cluster.
#[derive(Clone)]
pub struct KubeAccess {
    client: Client,
}

impl KubeAccess {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl ResourceAccess for KubeAccess {
    type Accessor = KubeAccessor;

    async fn resolve_type(&self, resource: &str) -> Result<APIResource> {
        let unknown = |source: anyhow::Error| Error::UnknownResourceType {
            resource: resource.to_string(),
            source,
        };

        let resources = DiscoverClient::new(self.client.clone())
            .list_api_resources()
            .await
            .map_err(unknown)?;
        resolve_target(resource, &resources).ok_or_else(|| {
            unknown(anyhow::anyhow!(
                "the server doesn't have a resource type {resource:?}"
            ))
        })
    }

    fn accessor(&self, api_resource: &APIResource, scope: &Scope) -> KubeAccessor {
        let client = self.client.clone();
        let api = match scope {
            Scope::SingleNamespace(ns) => Api::namespaced_with(client, ns, api_resource),
            Scope::ClusterScoped | Scope::AllNamespaces => Api::all_with(client, api_resource),
        };
        KubeAccessor { api }
    }
}

/// [`ScopedAccessor`] over `Api<DynamicObject>`.
pub struct KubeAccessor {
    api: Api<DynamicObject>,
}

impl ScopedAccessor for KubeAccessor {
    async fn list(&self) -> std::result::Result<Vec<ResourceRef>, KubeError> {
        let list = self.api.list_metadata(&ListParams::default()).await?;
        Ok(list
            .items
            .into_iter()
            .map(|item| {
                ResourceRef::from_parts(
                    item.metadata.namespace,
                    item.metadata.name.unwrap_or_default(),
                )
            })
            .collect())
    }

    async fn delete(&self, name: &str) -> std::result::Result<(), KubeError> {
        self.api.delete(name, &DeleteParams::default()).await?;
        Ok(())
    }
}
