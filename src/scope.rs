//! Scope resolution: decide whether an invocation targets one namespace, all
//! namespaces or cluster-scoped objects, and hand out accessors bound to it.

use std::{fmt, future::Future};

use k8s_openapi::apimachinery::pkg::apis::meta::v1::APIResource;
use tracing::debug;

use crate::{config::Config, error::Result, select::ResourceRef};

/// Resource types that are always addressed cluster-wide, whatever the flags say.
pub const CLUSTER_SCOPED_RESOURCES: &[&str] = &["nodes", "namespaces"];

/// Where list and delete calls are directed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    ClusterScoped,
    SingleNamespace(String),
    AllNamespaces,
}

impl Scope {
    /// Decide the scope for `api_resource`.
    ///
    /// Precedence:
    /// 1. Intrinsically cluster-scoped types (see [`CLUSTER_SCOPED_RESOURCES`],
    ///    plus anything discovery reports as not namespaced).
    /// 2. `all_namespaces`.
    /// 3. The ambient `namespace`.
    pub fn decide(api_resource: &APIResource, namespace: &str, all_namespaces: bool) -> Self {
        if CLUSTER_SCOPED_RESOURCES.contains(&api_resource.name.as_str()) || !api_resource.namespaced
        {
            Scope::ClusterScoped
        } else if all_namespaces {
            Scope::AllNamespaces
        } else {
            Scope::SingleNamespace(namespace.to_string())
        }
    }

    /// The scope that addresses exactly one matched object.
    pub fn for_ref(target: &ResourceRef) -> Self {
        match &target.namespace {
            Some(ns) => Scope::SingleNamespace(ns.clone()),
            None => Scope::ClusterScoped,
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::ClusterScoped => f.write_str("cluster"),
            Scope::SingleNamespace(ns) => write!(f, "namespace {ns}"),
            Scope::AllNamespaces => f.write_str("all namespaces"),
        }
    }
}

/// Handle bound to one [`Scope`] through which list and delete calls are issued.
pub trait ScopedAccessor {
    /// List every object visible in this scope, in server order.
    fn list(&self) -> impl Future<Output = std::result::Result<Vec<ResourceRef>, kube::Error>>;

    /// Delete the object called `name` in this scope.
    fn delete(&self, name: &str) -> impl Future<Output = std::result::Result<(), kube::Error>>;
}

/// The resource-access API the selection and mutation logic runs against.
pub trait ResourceAccess {
    type Accessor: ScopedAccessor;

    /// Resolve a user supplied type name (`pods`, `po`, `deployments.apps`).
    ///
    /// Fails with [`crate::Error::UnknownResourceType`].
    fn resolve_type(&self, resource: &str) -> impl Future<Output = Result<APIResource>>;

    /// Build an accessor for `api_resource` bound to `scope`.
    fn accessor(&self, api_resource: &APIResource, scope: &Scope) -> Self::Accessor;
}

/// Outcome of [`resolve`]: the concrete type, the decided scope and its accessor.
pub struct Resolved<A> {
    pub api_resource: APIResource,
    pub scope: Scope,
    pub accessor: A,
}

/// Resolve `resource` to its type and scope under `config`.
///
/// Only read-only queries are issued.
pub async fn resolve<R: ResourceAccess>(
    access: &R,
    resource: &str,
    config: &Config,
) -> Result<Resolved<R::Accessor>> {
    let api_resource = access.resolve_type(resource).await?;
    let scope = Scope::decide(&api_resource, &config.namespace, config.all_namespaces);
    debug!(resource, resolved = %api_resource.name, %scope, "resolved resource scope");

    let accessor = access.accessor(&api_resource, &scope);
    Ok(Resolved {
        api_resource,
        scope,
        accessor,
    })
}

#[cfg(test)]
mod tests {
    use super::{Scope, resolve};
    use crate::{
        Error,
        select::ResourceRef,
        testing::{FakeCluster, api_resource, config},
    };

    #[test]
    fn nodes_and_namespaces_are_always_cluster_scoped() {
        // Flag the type as namespaced to prove the name alone decides.
        for name in ["nodes", "namespaces"] {
            let resource = api_resource(name, "Whatever", "core", true, &[]);
            for all_namespaces in [false, true] {
                assert_eq!(
                    Scope::decide(&resource, "foo", all_namespaces),
                    Scope::ClusterScoped
                );
            }
        }
    }

    #[test]
    fn non_namespaced_types_are_cluster_scoped() {
        let resource = api_resource("clusterroles", "ClusterRole", "rbac.authorization.k8s.io", false, &[]);
        assert_eq!(Scope::decide(&resource, "foo", true), Scope::ClusterScoped);
    }

    #[test]
    fn namespaced_types_follow_flags() {
        let resource = api_resource("pods", "Pod", "core", true, &["po"]);
        assert_eq!(Scope::decide(&resource, "foo", true), Scope::AllNamespaces);
        assert_eq!(
            Scope::decide(&resource, "foo", false),
            Scope::SingleNamespace(String::from("foo"))
        );
    }

    #[test]
    fn per_item_scope_follows_namespace() {
        assert_eq!(
            Scope::for_ref(&ResourceRef::namespaced("foo", "app")),
            Scope::SingleNamespace(String::from("foo"))
        );
        assert_eq!(
            Scope::for_ref(&ResourceRef::cluster("node-1")),
            Scope::ClusterScoped
        );
    }

    #[tokio::test]
    async fn resolve_uses_config_namespace() {
        let cluster = FakeCluster::new(api_resource("configmaps", "ConfigMap", "core", true, &["cm"]));
        let resolved = resolve(&cluster, "cm", &config("foo", false))
            .await
            .expect("configmaps should resolve");

        assert_eq!(resolved.api_resource.name, "configmaps");
        assert_eq!(resolved.scope, Scope::SingleNamespace(String::from("foo")));
        assert_eq!(resolved.accessor.scope(), &resolved.scope);
    }

    #[tokio::test]
    async fn resolve_rejects_unknown_types() {
        let cluster = FakeCluster::new(api_resource("pods", "Pod", "core", true, &["po"]));
        let err = resolve(&cluster, "widgets", &config("foo", false))
            .await
            .err()
            .expect("widgets should not resolve");

        match err {
            Error::UnknownResourceType { resource, .. } => assert_eq!(resource, "widgets"),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
