//! In-memory stand-ins for the cluster, used by unit tests.

use std::{cell::RefCell, collections::HashMap, rc::Rc};

use k8s_openapi::apimachinery::pkg::apis::meta::v1::APIResource;
use kube::{Error as KubeError, core::ErrorResponse};

use crate::{
    Error,
    config::Config,
    scope::{ResourceAccess, Scope, ScopedAccessor},
    select::ResourceRef,
};

pub fn api_resource(
    name: &str,
    kind: &str,
    group: &str,
    namespaced: bool,
    short_names: &[&str],
) -> APIResource {
    APIResource {
        name: name.to_string(),
        kind: kind.to_string(),
        singular_name: kind.to_lowercase(),
        group: Some(group.to_string()),
        version: Some(String::from("v1")),
        namespaced,
        short_names: Some(short_names.iter().map(|s| s.to_string()).collect()),
        verbs: vec![String::from("list"), String::from("delete")],
        ..Default::default()
    }
}

pub fn config(namespace: &str, all_namespaces: bool) -> Config {
    Config {
        context: String::from("test"),
        namespace: namespace.to_string(),
        all_namespaces,
        skip_confirm: false,
    }
}

pub fn api_error(code: u16) -> KubeError {
    KubeError::Api(ErrorResponse {
        status: String::from("Failure"),
        message: format!("status={code}"),
        reason: String::from("Test"),
        code,
    })
}

#[derive(Default)]
struct State {
    objects: Vec<ResourceRef>,
    delete_failures: HashMap<ResourceRef, u16>,
    list_failure: Option<u16>,
    deletes: Vec<(Scope, String)>,
}

/// A cluster serving a single resource type.
#[derive(Clone)]
pub struct FakeCluster {
    resource: APIResource,
    state: Rc<RefCell<State>>,
}

impl FakeCluster {
    pub fn new(resource: APIResource) -> Self {
        Self {
            resource,
            state: Rc::default(),
        }
    }

    pub fn resource(&self) -> APIResource {
        self.resource.clone()
    }

    pub fn add(&self, object: ResourceRef) {
        self.state.borrow_mut().objects.push(object);
    }

    pub fn len(&self) -> usize {
        self.state.borrow().objects.len()
    }

    pub fn fail_listing(&self, code: u16) {
        self.state.borrow_mut().list_failure = Some(code);
    }

    pub fn fail_delete(&self, object: ResourceRef, code: u16) {
        self.state.borrow_mut().delete_failures.insert(object, code);
    }

    /// Every delete call issued, in order, with the scope it was issued in.
    pub fn deletes(&self) -> Vec<(Scope, String)> {
        self.state.borrow().deletes.clone()
    }
}

impl ResourceAccess for FakeCluster {
    type Accessor = FakeAccessor;

    async fn resolve_type(&self, resource: &str) -> crate::Result<APIResource> {
        crate::resolve_target(resource, std::slice::from_ref(&self.resource)).ok_or_else(|| {
            Error::UnknownResourceType {
                resource: resource.to_string(),
                source: anyhow::anyhow!("the server doesn't have a resource type {resource:?}"),
            }
        })
    }

    fn accessor(&self, _api_resource: &APIResource, scope: &Scope) -> FakeAccessor {
        FakeAccessor {
            scope: scope.clone(),
            state: Rc::clone(&self.state),
        }
    }
}

pub struct FakeAccessor {
    scope: Scope,
    state: Rc<RefCell<State>>,
}

impl FakeAccessor {
    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    fn addresses(&self, object: &ResourceRef) -> bool {
        match &self.scope {
            Scope::ClusterScoped | Scope::AllNamespaces => true,
            Scope::SingleNamespace(ns) => object.namespace.as_deref() == Some(ns.as_str()),
        }
    }
}

impl ScopedAccessor for FakeAccessor {
    async fn list(&self) -> Result<Vec<ResourceRef>, KubeError> {
        let state = self.state.borrow();
        if let Some(code) = state.list_failure {
            return Err(api_error(code));
        }
        Ok(state
            .objects
            .iter()
            .filter(|object| self.addresses(object))
            .cloned()
            .collect())
    }

    async fn delete(&self, name: &str) -> Result<(), KubeError> {
        let mut state = self.state.borrow_mut();
        state.deletes.push((self.scope.clone(), name.to_string()));

        // A delete needs an exact address: a namespace, or the cluster for unnamespaced objects.
        let target = match &self.scope {
            Scope::SingleNamespace(ns) => ResourceRef::namespaced(ns.as_str(), name),
            Scope::ClusterScoped => ResourceRef::cluster(name),
            Scope::AllNamespaces => return Err(api_error(405)),
        };
        if let Some(code) = state.delete_failures.get(&target) {
            return Err(api_error(*code));
        }

        let position = state
            .objects
            .iter()
            .position(|object| *object == target)
            .ok_or_else(|| api_error(404))?;
        state.objects.remove(position);
        Ok(())
    }
}
