#![cfg_attr(not(doctest), doc = include_str!("../README.md"))]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub use clap_complete;
pub use k8s_openapi;
pub use kube;

pub mod claputil;
pub use claputil::{context_value_completer, namespace_value_completer, resource_value_completer};
pub mod cli;
pub mod client;
pub mod config;
pub mod discover;
pub mod dynamic;
pub mod error;
pub use error::{Error, Result};
pub mod mutate;
pub mod scope;
pub mod select;

#[cfg(test)]
mod testing;

use k8s_openapi::apimachinery::pkg::apis::meta::v1::APIResource;
use kube::config::Kubeconfig;

/// Detects the Kubernetes context based on the provided `context` argument.
///
/// Context determination follows this priority:
/// 1. Uses the context if explicitly specified.
/// 2. Retrieves the current context from the kubeconfig.
///
/// # Errors
/// Returns an error if no current context is set in the kubeconfig.
pub fn determine_context(context: Option<&str>, kubeconfig: &Kubeconfig) -> anyhow::Result<String> {
    match context {
        Some(context) => Ok(context.to_string()),
        _ => kubeconfig
            .current_context
            .clone()
            .ok_or_else(|| anyhow::anyhow!("current_context is not set")),
    }
}

/// Determines the Kubernetes namespace based on the provided `namespace` and `context`.
///
/// Namespace determination follows this priority:
/// 1. Uses the namespace if explicitly specified.
/// 2. Retrieves the default namespace associated with `context` from kubeconfig.
/// 3. Uses "default".
pub fn determine_namespace(namespace: Option<String>, context: &str, kubeconfig: &Kubeconfig) -> String {
    if let Some(ns) = namespace {
        return ns;
    }

    kubeconfig
        .contexts
        .iter()
        .find(|c| c.name == context)
        .and_then(|context| {
            context
                .context
                .as_ref()
                .and_then(|ctx| ctx.namespace.clone())
        })
        .unwrap_or_else(|| String::from("default"))
}

/// Resolve the requested target resource name from the list of discovered API resources.
///
/// The first match wins, so callers should list core resources first.
/// A blank target never resolves.
pub fn resolve_target(target: &str, api_resources: &[APIResource]) -> Option<APIResource> {
    let target = target.trim().to_lowercase();
    if target.is_empty() {
        return None;
    }
    api_resources
        .iter()
        .find(|api_resource| resource_matches_target(&target, api_resource))
        .cloned()
}

/// Checks if the given `api_resource` matches the lowercased `target` resource name.
/// Matching is done against the resource's name, singular name, short names, kind and group-qualified name.
pub fn resource_matches_target(target: &str, api_resource: &APIResource) -> bool {
    if target.is_empty() {
        return false;
    }
    api_resource.name == target
        || api_resource.singular_name == target
        || api_resource.kind.to_lowercase() == target
        || api_resource
            .short_names
            .as_ref()
            .is_some_and(|short_names| short_names.iter().any(|short| short == target))
        || api_resource
            .group
            .as_ref()
            .is_some_and(|group| format!("{}.{}", api_resource.name, group) == target)
}
