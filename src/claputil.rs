use std::{collections::HashSet, ffi::OsStr, future::Future};

use clap_complete::engine::{ArgValueCompleter, CompletionCandidate};
use k8s_openapi::api::core::v1::Namespace;
use kube::{Client, Config, config::Kubeconfig};
use tokio::{runtime::Handle, task};

use crate::discover::client::DiscoverClient;

/// Create an `ArgValueCompleter` that lists contexts from the active kubeconfig.
pub fn context_value_completer() -> ArgValueCompleter {
    ArgValueCompleter::new(|input: &OsStr| -> Vec<CompletionCandidate> {
        let kubeconfig = match Kubeconfig::read() {
            Ok(config) => config,
            Err(_) => return Vec::new(),
        };

        // Convert OsStr to &str with trimmed whitespace
        let input = input.to_string_lossy();
        let input = input.trim();

        kubeconfig
            .contexts
            .iter()
            .filter(|named_context| named_context.name.starts_with(input))
            .map(|named_context| CompletionCandidate::new(named_context.name.as_str()))
            .collect()
    })
}

/// Create an `ArgValueCompleter` that lists namespaces from the current context's cluster.
///
/// This makes a network call, so it may be slow or fail silently (returning an empty list)
/// on network issues, authentication failures, or missing permissions.
///
/// Limitation: The context specified by --context is not considered.
/// See https://github.com/clap-rs/clap/issues/1910 for more details.
pub fn namespace_value_completer() -> ArgValueCompleter {
    ArgValueCompleter::new(|input: &OsStr| -> Vec<CompletionCandidate> {
        let input = input.to_string_lossy().trim().to_string();

        block_on_any_runtime(async move {
            let Some(client) = current_context_client().await else {
                return Vec::new();
            };

            let namespaces: kube::Api<Namespace> = kube::Api::all(client);
            let ns_list = match namespaces.list(&Default::default()).await {
                Ok(list) => list,
                Err(_) => return Vec::new(),
            };

            ns_list
                .items
                .iter()
                .filter_map(|ns| ns.metadata.name.as_ref())
                .filter(|name| name.starts_with(&input))
                .map(CompletionCandidate::new)
                .collect()
        })
    })
}

/// Create an `ArgValueCompleter` that lists resource types served by the current context's cluster.
///
/// Candidates are plural names (`pods`, `configmaps`), as typed after `get`/`delete`.
/// Only the first positional argument is a resource type, but clap cannot tell positions
/// of a variadic argument apart, so the same candidates are offered for the pattern.
pub fn resource_value_completer() -> ArgValueCompleter {
    ArgValueCompleter::new(|input: &OsStr| -> Vec<CompletionCandidate> {
        let input = input.to_string_lossy().trim().to_string();

        block_on_any_runtime(async move {
            let Some(client) = current_context_client().await else {
                return Vec::new();
            };
            let resources = match DiscoverClient::new(client).list_api_resources().await {
                Ok(resources) => resources,
                Err(_) => return Vec::new(),
            };

            let mut seen = HashSet::new();
            resources
                .into_iter()
                .map(|resource| resource.name)
                .filter(|name| name.starts_with(&input))
                .filter(|name| seen.insert(name.clone()))
                .map(CompletionCandidate::new)
                .collect()
        })
    })
}

async fn current_context_client() -> Option<Client> {
    let kubeconfig = Kubeconfig::read().ok()?;
    let options = kube::config::KubeConfigOptions {
        context: kubeconfig.current_context.clone(),
        ..Default::default()
    };
    let config = Config::from_custom_kubeconfig(kubeconfig, &options).await.ok()?;
    Client::try_from(config).ok()
}

/// Run `future` to completion from a synchronous completer.
///
/// If called on an existing Tokio runtime, `Runtime::block_on` will panic.
/// Therefore, if a runtime exists, we use `block_in_place` to escape to a blocking thread,
/// and from there we call `block_on` with the current handle.
fn block_on_any_runtime<T: Default>(future: impl Future<Output = T>) -> T {
    match Handle::try_current() {
        Ok(handle) => task::block_in_place(move || handle.block_on(future)),
        Err(_) => tokio::runtime::Runtime::new()
            .map(|rt| rt.block_on(future))
            .unwrap_or_default(),
    }
}
