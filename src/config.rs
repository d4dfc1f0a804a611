use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use kube::{
    Client,
    config::{KubeConfigOptions, Kubeconfig},
};
use tracing::debug;

use crate::{
    claputil::{context_value_completer, namespace_value_completer},
    determine_context, determine_namespace,
    error::{Error, Result},
};

/// Settings resolved once per invocation and passed explicitly to the scope resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Kubeconfig context in use.
    pub context: String,
    /// Ambient namespace: `--namespace`, else the context's namespace, else `default`.
    pub namespace: String,
    /// Whether `--all-namespaces` was given.
    pub all_namespaces: bool,
    /// Whether `--yes` was given.
    pub skip_confirm: bool,
}

/// Connection overrides, mirroring the flags kubectl accepts.
#[derive(Debug, Clone, Default, Args)]
pub struct KubeFlags {
    /// Path to the kubeconfig file to use
    #[arg(long, value_name = "PATH", global = true)]
    pub kubeconfig: Option<PathBuf>,

    /// The name of the kubeconfig context to use
    #[arg(long, value_name = "CONTEXT", global = true, add = context_value_completer())]
    pub context: Option<String>,

    /// The name of the kubeconfig cluster to use
    #[arg(long, value_name = "CLUSTER", global = true)]
    pub cluster: Option<String>,

    /// The name of the kubeconfig user to use
    #[arg(long, value_name = "USER", global = true)]
    pub user: Option<String>,

    /// The address and port of the Kubernetes API server
    #[arg(long, value_name = "URL", global = true)]
    pub server: Option<String>,

    /// Bearer token for authentication to the API server
    #[arg(long, value_name = "TOKEN", global = true)]
    pub token: Option<String>,

    /// Username to impersonate for the operation
    #[arg(long = "as", value_name = "USER", global = true)]
    pub impersonate: Option<String>,

    /// If present, the namespace scope for this request
    #[arg(short, long, value_name = "NAMESPACE", global = true, add = namespace_value_completer())]
    pub namespace: Option<String>,
}

impl KubeFlags {
    /// Read the kubeconfig from `--kubeconfig`, or from `KUBECONFIG`/`~/.kube/config`.
    pub fn read_kubeconfig(&self) -> anyhow::Result<Kubeconfig> {
        match &self.kubeconfig {
            Some(path) => Kubeconfig::read_from(path)
                .with_context(|| format!("Failed to read kubeconfig at {path:?}")),
            None => Kubeconfig::read().context("Failed to read kubeconfig"),
        }
    }

    /// Resolve the invocation's [`Config`] and build a client for it.
    ///
    /// No request is sent to the cluster here.
    pub async fn connect(&self, all_namespaces: bool, skip_confirm: bool) -> Result<(Config, Client)> {
        self.try_connect(all_namespaces, skip_confirm)
            .await
            .map_err(Error::Configuration)
    }

    async fn try_connect(
        &self,
        all_namespaces: bool,
        skip_confirm: bool,
    ) -> anyhow::Result<(Config, Client)> {
        let kubeconfig = self.read_kubeconfig()?;
        let config = self.settings(&kubeconfig, all_namespaces, skip_confirm)?;

        let options = KubeConfigOptions {
            context: Some(config.context.clone()),
            cluster: self.cluster.clone(),
            user: self.user.clone(),
        };
        let mut kube_config = kube::Config::from_custom_kubeconfig(kubeconfig, &options)
            .await
            .with_context(|| format!("Failed to load context {:?}", config.context))?;
        self.apply_overrides(&mut kube_config)?;
        let client = Client::try_from(kube_config).context("Failed to build Kubernetes client")?;

        Ok((config, client))
    }

    /// Apply `--server`, `--token` and `--as` on top of the kubeconfig-derived settings.
    pub fn apply_overrides(&self, kube_config: &mut kube::Config) -> anyhow::Result<()> {
        if let Some(server) = &self.server {
            kube_config.cluster_url = server
                .parse()
                .with_context(|| format!("Invalid server URL {server:?}"))?;
        }
        if let Some(token) = &self.token {
            kube_config.auth_info.token = Some(token.clone().into());
        }
        if let Some(user) = &self.impersonate {
            kube_config.auth_info.impersonate = Some(user.clone());
        }
        Ok(())
    }

    /// Resolve context and ambient namespace against `kubeconfig`.
    pub fn settings(
        &self,
        kubeconfig: &Kubeconfig,
        all_namespaces: bool,
        skip_confirm: bool,
    ) -> anyhow::Result<Config> {
        let context = determine_context(self.context.as_deref(), kubeconfig)?;
        let namespace = determine_namespace(self.namespace.clone(), &context, kubeconfig);
        debug!(%context, %namespace, "resolved kubeconfig context");

        Ok(Config {
            context,
            namespace,
            all_namespaces,
            skip_confirm,
        })
    }
}
