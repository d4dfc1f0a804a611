use std::io::{self, Write};

use clap::{Args, Parser, Subcommand};
use regex::Regex;

use crate::{
    claputil::resource_value_completer,
    client::KubeAccess,
    config::{Config, KubeFlags},
    error::{Error, Result},
    mutate::{self, Confirm, LineConfirm, MutationOutcome},
    scope::{self, ResourceAccess},
    select::{self, MatchSet, compile_pattern},
};

const EXAMPLES: &str = r#"Examples:
  # list all pods starting with "nginx-" in current context's namespace
  kubectl regex-match get pods "^nginx-"

  # list all services ending with "web" in namespace "foo"
  kubectl regex-match get services "web$" -n foo

  # delete all configMaps in the "foo" namespace containing "app"
  kubectl regex-match delete configMaps "app" -n foo"#;

#[derive(Debug, Parser)]
#[command(
    name = "kubectl-regex-match",
    bin_name = "kubectl regex-match",
    version,
    about = "Use RegEx to manage Kubernetes resources",
    after_help = EXAMPLES
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[command(flatten)]
    pub kube: KubeFlags,

    /// If present, list across all namespaces
    #[arg(short = 'A', long, global = true)]
    pub all_namespaces: bool,

    /// Skip confirmation prompts and delete directly
    #[arg(short = 'y', long, global = true)]
    pub yes: bool,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Get Kubernetes resources matching RegEx
    Get(Target),
    /// Delete Kubernetes resources matching RegEx
    Delete(Target),
}

#[derive(Debug, Args)]
pub struct Target {
    /// <resource> [pattern]
    #[arg(value_name = "ARGS", add = resource_value_completer())]
    pub args: Vec<String>,
}

/// Split positional arguments into resource type and optional pattern.
pub fn validate_args(args: &[String]) -> Result<(&str, Option<&str>)> {
    match args {
        [] => Err(Error::MissingResourceType),
        [resource, ..] if resource.trim().is_empty() => Err(Error::MissingResourceType),
        [resource] => Ok((resource.as_str(), None)),
        [resource, pattern] => Ok((resource.as_str(), Some(pattern.as_str()))),
        _ => Err(Error::TooManyArguments),
    }
}

/// List the objects of type `resource` whose names match `pattern` and print one name per line.
pub async fn get<A: ResourceAccess, W: Write>(
    access: &A,
    config: &Config,
    resource: &str,
    pattern: &Regex,
    out: &mut W,
) -> Result<MatchSet> {
    let resolved = scope::resolve(access, resource, config).await?;
    let matched = select::select(&resolved.accessor, &resolved.api_resource.name, pattern).await?;
    for target in &matched {
        writeln!(out, "{}", target.name)?;
    }
    Ok(matched)
}

/// Delete the objects of type `resource` whose names match `pattern`, after confirmation.
pub async fn delete<A, C, W, E>(
    access: &A,
    config: &Config,
    resource: &str,
    pattern: &Regex,
    confirm: &mut C,
    out: &mut W,
    err: &mut E,
) -> Result<MutationOutcome>
where
    A: ResourceAccess,
    C: Confirm,
    W: Write,
    E: Write,
{
    let resolved = scope::resolve(access, resource, config).await?;
    let matched = select::select(&resolved.accessor, &resolved.api_resource.name, pattern).await?;
    mutate::execute(
        access,
        &resolved.api_resource,
        &matched,
        confirm,
        config.skip_confirm,
        out,
        err,
    )
    .await
}

/// Run one invocation against the cluster selected by `cli.kube`.
pub async fn run(cli: Cli) -> Result<()> {
    let (deleting, target) = match &cli.command {
        Command::Get(target) => (false, target),
        Command::Delete(target) => (true, target),
    };
    let (resource, pattern) = validate_args(&target.args)?;
    let pattern = compile_pattern(pattern)?;

    let (config, client) = cli.kube.connect(cli.all_namespaces, cli.yes).await?;
    let access = KubeAccess::new(client);

    let mut out = io::stdout().lock();
    if deleting {
        let mut confirm = LineConfirm::new(io::stdin().lock());
        let mut err = io::stderr().lock();
        delete(
            &access,
            &config,
            resource,
            &pattern,
            &mut confirm,
            &mut out,
            &mut err,
        )
        .await?;
    } else {
        get(&access, &config, resource, &pattern, &mut out).await?;
    }
    Ok(())
}
