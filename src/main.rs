use clap::{CommandFactory, Parser};
use kubectl_regex_match::{
    cli::{self, Cli},
    clap_complete::CompleteEnv,
};
use tracing_subscriber::EnvFilter;

/// Initialize stderr logging; `RUST_LOG` overrides the verbosity flag.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        "kubectl_regex_match=debug"
    } else {
        "kubectl_regex_match=warn"
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    CompleteEnv::with_factory(Cli::command).complete();

    let cli = Cli::parse();
    init_logging(cli.verbose);

    cli::run(cli).await?;
    Ok(())
}
