//! kubectl-check-ownerreferences - Read-only checker for Kubernetes ownerReferences
//!
//! Lists every object the garbage collector manages and reports
//! ownerReferences that point at objects which do not exist or do not match
//! the reference. Findings go to stdout; progress, warnings and the summary
//! go to stderr.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use tokio_util::sync::CancellationToken;

use kubectl_check_ownerreferences::cli::{
    ConfigSubcommand, display_version, handle_config_command, init_logging,
};
use kubectl_check_ownerreferences::config::{ConfigLoader, ConfigOverrides};
use kubectl_check_ownerreferences::kube::{
    ClusterDiscovery, KubeOptions, MetadataLister, RateLimiter, create_client,
};
use kubectl_check_ownerreferences::{CheckOptions, Checker, FetchOptions};

/// Verify that ownerReferences point at the objects they claim to
#[derive(Parser, Debug)]
#[command(name = "kubectl-check-ownerreferences")]
#[command(about = "Read-only checker for invalid Kubernetes ownerReferences", long_about = None)]
#[command(disable_version_flag = true)]
struct Args {
    /// Output format. May be '' or 'json'
    #[arg(long, short = 'o')]
    output: Option<String>,

    /// API requests allowed per second (steady state). Set to -1 to disable rate limiter
    #[arg(long, allow_negative_numbers = true)]
    qps: Option<f32>,

    /// API requests allowed per second (burst)
    #[arg(long)]
    burst: Option<u32>,

    /// Items requested per list call
    #[arg(long)]
    page_size: Option<u32>,

    /// Resource types listed at the same time
    #[arg(long)]
    fetch_concurrency: Option<usize>,

    /// Path to the kubeconfig file to use
    #[arg(long)]
    kubeconfig: Option<PathBuf>,

    /// Name of the kubeconfig context to use
    #[arg(long)]
    context: Option<String>,

    /// Increase diagnostic verbosity (-vv shows fetched types, -vvv item counts)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbose: u8,

    /// Enable debug logging to a temp file
    #[arg(long, short = 'd')]
    debug: bool,

    /// Display version information
    #[arg(long)]
    version: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

/// Main commands
#[derive(Subcommand, Debug)]
enum Command {
    /// Configuration management
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if args.version {
        display_version();
        return Ok(());
    }

    if let Some(Command::Config { subcommand }) = args.command {
        return handle_config_command(subcommand);
    }

    let log_file = init_logging(args.debug)?;
    if let Some(ref log_path) = log_file {
        eprintln!(
            "Debug logging enabled. Logs written to: {}",
            log_path.display()
        );
    }

    let config = ConfigLoader::load().context("Failed to load configuration")?;
    let config = ConfigLoader::apply_overrides(
        config,
        &ConfigOverrides {
            output: args.output,
            qps: args.qps,
            burst: args.burst,
            page_size: args.page_size,
            fetch_concurrency: args.fetch_concurrency,
        },
    )?;
    tracing::debug!("Configuration loaded: {:?}", config);

    let client = create_client(&KubeOptions {
        kubeconfig: args.kubeconfig,
        context: args.context,
    })
    .await?;

    // Discovery and listing are throttled independently
    let discovery = ClusterDiscovery::new(
        client.clone(),
        RateLimiter::new(config.qps, config.burst),
    );
    let lister = MetadataLister::new(client, RateLimiter::new(config.qps, config.burst));

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::debug!("Interrupted, cancelling check");
            on_interrupt.cancel();
        }
    });

    let checker = Checker::new(
        &discovery,
        &lister,
        CheckOptions {
            output: config.output,
            verbosity: args.verbose,
            fetch: FetchOptions {
                page_size: config.page_size,
                concurrency: config.fetch_concurrency,
            },
        },
    );

    let mut stdout = std::io::stdout();
    let mut stderr = std::io::stderr();
    let tally = checker.run(&mut stdout, &mut stderr, &cancel).await?;
    tracing::debug!("Check finished: {}", tally);

    Ok(())
}
