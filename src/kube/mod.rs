//! Kubernetes client module
//!
//! Structure:
//! - `discovery.rs` - Discovery through the API server's discovery endpoints
//! - `metadata.rs` - Metadata-only list calls
//! - `rate_limit.rs` - Client-side request throttling
//!
//! Everything above this module talks to the cluster through the
//! `DiscoverySource` and `ObjectLister` traits only.

pub mod discovery;
pub mod metadata;
pub mod rate_limit;

pub use discovery::ClusterDiscovery;
pub use metadata::MetadataLister;
pub use rate_limit::RateLimiter;

use std::path::PathBuf;

use anyhow::{Context, Result};
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Client, Config};

/// Connection settings taken from the command line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KubeOptions {
    /// Explicit kubeconfig file instead of the default lookup
    pub kubeconfig: Option<PathBuf>,
    /// Context to use instead of the kubeconfig's current context
    pub context: Option<String>,
}

/// Initialize and return a Kubernetes client
///
/// Without overrides the default loading strategy applies:
/// 1. KUBECONFIG environment variable
/// 2. ~/.kube/config
/// 3. In-cluster config (if running in a pod)
pub async fn create_client(options: &KubeOptions) -> Result<Client> {
    let config = if options.kubeconfig.is_none() && options.context.is_none() {
        Config::infer()
            .await
            .context("Failed to infer Kubernetes configuration")?
    } else {
        let kubeconfig = match &options.kubeconfig {
            Some(path) => Kubeconfig::read_from(path)
                .with_context(|| format!("Failed to read kubeconfig {}", path.display()))?,
            None => Kubeconfig::read().context("Failed to read kubeconfig")?,
        };
        let kube_options = KubeConfigOptions {
            context: options.context.clone(),
            ..Default::default()
        };
        Config::from_custom_kubeconfig(kubeconfig, &kube_options)
            .await
            .context("Failed to load Kubernetes configuration")?
    };

    tracing::debug!("Connecting to {}", config.cluster_url);
    let client = Client::try_from(config).context("Failed to create Kubernetes client")?;
    Ok(client)
}
