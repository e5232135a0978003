//! API discovery against a live cluster
//!
//! Each group/version is queried separately so one unavailable aggregated
//! API (e.g. a metrics server that is down) only removes that group/version
//! instead of failing discovery as a whole.

use async_trait::async_trait;
use futures::future::join_all;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{APIResource, APIResourceList};
use kube::Client;

use crate::catalog::{
    ApiGroupResources, ApiResourceInfo, DiscoveryError, DiscoveryFailure, DiscoveryOutput,
    DiscoverySource, VersionResources,
};
use crate::models::GroupVersion;

use super::rate_limit::RateLimiter;

pub struct ClusterDiscovery {
    client: Client,
    limiter: Option<RateLimiter>,
}

impl ClusterDiscovery {
    pub fn new(client: Client, limiter: Option<RateLimiter>) -> Self {
        Self { client, limiter }
    }

    async fn throttle(&self) {
        if let Some(limiter) = &self.limiter {
            limiter.acquire().await;
        }
    }

    async fn core_group(&self, output: &mut DiscoveryOutput) -> Result<(), DiscoveryError> {
        self.throttle().await;
        let versions = self
            .client
            .list_core_api_versions()
            .await
            .map_err(|e| DiscoveryError::Unavailable(e.to_string()))?;

        let lists = join_all(versions.versions.iter().map(|version| async move {
            self.throttle().await;
            let list = self.client.list_core_api_resources(version).await;
            (GroupVersion::new("", version.as_str()), list)
        }))
        .await;

        let mut group = ApiGroupResources {
            name: String::new(),
            preferred_version: versions.versions.first().cloned().unwrap_or_default(),
            versions: Vec::new(),
        };
        collect_versions(&mut group, lists, output);
        output.groups.push(group);
        Ok(())
    }

    async fn named_groups(&self, output: &mut DiscoveryOutput) -> Result<(), DiscoveryError> {
        self.throttle().await;
        let groups = self
            .client
            .list_api_groups()
            .await
            .map_err(|e| DiscoveryError::Unavailable(e.to_string()))?;

        for api_group in groups.groups {
            let group_name = api_group.name.as_str();
            let lists = join_all(api_group.versions.iter().map(|version| async move {
                self.throttle().await;
                let list = self
                    .client
                    .list_api_group_resources(&version.group_version)
                    .await;
                (
                    GroupVersion::new(group_name, version.version.as_str()),
                    list,
                )
            }))
            .await;

            let preferred_version = api_group
                .preferred_version
                .as_ref()
                .or_else(|| api_group.versions.first())
                .map(|v| v.version.clone())
                .unwrap_or_default();
            let mut group = ApiGroupResources {
                name: api_group.name.clone(),
                preferred_version,
                versions: Vec::new(),
            };
            collect_versions(&mut group, lists, output);
            output.groups.push(group);
        }
        Ok(())
    }
}

#[async_trait]
impl DiscoverySource for ClusterDiscovery {
    async fn discover(&self) -> Result<DiscoveryOutput, DiscoveryError> {
        let mut output = DiscoveryOutput::default();
        self.core_group(&mut output).await?;
        self.named_groups(&mut output).await?;

        tracing::debug!(
            "Discovered {} groups, {} group/versions failed",
            output.groups.len(),
            output.failures.len()
        );
        Ok(output)
    }
}

fn collect_versions(
    group: &mut ApiGroupResources,
    lists: Vec<(GroupVersion, kube::Result<APIResourceList>)>,
    output: &mut DiscoveryOutput,
) {
    for (gv, list) in lists {
        match list {
            Ok(list) => group.versions.push(VersionResources {
                version: gv.version,
                resources: list.resources.iter().map(resource_info).collect(),
            }),
            Err(err) => {
                tracing::warn!("Discovery failed for {}: {}", gv, err);
                output.failures.push(DiscoveryFailure {
                    group_version: gv,
                    error: err.to_string(),
                });
            }
        }
    }
}

fn resource_info(resource: &APIResource) -> ApiResourceInfo {
    ApiResourceInfo {
        name: resource.name.clone(),
        kind: resource.kind.clone(),
        namespaced: resource.namespaced,
        verbs: resource.verbs.clone(),
    }
}
