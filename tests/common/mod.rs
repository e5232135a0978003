//! In-memory cluster used by the integration tests
//!
//! Serves discovery from registered resource lists and metadata pages from
//! registered objects, with per-resource list failures and per-group/version
//! discovery failures.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::OwnerReference;
use tokio_util::sync::CancellationToken;

use kubectl_check_ownerreferences::catalog::{
    ApiGroupResources, ApiResourceInfo, CatalogEntry, DiscoveryError, DiscoveryFailure,
    DiscoveryOutput, DiscoverySource, GC_VERBS, VersionResources,
};
use kubectl_check_ownerreferences::index::{ListError, ListRequest, ObjectLister, ObjectPage};
use kubectl_check_ownerreferences::models::{GroupVersion, GroupVersionResource, ObjectRef};
use kubectl_check_ownerreferences::{CheckOptions, CheckResult, Checker, Tally};

#[allow(unused_imports)]
pub use kubectl_check_ownerreferences::models::owner_reference;

pub fn namespaced(name: &str, kind: &str) -> ApiResourceInfo {
    ApiResourceInfo::new(name, kind, true, GC_VERBS)
}

pub fn cluster_scoped(name: &str, kind: &str) -> ApiResourceInfo {
    ApiResourceInfo::new(name, kind, false, GC_VERBS)
}

/// Output of one check run
#[derive(Debug)]
pub struct RunOutput {
    pub stdout: String,
    pub stderr: String,
    pub tally: Tally,
}

#[derive(Default)]
pub struct FakeCluster {
    /// Resource lists in registration order, like a discovery document
    resource_lists: Vec<(GroupVersion, Vec<ApiResourceInfo>)>,
    discovery_failures: Vec<DiscoveryFailure>,
    objects: HashMap<GroupVersionResource, Vec<ObjectRef>>,
    list_failures: HashMap<String, String>,
    pub list_calls: Mutex<Vec<(GroupVersionResource, ListRequest)>>,
}

impl FakeCluster {
    pub fn new() -> Self {
        Self::default()
    }

    /// The core v1 nodes/pods surface most scenarios start from
    pub fn core() -> Self {
        Self::new().with_resources(
            "v1",
            vec![cluster_scoped("nodes", "Node"), namespaced("pods", "Pod")],
        )
    }

    pub fn with_resources(mut self, group_version: &str, resources: Vec<ApiResourceInfo>) -> Self {
        let gv = GroupVersion::parse(group_version).unwrap();
        self.resource_lists.push((gv, resources));
        self
    }

    pub fn with_discovery_failure(mut self, group_version: &str, error: &str) -> Self {
        self.discovery_failures.push(DiscoveryFailure {
            group_version: GroupVersion::parse(group_version).unwrap(),
            error: error.to_string(),
        });
        self
    }

    #[allow(clippy::too_many_arguments)]
    pub fn add_object(
        &mut self,
        api_version: &str,
        resource: &str,
        kind: &str,
        name: &str,
        namespace: &str,
        uid: &str,
        owners: Vec<OwnerReference>,
    ) {
        let gvr = GroupVersion::parse(api_version)
            .unwrap()
            .with_resource(resource);
        self.objects.entry(gvr).or_default().push(ObjectRef {
            api_version: api_version.to_string(),
            kind: kind.to_string(),
            namespace: namespace.to_string(),
            name: name.to_string(),
            uid: uid.to_string(),
            owner_references: owners,
        });
    }

    /// Make every list of `resource` fail with `message`
    pub fn fail_list(&mut self, resource: &str, message: &str) {
        self.list_failures
            .insert(resource.to_string(), message.to_string());
    }

    pub async fn run(&self, options: CheckOptions) -> CheckResult<RunOutput> {
        self.run_with_cancel(options, &CancellationToken::new())
            .await
    }

    pub async fn run_with_cancel(
        &self,
        options: CheckOptions,
        cancel: &CancellationToken,
    ) -> CheckResult<RunOutput> {
        let mut stdout = Vec::new();
        let mut stderr = Vec::new();
        let tally = Checker::new(self, self, options)
            .run(&mut stdout, &mut stderr, cancel)
            .await?;
        Ok(RunOutput {
            stdout: String::from_utf8(stdout).unwrap(),
            stderr: String::from_utf8(stderr).unwrap(),
            tally,
        })
    }
}

#[async_trait]
impl DiscoverySource for FakeCluster {
    async fn discover(&self) -> Result<DiscoveryOutput, DiscoveryError> {
        let mut groups: Vec<ApiGroupResources> = Vec::new();
        for (gv, resources) in &self.resource_lists {
            let versions = VersionResources {
                version: gv.version.clone(),
                resources: resources.clone(),
            };
            match groups.iter_mut().find(|g| g.name == gv.group) {
                Some(group) => group.versions.push(versions),
                // First registered version is the preferred one
                None => groups.push(ApiGroupResources {
                    name: gv.group.clone(),
                    preferred_version: gv.version.clone(),
                    versions: vec![versions],
                }),
            }
        }
        Ok(DiscoveryOutput {
            groups,
            failures: self.discovery_failures.clone(),
        })
    }
}

#[async_trait]
impl ObjectLister for FakeCluster {
    async fn list(
        &self,
        entry: &CatalogEntry,
        request: ListRequest,
    ) -> Result<ObjectPage, ListError> {
        self.list_calls
            .lock()
            .unwrap()
            .push((entry.resource.clone(), request.clone()));

        if let Some(message) = self.list_failures.get(&entry.resource.resource) {
            return Err(ListError::new(message.clone()));
        }

        let all = self
            .objects
            .get(&entry.resource)
            .map(Vec::as_slice)
            .unwrap_or_default();
        let start: usize = request
            .continue_token
            .as_deref()
            .map(|t| t.parse().unwrap())
            .unwrap_or(0);
        let end = (start + request.limit as usize).min(all.len());

        Ok(ObjectPage {
            items: all[start..end].to_vec(),
            continue_token: (end < all.len()).then(|| end.to_string()),
        })
    }
}

/// Collapse runs of spaces and tabs, trim each line, drop blank edges
pub fn normalize(text: &str) -> Vec<String> {
    text.trim()
        .lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .collect()
}

/// Options printing every diagnostic line
pub fn verbose() -> CheckOptions {
    CheckOptions {
        verbosity: 3,
        ..Default::default()
    }
}
