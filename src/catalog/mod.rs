//! Resource catalog
//!
//! Turns discovery output into:
//! - a REST mapper covering every resource discovery could report
//! - the sorted set of resource types that will be listed and checked
//! - the set of group/versions whose discovery failed
//!
//! Partial discovery is not fatal. Only a source that cannot report anything
//! at all aborts the run.

mod rest_mapper;

pub use rest_mapper::{NoKindMatchError, RestMapper, RestMapping};

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;

use crate::models::{GroupResource, GroupVersion, GroupVersionKind, GroupVersionResource};

/// Verbs a resource must support to take part in garbage collection
pub const GC_VERBS: &[&str] = &["get", "list", "delete"];

/// A single resource as reported by discovery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResourceInfo {
    /// Plural resource name, e.g. `deployments` or `pods/log`
    pub name: String,
    pub kind: String,
    pub namespaced: bool,
    pub verbs: Vec<String>,
}

impl ApiResourceInfo {
    pub fn new(name: &str, kind: &str, namespaced: bool, verbs: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            kind: kind.to_string(),
            namespaced,
            verbs: verbs.iter().map(|v| v.to_string()).collect(),
        }
    }

    pub fn is_subresource(&self) -> bool {
        self.name.contains('/')
    }

    pub fn supports_all(&self, verbs: &[&str]) -> bool {
        verbs.iter().all(|verb| self.verbs.iter().any(|v| v == verb))
    }
}

/// Resources served at one version of a group
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionResources {
    pub version: String,
    pub resources: Vec<ApiResourceInfo>,
}

/// One API group with every version whose resources could be fetched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiGroupResources {
    /// Empty for the core group
    pub name: String,
    pub preferred_version: String,
    /// In server order; versions that failed discovery are omitted
    pub versions: Vec<VersionResources>,
}

impl ApiGroupResources {
    /// Versions with the preferred version moved to the front
    pub fn ordered_versions(&self) -> impl Iterator<Item = &VersionResources> {
        let preferred = self
            .versions
            .iter()
            .filter(|v| v.version == self.preferred_version);
        let rest = self
            .versions
            .iter()
            .filter(|v| v.version != self.preferred_version);
        preferred.chain(rest)
    }
}

/// A group/version whose resource list could not be retrieved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryFailure {
    pub group_version: GroupVersion,
    pub error: String,
}

/// Everything a discovery pass produced
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiscoveryOutput {
    pub groups: Vec<ApiGroupResources>,
    pub failures: Vec<DiscoveryFailure>,
}

/// Discovery could not produce any information
#[derive(Debug, thiserror::Error)]
pub enum DiscoveryError {
    #[error("unable to retrieve the list of server APIs: {0}")]
    Unavailable(String),
}

/// Source of API discovery information
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DiscoverySource: Send + Sync {
    /// Report every served group with the resources of each version
    ///
    /// Group/versions that cannot be read go into `failures`; only a total
    /// failure is returned as an error.
    async fn discover(&self) -> Result<DiscoveryOutput, DiscoveryError>;
}

/// A resource type selected for listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub resource: GroupVersionResource,
    pub kind: String,
    pub namespaced: bool,
}

/// Resolved view of the cluster's API surface for one run
#[derive(Debug, Clone, Default)]
pub struct ResourceCatalog {
    mapper: RestMapper,
    entries: Vec<CatalogEntry>,
    discovery_failures: BTreeMap<GroupVersion, String>,
}

impl ResourceCatalog {
    /// Build the catalog from discovery output
    ///
    /// `verbs` selects which preferred resources are enumerated.
    pub fn from_discovery(output: &DiscoveryOutput, verbs: &[&str]) -> Self {
        let mut discovery_failures = BTreeMap::new();
        for failure in &output.failures {
            discovery_failures
                .entry(failure.group_version.clone())
                .or_insert_with(|| failure.error.clone());
        }

        let mut entries: Vec<CatalogEntry> = preferred_resources(&output.groups)
            .into_iter()
            .filter(|(_, info)| info.supports_all(verbs))
            .map(|(resource, info)| CatalogEntry {
                resource,
                kind: info.kind.clone(),
                namespaced: info.namespaced,
            })
            .collect();
        entries.sort_by(|a, b| a.resource.cmp(&b.resource));

        tracing::debug!(
            "Catalog built: {} enumerable resource types, {} discovery failures",
            entries.len(),
            discovery_failures.len()
        );

        Self {
            mapper: RestMapper::new(&output.groups),
            entries,
            discovery_failures,
        }
    }

    /// Enumerable resource types in (group, version, resource) order
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn resources(&self) -> impl Iterator<Item = &GroupVersionResource> {
        self.entries.iter().map(|e| &e.resource)
    }

    pub fn mapper(&self) -> &RestMapper {
        &self.mapper
    }

    /// Kind to stamp on listed items that arrive without type information
    pub fn kind_for(&self, resource: &GroupVersionResource) -> Option<&GroupVersionKind> {
        self.mapper.kind_for(resource)
    }

    /// The recorded discovery error for a group/version, if any
    pub fn discovery_failure(&self, gv: &GroupVersion) -> Option<&str> {
        self.discovery_failures.get(gv).map(String::as_str)
    }

    /// Discovery failures, deduplicated and in group/version order
    pub fn discovery_failures(&self) -> impl Iterator<Item = (&GroupVersion, &str)> {
        self.discovery_failures
            .iter()
            .map(|(gv, err)| (gv, err.as_str()))
    }
}

/// Pick one version per group/resource
///
/// The group's preferred version wins when it serves the resource; otherwise
/// the first version (in server order) that serves it is used.
fn preferred_resources(
    groups: &[ApiGroupResources],
) -> Vec<(GroupVersionResource, &ApiResourceInfo)> {
    let mut chosen: HashMap<GroupResource, (GroupVersionResource, &ApiResourceInfo)> =
        HashMap::new();

    for group in groups {
        for version in &group.versions {
            let gv = GroupVersion::new(group.name.clone(), version.version.clone());
            for info in version.resources.iter().filter(|r| !r.is_subresource()) {
                let gvr = gv.with_resource(info.name.clone());
                let gr = gvr.group_resource();
                if chosen.contains_key(&gr) && version.version != group.preferred_version {
                    continue;
                }
                chosen.insert(gr, (gvr, info));
            }
        }
    }

    chosen.into_values().collect()
}
