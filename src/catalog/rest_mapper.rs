//! Kind to resource mapping built from discovery
//!
//! Resolves an ownerReference's apiVersion/kind to the resource that serves
//! it and that resource's scope. Every discovered version is registered, not
//! only the preferred one, so references written against an older served
//! version still resolve.

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use super::ApiGroupResources;
use crate::models::{GroupVersion, GroupVersionKind, GroupVersionResource, Scope};

/// Resolved resource and scope for a kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestMapping {
    pub resource: GroupVersionResource,
    pub scope: Scope,
}

/// No served resource matched the requested group/kind/version
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub struct NoKindMatchError {
    pub group: String,
    pub kind: String,
    pub searched_versions: Vec<String>,
}

impl fmt::Display for NoKindMatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let searched: BTreeSet<String> = self
            .searched_versions
            .iter()
            .map(|v| GroupVersion::new(self.group.clone(), v.clone()).to_string())
            .collect();
        let searched: Vec<String> = searched.into_iter().collect();
        match searched.as_slice() {
            [] => write!(
                f,
                "no matches for kind {:?} in group {:?}",
                self.kind, self.group
            ),
            [only] => write!(f, "no matches for kind {:?} in version {:?}", self.kind, only),
            many => write!(
                f,
                "no matches for kind {:?} in versions {:?}",
                self.kind, many
            ),
        }
    }
}

/// Lookup tables from kinds to resources and back
#[derive(Debug, Clone, Default)]
pub struct RestMapper {
    kinds: HashMap<GroupVersionKind, RestMapping>,
    resources: HashMap<GroupVersionResource, GroupVersionKind>,
    /// Versions per group, preferred version first
    group_versions: HashMap<String, Vec<String>>,
}

impl RestMapper {
    pub fn new(groups: &[ApiGroupResources]) -> Self {
        let mut mapper = Self::default();

        for group in groups {
            let versions = mapper.group_versions.entry(group.name.clone()).or_default();
            for version in group.ordered_versions() {
                if !versions.contains(&version.version) {
                    versions.push(version.version.clone());
                }
            }

            for version in &group.versions {
                let gv = GroupVersion::new(group.name.clone(), version.version.clone());
                for resource in version.resources.iter().filter(|r| !r.is_subresource()) {
                    let mapping = RestMapping {
                        resource: gv.with_resource(resource.name.clone()),
                        scope: Scope::from_namespaced(resource.namespaced),
                    };
                    let kind = gv.with_kind(resource.kind.clone());
                    // Lookups with an all-lowercase kind are tolerated, matching kubectl
                    mapper
                        .kinds
                        .entry(gv.with_kind(resource.kind.to_lowercase()))
                        .or_insert_with(|| mapping.clone());
                    mapper
                        .resources
                        .entry(mapping.resource.clone())
                        .or_insert_with(|| kind.clone());
                    mapper.kinds.entry(kind).or_insert(mapping);
                }
            }
        }

        mapper
    }

    /// Resolve a group/kind at a version
    ///
    /// An empty version searches every known version of the group, preferred
    /// version first.
    pub fn rest_mapping(
        &self,
        group: &str,
        kind: &str,
        version: &str,
    ) -> Result<RestMapping, NoKindMatchError> {
        let candidates: Vec<String> = if version.is_empty() {
            self.group_versions.get(group).cloned().unwrap_or_default()
        } else {
            vec![version.to_string()]
        };

        candidates
            .iter()
            .find_map(|v| {
                self.kinds.get(&GroupVersionKind {
                    group: group.to_string(),
                    version: v.clone(),
                    kind: kind.to_string(),
                })
            })
            .cloned()
            .ok_or_else(|| NoKindMatchError {
                group: group.to_string(),
                kind: kind.to_string(),
                searched_versions: if version.is_empty() {
                    Vec::new()
                } else {
                    candidates
                },
            })
    }

    /// Reverse lookup of the kind served by a resource
    pub fn kind_for(&self, resource: &GroupVersionResource) -> Option<&GroupVersionKind> {
        self.resources.get(resource)
    }
}
