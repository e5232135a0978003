//! ownerReference validation
//!
//! Pure over an already-built catalog and index: no I/O, no shared state.
//! Each reference is run through an ordered list of checks and the first
//! one that fires decides the finding.

use k8s_openapi::apimachinery::pkg::apis::meta::v1::OwnerReference;

use crate::catalog::ResourceCatalog;
use crate::index::ObjectIndex;
use crate::models::{Finding, GroupVersion, GroupVersionResource, ObjectRef, Scope};

/// Checks ownerReferences against the objects actually found
#[derive(Debug, Clone, Copy)]
pub struct Validator<'a> {
    catalog: &'a ResourceCatalog,
    index: &'a ObjectIndex,
}

impl<'a> Validator<'a> {
    pub fn new(catalog: &'a ResourceCatalog, index: &'a ObjectIndex) -> Self {
        Self { catalog, index }
    }

    /// Every finding of the run in catalog, fetch and declaration order
    pub fn findings(&self) -> Vec<Finding<'a>> {
        let index = self.index;
        let validator = *self;
        self.catalog
            .resources()
            .flat_map(move |resource| {
                index
                    .objects(resource)
                    .iter()
                    .flat_map(move |child| validator.check_object(resource, child))
            })
            .collect()
    }

    /// Findings for one object's ownerReferences, in declaration order
    pub fn check_object(
        &self,
        resource: &'a GroupVersionResource,
        child: &'a ObjectRef,
    ) -> Vec<Finding<'a>> {
        child
            .owner_references
            .iter()
            .filter_map(|owner| self.check_reference(resource, child, owner))
            .collect()
    }

    /// Classify a single ownerReference, `None` when it is valid
    pub fn check_reference(
        &self,
        resource: &'a GroupVersionResource,
        child: &'a ObjectRef,
        owner: &'a OwnerReference,
    ) -> Option<Finding<'a>> {
        let owner_gv = match GroupVersion::parse(&owner.api_version) {
            Ok(gv) => gv,
            Err(err) => {
                return Some(Finding::error(
                    resource,
                    child,
                    owner,
                    format!("invalid owner apiVersion {}: {}", owner.api_version, err),
                ));
            }
        };

        let mapping = match self.catalog.mapper().rest_mapping(
            &owner_gv.group,
            &owner.kind,
            &owner_gv.version,
        ) {
            Ok(mapping) => mapping,
            Err(err) => {
                // We never saw this group/version, so we cannot say it is wrong
                if let Some(discovery_err) = self.catalog.discovery_failure(&owner_gv) {
                    return Some(Finding::warning(
                        resource,
                        child,
                        owner,
                        format!(
                            "failed resolving resources for {}: {}",
                            owner.api_version, discovery_err
                        ),
                    ));
                }
                return Some(Finding::error(
                    resource,
                    child,
                    owner,
                    format!("cannot resolve owner apiVersion/kind: {}", err),
                ));
            }
        };

        if mapping.scope == Scope::Namespaced && child.is_cluster_scoped() {
            return Some(Finding::error(
                resource,
                child,
                owner,
                format!(
                    "cannot reference namespaced type as owner (apiVersion={},kind={})",
                    owner_gv, owner.kind
                ),
            ));
        }

        let candidates = self.index.with_uid(&owner.uid);
        let Some(last) = candidates.last() else {
            let owner_gr = mapping.resource.group_resource();
            if self.index.list_failure(&owner_gr).is_some() {
                return Some(Finding::warning(
                    resource,
                    child,
                    owner,
                    format!("could not list parent resource {}", owner_gr),
                ));
            }
            return Some(Finding::error(
                resource,
                child,
                owner,
                "no object found for uid",
            ));
        };

        // Each aspect passes if any candidate satisfies it; the same object
        // can be served under several groups/versions with one UID
        let namespace_ok = candidates
            .iter()
            .any(|c| c.is_cluster_scoped() || c.namespace == child.namespace);
        let name_ok = candidates.iter().any(|c| c.name == owner.name);
        let group_kind_ok = candidates
            .iter()
            .any(|c| group_kind_matches(c, &owner_gv.group, &owner.kind));

        // When an aspect fails, every candidate failed it, so the last
        // candidate is the one reported
        if !namespace_ok {
            return Some(Finding::error(
                resource,
                child,
                owner,
                format!(
                    "child namespace does not match owner namespace ({})",
                    last.namespace
                ),
            ));
        }
        if !name_ok {
            return Some(Finding::error(
                resource,
                child,
                owner,
                format!(
                    "ownerReference name ({}) does not match owner name ({})",
                    owner.name, last.name
                ),
            ));
        }
        if !group_kind_ok {
            let actual_gv = last.group_version().unwrap_or_default();
            return Some(Finding::error(
                resource,
                child,
                owner,
                format!(
                    "ownerReference group/kind ({}/{}) does not match owner group/kind ({}/{})",
                    owner_gv.group, owner.kind, actual_gv.group, last.kind
                ),
            ));
        }

        None
    }
}

/// Whether a candidate owner is compatible with the referenced group/kind
///
/// Candidates with missing type information are accepted. The lowercase
/// comparison is one-sided: a reference may spell the kind in lowercase,
/// as the REST mapper accepts that form.
fn group_kind_matches(candidate: &ObjectRef, owner_group: &str, owner_kind: &str) -> bool {
    if candidate.has_partial_type() {
        return true;
    }
    let candidate_gv = candidate.group_version().unwrap_or_default();
    candidate_gv.group == owner_group
        && (candidate.kind == owner_kind || candidate.kind.to_lowercase() == owner_kind)
}
