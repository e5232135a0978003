//! Metadata-only view of a fetched object

use k8s_openapi::apimachinery::pkg::apis::meta::v1::OwnerReference;

use super::group_version::{GroupVersion, GroupVersionKind, ParseGroupVersionError};

/// The identity and owner references of one listed object
///
/// Only the fields needed to check ownerReferences are kept; everything
/// else in the object's metadata is dropped at list time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectRef {
    pub api_version: String,
    pub kind: String,
    /// Empty for cluster-scoped objects
    pub namespace: String,
    pub name: String,
    pub uid: String,
    pub owner_references: Vec<OwnerReference>,
}

impl ObjectRef {
    /// Fill in apiVersion/kind when the server omitted both
    ///
    /// Metadata-only list responses do not always carry type information on
    /// individual items.
    pub fn backfill_type(&mut self, gvk: &GroupVersionKind) {
        if self.api_version.is_empty() && self.kind.is_empty() && !gvk.is_empty() {
            self.api_version = gvk.group_version().to_string();
            self.kind = gvk.kind.clone();
        }
    }

    /// True when either half of the type information is missing
    pub fn has_partial_type(&self) -> bool {
        self.api_version.is_empty() || self.kind.is_empty()
    }

    pub fn group_version(&self) -> Result<GroupVersion, ParseGroupVersionError> {
        GroupVersion::parse(&self.api_version)
    }

    pub fn is_cluster_scoped(&self) -> bool {
        self.namespace.is_empty()
    }
}

/// Build an owner reference with the four fields the checker looks at
pub fn owner_reference(api_version: &str, kind: &str, name: &str, uid: &str) -> OwnerReference {
    OwnerReference {
        api_version: api_version.to_string(),
        kind: kind.to_string(),
        name: name.to_string(),
        uid: uid.to_string(),
        ..Default::default()
    }
}
