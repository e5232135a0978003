//! API group/version identifiers
//!
//! Mirrors the apimachinery `schema` types closely enough that rendered
//! strings (used in diagnostics and finding messages) match what kubectl
//! users are used to seeing.

use std::fmt;

/// Error returned when an `apiVersion` string has more than one `/`
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unexpected GroupVersion string: {0}")]
pub struct ParseGroupVersionError(pub String);

/// An API group and version, e.g. `apps/v1` or the core group's `v1`
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupVersion {
    pub group: String,
    pub version: String,
}

impl GroupVersion {
    pub fn new(group: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            version: version.into(),
        }
    }

    /// Parse an `apiVersion` string
    ///
    /// - `""` parses to the empty group/version
    /// - `"v1"` parses to the core group
    /// - `"apps/v1"` splits on the single `/`
    /// - anything with more than one `/` is rejected
    pub fn parse(api_version: &str) -> Result<Self, ParseGroupVersionError> {
        if api_version.is_empty() {
            return Ok(Self::default());
        }
        match api_version.matches('/').count() {
            0 => Ok(Self::new("", api_version)),
            1 => {
                let (group, version) = api_version
                    .split_once('/')
                    .ok_or_else(|| ParseGroupVersionError(api_version.to_string()))?;
                Ok(Self::new(group, version))
            }
            _ => Err(ParseGroupVersionError(api_version.to_string())),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.group.is_empty() && self.version.is_empty()
    }

    pub fn with_kind(&self, kind: impl Into<String>) -> GroupVersionKind {
        GroupVersionKind {
            group: self.group.clone(),
            version: self.version.clone(),
            kind: kind.into(),
        }
    }

    pub fn with_resource(&self, resource: impl Into<String>) -> GroupVersionResource {
        GroupVersionResource {
            group: self.group.clone(),
            version: self.version.clone(),
            resource: resource.into(),
        }
    }
}

impl fmt::Display for GroupVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.group.is_empty() {
            write!(f, "{}", self.version)
        } else {
            write!(f, "{}/{}", self.group, self.version)
        }
    }
}

/// A resource type independent of its version
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupResource {
    pub group: String,
    pub resource: String,
}

impl fmt::Display for GroupResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.group.is_empty() {
            write!(f, "{}", self.resource)
        } else {
            write!(f, "{}.{}", self.resource, self.group)
        }
    }
}

/// A resource type qualified by group and version
///
/// The derived ordering (group, version, resource) is the catalog order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupVersionResource {
    pub group: String,
    pub version: String,
    pub resource: String,
}

impl GroupVersionResource {
    pub fn new(
        group: impl Into<String>,
        version: impl Into<String>,
        resource: impl Into<String>,
    ) -> Self {
        Self {
            group: group.into(),
            version: version.into(),
            resource: resource.into(),
        }
    }

    pub fn group_version(&self) -> GroupVersion {
        GroupVersion::new(self.group.clone(), self.version.clone())
    }

    pub fn group_resource(&self) -> GroupResource {
        GroupResource {
            group: self.group.clone(),
            resource: self.resource.clone(),
        }
    }
}

impl fmt::Display for GroupVersionResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}, Resource={}",
            self.group, self.version, self.resource
        )
    }
}

/// A kind qualified by group and version
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupVersionKind {
    pub group: String,
    pub version: String,
    pub kind: String,
}

impl GroupVersionKind {
    pub fn group_version(&self) -> GroupVersion {
        GroupVersion::new(self.group.clone(), self.version.clone())
    }

    pub fn is_empty(&self) -> bool {
        self.group.is_empty() && self.version.is_empty() && self.kind.is_empty()
    }
}

/// Whether objects of a resource type live inside a namespace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    Namespaced,
    Cluster,
}

impl Scope {
    pub fn from_namespaced(namespaced: bool) -> Self {
        if namespaced {
            Scope::Namespaced
        } else {
            Scope::Cluster
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_core_version() {
        let gv = GroupVersion::parse("v1").unwrap();
        assert_eq!(gv.group, "");
        assert_eq!(gv.version, "v1");
        assert_eq!(gv.to_string(), "v1");
    }

    #[test]
    fn test_parse_group_version() {
        let gv = GroupVersion::parse("apps/v1").unwrap();
        assert_eq!(gv, GroupVersion::new("apps", "v1"));
        assert_eq!(gv.to_string(), "apps/v1");
    }

    #[test]
    fn test_parse_empty() {
        let gv = GroupVersion::parse("").unwrap();
        assert!(gv.is_empty());
    }

    #[test]
    fn test_parse_too_many_slashes() {
        let err = GroupVersion::parse("a/b/c").unwrap_err();
        assert_eq!(err.to_string(), "unexpected GroupVersion string: a/b/c");
    }

    #[test]
    fn test_group_resource_display() {
        let core = GroupVersionResource::new("", "v1", "pods");
        assert_eq!(core.group_resource().to_string(), "pods");

        let grouped = GroupVersionResource::new("forbidden", "v1", "forbiddenresources");
        assert_eq!(
            grouped.group_resource().to_string(),
            "forbiddenresources.forbidden"
        );
    }

    #[test]
    fn test_gvr_display() {
        let gvr = GroupVersionResource::new("forbidden", "v1", "forbiddenresources");
        assert_eq!(gvr.to_string(), "forbidden/v1, Resource=forbiddenresources");
    }

    #[test]
    fn test_gvr_ordering_puts_core_group_first() {
        let mut gvrs = vec![
            GroupVersionResource::new("apps", "v1", "deployments"),
            GroupVersionResource::new("", "v1", "pods"),
            GroupVersionResource::new("", "v1", "nodes"),
            GroupVersionResource::new("Zeta", "v1", "things"),
        ];
        gvrs.sort();
        let resources: Vec<_> = gvrs.iter().map(|g| g.resource.as_str()).collect();
        assert_eq!(resources, vec!["nodes", "pods", "things", "deployments"]);
    }
}
