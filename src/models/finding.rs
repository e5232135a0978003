//! Findings produced by the ownerReference validator

use std::fmt;

use k8s_openapi::apimachinery::pkg::apis::meta::v1::OwnerReference;
use serde::Serialize;

use super::group_version::GroupVersionResource;
use super::object::ObjectRef;

/// Severity of a finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Level {
    /// The reference was checked and is wrong
    Error,
    /// The reference could not be checked
    Warning,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Error => "Error",
            Level::Warning => "Warning",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One problem with one ownerReference on one object
///
/// Borrows from the object index, so findings are cheap to produce and
/// live no longer than the run that built the index.
#[derive(Debug, Clone, PartialEq)]
pub struct Finding<'a> {
    pub resource: &'a GroupVersionResource,
    pub child: &'a ObjectRef,
    pub owner_reference: &'a OwnerReference,
    pub level: Level,
    pub message: String,
}

impl<'a> Finding<'a> {
    pub fn error(
        resource: &'a GroupVersionResource,
        child: &'a ObjectRef,
        owner_reference: &'a OwnerReference,
        message: impl Into<String>,
    ) -> Self {
        Self {
            resource,
            child,
            owner_reference,
            level: Level::Error,
            message: message.into(),
        }
    }

    pub fn warning(
        resource: &'a GroupVersionResource,
        child: &'a ObjectRef,
        owner_reference: &'a OwnerReference,
        message: impl Into<String>,
    ) -> Self {
        Self {
            resource,
            child,
            owner_reference,
            level: Level::Warning,
            message: message.into(),
        }
    }

    /// Structured record written in JSON output mode
    pub fn to_record(&self) -> InvalidReference<'a> {
        InvalidReference {
            resource: ResourceRecord {
                group: &self.resource.group,
                version: &self.resource.version,
                resource: &self.resource.resource,
            },
            kind: KindRecord {
                group: &self.resource.group,
                version: &self.resource.version,
                kind: &self.child.kind,
            },
            namespace: &self.child.namespace,
            name: &self.child.name,
            owner_reference: self.owner_reference,
            level: self.level,
            message: self.message.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ResourceRecord<'a> {
    pub group: &'a str,
    pub version: &'a str,
    pub resource: &'a str,
}

#[derive(Debug, Serialize)]
pub struct KindRecord<'a> {
    pub group: &'a str,
    pub version: &'a str,
    pub kind: &'a str,
}

/// JSON shape of a finding
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvalidReference<'a> {
    pub resource: ResourceRecord<'a>,
    pub kind: KindRecord<'a>,
    pub namespace: &'a str,
    pub name: &'a str,
    pub owner_reference: &'a OwnerReference,
    pub level: Level,
    pub message: String,
}
