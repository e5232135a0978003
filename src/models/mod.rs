//! Model layer
//!
//! Structure:
//! - `group_version.rs` - API group/version/kind/resource identifiers
//! - `object.rs` - Metadata-only objects as held by the index
//! - `finding.rs` - Validation findings and their JSON record

pub mod finding;
pub mod group_version;
pub mod object;

pub use finding::{Finding, InvalidReference, Level};
pub use group_version::{
    GroupResource, GroupVersion, GroupVersionKind, GroupVersionResource, ParseGroupVersionError,
    Scope,
};
pub use object::{ObjectRef, owner_reference};
