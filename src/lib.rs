//! kubectl-check-ownerreferences library
//!
//! Finds ownerReferences that do not resolve to the object they claim to
//! point at. The library holds all of the logic and talks to the cluster
//! only through the `DiscoverySource` and `ObjectLister` traits, so every
//! stage can be exercised against an in-memory cluster.

pub mod catalog;
pub mod cli;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod index;
pub mod kube;
pub mod models;
pub mod verify;

pub use catalog::{DiscoverySource, ResourceCatalog};
pub use error::{CheckError, CheckResult};
pub use index::{FetchOptions, ObjectIndex, ObjectLister};
pub use verify::{CheckOptions, Checker, Tally};
