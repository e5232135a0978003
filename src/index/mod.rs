//! Object index
//!
//! Lists every object of every catalog resource type and indexes them two
//! ways: per resource type in fetch order, and per UID. A UID bucket may
//! hold several objects because the same logical object can be served
//! through more than one group or version.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use futures::StreamExt;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use crate::catalog::{CatalogEntry, ResourceCatalog};
use crate::diagnostics::Diagnostics;
use crate::error::{CheckError, CheckResult};
use crate::models::{GroupResource, GroupVersionResource, ObjectRef};

/// Default number of items requested per list call
pub const DEFAULT_PAGE_SIZE: u32 = 500;

/// Parameters for one page of a list call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRequest {
    pub limit: u32,
    pub continue_token: Option<String>,
}

/// One page of listed objects
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectPage {
    pub items: Vec<ObjectRef>,
    /// Present and non-empty while more pages remain
    pub continue_token: Option<String>,
}

/// A list call failed; the whole resource type is skipped
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ListError {
    pub message: String,
}

impl ListError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Source of metadata-only object pages
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ObjectLister: Send + Sync {
    /// List one page of objects of a resource type across all namespaces
    async fn list(&self, entry: &CatalogEntry, request: ListRequest)
    -> Result<ObjectPage, ListError>;
}

/// Knobs for the fetch phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchOptions {
    pub page_size: u32,
    /// Resource types listed at the same time; 1 lists sequentially
    pub concurrency: usize,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            concurrency: 1,
        }
    }
}

/// Objects of one run, indexed by resource type and by UID
#[derive(Debug, Default)]
pub struct ObjectIndex {
    by_resource: HashMap<GroupVersionResource, Vec<Arc<ObjectRef>>>,
    by_uid: HashMap<String, Vec<Arc<ObjectRef>>>,
    list_failures: BTreeMap<GroupResource, String>,
}

impl ObjectIndex {
    /// List every catalog resource type and index the results
    ///
    /// List failures are recorded and reported, never returned. The only
    /// errors are cancellation and failure to write diagnostics.
    pub async fn fetch<L>(
        catalog: &ResourceCatalog,
        lister: &L,
        options: FetchOptions,
        diagnostics: &mut Diagnostics<'_>,
        cancel: &CancellationToken,
    ) -> CheckResult<Self>
    where
        L: ObjectLister + ?Sized,
    {
        let mut index = Self::default();
        let diagnostics = Mutex::new(diagnostics);
        let concurrency = options.concurrency.max(1);

        // `buffered` yields in catalog order, so insertion order does not
        // depend on which list call finishes first
        let mut fetches = futures::stream::iter(catalog.entries())
            .map(|entry| {
                let diagnostics = &diagnostics;
                async move {
                    if cancel.is_cancelled() {
                        return Err(CheckError::Cancelled);
                    }
                    diagnostics.lock().await.fetching(&entry.resource)?;
                    let result = tokio::select! {
                        _ = cancel.cancelled() => return Err(CheckError::Cancelled),
                        result = list_all(lister, entry, options.page_size) => result,
                    };
                    Ok((entry, result))
                }
            })
            .buffered(concurrency);

        while let Some(fetched) = fetches.next().await {
            let (entry, result) = fetched?;
            let mut diagnostics = diagnostics.lock().await;
            match result {
                Ok(items) => {
                    diagnostics.fetched(&entry.resource, items.len())?;
                    let kind = catalog.kind_for(&entry.resource);
                    for mut item in items {
                        if let Some(gvk) = kind {
                            item.backfill_type(gvk);
                        }
                        index.insert(&entry.resource, item);
                    }
                }
                Err(err) => {
                    diagnostics
                        .warning(format_args!("could not list {}: {}", entry.resource, err))?;
                    index.record_list_failure(&entry.resource, err.message);
                }
            }
        }

        Ok(index)
    }

    /// Append an object to its resource bucket and its UID bucket
    pub fn insert(&mut self, resource: &GroupVersionResource, object: ObjectRef) {
        let object = Arc::new(object);
        self.by_uid
            .entry(object.uid.clone())
            .or_default()
            .push(Arc::clone(&object));
        self.by_resource
            .entry(resource.clone())
            .or_default()
            .push(object);
    }

    pub fn record_list_failure(&mut self, resource: &GroupVersionResource, error: String) {
        self.list_failures.insert(resource.group_resource(), error);
    }

    /// Objects of a resource type in fetch order
    pub fn objects(&self, resource: &GroupVersionResource) -> &[Arc<ObjectRef>] {
        self.by_resource
            .get(resource)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Every object carrying a UID, across all groups and versions
    pub fn with_uid(&self, uid: &str) -> &[Arc<ObjectRef>] {
        self.by_uid.get(uid).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn list_failure(&self, group_resource: &GroupResource) -> Option<&str> {
        self.list_failures.get(group_resource).map(String::as_str)
    }

    pub fn list_failures(&self) -> impl Iterator<Item = (&GroupResource, &str)> {
        self.list_failures.iter().map(|(gr, err)| (gr, err.as_str()))
    }

    /// Total number of indexed objects
    pub fn len(&self) -> usize {
        self.by_resource.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Follow continue tokens until the list is exhausted
///
/// Pages retrieved before an error are discarded with the rest of the type.
async fn list_all<L>(
    lister: &L,
    entry: &CatalogEntry,
    page_size: u32,
) -> Result<Vec<ObjectRef>, ListError>
where
    L: ObjectLister + ?Sized,
{
    let mut items = Vec::new();
    let mut continue_token = None;
    loop {
        let page = lister
            .list(
                entry,
                ListRequest {
                    limit: page_size,
                    continue_token: continue_token.take(),
                },
            )
            .await?;
        items.extend(page.items);
        match page.continue_token {
            Some(token) if !token.is_empty() => continue_token = Some(token),
            _ => break,
        }
    }
    Ok(items)
}
