//! Metadata-only list calls
//!
//! Lists are cluster-wide and request `PartialObjectMetadataList`, so only
//! object metadata crosses the wire regardless of resource type.

use async_trait::async_trait;
use kube::Client;
use kube::api::{Api, ListParams};
use kube::core::{ApiResource, DynamicObject, PartialObjectMeta};

use crate::catalog::CatalogEntry;
use crate::index::{ListError, ListRequest, ObjectLister, ObjectPage};
use crate::models::ObjectRef;

use super::rate_limit::RateLimiter;

/// Kind the server stamps on partial metadata items
const PARTIAL_METADATA_KIND: &str = "PartialObjectMetadata";

pub struct MetadataLister {
    client: Client,
    limiter: Option<RateLimiter>,
}

impl MetadataLister {
    pub fn new(client: Client, limiter: Option<RateLimiter>) -> Self {
        Self { client, limiter }
    }
}

#[async_trait]
impl ObjectLister for MetadataLister {
    async fn list(
        &self,
        entry: &CatalogEntry,
        request: ListRequest,
    ) -> Result<ObjectPage, ListError> {
        let api_resource = ApiResource {
            group: entry.resource.group.clone(),
            version: entry.resource.version.clone(),
            api_version: entry.resource.group_version().to_string(),
            kind: entry.kind.clone(),
            plural: entry.resource.resource.clone(),
        };
        let api: Api<DynamicObject> = Api::all_with(self.client.clone(), &api_resource);

        let mut params = ListParams::default().limit(request.limit);
        if let Some(token) = &request.continue_token {
            params = params.continue_token(token);
        }

        if let Some(limiter) = &self.limiter {
            limiter.acquire().await;
        }
        let list = api
            .list_metadata(&params)
            .await
            .map_err(|e| ListError::new(e.to_string()))?;

        Ok(ObjectPage {
            items: list.items.into_iter().map(object_ref).collect(),
            continue_token: list.metadata.continue_.filter(|t| !t.is_empty()),
        })
    }
}

/// Keep the fields the checker needs from a partial metadata item
fn object_ref(item: PartialObjectMeta<DynamicObject>) -> ObjectRef {
    // The list wrapper's type is not the object's type; treat it as absent
    // so the index backfills it from the catalog
    let (api_version, kind) = item
        .types
        .filter(|t| t.kind != PARTIAL_METADATA_KIND)
        .map(|t| (t.api_version, t.kind))
        .unwrap_or_default();
    let metadata = item.metadata;

    ObjectRef {
        api_version,
        kind,
        namespace: metadata.namespace.unwrap_or_default(),
        name: metadata.name.unwrap_or_default(),
        uid: metadata.uid.unwrap_or_default(),
        owner_references: metadata.owner_references.unwrap_or_default(),
    }
}
