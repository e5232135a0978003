//! Catalog construction from discovery output

mod common;

use common::{FakeCluster, cluster_scoped, namespaced};
use kubectl_check_ownerreferences::catalog::{
    ApiResourceInfo, DiscoverySource, GC_VERBS, ResourceCatalog,
};
use kubectl_check_ownerreferences::models::{GroupVersion, GroupVersionResource, Scope};

async fn catalog(cluster: &FakeCluster) -> ResourceCatalog {
    let output = cluster.discover().await.unwrap();
    ResourceCatalog::from_discovery(&output, GC_VERBS)
}

#[tokio::test]
async fn test_enumerates_only_gc_capable_top_level_resources() {
    let cluster = FakeCluster::new().with_resources(
        "v1",
        vec![
            cluster_scoped("nodes", "Node"),
            namespaced("pods", "Pod"),
            namespaced("pods/log", "Pod"),
            ApiResourceInfo::new("bindings", "Binding", true, &["create"]),
            ApiResourceInfo::new("componentstatuses", "ComponentStatus", false, &["get", "list"]),
        ],
    );

    let catalog = catalog(&cluster).await;
    let resources: Vec<String> = catalog.resources().map(|r| r.to_string()).collect();
    assert_eq!(
        resources,
        vec!["/v1, Resource=nodes", "/v1, Resource=pods"]
    );
}

#[tokio::test]
async fn test_mapper_covers_every_version_but_catalog_only_preferred() {
    let cluster = FakeCluster::new()
        .with_resources("batch/v1", vec![namespaced("jobs", "Job")])
        .with_resources(
            "batch/v1beta1",
            vec![namespaced("jobs", "Job"), namespaced("cronjobs", "CronJob")],
        );

    let catalog = catalog(&cluster).await;

    let resources: Vec<GroupVersionResource> = catalog.resources().cloned().collect();
    assert_eq!(
        resources,
        vec![
            GroupVersionResource::new("batch", "v1", "jobs"),
            GroupVersionResource::new("batch", "v1beta1", "cronjobs"),
        ]
    );

    let mapping = catalog
        .mapper()
        .rest_mapping("batch", "Job", "v1beta1")
        .unwrap();
    assert_eq!(
        mapping.resource,
        GroupVersionResource::new("batch", "v1beta1", "jobs")
    );
    assert_eq!(mapping.scope, Scope::Namespaced);
}

#[tokio::test]
async fn test_mapper_accepts_lowercase_kind_and_empty_version() {
    let cluster = FakeCluster::new().with_resources("apps/v1", vec![namespaced("deployments", "Deployment")]);
    let catalog = catalog(&cluster).await;

    let lower = catalog
        .mapper()
        .rest_mapping("apps", "deployment", "v1")
        .unwrap();
    assert_eq!(lower.resource.resource, "deployments");

    let any_version = catalog
        .mapper()
        .rest_mapping("apps", "Deployment", "")
        .unwrap();
    assert_eq!(any_version.resource.version, "v1");

    let err = catalog
        .mapper()
        .rest_mapping("apps", "StatefulSet", "")
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        r#"no matches for kind "StatefulSet" in group "apps""#
    );
}

#[tokio::test]
async fn test_cluster_scope_resolved() {
    let cluster = FakeCluster::core();
    let catalog = catalog(&cluster).await;

    let node = catalog.mapper().rest_mapping("", "Node", "v1").unwrap();
    assert_eq!(node.scope, Scope::Cluster);
    assert_eq!(
        catalog.kind_for(&GroupVersionResource::new("", "v1", "pods")).map(|k| k.kind.as_str()),
        Some("Pod")
    );
}

#[tokio::test]
async fn test_discovery_failures_recorded_once() {
    let cluster = FakeCluster::core()
        .with_discovery_failure("metrics.k8s.io/v1beta1", "service unavailable")
        .with_discovery_failure("metrics.k8s.io/v1beta1", "service unavailable again");
    let catalog = catalog(&cluster).await;

    let failures: Vec<(String, String)> = catalog
        .discovery_failures()
        .map(|(gv, err)| (gv.to_string(), err.to_string()))
        .collect();
    assert_eq!(
        failures,
        vec![(
            "metrics.k8s.io/v1beta1".to_string(),
            "service unavailable".to_string()
        )]
    );
    assert!(
        catalog
            .discovery_failure(&GroupVersion::new("metrics.k8s.io", "v1beta1"))
            .is_some()
    );
    assert!(catalog.discovery_failure(&GroupVersion::new("", "v1")).is_none());
}
