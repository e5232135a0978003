//! Rendered table and JSON output

mod common;

use common::{FakeCluster, owner_reference, verbose};
use insta::assert_snapshot;
use kubectl_check_ownerreferences::CheckOptions;
use kubectl_check_ownerreferences::config::OutputFormat;

fn mismatched_name() -> FakeCluster {
    let mut cluster = FakeCluster::core();
    cluster.add_object("v1", "nodes", "Node", "node1", "", "node1uid", vec![]);
    cluster.add_object(
        "v1",
        "pods",
        "Pod",
        "pod1",
        "ns1",
        "poduid1",
        vec![owner_reference("v1", "Node", "nodex", "node1uid")],
    );
    cluster
}

#[tokio::test]
async fn test_table_layout() {
    let out = mismatched_name().run(CheckOptions::default()).await.unwrap();

    assert_eq!(
        out.stdout,
        concat!(
            "GROUP   RESOURCE   NAMESPACE   NAME   OWNER_UID   LEVEL   MESSAGE\n",
            "        pods       ns1         pod1   node1uid    Error   ownerReference name (nodex) does not match owner name (node1)\n",
        )
    );
}

#[tokio::test]
async fn test_table_columns_stay_aligned_across_types() {
    let mut cluster = FakeCluster::core();
    cluster.add_object(
        "v1",
        "nodes",
        "Node",
        "node1",
        "",
        "node1uid",
        vec![owner_reference("v1", "Pod", "pod1", "poduid1")],
    );
    cluster.add_object(
        "v1",
        "pods",
        "Pod",
        "pod1",
        "ns1",
        "poduid1",
        vec![owner_reference("v1", "Node", "node9", "gone")],
    );

    let out = cluster.run(CheckOptions::default()).await.unwrap();

    // Header once; later types keep the columns of earlier ones
    assert_eq!(
        out.stdout,
        concat!(
            "GROUP   RESOURCE   NAMESPACE   NAME    OWNER_UID   LEVEL   MESSAGE\n",
            "        nodes                  node1   poduid1     Error   cannot reference namespaced type as owner (apiVersion=v1,kind=Pod)\n",
            "        pods       ns1         pod1    gone        Error   no object found for uid\n",
        )
    );
    let lines: Vec<&str> = out.stdout.lines().collect();
    assert_eq!(lines[0].find("RESOURCE"), lines[2].find("pods"));
    assert_eq!(lines[0].find("MESSAGE"), lines[2].find("no object"));
    assert_snapshot!(out.stderr, @"2 errors, 0 warnings");
}

#[tokio::test]
async fn test_json_lines() {
    let out = mismatched_name()
        .run(CheckOptions {
            output: OutputFormat::Json,
            ..CheckOptions::default()
        })
        .await
        .unwrap();

    assert_snapshot!(
        out.stdout,
        @r#"{"resource":{"group":"","version":"v1","resource":"pods"},"kind":{"group":"","version":"v1","kind":"Pod"},"namespace":"ns1","name":"pod1","ownerReference":{"apiVersion":"v1","kind":"Node","name":"nodex","uid":"node1uid"},"level":"Error","message":"ownerReference name (nodex) does not match owner name (node1)"}"#
    );
}

#[tokio::test]
async fn test_json_one_object_per_finding() {
    let mut cluster = FakeCluster::core();
    cluster.add_object(
        "v1",
        "pods",
        "Pod",
        "pod1",
        "ns1",
        "poduid1",
        vec![
            owner_reference("v1", "Node", "node1", "gone1"),
            owner_reference("v1", "Node", "node2", "gone2"),
        ],
    );

    let out = cluster
        .run(CheckOptions {
            output: OutputFormat::Json,
            ..verbose()
        })
        .await
        .unwrap();

    let records: Vec<serde_json::Value> = out
        .stdout
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["ownerReference"]["uid"], "gone1");
    assert_eq!(records[1]["ownerReference"]["uid"], "gone2");
    assert!(records.iter().all(|r| r["level"] == "Error"));

    assert_snapshot!(out.stderr, @r"
    fetching v1, nodes
    got 0 items
    fetching v1, pods
    got 1 item
    2 errors, 0 warnings
    ");
}

#[tokio::test]
async fn test_clean_run_prints_no_table() {
    let mut cluster = FakeCluster::core();
    cluster.add_object("v1", "nodes", "Node", "node1", "", "node1uid", vec![]);

    let out = cluster.run(CheckOptions::default()).await.unwrap();

    assert_eq!(out.stdout, "");
    assert_snapshot!(out.stderr, @"No invalid ownerReferences found");
}
