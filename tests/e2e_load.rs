//! End-to-end loading of CNL files

use std::io::Write;

use tempfile::{NamedTempFile, TempDir};
use xmeasures::{ClusterId, Collection, Config};

fn cnl(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_cluster_id_prefix_is_discarded() {
    let file = cnl("1> 10 20 30\n");
    let cn = Collection::load(file.path(), 1.0);

    assert_eq!(cn.cluster_count(), 1);
    assert_eq!(cn.clusters()[0].members, vec![10, 20, 30]);
    for node in [10, 20, 30] {
        assert_eq!(cn.clusters_of(node), &[ClusterId(0)]);
    }
    assert_eq!(cn.node_count(), 3);
}

#[test]
fn test_bad_token_is_dropped() {
    let file = cnl("10 abc 30\n");
    let cn = Collection::load(file.path(), 1.0);

    assert_eq!(cn.cluster_count(), 1);
    assert_eq!(cn.clusters()[0].members, vec![10, 30]);
    assert!(cn.clusters_of(0).is_empty());
}

#[test]
fn test_comments_and_header_only() {
    let file = cnl("# Clusters: 3, Nodes: 7\n# just a comment\n\n#\n");
    let cn = Collection::load(file.path(), 1.0);

    assert!(cn.is_empty());
    assert_eq!(cn.node_count(), 0);
}

#[test]
fn test_header_comments_and_empty_clusters() {
    let file = cnl(concat!(
        "# Clusters: 3, Nodes: 6, Fuzzy: 0\n",
        "1> 1 2 3\n",
        "# inner comment\n",
        "2>\n",
        "\n",
        "3> 3 4\t5 6\r\n",
        "7 8:0.5\n",
    ));
    let cn = Collection::load(file.path(), 1.0);

    assert_eq!(cn.cluster_count(), 3);
    assert_eq!(cn.node_count(), 8);
    assert_eq!(cn.clusters()[1].members, vec![3, 4, 5, 6]);
    assert_eq!(cn.clusters()[2].members, vec![7, 8]);
    assert_eq!(cn.clusters_of(3), &[ClusterId(0), ClusterId(1)]);
    assert_eq!(cn.validate_index(), 0);
    for cluster in cn.clusters() {
        assert_eq!(cluster.members.capacity(), cluster.members.len());
    }
}

#[test]
fn test_overlapping_clusters_with_membership_hint() {
    let lines: String = (0..200u32)
        .map(|i| {
            let members: Vec<String> = (i * 4..i * 4 + 8).map(|n| n.to_string()).collect();
            format!("{}> {}\n", i, members.join(" "))
        })
        .collect();
    let file = cnl(&lines);
    let cn = Collection::load(file.path(), 2.0);

    assert_eq!(cn.cluster_count(), 200);
    assert_eq!(cn.node_count(), 804);
    assert_eq!(cn.clusters_of(5), &[ClusterId(0), ClusterId(1)]);
    assert_eq!(cn.validate_index(), 0);
}

#[test]
fn test_missing_file_yields_empty_collection() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent.cnl");

    let cn = Collection::load(&path, 1.0);
    assert!(cn.is_empty());
    assert!(Collection::try_load(&path, 1.0).is_err());
}

#[test]
fn test_empty_file_yields_empty_collection() {
    let file = cnl("");
    let cn = Collection::load(file.path(), 1.0);
    assert!(cn.is_empty());
    assert!(matches!(
        Collection::try_load(file.path(), 1.0),
        Err(xmeasures::EvalError::EmptyFile { .. })
    ));
}

#[test]
fn test_load_with_validation() {
    let file = cnl("1 2\n2 3\n");
    let config = Config {
        validate_level: 2,
        ..Config::default()
    };
    let cn = Collection::load_with(file.path(), &config);
    assert_eq!(cn.cluster_count(), 2);
    assert_eq!(cn.clusters_of(2), &[ClusterId(0), ClusterId(1)]);
}

#[test]
fn test_invalid_membership_falls_back() {
    let file = cnl("1 2 3\n");
    let cn = Collection::load(file.path(), 0.0);
    assert_eq!(cn.cluster_count(), 1);
}

fn cnl_bytes(content: &[u8]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content).unwrap();
    file
}

#[test]
fn test_invalid_utf8_mid_file_keeps_later_clusters() {
    let file = cnl_bytes(b"1 2 3\n4 \xff 5\n6 7\n8 9\n");
    let cn = Collection::load(file.path(), 1.0);

    assert_eq!(cn.cluster_count(), 4);
    assert_eq!(cn.clusters()[1].members, vec![4, 5]);
    assert_eq!(cn.clusters()[3].members, vec![8, 9]);
    assert_eq!(cn.node_count(), 9);
}

#[test]
fn test_invalid_utf8_in_first_cluster_line() {
    let file = cnl_bytes(b"# Clusters: 3 Nodes: 6\n1 \xff 3\n4 5\n6 7\n");
    let cn = Collection::load(file.path(), 1.0);

    assert_eq!(cn.cluster_count(), 3);
    assert_eq!(cn.clusters()[0].members, vec![1, 3]);
    assert_eq!(cn.validate_index(), 0);
}

#[test]
fn test_invalid_utf8_in_header_line() {
    let file = cnl_bytes(b"# Clusters: 2 \xfe\n1 2\n3 4\n");
    let cn = Collection::load(file.path(), 1.0);

    assert_eq!(cn.cluster_count(), 2);
}

#[test]
fn test_unreadable_input_yields_empty_collection() {
    // Opening a directory succeeds, reading it fails
    let dir = TempDir::new().unwrap();

    assert!(Collection::try_load(dir.path(), 1.0).is_err());
    assert!(Collection::load(dir.path(), 1.0).is_empty());
}
