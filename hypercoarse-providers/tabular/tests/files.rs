//! File round trips through the tabular provider.
#![expect(clippy::expect_used, reason = "tests require contextual panics")]

use std::{fs, io::Write};

use hypercoarse_core::{
    CapacityAllocation, CliqueProjector, Hyperedge, HyperedgeIndex, Hypergraph, NodeId,
    ProjectionConfig,
};
use hypercoarse_providers_tabular::{
    EdgeTableOptions, EdgeTableReader, TabularError, write_pairwise_edges_path,
};
use rstest::rstest;
use tempfile::{NamedTempFile, TempDir};

#[rstest]
fn reads_snapshot_style_table_from_disk() {
    let mut file = NamedTempFile::new().expect("create temp file");
    writeln!(
        file,
        "snapshot_id,node1,node2,capacity,disabled\n\
         0,a,b,100,False\n\
         0,b,c,50,False\n\
         0,c,a,25,True"
    )
    .expect("write fixture");

    let table = EdgeTableReader::new(EdgeTableOptions::default())
        .read_path(file.path())
        .expect("table loads");
    let graph = table.graph();
    assert_eq!(graph.node_count(), 3);
    assert_eq!(graph.edge_count(), 2);
    assert_eq!(
        graph.capacity(&NodeId::from("a"), &NodeId::from("b")),
        Some(100.0)
    );
    assert!(!graph.contains_edge(&NodeId::from("a"), &NodeId::from("c")));
}

#[rstest]
fn missing_file_is_an_io_error() {
    let dir = TempDir::new().expect("create temp dir");
    let err = EdgeTableReader::default()
        .read_path(dir.path().join("absent.csv"))
        .expect_err("file is missing");
    assert!(matches!(err, TabularError::Io(_)));
}

#[rstest]
fn projected_edges_are_written_with_header() {
    let hypergraph: Hypergraph = Hyperedge::from_members([1, 2].map(NodeId::from))
        .into_iter()
        .collect();
    let allocation: CapacityAllocation = [(NodeId::from(1), HyperedgeIndex::new(0), 42.5)]
        .into_iter()
        .collect();
    let edges = CliqueProjector::new(ProjectionConfig::default())
        .project(&hypergraph, &allocation)
        .expect("small hyperedge");

    let dir = TempDir::new().expect("create temp dir");
    let path = dir.path().join("edges.csv");
    write_pairwise_edges_path(&path, &edges).expect("write succeeds");
    let text = fs::read_to_string(&path).expect("read back");
    assert_eq!(
        text,
        "src,trg,capacity,base_fee,fee_rate,enabled\n\
         1,2,42.5,100,1,true\n\
         2,1,1,100,1,true\n"
    );

    // The export is itself a readable edge table.
    let table = EdgeTableReader::default()
        .read_path(&path)
        .expect("export reads back");
    assert_eq!(
        table.graph().capacity(&NodeId::from(1), &NodeId::from(2)),
        Some(43.5)
    );
}
