use super::{EdgeTableOptions, EdgeTableReader, TabularError};
use hypercoarse_core::{CoarsenError, NodeId};
use rstest::rstest;

fn read(data: &str, include_disabled: bool) -> Result<hypercoarse_core::Graph, TabularError> {
    EdgeTableReader::new(EdgeTableOptions { include_disabled })
        .read_from(data.as_bytes())
        .map(|table| table.into_graph())
}

fn id(value: i64) -> NodeId {
    NodeId::from(value)
}

#[rstest]
fn parallel_channels_sum_capacity() {
    let graph = read("src,trg,capacity\n1,2,10\n2,1,5\n1,2,2.5\n", false).expect("valid");
    assert_eq!(graph.edge_count(), 1);
    assert_eq!(graph.capacity(&id(1), &id(2)), Some(17.5));
}

#[rstest]
fn empty_capacity_cells_do_not_contribute() {
    let graph = read("src,trg,capacity\n1,2,\n2,3,4\n3,2,\n", false).expect("valid");
    assert_eq!(graph.capacity(&id(1), &id(2)), None);
    assert_eq!(graph.capacity(&id(2), &id(3)), Some(4.0));
}

#[rstest]
#[case::filtered(false, 1, 1)]
#[case::included(true, 2, 0)]
fn disabled_rows_follow_options(
    #[case] include_disabled: bool,
    #[case] edges: usize,
    #[case] skipped: usize,
) {
    let data = "src,trg,disabled\n1,2,False\n2,3,True\n";
    let table = EdgeTableReader::new(EdgeTableOptions { include_disabled })
        .read_from(data.as_bytes())
        .expect("valid");
    assert_eq!(table.rows(), 2);
    assert_eq!(table.graph().edge_count(), edges);
    assert_eq!(table.disabled_rows(), skipped);
}

#[rstest]
fn base_fee_profile_averages_per_endpoint() {
    let data = "src,trg,fee_base_msat\n1,2,1000\n1,3,3000\n2,1,\n4,5,\n";
    let table = EdgeTableReader::new(EdgeTableOptions::default())
        .read_from(data.as_bytes())
        .expect("valid");
    assert_eq!(table.base_fees().get(&id(1)), Some(&2000.0));
    assert_eq!(table.base_fees().get(&id(2)), Some(&1000.0));
    assert_eq!(table.base_fees().get(&id(3)), Some(&3000.0));
    assert_eq!(table.base_fees().get(&id(4)), None);
}

#[rstest]
fn target_only_nodes_receive_a_base_fee() {
    let data = "src,trg,capacity,fee_base_msat\n1,2,10,500\n";
    let table = EdgeTableReader::new(EdgeTableOptions::default())
        .read_from(data.as_bytes())
        .expect("valid");
    assert_eq!(table.base_fees().get(&id(2)), Some(&500.0));
}

#[rstest]
fn named_nodes_are_kept() {
    let graph = read("source,target\n02aa,03bb\n", false).expect("valid");
    assert!(graph.contains_edge(&NodeId::from("02aa"), &NodeId::from("03bb")));
}

#[rstest]
fn self_loops_report_their_line() {
    let err = read("src,trg\n1,2\n3,3\n", false).expect_err("self-loop");
    match err {
        TabularError::SelfLoop { line, node } => {
            assert_eq!(line, 3);
            assert_eq!(node, id(3));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[rstest]
fn non_numeric_capacity_is_rejected() {
    let err = read("src,trg,capacity\n1,2,lots\n", false).expect_err("bad number");
    assert!(matches!(
        err,
        TabularError::InvalidNumber { line: 2, ref column, ref value }
            if column == "capacity" && value == "lots"
    ));
}

#[rstest]
fn negative_capacity_is_rejected_by_the_graph() {
    let err = read("src,trg,capacity\n1,2,-5\n", false).expect_err("negative");
    assert!(matches!(err, TabularError::Graph(CoarsenError::InvalidEdge { .. })));
}

#[rstest]
fn empty_endpoint_is_rejected() {
    let err = read("src,trg\n1,\n", false).expect_err("missing endpoint");
    assert!(matches!(err, TabularError::EmptyEndpoint { line: 2, .. }));
}
