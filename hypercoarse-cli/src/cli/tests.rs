//! Unit tests for the CLI commands and output helpers.

use super::commands::{run_coarsen, run_project, with_suffix};
use super::{
    CapacityArg, Cli, CliError, CoarsenArgs, Command, ExecutionSummary, FhsCommand,
    InconclusiveArg, ProjectCommand, render_summary, run_cli,
};

use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use hypercoarse_core::{CoarsenError, HyperedgeIndex, NodeId, StrategyConfig};
use hypercoarse_providers_hyperjson::HyperJsonDocument;
use hypercoarse_providers_tabular::TabularError;
use rstest::rstest;
use tempfile::TempDir;

type TestResult = Result<(), Box<dyn std::error::Error>>;

const LADDER: &str = "src,trg,capacity\n\
    1,2,100\n1,3,100\n1,4,100\n2,5,100\n3,6,100\n4,7,100\n\
    5,6,100\n6,7,100\n7,8,100\n8,9,100\n9,10,100\n";

fn temp_dir() -> TempDir {
    match TempDir::new() {
        Ok(dir) => dir,
        Err(err) => panic!("failed to create temp dir: {err}"),
    }
}

fn write_file(dir: &TempDir, name: &str, contents: &str) -> std::io::Result<PathBuf> {
    let path = dir.path().join(name);
    fs::write(&path, contents)?;
    Ok(path)
}

fn coarsen_args(edges: PathBuf, out_prefix: PathBuf) -> CoarsenArgs {
    CoarsenArgs {
        edges,
        out_prefix,
        include_disabled: false,
        capacity: None,
        to_clique: false,
        max_clique_size: 500,
        fee_profile: false,
    }
}

fn expect_error(result: Result<ExecutionSummary, CliError>, panic_msg: &str) -> CliError {
    match result {
        Ok(_) => panic!("{panic_msg}"),
        Err(err) => err,
    }
}

#[rstest]
#[case("/tmp/run", "_hyper.json", "/tmp/run_hyper.json")]
#[case("out/fhs_3", "_edges.csv", "out/fhs_3_edges.csv")]
#[case("", "_big_hyper.json", "_big_hyper.json")]
fn with_suffix_appends_to_the_final_component(
    #[case] prefix: &str,
    #[case] suffix: &str,
    #[case] expected: &str,
) {
    assert_eq!(with_suffix(Path::new(prefix), suffix), PathBuf::from(expected));
}

#[rstest]
fn fhs_writes_envelope_and_clique_table() -> TestResult {
    let dir = temp_dir();
    let edges = write_file(&dir, "edges.csv", LADDER)?;
    let prefix = dir.path().join("fhs_3");
    let cli = Cli {
        command: Command::Fhs(FhsCommand {
            max_hyperedge_size: 3,
            common: CoarsenArgs {
                to_clique: true,
                ..coarsen_args(edges, prefix.clone())
            },
        }),
    };
    let summary = run_cli(cli)?;
    assert_eq!(summary.command, "fhs");
    assert_eq!(summary.graph, Some((10, 11)));
    assert_eq!(summary.projected_edges, Some(30));
    assert_eq!(
        summary.outputs,
        vec![
            with_suffix(&prefix, "_hyper.json"),
            with_suffix(&prefix, "_edges.csv")
        ]
    );

    let document = HyperJsonDocument::from_path(with_suffix(&prefix, "_hyper.json"))?;
    assert_eq!(document.hypergraph().len(), 7);
    assert_eq!(
        document
            .allocation()
            .get(&NodeId::from(1), HyperedgeIndex::new(4)),
        Some(150.0)
    );
    let table = fs::read_to_string(with_suffix(&prefix, "_edges.csv"))?;
    assert!(table.starts_with("src,trg,capacity,base_fee,fee_rate,enabled\n1,2,150,100,1,true\n"));
    Ok(())
}

#[rstest]
fn required_capacity_fails_without_capacity_column() -> TestResult {
    let dir = temp_dir();
    let edges = write_file(&dir, "edges.csv", "src,trg\n1,2\n2,3\n")?;
    let args = CoarsenArgs {
        capacity: Some(CapacityArg::Required),
        ..coarsen_args(edges, dir.path().join("nch"))
    };
    let err = expect_error(
        run_coarsen(StrategyConfig::default(), &args),
        "required capacities must be present",
    );
    assert!(matches!(
        err,
        CliError::Core(CoarsenError::MissingCapacityAttribute)
    ));
    assert_eq!(err.core_code(), Some("COARSEN_MISSING_CAPACITY_ATTRIBUTE"));
    Ok(())
}

#[rstest]
fn rollup_keeps_unit_allocation_by_default() -> TestResult {
    let dir = temp_dir();
    let edges = write_file(&dir, "edges.csv", "src,trg,capacity\n1,2,40\n2,3,40\n")?;
    let prefix = dir.path().join("rollup");
    run_coarsen(StrategyConfig::Rollup, &coarsen_args(edges, prefix.clone()))?;
    let document = HyperJsonDocument::from_path(with_suffix(&prefix, "_hyper.json"))?;
    assert_eq!(
        document
            .allocation()
            .get(&NodeId::from(2), HyperedgeIndex::new(0)),
        Some(1.0)
    );
    Ok(())
}

#[rstest]
fn oversized_clique_projection_is_refused() -> TestResult {
    let dir = temp_dir();
    let edges = write_file(&dir, "edges.csv", "src,trg\n1,2\n2,3\n3,4\n")?;
    let prefix = dir.path().join("rollup");
    let args = CoarsenArgs {
        to_clique: true,
        max_clique_size: 3,
        ..coarsen_args(edges, prefix.clone())
    };
    let err = expect_error(
        run_coarsen(StrategyConfig::Rollup, &args),
        "four members exceed the threshold",
    );
    assert!(matches!(
        err,
        CliError::Core(CoarsenError::HyperedgeTooLarge {
            index: 0,
            size: 4,
            threshold: 3
        })
    ));
    assert!(!with_suffix(&prefix, "_edges.csv").exists());
    Ok(())
}

#[rstest]
fn fee_profile_sets_base_fee_for_both_endpoints() -> TestResult {
    let dir = temp_dir();
    let edges = write_file(
        &dir,
        "edges.csv",
        "src,trg,capacity,fee_base_msat\n1,2,10,500\n1,3,10,300\n",
    )?;
    let prefix = dir.path().join("rollup");
    let args = CoarsenArgs {
        to_clique: true,
        fee_profile: true,
        ..coarsen_args(edges, prefix.clone())
    };
    run_coarsen(StrategyConfig::Rollup, &args)?;
    let table = fs::read_to_string(with_suffix(&prefix, "_edges.csv"))?;
    assert_eq!(
        table,
        "src,trg,capacity,base_fee,fee_rate,enabled\n\
         1,2,1,400,1,true\n1,3,1,400,1,true\n\
         2,1,1,500,1,true\n2,3,1,500,1,true\n\
         3,1,1,300,1,true\n3,2,1,300,1,true\n"
    );
    Ok(())
}

#[rstest]
fn malformed_tables_surface_provider_errors() -> TestResult {
    let dir = temp_dir();
    let edges = write_file(&dir, "edges.csv", "src,trg\n4,4\n")?;
    let err = expect_error(
        run_coarsen(
            StrategyConfig::default(),
            &coarsen_args(edges, dir.path().join("x")),
        ),
        "self-loops must fail",
    );
    assert!(matches!(
        err,
        CliError::Tabular(TabularError::SelfLoop { line: 2, .. })
    ));
    assert_eq!(err.core_code(), None);
    Ok(())
}

#[rstest]
#[case::whole(false, 2 + 12, 1)]
#[case::split(true, 2, 2)]
fn project_converts_envelopes(
    #[case] split: bool,
    #[case] expected_edges: usize,
    #[case] expected_outputs: usize,
) -> TestResult {
    let dir = temp_dir();
    let hyperjson = write_file(
        &dir,
        "in_hyper.json",
        r#"{"hyperedges": [[1, 2], [1, 2, 3, 4]], "node_caps": {"1|0": 5.0, "4|1": 2.0}}"#,
    )?;
    let prefix = dir.path().join("out");
    let summary = run_project(&ProjectCommand {
        hyperjson,
        out_prefix: prefix.clone(),
        max_clique_size: if split { 2 } else { 500 },
        split,
    })?;
    assert_eq!(summary.projected_edges, Some(expected_edges));
    assert_eq!(summary.outputs.len(), expected_outputs);

    if split {
        let residual = HyperJsonDocument::from_path(with_suffix(&prefix, "_big_hyper.json"))?;
        assert_eq!(residual.hypergraph().len(), 1);
        assert_eq!(
            residual
                .allocation()
                .get(&NodeId::from(4), HyperedgeIndex::new(0)),
            Some(2.0)
        );
    }
    Ok(())
}

#[rstest]
fn render_summary_lists_stats_advisories_and_outputs() -> TestResult {
    let dir = temp_dir();
    let edges = write_file(&dir, "edges.csv", LADDER)?;
    let args = CoarsenArgs {
        capacity: Some(CapacityArg::Strategy),
        ..coarsen_args(edges, dir.path().join("nch"))
    };
    let summary = run_coarsen(
        StrategyConfig::VertexCover(hypercoarse_core::VertexCoverConfig {
            max_cover_size: std::num::NonZeroUsize::new(1),
        }),
        &args,
    )?;
    let mut buffer = Vec::new();
    render_summary(&summary, &mut buffer)?;
    let text = String::from_utf8(buffer)?;
    assert!(text.starts_with("command: nch\ngraph: nodes=10 edges=11\nhyperedges: count=1 "));
    assert!(text.contains("advisory: "));
    assert!(text.contains("wrote: "));
    assert!(!text.contains("projected edges"));
    Ok(())
}

#[rstest]
fn clap_parses_supernode_options() {
    let cli = Cli::try_parse_from([
        "hypercoarse",
        "supernode",
        "--edges",
        "edges.csv",
        "--out-prefix",
        "runs/supernode",
        "--inconclusive",
        "drop",
        "--max-states",
        "10",
    ])
    .expect("arguments must parse");
    match cli.command {
        Command::Supernode(command) => {
            assert_eq!(command.inconclusive, InconclusiveArg::Drop);
            assert_eq!(command.max_states, 10);
            assert_eq!(command.max_search_depth, 4);
            assert_eq!(command.common.max_clique_size, 500);
            assert_eq!(command.common.capacity, None);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[rstest]
#[case::unknown_policy(&["hypercoarse", "supernode", "--edges", "e", "--out-prefix", "o", "--inconclusive", "maybe"])]
#[case::zero_cover(&["hypercoarse", "nch", "--edges", "e", "--out-prefix", "o", "--max-cover-size", "0"])]
#[case::missing_edges(&["hypercoarse", "rollup", "--out-prefix", "o"])]
fn clap_rejects_invalid_arguments(#[case] args: &[&str]) {
    assert!(Cli::try_parse_from(args).is_err());
}
