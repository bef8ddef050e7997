//! Tracing emitted while the CLI runs a full coarsening.
#![expect(clippy::expect_used, reason = "tests require contextual panics")]

use std::fs;

use hypercoarse_cli::cli::{Cli, CoarsenArgs, Command, NchCommand, run_cli};
use hypercoarse_test_support::tracing::RecordingLayer;
use rstest::rstest;
use tempfile::TempDir;
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;

#[rstest]
fn nch_run_emits_provider_and_core_spans() {
    let dir = TempDir::new().expect("create temp dir");
    let edges = dir.path().join("edges.csv");
    fs::write(
        &edges,
        "src,trg,capacity,disabled\n1,2,10,0\n1,3,10,0\n2,3,10,1\n3,4,10,0\n",
    )
    .expect("write fixture");
    let cli = Cli {
        command: Command::Nch(NchCommand {
            max_cover_size: None,
            common: CoarsenArgs {
                edges,
                out_prefix: dir.path().join("nch"),
                include_disabled: false,
                capacity: None,
                to_clique: true,
                max_clique_size: 500,
                fee_profile: false,
            },
        }),
    };

    let layer = RecordingLayer::default();
    let subscriber = tracing_subscriber::registry().with(layer.clone());
    let summary = tracing::subscriber::with_default(subscriber, || run_cli(cli))
        .expect("command succeeds");
    assert_eq!(summary.graph, Some((4, 3)));

    let read = layer.span("tabular.read").expect("reader span");
    assert_eq!(read.fields.get("include_disabled"), Some(&"false".to_owned()));
    let coarsen = layer.span("core.coarsen").expect("coarsen span");
    assert_eq!(coarsen.fields.get("strategy"), Some(&"nch".to_owned()));
    assert!(layer.span("core.project").is_some());
    assert!(layer.span("hyperjson.write").is_some());
    assert!(layer.logged(Level::INFO, "coarsening written"));
}
