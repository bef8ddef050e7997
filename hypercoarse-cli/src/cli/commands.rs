//! Command definitions and execution for the hypercoarse CLI.

use std::ffi::OsString;
use std::io::{self, Write};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use hypercoarse_core::{
    CapacityPolicy, CliqueProjector, CoarsenError, CoarsenerBuilder, DEFAULT_MAX_CLIQUE_SIZE,
    FeeSchedule, FixedSizeConfig, HypergraphStats, InconclusivePolicy, ProjectionConfig,
    StrategyConfig, SupernodeConfig, VertexCoverConfig,
};
use hypercoarse_providers_hyperjson::{HyperJsonDocument, HyperJsonError};
use hypercoarse_providers_tabular::{
    EdgeTableOptions, EdgeTableReader, TabularError, write_pairwise_edges_path,
};
use thiserror::Error;
use tracing::info;

const DEFAULT_MAX_HYPEREDGE_SIZE: usize = 5;
const DEFAULT_MAX_SEARCH_DEPTH: usize = 4;
const DEFAULT_MAX_STATES: usize = 5_000;

/// Top-level CLI options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(
    name = "hypercoarse",
    about = "Coarsen pairwise networks into hypergraphs."
)]
pub struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported CLI commands.
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Greedy vertex-cover hubs; each hub's neighbourhood becomes a hyperedge.
    Nch(NchCommand),
    /// Fixed-size BFS clusters that consume their internal edges.
    Fhs(FhsCommand),
    /// Supernodes whose neighbourhoods are not otherwise reachable.
    Supernode(SupernodeCommand),
    /// One hyperedge holding every node.
    Rollup(CoarsenArgs),
    /// Project an existing hyperjson envelope onto pairwise edges.
    Project(ProjectCommand),
}

/// Capacity allocation applied after a strategy has run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CapacityArg {
    /// Split original edge capacities; fail when the table has none.
    Required,
    /// Split original edge capacities, or uniform shares without any.
    Uniform,
    /// Keep the allocation produced by the strategy.
    Strategy,
}

impl CapacityArg {
    const fn policy(self) -> Option<CapacityPolicy> {
        match self {
            Self::Required => Some(CapacityPolicy::Required),
            Self::Uniform => Some(CapacityPolicy::UniformFallback),
            Self::Strategy => None,
        }
    }
}

/// Handling of supernode searches that exhaust their budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum InconclusiveArg {
    /// Treat an inconclusive search as "no path" and keep the supernode.
    Keep,
    /// Treat an inconclusive search as "path found" and drop the supernode.
    Drop,
}

/// Arguments shared by every coarsening command.
#[derive(Debug, Args, Clone)]
pub struct CoarsenArgs {
    /// Delimited edge table with a header row.
    #[arg(long)]
    pub edges: PathBuf,

    /// Prefix for output files (`<prefix>_hyper.json`, `<prefix>_edges.csv`).
    #[arg(long = "out-prefix")]
    pub out_prefix: PathBuf,

    /// Keep rows whose `disabled` column is set.
    #[arg(long = "include-disabled")]
    pub include_disabled: bool,

    /// Capacity allocation; defaults to `uniform`, or `strategy` for rollup.
    #[arg(long = "capacity", value_enum)]
    pub capacity: Option<CapacityArg>,

    /// Also write the clique projection as `<prefix>_edges.csv`.
    #[arg(long = "to-clique")]
    pub to_clique: bool,

    /// Refuse to project hyperedges with more members than this.
    #[arg(long = "max-clique-size", default_value_t = DEFAULT_MAX_CLIQUE_SIZE)]
    pub max_clique_size: usize,

    /// Use the table's per-node mean base fee on projected edges.
    #[arg(long = "fee-profile")]
    pub fee_profile: bool,
}

/// Options accepted by the `nch` command.
#[derive(Debug, Args, Clone)]
pub struct NchCommand {
    /// Stop after selecting this many cover nodes.
    #[arg(long = "max-cover-size")]
    pub max_cover_size: Option<NonZeroUsize>,

    /// Shared coarsening arguments.
    #[command(flatten)]
    pub common: CoarsenArgs,
}

/// Options accepted by the `fhs` command.
#[derive(Debug, Args, Clone)]
pub struct FhsCommand {
    /// Maximum number of members per hyperedge.
    #[arg(long = "max-hyperedge-size", default_value_t = DEFAULT_MAX_HYPEREDGE_SIZE)]
    pub max_hyperedge_size: usize,

    /// Shared coarsening arguments.
    #[command(flatten)]
    pub common: CoarsenArgs,
}

/// Options accepted by the `supernode` command.
#[derive(Debug, Args, Clone)]
pub struct SupernodeCommand {
    /// Longest monotone path explored, in edges.
    #[arg(long = "max-search-depth", default_value_t = DEFAULT_MAX_SEARCH_DEPTH)]
    pub max_search_depth: usize,

    /// Search states explored per neighbour pair.
    #[arg(long = "max-states", default_value_t = DEFAULT_MAX_STATES)]
    pub max_states: usize,

    /// Outcome of searches that exhaust their budget.
    #[arg(long, value_enum, default_value_t = InconclusiveArg::Keep)]
    pub inconclusive: InconclusiveArg,

    /// Shared coarsening arguments.
    #[command(flatten)]
    pub common: CoarsenArgs,
}

/// Options accepted by the `project` command.
#[derive(Debug, Args, Clone)]
pub struct ProjectCommand {
    /// Hyperjson envelope to project.
    #[arg(long)]
    pub hyperjson: PathBuf,

    /// Prefix for output files.
    #[arg(long = "out-prefix")]
    pub out_prefix: PathBuf,

    /// Refuse to project hyperedges with more members than this.
    #[arg(long = "max-clique-size", default_value_t = DEFAULT_MAX_CLIQUE_SIZE)]
    pub max_clique_size: usize,

    /// Project small hyperedges only, writing `<prefix>_small_edges.csv` and
    /// keeping large ones in `<prefix>_big_hyper.json`.
    #[arg(long)]
    pub split: bool,
}

/// Errors surfaced while executing CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Edge table ingestion or export failed.
    #[error(transparent)]
    Tabular(#[from] TabularError),
    /// Hyperjson reading or writing failed.
    #[error(transparent)]
    HyperJson(#[from] HyperJsonError),
    /// Coarsening or projection failed.
    #[error(transparent)]
    Core(#[from] CoarsenError),
}

impl CliError {
    /// Stable code of the underlying core error, if any.
    #[must_use]
    pub fn core_code(&self) -> Option<&'static str> {
        match self {
            Self::Core(err) | Self::Tabular(TabularError::Graph(err)) => Some(err.code().as_str()),
            _ => None,
        }
    }
}

/// Summarises the outcome of executing a CLI command.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionSummary {
    /// Strategy name, or `project`.
    pub command: &'static str,
    /// Nodes and edges of the input graph, when one was read.
    pub graph: Option<(usize, usize)>,
    /// Hyperedge size statistics; `None` for an empty hypergraph.
    pub stats: Option<HypergraphStats>,
    /// Messages of non-fatal advisories raised during the run.
    pub advisories: Vec<String>,
    /// Number of pairwise edges written, if a projection ran.
    pub projected_edges: Option<usize>,
    /// Files written, in order.
    pub outputs: Vec<PathBuf>,
}

/// Executes the CLI command represented by `cli`.
///
/// # Errors
/// Returns [`CliError`] when reading, coarsening, projecting, or writing
/// fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use hypercoarse_cli::cli::{Cli, CoarsenArgs, Command, run_cli};
/// # use tempfile::TempDir;
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let dir = TempDir::new()?;
/// let edges = dir.path().join("edges.csv");
/// std::fs::write(&edges, "src,trg,capacity\n1,2,10\n2,3,10\n")?;
/// let cli = Cli {
///     command: Command::Rollup(CoarsenArgs {
///         edges,
///         out_prefix: dir.path().join("rollup"),
///         include_disabled: false,
///         capacity: None,
///         to_clique: true,
///         max_clique_size: 500,
///         fee_profile: false,
///     }),
/// };
/// let summary = run_cli(cli)?;
/// assert_eq!(summary.projected_edges, Some(6));
/// assert!(dir.path().join("rollup_hyper.json").exists());
/// # Ok(())
/// # }
/// ```
pub fn run_cli(cli: Cli) -> Result<ExecutionSummary, CliError> {
    match cli.command {
        Command::Nch(command) => run_coarsen(
            StrategyConfig::VertexCover(VertexCoverConfig {
                max_cover_size: command.max_cover_size,
            }),
            &command.common,
        ),
        Command::Fhs(command) => run_coarsen(
            StrategyConfig::FixedSize(FixedSizeConfig {
                max_hyperedge_size: command.max_hyperedge_size,
                use_edge_capacity: true,
            }),
            &command.common,
        ),
        Command::Supernode(command) => run_coarsen(
            StrategyConfig::Supernode(SupernodeConfig {
                max_search_depth: command.max_search_depth,
                max_states: command.max_states,
                inconclusive: match command.inconclusive {
                    InconclusiveArg::Keep => InconclusivePolicy::KeepSupernode,
                    InconclusiveArg::Drop => InconclusivePolicy::DropSupernode,
                },
            }),
            &command.common,
        ),
        Command::Rollup(common) => run_coarsen(StrategyConfig::Rollup, &common),
        Command::Project(command) => run_project(&command),
    }
}

pub(super) fn run_coarsen(
    strategy: StrategyConfig,
    args: &CoarsenArgs,
) -> Result<ExecutionSummary, CliError> {
    let table = EdgeTableReader::new(EdgeTableOptions {
        include_disabled: args.include_disabled,
    })
    .read_path(&args.edges)?;
    let graph = table.graph();

    let capacity = args.capacity.unwrap_or(match strategy {
        StrategyConfig::Rollup => CapacityArg::Strategy,
        _ => CapacityArg::Uniform,
    });
    let builder = CoarsenerBuilder::new().with_strategy(strategy);
    let builder = match capacity.policy() {
        Some(policy) => builder.with_redistribution(policy),
        None => builder.without_redistribution(),
    };
    let coarsening = builder.build()?.run(graph)?;

    let mut outputs = Vec::new();
    let hyper_path = with_suffix(&args.out_prefix, "_hyper.json");
    let document = HyperJsonDocument::new(
        coarsening.hypergraph().clone(),
        coarsening.allocation().clone(),
    );
    document.to_path(&hyper_path)?;
    outputs.push(hyper_path);

    let mut projected_edges = None;
    if args.to_clique {
        let fees = if args.fee_profile {
            FeeSchedule::default().with_base_fee_overrides(table.base_fees().clone())
        } else {
            FeeSchedule::default()
        };
        let projector = CliqueProjector::new(ProjectionConfig {
            max_hyperedge_size: args.max_clique_size,
            fees,
        });
        let edges = projector.project(coarsening.hypergraph(), coarsening.allocation())?;
        let edges_path = with_suffix(&args.out_prefix, "_edges.csv");
        write_pairwise_edges_path(&edges_path, &edges)?;
        projected_edges = Some(edges.len());
        outputs.push(edges_path);
    }

    info!(
        strategy = coarsening.strategy(),
        outputs = outputs.len(),
        "coarsening written"
    );
    Ok(ExecutionSummary {
        command: coarsening.strategy(),
        graph: Some((graph.node_count(), graph.edge_count())),
        stats: coarsening.hypergraph().stats(),
        advisories: coarsening
            .advisories()
            .iter()
            .map(ToString::to_string)
            .collect(),
        projected_edges,
        outputs,
    })
}

pub(super) fn run_project(command: &ProjectCommand) -> Result<ExecutionSummary, CliError> {
    let document = HyperJsonDocument::from_path(&command.hyperjson)?;
    let projector = CliqueProjector::new(ProjectionConfig {
        max_hyperedge_size: command.max_clique_size,
        ..ProjectionConfig::default()
    });

    let mut outputs = Vec::new();
    let projected_edges = if command.split {
        let split = projector.split_by_threshold(document.hypergraph(), document.allocation());
        let edges_path = with_suffix(&command.out_prefix, "_small_edges.csv");
        write_pairwise_edges_path(&edges_path, &split.edges)?;
        outputs.push(edges_path);
        let residual_path = with_suffix(&command.out_prefix, "_big_hyper.json");
        HyperJsonDocument::new(split.residual, split.residual_allocation).to_path(&residual_path)?;
        outputs.push(residual_path);
        split.edges.len()
    } else {
        let edges = projector.project(document.hypergraph(), document.allocation())?;
        let edges_path = with_suffix(&command.out_prefix, "_edges.csv");
        write_pairwise_edges_path(&edges_path, &edges)?;
        outputs.push(edges_path);
        edges.len()
    };

    let mut advisories = Vec::new();
    if document.skipped_keys() > 0 {
        advisories.push(format!(
            "{} node_caps entries were skipped",
            document.skipped_keys()
        ));
    }
    Ok(ExecutionSummary {
        command: "project",
        graph: None,
        stats: document.hypergraph().stats(),
        advisories,
        projected_edges: Some(projected_edges),
        outputs,
    })
}

pub(super) fn with_suffix(prefix: &Path, suffix: &str) -> PathBuf {
    let mut raw = OsString::from(prefix.as_os_str());
    raw.push(suffix);
    PathBuf::from(raw)
}

/// Renders `summary` to `writer` in a human-readable text format.
///
/// # Errors
/// Returns [`io::Error`] if writing to the supplied writer fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use hypercoarse_cli::cli::{ExecutionSummary, render_summary};
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let summary = ExecutionSummary {
///     command: "rollup",
///     graph: Some((3, 2)),
///     stats: None,
///     advisories: Vec::new(),
///     projected_edges: None,
///     outputs: vec!["out_hyper.json".into()],
/// };
/// let mut buffer = Vec::new();
/// render_summary(&summary, &mut buffer)?;
/// let text = String::from_utf8(buffer)?;
/// assert!(text.contains("graph: nodes=3 edges=2"));
/// assert!(text.contains("hyperedges: none"));
/// # Ok(())
/// # }
/// ```
pub fn render_summary(summary: &ExecutionSummary, mut writer: impl Write) -> io::Result<()> {
    writeln!(writer, "command: {}", summary.command)?;
    if let Some((nodes, edges)) = summary.graph {
        writeln!(writer, "graph: nodes={nodes} edges={edges}")?;
    }
    match &summary.stats {
        Some(stats) => writeln!(writer, "hyperedges: {stats}")?,
        None => writeln!(writer, "hyperedges: none")?,
    }
    for advisory in &summary.advisories {
        writeln!(writer, "advisory: {advisory}")?;
    }
    if let Some(edges) = summary.projected_edges {
        writeln!(writer, "projected edges: {edges}")?;
    }
    for path in &summary.outputs {
        writeln!(writer, "wrote: {}", path.display())?;
    }
    Ok(())
}
