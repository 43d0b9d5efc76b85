//! Command implementations and argument parsing for the cospectra CLI.

use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};
use cospectra_core::{
    ExecutionStrategy, Graph, LabelerKind, LabelerPreference, SearchBuilder, SearchError,
    SearchReport, Spectrum, SpectrumComputer, are_isomorphic, select_labeler,
};
use thiserror::Error;
use tracing::{Span, field, info, instrument, warn};

use super::input::{InputError, parse_graph};

const STDIN_ORIGIN: &str = "<stdin>";

/// Top-level CLI options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(
    name = "cospectra",
    about = "Search for cospectral, non-isomorphic simple graphs."
)]
pub struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported CLI commands.
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Enumerate every graph with the given size and report cospectral sets.
    Search(SearchArgs),
    /// Print the rounded adjacency spectrum of one graph.
    Spectrum(SpectrumArgs),
    /// Decide whether two graphs are isomorphic.
    Isomorphic(IsomorphicArgs),
}

/// Options accepted by the `search` command.
#[derive(Debug, Args, Clone)]
pub struct SearchArgs {
    /// Number of vertices.
    #[arg(long)]
    pub vertices: usize,

    /// Number of edges. Impossible counts produce a rejected report.
    #[arg(long, allow_negative_numbers = true)]
    pub edges: i64,

    /// Canonical labeling backend.
    #[arg(long, value_enum, default_value_t = LabelerArg::Auto)]
    pub labeler: LabelerArg,

    /// Candidate evaluation strategy.
    #[arg(long, value_enum, default_value_t = StrategyArg::Auto)]
    pub strategy: StrategyArg,

    /// Stop after this many seconds and report partial results.
    #[arg(long = "timeout-secs")]
    pub timeout_secs: Option<u64>,

    /// Stop after this many candidates and report partial results.
    #[arg(long = "max-candidates")]
    pub max_candidates: Option<u64>,

    /// Candidates evaluated between progress reports.
    #[arg(long = "chunk-size")]
    pub chunk_size: Option<usize>,

    /// Output format for the report.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Options accepted by the `spectrum` command.
#[derive(Debug, Args, Clone)]
pub struct SpectrumArgs {
    /// Edge-list file; reads stdin when absent or `-`.
    pub path: Option<PathBuf>,

    /// Vertex count for inputs without a count line.
    #[arg(long)]
    pub vertices: Option<usize>,
}

/// Options accepted by the `isomorphic` command.
#[derive(Debug, Args, Clone)]
pub struct IsomorphicArgs {
    /// First edge-list file.
    pub left: PathBuf,

    /// Second edge-list file.
    pub right: PathBuf,
}

/// Canonical labeling backends selectable on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LabelerArg {
    /// Certified when compiled in, heuristic otherwise.
    Auto,
    /// Exact canonical form.
    Certified,
    /// Colour-refinement hash.
    Heuristic,
}

impl From<LabelerArg> for LabelerPreference {
    fn from(value: LabelerArg) -> Self {
        match value {
            LabelerArg::Auto => Self::Auto,
            LabelerArg::Certified => Self::Certified,
            LabelerArg::Heuristic => Self::Heuristic,
        }
    }
}

/// Execution strategies selectable on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StrategyArg {
    /// Parallel when compiled in, sequential otherwise.
    Auto,
    /// Single thread.
    Sequential,
    /// Thread pool.
    Parallel,
}

impl From<StrategyArg> for ExecutionStrategy {
    fn from(value: StrategyArg) -> Self {
        match value {
            StrategyArg::Auto => Self::Auto,
            StrategyArg::Sequential => Self::Sequential,
            StrategyArg::Parallel => Self::Parallel,
        }
    }
}

/// Report output formats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// A single JSON document.
    Json,
}

/// Errors surfaced while executing CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// An input file could not be opened.
    #[error("failed to open `{path}`: {source}")]
    Io {
        /// Path that triggered the failure.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// An input graph could not be parsed.
    #[error(transparent)]
    Input(#[from] InputError),
    /// The search could not be configured.
    #[error(transparent)]
    Core(#[from] SearchError),
}

impl CliError {
    /// Returns the stable machine code of the underlying library error, if
    /// there is one.
    #[must_use]
    pub fn code(&self) -> Option<&'static str> {
        match self {
            Self::Core(err) => Some(err.code().as_str()),
            Self::Input(InputError::InvalidGraph { source, .. }) => Some(source.code().as_str()),
            Self::Io { .. } | Self::Input(_) => None,
        }
    }
}

/// The spectrum of one input graph.
#[derive(Debug, Clone, PartialEq)]
pub struct SpectrumSummary {
    /// Graph as read from the input.
    pub graph: Graph,
    /// Rounded eigenvalues.
    pub spectrum: Spectrum,
    /// Whether the eigenvalue iteration reached tolerance.
    pub converged: bool,
}

/// Comparison of two input graphs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IsomorphismSummary {
    /// Result of the exact isomorphism test.
    pub isomorphic: bool,
    /// Whether the rounded spectra match.
    pub cospectral: bool,
    /// Backend that produced the canonical keys.
    pub labeler: LabelerKind,
    /// Whether the canonical keys match.
    pub keys_equal: bool,
}

/// Result of a CLI command, ready to render.
#[derive(Debug, Clone)]
pub enum CommandOutcome {
    /// A finished search and the requested output format.
    Search {
        /// Search report.
        report: SearchReport,
        /// Requested output format.
        format: OutputFormat,
    },
    /// Spectrum of one graph.
    Spectrum(SpectrumSummary),
    /// Comparison of two graphs.
    Isomorphic(IsomorphismSummary),
}

/// Executes the CLI command represented by `cli`.
///
/// # Errors
/// Returns [`CliError`] when an input cannot be read or the search cannot
/// be configured. Rejected search parameters are not errors; they appear in
/// the report's status.
///
/// # Examples
/// ```
/// use clap::Parser;
/// use cospectra_cli::cli::{Cli, CommandOutcome, run_cli};
///
/// let cli = Cli::parse_from(["cospectra", "search", "--vertices", "5", "--edges", "4"]);
/// let CommandOutcome::Search { report, .. } = run_cli(cli)? else {
///     unreachable!("search commands produce search outcomes");
/// };
/// assert_eq!(report.sets().len(), 1);
/// # Ok::<(), cospectra_cli::cli::CliError>(())
/// ```
#[instrument(name = "cli.run", err, skip(cli), fields(command = field::Empty))]
pub fn run_cli(cli: Cli) -> Result<CommandOutcome, CliError> {
    let span = Span::current();
    match cli.command {
        Command::Search(args) => {
            span.record("command", "search");
            let format = args.format;
            run_search(&args).map(|report| CommandOutcome::Search { report, format })
        }
        Command::Spectrum(args) => {
            span.record("command", "spectrum");
            run_spectrum(&args).map(CommandOutcome::Spectrum)
        }
        Command::Isomorphic(args) => {
            span.record("command", "isomorphic");
            run_isomorphic(&args).map(CommandOutcome::Isomorphic)
        }
    }
}

#[instrument(
    name = "cli.search",
    err,
    skip(args),
    fields(
        vertices = args.vertices,
        edges = args.edges,
        labeler = ?args.labeler,
        strategy = ?args.strategy,
    ),
)]
pub(super) fn run_search(args: &SearchArgs) -> Result<SearchReport, CliError> {
    let search = search_builder(args).build()?;
    let report = search.run(args.vertices, args.edges);
    info!(
        status = report.status().as_str(),
        sets = report.sets().len(),
        "search command completed"
    );
    Ok(report)
}

pub(super) fn search_builder(args: &SearchArgs) -> SearchBuilder {
    let mut builder = SearchBuilder::new()
        .with_labeler(args.labeler.into())
        .with_execution_strategy(args.strategy.into());
    if let Some(size) = args.chunk_size {
        builder = builder.with_chunk_size(size);
    }
    if let Some(limit) = args.max_candidates {
        builder = builder.with_candidate_limit(limit);
    }
    if let Some(seconds) = args.timeout_secs {
        builder = builder.with_timeout(Duration::from_secs(seconds));
    }
    builder
}

#[instrument(name = "cli.spectrum", err, skip(args), fields(origin = field::Empty))]
pub(super) fn run_spectrum(args: &SpectrumArgs) -> Result<SpectrumSummary, CliError> {
    let graph = match args.path.as_deref().filter(|path| *path != Path::new("-")) {
        Some(path) => {
            Span::current().record("origin", field::display(path.display()));
            read_graph_file(path, args.vertices)?
        }
        None => {
            Span::current().record("origin", STDIN_ORIGIN);
            parse_graph(io::stdin().lock(), STDIN_ORIGIN, args.vertices)?
        }
    };
    let (spectrum, convergence) = SpectrumComputer::default().compute_checked(&graph);
    let converged = convergence.is_converged();
    if !converged {
        warn!(
            code = "NUMERICAL_INSTABILITY",
            "eigensolver hit its iteration cap"
        );
    }
    Ok(SpectrumSummary {
        graph,
        spectrum,
        converged,
    })
}

#[instrument(name = "cli.isomorphic", err, skip(args))]
pub(super) fn run_isomorphic(args: &IsomorphicArgs) -> Result<IsomorphismSummary, CliError> {
    let left = read_graph_file(&args.left, None)?;
    let right = read_graph_file(&args.right, None)?;
    let (labeler, fallback) = select_labeler(LabelerPreference::Auto);
    if let Some(warning) = fallback {
        warn!(code = warning.code().as_str(), "{warning}");
    }
    let computer = SpectrumComputer::default();
    let summary = IsomorphismSummary {
        isomorphic: are_isomorphic(&left, &right),
        cospectral: computer.compute(&left) == computer.compute(&right),
        labeler: labeler.kind(),
        keys_equal: labeler.key(&left) == labeler.key(&right),
    };
    info!(
        isomorphic = summary.isomorphic,
        keys_equal = summary.keys_equal,
        "isomorphism command completed"
    );
    Ok(summary)
}

#[instrument(name = "cli.read_graph", err, fields(path = %path.display()))]
pub(super) fn read_graph_file(path: &Path, vertices: Option<usize>) -> Result<Graph, CliError> {
    let file = File::open(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let origin = path.display().to_string();
    Ok(parse_graph(BufReader::new(file), &origin, vertices)?)
}
