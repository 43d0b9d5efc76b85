//! Text and JSON rendering of command outcomes.

use std::io::{self, Write};

use cospectra_core::{CospectralSet, SearchReport, SearchStatus};
use serde::Serialize;

use super::commands::{CommandOutcome, IsomorphismSummary, OutputFormat, SpectrumSummary};

/// Renders `outcome` to `writer`.
///
/// Search reports honour their requested [`OutputFormat`]; the other
/// commands always print text.
///
/// # Errors
/// Returns [`io::Error`] if writing to `writer` fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// use clap::Parser;
/// use cospectra_cli::cli::{Cli, render_outcome, run_cli};
///
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let cli = Cli::parse_from(["cospectra", "search", "--vertices", "4", "--edges", "6"]);
/// let mut buffer = Vec::new();
/// render_outcome(&run_cli(cli)?, &mut buffer)?;
/// let text = String::from_utf8(buffer)?;
/// assert!(text.contains("No cospectral, non-isomorphic graphs found."));
/// # Ok(())
/// # }
/// ```
pub fn render_outcome(outcome: &CommandOutcome, writer: impl Write) -> io::Result<()> {
    match outcome {
        CommandOutcome::Search {
            report,
            format: OutputFormat::Text,
        } => render_report_text(report, writer),
        CommandOutcome::Search {
            report,
            format: OutputFormat::Json,
        } => render_report_json(report, writer),
        CommandOutcome::Spectrum(summary) => render_spectrum(summary, writer),
        CommandOutcome::Isomorphic(summary) => render_isomorphism(summary, writer),
    }
}

fn render_report_text(report: &SearchReport, mut writer: impl Write) -> io::Result<()> {
    let metadata = report.metadata();
    writeln!(
        writer,
        "search: {} vertices, {} edges",
        report.vertices(),
        report.edges()
    )?;
    writeln!(
        writer,
        "labeler: {}, strategy: {}",
        metadata.labeler.as_str(),
        metadata.strategy.as_str()
    )?;
    writeln!(writer, "status: {}", report.status().as_str())?;

    match report.status() {
        SearchStatus::Rejected(error) => {
            writeln!(writer, "search rejected: {error}")?;
            return Ok(());
        }
        SearchStatus::Truncated {
            processed,
            total,
            reason,
        } => writeln!(
            writer,
            "search truncated after {processed} of {total} candidates ({reason}); results are incomplete"
        )?,
        SearchStatus::Complete => writeln!(
            writer,
            "candidates: {}",
            metadata.candidates_processed
        )?,
    }
    for warning in &metadata.warnings {
        writeln!(writer, "warning: {warning}")?;
    }

    if report.is_empty() {
        return writeln!(writer, "No cospectral, non-isomorphic graphs found.");
    }
    writeln!(writer, "Found {} set(s):", report.sets().len())?;
    for (index, set) in report.sets().iter().enumerate() {
        render_set(index + 1, set, &mut writer)?;
    }
    Ok(())
}

fn render_set(number: usize, set: &CospectralSet, mut writer: impl Write) -> io::Result<()> {
    writeln!(writer, "set {number}: spectrum {}", set.spectrum())?;
    for (index, graph) in set.graphs().iter().enumerate() {
        writeln!(writer, "  graph {}: {graph}", index + 1)?;
    }
    Ok(())
}

fn render_report_json(report: &SearchReport, mut writer: impl Write) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut writer, &JsonReport::from(report))?;
    writeln!(writer)
}

fn render_spectrum(summary: &SpectrumSummary, mut writer: impl Write) -> io::Result<()> {
    writeln!(
        writer,
        "graph: {} vertices, {} edges",
        summary.graph.vertex_count(),
        summary.graph.edge_count()
    )?;
    writeln!(writer, "spectrum: {}", summary.spectrum)?;
    if !summary.converged {
        writeln!(
            writer,
            "warning: eigensolver hit its iteration cap; values may be imprecise"
        )?;
    }
    Ok(())
}

fn render_isomorphism(summary: &IsomorphismSummary, mut writer: impl Write) -> io::Result<()> {
    writeln!(writer, "isomorphic: {}", yes_no(summary.isomorphic))?;
    writeln!(writer, "cospectral: {}", yes_no(summary.cospectral))?;
    writeln!(
        writer,
        "canonical keys ({}): {}",
        summary.labeler.as_str(),
        if summary.keys_equal { "equal" } else { "different" }
    )
}

const fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    vertices: usize,
    edges: i64,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    truncation: Option<JsonTruncation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    rejection: Option<JsonIssue>,
    labeler: &'static str,
    strategy: &'static str,
    candidates_total: u64,
    candidates_processed: u64,
    isomorphism_checks: u64,
    elapsed_seconds: f64,
    warnings: Vec<JsonIssue>,
    sets: Vec<JsonSet<'a>>,
}

#[derive(Serialize)]
struct JsonTruncation {
    reason: &'static str,
    processed: u64,
    total: u64,
}

#[derive(Serialize)]
struct JsonIssue {
    code: &'static str,
    message: String,
}

#[derive(Serialize)]
struct JsonSet<'a> {
    spectrum: Vec<f64>,
    graphs: Vec<&'a [(usize, usize)]>,
}

impl<'a> From<&'a SearchReport> for JsonReport<'a> {
    fn from(report: &'a SearchReport) -> Self {
        let metadata = report.metadata();
        let (truncation, rejection) = match report.status() {
            SearchStatus::Complete => (None, None),
            SearchStatus::Truncated {
                processed,
                total,
                reason,
            } => (
                Some(JsonTruncation {
                    reason: reason.as_str(),
                    processed: *processed,
                    total: *total,
                }),
                None,
            ),
            SearchStatus::Rejected(error) => (
                None,
                Some(JsonIssue {
                    code: error.code().as_str(),
                    message: error.to_string(),
                }),
            ),
        };
        Self {
            vertices: report.vertices(),
            edges: report.edges(),
            status: report.status().as_str(),
            truncation,
            rejection,
            labeler: metadata.labeler.as_str(),
            strategy: metadata.strategy.as_str(),
            candidates_total: metadata.candidates_total,
            candidates_processed: metadata.candidates_processed,
            isomorphism_checks: metadata.isomorphism_checks,
            elapsed_seconds: metadata.elapsed.as_secs_f64(),
            warnings: metadata
                .warnings
                .iter()
                .map(|warning| JsonIssue {
                    code: warning.code().as_str(),
                    message: warning.to_string(),
                })
                .collect(),
            sets: report
                .sets()
                .iter()
                .map(|set| JsonSet {
                    spectrum: set.spectrum().values(),
                    graphs: set.graphs().iter().map(|graph| graph.edges()).collect(),
                })
                .collect(),
        }
    }
}
