//! Small helpers shared across CLI tests.

use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;

use tempfile::TempDir;

use super::{
    Cli, CliError, CommandOutcome, LabelerArg, OutputFormat, SearchArgs, StrategyArg,
    render_outcome, run_cli,
};

pub(super) fn temp_dir() -> TempDir {
    match TempDir::new() {
        Ok(dir) => dir,
        Err(err) => panic!("failed to create temp dir: {err}"),
    }
}

pub(super) fn create_graph_file(dir: &TempDir, name: &str, contents: &str) -> io::Result<PathBuf> {
    let path = dir.path().join(name);
    let mut file = File::create(&path)?;
    file.write_all(contents.as_bytes())?;
    Ok(path)
}

/// Sequential search arguments with every optional knob unset.
pub(super) fn search_args(vertices: usize, edges: i64) -> SearchArgs {
    SearchArgs {
        vertices,
        edges,
        labeler: LabelerArg::Auto,
        strategy: StrategyArg::Sequential,
        timeout_secs: None,
        max_candidates: None,
        chunk_size: None,
        format: OutputFormat::Text,
    }
}

pub(super) fn render_to_string(outcome: &CommandOutcome) -> String {
    let mut buffer = Vec::new();
    if let Err(err) = render_outcome(outcome, &mut buffer) {
        panic!("rendering into memory failed: {err}");
    }
    match String::from_utf8(buffer) {
        Ok(text) => text,
        Err(err) => panic!("rendered output was not UTF-8: {err}"),
    }
}

pub(super) fn run_cli_expecting_error(cli: Cli, panic_msg: &str) -> CliError {
    match run_cli(cli) {
        Ok(_) => panic!("{panic_msg}"),
        Err(err) => err,
    }
}
