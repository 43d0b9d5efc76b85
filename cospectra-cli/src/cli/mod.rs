//! Command-line interface for the cospectra search.
//!
//! Exposes the argument parser, the command runner, edge-list input and the
//! text and JSON renderers.

mod commands;
mod input;
mod render;

pub use commands::{
    Cli, CliError, Command, CommandOutcome, IsomorphicArgs, IsomorphismSummary, LabelerArg,
    OutputFormat, SearchArgs, SpectrumArgs, SpectrumSummary, StrategyArg, run_cli,
};
pub use input::{InputError, parse_graph};
pub use render::render_outcome;

#[cfg(test)]
mod test_helpers;
