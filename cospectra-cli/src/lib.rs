//! Command-line front end for the cospectra graph search.
//!
//! Exposes argument parsing, command execution and report rendering so the
//! binary stays a thin shell and the behaviour can be tested in-process.

pub mod cli;
pub mod logging;
