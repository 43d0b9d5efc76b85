//! Edge-list graph input.
//!
//! The format is line oriented:
//!
//! ```text
//! # optional vertex count on the first data line
//! 5
//! 0 1
//! 0 2
//! ```
//!
//! `#` starts a comment. A blank line after at least one edge ends the
//! graph, so several graphs can share a stream. Without a count line the
//! vertex count is the caller's override or the largest index plus one.

use std::io::{self, BufRead};

use cospectra_core::{Graph, GraphError};
use thiserror::Error;

/// Errors raised while reading an edge list.
#[derive(Debug, Error)]
pub enum InputError {
    /// Reading from the underlying stream failed.
    #[error("failed to read `{origin}`: {source}")]
    Io {
        /// File path or `<stdin>`.
        origin: String,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// A line could not be parsed.
    #[error("{origin}:{line}: {reason}")]
    Malformed {
        /// File path or `<stdin>`.
        origin: String,
        /// One-based line number.
        line: usize,
        /// What was wrong with the line.
        reason: String,
    },
    /// The edges parsed but do not form a simple graph.
    #[error("{origin}: {source}")]
    InvalidGraph {
        /// File path or `<stdin>`.
        origin: String,
        /// Validation failure from graph construction.
        #[source]
        source: GraphError,
    },
}

#[derive(Debug, Default)]
struct EdgeList {
    vertices: Option<usize>,
    edges: Vec<(usize, usize)>,
}

impl EdgeList {
    fn vertex_count(&self, override_count: Option<usize>) -> usize {
        self.vertices.or(override_count).unwrap_or_else(|| {
            self.edges
                .iter()
                .map(|&(u, w)| u.max(w) + 1)
                .max()
                .unwrap_or(0)
        })
    }
}

/// Parses one graph from `reader`.
///
/// `origin` names the source in error messages. `vertices` supplies the
/// vertex count when the input has no count line; an explicit count line
/// takes precedence.
///
/// # Errors
/// Returns [`InputError::Io`] when reading fails, [`InputError::Malformed`]
/// for unparsable lines, and [`InputError::InvalidGraph`] when the edges
/// break simple-graph rules.
///
/// # Examples
/// ```
/// use cospectra_cli::cli::parse_graph;
///
/// let text = "# a path\n0 1\n1 2\n";
/// let graph = parse_graph(text.as_bytes(), "<inline>", None)?;
/// assert_eq!(graph.vertex_count(), 3);
/// assert_eq!(graph.edges(), &[(0, 1), (1, 2)]);
/// # Ok::<(), cospectra_cli::cli::InputError>(())
/// ```
pub fn parse_graph<R: BufRead>(
    reader: R,
    origin: &str,
    vertices: Option<usize>,
) -> Result<Graph, InputError> {
    let list = read_edge_list(reader, origin)?;
    Graph::try_new(list.vertex_count(vertices), list.edges.iter().copied()).map_err(|source| {
        InputError::InvalidGraph {
            origin: origin.to_owned(),
            source,
        }
    })
}

fn read_edge_list<R: BufRead>(reader: R, origin: &str) -> Result<EdgeList, InputError> {
    let mut list = EdgeList::default();
    let mut seen_data = false;
    for (index, read) in reader.lines().enumerate() {
        let line = read.map_err(|source| InputError::Io {
            origin: origin.to_owned(),
            source,
        })?;
        let number = index + 1;
        let malformed = |reason: String| InputError::Malformed {
            origin: origin.to_owned(),
            line: number,
            reason,
        };

        let content = line.split('#').next().unwrap_or_default().trim();
        if content.is_empty() {
            if list.edges.is_empty() {
                continue;
            }
            break;
        }

        let tokens: Vec<&str> = content.split_whitespace().collect();
        match tokens.as_slice() {
            [count] if !seen_data => {
                let parsed = parse_index(count)
                    .map_err(|_| malformed(format!("expected a vertex count, found `{count}`")))?;
                list.vertices = Some(parsed);
            }
            [left, right] => {
                let u = parse_index(left).map_err(&malformed)?;
                let w = parse_index(right).map_err(&malformed)?;
                list.edges.push((u, w));
            }
            _ => {
                return Err(malformed(format!(
                    "expected two vertex indices, found `{content}`"
                )));
            }
        }
        seen_data = true;
    }
    Ok(list)
}

fn parse_index(token: &str) -> Result<usize, String> {
    token
        .parse::<usize>()
        .map_err(|err| format!("invalid vertex index `{token}`: {err}"))
}
