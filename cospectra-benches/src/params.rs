//! Benchmark parameter labels.

use std::fmt;

/// Parameters for a full search benchmark run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchBenchParams {
    /// Vertex count.
    pub vertices: usize,
    /// Edge count.
    pub edges: i64,
}

impl fmt::Display for SearchBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v={},e={}", self.vertices, self.edges)
    }
}

/// Parameters for per-graph benchmarks over random inputs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GraphBenchParams {
    /// Vertex count of each graph.
    pub vertices: usize,
    /// Number of graphs in the batch.
    pub batch: usize,
}

impl fmt::Display for GraphBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v={},batch={}", self.vertices, self.batch)
    }
}
