//! Benchmark setup error type.
//!
//! Lets setup code propagate failures with `?` instead of `.expect()`.

use cospectra_core::{GraphError, SearchError};

/// Errors that may occur during benchmark setup.
#[derive(Debug, thiserror::Error)]
pub enum BenchSetupError {
    /// A generated edge list did not form a valid graph.
    #[error("graph construction failed: {0}")]
    Graph(#[from] GraphError),
    /// The search could not be configured.
    #[error("search configuration failed: {0}")]
    Search(#[from] SearchError),
    /// A shuffled vertex order was not a permutation.
    #[error("shuffled order is not a permutation of {vertices} vertices")]
    Permutation {
        /// Vertex count of the graph being shuffled.
        vertices: usize,
    },
}
