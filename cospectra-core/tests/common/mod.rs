//! Shared helpers for the cospectra-core integration suites.

use cospectra_core::{
    CospectralSearch, ExecutionStrategy, Graph, LabelerPreference, SearchBuilder,
};

/// Builds a graph from a fixture edge list.
#[must_use]
pub fn graph(vertices: usize, edges: &[(usize, usize)]) -> Graph {
    Graph::try_new(vertices, edges.iter().copied()).expect("fixture edges must be valid")
}

/// Builds a search with the given backend and strategy and default limits.
#[must_use]
pub fn search(labeler: LabelerPreference, strategy: ExecutionStrategy) -> CospectralSearch {
    SearchBuilder::new()
        .with_labeler(labeler)
        .with_execution_strategy(strategy)
        .build()
        .expect("configuration must be valid")
}

/// Every labeled simple graph on `vertices` vertices.
pub fn all_graphs(vertices: usize) -> impl Iterator<Item = Graph> {
    let max = cospectra_core::max_edges(vertices);
    (0..=max).flat_map(move |edges| {
        let count = i64::try_from(edges).expect("edge counts fit in i64");
        let enumerator =
            cospectra_core::GraphEnumerator::new(vertices, count).expect("parameters are valid");
        enumerator.iter().collect::<Vec<_>>()
    })
}
