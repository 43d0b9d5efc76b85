//! Seeded random graph batches.

use cospectra_core::{Graph, max_edges};
use rand::{Rng, SeedableRng, rngs::SmallRng, seq::SliceRandom};

use crate::error::BenchSetupError;

/// Configuration for [`random_graphs`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RandomGraphConfig {
    /// Vertex count of every graph.
    pub vertices: usize,
    /// Number of graphs to generate.
    pub count: usize,
    /// Fraction of vertex pairs joined by an edge, clamped to `0.0..=1.0`.
    pub density: f64,
    /// Seed for the generator.
    pub seed: u64,
}

/// Generates `config.count` graphs with a fixed edge count derived from
/// `config.density`.
///
/// # Errors
/// Returns [`BenchSetupError::Graph`] when `config.vertices` exceeds the
/// supported maximum.
///
/// # Examples
/// ```
/// use cospectra_benches::source::{RandomGraphConfig, random_graphs};
///
/// let config = RandomGraphConfig { vertices: 8, count: 3, density: 0.5, seed: 7 };
/// let graphs = random_graphs(&config)?;
/// assert_eq!(graphs.len(), 3);
/// assert!(graphs.iter().all(|graph| graph.edge_count() == 14));
/// # Ok::<(), cospectra_benches::error::BenchSetupError>(())
/// ```
pub fn random_graphs(config: &RandomGraphConfig) -> Result<Vec<Graph>, BenchSetupError> {
    let mut rng = SmallRng::seed_from_u64(config.seed);
    let pairs: Vec<(usize, usize)> = (0..config.vertices)
        .flat_map(|u| (u + 1..config.vertices).map(move |w| (u, w)))
        .collect();
    let edges = edge_count(config.vertices, config.density);
    (0..config.count)
        .map(|_| {
            Graph::try_new(config.vertices, sample(&pairs, edges, &mut rng))
                .map_err(BenchSetupError::from)
        })
        .collect()
}

/// Returns a uniformly random relabelling of `graph`.
///
/// # Errors
/// Returns [`BenchSetupError::Permutation`] if the shuffled order is not a
/// permutation of the vertex set, which a correct shuffle never produces.
pub fn shuffled(graph: &Graph, seed: u64) -> Result<Graph, BenchSetupError> {
    let vertices = graph.vertex_count();
    let mut permutation: Vec<usize> = (0..vertices).collect();
    permutation.shuffle(&mut SmallRng::seed_from_u64(seed));
    graph
        .relabelled(&permutation)
        .ok_or(BenchSetupError::Permutation { vertices })
}

#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss,
    clippy::float_arithmetic,
    reason = "edge counts stay far below 2^52 and the product is clamped"
)]
fn edge_count(vertices: usize, density: f64) -> usize {
    let max = max_edges(vertices);
    ((max as f64) * density.clamp(0.0, 1.0)).round() as usize
}

fn sample<R: Rng>(pairs: &[(usize, usize)], amount: usize, rng: &mut R) -> Vec<(usize, usize)> {
    rand::seq::index::sample(rng, pairs.len(), amount.min(pairs.len()))
        .into_iter()
        .filter_map(|index| pairs.get(index).copied())
        .collect()
}
