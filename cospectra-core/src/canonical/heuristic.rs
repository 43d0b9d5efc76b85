//! Weisfeiler–Lehman style graph hashing.

use std::hash::{DefaultHasher, Hash, Hasher};

use super::{CanonicalKey, CanonicalLabeler, LabelerKind};
use crate::graph::{Graph, members};

const DEFAULT_ITERATIONS: usize = 10;

/// Heuristic labeler based on iterated neighbourhood hashing.
///
/// Vertex labels start as degrees; each round rehashes a vertex label with
/// the sorted labels of its neighbours. The key hashes the sorted label
/// multiset of every round. Isomorphic graphs always agree; some
/// non-isomorphic regular graphs collide.
///
/// # Examples
/// ```
/// use cospectra_core::{CanonicalLabeler, Graph, HeuristicLabeler};
///
/// let labeler = HeuristicLabeler::default();
/// let left = Graph::try_new(4, [(0, 1), (1, 2)]).expect("valid graph");
/// let right = Graph::try_new(4, [(3, 2), (2, 0)]).expect("valid graph");
/// assert_eq!(labeler.key(&left), labeler.key(&right));
/// ```
#[derive(Clone, Copy, Debug)]
pub struct HeuristicLabeler {
    iterations: usize,
}

impl Default for HeuristicLabeler {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
        }
    }
}

impl HeuristicLabeler {
    /// Creates a labeler running `iterations` refinement rounds.
    #[must_use]
    pub const fn with_iterations(iterations: usize) -> Self {
        Self { iterations }
    }

    /// Returns the number of refinement rounds.
    #[must_use]
    pub const fn iterations(&self) -> usize {
        self.iterations
    }

    fn hash(&self, graph: &Graph) -> u64 {
        let n = graph.vertex_count();
        let mut labels: Vec<u64> = (0..n).map(|vertex| graph.degree(vertex) as u64).collect();
        let mut digest = DefaultHasher::new();
        n.hash(&mut digest);
        absorb_histogram(&labels, &mut digest);

        for _ in 0..self.iterations {
            labels = labels
                .iter()
                .enumerate()
                .map(|(vertex, own)| {
                    let mut around: Vec<u64> = members(graph.neighbours(vertex))
                        .filter_map(|neighbour| labels.get(neighbour).copied())
                        .collect();
                    around.sort_unstable();
                    let mut hasher = DefaultHasher::new();
                    own.hash(&mut hasher);
                    around.hash(&mut hasher);
                    hasher.finish()
                })
                .collect();
            absorb_histogram(&labels, &mut digest);
        }
        digest.finish()
    }
}

fn absorb_histogram(labels: &[u64], digest: &mut DefaultHasher) {
    let mut sorted = labels.to_vec();
    sorted.sort_unstable();
    sorted.hash(digest);
}

impl CanonicalLabeler for HeuristicLabeler {
    fn kind(&self) -> LabelerKind {
        LabelerKind::Heuristic
    }

    fn key(&self, graph: &Graph) -> CanonicalKey {
        CanonicalKey::Heuristic(self.hash(graph))
    }
}
