//! Edge-list fixtures and vertex permutation helpers.
//!
//! Fixtures are plain `(u, w)` edge lists so they can feed any graph type
//! without this crate depending on it.

use rand::{Rng, SeedableRng, rngs::SmallRng, seq::SliceRandom};

/// Unordered edge list over vertices `0..n`.
pub type EdgeList = Vec<(usize, usize)>;

/// Returns a deterministic generator for reproducible fixtures.
///
/// # Examples
/// ```
/// use cospectra_test_support::graphs::{random_edges, seeded_rng};
///
/// let first = random_edges(6, 5, &mut seeded_rng(7));
/// let second = random_edges(6, 5, &mut seeded_rng(7));
/// assert_eq!(first, second);
/// ```
#[must_use]
pub fn seeded_rng(seed: u64) -> SmallRng {
    SmallRng::seed_from_u64(seed)
}

/// Star `K1,leaves`: vertex 0 joined to `1..=leaves`.
#[must_use]
pub fn star(leaves: usize) -> EdgeList {
    (1..=leaves).map(|leaf| (0, leaf)).collect()
}

/// Path `0 - 1 - … - (n-1)`.
#[must_use]
pub fn path(n: usize) -> EdgeList {
    (1..n).map(|w| (w - 1, w)).collect()
}

/// Cycle on `0..n`; empty when `n < 3`.
#[must_use]
pub fn cycle(n: usize) -> EdgeList {
    if n < 3 {
        return Vec::new();
    }
    let mut edges = path(n);
    edges.push((0, n - 1));
    edges
}

/// Complete graph on `0..n`.
#[must_use]
pub fn complete(n: usize) -> EdgeList {
    (0..n)
        .flat_map(|u| (u + 1..n).map(move |w| (u, w)))
        .collect()
}

/// Rook's graph on an `n × n` board: cells `r * n + c` are adjacent when
/// they share a row or a column.
#[must_use]
pub fn rook(n: usize) -> EdgeList {
    complete(n * n)
        .into_iter()
        .filter(|&(u, w)| u / n == w / n || u % n == w % n)
        .collect()
}

/// Shrikhande graph: the Cayley graph of `Z4 × Z4` with connection set
/// `±(1, 0), ±(0, 1), ±(1, 1)`.
///
/// It shares its parameters `srg(16, 6, 2, 2)` with [`rook`]`(4)` but is not
/// isomorphic to it.
#[must_use]
pub fn shrikhande() -> EdgeList {
    complete(16)
        .into_iter()
        .filter(|&(u, w)| {
            let rows = (w / 4 + 4 - u / 4) % 4;
            let columns = (w % 4 + 4 - u % 4) % 4;
            matches!(
                (rows, columns),
                (0, 1 | 3) | (1 | 3, 0) | (1, 1) | (3, 3)
            )
        })
        .collect()
}

/// Uniformly random simple graph with `edge_count` edges on `vertices`
/// vertices. The count is clamped to the number of available pairs.
pub fn random_edges<R: Rng + ?Sized>(vertices: usize, edge_count: usize, rng: &mut R) -> EdgeList {
    let pairs = complete(vertices);
    let amount = edge_count.min(pairs.len());
    let mut chosen: EdgeList = rand::seq::index::sample(rng, pairs.len(), amount)
        .into_iter()
        .map(|index| pairs[index])
        .collect();
    chosen.sort_unstable();
    chosen
}

/// Uniformly random permutation of `0..n`.
pub fn random_permutation<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Vec<usize> {
    let mut permutation: Vec<usize> = (0..n).collect();
    permutation.shuffle(rng);
    permutation
}

/// Every permutation of `0..n`, generated iteratively with Heap's method.
///
/// # Examples
/// ```
/// use cospectra_test_support::graphs::all_permutations;
///
/// assert_eq!(all_permutations(3).len(), 6);
/// assert_eq!(all_permutations(0), vec![Vec::<usize>::new()]);
/// ```
#[must_use]
pub fn all_permutations(n: usize) -> Vec<Vec<usize>> {
    let mut current: Vec<usize> = (0..n).collect();
    let mut counters = vec![0_usize; n];
    let mut out = vec![current.clone()];
    let mut i = 1;
    while i < n {
        if counters[i] < i {
            let swap_with = if i % 2 == 0 { 0 } else { counters[i] };
            current.swap(swap_with, i);
            out.push(current.clone());
            counters[i] += 1;
            i = 1;
        } else {
            counters[i] = 0;
            i += 1;
        }
    }
    out
}

/// Renames every vertex `v` in `edges` to `permutation[v]`.
///
/// # Panics
/// Panics when an endpoint is outside `permutation`.
#[must_use]
pub fn relabel(edges: &[(usize, usize)], permutation: &[usize]) -> EdgeList {
    edges
        .iter()
        .map(|&(u, w)| (permutation[u], permutation[w]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashSet;

    use rstest::rstest;

    #[rstest]
    #[case(1, 1)]
    #[case(4, 24)]
    #[case(5, 120)]
    fn permutations_are_distinct(#[case] n: usize, #[case] expected: usize) {
        let all = all_permutations(n);
        let distinct: HashSet<Vec<usize>> = all.iter().cloned().collect();
        assert_eq!(all.len(), expected);
        assert_eq!(distinct.len(), expected);
    }

    #[test]
    fn fixtures_have_expected_sizes() {
        assert_eq!(star(4).len(), 4);
        assert_eq!(cycle(5).len(), 5);
        assert!(cycle(2).is_empty());
        assert_eq!(complete(5).len(), 10);
        assert_eq!(path(1).len(), 0);
        assert_eq!(rook(4).len(), 48);
        assert_eq!(shrikhande().len(), 48);
    }

    #[rstest]
    #[case::rook(rook(4))]
    #[case::shrikhande(shrikhande())]
    fn strongly_regular_fixtures_are_six_regular(#[case] edges: EdgeList) {
        let mut degrees = [0_usize; 16];
        for (u, w) in edges {
            degrees[u] += 1;
            degrees[w] += 1;
        }
        assert!(degrees.iter().all(|&degree| degree == 6));
    }

    #[test]
    fn random_edges_are_simple() {
        let mut rng = seeded_rng(11);
        let edges = random_edges(7, 30, &mut rng);
        assert_eq!(edges.len(), 21);
        assert!(edges.iter().all(|&(u, w)| u < w && w < 7));
    }

    #[test]
    fn relabel_applies_the_permutation() {
        assert_eq!(relabel(&[(0, 1), (1, 2)], &[2, 0, 1]), vec![(2, 0), (0, 1)]);
        let permutation = random_permutation(6, &mut seeded_rng(3));
        let mut sorted = permutation.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..6).collect::<Vec<_>>());
    }
}
