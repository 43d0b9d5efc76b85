//! Labeled graph enumeration.
//!
//! Candidates are the `e`-subsets of the unordered pair universe, produced in
//! lexicographic order of pair indices by [`Itertools::combinations`]. The pair universe is ordered
//! `(0,1), (0,2), …, (0,v-1), (1,2), …`, so enumeration order is fixed for a
//! given `(v, e)`.

use itertools::{Combinations, Itertools};

use crate::{
    error::{Result, SearchError},
    graph::{Graph, MAX_VERTICES},
};

/// Largest edge count of a simple graph on `vertices` vertices.
///
/// # Examples
/// ```
/// use cospectra_core::max_edges;
///
/// assert_eq!(max_edges(4), 6);
/// assert_eq!(max_edges(0), 0);
/// ```
#[must_use]
#[expect(
    clippy::integer_division,
    reason = "one of two consecutive integers is even, so the product halves exactly"
)]
pub const fn max_edges(vertices: usize) -> usize {
    vertices * vertices.saturating_sub(1) / 2
}

/// Returns `C(n, k)`, saturating at `u64::MAX`.
///
/// # Examples
/// ```
/// use cospectra_core::binomial;
///
/// assert_eq!(binomial(10, 4), 210);
/// assert_eq!(binomial(3, 5), 0);
/// ```
#[must_use]
pub fn binomial(n: usize, k: usize) -> u64 {
    if k > n {
        return 0;
    }
    let steps = k.min(n - k);
    let mut acc: u128 = 1;
    for i in 0..steps {
        let Some(product) = acc.checked_mul((n - i) as u128) else {
            return u64::MAX;
        };
        #[expect(
            clippy::integer_division,
            reason = "the running product of i + 1 consecutive integers is divisible by (i + 1)!"
        )]
        let next = product / (i as u128 + 1);
        acc = next;
    }
    u64::try_from(acc).unwrap_or(u64::MAX)
}

/// Lazy, restartable source of every labeled simple graph with a fixed
/// vertex and edge count.
///
/// # Examples
/// ```
/// use cospectra_core::GraphEnumerator;
///
/// let enumerator = GraphEnumerator::new(4, 2).expect("parameters are valid");
/// assert_eq!(enumerator.candidate_count(), 15);
/// assert_eq!(enumerator.iter().count(), 15);
/// // Enumeration can be restarted.
/// assert_eq!(enumerator.iter().count(), 15);
/// ```
#[derive(Debug, Clone)]
pub struct GraphEnumerator {
    vertices: usize,
    edges: usize,
    pairs: Vec<(usize, usize)>,
}

impl GraphEnumerator {
    /// Validates `(vertices, edges)` and prepares the pair universe.
    ///
    /// # Errors
    /// Returns [`SearchError::InvalidVertexCount`] when `vertices` is zero or
    /// exceeds [`MAX_VERTICES`], and [`SearchError::InvalidParameters`] when
    /// `edges` is negative or larger than [`max_edges`]`(vertices)`.
    pub fn new(vertices: usize, edges: i64) -> Result<Self> {
        if vertices == 0 || vertices > MAX_VERTICES {
            return Err(SearchError::InvalidVertexCount {
                got: vertices,
                max: MAX_VERTICES,
            });
        }
        let max = max_edges(vertices);
        let edge_count = usize::try_from(edges)
            .ok()
            .filter(|&count| count <= max)
            .ok_or(SearchError::InvalidParameters {
                vertices,
                edges,
                max_edges: max,
            })?;
        let pairs = (0..vertices)
            .flat_map(|u| (u + 1..vertices).map(move |w| (u, w)))
            .collect();
        Ok(Self {
            vertices,
            edges: edge_count,
            pairs,
        })
    }

    /// Returns the vertex count of every candidate.
    #[must_use]
    pub const fn vertices(&self) -> usize {
        self.vertices
    }

    /// Returns the edge count of every candidate.
    #[must_use]
    pub const fn edges(&self) -> usize {
        self.edges
    }

    /// Returns the ordered pair universe.
    #[must_use]
    pub fn pairs(&self) -> &[(usize, usize)] {
        &self.pairs
    }

    /// Returns the exact number of candidates, saturating at `u64::MAX`.
    #[must_use]
    pub fn candidate_count(&self) -> u64 {
        binomial(self.pairs.len(), self.edges)
    }

    /// Starts a fresh pass over all candidates.
    #[must_use]
    pub fn iter(&self) -> Candidates<'_> {
        Candidates {
            vertices: self.vertices,
            subsets: self.pairs.iter().copied().combinations(self.edges),
        }
    }
}

impl<'a> IntoIterator for &'a GraphEnumerator {
    type Item = Graph;
    type IntoIter = Candidates<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the candidates of a [`GraphEnumerator`].
#[derive(Debug, Clone)]
pub struct Candidates<'a> {
    vertices: usize,
    subsets: Combinations<std::iter::Copied<std::slice::Iter<'a, (usize, usize)>>>,
}

impl Iterator for Candidates<'_> {
    type Item = Graph;

    fn next(&mut self) -> Option<Self::Item> {
        let edges = self.subsets.next()?;
        Some(Graph::from_normalised_edges(self.vertices, edges))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.subsets.size_hint()
    }
}
