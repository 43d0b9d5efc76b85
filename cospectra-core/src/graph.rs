//! Simple undirected graphs on a fixed, labeled vertex set.
//!
//! A [`Graph`] keeps both a normalised edge list (for reporting) and one
//! adjacency bitmask per vertex (for the spectral, canonical and isomorphism
//! routines). Graphs are immutable once built.

use std::fmt;

use crate::error::GraphError;

/// Largest vertex count a [`Graph`] can hold; adjacency rows are `u32`
/// bitmasks.
pub const MAX_VERTICES: usize = 32;

/// Simple undirected graph on the vertex set `0..vertex_count()`.
///
/// Edges are stored as `(u, w)` with `u < w`, sorted ascending, so two graphs
/// compare equal exactly when they have the same labeled edge set.
///
/// # Examples
/// ```
/// use cospectra_core::Graph;
///
/// let path = Graph::try_new(3, [(1, 0), (1, 2)]).expect("edges are valid");
/// assert_eq!(path.edges(), &[(0, 1), (1, 2)]);
/// assert_eq!(path.degree(1), 2);
/// assert!(path.has_edge(2, 1));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Graph {
    vertices: usize,
    edges: Vec<(usize, usize)>,
    rows: Vec<u32>,
}

impl Graph {
    /// Builds a graph from caller-supplied edges, validating every pair.
    ///
    /// Endpoint order is irrelevant; edges are normalised and sorted.
    ///
    /// # Errors
    /// Returns [`GraphError::TooManyVertices`] when `vertices` exceeds
    /// [`MAX_VERTICES`], [`GraphError::VertexOutOfRange`] for endpoints
    /// outside `0..vertices`, [`GraphError::SelfLoop`] for loops, and
    /// [`GraphError::DuplicateEdge`] when a pair repeats.
    pub fn try_new<I>(vertices: usize, edges: I) -> Result<Self, GraphError>
    where
        I: IntoIterator<Item = (usize, usize)>,
    {
        if vertices > MAX_VERTICES {
            return Err(GraphError::TooManyVertices {
                got: vertices,
                max: MAX_VERTICES,
            });
        }
        let mut rows = vec![0_u32; vertices];
        let mut normalised = Vec::new();
        for (u, w) in edges {
            if u >= vertices || w >= vertices {
                return Err(GraphError::VertexOutOfRange { u, w, vertices });
            }
            if u == w {
                return Err(GraphError::SelfLoop { vertex: u });
            }
            let (lo, hi) = (u.min(w), u.max(w));
            if rows.get(lo).is_some_and(|&row| row & bit(hi) != 0) {
                return Err(GraphError::DuplicateEdge { u: lo, w: hi });
            }
            link(&mut rows, lo, hi);
            normalised.push((lo, hi));
        }
        normalised.sort_unstable();
        Ok(Self {
            vertices,
            edges: normalised,
            rows,
        })
    }

    /// Builds a graph from edges already known to be normalised, sorted,
    /// distinct and in range. Used by the enumerator.
    pub(crate) fn from_normalised_edges(vertices: usize, edges: Vec<(usize, usize)>) -> Self {
        debug_assert!(vertices <= MAX_VERTICES);
        let mut rows = vec![0_u32; vertices];
        for &(u, w) in &edges {
            debug_assert!(u < w && w < vertices);
            link(&mut rows, u, w);
        }
        Self {
            vertices,
            edges,
            rows,
        }
    }

    /// Returns the number of vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices
    }

    /// Returns the number of edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Returns the normalised, sorted edge list.
    #[must_use]
    pub fn edges(&self) -> &[(usize, usize)] {
        &self.edges
    }

    /// Returns one adjacency bitmask per vertex; bit `w` of row `u` is set
    /// when `u` and `w` are adjacent.
    #[must_use]
    pub fn rows(&self) -> &[u32] {
        &self.rows
    }

    /// Returns the adjacency bitmask of `vertex`, or `0` when out of range.
    #[must_use]
    pub fn neighbours(&self, vertex: usize) -> u32 {
        self.rows.get(vertex).copied().unwrap_or(0)
    }

    /// Reports whether `u` and `w` are adjacent.
    #[must_use]
    pub fn has_edge(&self, u: usize, w: usize) -> bool {
        w < self.vertices && self.neighbours(u) & bit(w) != 0
    }

    /// Returns the degree of `vertex` (zero when out of range).
    #[must_use]
    pub fn degree(&self, vertex: usize) -> usize {
        self.neighbours(vertex).count_ones() as usize
    }

    /// Returns the degree sequence sorted in descending order.
    #[must_use]
    pub fn degree_sequence(&self) -> Vec<usize> {
        let mut degrees: Vec<usize> = (0..self.vertices).map(|v| self.degree(v)).collect();
        degrees.sort_unstable_by(|a, b| b.cmp(a));
        degrees
    }

    /// Returns the graph obtained by renaming every vertex `v` to
    /// `permutation[v]`, or `None` when `permutation` is not a permutation of
    /// `0..vertex_count()`.
    ///
    /// # Examples
    /// ```
    /// use cospectra_core::Graph;
    ///
    /// let graph = Graph::try_new(3, [(0, 1)]).expect("valid edge");
    /// let moved = graph.relabelled(&[2, 0, 1]).expect("valid permutation");
    /// assert_eq!(moved.edges(), &[(0, 2)]);
    /// ```
    #[must_use]
    pub fn relabelled(&self, permutation: &[usize]) -> Option<Self> {
        if permutation.len() != self.vertices {
            return None;
        }
        let mut seen = 0_u64;
        for &target in permutation {
            if target >= self.vertices || seen & (1 << target) != 0 {
                return None;
            }
            seen |= 1 << target;
        }
        let edges: Option<Vec<(usize, usize)>> = self
            .edges
            .iter()
            .map(|&(u, w)| Some((*permutation.get(u)?, *permutation.get(w)?)))
            .collect();
        Self::try_new(self.vertices, edges?).ok()
    }

    /// Returns the row-major dense 0/1 adjacency matrix.
    #[must_use]
    pub fn adjacency_matrix(&self) -> Vec<f64> {
        let n = self.vertices;
        self.rows
            .iter()
            .flat_map(|&row| (0..n).map(move |w| if row & bit(w) == 0 { 0.0 } else { 1.0 }))
            .collect()
    }
}

impl fmt::Display for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (index, (u, w)) in self.edges.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            write!(f, "({u}, {w})")?;
        }
        f.write_str("]")
    }
}

/// Returns the single-bit mask for `vertex`.
pub(crate) const fn bit(vertex: usize) -> u32 {
    1_u32 << vertex
}

/// Marks `u` and `w` adjacent in `rows`.
fn link(rows: &mut [u32], u: usize, w: usize) {
    if let Some(row) = rows.get_mut(u) {
        *row |= bit(w);
    }
    if let Some(row) = rows.get_mut(w) {
        *row |= bit(u);
    }
}

/// Iterates the vertices whose bits are set in `mask`, ascending.
pub(crate) fn members(mut mask: u32) -> impl Iterator<Item = usize> {
    std::iter::from_fn(move || {
        if mask == 0 {
            return None;
        }
        let vertex = mask.trailing_zeros() as usize;
        mask &= mask - 1;
        Some(vertex)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[rstest]
    #[case::loop_edge(vec![(1, 1)], GraphError::SelfLoop { vertex: 1 })]
    #[case::duplicate(vec![(0, 1), (1, 0)], GraphError::DuplicateEdge { u: 0, w: 1 })]
    #[case::out_of_range(vec![(0, 3)], GraphError::VertexOutOfRange { u: 0, w: 3, vertices: 3 })]
    fn try_new_rejects_invalid_edges(
        #[case] edges: Vec<(usize, usize)>,
        #[case] expected: GraphError,
    ) {
        let err = Graph::try_new(3, edges).expect_err("edges must be rejected");
        assert_eq!(err, expected);
    }

    #[test]
    fn try_new_rejects_oversized_vertex_sets() {
        let err = Graph::try_new(MAX_VERTICES + 1, []).expect_err("too many vertices");
        assert!(matches!(err, GraphError::TooManyVertices { got: 33, max: 32 }));
    }

    #[test]
    fn adjacency_rows_are_symmetric() {
        let graph = Graph::try_new(4, [(0, 1), (2, 1), (3, 0)]).expect("valid edges");
        for u in 0..4 {
            for w in 0..4 {
                assert_eq!(graph.has_edge(u, w), graph.has_edge(w, u));
            }
        }
        assert_eq!(graph.rows(), &[0b1010, 0b0101, 0b0010, 0b0001]);
        assert_eq!(graph.degree_sequence(), vec![2, 2, 1, 1]);
    }

    #[test]
    fn relabelled_rejects_non_permutations() {
        let graph = Graph::try_new(3, [(0, 1)]).expect("valid edge");
        assert!(graph.relabelled(&[0, 0, 1]).is_none());
        assert!(graph.relabelled(&[0, 1]).is_none());
        assert!(graph.relabelled(&[0, 1, 3]).is_none());
    }

    #[test]
    fn members_lists_set_bits() {
        assert_eq!(members(0b1011).collect::<Vec<_>>(), vec![0, 1, 3]);
        assert_eq!(members(0).count(), 0);
    }

    #[test]
    fn display_lists_edges() {
        let graph = Graph::try_new(3, [(2, 0), (0, 1)]).expect("valid edges");
        assert_eq!(graph.to_string(), "[(0, 1), (0, 2)]");
        assert_eq!(Graph::try_new(2, []).expect("empty").to_string(), "[]");
    }

    #[test]
    fn adjacency_matrix_matches_edges() {
        let graph = Graph::try_new(3, [(0, 2)]).expect("valid edge");
        assert_eq!(
            graph.adjacency_matrix(),
            vec![0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0]
        );
    }
}
