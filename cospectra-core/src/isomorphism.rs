//! Exact isomorphism testing and bucket reduction.
//!
//! [`are_isomorphic`] maps vertices one at a time with an explicit frame
//! stack, so search depth is bounded by the vertex count rather than the
//! call stack. Candidates are pruned by degree, by the sorted degrees of
//! their neighbours, and by adjacency to every vertex already mapped.

use crate::{
    bucket::BucketEntry,
    graph::{Graph, bit, members},
};

/// Per-vertex invariant: degree followed by sorted neighbour degrees.
type Signature = (usize, Vec<usize>);

fn signatures(graph: &Graph) -> Vec<Signature> {
    (0..graph.vertex_count())
        .map(|vertex| {
            let mut around: Vec<usize> = members(graph.neighbours(vertex))
                .map(|neighbour| graph.degree(neighbour))
                .collect();
            around.sort_unstable();
            (graph.degree(vertex), around)
        })
        .collect()
}

/// Reports whether `left` and `right` are isomorphic.
///
/// # Examples
/// ```
/// use cospectra_core::{Graph, are_isomorphic};
///
/// let square = Graph::try_new(4, [(0, 1), (1, 2), (2, 3), (3, 0)]).expect("valid");
/// let twisted = Graph::try_new(4, [(0, 2), (2, 1), (1, 3), (3, 0)]).expect("valid");
/// let path = Graph::try_new(4, [(0, 1), (1, 2), (2, 3)]).expect("valid");
/// assert!(are_isomorphic(&square, &twisted));
/// assert!(!are_isomorphic(&square, &path));
/// ```
#[must_use]
pub fn are_isomorphic(left: &Graph, right: &Graph) -> bool {
    if left.vertex_count() != right.vertex_count()
        || left.edge_count() != right.edge_count()
        || left.degree_sequence() != right.degree_sequence()
    {
        return false;
    }
    let left_sigs = signatures(left);
    let right_sigs = signatures(right);
    let mut sorted_left = left_sigs.clone();
    let mut sorted_right = right_sigs.clone();
    sorted_left.sort_unstable();
    sorted_right.sort_unstable();
    if sorted_left != sorted_right {
        return false;
    }

    let n = left.vertex_count();
    if n == 0 {
        return true;
    }
    let matcher = Matcher {
        left,
        right,
        left_sigs: &left_sigs,
        right_sigs: &right_sigs,
        order: mapping_order(left),
    };
    matcher.search()
}

struct Matcher<'a> {
    left: &'a Graph,
    right: &'a Graph,
    left_sigs: &'a [Signature],
    right_sigs: &'a [Signature],
    order: Vec<usize>,
}

struct Frame {
    candidates: Vec<usize>,
    next: usize,
}

impl Matcher<'_> {
    fn search(&self) -> bool {
        let n = self.order.len();
        // image[i] is the target of order[i]; it grows and shrinks with the stack.
        let mut image: Vec<usize> = Vec::with_capacity(n);
        let mut used = 0_u32;
        let mut stack = vec![Frame {
            candidates: self.candidates(&image, used),
            next: 0,
        }];

        loop {
            let depth = stack.len().saturating_sub(1);
            let Some(frame) = stack.last_mut() else {
                return false;
            };
            if image.len() > depth
                && let Some(previous) = image.pop()
            {
                used &= !bit(previous);
            }
            let Some(&target) = frame.candidates.get(frame.next) else {
                stack.pop();
                continue;
            };
            frame.next += 1;
            image.push(target);
            used |= bit(target);
            if image.len() == n {
                return true;
            }
            let candidates = self.candidates(&image, used);
            stack.push(Frame {
                candidates,
                next: 0,
            });
        }
    }

    /// Targets in `right` that the next vertex in `order` may map to, given
    /// the partial mapping `image` of the vertices before it.
    fn candidates(&self, image: &[usize], used: u32) -> Vec<usize> {
        let Some(&vertex) = self.order.get(image.len()) else {
            return Vec::new();
        };
        let wanted = self.left_sigs.get(vertex);
        (0..self.right.vertex_count())
            .filter(|&target| used & bit(target) == 0)
            .filter(|&target| self.right_sigs.get(target) == wanted)
            .filter(|&target| {
                self.order.iter().zip(image).all(|(&earlier, &mapped)| {
                    self.left.has_edge(vertex, earlier) == self.right.has_edge(target, mapped)
                })
            })
            .collect()
    }
}

/// Orders vertices so each one has as many already-ordered neighbours as
/// possible, which lets adjacency checks prune early.
fn mapping_order(graph: &Graph) -> Vec<usize> {
    let n = graph.vertex_count();
    let mut order = Vec::with_capacity(n);
    let mut placed = 0_u32;
    while order.len() < n {
        let next = (0..n)
            .filter(|&vertex| placed & bit(vertex) == 0)
            .max_by_key(|&vertex| {
                let linked = (graph.neighbours(vertex) & placed).count_ones();
                (linked, graph.degree(vertex), std::cmp::Reverse(vertex))
            });
        let Some(vertex) = next else {
            break;
        };
        placed |= bit(vertex);
        order.push(vertex);
    }
    order
}

/// Outcome of reducing one bucket.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Reduction {
    /// Pairwise non-isomorphic representatives in enumeration order.
    pub representatives: Vec<Graph>,
    /// Entries discarded as isomorphic to an earlier representative.
    pub discarded: u64,
    /// Exact isomorphism tests performed.
    pub checks: u64,
}

/// Confirms bucket entries are pairwise non-isomorphic.
///
/// The first entry is accepted; each later entry is compared with every
/// accepted representative and kept only if none matches. This runs for
/// every backend, since distinct keys alone are not proof.
#[derive(Clone, Copy, Debug, Default)]
pub struct IsomorphismReducer;

impl IsomorphismReducer {
    /// Reduces `entries` to a maximal pairwise non-isomorphic set.
    ///
    /// # Examples
    /// ```
    /// use cospectra_core::{BucketEntry, CanonicalKey, Graph, IsomorphismReducer};
    ///
    /// let entry = |key, edges: [(usize, usize); 1], ordinal| BucketEntry {
    ///     key: CanonicalKey::Heuristic(key),
    ///     graph: Graph::try_new(3, edges).expect("valid graph"),
    ///     ordinal,
    /// };
    /// let reduction = IsomorphismReducer.reduce(vec![entry(1, [(0, 1)], 0), entry(2, [(1, 2)], 1)]);
    /// assert_eq!(reduction.representatives.len(), 1);
    /// assert_eq!(reduction.discarded, 1);
    /// ```
    #[must_use]
    pub fn reduce(&self, entries: Vec<BucketEntry>) -> Reduction {
        let mut reduction = Reduction::default();
        for entry in entries {
            let mut duplicate = false;
            for accepted in &reduction.representatives {
                reduction.checks += 1;
                if are_isomorphic(accepted, &entry.graph) {
                    duplicate = true;
                    break;
                }
            }
            if duplicate {
                reduction.discarded += 1;
            } else {
                reduction.representatives.push(entry.graph);
            }
        }
        reduction
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    use crate::canonical::CanonicalKey;

    fn graph(vertices: usize, edges: &[(usize, usize)]) -> Graph {
        Graph::try_new(vertices, edges.iter().copied()).expect("valid graph")
    }

    #[rstest]
    #[case::different_edge_counts(&[(0, 1)], &[(0, 1), (1, 2)], false)]
    #[case::path_vs_triangle(&[(0, 1), (1, 2)], &[(0, 1), (0, 2)], true)]
    #[case::triangle_vs_path(&[(0, 1), (1, 2), (0, 2)], &[(0, 1), (1, 2), (2, 3)], false)]
    fn small_cases(
        #[case] left: &[(usize, usize)],
        #[case] right: &[(usize, usize)],
        #[case] expected: bool,
    ) {
        assert_eq!(are_isomorphic(&graph(4, left), &graph(4, right)), expected);
    }

    #[test]
    fn regular_graphs_with_equal_signatures_are_separated() {
        let hexagon = graph(6, &[(0, 1), (1, 2), (2, 3), (3, 4), (4, 5), (0, 5)]);
        let triangles = graph(6, &[(0, 1), (1, 2), (0, 2), (3, 4), (4, 5), (3, 5)]);
        assert!(!are_isomorphic(&hexagon, &triangles));
    }

    #[test]
    fn finds_mappings_for_relabelled_regular_graphs() {
        #[rustfmt::skip]
        let edges = [
            (0, 1), (1, 2), (2, 3), (3, 4), (0, 4),
            (0, 5), (1, 6), (2, 7), (3, 8), (4, 9),
            (5, 7), (7, 9), (6, 9), (6, 8), (5, 8),
        ];
        let petersen = graph(10, &edges);
        let moved = petersen
            .relabelled(&[3, 7, 0, 9, 5, 1, 8, 2, 6, 4])
            .expect("valid permutation");
        assert!(are_isomorphic(&petersen, &moved));
    }

    #[test]
    fn empty_graphs_are_isomorphic() {
        assert!(are_isomorphic(&graph(0, &[]), &graph(0, &[])));
        assert!(!are_isomorphic(&graph(1, &[]), &graph(2, &[])));
    }

    #[test]
    fn reducer_keeps_enumeration_order() {
        let entries = vec![
            BucketEntry {
                key: CanonicalKey::Heuristic(1),
                graph: graph(6, &[(0, 1), (1, 2), (2, 3), (3, 4), (4, 5), (0, 5)]),
                ordinal: 4,
            },
            BucketEntry {
                key: CanonicalKey::Heuristic(2),
                graph: graph(6, &[(0, 1), (1, 2), (0, 2), (3, 4), (4, 5), (3, 5)]),
                ordinal: 9,
            },
            BucketEntry {
                key: CanonicalKey::Heuristic(3),
                graph: graph(6, &[(0, 2), (2, 1), (1, 0), (3, 5), (5, 4), (4, 3)]),
                ordinal: 12,
            },
        ];
        let reduction = IsomorphismReducer.reduce(entries);
        assert_eq!(reduction.representatives.len(), 2);
        assert_eq!(reduction.discarded, 1);
        assert_eq!(reduction.checks, 3);
        assert!(reduction.representatives[0].has_edge(0, 5));
    }
}
