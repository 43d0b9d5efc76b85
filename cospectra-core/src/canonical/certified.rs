//! Exact canonical forms backed by the `canonical-form` crate.
//!
//! A graph is handed to the canonizer as its adjacency bitmask rows. The
//! crate searches vertex orders guided by degree colours and neighbourhood
//! hints, and returns the smallest relabelled row vector, which is the key.

use canonical_form::Canonize;

use super::{CanonicalKey, CanonicalLabeler, LabelerKind};
use crate::graph::{Graph, bit, members};

/// Certified canonical labeler.
///
/// # Examples
/// ```
/// use cospectra_core::{CanonicalLabeler, CertifiedLabeler, Graph};
///
/// let left = Graph::try_new(3, [(0, 1), (1, 2)]).expect("valid path");
/// let right = Graph::try_new(3, [(0, 2), (2, 1)]).expect("valid path");
/// assert_eq!(CertifiedLabeler.key(&left), CertifiedLabeler.key(&right));
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct CertifiedLabeler;

impl CanonicalLabeler for CertifiedLabeler {
    fn kind(&self) -> LabelerKind {
        LabelerKind::Certified
    }

    fn key(&self, graph: &Graph) -> CanonicalKey {
        CanonicalKey::Certified(canonical_form(graph))
    }
}

/// Adjacency rows in the shape the canonizer permutes and compares.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct Rows(Vec<u32>);

impl Rows {
    fn row(&self, vertex: usize) -> u32 {
        self.0.get(vertex).copied().unwrap_or(0)
    }
}

impl Canonize for Rows {
    fn size(&self) -> usize {
        self.0.len()
    }

    fn apply_morphism(&self, p: &[usize]) -> Self {
        let mut rows = vec![0_u32; self.0.len()];
        for (&row, &target) in self.0.iter().zip(p) {
            let image = members(row)
                .filter_map(|neighbour| p.get(neighbour))
                .fold(0, |acc, &moved| acc | bit(moved));
            if let Some(slot) = rows.get_mut(target) {
                *slot = image;
            }
        }
        Self(rows)
    }

    fn invariant_color(&self, u: usize) -> u64 {
        u64::from(self.row(u).count_ones())
    }

    fn invariant_neighborhood(&self, u: usize) -> impl Iterator<Item = (usize, u64)> {
        members(self.row(u)).map(|neighbour| (neighbour, 0))
    }
}

/// Returns the adjacency rows of the canonical form of `graph`.
pub(crate) fn canonical_form(graph: &Graph) -> Vec<u32> {
    let rows = Rows(graph.rows().to_vec());
    // Graphs on fewer than two vertices have a single labelling.
    if rows.size() < 2 {
        return rows.0;
    }
    rows.canonical().0
}

#[cfg(test)]
mod tests {
    use super::*;

    use cospectra_test_support::graphs::{random_permutation, rook, seeded_rng, shrikhande};
    use rstest::rstest;

    fn graph(vertices: usize, edges: &[(usize, usize)]) -> Graph {
        Graph::try_new(vertices, edges.iter().copied()).expect("valid graph")
    }

    #[test]
    fn star_and_square_plus_point_differ() {
        let star = graph(5, &[(0, 1), (0, 2), (0, 3), (0, 4)]);
        let square = graph(5, &[(0, 1), (1, 2), (2, 3), (0, 3)]);
        assert_ne!(canonical_form(&star), canonical_form(&square));
    }

    #[rstest]
    #[case(0)]
    #[case(1)]
    fn trivial_graphs_are_their_own_form(#[case] vertices: usize) {
        let trivial = graph(vertices, &[]);
        assert_eq!(canonical_form(&trivial), vec![0; vertices]);
    }

    #[rstest]
    #[case::empty(8, vec![])]
    #[case::complete(6, (0..6).flat_map(|u| (u + 1..6).map(move |w| (u, w))).collect())]
    #[case::perfect_matching(8, vec![(0, 1), (2, 3), (4, 5), (6, 7)])]
    fn symmetric_graphs_are_canonicalised(
        #[case] vertices: usize,
        #[case] edges: Vec<(usize, usize)>,
    ) {
        let original = graph(vertices, &edges);
        let reversed: Vec<usize> = (0..vertices).rev().collect();
        let moved = original.relabelled(&reversed).expect("valid permutation");
        assert_eq!(canonical_form(&original), canonical_form(&moved));
    }

    #[test]
    fn regular_non_isomorphic_graphs_are_separated() {
        // C6 and two disjoint triangles are both 2-regular on six vertices.
        let hexagon = graph(6, &[(0, 1), (1, 2), (2, 3), (3, 4), (4, 5), (0, 5)]);
        let triangles = graph(6, &[(0, 1), (1, 2), (0, 2), (3, 4), (4, 5), (3, 5)]);
        assert_ne!(canonical_form(&hexagon), canonical_form(&triangles));
    }

    #[test]
    fn strongly_regular_twins_are_separated_and_stable() {
        let board = graph(16, &rook(4));
        let cayley = graph(16, &shrikhande());
        let rook_form = canonical_form(&board);
        let shrikhande_form = canonical_form(&cayley);
        assert_ne!(rook_form, shrikhande_form);

        let mut rng = seeded_rng(41);
        for _ in 0..10 {
            let permutation = random_permutation(16, &mut rng);
            let moved_rook = board.relabelled(&permutation).expect("valid permutation");
            let moved_shrikhande = cayley.relabelled(&permutation).expect("valid permutation");
            assert_eq!(canonical_form(&moved_rook), rook_form);
            assert_eq!(canonical_form(&moved_shrikhande), shrikhande_form);
        }
    }

    #[test]
    fn canonical_form_is_a_relabelling_of_the_input() {
        let path = graph(4, &[(0, 1), (1, 2), (2, 3)]);
        let form = canonical_form(&path);
        let edges: u32 = form.iter().map(|row| row.count_ones()).sum();
        assert_eq!(edges, 6);
    }

    #[test]
    fn morphisms_compose_as_a_group_action() {
        let rows = Rows(graph(4, &[(1, 2), (2, 3)]).rows().to_vec());
        let q = [1, 0, 3, 2];
        let p = [1, 2, 0, 3];
        let p_after_q = [2, 1, 3, 0];
        assert_eq!(
            rows.apply_morphism(&q).apply_morphism(&p),
            rows.apply_morphism(&p_after_q)
        );
    }
}
