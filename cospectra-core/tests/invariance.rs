//! Relabelling invariance of spectra, canonical keys and the exact test.

mod common;

use std::collections::HashMap;

use common::{all_graphs, graph, search};
use cospectra_core::{
    CanonicalKey, CanonicalLabeler, ExecutionStrategy, Graph, HeuristicLabeler,
    IsomorphismReducer, LabelerPreference, SpectrumComputer, are_isomorphic, max_edges,
    select_labeler,
};
use cospectra_test_support::{graphs, proptest_profile::ProptestRunProfile};
use proptest::{prelude::*, test_runner::Config as ProptestConfig};
use rstest::rstest;
use test_strategy::Arbitrary;

fn proptest_config(default_cases: u32) -> ProptestConfig {
    ProptestConfig {
        cases: ProptestRunProfile::load(default_cases).cases(),
        ..ProptestConfig::default()
    }
}

/// Edge density class for generated graphs.
#[derive(Clone, Copy, Debug, Arbitrary)]
enum Density {
    #[weight(1)]
    Sparse,
    #[weight(2)]
    Medium,
    #[weight(1)]
    Dense,
}

impl Density {
    fn edges(self, vertices: usize) -> usize {
        let max = max_edges(vertices);
        match self {
            Self::Sparse => max / 4,
            Self::Medium => max / 2,
            Self::Dense => max - max / 4,
        }
    }
}

/// A random graph and a random relabelling of it.
#[derive(Clone, Debug, Arbitrary)]
struct RelabelCase {
    #[strategy(1_usize..=10)]
    vertices: usize,
    density: Density,
    graph_seed: u64,
    permutation_seed: u64,
}

impl RelabelCase {
    fn graphs(&self) -> (Graph, Graph) {
        let edges = graphs::random_edges(
            self.vertices,
            self.density.edges(self.vertices),
            &mut graphs::seeded_rng(self.graph_seed),
        );
        let permutation =
            graphs::random_permutation(self.vertices, &mut graphs::seeded_rng(self.permutation_seed));
        let moved = graphs::relabel(&edges, &permutation);
        (graph(self.vertices, &edges), graph(self.vertices, &moved))
    }
}

fn keys(graph: &Graph) -> Vec<CanonicalKey> {
    let (preferred, _) = select_labeler(LabelerPreference::Auto);
    vec![HeuristicLabeler::default().key(graph), preferred.key(graph)]
}

#[rstest]
#[case::star(graphs::star(4))]
#[case::square(graphs::cycle(4))]
#[case::path(graphs::path(5))]
#[case::triangle(graphs::complete(3))]
fn invariants_hold_under_every_permutation(#[case] edges: Vec<(usize, usize)>) {
    let original = graph(5, &edges);
    let spectrum = SpectrumComputer::default().compute(&original);
    let expected = keys(&original);
    for permutation in graphs::all_permutations(5) {
        let moved = graph(5, &graphs::relabel(&edges, &permutation));
        assert_eq!(SpectrumComputer::default().compute(&moved), spectrum);
        assert_eq!(keys(&moved), expected, "keys differ under {permutation:?}");
        assert!(are_isomorphic(&original, &moved));
    }
}

#[rstest]
#[case(4, 11)]
#[case(5, 34)]
fn exact_test_counts_isomorphism_classes(#[case] vertices: usize, #[case] classes: usize) {
    let mut by_edges: HashMap<usize, Vec<_>> = HashMap::new();
    for candidate in all_graphs(vertices) {
        by_edges.entry(candidate.edge_count()).or_default().push(candidate);
    }
    let total: usize = by_edges
        .into_values()
        .map(|group| {
            let entries = group
                .into_iter()
                .zip(0_u64..)
                .map(|(graph, ordinal)| cospectra_core::BucketEntry {
                    key: CanonicalKey::Heuristic(ordinal),
                    graph,
                    ordinal,
                })
                .collect();
            IsomorphismReducer.reduce(entries).representatives.len()
        })
        .sum();
    assert_eq!(total, classes);
}

#[cfg(feature = "certified")]
#[rstest]
#[case(4, 11)]
#[case(5, 34)]
fn certified_keys_separate_every_class(#[case] vertices: usize, #[case] classes: usize) {
    let labeler = cospectra_core::CertifiedLabeler;
    let mut representatives: HashMap<CanonicalKey, Graph> = HashMap::new();
    for candidate in all_graphs(vertices) {
        let key = labeler.key(&candidate);
        match representatives.get(&key) {
            Some(first) => assert!(are_isomorphic(first, &candidate)),
            None => {
                representatives.insert(key, candidate);
            }
        }
    }
    assert_eq!(representatives.len(), classes);
}

#[cfg(feature = "certified")]
#[test]
fn certified_keys_split_cospectral_strongly_regular_graphs() {
    let labeler = cospectra_core::CertifiedLabeler;
    let rook = graph(16, &graphs::rook(4));
    let shrikhande = graph(16, &graphs::shrikhande());
    let computer = SpectrumComputer::default();
    assert_eq!(computer.compute(&rook), computer.compute(&shrikhande));
    assert!(!are_isomorphic(&rook, &shrikhande));
    assert_ne!(labeler.key(&rook), labeler.key(&shrikhande));
    // Colour refinement sees two 6-regular graphs and cannot tell them apart.
    assert_eq!(
        HeuristicLabeler::default().key(&rook),
        HeuristicLabeler::default().key(&shrikhande)
    );
}

#[test]
fn heuristic_and_default_searches_agree_on_small_inputs() {
    let heuristic = search(LabelerPreference::Heuristic, ExecutionStrategy::Sequential).run(5, 4);
    let preferred = search(LabelerPreference::Auto, ExecutionStrategy::Sequential).run(5, 4);
    assert_eq!(heuristic.sets(), preferred.sets());
}

proptest! {
    #![proptest_config(proptest_config(64))]

    #[test]
    fn relabelling_preserves_spectrum_and_keys(case in any::<RelabelCase>()) {
        let (original, moved) = case.graphs();
        let computer = SpectrumComputer::default();
        prop_assert_eq!(computer.compute(&original), computer.compute(&moved));
        prop_assert_eq!(keys(&original), keys(&moved));
        prop_assert!(are_isomorphic(&original, &moved));
    }

    #[test]
    fn spectra_respect_trace_identities(case in any::<RelabelCase>()) {
        let (original, _) = case.graphs();
        let values = SpectrumComputer::default().compute(&original).values();
        prop_assert_eq!(values.len(), case.vertices);
        let trace: f64 = values.iter().sum();
        let squares: f64 = values.iter().map(|value| value * value).sum();
        prop_assert!(trace.abs() < 1e-6);
        prop_assert!((squares - 2.0 * original.edge_count() as f64).abs() < 1e-5);
    }

    #[test]
    fn exact_test_agrees_with_certified_keys(
        vertices in 2_usize..=7,
        left_seed in any::<u64>(),
        right_seed in any::<u64>(),
    ) {
        let edges = max_edges(vertices) / 2;
        let left = graph(vertices, &graphs::random_edges(vertices, edges, &mut graphs::seeded_rng(left_seed)));
        let right = graph(vertices, &graphs::random_edges(vertices, edges, &mut graphs::seeded_rng(right_seed)));
        let (preferred, _) = select_labeler(LabelerPreference::Auto);
        if cospectra_core::certified_available() {
            prop_assert_eq!(are_isomorphic(&left, &right), preferred.key(&left) == preferred.key(&right));
        } else if are_isomorphic(&left, &right) {
            prop_assert_eq!(preferred.key(&left), preferred.key(&right));
        }
    }
}
