//! Adjacency spectra.
//!
//! Eigenvalues come from `nalgebra`'s symmetric QR solver over the dense
//! adjacency matrix. The solver is deterministic, so identical matrices
//! always produce bit-identical output. Values are rounded to
//! [`SPECTRUM_DECIMALS`] places and stored as fixed-point integers, which
//! makes equality and hashing exact.

use std::fmt;

use nalgebra::{DMatrix, SymmetricEigen};

use crate::graph::Graph;

/// Number of decimal places kept in a [`Spectrum`].
pub const SPECTRUM_DECIMALS: u32 = 8;

const SCALE: f64 = 100_000_000.0;
const DEFAULT_MAX_ITERATIONS: usize = 1_000;

/// Ascending, rounded adjacency eigenvalues of a graph.
///
/// # Examples
/// ```
/// use cospectra_core::{Graph, SpectrumComputer};
///
/// let edge = Graph::try_new(2, [(0, 1)]).expect("valid edge");
/// let spectrum = SpectrumComputer::default().compute(&edge);
/// assert_eq!(spectrum.values(), vec![-1.0, 1.0]);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Spectrum {
    scaled: Vec<i64>,
}

impl Spectrum {
    /// Rounds and sorts raw eigenvalues into a spectrum.
    #[must_use]
    pub fn from_eigenvalues(values: &[f64]) -> Self {
        #[expect(
            clippy::cast_possible_truncation,
            clippy::float_arithmetic,
            reason = "adjacency eigenvalues are bounded by the vertex count"
        )]
        let mut scaled: Vec<i64> = values
            .iter()
            .map(|value| (value * SCALE).round() as i64)
            .collect();
        scaled.sort_unstable();
        Self { scaled }
    }

    /// Returns the eigenvalues as floating-point numbers, ascending.
    #[must_use]
    pub fn values(&self) -> Vec<f64> {
        #[expect(
            clippy::cast_precision_loss,
            clippy::float_arithmetic,
            reason = "scaled eigenvalues stay far below 2^52"
        )]
        let values = self.scaled.iter().map(|&value| value as f64 / SCALE).collect();
        values
    }

    /// Returns the fixed-point representation (eigenvalue × 10⁸).
    #[must_use]
    pub fn scaled(&self) -> &[i64] {
        &self.scaled
    }

    /// Returns the number of eigenvalues.
    #[must_use]
    pub fn len(&self) -> usize {
        self.scaled.len()
    }

    /// Reports whether the spectrum is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scaled.is_empty()
    }
}

impl fmt::Display for Spectrum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (index, value) in self.values().into_iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            let text = format!("{value:.8}");
            let trimmed = text.trim_end_matches('0').trim_end_matches('.');
            f.write_str(trimmed)?;
        }
        f.write_str("]")
    }
}

/// Whether the eigensolver converged within its iteration cap.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Convergence {
    /// The symmetric QR iteration reached tolerance.
    Converged,
    /// The iteration cap was hit first; the values come from an uncapped
    /// rerun and may be imprecise.
    IterationLimit,
}

impl Convergence {
    /// Reports whether tolerance was reached.
    #[must_use]
    pub const fn is_converged(self) -> bool {
        matches!(self, Self::Converged)
    }
}

/// Computes rounded adjacency spectra.
#[derive(Clone, Copy, Debug)]
pub struct SpectrumComputer {
    max_iterations: usize,
    tolerance: f64,
}

impl Default for SpectrumComputer {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            tolerance: f64::EPSILON,
        }
    }
}

impl SpectrumComputer {
    /// Creates a computer with an explicit iteration cap and tolerance.
    ///
    /// A cap of zero lets the solver iterate until it converges.
    #[must_use]
    pub const fn new(max_iterations: usize, tolerance: f64) -> Self {
        Self {
            max_iterations,
            tolerance,
        }
    }

    /// Returns the spectrum of `graph`, ignoring convergence status.
    #[must_use]
    pub fn compute(&self, graph: &Graph) -> Spectrum {
        self.compute_checked(graph).0
    }

    /// Returns the spectrum of `graph` together with the solver's convergence
    /// status.
    ///
    /// Edgeless graphs, including the empty and single-vertex graphs, skip
    /// the solver: their spectrum is all zeros.
    #[must_use]
    pub fn compute_checked(&self, graph: &Graph) -> (Spectrum, Convergence) {
        let n = graph.vertex_count();
        if graph.edge_count() == 0 {
            return (Spectrum::from_eigenvalues(&vec![0.0; n]), Convergence::Converged);
        }
        let matrix = DMatrix::from_row_slice(n, n, &graph.adjacency_matrix());
        match SymmetricEigen::try_new(matrix.clone(), self.tolerance, self.max_iterations) {
            Some(eigen) => (
                Spectrum::from_eigenvalues(eigen.eigenvalues.as_slice()),
                Convergence::Converged,
            ),
            None => {
                let values = matrix.symmetric_eigenvalues();
                (
                    Spectrum::from_eigenvalues(values.as_slice()),
                    Convergence::IterationLimit,
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    fn spectrum_of(vertices: usize, edges: &[(usize, usize)]) -> Vec<f64> {
        let graph = Graph::try_new(vertices, edges.iter().copied()).expect("valid graph");
        SpectrumComputer::default().compute(&graph).values()
    }

    #[test]
    fn empty_graph_has_zero_spectrum() {
        assert_eq!(spectrum_of(4, &[]), vec![0.0; 4]);
    }

    #[test]
    fn complete_graph_spectrum() {
        let k4 = [(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)];
        assert_eq!(spectrum_of(4, &k4), vec![-1.0, -1.0, -1.0, 3.0]);
    }

    #[rstest]
    #[case::star(&[(0, 1), (0, 2), (0, 3), (0, 4)])]
    #[case::square_plus_point(&[(0, 1), (1, 2), (2, 3), (0, 3)])]
    fn saltire_pair_shares_spectrum(#[case] edges: &[(usize, usize)]) {
        assert_eq!(spectrum_of(5, edges), vec![-2.0, 0.0, 0.0, 0.0, 2.0]);
    }

    #[test]
    fn path_spectrum_matches_closed_form() {
        // P3 has eigenvalues -√2, 0, √2.
        let values = spectrum_of(3, &[(0, 1), (1, 2)]);
        let root_two = (2.0_f64.sqrt() * SCALE).round() / SCALE;
        assert_eq!(values, vec![-root_two, 0.0, root_two]);
    }

    #[test]
    fn identical_matrices_are_bit_identical() {
        let graph = Graph::try_new(6, [(0, 1), (1, 2), (2, 3), (3, 4), (4, 5), (5, 0), (0, 3)])
            .expect("valid graph");
        let computer = SpectrumComputer::default();
        let (first, convergence) = computer.compute_checked(&graph);
        assert!(convergence.is_converged());
        assert_eq!(first, computer.compute(&graph));
    }

    #[test]
    fn exhausted_iteration_cap_is_reported() {
        let cycle = Graph::try_new(5, [(0, 1), (1, 2), (2, 3), (3, 4), (4, 0)])
            .expect("valid graph");
        let (capped, convergence) = SpectrumComputer::new(1, 0.0).compute_checked(&cycle);
        assert_eq!(convergence, Convergence::IterationLimit);
        assert_eq!(capped, SpectrumComputer::default().compute(&cycle));
    }

    #[test]
    fn single_vertex_has_zero_spectrum() {
        let point = Graph::try_new(1, std::iter::empty()).expect("valid graph");
        let (spectrum, convergence) = SpectrumComputer::default().compute_checked(&point);
        assert!(convergence.is_converged());
        assert_eq!(spectrum.values(), vec![0.0]);
    }

    #[test]
    fn display_trims_trailing_zeros() {
        let spectrum = Spectrum::from_eigenvalues(&[2.0, -2.0, 0.5, 0.0]);
        assert_eq!(spectrum.to_string(), "[-2, 0, 0.5, 2]");
    }

    #[test]
    fn rounding_absorbs_noise() {
        let noisy = Spectrum::from_eigenvalues(&[1.000_000_000_1, -1e-15]);
        let clean = Spectrum::from_eigenvalues(&[0.0, 1.0]);
        assert_eq!(noisy, clean);
    }
}
