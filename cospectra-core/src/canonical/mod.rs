//! Canonical keys for isomorphism-class detection.
//!
//! Two backends implement [`CanonicalLabeler`]:
//!
//! - [`CertifiedLabeler`] (feature `certified`) derives an exact canonical
//!   form with the `canonical-form` crate. Equal keys mean isomorphic
//!   graphs.
//! - [`HeuristicLabeler`] hashes Weisfeiler–Lehman colour refinement. It is
//!   cheap but can merge non-isomorphic graphs.
//!
//! The backend is chosen once per search by [`select_labeler`].

#[cfg(feature = "certified")]
mod certified;
mod heuristic;

use std::sync::Arc;

#[cfg(feature = "certified")]
pub use self::certified::CertifiedLabeler;
pub use self::heuristic::HeuristicLabeler;

use crate::{error::SearchWarning, graph::Graph};

/// Comparable, hashable value identifying an isomorphism class.
///
/// Keys from different backends never compare equal.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CanonicalKey {
    /// Adjacency rows of the canonical form; bijective with isomorphism
    /// classes.
    Certified(Vec<u32>),
    /// Refinement hash; isomorphic graphs agree but collisions are possible.
    Heuristic(u64),
}

/// Identifies which backend produced a key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LabelerKind {
    /// Exact canonical form.
    Certified,
    /// Colour-refinement hash.
    Heuristic,
}

impl LabelerKind {
    /// Returns a stable lowercase label for logs and reports.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Certified => "certified",
            Self::Heuristic => "heuristic",
        }
    }
}

/// Caller preference for the canonical backend.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LabelerPreference {
    /// Use the certified backend when compiled in, otherwise fall back.
    #[default]
    Auto,
    /// Ask for the certified backend; falls back with a warning when it is
    /// not compiled in.
    Certified,
    /// Always use the heuristic backend.
    Heuristic,
}

/// Produces canonical keys for graphs.
///
/// Implementations must be pure functions of graph structure: every vertex
/// relabelling of a graph yields the same key.
pub trait CanonicalLabeler: Send + Sync {
    /// Identifies the backend.
    fn kind(&self) -> LabelerKind;

    /// Returns the key of `graph`.
    fn key(&self, graph: &Graph) -> CanonicalKey;
}

/// Reports whether the certified backend is compiled into this build.
#[must_use]
pub const fn certified_available() -> bool {
    cfg!(feature = "certified")
}

/// Resolves `preference` against the backends available in this build.
///
/// Returns the labeler together with a warning when a certified backend was
/// wanted but is missing.
///
/// # Examples
/// ```
/// use cospectra_core::{LabelerKind, LabelerPreference, select_labeler};
///
/// let (labeler, warning) = select_labeler(LabelerPreference::Heuristic);
/// assert_eq!(labeler.kind(), LabelerKind::Heuristic);
/// assert!(warning.is_none());
/// ```
#[must_use]
pub fn select_labeler(
    preference: LabelerPreference,
) -> (Arc<dyn CanonicalLabeler>, Option<SearchWarning>) {
    match preference {
        LabelerPreference::Heuristic => (Arc::new(HeuristicLabeler::default()), None),
        LabelerPreference::Auto | LabelerPreference::Certified => certified_or_fallback(),
    }
}

#[cfg(feature = "certified")]
fn certified_or_fallback() -> (Arc<dyn CanonicalLabeler>, Option<SearchWarning>) {
    (Arc::new(CertifiedLabeler), None)
}

#[cfg(not(feature = "certified"))]
fn certified_or_fallback() -> (Arc<dyn CanonicalLabeler>, Option<SearchWarning>) {
    (
        Arc::new(HeuristicLabeler::default()),
        Some(SearchWarning::CanonicalBackendUnavailable),
    )
}
