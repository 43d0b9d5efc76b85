//! Search reports.
//!
//! A [`SearchReport`] always exists, whatever happened during the run: the
//! [`SearchStatus`] distinguishes an exhaustive search, a truncated one, and a
//! request rejected before any candidate was examined.

use std::{fmt, time::Duration};

use crate::{
    builder::ExecutionStrategy,
    canonical::LabelerKind,
    error::{SearchError, SearchWarning},
    graph::Graph,
    isomorphism::Reduction,
    spectrum::Spectrum,
};

/// Graphs sharing one spectrum, confirmed pairwise non-isomorphic.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CospectralSet {
    spectrum: Spectrum,
    graphs: Vec<Graph>,
}

impl CospectralSet {
    /// Returns the shared spectrum.
    #[must_use]
    pub fn spectrum(&self) -> &Spectrum {
        &self.spectrum
    }

    /// Returns the members in enumeration order.
    #[must_use]
    pub fn graphs(&self) -> &[Graph] {
        &self.graphs
    }

    /// Returns the number of members; always at least two.
    #[must_use]
    pub fn len(&self) -> usize {
        self.graphs.len()
    }

    /// Reports whether the set has no members. Never true for reported sets.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.graphs.is_empty()
    }
}

/// Why a search stopped before exhausting its candidates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TruncationReason {
    /// The [`crate::CancellationToken`] was triggered.
    Cancelled,
    /// The configured timeout elapsed.
    TimedOut,
    /// The configured candidate limit was reached.
    CandidateLimit,
}

impl TruncationReason {
    /// Returns a stable lowercase label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cancelled => "cancelled",
            Self::TimedOut => "timed_out",
            Self::CandidateLimit => "candidate_limit",
        }
    }
}

impl fmt::Display for TruncationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a search run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchStatus {
    /// Every candidate was processed; an empty set list means none exist.
    Complete,
    /// The run stopped early. Sets were derived only from the first
    /// `processed` candidates and may be incomplete.
    Truncated {
        /// Candidates processed before stopping.
        processed: u64,
        /// Candidates in the full enumeration.
        total: u64,
        /// What stopped the run.
        reason: TruncationReason,
    },
    /// The parameters were rejected; no candidate was examined.
    Rejected(SearchError),
}

impl SearchStatus {
    /// Returns a stable lowercase label.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Complete => "complete",
            Self::Truncated { .. } => "truncated",
            Self::Rejected(_) => "rejected",
        }
    }

    /// Reports whether the search was exhaustive.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        matches!(self, Self::Complete)
    }

    /// Reports whether the search stopped early.
    #[must_use]
    pub const fn is_truncated(&self) -> bool {
        matches!(self, Self::Truncated { .. })
    }
}

/// Diagnostics describing how a run was carried out.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunMetadata {
    /// Canonical backend that produced the keys.
    pub labeler: LabelerKind,
    /// Resolved execution strategy; never [`ExecutionStrategy::Auto`].
    pub strategy: ExecutionStrategy,
    /// Candidates in the full enumeration; zero for rejected runs.
    pub candidates_total: u64,
    /// Candidates evaluated and bucketed.
    pub candidates_processed: u64,
    /// Distinct spectra seen.
    pub buckets: usize,
    /// Spectra seen with at least two distinct canonical keys.
    pub multi_class_buckets: usize,
    /// Bucket entries with distinct canonical keys that the exact test found
    /// isomorphic to an earlier one. Non-zero only for a faulty backend.
    pub inconsistent_keys: u64,
    /// Exact isomorphism tests performed.
    pub isomorphism_checks: u64,
    /// Candidates whose eigensolver hit its iteration cap.
    pub unconverged: u64,
    /// Wall-clock duration of the run.
    pub elapsed: Duration,
    /// Non-fatal conditions observed.
    pub warnings: Vec<SearchWarning>,
}

impl RunMetadata {
    pub(crate) fn new(labeler: LabelerKind, strategy: ExecutionStrategy) -> Self {
        Self {
            labeler,
            strategy,
            candidates_total: 0,
            candidates_processed: 0,
            buckets: 0,
            multi_class_buckets: 0,
            inconsistent_keys: 0,
            isomorphism_checks: 0,
            unconverged: 0,
            elapsed: Duration::ZERO,
            warnings: Vec::new(),
        }
    }
}

/// Result of [`crate::CospectralSearch::run`].
///
/// # Examples
/// ```
/// use cospectra_core::SearchBuilder;
///
/// let search = SearchBuilder::new().build().expect("default configuration is valid");
/// let report = search.run(4, 6);
/// assert!(report.status().is_complete());
/// assert!(report.is_empty());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchReport {
    vertices: usize,
    edges: i64,
    status: SearchStatus,
    sets: Vec<CospectralSet>,
    metadata: RunMetadata,
}

impl SearchReport {
    /// Assembles a report from reduced buckets, keeping only those with at
    /// least two representatives. Bucket order is preserved.
    pub(crate) fn from_reduced<I>(
        vertices: usize,
        edges: i64,
        status: SearchStatus,
        reduced: I,
        metadata: RunMetadata,
    ) -> Self
    where
        I: IntoIterator<Item = (Spectrum, Reduction)>,
    {
        let sets = reduced
            .into_iter()
            .filter(|(_, reduction)| reduction.representatives.len() >= 2)
            .map(|(spectrum, reduction)| CospectralSet {
                spectrum,
                graphs: reduction.representatives,
            })
            .collect();
        Self {
            vertices,
            edges,
            status,
            sets,
            metadata,
        }
    }

    pub(crate) fn rejected(
        vertices: usize,
        edges: i64,
        error: SearchError,
        metadata: RunMetadata,
    ) -> Self {
        Self {
            vertices,
            edges,
            status: SearchStatus::Rejected(error),
            sets: Vec::new(),
            metadata,
        }
    }

    /// Returns the requested vertex count.
    #[must_use]
    pub fn vertices(&self) -> usize {
        self.vertices
    }

    /// Returns the requested edge count as supplied.
    #[must_use]
    pub fn edges(&self) -> i64 {
        self.edges
    }

    /// Returns the run status.
    #[must_use]
    pub fn status(&self) -> &SearchStatus {
        &self.status
    }

    /// Returns the cospectral sets in first-seen spectrum order.
    #[must_use]
    pub fn sets(&self) -> &[CospectralSet] {
        &self.sets
    }

    /// Returns run diagnostics.
    #[must_use]
    pub fn metadata(&self) -> &RunMetadata {
        &self.metadata
    }

    /// Reports whether no cospectral set was found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }
}
