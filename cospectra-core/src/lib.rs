//! Cospectra core library.
//!
//! Finds groups of simple graphs that share an adjacency spectrum yet are
//! pairwise non-isomorphic. Configure a [`CospectralSearch`] with
//! [`SearchBuilder`] and call [`CospectralSearch::run`].
#![cfg_attr(docsrs, feature(doc_cfg))]

mod bucket;
mod builder;
mod canonical;
mod control;
mod enumerate;
mod error;
mod graph;
mod isomorphism;
mod report;
mod search;
mod spectrum;

#[cfg(feature = "certified")]
#[cfg_attr(docsrs, doc(cfg(feature = "certified")))]
pub use crate::canonical::CertifiedLabeler;
pub use crate::{
    bucket::{Bucket, BucketEntry, SpectralBuckets},
    builder::{ExecutionStrategy, SearchBuilder},
    canonical::{
        CanonicalKey, CanonicalLabeler, HeuristicLabeler, LabelerKind, LabelerPreference,
        certified_available, select_labeler,
    },
    control::{CancellationToken, Progress, ProgressSink},
    enumerate::{Candidates, GraphEnumerator, binomial, max_edges},
    error::{
        GraphError, GraphErrorCode, Result, SearchError, SearchErrorCode, SearchWarning,
        SearchWarningCode,
    },
    graph::{Graph, MAX_VERTICES},
    isomorphism::{IsomorphismReducer, Reduction, are_isomorphic},
    report::{CospectralSet, RunMetadata, SearchReport, SearchStatus, TruncationReason},
    search::CospectralSearch,
    spectrum::{Convergence, SPECTRUM_DECIMALS, Spectrum, SpectrumComputer},
};
