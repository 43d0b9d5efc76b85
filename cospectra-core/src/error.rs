//! Error types for the Cospectra core library.
//!
//! Defines the error and warning enums exposed by the public API together
//! with stable machine-readable codes and a convenient result alias.

use std::fmt;

use thiserror::Error;

use crate::builder::ExecutionStrategy;

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident $( { $($pattern:tt)* } )? => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this code.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this value."
            )]
            #[must_use]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(Self::$ErrVariant $( { $($pattern)* } )? => $CodeTy::$CodeVariant,)+
                }
            }
        }
    };
}

/// An error produced while constructing a [`crate::Graph`] from caller input.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum GraphError {
    /// The graph has more vertices than the adjacency representation holds.
    #[error("graphs are limited to {max} vertices (got {got})")]
    TooManyVertices {
        /// Requested vertex count.
        got: usize,
        /// Largest supported vertex count.
        max: usize,
    },
    /// An edge endpoint referenced a vertex outside `0..vertices`.
    #[error("edge ({u}, {w}) references a vertex outside 0..{vertices}")]
    VertexOutOfRange {
        /// First endpoint as supplied.
        u: usize,
        /// Second endpoint as supplied.
        w: usize,
        /// Vertex count of the graph under construction.
        vertices: usize,
    },
    /// An edge joined a vertex to itself.
    #[error("self-loop on vertex {vertex} is not allowed in a simple graph")]
    SelfLoop {
        /// Vertex carrying the loop.
        vertex: usize,
    },
    /// The same unordered pair was supplied twice.
    #[error("edge ({u}, {w}) appears more than once")]
    DuplicateEdge {
        /// Smaller endpoint of the repeated edge.
        u: usize,
        /// Larger endpoint of the repeated edge.
        w: usize,
    },
}

define_error_codes! {
    /// Stable codes describing [`GraphError`] variants.
    enum GraphErrorCode for GraphError {
        /// The graph has more vertices than supported.
        TooManyVertices => TooManyVertices { .. } => "GRAPH_TOO_MANY_VERTICES",
        /// An edge endpoint was out of range.
        VertexOutOfRange => VertexOutOfRange { .. } => "GRAPH_VERTEX_OUT_OF_RANGE",
        /// An edge joined a vertex to itself.
        SelfLoop => SelfLoop { .. } => "GRAPH_SELF_LOOP",
        /// The same unordered pair was supplied twice.
        DuplicateEdge => DuplicateEdge { .. } => "GRAPH_DUPLICATE_EDGE",
    }
}

/// Error type produced when configuring or running a cospectral search.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum SearchError {
    /// The edge count cannot be realised by a simple graph on the given
    /// vertex count.
    #[error(
        "edge count {edges} is impossible for a simple graph on {vertices} vertices (expected 0..={max_edges})"
    )]
    InvalidParameters {
        /// Requested vertex count.
        vertices: usize,
        /// Requested edge count, possibly negative.
        edges: i64,
        /// Largest edge count a simple graph on `vertices` vertices can have.
        max_edges: usize,
    },
    /// The vertex count is zero or exceeds the supported maximum.
    #[error("vertex count must be within 1..={max} (got {got})")]
    InvalidVertexCount {
        /// Requested vertex count.
        got: usize,
        /// Largest supported vertex count.
        max: usize,
    },
    /// Chunk size must be greater than zero.
    #[error("chunk_size must be at least 1 (got {got})")]
    InvalidChunkSize {
        /// The invalid chunk size supplied by the caller.
        got: usize,
    },
    /// The requested execution strategy is unavailable in the current build.
    #[error("the requested execution strategy {requested:?} is not available in this build")]
    BackendUnavailable {
        /// Strategy that could not be satisfied by the current build.
        requested: ExecutionStrategy,
    },
}

define_error_codes! {
    /// Stable codes describing [`SearchError`] variants.
    enum SearchErrorCode for SearchError {
        /// The edge count is impossible for the vertex count.
        InvalidParameters => InvalidParameters { .. } => "SEARCH_INVALID_PARAMETERS",
        /// The vertex count is out of range.
        InvalidVertexCount => InvalidVertexCount { .. } => "SEARCH_INVALID_VERTEX_COUNT",
        /// Chunk size must be greater than zero.
        InvalidChunkSize => InvalidChunkSize { .. } => "SEARCH_INVALID_CHUNK_SIZE",
        /// The requested execution strategy is unavailable in the current build.
        BackendUnavailable => BackendUnavailable { .. } => "SEARCH_BACKEND_UNAVAILABLE",
    }
}

/// Non-fatal conditions observed during a search.
///
/// Warnings never abort a run; they are carried in
/// [`crate::RunMetadata::warnings`] so callers can disclose how much trust
/// the report deserves.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum SearchWarning {
    /// The certified canonical labeler is not compiled in; keys came from the
    /// heuristic labeler and every non-isomorphism was confirmed exactly.
    #[error("certified canonical labeling unavailable; using heuristic keys with exact confirmation")]
    CanonicalBackendUnavailable,
    /// Some eigen-decompositions hit the solver's iteration cap before
    /// reaching tolerance. Their spectra were still rounded and bucketed.
    #[error("{count} spectra did not converge within the iteration cap")]
    NumericalInstability {
        /// Number of affected candidates.
        count: u64,
    },
    /// The canonical backend gave distinct keys to isomorphic graphs, which
    /// breaks its contract; the exact test merged them.
    ///
    /// The opposite failure, a heuristic key shared by non-isomorphic graphs,
    /// folds them into one bucket entry and is not detected.
    #[error("{count} bucket entries had distinct canonical keys but were isomorphic to an earlier entry")]
    KeyInconsistency {
        /// Number of discarded bucket entries.
        count: u64,
    },
}

define_error_codes! {
    /// Stable codes describing [`SearchWarning`] variants.
    enum SearchWarningCode for SearchWarning {
        /// The certified canonical labeler is not compiled in.
        CanonicalBackendUnavailable => CanonicalBackendUnavailable => "CANONICAL_BACKEND_UNAVAILABLE",
        /// Some spectra did not converge.
        NumericalInstability => NumericalInstability { .. } => "NUMERICAL_INSTABILITY",
        /// The canonical backend split an isomorphism class.
        KeyInconsistency => KeyInconsistency { .. } => "CANONICAL_KEY_INCONSISTENCY",
    }
}

/// Convenient alias for results returned by the core API.
pub type Result<T> = core::result::Result<T, SearchError>;
