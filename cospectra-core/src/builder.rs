//! Builder utilities for configuring cospectral searches.
//!
//! Exposes the execution strategy selection surface and the validation run
//! before a [`CospectralSearch`] is constructed.

use std::{fmt, num::NonZeroUsize, sync::Arc, time::Duration};

use tracing::warn;

use crate::{
    Result,
    canonical::{LabelerPreference, select_labeler},
    control::{CancellationToken, ProgressSink},
    error::SearchError,
    search::{CospectralSearch, SearchConfig},
};

const DEFAULT_CHUNK_SIZE: usize = 4096;
const DEFAULT_PROGRESS_INTERVAL: Duration = Duration::from_secs(5);

/// Indicates how [`CospectralSearch`] evaluates candidates.
///
/// `Auto` resolves deterministically at build time: parallel when the
/// `parallel` feature is compiled in, sequential otherwise. Both strategies
/// produce identical reports.
///
/// # Examples
/// ```
/// use cospectra_core::ExecutionStrategy;
///
/// let strategy = ExecutionStrategy::default();
/// assert_eq!(strategy, ExecutionStrategy::Auto);
/// assert_eq!(ExecutionStrategy::Sequential.as_str(), "sequential");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ExecutionStrategy {
    /// Allow the library to select a strategy automatically.
    #[default]
    Auto,
    /// Evaluate candidates on the calling thread.
    Sequential,
    /// Evaluate each chunk of candidates on the rayon thread pool.
    Parallel,
}

impl ExecutionStrategy {
    /// Returns a stable lowercase label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Sequential => "sequential",
            Self::Parallel => "parallel",
        }
    }

    /// Reports whether the parallel strategy is compiled into this build.
    #[must_use]
    pub const fn parallel_available() -> bool {
        cfg!(feature = "parallel")
    }

    fn resolve(self) -> Result<Self> {
        match self {
            Self::Auto if Self::parallel_available() => Ok(Self::Parallel),
            Self::Auto | Self::Sequential => Ok(Self::Sequential),
            Self::Parallel if Self::parallel_available() => Ok(Self::Parallel),
            Self::Parallel => Err(SearchError::BackendUnavailable { requested: self }),
        }
    }
}

/// Configures and constructs [`CospectralSearch`] instances.
///
/// # Examples
/// ```
/// use std::time::Duration;
///
/// use cospectra_core::{ExecutionStrategy, LabelerPreference, SearchBuilder};
///
/// let search = SearchBuilder::new()
///     .with_chunk_size(256)
///     .with_labeler(LabelerPreference::Heuristic)
///     .with_execution_strategy(ExecutionStrategy::Sequential)
///     .with_timeout(Duration::from_secs(30))
///     .build()
///     .expect("builder configuration is valid");
/// assert_eq!(search.chunk_size().get(), 256);
/// assert_eq!(search.execution_strategy(), ExecutionStrategy::Sequential);
/// ```
#[derive(Clone)]
pub struct SearchBuilder {
    chunk_size: usize,
    labeler: LabelerPreference,
    execution_strategy: ExecutionStrategy,
    candidate_limit: Option<u64>,
    timeout: Option<Duration>,
    cancellation: Option<CancellationToken>,
    progress: Option<Arc<dyn ProgressSink>>,
    progress_interval: Duration,
}

impl fmt::Debug for SearchBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchBuilder")
            .field("chunk_size", &self.chunk_size)
            .field("labeler", &self.labeler)
            .field("execution_strategy", &self.execution_strategy)
            .field("candidate_limit", &self.candidate_limit)
            .field("timeout", &self.timeout)
            .field("cancellation", &self.cancellation)
            .field("progress", &self.progress.is_some())
            .field("progress_interval", &self.progress_interval)
            .finish()
    }
}

impl Default for SearchBuilder {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            labeler: LabelerPreference::Auto,
            execution_strategy: ExecutionStrategy::Auto,
            candidate_limit: None,
            timeout: None,
            cancellation: None,
            progress: None,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
        }
    }
}

impl SearchBuilder {
    /// Creates a builder populated with default parameters.
    ///
    /// # Examples
    /// ```
    /// use cospectra_core::{ExecutionStrategy, LabelerPreference, SearchBuilder};
    ///
    /// let builder = SearchBuilder::new();
    /// assert_eq!(builder.chunk_size(), 4096);
    /// assert_eq!(builder.labeler(), LabelerPreference::Auto);
    /// assert_eq!(builder.execution_strategy(), ExecutionStrategy::Auto);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides how many candidates are evaluated per batch.
    #[must_use]
    pub fn with_chunk_size(mut self, size: usize) -> Self {
        self.chunk_size = size;
        self
    }

    /// Returns the configured chunk size.
    #[must_use]
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Chooses the canonical labeling backend.
    #[must_use]
    pub fn with_labeler(mut self, preference: LabelerPreference) -> Self {
        self.labeler = preference;
        self
    }

    /// Returns the configured labeler preference.
    #[must_use]
    pub fn labeler(&self) -> LabelerPreference {
        self.labeler
    }

    /// Sets the execution strategy to use when running searches.
    #[must_use]
    pub fn with_execution_strategy(mut self, strategy: ExecutionStrategy) -> Self {
        self.execution_strategy = strategy;
        self
    }

    /// Returns the currently configured execution strategy.
    #[must_use]
    pub fn execution_strategy(&self) -> ExecutionStrategy {
        self.execution_strategy
    }

    /// Stops each run after `limit` candidates, marking it truncated when
    /// the enumeration is larger.
    #[must_use]
    pub fn with_candidate_limit(mut self, limit: u64) -> Self {
        self.candidate_limit = Some(limit);
        self
    }

    /// Stops each run once `timeout` has elapsed since it started.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Shares `token` with the search so another thread can stop it.
    ///
    /// Without a token the search creates its own, available through
    /// [`CospectralSearch::cancellation_token`].
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Registers a sink notified after every evaluated chunk.
    #[must_use]
    pub fn with_progress_sink(mut self, sink: Arc<dyn ProgressSink>) -> Self {
        self.progress = Some(sink);
        self
    }

    /// Sets the minimum spacing between `info` progress events.
    #[must_use]
    pub fn with_progress_interval(mut self, interval: Duration) -> Self {
        self.progress_interval = interval;
        self
    }

    /// Validates the configuration and constructs a [`CospectralSearch`].
    ///
    /// The labeler preference is resolved here: when the certified backend
    /// is requested but not compiled in, the search falls back to the
    /// heuristic backend and every report it produces carries
    /// [`crate::SearchWarning::CanonicalBackendUnavailable`].
    ///
    /// # Errors
    /// Returns [`SearchError::InvalidChunkSize`] when the chunk size is zero
    /// and [`SearchError::BackendUnavailable`] when
    /// [`ExecutionStrategy::Parallel`] is requested without the `parallel`
    /// feature.
    ///
    /// # Examples
    /// ```
    /// use cospectra_core::{SearchBuilder, SearchError};
    ///
    /// let err = SearchBuilder::new().with_chunk_size(0).build().expect_err("zero chunks");
    /// assert!(matches!(err, SearchError::InvalidChunkSize { got: 0 }));
    /// ```
    pub fn build(self) -> Result<CospectralSearch> {
        let chunk_size = NonZeroUsize::new(self.chunk_size).ok_or(SearchError::InvalidChunkSize {
            got: self.chunk_size,
        })?;
        let strategy = self.execution_strategy.resolve()?;
        let (labeler, fallback) = select_labeler(self.labeler);
        if let Some(warning) = &fallback {
            warn!(code = %warning.code(), preference = ?self.labeler, "{warning}");
        }

        Ok(CospectralSearch::new(SearchConfig {
            chunk_size,
            labeler,
            fallback,
            strategy,
            candidate_limit: self.candidate_limit,
            timeout: self.timeout,
            cancellation: self.cancellation.unwrap_or_default(),
            progress: self.progress,
            progress_interval: self.progress_interval,
        }))
    }
}
