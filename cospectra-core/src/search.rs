//! Search orchestration.
//!
//! Candidates are drawn from the enumerator in fixed-size chunks. Each chunk
//! is evaluated (spectrum and canonical key per graph) either on the calling
//! thread or on the rayon pool; the ordered collect keeps enumeration order,
//! so a single writer fills the buckets identically under both strategies.
//! Buckets are reduced and reported once the enumeration ends or is
//! truncated.

use std::{
    fmt,
    num::NonZeroUsize,
    sync::Arc,
    time::{Duration, Instant},
};

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::{Span, debug, field, info, instrument, warn};

use crate::{
    builder::ExecutionStrategy,
    bucket::SpectralBuckets,
    canonical::{CanonicalKey, CanonicalLabeler, LabelerKind},
    control::{CancellationToken, Progress, ProgressSink},
    enumerate::GraphEnumerator,
    error::SearchWarning,
    graph::Graph,
    isomorphism::IsomorphismReducer,
    report::{RunMetadata, SearchReport, SearchStatus, TruncationReason},
    spectrum::{Spectrum, SpectrumComputer},
};

/// Validated configuration handed over by [`crate::SearchBuilder::build`].
pub(crate) struct SearchConfig {
    pub(crate) chunk_size: NonZeroUsize,
    pub(crate) labeler: Arc<dyn CanonicalLabeler>,
    pub(crate) fallback: Option<SearchWarning>,
    pub(crate) strategy: ExecutionStrategy,
    pub(crate) candidate_limit: Option<u64>,
    pub(crate) timeout: Option<Duration>,
    pub(crate) cancellation: CancellationToken,
    pub(crate) progress: Option<Arc<dyn ProgressSink>>,
    pub(crate) progress_interval: Duration,
}

/// Entry point for finding cospectral, non-isomorphic graphs.
///
/// A search is reusable: every call to [`Self::run`] starts from empty
/// buckets.
///
/// # Examples
/// ```
/// use cospectra_core::{SearchBuilder, SearchStatus};
///
/// let search = SearchBuilder::new().build().expect("builder must succeed");
/// let report = search.run(5, 4);
/// assert_eq!(report.status(), &SearchStatus::Complete);
/// assert_eq!(report.sets().len(), 1);
/// assert_eq!(report.sets()[0].len(), 2);
/// ```
pub struct CospectralSearch {
    config: SearchConfig,
    spectra: SpectrumComputer,
}

impl fmt::Debug for CospectralSearch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CospectralSearch")
            .field("chunk_size", &self.config.chunk_size)
            .field("labeler", &self.config.labeler.kind())
            .field("strategy", &self.config.strategy)
            .field("candidate_limit", &self.config.candidate_limit)
            .field("timeout", &self.config.timeout)
            .finish_non_exhaustive()
    }
}

/// Per-candidate output of the parallelisable stage.
struct Evaluated {
    graph: Graph,
    spectrum: Spectrum,
    key: CanonicalKey,
    converged: bool,
}

impl CospectralSearch {
    pub(crate) fn new(config: SearchConfig) -> Self {
        Self {
            config,
            spectra: SpectrumComputer::default(),
        }
    }

    /// Returns the number of candidates evaluated per batch.
    #[must_use]
    pub fn chunk_size(&self) -> NonZeroUsize {
        self.config.chunk_size
    }

    /// Returns the canonical backend in use.
    #[must_use]
    pub fn labeler_kind(&self) -> LabelerKind {
        self.config.labeler.kind()
    }

    /// Returns the resolved execution strategy; never
    /// [`ExecutionStrategy::Auto`].
    #[must_use]
    pub fn execution_strategy(&self) -> ExecutionStrategy {
        self.config.strategy
    }

    /// Returns the per-run candidate budget, if any.
    #[must_use]
    pub fn candidate_limit(&self) -> Option<u64> {
        self.config.candidate_limit
    }

    /// Returns the per-run timeout, if any.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.config.timeout
    }

    /// Returns the token that stops this search. Cancellation is sticky:
    /// once triggered, later runs stop before their first candidate.
    #[must_use]
    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.config.cancellation
    }

    /// Searches all labeled graphs with `vertices` vertices and `edges` edges.
    ///
    /// This never fails: impossible parameters produce a report whose status
    /// is [`SearchStatus::Rejected`], and early stops produce
    /// [`SearchStatus::Truncated`] with sets drawn only from the candidates
    /// actually processed.
    ///
    /// # Examples
    /// ```
    /// use cospectra_core::{SearchBuilder, SearchError, SearchStatus};
    ///
    /// let search = SearchBuilder::new().build().expect("builder must succeed");
    /// let report = search.run(4, -1);
    /// assert!(matches!(
    ///     report.status(),
    ///     SearchStatus::Rejected(SearchError::InvalidParameters { max_edges: 6, .. })
    /// ));
    /// assert_eq!(report.metadata().candidates_processed, 0);
    /// ```
    #[instrument(
        name = "core.search",
        skip(self),
        fields(
            labeler = self.config.labeler.kind().as_str(),
            strategy = self.config.strategy.as_str(),
            status = field::Empty,
        ),
    )]
    pub fn run(&self, vertices: usize, edges: i64) -> SearchReport {
        let started = Instant::now();
        let mut metadata = RunMetadata::new(self.config.labeler.kind(), self.config.strategy);
        metadata.warnings.extend(self.config.fallback.clone());

        let enumerator = match GraphEnumerator::new(vertices, edges) {
            Ok(enumerator) => enumerator,
            Err(error) => {
                warn!(code = %error.code(), %error, "search rejected");
                Span::current().record("status", "rejected");
                metadata.elapsed = started.elapsed();
                return SearchReport::rejected(vertices, edges, error, metadata);
            }
        };

        let total = enumerator.candidate_count();
        let deadline = self
            .config
            .timeout
            .and_then(|timeout| started.checked_add(timeout));
        let budget = self
            .config
            .candidate_limit
            .map_or(total, |limit| limit.min(total));

        let mut buckets = SpectralBuckets::default();
        let mut candidates = enumerator.iter();
        let mut processed = 0_u64;
        let mut truncation = None;
        let mut last_progress = started;

        while truncation.is_none() {
            if processed == budget {
                if budget < total {
                    truncation = Some(TruncationReason::CandidateLimit);
                }
                break;
            }
            let room = usize::try_from(budget - processed).unwrap_or(usize::MAX);
            let chunk: Vec<Graph> = candidates
                .by_ref()
                .take(room.min(self.config.chunk_size.get()))
                .collect();
            if chunk.is_empty() {
                break;
            }

            for outcome in self.evaluate(chunk, deadline) {
                let Some(evaluated) = outcome else {
                    truncation = Some(
                        self.interruption(deadline)
                            .unwrap_or(TruncationReason::Cancelled),
                    );
                    break;
                };
                if !evaluated.converged {
                    metadata.unconverged += 1;
                }
                buckets.insert(evaluated.spectrum, evaluated.key, evaluated.graph, processed);
                processed += 1;
            }

            let progress = Progress { processed, total };
            if let Some(sink) = &self.config.progress {
                sink.report(progress);
            }
            if last_progress.elapsed() >= self.config.progress_interval {
                info!(processed, total, buckets = buckets.len(), "search progress");
                last_progress = Instant::now();
            }
        }

        metadata.candidates_total = total;
        metadata.candidates_processed = processed;
        metadata.buckets = buckets.len();
        metadata.multi_class_buckets = buckets.multi_class_count();

        let reducer = IsomorphismReducer;
        let mut reduced = Vec::with_capacity(metadata.multi_class_buckets);
        for bucket in buckets.into_buckets() {
            if bucket.len() < 2 {
                continue;
            }
            let (spectrum, entries) = bucket.into_parts();
            let keys = entries.len();
            let reduction = reducer.reduce(entries);
            debug!(
                spectrum = %spectrum,
                keys,
                representatives = reduction.representatives.len(),
                discarded = reduction.discarded,
                "bucket reduced"
            );
            metadata.inconsistent_keys += reduction.discarded;
            metadata.isomorphism_checks += reduction.checks;
            reduced.push((spectrum, reduction));
        }

        if metadata.unconverged > 0 {
            let warning = SearchWarning::NumericalInstability {
                count: metadata.unconverged,
            };
            warn!(code = %warning.code(), "{warning}");
            metadata.warnings.push(warning);
        }
        if metadata.inconsistent_keys > 0 {
            let warning = SearchWarning::KeyInconsistency {
                count: metadata.inconsistent_keys,
            };
            warn!(code = %warning.code(), "{warning}");
            metadata.warnings.push(warning);
        }

        let status = match truncation {
            None => SearchStatus::Complete,
            Some(reason) => SearchStatus::Truncated {
                processed,
                total,
                reason,
            },
        };
        Span::current().record("status", status.as_str());
        metadata.elapsed = started.elapsed();
        record_metrics(&metadata);

        let report = SearchReport::from_reduced(vertices, edges, status, reduced, metadata);
        info!(
            processed,
            total,
            sets = report.sets().len(),
            status = report.status().as_str(),
            "search finished"
        );
        report
    }

    /// Evaluates a chunk in enumeration order. Candidates started after an
    /// interruption yield `None`.
    fn evaluate(&self, chunk: Vec<Graph>, deadline: Option<Instant>) -> Vec<Option<Evaluated>> {
        match self.config.strategy {
            #[cfg(feature = "parallel")]
            ExecutionStrategy::Parallel => chunk
                .into_par_iter()
                .map(|graph| self.evaluate_one(graph, deadline))
                .collect(),
            _ => chunk
                .into_iter()
                .map(|graph| self.evaluate_one(graph, deadline))
                .collect(),
        }
    }

    fn evaluate_one(&self, graph: Graph, deadline: Option<Instant>) -> Option<Evaluated> {
        if self.interruption(deadline).is_some() {
            return None;
        }
        let (spectrum, convergence) = self.spectra.compute_checked(&graph);
        let key = self.config.labeler.key(&graph);
        Some(Evaluated {
            graph,
            spectrum,
            key,
            converged: convergence.is_converged(),
        })
    }

    fn interruption(&self, deadline: Option<Instant>) -> Option<TruncationReason> {
        if self.config.cancellation.is_cancelled() {
            return Some(TruncationReason::Cancelled);
        }
        deadline
            .is_some_and(|deadline| Instant::now() >= deadline)
            .then_some(TruncationReason::TimedOut)
    }
}

#[cfg(feature = "metrics")]
fn record_metrics(metadata: &RunMetadata) {
    metrics::counter!("cospectra_candidates_processed").increment(metadata.candidates_processed);
    metrics::counter!("cospectra_isomorphism_checks").increment(metadata.isomorphism_checks);
    metrics::histogram!("cospectra_search_seconds").record(metadata.elapsed.as_secs_f64());
}

#[cfg(not(feature = "metrics"))]
fn record_metrics(_metadata: &RunMetadata) {}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::{SearchBuilder, canonical::LabelerPreference};

    fn sequential() -> SearchBuilder {
        SearchBuilder::new().with_execution_strategy(ExecutionStrategy::Sequential)
    }

    #[test]
    fn cancelled_token_truncates_before_any_candidate() {
        let search = sequential().build().expect("valid configuration");
        search.cancellation_token().cancel();
        let report = search.run(5, 4);
        assert_eq!(
            report.status(),
            &SearchStatus::Truncated {
                processed: 0,
                total: 210,
                reason: TruncationReason::Cancelled,
            }
        );
        assert!(report.is_empty());
    }

    #[test]
    fn zero_timeout_truncates() {
        let search = sequential()
            .with_timeout(Duration::ZERO)
            .build()
            .expect("valid configuration");
        let report = search.run(5, 4);
        assert!(matches!(
            report.status(),
            SearchStatus::Truncated {
                reason: TruncationReason::TimedOut,
                ..
            }
        ));
    }

    #[test]
    fn limit_equal_to_total_is_complete() {
        let search = sequential()
            .with_candidate_limit(210)
            .build()
            .expect("valid configuration");
        let report = search.run(5, 4);
        assert!(report.status().is_complete());
        assert_eq!(report.metadata().candidates_processed, 210);
    }

    /// Keys every labeled graph separately, so isomorphic relabellings
    /// land under distinct keys.
    struct LabelledEdgeKeys;

    impl CanonicalLabeler for LabelledEdgeKeys {
        fn kind(&self) -> LabelerKind {
            LabelerKind::Heuristic
        }

        fn key(&self, graph: &Graph) -> CanonicalKey {
            CanonicalKey::Certified(graph.rows().to_vec())
        }
    }

    fn search_with(labeler: Arc<dyn CanonicalLabeler>) -> CospectralSearch {
        CospectralSearch::new(SearchConfig {
            chunk_size: NonZeroUsize::MIN,
            labeler,
            fallback: None,
            strategy: ExecutionStrategy::Sequential,
            candidate_limit: None,
            timeout: None,
            cancellation: CancellationToken::new(),
            progress: None,
            progress_interval: Duration::from_secs(5),
        })
    }

    #[test]
    fn split_isomorphism_classes_raise_key_inconsistency() {
        let report = search_with(Arc::new(LabelledEdgeKeys)).run(5, 4);
        let metadata = report.metadata();
        assert!(report.status().is_complete());
        // The exact test still reduces each bucket to one graph per class.
        assert_eq!(report.sets().len(), 1);
        assert_eq!(report.sets()[0].len(), 2);
        assert!(metadata.inconsistent_keys > 0);
        assert!(metadata.warnings.contains(&SearchWarning::KeyInconsistency {
            count: metadata.inconsistent_keys,
        }));
    }

    #[test]
    fn sound_backends_never_report_key_inconsistency() {
        for labeler in [LabelerPreference::Auto, LabelerPreference::Heuristic] {
            let report = sequential()
                .with_labeler(labeler)
                .build()
                .expect("valid configuration")
                .run(6, 6);
            let metadata = report.metadata();
            assert_eq!(metadata.inconsistent_keys, 0);
            assert!(!metadata.warnings.iter().any(|warning| matches!(
                warning,
                SearchWarning::KeyInconsistency { .. }
            )));
        }
    }

    #[test]
    fn progress_sink_sees_every_chunk() {
        let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
        let sink_seen = Arc::clone(&seen);
        let search = sequential()
            .with_chunk_size(64)
            .with_progress_sink(Arc::new(move |progress: Progress| {
                sink_seen
                    .lock()
                    .expect("mutex poisoned")
                    .push(progress.processed);
            }))
            .build()
            .expect("valid configuration");
        search.run(5, 4);
        assert_eq!(*seen.lock().expect("mutex poisoned"), vec![64, 128, 192, 210]);
    }
}
