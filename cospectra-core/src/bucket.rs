//! Spectral buckets.
//!
//! Buckets group candidates by rounded spectrum and keep one graph per
//! distinct canonical key. Buckets and their entries both keep first-seen
//! order so reports are deterministic.

use std::collections::{HashMap, HashSet};

use crate::{canonical::CanonicalKey, graph::Graph, spectrum::Spectrum};

/// One canonical class discovered for a spectrum.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BucketEntry {
    /// Canonical key of the stored graph.
    pub key: CanonicalKey,
    /// First graph seen with this key.
    pub graph: Graph,
    /// Position of `graph` in enumeration order.
    pub ordinal: u64,
}

/// All classes discovered for one spectrum.
#[derive(Clone, Debug)]
pub struct Bucket {
    spectrum: Spectrum,
    entries: Vec<BucketEntry>,
    keys: HashSet<CanonicalKey>,
}

impl Bucket {
    fn new(spectrum: Spectrum) -> Self {
        Self {
            spectrum,
            entries: Vec::new(),
            keys: HashSet::new(),
        }
    }

    /// Returns the shared spectrum.
    #[must_use]
    pub fn spectrum(&self) -> &Spectrum {
        &self.spectrum
    }

    /// Returns the stored entries in insertion order.
    #[must_use]
    pub fn entries(&self) -> &[BucketEntry] {
        &self.entries
    }

    /// Returns the number of distinct keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Reports whether the bucket holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Consumes the bucket, yielding its spectrum and entries.
    #[must_use]
    pub fn into_parts(self) -> (Spectrum, Vec<BucketEntry>) {
        (self.spectrum, self.entries)
    }
}

/// Spectrum-keyed bucket map owned by a single search run.
///
/// # Examples
/// ```
/// use cospectra_core::{CanonicalLabeler, Graph, HeuristicLabeler, SpectralBuckets, SpectrumComputer};
///
/// let labeler = HeuristicLabeler::default();
/// let computer = SpectrumComputer::default();
/// let mut buckets = SpectralBuckets::default();
/// for (ordinal, edges) in [[(0, 1)], [(1, 2)]].into_iter().enumerate() {
///     let graph = Graph::try_new(3, edges).expect("valid graph");
///     let spectrum = computer.compute(&graph);
///     let key = labeler.key(&graph);
///     buckets.insert(spectrum, key, graph, ordinal as u64);
/// }
/// // Both graphs are a single edge plus a point: one bucket, one class.
/// assert_eq!(buckets.len(), 1);
/// assert_eq!(buckets.buckets().next().map(|bucket| bucket.len()), Some(1));
/// ```
#[derive(Clone, Debug, Default)]
pub struct SpectralBuckets {
    index: HashMap<Spectrum, usize>,
    buckets: Vec<Bucket>,
}

impl SpectralBuckets {
    /// Stores `graph` under `spectrum` unless `key` is already present there.
    ///
    /// Returns `true` when a new class was recorded.
    pub fn insert(
        &mut self,
        spectrum: Spectrum,
        key: CanonicalKey,
        graph: Graph,
        ordinal: u64,
    ) -> bool {
        let slot = match self.index.get(&spectrum) {
            Some(&slot) => slot,
            None => {
                let slot = self.buckets.len();
                self.index.insert(spectrum.clone(), slot);
                self.buckets.push(Bucket::new(spectrum));
                slot
            }
        };
        let Some(bucket) = self.buckets.get_mut(slot) else {
            return false;
        };
        if !bucket.keys.insert(key.clone()) {
            return false;
        }
        bucket.entries.push(BucketEntry {
            key,
            graph,
            ordinal,
        });
        true
    }

    /// Returns the number of distinct spectra seen.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    /// Reports whether no spectrum has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Iterates buckets in first-seen order.
    pub fn buckets(&self) -> impl Iterator<Item = &Bucket> {
        self.buckets.iter()
    }

    /// Returns the number of buckets holding at least two distinct keys.
    #[must_use]
    pub fn multi_class_count(&self) -> usize {
        self.buckets.iter().filter(|bucket| bucket.len() > 1).count()
    }

    /// Consumes the map, yielding buckets in first-seen order.
    #[must_use]
    pub fn into_buckets(self) -> Vec<Bucket> {
        self.buckets
    }
}
