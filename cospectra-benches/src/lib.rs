//! Benchmark support crate for cospectra.
//!
//! Provides seeded random graphs and parameter labels for the Criterion
//! benchmarks covering spectra, canonical labeling and full searches.

pub mod error;
pub mod params;
pub mod source;
