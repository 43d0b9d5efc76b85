//! Shared test utilities used across cospectra crates.

pub mod graphs;
pub mod proptest_profile;
pub mod tracing;
