//! Consensus statistics and verdict rules.
//!
//! Pure functions over vote sequences: no I/O, no store access. The verdict
//! cascade here is the central business decision of the whole system.

pub mod stats;
pub mod verdict;

pub use stats::{agreement_fraction, disagreement_fraction, median_with_interval};
pub use verdict::{classify, summarize, ConsensusSummary, Verdict};
