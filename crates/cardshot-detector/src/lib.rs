//! # cardshot-detector
//!
//! Card detection engine for cardshot.
//!
//! This crate provides:
//! - The [`DocumentQuery`] capability trait a host document implements
//! - Priority-ordered candidate strategies (class vocabulary, attributes,
//!   custom selectors, layout clustering)
//! - Geometric and content validity filtering
//! - Weighted confidence scoring and containment filtering
//! - The [`CardDetector`] facade with a warm-up readiness gate
//! - [`MemoryDocument`], an in-memory host built from page snapshots
//!
//! ## Architecture
//!
//! This is Layer 1 in the architecture - it depends on cardshot-core and
//! reads the page only through [`DocumentQuery`].

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod detection;
pub mod detector;
pub mod document;
pub mod matcher;
pub mod memory;
pub mod nesting;
pub mod patterns;
pub mod scorer;
pub mod strategies;
pub mod validity;

// Re-export commonly used types
pub use detection::{Candidate, CandidateCollector, CandidateStrategy, ScoredCandidate};
pub use detector::{CardDetector, WarmUpProgress, WarmUpStage, WARM_UP_STAGES};
pub use document::DocumentQuery;
pub use memory::{MemoryDocument, NodeSpec, PageSnapshot};
pub use nesting::filter_nested;
pub use scorer::Scorer;
pub use strategies::{LayoutStrategy, PatternStrategy};
pub use validity::ValidityFilter;
