//! Candidate collection strategies.

pub mod layout;
pub mod pattern;

pub use layout::LayoutStrategy;
pub use pattern::PatternStrategy;
