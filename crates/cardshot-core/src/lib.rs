//! # cardshot-core
//!
//! Core types for cardshot.
//!
//! This crate contains all fundamental types with **no internal dependencies**
//! on other cardshot crates. It provides:
//!
//! - Geometry types (Rect, Viewport)
//! - Element references and detection output (ElementHandle, Card, DetectionResult)
//! - Typed structural selectors
//! - Detection options and YAML configuration
//! - Error types
//!
//! ## Architecture
//!
//! This is Layer 0 in the architecture - the detector and the command-line
//! front end depend on this one, but this crate depends on neither.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod element;
pub mod error;
pub mod geometry;
pub mod selector;

// Re-export commonly used types
pub use config::{DetectionOptions, DetectorConfig, PatternSettings, WarmUpSettings};
pub use element::{Card, DetectionResult, ElementHandle, CARD_CLASS};
pub use error::{Error, Result};
pub use geometry::{Rect, Viewport};
pub use selector::Selector;
