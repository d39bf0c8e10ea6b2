//! Common types and utilities for the jsdown compiler.
//!
//! This crate provides the tree-independent pieces every other jsdown crate
//! builds on:
//! - The offset-addressed edit buffer (`PositionedText`)
//! - Line/column conversion (`LineMap`, `Position`)
//! - Recursion limits

// Offset-addressed source buffer with edits and source-map locations
pub mod positioned_text;
pub use positioned_text::{EditError, PositionedText};
#[cfg(test)]
#[path = "tests/positioned_text_tests.rs"]
mod positioned_text_tests;

// Position types for line/column source locations
pub mod position;
pub use position::{LineMap, Position};
#[cfg(test)]
#[path = "tests/position_tests.rs"]
mod position_tests;

// Centralized limits and thresholds
pub mod limits;
