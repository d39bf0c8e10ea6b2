//! Command-line driver for the jsdown node tree.
//!
//! Reads raw ESTree JSON and the source it was parsed from, runs the full
//! pipeline, and prints what the tree looks like afterwards.

pub mod args;
#[cfg(test)]
#[path = "tests/args_tests.rs"]
mod args_tests;

pub mod driver;

pub mod tracing_config;
