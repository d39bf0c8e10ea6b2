//! Node tree for the jsdown compiler.
//!
//! Wraps a raw ESTree syntax tree into an arena of nodes that know their
//! parent, depth and source offsets, and drives the two compiler passes over
//! it:
//!
//! - **initialise**: analysis, top-down, may annotate nodes
//! - **transpile**: rewriting, top-down, edits the shared `PositionedText`
//!
//! Per-kind behavior plugs in through `NodeBehavior`, registered in a closed
//! `KindRegistry`.

pub mod error;
pub use error::TreeError;

// Raw syntax values and grammar normalization
pub mod raw;
pub use raw::{BlockSlots, RawNode};
#[cfg(test)]
#[path = "tests/raw_tests.rs"]
mod raw_tests;

// Kind registry
pub mod kind;
pub use kind::{Boundary, KindId, KindInfo, KindRegistry, KindRegistryBuilder};
#[cfg(test)]
#[path = "tests/kind_tests.rs"]
mod kind_tests;

// Node arena
pub mod node;
pub use node::{Field, Node, NodeIndex, NodeTree, NodeView, ProgramId};

// Tree construction
pub mod build;
pub use build::TreeBuilder;
#[cfg(test)]
#[path = "tests/build_tests.rs"]
mod build_tests;

// Ancestry and boundary queries
pub mod query;
pub use query::KindMatcher;
#[cfg(test)]
#[path = "tests/query_tests.rs"]
mod query_tests;

// Initialise / transpile passes
pub mod pass;
pub use pass::{GenericNode, NodeBehavior, Transforms};

// Root holder and pipeline sequencing
pub mod program;
pub use program::{Phase, Program};

#[cfg(test)]
#[path = "tests/test_fixtures.rs"]
pub(crate) mod test_fixtures;
