//! The two traversal passes: initialise, then transpile.
//!
//! Both passes are generic pre-order walks driven by each node's `keys`:
//! a node's behavior runs first, and the default behavior recurses into the
//! children in key order, list elements in index order, skipping nulls and
//! primitives.
//!
//! - **initialise** gets `&mut NodeTree`, but the tree only exposes
//!   annotation writes, so analysis can record results without reshaping
//!   the tree.
//! - **transpile** gets `&NodeTree` and the edit buffer. Edits are keyed by
//!   original offsets, and the tree is read-only, so offsets and buffer
//!   ranges never drift apart.
//!
//! A kind overrides a phase by implementing `NodeBehavior` and choosing when
//! to call `initialise_children` / `transpile_children` (before its own work
//! for bottom-up information, after it for top-down).

use crate::error::TreeError;
use crate::node::{NodeIndex, NodeTree};
use jsdown_common::PositionedText;
use rustc_hash::FxHashSet;
use std::fmt;

/// The set of enabled transforms, threaded through both passes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Transforms {
    enabled: FxHashSet<String>,
}

impl Transforms {
    /// No transforms enabled.
    pub fn none() -> Self {
        Transforms::default()
    }

    pub fn enable(&mut self, name: impl Into<String>) {
        self.enabled.insert(name.into());
    }

    pub fn disable(&mut self, name: &str) {
        self.enabled.remove(name);
    }

    #[must_use]
    pub fn with(mut self, name: impl Into<String>) -> Self {
        self.enable(name);
        self
    }

    #[inline]
    pub fn is_enabled(&self, name: &str) -> bool {
        self.enabled.contains(name)
    }

    pub fn is_empty(&self) -> bool {
        self.enabled.is_empty()
    }

    /// Enabled names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.enabled.iter().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl<S: Into<String>> FromIterator<S> for Transforms {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Transforms {
            enabled: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Per-kind pass behavior.
///
/// The defaults only recurse. Implementations must visit each child at most
/// once (normally through the `*_children` helpers) so every node is visited
/// exactly once per phase.
pub trait NodeBehavior: fmt::Debug + Send + Sync {
    fn initialise(
        &self,
        tree: &mut NodeTree,
        node: NodeIndex,
        transforms: &Transforms,
    ) -> Result<(), TreeError> {
        tree.initialise_children(node, transforms)
    }

    fn transpile(
        &self,
        tree: &NodeTree,
        node: NodeIndex,
        code: &mut PositionedText,
        transforms: &Transforms,
    ) -> Result<(), TreeError> {
        tree.transpile_children(node, code, transforms)
    }
}

/// The behavior of every kind that registers none of its own.
#[derive(Clone, Copy, Debug, Default)]
pub struct GenericNode;

impl NodeBehavior for GenericNode {}

impl NodeTree {
    /// Run the initialise phase on `node` and its subtree.
    pub fn initialise(&mut self, node: NodeIndex, transforms: &Transforms) -> Result<(), TreeError> {
        let behavior = self.registry().behavior(self.get(node).kind);
        tracing::trace!(
            node = node.0,
            kind = self.kind_name(node),
            "initialise"
        );
        behavior.initialise(self, node, transforms)
    }

    /// Initialise every child of `node`, in key then element order.
    pub fn initialise_children(
        &mut self,
        node: NodeIndex,
        transforms: &Transforms,
    ) -> Result<(), TreeError> {
        for child in self.children(node) {
            self.initialise(child, transforms)?;
        }
        Ok(())
    }

    /// Run the transpile phase on `node` and its subtree.
    pub fn transpile(
        &self,
        node: NodeIndex,
        code: &mut PositionedText,
        transforms: &Transforms,
    ) -> Result<(), TreeError> {
        let behavior = self.registry().behavior(self.get(node).kind);
        tracing::trace!(node = node.0, kind = self.kind_name(node), "transpile");
        behavior.transpile(self, node, code, transforms)
    }

    /// Transpile every child of `node`, in key then element order.
    pub fn transpile_children(
        &self,
        node: NodeIndex,
        code: &mut PositionedText,
        transforms: &Transforms,
    ) -> Result<(), TreeError> {
        for child in self.children(node) {
            self.transpile(child, code, transforms)?;
        }
        Ok(())
    }
}
