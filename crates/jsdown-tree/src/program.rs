//! Program - the root holder of one compilation unit.
//!
//! A `Program` owns the source buffer and the node tree built over it, and
//! sequences the pipeline: construction, then `initialise` once, then
//! `transpile` once.

use crate::build::TreeBuilder;
use crate::error::TreeError;
use crate::kind::KindRegistry;
use crate::node::{NodeIndex, NodeTree, NodeView};
use crate::pass::Transforms;
use jsdown_common::PositionedText;
use serde_json::Value;
use std::sync::Arc;

/// Pipeline stage a program has reached.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Built,
    Initialised,
    Transpiled,
}

impl Phase {
    fn describe(self) -> &'static str {
        match self {
            Phase::Built => "not initialised",
            Phase::Initialised => "already initialised",
            Phase::Transpiled => "already transpiled",
        }
    }
}

#[derive(Debug)]
pub struct Program {
    text: PositionedText,
    tree: NodeTree,
    phase: Phase,
}

impl Program {
    /// Build the tree for `raw` over `source`.
    pub fn new(
        source: impl Into<String>,
        raw: Value,
        registry: Arc<KindRegistry>,
    ) -> Result<Program, TreeError> {
        let mut text = PositionedText::new(source);
        let tree = TreeBuilder::new(registry, &mut text).build(raw)?;
        Ok(Program::from_parts(tree, text))
    }

    /// Wrap a tree built separately (for example with a custom depth limit).
    pub fn from_parts(tree: NodeTree, text: PositionedText) -> Program {
        Program {
            text,
            tree,
            phase: Phase::Built,
        }
    }

    #[inline]
    pub fn tree(&self) -> &NodeTree {
        &self.tree
    }

    #[inline]
    pub fn text(&self) -> &PositionedText {
        &self.text
    }

    #[inline]
    pub fn root(&self) -> NodeIndex {
        self.tree.root()
    }

    pub fn view(&self, index: NodeIndex) -> NodeView<'_> {
        self.tree.view(index)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Run the initialise pass over the whole tree.
    pub fn initialise(&mut self, transforms: &Transforms) -> Result<(), TreeError> {
        if self.phase != Phase::Built {
            return Err(TreeError::PhaseOrder {
                requested: "initialise",
                state: self.phase.describe(),
            });
        }

        let span = tracing::debug_span!("initialise", nodes = self.tree.len());
        let _guard = span.enter();
        tracing::debug!(transforms = ?transforms.names(), "initialise pass");

        let root = self.tree.root();
        self.tree.initialise(root, transforms)?;
        self.phase = Phase::Initialised;
        Ok(())
    }

    /// Run the transpile pass, applying edits to the source buffer.
    pub fn transpile(&mut self, transforms: &Transforms) -> Result<(), TreeError> {
        if self.phase != Phase::Initialised {
            return Err(TreeError::PhaseOrder {
                requested: "transpile",
                state: self.phase.describe(),
            });
        }

        let span = tracing::debug_span!("transpile", nodes = self.tree.len());
        let _guard = span.enter();
        tracing::debug!(transforms = ?transforms.names(), "transpile pass");

        let Program { text, tree, .. } = self;
        tree.transpile(tree.root(), text, transforms)?;
        self.phase = Phase::Transpiled;
        Ok(())
    }

    /// The edited source text.
    pub fn render(&self) -> String {
        self.text.render()
    }

    pub fn into_parts(self) -> (NodeTree, PositionedText) {
        (self.tree, self.text)
    }
}
