//! Node arena.
//!
//! A tree is a flat `Vec<Node>` addressed by `NodeIndex`. Nodes are pushed
//! parent-first during construction, so a node's index is always greater than
//! its parent's and the arena order is a pre-order of the tree.

use crate::kind::{KindId, KindRegistry};
use crate::raw::SYNTHETIC_KEY;
use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use serde_json::Value;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

/// Index of a node in its `NodeTree`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIndex(pub u32);

impl NodeIndex {
    /// The parent of the root.
    pub const NONE: NodeIndex = NodeIndex(u32::MAX);

    #[inline]
    pub fn is_none(self) -> bool {
        self == NodeIndex::NONE
    }

    #[inline]
    pub fn is_some(self) -> bool {
        self != NodeIndex::NONE
    }

    /// `None` for `NONE`.
    #[inline]
    pub fn into_option(self) -> Option<NodeIndex> {
        if self.is_none() { None } else { Some(self) }
    }
}

/// The wrapped value of one raw key.
#[derive(Clone, Debug, PartialEq)]
pub enum Field {
    /// A primitive (string, number, boolean, null) or a plain data object.
    Value(Value),
    /// A child syntax node.
    Node(NodeIndex),
    /// An array, element order kept, nulls kept in place.
    List(Vec<Field>),
}

impl Field {
    #[inline]
    pub fn as_node(&self) -> Option<NodeIndex> {
        match self {
            Field::Node(index) => Some(*index),
            _ => None,
        }
    }

    #[inline]
    pub fn as_list(&self) -> Option<&[Field]> {
        match self {
            Field::List(items) => Some(items),
            _ => None,
        }
    }

    #[inline]
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Field::Value(value) => Some(value),
            _ => None,
        }
    }

    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        self.as_value()?.as_str()
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Field::Value(Value::Null))
    }

    /// Child nodes held directly by this field: the node itself, or the
    /// node elements of a list (nulls and primitives skipped).
    pub fn nodes(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        let (single, list) = match self {
            Field::Node(index) => (Some(*index), None),
            Field::List(items) => (None, Some(items.iter().filter_map(Field::as_node))),
            Field::Value(_) => (None, None),
        };
        single.into_iter().chain(list.into_iter().flatten())
    }
}

/// One wrapped syntax node.
#[derive(Clone, Debug)]
pub struct Node {
    pub kind: KindId,
    /// `NodeIndex::NONE` for the root.
    pub parent: NodeIndex,
    /// 0 for the root.
    pub depth: u32,
    pub start: u32,
    pub end: u32,
    /// Wrapped raw fields; the key order is the raw declaration order and is
    /// fixed at construction.
    pub(crate) fields: IndexMap<String, Field>,
    /// Analysis results attached during initialise.
    pub(crate) annotations: FxHashMap<String, Value>,
}

impl Node {
    /// Raw property names, in declaration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn field(&self, key: &str) -> Option<&Field> {
        self.fields.get(key)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &Field)> {
        self.fields.iter().map(|(key, field)| (key.as_str(), field))
    }

    /// Whether normalization created this block.
    pub fn is_synthetic(&self) -> bool {
        self.fields
            .get(SYNTHETIC_KEY)
            .and_then(Field::as_value)
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    #[inline]
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

/// Identifies the program a tree belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ProgramId(u32);

impl ProgramId {
    pub(crate) fn next() -> ProgramId {
        static NEXT: AtomicU32 = AtomicU32::new(0);
        ProgramId(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// All nodes of one syntax tree.
#[derive(Debug)]
pub struct NodeTree {
    pub(crate) nodes: Vec<Node>,
    pub(crate) registry: Arc<KindRegistry>,
    pub(crate) program: ProgramId,
}

impl NodeTree {
    pub(crate) fn with_capacity(registry: Arc<KindRegistry>, capacity: usize) -> NodeTree {
        NodeTree {
            nodes: Vec::with_capacity(capacity),
            registry,
            program: ProgramId::next(),
        }
    }

    /// The root node. Always index 0.
    #[inline]
    pub fn root(&self) -> NodeIndex {
        NodeIndex(0)
    }

    /// The program every node of this tree belongs to.
    #[inline]
    pub fn program_id(&self) -> ProgramId {
        self.program
    }

    #[inline]
    pub fn registry(&self) -> &KindRegistry {
        &self.registry
    }

    /// Get a node by index. Returns None for `NONE` or a foreign index.
    #[inline]
    pub fn try_get(&self, index: NodeIndex) -> Option<&Node> {
        if index.is_none() {
            None
        } else {
            self.nodes.get(index.0 as usize)
        }
    }

    /// Get a node by index.
    ///
    /// # Panics
    ///
    /// If `index` does not belong to this tree.
    #[inline]
    pub fn get(&self, index: NodeIndex) -> &Node {
        &self.nodes[index.0 as usize]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Tag of a node's kind.
    #[inline]
    pub fn kind_name(&self, index: NodeIndex) -> &str {
        self.registry.name(self.get(index).kind)
    }

    #[inline]
    pub fn parent(&self, index: NodeIndex) -> Option<NodeIndex> {
        self.get(index).parent.into_option()
    }

    #[inline]
    pub fn depth(&self, index: NodeIndex) -> u32 {
        self.get(index).depth
    }

    pub fn field(&self, index: NodeIndex, key: &str) -> Option<&Field> {
        self.get(index).field(key)
    }

    /// The single child node stored at `key`.
    pub fn child(&self, index: NodeIndex, key: &str) -> Option<NodeIndex> {
        self.field(index, key)?.as_node()
    }

    /// Child nodes in visitation order: key order, then element order.
    pub fn children(&self, index: NodeIndex) -> Vec<NodeIndex> {
        self.get(index)
            .fields
            .values()
            .flat_map(Field::nodes)
            .collect()
    }

    /// Every node index in pre-order (parent before child, key order).
    pub fn iter_preorder(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        // Construction pushes parents before children and wraps keys in
        // order, so arena order is pre-order.
        (0..self.nodes.len() as u32).map(NodeIndex)
    }

    /// Ergonomic read-only view of a node.
    #[inline]
    pub fn view(&self, index: NodeIndex) -> NodeView<'_> {
        NodeView { tree: self, index }
    }

    // =========================================================================
    // Annotations
    // =========================================================================

    /// Attach an analysis result to a node.
    pub fn annotate(&mut self, index: NodeIndex, key: impl Into<String>, value: Value) {
        self.nodes[index.0 as usize]
            .annotations
            .insert(key.into(), value);
    }

    pub fn annotation(&self, index: NodeIndex, key: &str) -> Option<&Value> {
        self.get(index).annotations.get(key)
    }
}

/// A node together with its tree.
#[derive(Clone, Copy)]
pub struct NodeView<'a> {
    pub tree: &'a NodeTree,
    pub index: NodeIndex,
}

impl<'a> NodeView<'a> {
    #[inline]
    pub fn node(&self) -> &'a Node {
        self.tree.get(self.index)
    }

    #[inline]
    pub fn kind_name(&self) -> &'a str {
        self.tree.kind_name(self.index)
    }

    #[inline]
    pub fn depth(&self) -> u32 {
        self.node().depth
    }

    #[inline]
    pub fn start(&self) -> u32 {
        self.node().start
    }

    #[inline]
    pub fn end(&self) -> u32 {
        self.node().end
    }

    pub fn parent(&self) -> Option<NodeView<'a>> {
        self.tree.parent(self.index).map(|index| self.tree.view(index))
    }

    pub fn field(&self, key: &str) -> Option<&'a Field> {
        self.node().field(key)
    }

    /// The single child node stored at `key`.
    pub fn child(&self, key: &str) -> Option<NodeView<'a>> {
        self.tree
            .child(self.index, key)
            .map(|index| self.tree.view(index))
    }

    /// The node elements of the list stored at `key`.
    pub fn child_list(&self, key: &str) -> Vec<NodeView<'a>> {
        self.field(key)
            .into_iter()
            .flat_map(Field::nodes)
            .map(|index| self.tree.view(index))
            .collect()
    }

    pub fn children(&self) -> Vec<NodeView<'a>> {
        self.tree
            .children(self.index)
            .into_iter()
            .map(|index| self.tree.view(index))
            .collect()
    }

    pub fn is_synthetic(&self) -> bool {
        self.node().is_synthetic()
    }
}

impl std::fmt::Debug for NodeView<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeView")
            .field("index", &self.index.0)
            .field("kind", &self.kind_name())
            .field("start", &self.start())
            .field("end", &self.end())
            .finish()
    }
}

impl PartialEq for NodeView<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.index == other.index
    }
}

impl Eq for NodeView<'_> {}
