//! Tree construction: wrap a raw syntax tree into a `NodeTree`.
//!
//! Construction is top-down. A node's arena slot is reserved before any of
//! its children are wrapped, so children can record their parent index and
//! depth. Per node:
//!
//! 1. resolve the `type` tag through the registry and read `start`/`end`
//! 2. normalize the raw object (synthetic blocks for bodyless constructs)
//! 3. snapshot the keys and wrap every value: null and primitives pass
//!    through, arrays wrap element-wise, syntax objects become child nodes
//! 4. register `start` and `end` as source-map locations

use crate::error::TreeError;
use crate::kind::{KindId, KindRegistry};
use crate::node::{Field, Node, NodeIndex, NodeTree};
use crate::raw::{self, RawNode};
use indexmap::IndexMap;
use jsdown_common::PositionedText;
use jsdown_common::limits::{MAX_NODE_PREALLOC, MAX_TREE_DEPTH, NODES_PER_SOURCE_BYTE_DIVISOR};
use rustc_hash::FxHashMap;
use serde_json::Value;
use std::sync::Arc;

/// Key used in error messages for the root value.
const ROOT_KEY: &str = "<root>";

/// Builds a `NodeTree` from raw syntax.
pub struct TreeBuilder<'a> {
    registry: Arc<KindRegistry>,
    text: &'a mut PositionedText,
    max_depth: u32,
}

impl<'a> TreeBuilder<'a> {
    /// `text` receives the source-map locations of every node.
    ///
    /// The default depth limit (`MAX_TREE_DEPTH`) assumes an 8 MB stack.
    /// Builds on smaller stacks, such as 2 MB worker or test threads, should
    /// lower it with `with_max_depth` or run on a thread sized with
    /// `std::thread::Builder::stack_size`.
    pub fn new(registry: Arc<KindRegistry>, text: &'a mut PositionedText) -> Self {
        TreeBuilder {
            registry,
            text,
            max_depth: MAX_TREE_DEPTH,
        }
    }

    /// Override the maximum nesting depth.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Wrap `raw` (consumed) into a tree rooted at it.
    pub fn build(self, raw: Value) -> Result<NodeTree, TreeError> {
        let root = match raw {
            Value::Object(root) if root.contains_key("type") => root,
            Value::Object(_) => {
                return Err(TreeError::MissingType {
                    key: ROOT_KEY.to_string(),
                });
            }
            other => {
                return Err(TreeError::NotANode {
                    found: raw::describe(&other),
                });
            }
        };

        let capacity = (self.text.len() as usize / NODES_PER_SOURCE_BYTE_DIVISOR)
            .clamp(1, MAX_NODE_PREALLOC);
        let mut tree = NodeTree::with_capacity(Arc::clone(&self.registry), capacity);

        let span = tracing::debug_span!("build_tree", source_len = self.text.len());
        let _guard = span.enter();

        let mut cx = BuildContext {
            registry: &self.registry,
            text: self.text,
            max_depth: self.max_depth,
            tree: &mut tree,
        };
        cx.construct(root, NodeIndex::NONE, ROOT_KEY)?;

        tracing::debug!(nodes = tree.len(), "tree built");
        Ok(tree)
    }
}

struct BuildContext<'b> {
    registry: &'b KindRegistry,
    text: &'b mut PositionedText,
    max_depth: u32,
    tree: &'b mut NodeTree,
}

impl BuildContext<'_> {
    /// Construct one node under `parent` (`NONE` for the root).
    fn construct(
        &mut self,
        raw: RawNode,
        parent: NodeIndex,
        key: &str,
    ) -> Result<NodeIndex, TreeError> {
        let registry = self.registry;
        let kind = self.resolve_kind(&raw, key)?;
        let kind_name = registry.name(kind);
        let start = self.offset(&raw, "start", kind_name)?;
        let end = self.offset(&raw, "end", kind_name)?;
        if start > end {
            return Err(TreeError::InvalidOffset {
                kind: kind_name.to_string(),
                field: "end",
                value: format!("{end} (before start {start})"),
            });
        }

        let depth = match parent.into_option() {
            Some(parent) => self.tree.get(parent).depth + 1,
            None => 0,
        };
        if depth > self.max_depth {
            return Err(TreeError::TooDeep {
                kind: kind_name.to_string(),
                start,
                limit: self.max_depth,
            });
        }

        // Reserve the slot before wrapping children so they see their parent.
        let index = NodeIndex(self.tree.nodes.len() as u32);
        self.tree.nodes.push(Node {
            kind,
            parent,
            depth,
            start,
            end,
            fields: IndexMap::new(),
            annotations: FxHashMap::default(),
        });

        let block_kind = registry.name(registry.block_kind());
        let raw = raw::normalize(raw, registry.block_slots(), block_kind);

        let mut fields = IndexMap::with_capacity(raw.len());
        for (key, value) in raw {
            let field = self.wrap(value, index, &key)?;
            fields.insert(key, field);
        }
        self.tree.nodes[index.0 as usize].fields = fields;

        self.text.add_sourcemap_location(start);
        self.text.add_sourcemap_location(end);

        Ok(index)
    }

    /// Wrap the raw value at `key` of `parent`.
    fn wrap(&mut self, value: Value, parent: NodeIndex, key: &str) -> Result<Field, TreeError> {
        match value {
            Value::Array(items) => {
                let mut wrapped = Vec::with_capacity(items.len());
                for item in items {
                    wrapped.push(self.wrap(item, parent, key)?);
                }
                Ok(Field::List(wrapped))
            }
            Value::Object(object) if object.contains_key("type") => {
                Ok(Field::Node(self.construct(object, parent, key)?))
            }
            other => Ok(Field::Value(other)),
        }
    }

    fn resolve_kind(&self, raw: &RawNode, key: &str) -> Result<KindId, TreeError> {
        let Some(tag) = raw.get("type").and_then(Value::as_str) else {
            return Err(TreeError::MissingType {
                key: key.to_string(),
            });
        };
        self.registry
            .lookup(tag)
            .ok_or_else(|| TreeError::UnknownKind {
                kind: tag.to_string(),
                start: raw
                    .get("start")
                    .and_then(Value::as_u64)
                    .unwrap_or_default() as u32,
            })
    }

    /// Read an offset field and check it against the source text.
    fn offset(&self, raw: &RawNode, field: &'static str, kind: &str) -> Result<u32, TreeError> {
        let invalid = |value: String| TreeError::InvalidOffset {
            kind: kind.to_string(),
            field,
            value,
        };

        let value = raw.get(field).ok_or_else(|| invalid("missing".to_string()))?;
        let offset = value
            .as_u64()
            .and_then(|offset| u32::try_from(offset).ok())
            .ok_or_else(|| invalid(value.to_string()))?;
        self.text
            .check_range(offset, offset)
            .map_err(|err| invalid(format!("{offset} ({err})")))?;
        Ok(offset)
    }
}
