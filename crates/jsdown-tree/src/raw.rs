//! Raw syntax values and grammar normalization.
//!
//! The parser collaborator hands us ESTree-shaped JSON: objects carrying a
//! `type` tag, `start`/`end` byte offsets, and arbitrary further fields. Key
//! order is significant (it drives visitation order), so `serde_json` is built
//! with `preserve_order`.
//!
//! Objects *without* a `type` tag (for example a regex literal's
//! `{ pattern, flags }`) are plain data, not syntax nodes.

use rustc_hash::FxHashMap;
use serde_json::{Map, Value};

/// A raw syntax object, keys in declaration order.
pub type RawNode = Map<String, Value>;

/// Tag of the block container used for synthetic blocks.
pub const BLOCK_STATEMENT: &str = "BlockStatement";

/// Key marking a block as synthetic.
pub const SYNTHETIC_KEY: &str = "synthetic";

/// The `type` tag of a raw value, if it is a syntax object.
#[inline]
pub fn raw_type(value: &Value) -> Option<&str> {
    value.as_object()?.get("type")?.as_str()
}

/// Whether a raw value is a syntax object (an object with a `type` key).
#[inline]
pub fn is_syntax_object(value: &Value) -> bool {
    value.as_object().is_some_and(|object| object.contains_key("type"))
}

/// Short description of a JSON value's shape, for error messages.
pub fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Constructs whose sub-statement slot may hold either a block or a single
/// bare statement/expression.
///
/// Normalization wraps the bare form in a synthetic block so every consumer
/// sees one shape. The table is configuration: grammars with more bodyless
/// forms add them here; an unlisted construct is left as parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockSlots {
    slots: FxHashMap<String, String>,
}

impl Default for BlockSlots {
    fn default() -> Self {
        BlockSlots::empty()
            .with_slot("IfStatement", "consequent")
            .with_slot("ForStatement", "body")
            .with_slot("ForInStatement", "body")
            .with_slot("WhileStatement", "body")
            .with_slot("ArrowFunctionExpression", "body")
    }
}

impl BlockSlots {
    /// A table that normalizes nothing.
    pub fn empty() -> Self {
        BlockSlots {
            slots: FxHashMap::default(),
        }
    }

    /// Add (or replace) the block slot of `kind`.
    #[must_use]
    pub fn with_slot(mut self, kind: impl Into<String>, slot: impl Into<String>) -> Self {
        self.insert(kind, slot);
        self
    }

    pub fn insert(&mut self, kind: impl Into<String>, slot: impl Into<String>) {
        self.slots.insert(kind.into(), slot.into());
    }

    /// The block slot of `kind`, if it has one.
    pub fn slot_for(&self, kind: &str) -> Option<&str> {
        self.slots.get(kind).map(String::as_str)
    }

    /// Kinds that own a block slot.
    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.slots.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// Normalize one raw syntax object.
///
/// If `raw` is a construct listed in `slots` and its slot holds a syntax
/// object that is not already a `block_kind`, the slot is replaced by
///
/// ```json
/// { "start": s, "end": e, "type": "BlockStatement", "body": [original], "synthetic": true }
/// ```
///
/// carrying the original's offsets. The slot keeps its position among the
/// keys. Only this level is normalized; nested objects are normalized when
/// they are themselves constructed.
pub fn normalize(mut raw: RawNode, slots: &BlockSlots, block_kind: &str) -> RawNode {
    let Some(slot) = raw
        .get("type")
        .and_then(Value::as_str)
        .and_then(|kind| slots.slot_for(kind))
    else {
        return raw;
    };

    let Some(value) = raw.get_mut(slot) else {
        return raw;
    };
    if !is_syntax_object(value) || raw_type(value) == Some(block_kind) {
        return raw;
    }

    let statement = std::mem::take(value);
    let start = statement.get("start").cloned().unwrap_or(Value::Null);
    let end = statement.get("end").cloned().unwrap_or(Value::Null);

    let mut block = RawNode::new();
    block.insert("start".to_string(), start);
    block.insert("end".to_string(), end);
    block.insert("type".to_string(), Value::String(block_kind.to_string()));
    block.insert("body".to_string(), Value::Array(vec![statement]));
    block.insert(SYNTHETIC_KEY.to_string(), Value::Bool(true));

    *value = Value::Object(block);
    raw
}
