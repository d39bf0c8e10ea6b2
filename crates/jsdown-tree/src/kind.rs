//! Kind registry - the closed dispatch table from syntax tags to node kinds.
//!
//! Every raw `type` tag the builder meets is resolved here to a `KindId`.
//! Each kind carries its `Boundary` capabilities (what upward scope walks stop
//! at) and the `NodeBehavior` that runs for it in both passes.
//!
//! The table is closed: a tag that was never registered fails construction
//! with `TreeError::UnknownKind` instead of silently falling back to the
//! generic behavior. `KindRegistryBuilder::build` validates the configuration
//! up front (duplicate tags, and that the root kind, the block kind and every
//! block-slot owner are registered).

use crate::error::TreeError;
use crate::pass::{GenericNode, NodeBehavior};
use crate::raw::{BLOCK_STATEMENT, BlockSlots};
use bitflags::bitflags;
use rustc_hash::FxHashMap;
use std::fmt;
use std::sync::Arc;

/// Index of a kind in its registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KindId(pub u16);

bitflags! {
    /// Which upward walks stop at a node of this kind.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Boundary: u8 {
        /// Owns a block scope (`let`/`const`/`class` declarations).
        const SCOPE = 1 << 0;
        /// Owns a function scope (`var` declarations, parameters).
        const FUNCTION_SCOPE = 1 << 1;
        /// Binds its own `this`/`arguments`.
        const LEXICAL = 1 << 2;
    }
}

/// One registered kind.
pub struct KindInfo {
    pub name: Arc<str>,
    pub boundary: Boundary,
    pub behavior: Arc<dyn NodeBehavior>,
}

impl fmt::Debug for KindInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KindInfo")
            .field("name", &self.name)
            .field("boundary", &self.boundary)
            .field("behavior", &self.behavior)
            .finish()
    }
}

/// The validated kind table of one compiler configuration.
#[derive(Debug)]
pub struct KindRegistry {
    kinds: Vec<KindInfo>,
    by_name: FxHashMap<Arc<str>, KindId>,
    root_kind: KindId,
    block_kind: KindId,
    block_slots: BlockSlots,
}

impl KindRegistry {
    pub fn builder() -> KindRegistryBuilder {
        KindRegistryBuilder::new()
    }

    /// Resolve a raw tag.
    #[inline]
    pub fn lookup(&self, name: &str) -> Option<KindId> {
        self.by_name.get(name).copied()
    }

    /// Info for a kind of this registry.
    #[inline]
    pub fn info(&self, kind: KindId) -> &KindInfo {
        &self.kinds[kind.0 as usize]
    }

    #[inline]
    pub fn name(&self, kind: KindId) -> &str {
        &self.info(kind).name
    }

    #[inline]
    pub fn boundary(&self, kind: KindId) -> Boundary {
        self.info(kind).boundary
    }

    pub fn behavior(&self, kind: KindId) -> Arc<dyn NodeBehavior> {
        Arc::clone(&self.info(kind).behavior)
    }

    /// The kind that terminates scope walks at the top of a tree.
    pub fn root_kind(&self) -> KindId {
        self.root_kind
    }

    /// The block container kind used for synthetic blocks.
    pub fn block_kind(&self) -> KindId {
        self.block_kind
    }

    pub fn block_slots(&self) -> &BlockSlots {
        &self.block_slots
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (KindId, &KindInfo)> {
        self.kinds
            .iter()
            .enumerate()
            .map(|(index, info)| (KindId(index as u16), info))
    }
}

/// Builder for `KindRegistry`.
pub struct KindRegistryBuilder {
    entries: Vec<(String, Boundary)>,
    behaviors: FxHashMap<String, Arc<dyn NodeBehavior>>,
    root_kind: String,
    block_kind: String,
    block_slots: BlockSlots,
}

impl Default for KindRegistryBuilder {
    fn default() -> Self {
        KindRegistryBuilder::new()
    }
}

impl KindRegistryBuilder {
    /// An empty table with `Program` as root kind, `BlockStatement` as block
    /// kind and the default block slots.
    pub fn new() -> Self {
        KindRegistryBuilder {
            entries: Vec::new(),
            behaviors: FxHashMap::default(),
            root_kind: "Program".to_string(),
            block_kind: BLOCK_STATEMENT.to_string(),
            block_slots: BlockSlots::default(),
        }
    }

    /// A table preloaded with every ESTree kind and its boundary flags.
    pub fn estree() -> Self {
        let mut builder = KindRegistryBuilder::new();
        for &(name, boundary) in ESTREE_KINDS {
            builder = builder.register(name, boundary);
        }
        builder
    }

    /// Register a kind using the generic behavior.
    #[must_use]
    pub fn register(mut self, name: impl Into<String>, boundary: Boundary) -> Self {
        self.entries.push((name.into(), boundary));
        self
    }

    /// Attach a behavior to a kind (registered before or after this call).
    #[must_use]
    pub fn behavior(mut self, name: impl Into<String>, behavior: Arc<dyn NodeBehavior>) -> Self {
        self.behaviors.insert(name.into(), behavior);
        self
    }

    #[must_use]
    pub fn root_kind(mut self, name: impl Into<String>) -> Self {
        self.root_kind = name.into();
        self
    }

    #[must_use]
    pub fn block_kind(mut self, name: impl Into<String>) -> Self {
        self.block_kind = name.into();
        self
    }

    #[must_use]
    pub fn block_slots(mut self, slots: BlockSlots) -> Self {
        self.block_slots = slots;
        self
    }

    /// Validate and freeze the table.
    pub fn build(mut self) -> Result<KindRegistry, TreeError> {
        let generic: Arc<dyn NodeBehavior> = Arc::new(GenericNode);
        let mut kinds = Vec::with_capacity(self.entries.len());
        let mut by_name: FxHashMap<Arc<str>, KindId> = FxHashMap::default();

        for (name, boundary) in self.entries {
            if by_name.contains_key(name.as_str()) {
                return Err(TreeError::DuplicateKind(name));
            }
            let behavior = self
                .behaviors
                .remove(&name)
                .unwrap_or_else(|| Arc::clone(&generic));
            let name: Arc<str> = Arc::from(name);
            by_name.insert(Arc::clone(&name), KindId(kinds.len() as u16));
            kinds.push(KindInfo {
                name,
                boundary,
                behavior,
            });
        }

        if let Some(orphan) = self.behaviors.into_keys().next() {
            return Err(TreeError::UnregisteredKind {
                kind: orphan,
                role: "behavior",
            });
        }

        let resolve = |name: &str, role: &'static str| {
            by_name
                .get(name)
                .copied()
                .ok_or_else(|| TreeError::UnregisteredKind {
                    kind: name.to_string(),
                    role,
                })
        };
        let root_kind = resolve(&self.root_kind, "root")?;
        let block_kind = resolve(&self.block_kind, "block")?;
        for owner in self.block_slots.kinds() {
            resolve(owner, "block-slot owner")?;
        }

        tracing::debug!(
            kinds = kinds.len(),
            root = %self.root_kind,
            block_slots = self.block_slots.len(),
            "kind registry built"
        );

        Ok(KindRegistry {
            kinds,
            by_name,
            root_kind,
            block_kind,
            block_slots: self.block_slots,
        })
    }
}

const NONE: Boundary = Boundary::empty();
const SCOPE: Boundary = Boundary::SCOPE;
const FUNCTION: Boundary = Boundary::FUNCTION_SCOPE.union(Boundary::LEXICAL);
const ARROW: Boundary = Boundary::FUNCTION_SCOPE;
const ROOT: Boundary = Boundary::all();

/// ESTree kinds (ES2022 plus JSX) and their boundaries.
///
/// Arrow functions own a function scope but inherit `this`/`arguments`, so
/// they are not lexical boundaries.
const ESTREE_KINDS: &[(&str, Boundary)] = &[
    ("Program", ROOT),
    // Statements
    ("BlockStatement", SCOPE),
    ("StaticBlock", FUNCTION),
    ("ExpressionStatement", NONE),
    ("EmptyStatement", NONE),
    ("DebuggerStatement", NONE),
    ("WithStatement", NONE),
    ("ReturnStatement", NONE),
    ("LabeledStatement", NONE),
    ("BreakStatement", NONE),
    ("ContinueStatement", NONE),
    ("IfStatement", NONE),
    ("SwitchStatement", SCOPE),
    ("SwitchCase", NONE),
    ("ThrowStatement", NONE),
    ("TryStatement", NONE),
    ("CatchClause", SCOPE),
    ("WhileStatement", NONE),
    ("DoWhileStatement", NONE),
    ("ForStatement", SCOPE),
    ("ForInStatement", SCOPE),
    ("ForOfStatement", SCOPE),
    // Declarations
    ("FunctionDeclaration", FUNCTION),
    ("VariableDeclaration", NONE),
    ("VariableDeclarator", NONE),
    ("ClassDeclaration", NONE),
    ("ClassExpression", NONE),
    ("ClassBody", NONE),
    ("MethodDefinition", NONE),
    ("PropertyDefinition", NONE),
    // Expressions
    ("Identifier", NONE),
    ("PrivateIdentifier", NONE),
    ("Literal", NONE),
    ("ThisExpression", NONE),
    ("Super", NONE),
    ("ArrayExpression", NONE),
    ("ObjectExpression", NONE),
    ("Property", NONE),
    ("FunctionExpression", FUNCTION),
    ("ArrowFunctionExpression", ARROW),
    ("UnaryExpression", NONE),
    ("UpdateExpression", NONE),
    ("BinaryExpression", NONE),
    ("AssignmentExpression", NONE),
    ("LogicalExpression", NONE),
    ("MemberExpression", NONE),
    ("ChainExpression", NONE),
    ("ConditionalExpression", NONE),
    ("CallExpression", NONE),
    ("NewExpression", NONE),
    ("SequenceExpression", NONE),
    ("ParenthesizedExpression", NONE),
    ("YieldExpression", NONE),
    ("AwaitExpression", NONE),
    ("ImportExpression", NONE),
    ("MetaProperty", NONE),
    ("SpreadElement", NONE),
    ("TemplateLiteral", NONE),
    ("TaggedTemplateExpression", NONE),
    ("TemplateElement", NONE),
    // Patterns
    ("ObjectPattern", NONE),
    ("ArrayPattern", NONE),
    ("RestElement", NONE),
    ("AssignmentPattern", NONE),
    // Modules
    ("ImportDeclaration", NONE),
    ("ImportSpecifier", NONE),
    ("ImportDefaultSpecifier", NONE),
    ("ImportNamespaceSpecifier", NONE),
    ("ImportAttribute", NONE),
    ("ExportNamedDeclaration", NONE),
    ("ExportSpecifier", NONE),
    ("ExportDefaultDeclaration", NONE),
    ("ExportAllDeclaration", NONE),
    // JSX
    ("JSXElement", NONE),
    ("JSXOpeningElement", NONE),
    ("JSXClosingElement", NONE),
    ("JSXFragment", NONE),
    ("JSXOpeningFragment", NONE),
    ("JSXClosingFragment", NONE),
    ("JSXAttribute", NONE),
    ("JSXSpreadAttribute", NONE),
    ("JSXIdentifier", NONE),
    ("JSXMemberExpression", NONE),
    ("JSXNamespacedName", NONE),
    ("JSXExpressionContainer", NONE),
    ("JSXEmptyExpression", NONE),
    ("JSXSpreadChild", NONE),
    ("JSXText", NONE),
];
