//! Centralized limits for the jsdown compiler.
//!
//! Tree construction and both traversal passes recurse once per level of
//! syntax nesting, so the nesting depth of the input is bounded here rather
//! than left to the thread's stack size.

/// Maximum nesting depth of a syntax tree.
///
/// Construction fails with `TreeError::TooDeep` when a node would sit deeper
/// than this. Each level costs a few frames in the builder (node, list, node),
/// so 1000 levels stays well inside the 8 MB default main-thread stack. A
/// spawned thread gets 2 MB by default, which is not enough for input this
/// deep.
///
/// # JavaScript example
///
/// ```javascript
/// // Long left-leaning chains nest one level per operator:
/// a + b + c + d + /* ... thousands of operands ... */ z;
///
/// // Deeply nested callbacks:
/// f(() => f(() => f(() => /* ... */)));
/// ```
pub const MAX_TREE_DEPTH: u32 = 1_000;

/// Initial capacity hint for the node arena, in nodes per source byte.
///
/// ESTree output for typical code has roughly one node per 4-6 bytes.
pub const NODES_PER_SOURCE_BYTE_DIVISOR: usize = 5;

/// Maximum pre-allocation for the node arena, to avoid huge reservations for
/// very large inputs.
pub const MAX_NODE_PREALLOC: usize = 1_000_000;
