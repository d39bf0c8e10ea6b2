//! Identity, ancestry and boundary queries.
//!
//! Every upward walk is the same loop over parent links. Scope and
//! lexical-boundary lookups test the kind's `Boundary` flags instead of
//! dispatching per kind, so where a walk stops is decided entirely by the
//! registry. The root kind must carry the flags that terminate the walks;
//! running off the top is `TreeError::DelegationExhausted`.

use crate::error::TreeError;
use crate::kind::Boundary;
use crate::node::{NodeIndex, NodeTree, NodeView};
use jsdown_common::PositionedText;
use regex::Regex;

/// Matches node kinds by tag.
#[derive(Clone, Debug)]
pub enum KindMatcher {
    /// The whole tag equals the name.
    Exact(String),
    /// The pattern matches the tag.
    Pattern(Regex),
}

impl KindMatcher {
    #[inline]
    pub fn matches(&self, kind: &str) -> bool {
        match self {
            KindMatcher::Exact(name) => name == kind,
            KindMatcher::Pattern(pattern) => pattern.is_match(kind),
        }
    }
}

impl From<&str> for KindMatcher {
    fn from(name: &str) -> Self {
        KindMatcher::Exact(name.to_string())
    }
}

impl From<String> for KindMatcher {
    fn from(name: String) -> Self {
        KindMatcher::Exact(name)
    }
}

impl From<Regex> for KindMatcher {
    fn from(pattern: Regex) -> Self {
        KindMatcher::Pattern(pattern)
    }
}

impl NodeTree {
    /// Iterate from `index` up to the root, `index` included.
    pub fn ancestors(&self, index: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        std::iter::successors(Some(index), |&current| self.parent(current))
    }

    /// Walk `level` parent links. Level 0 is the node itself; walking past
    /// the root gives `None`.
    pub fn ancestor(&self, index: NodeIndex, level: u32) -> Option<NodeIndex> {
        self.ancestors(index).nth(level as usize)
    }

    /// Whether `other` is `index` or one of its descendants.
    pub fn contains(&self, index: NodeIndex, other: NodeIndex) -> bool {
        let target_depth = self.depth(index);
        // Depth only grows downwards, so stop once we are above `index`.
        self.ancestors(other)
            .take_while(|&current| self.depth(current) >= target_depth)
            .any(|current| current == index)
    }

    /// Nearest node, self included, whose kind matches.
    pub fn find_nearest(
        &self,
        index: NodeIndex,
        matcher: impl Into<KindMatcher>,
    ) -> Result<NodeIndex, TreeError> {
        let matcher = matcher.into();
        self.ancestors(index)
            .find(|&current| matcher.matches(self.kind_name(current)))
            .ok_or_else(|| self.exhausted("find_nearest", index))
    }

    /// Nearest node, self included, owning a scope. With
    /// `want_function_scope` only function scopes qualify.
    pub fn find_scope(
        &self,
        index: NodeIndex,
        want_function_scope: bool,
    ) -> Result<NodeIndex, TreeError> {
        let wanted = if want_function_scope {
            Boundary::FUNCTION_SCOPE
        } else {
            Boundary::SCOPE | Boundary::FUNCTION_SCOPE
        };
        self.find_boundary(index, wanted)
            .ok_or_else(|| self.exhausted("find_scope", index))
    }

    /// Nearest node, self included, that binds its own `this`/`arguments`.
    pub fn find_lexical_boundary(&self, index: NodeIndex) -> Result<NodeIndex, TreeError> {
        self.find_boundary(index, Boundary::LEXICAL)
            .ok_or_else(|| self.exhausted("find_lexical_boundary", index))
    }

    fn find_boundary(&self, index: NodeIndex, wanted: Boundary) -> Option<NodeIndex> {
        self.ancestors(index).find(|&current| {
            self.registry()
                .boundary(self.get(current).kind)
                .intersects(wanted)
        })
    }

    fn exhausted(&self, query: &'static str, from: NodeIndex) -> TreeError {
        let node = self.get(from);
        TreeError::DelegationExhausted {
            query,
            from: format!("{}@{}", self.kind_name(from), node.start),
        }
    }

    /// The original source text of a node, `[start, end)`. Edits made to
    /// `text` never show up here.
    pub fn source_text<'t>(
        &self,
        index: NodeIndex,
        text: &'t PositionedText,
    ) -> Result<&'t str, TreeError> {
        let node = self.get(index);
        Ok(text.slice(node.start, node.end)?)
    }

    /// Leading whitespace of the line the node starts on, cut off at the
    /// node's start.
    ///
    /// The first line counts as a line too: a node indented there gets its
    /// whitespace, not `""` as a match anchored on a preceding newline would
    /// give.
    pub fn indentation<'t>(&self, index: NodeIndex, text: &'t PositionedText) -> &'t str {
        let start = self.get(index).start as usize;
        let line_start = text.line_start(start as u32) as usize;
        let line = text.original().get(line_start..start).unwrap_or_default();
        let width = line
            .bytes()
            .take_while(|&byte| byte == b' ' || byte == b'\t')
            .count();
        &line[..width]
    }
}

impl<'a> NodeView<'a> {
    pub fn ancestor(&self, level: u32) -> Option<NodeView<'a>> {
        self.tree
            .ancestor(self.index, level)
            .map(|index| self.tree.view(index))
    }

    pub fn contains(&self, other: &NodeView<'_>) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.tree.contains(self.index, other.index)
    }

    pub fn find_nearest(&self, matcher: impl Into<KindMatcher>) -> Result<NodeView<'a>, TreeError> {
        let index = self.tree.find_nearest(self.index, matcher)?;
        Ok(self.tree.view(index))
    }

    pub fn find_scope(&self, want_function_scope: bool) -> Result<NodeView<'a>, TreeError> {
        let index = self.tree.find_scope(self.index, want_function_scope)?;
        Ok(self.tree.view(index))
    }

    pub fn find_lexical_boundary(&self) -> Result<NodeView<'a>, TreeError> {
        let index = self.tree.find_lexical_boundary(self.index)?;
        Ok(self.tree.view(index))
    }

    pub fn source_text<'t>(&self, text: &'t PositionedText) -> Result<&'t str, TreeError> {
        self.tree.source_text(self.index, text)
    }

    pub fn indentation<'t>(&self, text: &'t PositionedText) -> &'t str {
        self.tree.indentation(self.index, text)
    }
}
