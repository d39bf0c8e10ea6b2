//! Positioned Text - offset-addressed edit buffer over the original source
//!
//! Every edit is keyed by an offset range of the *original* text, never by a
//! position in the edited output. That keeps node offsets stable across the
//! transpile pass: a node can always splice around its own `[start, end)`
//! regardless of what its siblings already rewrote.
//!
//! # Edits
//!
//! - `overwrite(start, end, content)` replaces an original range
//! - `remove(start, end)` replaces an original range with nothing
//! - `append_left` / `prepend_left` insert text that belongs to the chunk
//!   *ending* at an offset
//! - `append_right` / `prepend_right` insert text that belongs to the chunk
//!   *starting* at an offset
//!
//! At a given offset, left insertions render before right insertions.
//! Insertions strictly inside an overwritten range are dropped with it.
//!
//! # Source-map locations
//!
//! `add_sourcemap_location` records offsets whose original position must
//! survive into an emitted source map. Tree construction registers the start
//! and end of every node.

use rustc_hash::FxHashSet;
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors raised by edits and slices against a `PositionedText`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("range [{start}, {end}) is outside the source text (length {len})")]
    OutOfRange { start: u32, end: u32, len: u32 },

    #[error("offset {offset} is not on a character boundary")]
    NotCharBoundary { offset: u32 },

    #[error("cannot overwrite a zero-length range at {offset}; insert instead")]
    EmptyOverwrite { offset: u32 },

    #[error("range [{start}, {end}) overlaps an earlier edit of [{other_start}, {other_end})")]
    Overlap {
        start: u32,
        end: u32,
        other_start: u32,
        other_end: u32,
    },
}

/// Text inserted at one original offset.
#[derive(Debug, Default, Clone)]
struct Insertion {
    left: String,
    right: String,
}

/// An original range replaced by new content.
#[derive(Debug, Clone)]
struct Replacement {
    end: u32,
    content: String,
}

/// The shared, offset-addressed source buffer of one program.
#[derive(Debug, Clone)]
pub struct PositionedText {
    original: String,
    sourcemap_locations: FxHashSet<u32>,
    insertions: BTreeMap<u32, Insertion>,
    /// Keyed by start offset; ranges never overlap.
    replacements: BTreeMap<u32, Replacement>,
}

impl PositionedText {
    pub fn new(original: impl Into<String>) -> Self {
        PositionedText {
            original: original.into(),
            sourcemap_locations: FxHashSet::default(),
            insertions: BTreeMap::new(),
            replacements: BTreeMap::new(),
        }
    }

    /// The unedited source text.
    #[inline]
    pub fn original(&self) -> &str {
        &self.original
    }

    /// Length of the original text in bytes.
    #[inline]
    pub fn len(&self) -> u32 {
        self.original.len() as u32
    }

    pub fn is_empty(&self) -> bool {
        self.original.is_empty()
    }

    /// Whether any edit has been recorded.
    pub fn has_edits(&self) -> bool {
        !self.insertions.is_empty() || !self.replacements.is_empty()
    }

    // =========================================================================
    // Source-map locations
    // =========================================================================

    /// Record an original offset that must be preserved in a source map.
    pub fn add_sourcemap_location(&mut self, offset: u32) {
        self.sourcemap_locations.insert(offset);
    }

    pub fn is_sourcemap_location(&self, offset: u32) -> bool {
        self.sourcemap_locations.contains(&offset)
    }

    /// All registered locations, ascending.
    pub fn sourcemap_locations(&self) -> Vec<u32> {
        let mut locations: Vec<u32> = self.sourcemap_locations.iter().copied().collect();
        locations.sort_unstable();
        locations
    }

    // =========================================================================
    // Reading
    // =========================================================================

    /// Slice the *original* text. Edits never affect the result.
    pub fn slice(&self, start: u32, end: u32) -> Result<&str, EditError> {
        self.check_range(start, end)?;
        Ok(&self.original[start as usize..end as usize])
    }

    /// Offset of the first byte of the line containing `offset`.
    pub fn line_start(&self, offset: u32) -> u32 {
        let limit = (offset as usize).min(self.original.len());
        match memchr::memrchr(b'\n', &self.original.as_bytes()[..limit]) {
            Some(newline) => newline as u32 + 1,
            None => 0,
        }
    }

    /// Validate that `[start, end)` is a well-formed range of the original
    /// text on character boundaries.
    pub fn check_range(&self, start: u32, end: u32) -> Result<(), EditError> {
        if start > end || end > self.len() {
            return Err(EditError::OutOfRange {
                start,
                end,
                len: self.len(),
            });
        }
        self.check_boundary(start)?;
        self.check_boundary(end)
    }

    fn check_boundary(&self, offset: u32) -> Result<(), EditError> {
        if self.original.is_char_boundary(offset as usize) {
            Ok(())
        } else {
            Err(EditError::NotCharBoundary { offset })
        }
    }

    // =========================================================================
    // Editing
    // =========================================================================

    /// Replace the original range `[start, end)` with `content`.
    pub fn overwrite(&mut self, start: u32, end: u32, content: &str) -> Result<(), EditError> {
        self.check_range(start, end)?;
        if start == end {
            return Err(EditError::EmptyOverwrite { offset: start });
        }
        self.check_overlap(start, end)?;
        tracing::trace!(start, end, content, "overwrite");
        self.replacements.insert(
            start,
            Replacement {
                end,
                content: content.to_string(),
            },
        );
        Ok(())
    }

    /// Remove the original range `[start, end)`. Empty ranges are a no-op.
    pub fn remove(&mut self, start: u32, end: u32) -> Result<(), EditError> {
        self.check_range(start, end)?;
        if start == end {
            return Ok(());
        }
        self.check_overlap(start, end)?;
        tracing::trace!(start, end, "remove");
        self.replacements.insert(
            start,
            Replacement {
                end,
                content: String::new(),
            },
        );
        Ok(())
    }

    /// Insert `content` at `offset`, after earlier left insertions there.
    pub fn append_left(&mut self, offset: u32, content: &str) -> Result<(), EditError> {
        self.insertion_at(offset)?.left.push_str(content);
        Ok(())
    }

    /// Insert `content` at `offset`, before earlier left insertions there.
    pub fn prepend_left(&mut self, offset: u32, content: &str) -> Result<(), EditError> {
        self.insertion_at(offset)?.left.insert_str(0, content);
        Ok(())
    }

    /// Insert `content` at `offset`, after earlier right insertions there.
    pub fn append_right(&mut self, offset: u32, content: &str) -> Result<(), EditError> {
        self.insertion_at(offset)?.right.push_str(content);
        Ok(())
    }

    /// Insert `content` at `offset`, before earlier right insertions there.
    pub fn prepend_right(&mut self, offset: u32, content: &str) -> Result<(), EditError> {
        self.insertion_at(offset)?.right.insert_str(0, content);
        Ok(())
    }

    fn insertion_at(&mut self, offset: u32) -> Result<&mut Insertion, EditError> {
        self.check_range(offset, offset)?;
        Ok(self.insertions.entry(offset).or_default())
    }

    fn check_overlap(&self, start: u32, end: u32) -> Result<(), EditError> {
        // Ranges are disjoint, so only the last one starting before `end`
        // can reach into `[start, end)`.
        if let Some((&other_start, other)) = self.replacements.range(..end).next_back()
            && other.end > start
        {
            return Err(EditError::Overlap {
                start,
                end,
                other_start,
                other_end: other.end,
            });
        }
        Ok(())
    }

    // =========================================================================
    // Rendering
    // =========================================================================

    /// Produce the edited text.
    pub fn render(&self) -> String {
        let len = self.len();
        let mut out = String::with_capacity(self.original.len());
        let mut cursor = 0u32;

        loop {
            if let Some(insertion) = self.insertions.get(&cursor) {
                out.push_str(&insertion.left);
                out.push_str(&insertion.right);
            }
            if cursor >= len {
                break;
            }
            if let Some(replacement) = self.replacements.get(&cursor) {
                out.push_str(&replacement.content);
                cursor = replacement.end;
                continue;
            }

            let next_insertion = self
                .insertions
                .range(cursor + 1..)
                .next()
                .map(|(&offset, _)| offset);
            let next_replacement = self
                .replacements
                .range(cursor + 1..)
                .next()
                .map(|(&offset, _)| offset);
            let next = [next_insertion, next_replacement]
                .into_iter()
                .flatten()
                .min()
                .unwrap_or(len)
                .min(len);

            out.push_str(&self.original[cursor as usize..next as usize]);
            cursor = next;
        }

        out
    }
}

impl std::fmt::Display for PositionedText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.render())
    }
}
