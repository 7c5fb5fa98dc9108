//! Span-addressed source edits.
//!
//! The transform never re-prints the whole syntax tree. Every rewrite is an
//! insertion or a replacement addressed by byte offsets into the original
//! source, and [`SourcePatch::apply`] splices them in. Untouched code keeps its
//! formatting and comments exactly.

use std::ops::Range;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatchError {
    #[error("edit {new:?} overlaps edit {existing:?}")]
    Overlap {
        new: Range<usize>,
        existing: Range<usize>,
    },
    #[error("edit {0:?} is outside the source or splits a character")]
    OutOfBounds(Range<usize>),
}

#[derive(Debug, Clone)]
struct Edit {
    range: Range<usize>,
    text: String,
    seq: usize,
}

impl Edit {
    fn is_insert(&self) -> bool {
        self.range.is_empty()
    }
}

/// An ordered, non-overlapping set of edits against one source text.
///
/// Insertions at the same offset are applied in the order they were added,
/// and before a replacement starting at that offset.
#[derive(Debug, Default, Clone)]
pub struct SourcePatch {
    edits: Vec<Edit>,
}

impl SourcePatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    pub fn insert(&mut self, at: usize, text: impl Into<String>) -> Result<(), PatchError> {
        self.push(at..at, text.into())
    }

    pub fn replace(&mut self, range: Range<usize>, text: impl Into<String>) -> Result<(), PatchError> {
        if range.start > range.end {
            return Err(PatchError::OutOfBounds(range));
        }
        self.push(range, text.into())
    }

    fn push(&mut self, range: Range<usize>, text: String) -> Result<(), PatchError> {
        if let Some(existing) = self.edits.iter().find(|e| conflicts(&e.range, &range)) {
            return Err(PatchError::Overlap {
                new: range,
                existing: existing.range.clone(),
            });
        }
        let seq = self.edits.len();
        self.edits.push(Edit { range, text, seq });
        Ok(())
    }

    /// Produce the patched text.
    pub fn apply(&self, source: &str) -> Result<String, PatchError> {
        let mut edits: Vec<&Edit> = self.edits.iter().collect();
        edits.sort_by_key(|e| (e.range.start, !e.is_insert(), e.seq));

        let mut output = String::with_capacity(source.len() + self.edits.len() * 16);
        let mut cursor = 0;
        for edit in edits {
            let kept = source
                .get(cursor..edit.range.start)
                .ok_or_else(|| PatchError::OutOfBounds(edit.range.clone()))?;
            if !source.is_char_boundary(edit.range.end) {
                return Err(PatchError::OutOfBounds(edit.range.clone()));
            }
            output.push_str(kept);
            output.push_str(&edit.text);
            cursor = edit.range.end;
        }
        output.push_str(&source[cursor..]);
        Ok(output)
    }
}

/// Two replacements conflict when they share any byte; an insertion conflicts
/// with a replacement when it lands strictly inside it.
fn conflicts(a: &Range<usize>, b: &Range<usize>) -> bool {
    match (a.is_empty(), b.is_empty()) {
        (true, true) => false,
        (true, false) => b.start < a.start && a.start < b.end,
        (false, true) => a.start < b.start && b.start < a.end,
        (false, false) => a.start < b.end && b.start < a.end,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_empty_patch_is_identity() {
        let patch = SourcePatch::new();
        assert_eq!(patch.apply("const a = 1;").unwrap(), "const a = 1;");
    }

    #[test]
    fn test_replace_and_insert() {
        let source = "<p>Hello</p>";
        let mut patch = SourcePatch::new();
        patch.replace(3..8, "{t('hello')}").unwrap();
        patch.insert(0, "import x;\n").unwrap();
        assert_eq!(patch.apply(source).unwrap(), "import x;\n<p>{t('hello')}</p>");
    }

    #[test]
    fn test_inserts_at_same_offset_keep_order() {
        let mut patch = SourcePatch::new();
        patch.insert(0, "a").unwrap();
        patch.insert(0, "b").unwrap();
        patch.replace(0..1, "Z").unwrap();
        assert_eq!(patch.apply("xy").unwrap(), "abZy");
    }

    #[test]
    fn test_overlapping_replacements_rejected() {
        let mut patch = SourcePatch::new();
        patch.replace(2..6, "x").unwrap();
        let err = patch.replace(5..9, "y").unwrap_err();
        assert_eq!(
            err,
            PatchError::Overlap {
                new: 5..9,
                existing: 2..6
            }
        );
    }

    #[test]
    fn test_insert_inside_replacement_rejected() {
        let mut patch = SourcePatch::new();
        patch.replace(2..6, "x").unwrap();
        assert!(patch.insert(4, "y").is_err());
        // Boundaries are fine.
        assert!(patch.insert(2, "y").is_ok());
        assert!(patch.insert(6, "y").is_ok());
    }

    #[test]
    fn test_adjacent_replacements() {
        let mut patch = SourcePatch::new();
        patch.replace(0..1, "A").unwrap();
        patch.replace(1..2, "B").unwrap();
        assert_eq!(patch.apply("abc").unwrap(), "ABc");
    }

    #[test]
    fn test_out_of_bounds() {
        let mut patch = SourcePatch::new();
        patch.replace(2..40, "x").unwrap();
        assert!(matches!(
            patch.apply("short"),
            Err(PatchError::OutOfBounds(_))
        ));
    }

    #[test]
    fn test_multibyte_boundaries() {
        let source = "<p>שלום</p>";
        let start = source.find('ש').unwrap();
        let end = source.find("</p>").unwrap();
        let mut patch = SourcePatch::new();
        patch.replace(start..end, "{t('x')}").unwrap();
        assert_eq!(patch.apply(source).unwrap(), "<p>{t('x')}</p>");

        let mut bad = SourcePatch::new();
        bad.replace(start + 1..end, "x").unwrap();
        assert!(bad.apply(source).is_err());
    }
}
