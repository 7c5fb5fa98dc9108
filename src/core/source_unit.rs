use std::{path::Path, sync::Arc};

use swc_common::{BytePos, SourceMap, Span};
use swc_ecma_ast::Module;

use super::{
    parsers::jsx::parse_jsx_source,
    patch::{PatchError, SourcePatch},
};
use crate::error::TransformError;

const BOM: char = '\u{feff}';

/// One source file during a single transform: its parsed tree, its original
/// text, and the edits accumulated against it.
pub struct SourceUnit {
    pub file_path: String,
    /// File stem, used by [`KeyStrategy::ComponentSlug`](super::keygen::KeyStrategy).
    pub component_name: String,
    /// File text without its byte-order mark. Spans index into this.
    pub source: String,
    /// The file started with a UTF-8 byte-order mark.
    has_bom: bool,
    pub module: Module,
    source_map: Arc<SourceMap>,
    start_pos: BytePos,
    patch: SourcePatch,
}

impl SourceUnit {
    pub fn parse(file_path: &str, source: String) -> Result<Self, TransformError> {
        // The parser skips a leading BOM without counting it in positions.
        let (source, has_bom) = match source.strip_prefix(BOM) {
            Some(rest) => (rest.to_string(), true),
            None => (source, false),
        };
        let parsed = parse_jsx_source(source.clone(), file_path, Arc::new(SourceMap::default()))
            .map_err(|e| TransformError::Parse {
                path: file_path.to_string(),
                message: e.to_string(),
            })?;

        Ok(Self {
            file_path: file_path.to_string(),
            component_name: component_name(file_path),
            source,
            has_bom,
            module: parsed.module,
            source_map: parsed.source_map,
            start_pos: parsed.start_pos,
            patch: SourcePatch::new(),
        })
    }

    /// Byte offset of `pos` into [`Self::source`].
    pub fn offset(&self, pos: BytePos) -> usize {
        pos.0.saturating_sub(self.start_pos.0) as usize
    }

    pub fn range(&self, span: Span) -> std::ops::Range<usize> {
        self.offset(span.lo)..self.offset(span.hi)
    }

    pub fn slice(&self, span: Span) -> Option<&str> {
        self.source.get(self.range(span))
    }

    /// 1-based line number of `pos`.
    pub fn line(&self, pos: BytePos) -> usize {
        self.source_map.lookup_char_pos(pos).line
    }

    /// Leading whitespace of the line containing `pos`.
    pub fn indent_at(&self, pos: BytePos) -> &str {
        let offset = self.offset(pos).min(self.source.len());
        let line_start = self.source[..offset].rfind('\n').map_or(0, |i| i + 1);
        let line = &self.source[line_start..];
        let width = line.len() - line.trim_start_matches([' ', '\t']).len();
        &line[..width]
    }

    pub fn insert(&mut self, pos: BytePos, text: impl Into<String>) -> Result<(), PatchError> {
        let at = self.offset(pos);
        self.patch.insert(at, text)
    }

    pub fn insert_at_offset(&mut self, at: usize, text: impl Into<String>) -> Result<(), PatchError> {
        self.patch.insert(at, text)
    }

    pub fn replace(
        &mut self,
        range: std::ops::Range<usize>,
        text: impl Into<String>,
    ) -> Result<(), PatchError> {
        self.patch.replace(range, text)
    }

    pub fn is_modified(&self) -> bool {
        !self.patch.is_empty()
    }

    /// `\r\n` if the file uses Windows line endings, `\n` otherwise.
    pub fn line_ending(&self) -> &'static str {
        match self.source.find('\n') {
            Some(i) if self.source[..i].ends_with('\r') => "\r\n",
            _ => "\n",
        }
    }

    /// Serialize the tree with all edits applied.
    pub fn render(&self) -> Result<String, PatchError> {
        let body = self.patch.apply(&self.source)?;
        if self.has_bom {
            Ok(format!("{}{}", BOM, body))
        } else {
            Ok(body)
        }
    }
}

/// `src/components/Header.tsx` -> `Header`
pub fn component_name(file_path: &str) -> String {
    Path::new(file_path)
        .file_stem()
        .and_then(|s| s.to_str())
        .map(str::to_string)
        .unwrap_or_default()
}

/// Quote `value` as a single-quoted JavaScript string literal.
pub fn js_string(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('\'');
    for c in value.chars() {
        match c {
            '\\' => quoted.push_str("\\\\"),
            '\'' => quoted.push_str("\\'"),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            _ => quoted.push(c),
        }
    }
    quoted.push('\'');
    quoted
}
