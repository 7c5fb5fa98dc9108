//! Text extraction.
//!
//! Walks every JSX element and fragment in the file and plans two kinds of
//! rewrites:
//!
//! - a plain text child becomes `{t('key')}` (surrounding whitespace kept),
//! - a run of text interleaved with `{identifier}` interpolations becomes a
//!   single `{t('key', { a, b })}` call.
//!
//! A run claims its text children, so they are never rewritten one by one.
//! The whole plan is computed from the untouched tree before any edit lands.

use std::{collections::HashSet, ops::Range, sync::LazyLock};

use regex::Regex;
use swc_common::{BytePos, Span, Spanned};
use swc_ecma_ast::{Expr, JSXElement, JSXElementChild, JSXExpr, JSXFragment, JSXText};
use swc_ecma_visit::{Visit, VisitWith};

use super::{
    keygen::KeyStrategy,
    source_unit::{SourceUnit, js_string},
};
use crate::{error::TransformError, locale::TranslationEntry};

/// Text that is itself a brace placeholder, like `{error}`.
static PLACEHOLDER_TEXT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\{[^}]+\}\s*$").unwrap());

/// A `{{name}}` token produced for an interpolated identifier.
static PLACEHOLDER_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\{\{[^}]+\}\}$").unwrap());

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// A character reference at the start of raw markup text.
static LEADING_ENTITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^&(?:#[0-9]+|#[xX][0-9a-fA-F]+|[A-Za-z][A-Za-z0-9]*);").unwrap()
});

/// A character reference at the end of raw markup text.
static TRAILING_ENTITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(?:#[0-9]+|#[xX][0-9a-fA-F]+|[A-Za-z][A-Za-z0-9]*);$").unwrap()
});

/// Text of one markup child, or of one interpolation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextSegment {
    /// Normalized text, with `{{name}}` for every interpolation.
    pub text: String,
    /// Interpolated identifiers, in order of first appearance.
    pub variables: Vec<String>,
}

impl TextSegment {
    /// The `t(...)` call that replaces this segment in markup.
    fn call(&self, key: &str) -> String {
        if self.variables.is_empty() {
            format!("{{t({})}}", js_string(key))
        } else {
            format!(
                "{{t({}, {{ {} }})}}",
                js_string(key),
                self.variables.join(", ")
            )
        }
    }
}

/// Settings the extraction engine reads.
#[derive(Debug, Clone, Copy)]
pub struct ExtractOptions<'a> {
    pub key_strategy: KeyStrategy,
    pub ignore_texts: &'a HashSet<String>,
}

/// Trim, then collapse every whitespace run to one space.
pub fn normalize_text(raw: &str) -> String {
    WHITESPACE.replace_all(raw.trim(), " ").into_owned()
}

pub fn is_placeholder(text: &str) -> bool {
    PLACEHOLDER_TEXT.is_match(text)
}

/// True for `&nbsp;`, `&#160;` and other references that decode to whitespace.
fn is_blank_entity(entity: &str) -> bool {
    let name = entity.trim_start_matches('&').trim_end_matches(';');
    let decoded = if let Some(hex) = name.strip_prefix("#x").or_else(|| name.strip_prefix("#X")) {
        u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
    } else if let Some(decimal) = name.strip_prefix('#') {
        decimal.parse().ok().and_then(char::from_u32)
    } else {
        match name {
            "nbsp" => Some('\u{a0}'),
            "ensp" => Some('\u{2002}'),
            "emsp" => Some('\u{2003}'),
            "thinsp" => Some('\u{2009}'),
            _ => None,
        }
    };
    decoded.is_some_and(char::is_whitespace)
}

/// Byte width of the blank prefix of raw markup text. Matches what
/// [`normalize_text`] trims from the decoded text.
fn leading_blank(raw: &str) -> usize {
    let mut width = 0;
    loop {
        let rest = &raw[width..];
        if let Some(entity) = LEADING_ENTITY.find(rest).filter(|e| is_blank_entity(e.as_str())) {
            width += entity.end();
            continue;
        }
        match rest.chars().next() {
            Some(c) if c.is_whitespace() => width += c.len_utf8(),
            _ => return width,
        }
    }
}

/// Byte width of the blank suffix of raw markup text.
fn trailing_blank(raw: &str) -> usize {
    let mut width = 0;
    loop {
        let rest = &raw[..raw.len() - width];
        if let Some(entity) = TRAILING_ENTITY.find(rest).filter(|e| is_blank_entity(e.as_str())) {
            width += rest.len() - entity.start();
            continue;
        }
        match rest.chars().next_back() {
            Some(c) if c.is_whitespace() => width += c.len_utf8(),
            _ => return width,
        }
    }
}

#[derive(Debug)]
struct PlannedRewrite {
    range: Range<usize>,
    line: usize,
    raw: String,
    key: String,
    segment: TextSegment,
}

struct ExtractionPlanner<'a> {
    unit: &'a SourceUnit,
    options: ExtractOptions<'a>,
    texts: Vec<PlannedRewrite>,
    runs: Vec<PlannedRewrite>,
    errors: Vec<TransformError>,
}

impl<'a> ExtractionPlanner<'a> {
    fn new(unit: &'a SourceUnit, options: ExtractOptions<'a>) -> Self {
        Self {
            unit,
            options,
            texts: Vec::new(),
            runs: Vec::new(),
            errors: Vec::new(),
        }
    }

    fn error(&self, line: usize, text: &str, reason: &str) -> TransformError {
        TransformError::Extraction {
            path: self.unit.file_path.clone(),
            line,
            text: text.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Range of the non-blank part of a text node. Blank edges, including
    /// references like `&nbsp;`, stay outside the range.
    fn trimmed_range(&self, span: Span) -> Option<(Range<usize>, BytePos, &'a str)> {
        let unit = self.unit;
        let raw = unit.slice(span)?;
        let leading = leading_blank(raw);
        let trailing = trailing_blank(raw);
        let start = unit.offset(span.lo) + leading;
        let end = unit.offset(span.hi) - trailing;
        let trimmed = raw.get(leading..raw.len() - trailing).unwrap_or_default();
        Some((start..end, span.lo + BytePos(leading as u32), trimmed))
    }

    fn key_for(&self, text: &str) -> Option<String> {
        if self.options.ignore_texts.contains(text) {
            tracing::debug!("Ignoring configured text: \"{}\"", text);
            return None;
        }
        let key = self
            .options
            .key_strategy
            .generate(&self.unit.component_name, text);
        if key.is_none() {
            tracing::debug!("No key can be derived from \"{}\"", text);
        }
        key
    }

    fn plan_children(&mut self, children: &[JSXElementChild]) {
        match self.plan_run(children) {
            RunPlan::Claimed(Some(run)) => self.runs.push(run),
            RunPlan::Claimed(None) => {}
            RunPlan::NotARun => {
                for child in children {
                    if let JSXElementChild::JSXText(text) = child {
                        self.plan_text(text);
                    }
                }
            }
        }
    }

    fn plan_text(&mut self, node: &JSXText) {
        let text = normalize_text(&node.value);
        if text.is_empty() {
            return;
        }
        if is_placeholder(&text) {
            tracing::debug!("Skipping placeholder text: \"{}\"", text);
            return;
        }
        let Some(key) = self.key_for(&text) else {
            return;
        };

        let Some((range, pos, raw)) = self.trimmed_range(node.span) else {
            let line = self.unit.line(node.span.lo);
            self.errors
                .push(self.error(line, &text, "text does not map back to the source"));
            return;
        };

        self.texts.push(PlannedRewrite {
            range,
            line: self.unit.line(pos),
            raw: raw.to_string(),
            key,
            segment: TextSegment {
                text,
                variables: Vec::new(),
            },
        });
    }

    /// Decide whether `children` form an interpolation run.
    ///
    /// A run needs more than one child, at least one `{identifier}` child, and
    /// nothing but text and `{identifier}` children. A run made of
    /// interpolations alone is claimed but left as it is.
    fn plan_run(&mut self, children: &[JSXElementChild]) -> RunPlan {
        if children.len() < 2 {
            return RunPlan::NotARun;
        }

        let mut parts = Vec::new();
        let mut variables: Vec<String> = Vec::new();
        let mut has_identifier = false;

        for child in children {
            match child {
                JSXElementChild::JSXText(text) => {
                    let text = normalize_text(&text.value);
                    if !text.is_empty() {
                        parts.push(text);
                    }
                }
                JSXElementChild::JSXExprContainer(container) => {
                    let JSXExpr::Expr(expr) = &container.expr else {
                        return RunPlan::NotARun;
                    };
                    let Expr::Ident(ident) = &**expr else {
                        return RunPlan::NotARun;
                    };
                    let name = ident.sym.to_string();
                    parts.push(format!("{{{{{}}}}}", name));
                    if !variables.contains(&name) {
                        variables.push(name);
                    }
                    has_identifier = true;
                }
                _ => return RunPlan::NotARun,
            }
        }

        if !has_identifier {
            return RunPlan::NotARun;
        }
        if parts.iter().all(|part| PLACEHOLDER_TOKEN.is_match(part)) {
            return RunPlan::Claimed(None);
        }

        let text = parts.join(" ");
        let Some(key) = self.key_for(&text) else {
            return RunPlan::NotARun;
        };

        let (Some(first), Some(last)) = (children.first(), children.last()) else {
            return RunPlan::NotARun;
        };
        let start = match first {
            JSXElementChild::JSXText(node) => self.trimmed_range(node.span).map(|(r, _, _)| r.start),
            other => Some(self.unit.offset(other.span().lo)),
        };
        let end = match last {
            JSXElementChild::JSXText(node) => self.trimmed_range(node.span).map(|(r, _, _)| r.end),
            other => Some(self.unit.offset(other.span().hi)),
        };
        let line = self.unit.line(first.span().lo);

        let (Some(start), Some(end)) = (start, end) else {
            self.errors
                .push(self.error(line, &text, "children do not map back to the source"));
            return RunPlan::Claimed(None);
        };
        let raw = self
            .unit
            .source
            .get(start..end)
            .unwrap_or_default()
            .to_string();

        RunPlan::Claimed(Some(PlannedRewrite {
            range: start..end,
            line,
            raw,
            key,
            segment: TextSegment { text, variables },
        }))
    }
}

enum RunPlan {
    NotARun,
    /// The children belong to a run; `None` means the run is not rewritten.
    Claimed(Option<PlannedRewrite>),
}

impl Visit for ExtractionPlanner<'_> {
    fn visit_jsx_element(&mut self, node: &JSXElement) {
        self.plan_children(&node.children);
        node.visit_children_with(self);
    }

    fn visit_jsx_fragment(&mut self, node: &JSXFragment) {
        self.plan_children(&node.children);
        node.visit_children_with(self);
    }
}

/// Rewrite every extractable text in `unit` and return the entries to record.
///
/// Nothing is returned unless every planned rewrite landed; the caller must
/// discard the unit on error.
pub fn extract_texts(
    unit: &mut SourceUnit,
    options: ExtractOptions<'_>,
) -> Result<Vec<TranslationEntry>, TransformError> {
    let mut planner = ExtractionPlanner::new(unit, options);
    unit.module.visit_with(&mut planner);
    let ExtractionPlanner {
        texts,
        runs,
        errors,
        ..
    } = planner;

    if let Some(error) = errors.into_iter().next() {
        log_failure(&error);
        return Err(error);
    }

    let mut entries = Vec::with_capacity(texts.len() + runs.len());
    for rewrite in texts.into_iter().chain(runs) {
        let replacement = rewrite.segment.call(&rewrite.key);
        if let Err(e) = unit.replace(rewrite.range.clone(), replacement) {
            let error = TransformError::Extraction {
                path: unit.file_path.clone(),
                line: rewrite.line,
                text: rewrite.raw,
                reason: e.to_string(),
            };
            log_failure(&error);
            return Err(error);
        }

        tracing::info!(
            "{}:{}: \"{}\" -> {}",
            unit.file_path,
            rewrite.line,
            rewrite.segment.text,
            rewrite.key
        );
        entries.push(TranslationEntry {
            key: rewrite.key,
            text: rewrite.segment.text,
        });
    }

    Ok(entries)
}

fn log_failure(error: &TransformError) {
    if let TransformError::Extraction {
        path, line, text, ..
    } = error
    {
        tracing::error!(path = %path, line, text = %text, "{}", error);
    } else {
        tracing::error!("{}", error);
    }
}
