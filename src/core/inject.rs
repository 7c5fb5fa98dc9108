//! Hook injection.
//!
//! Makes sure the file imports the localization hook and that every component
//! binds `t` from it. Both steps look for an existing binding first, so running
//! them on an already-patched file changes nothing.

use swc_common::Spanned;
use swc_ecma_ast::{ImportSpecifier, Module, ModuleDecl, ModuleItem};

use super::{
    classify::{ComponentCandidate, NormalizedBody, is_directive},
    source_unit::{SourceUnit, js_string},
    transform::TransformOptions,
};
use crate::error::TransformError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Injection {
    Inserted,
    AlreadyPresent,
}

/// True if a top-level import already binds `hook_name` from `hook_module`.
pub fn has_hook_import(module: &Module, hook_name: &str, hook_module: &str) -> bool {
    module.body.iter().any(|item| {
        let ModuleItem::ModuleDecl(ModuleDecl::Import(import)) = item else {
            return false;
        };
        import.src.value.as_str() == Some(hook_module)
            && import.specifiers.iter().any(|specifier| {
                matches!(specifier, ImportSpecifier::Named(named) if named.local.sym == hook_name)
            })
    })
}

/// Offset right after the directive prologue (`'use client';`), if there is one.
fn directive_prologue_end(unit: &SourceUnit) -> Option<usize> {
    unit.module
        .body
        .iter()
        .map_while(|item| match item {
            ModuleItem::Stmt(stmt) if is_directive(stmt) => Some(stmt.span()),
            _ => None,
        })
        .last()
        .map(|span| unit.offset(span.hi))
}

pub fn inject_import(
    unit: &mut SourceUnit,
    options: &TransformOptions,
) -> Result<Injection, TransformError> {
    if has_hook_import(&unit.module, &options.hook_name, &options.hook_module) {
        return Ok(Injection::AlreadyPresent);
    }

    let import = format!(
        "import {{ {} }} from {};",
        options.hook_name,
        js_string(&options.hook_module)
    );

    let nl = unit.line_ending();
    let result = if let Some(end) = directive_prologue_end(unit) {
        unit.insert_at_offset(end, format!("{}{}", nl, import))
    } else if unit.source.starts_with("#!") {
        let after_shebang = unit.source.find('\n').map_or(unit.source.len(), |i| i + 1);
        unit.insert_at_offset(after_shebang, format!("{}{}", import, nl))
    } else {
        unit.insert_at_offset(0, format!("{}{}", import, nl))
    };

    result.map_err(|e| TransformError::Injection {
        component: unit.component_name.clone(),
        reason: e.to_string(),
    })?;
    Ok(Injection::Inserted)
}

/// Prepend `const { t } = <hook>();` to the component body, after any
/// directives it opens with.
pub fn inject_hook(
    unit: &mut SourceUnit,
    candidate: &ComponentCandidate,
    options: &TransformOptions,
) -> Result<Injection, TransformError> {
    let hook_stmt = format!("const {{ t }} = {}();", options.hook_name);
    let failed = |reason: String| TransformError::Injection {
        component: candidate.name.clone(),
        reason,
    };

    let nl = unit.line_ending();

    match &candidate.body {
        NormalizedBody::Block(block) => {
            if block.has_t_binding {
                return Ok(Injection::AlreadyPresent);
            }
            let first = block
                .first_stmt
                .ok_or_else(|| failed("component body is empty".to_string()))?;
            // Goes after the last directive, or before the first statement.
            let anchor = block.last_directive.unwrap_or(first);
            let separator = if unit.line(anchor.lo) == unit.line(block.span.lo) {
                " ".to_string()
            } else {
                format!("{}{}", nl, unit.indent_at(anchor.lo))
            };
            let inserted = match block.last_directive {
                Some(directive) => unit.insert(directive.hi, format!("{}{}", separator, hook_stmt)),
                None => unit.insert(first.lo, format!("{}{}", hook_stmt, separator)),
            };
            inserted.map_err(|e| failed(e.to_string()))?;
        }
        NormalizedBody::ImplicitReturn { expr } => {
            let base = unit.indent_at(expr.lo).to_string();
            let inner = format!("{}  ", base);
            unit.insert(expr.lo, format!("{{{nl}{inner}{hook_stmt}{nl}{inner}return "))
                .map_err(|e| failed(e.to_string()))?;
            unit.insert(expr.hi, format!(";{nl}{base}}}"))
                .map_err(|e| failed(e.to_string()))?;
        }
        NormalizedBody::Unsupported => {
            return Err(failed("body does not return markup".to_string()));
        }
    }
    Ok(Injection::Inserted)
}
