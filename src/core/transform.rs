//! Per-file transform pipeline.
//!
//! parse -> classify -> inject -> extract -> render
//!
//! Every step after parsing works on the same [`SourceUnit`]; edits only land
//! in the output if the whole pipeline succeeds. Entries reach the
//! [`LocaleStore`] after that point, so a failed file never touches the tables.

use std::collections::HashSet;

use super::{
    classify::classify,
    extract::{ExtractOptions, extract_texts},
    inject::{Injection, inject_hook, inject_import},
    keygen::KeyStrategy,
    source_unit::SourceUnit,
};
use crate::{config::Config, error::TransformError, locale::LocaleStore};

/// Settings for one run of the transform, shared by every file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformOptions {
    pub key_strategy: KeyStrategy,
    pub hook_name: String,
    pub hook_module: String,
    pub ignore_texts: HashSet<String>,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            key_strategy: KeyStrategy::default(),
            hook_name: "useTranslation".to_string(),
            hook_module: "react-i18next".to_string(),
            ignore_texts: HashSet::new(),
        }
    }
}

impl From<&Config> for TransformOptions {
    fn from(config: &Config) -> Self {
        Self {
            key_strategy: config.key_strategy,
            hook_name: config.hook_name.clone(),
            hook_module: config.hook_module.clone(),
            ignore_texts: config.ignore_texts.iter().cloned().collect(),
        }
    }
}

#[derive(Debug)]
pub enum TransformOutcome {
    /// No markup in the file.
    Skipped,
    /// Markup found, but nothing to rewrite.
    Unchanged,
    Rewritten {
        /// Texts replaced by `t(...)` calls.
        extracted: usize,
        /// Components that received a hook call.
        hooks_added: usize,
    },
    Failed(TransformError),
}

#[derive(Debug)]
pub struct TransformResult {
    /// The rewritten source, or the original text for every other outcome.
    pub output: String,
    pub outcome: TransformOutcome,
}

impl TransformResult {
    fn original(source: String, outcome: TransformOutcome) -> Self {
        Self {
            output: source,
            outcome,
        }
    }

    pub fn is_rewritten(&self) -> bool {
        matches!(self.outcome, TransformOutcome::Rewritten { .. })
    }
}

/// Transform one file. Never fails: on error the original source comes back
/// with [`TransformOutcome::Failed`].
pub fn transform_source(
    file_path: &str,
    source: String,
    options: &TransformOptions,
    store: &LocaleStore,
) -> TransformResult {
    let mut unit = match SourceUnit::parse(file_path, source.clone()) {
        Ok(unit) => unit,
        Err(e) => {
            tracing::error!("{}", e);
            return TransformResult::original(source, TransformOutcome::Failed(e));
        }
    };

    let classification = classify(&unit.module);
    if !classification.has_markup {
        tracing::debug!("Skipping {} (no JSX)", file_path);
        return TransformResult::original(source, TransformOutcome::Skipped);
    }

    let mut hooks_added = 0;
    let mut components = classification.components().peekable();
    if components.peek().is_some() {
        if let Err(e) = inject_import(&mut unit, options) {
            tracing::warn!("{}: {}", file_path, e);
        }
        for candidate in components {
            match inject_hook(&mut unit, candidate, options) {
                Ok(Injection::Inserted) => {
                    tracing::info!("{}: added hook to component {}", file_path, candidate.name);
                    hooks_added += 1;
                }
                Ok(Injection::AlreadyPresent) => {
                    tracing::debug!("{}: component {} already binds t", file_path, candidate.name);
                }
                Err(e) => tracing::warn!("{}: {}", file_path, e),
            }
        }
    }

    let extract_options = ExtractOptions {
        key_strategy: options.key_strategy,
        ignore_texts: &options.ignore_texts,
    };
    let entries = match extract_texts(&mut unit, extract_options) {
        Ok(entries) => entries,
        Err(e) => return TransformResult::original(source, TransformOutcome::Failed(e)),
    };

    if !unit.is_modified() {
        return TransformResult::original(source, TransformOutcome::Unchanged);
    }

    let output = match unit.render() {
        Ok(output) => output,
        Err(e) => {
            let error = TransformError::Render {
                path: file_path.to_string(),
                reason: e.to_string(),
            };
            tracing::error!("{}", error);
            return TransformResult::original(source, TransformOutcome::Failed(error));
        }
    };

    for entry in &entries {
        store.record(&entry.key, &entry.text);
    }

    TransformResult {
        output,
        outcome: TransformOutcome::Rewritten {
            extracted: entries.len(),
            hooks_added,
        },
    }
}
