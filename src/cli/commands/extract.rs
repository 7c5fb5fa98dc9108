use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Result;
use rayon::prelude::*;

use super::super::args::ExtractCommand;
use super::{CommandResult, CommandSummary, ExtractSummary, FailedFile};
use crate::{
    config::{ConfigLoadResult, load_config},
    core::{
        file_scanner::scan_files,
        transform::{TransformOptions, TransformOutcome, transform_source},
    },
    locale::LocaleStore,
};

/// What happened to one file during the run.
enum FileOutcome {
    Skipped,
    Unchanged,
    Rewritten { extracted: usize, hooks_added: usize },
    Failed(FailedFile),
}

fn process_file(
    file_path: &str,
    options: &TransformOptions,
    store: &LocaleStore,
    dry_run: bool,
) -> FileOutcome {
    let failed = |reason: String| {
        FileOutcome::Failed(FailedFile {
            path: file_path.to_string(),
            reason,
        })
    };

    let source = match fs::read_to_string(file_path) {
        Ok(source) => source,
        Err(e) => {
            tracing::error!("Failed to read {}: {}", file_path, e);
            return failed(format!("cannot read file: {}", e));
        }
    };

    let result = transform_source(file_path, source, options, store);
    match result.outcome {
        TransformOutcome::Skipped => FileOutcome::Skipped,
        TransformOutcome::Unchanged => FileOutcome::Unchanged,
        TransformOutcome::Failed(e) => failed(e.to_string()),
        TransformOutcome::Rewritten {
            extracted,
            hooks_added,
        } => {
            if !dry_run && let Err(e) = fs::write(file_path, &result.output) {
                tracing::error!("Failed to write {}: {}", file_path, e);
                return failed(format!("cannot write file: {}", e));
            }
            FileOutcome::Rewritten {
                extracted,
                hooks_added,
            }
        }
    }
}

pub fn extract(cmd: ExtractCommand) -> Result<CommandResult> {
    let base_dir = cmd
        .common
        .source_root
        .clone()
        .unwrap_or_else(|| PathBuf::from("."));
    let ConfigLoadResult { mut config, path } = load_config(&base_dir)?;
    match &path {
        Some(path) => tracing::debug!("Using config {}", path.display()),
        None => tracing::debug!("No config file found, using defaults"),
    }

    if let Some(strategy) = cmd.key_strategy {
        config.key_strategy = strategy;
    }

    // Tables live next to the config file; an explicit --locales-root is
    // taken relative to the working directory.
    let table_base = match (&cmd.common.locales_root, &path) {
        (Some(root), _) => {
            config.locales_root = root.to_string_lossy().into_owned();
            PathBuf::from(".")
        }
        (None, Some(config_path)) => config_path
            .parent()
            .map_or_else(|| base_dir.clone(), Path::to_path_buf),
        (None, None) => base_dir.clone(),
    };

    // Sources given on the command line are relative to the working directory.
    let (scan_base, includes) = if cmd.sources.is_empty() {
        (base_dir.clone(), config.includes.clone())
    } else {
        let sources = cmd
            .sources
            .iter()
            .map(|p| p.to_string_lossy().into_owned())
            .collect();
        (PathBuf::from("."), sources)
    };

    let scan = scan_files(
        &scan_base,
        &includes,
        &config.ignores,
        config.ignore_test_files,
    );
    if scan.unreadable > 0 {
        tracing::warn!("{} paths could not be read", scan.unreadable);
    }

    let options = TransformOptions::from(&config);
    let store = LocaleStore::new(
        config.source_table_path(&table_base),
        config.target_table_path(&table_base),
    );

    let outcomes: Vec<FileOutcome> = scan
        .files
        .par_iter()
        .map(|file| process_file(file, &options, &store, cmd.dry_run))
        .collect();

    let mut summary = ExtractSummary {
        is_dry_run: cmd.dry_run,
        files_scanned: scan.files.len(),
        keys_recorded: store.pending_len(),
        source_table: store.source_path().to_path_buf(),
        target_table: store.target_path().to_path_buf(),
        ..Default::default()
    };
    for outcome in outcomes {
        match outcome {
            FileOutcome::Skipped => summary.files_skipped += 1,
            FileOutcome::Unchanged => summary.files_unchanged += 1,
            FileOutcome::Rewritten {
                extracted,
                hooks_added,
            } => {
                summary.files_rewritten += 1;
                summary.texts_extracted += extracted;
                summary.hooks_added += hooks_added;
            }
            FileOutcome::Failed(failed) => summary.failed_files.push(failed),
        }
    }

    if !cmd.dry_run {
        match store.flush() {
            Ok(report) => summary.flush = Some(report),
            Err(e) => {
                tracing::error!("{}", e);
                summary.flush_error = Some(e.to_string());
            }
        }
    }

    Ok(CommandResult {
        failure_count: summary.failure_count(),
        summary: CommandSummary::Extract(summary),
    })
}
