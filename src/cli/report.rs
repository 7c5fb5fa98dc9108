//! Summary printing for CLI commands.
//!
//! Diagnostics go to stderr through `tracing`; this module only prints the
//! end-of-run summary on stdout.

use std::io::{self, Write};

use colored::Colorize;

use super::commands::{CommandResult, CommandSummary, ExtractSummary, InitSummary};
use crate::config::CONFIG_FILE_NAME;

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

/// Failure mark for consistent output formatting.
pub const FAILURE_MARK: &str = "\u{2718}"; // ✘

pub fn print(result: &CommandResult) {
    print_to(result, &mut io::stdout().lock());
}

pub fn print_to<W: Write>(result: &CommandResult, writer: &mut W) {
    match &result.summary {
        CommandSummary::Extract(summary) => print_extract(summary, writer),
        CommandSummary::Init(summary) => print_init(summary, writer),
    }
}

fn plural(count: usize, word: &str) -> String {
    if count == 1 {
        format!("{} {}", count, word)
    } else {
        format!("{} {}s", count, word)
    }
}

fn print_extract<W: Write>(summary: &ExtractSummary, writer: &mut W) {
    let verb = if summary.is_dry_run {
        "Would rewrite"
    } else {
        "Rewrote"
    };
    let headline = format!(
        "{} {} ({} extracted, {} added)",
        verb,
        plural(summary.files_rewritten, "file"),
        plural(summary.texts_extracted, "text"),
        plural(summary.hooks_added, "hook"),
    );
    if summary.failed_files.is_empty() {
        let _ = writeln!(writer, "{} {}", SUCCESS_MARK.green(), headline.green());
    } else {
        let _ = writeln!(writer, "{} {}", FAILURE_MARK.red(), headline.bold());
    }

    let _ = writeln!(
        writer,
        "  {} scanned, {} unchanged, {} without JSX",
        plural(summary.files_scanned, "file"),
        summary.files_unchanged,
        summary.files_skipped,
    );

    for failed in &summary.failed_files {
        let _ = writeln!(
            writer,
            "{} {}: {}",
            FAILURE_MARK.red(),
            failed.path.bold(),
            failed.reason
        );
    }

    if summary.is_dry_run {
        let _ = writeln!(
            writer,
            "  dry run: {} not written to {}",
            plural(summary.keys_recorded, "key"),
            summary.source_table.display()
        );
        return;
    }

    if let Some(error) = &summary.flush_error {
        let _ = writeln!(writer, "{} {}", FAILURE_MARK.red(), error.red());
        return;
    }

    if let Some(report) = &summary.flush {
        let _ = writeln!(
            writer,
            "  {}: {} added",
            summary.source_table.display(),
            plural(report.source_added, "key")
        );
        let _ = writeln!(
            writer,
            "  {}: {} added, {} kept",
            summary.target_table.display(),
            plural(report.target_added, "key"),
            report.target_kept
        );
        for table in &report.recovered {
            let backup = match &table.backup {
                Some(backup) => format!("backup: {}", backup.display()),
                None => "no backup could be made".to_string(),
            };
            let _ = writeln!(
                writer,
                "{} {} was malformed and has been rebuilt ({})",
                "warning:".bold().yellow(),
                table.path.display(),
                backup
            );
        }
        for conflict in &report.conflicts {
            let _ = writeln!(writer, "{} {}", "warning:".bold().yellow(), conflict);
        }
    }
}

fn print_init<W: Write>(summary: &InitSummary, writer: &mut W) {
    if summary.created {
        let _ = writeln!(
            writer,
            "{} {}",
            SUCCESS_MARK.green(),
            format!("Created {}", CONFIG_FILE_NAME).green()
        );
    } else {
        let _ = writeln!(
            writer,
            "{} {} already exists",
            FAILURE_MARK.red(),
            summary.path.display()
        );
    }
}
