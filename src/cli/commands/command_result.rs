use std::path::PathBuf;

use crate::locale::FlushReport;

#[derive(Debug)]
pub enum CommandSummary {
    Extract(ExtractSummary),
    Init(InitSummary),
}

/// A file the transform could not handle. Its content was left as it was.
#[derive(Debug)]
pub struct FailedFile {
    pub path: String,
    pub reason: String,
}

#[derive(Debug, Default)]
pub struct ExtractSummary {
    pub is_dry_run: bool,
    pub files_scanned: usize,
    pub files_rewritten: usize,
    pub files_unchanged: usize,
    /// Files without any JSX.
    pub files_skipped: usize,
    pub failed_files: Vec<FailedFile>,
    pub texts_extracted: usize,
    pub hooks_added: usize,
    /// Distinct keys recorded during the run.
    pub keys_recorded: usize,
    pub source_table: PathBuf,
    pub target_table: PathBuf,
    /// `None` on dry runs, or when the flush failed.
    pub flush: Option<FlushReport>,
    pub flush_error: Option<String>,
}

impl ExtractSummary {
    /// Number of problems that make the run exit with a failure status.
    pub fn failure_count(&self) -> usize {
        let conflicts = self.flush.as_ref().map_or(0, |report| report.conflicts.len());
        self.failed_files.len() + usize::from(self.flush_error.is_some()) + conflicts
    }
}

#[derive(Debug)]
pub struct InitSummary {
    pub created: bool,
    pub path: PathBuf,
}

/// Result of running an i18nize command
#[derive(Debug)]
pub struct CommandResult {
    pub summary: CommandSummary,
    /// Problems found while running; any makes the exit status `Failure`.
    pub failure_count: usize,
}
