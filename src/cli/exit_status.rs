use std::process::ExitCode;

/// Exit status for CLI commands.
///
/// - `Success` (0): every file was handled and the locale tables were written
/// - `Failure` (1): the run finished, but a file failed, the tables could not be
///   written, or a key conflict was found
/// - `Error` (2): the run could not start (bad config, bad arguments)
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ExitStatus {
    Success,
    Failure,
    Error,
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        match status {
            ExitStatus::Success => ExitCode::from(0),
            ExitStatus::Failure => ExitCode::from(1),
            ExitStatus::Error => ExitCode::from(2),
        }
    }
}
