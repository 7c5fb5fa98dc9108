//! CLI argument definitions using clap.
//!
//! ## Commands
//!
//! - `extract`: Rewrite hard-coded JSX text into `t()` calls and update the locale tables
//! - `init`: Initialize the i18nize configuration file

use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};

use crate::core::keygen::KeyStrategy;

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Arguments {
    /// Check if a command was provided, otherwise print help and return None.
    pub fn with_command_or_help(self) -> Option<Self> {
        if self.command.is_none() {
            Self::command().print_help().ok();
            None
        } else {
            Some(self)
        }
    }

    pub fn verbose(&self) -> bool {
        match &self.command {
            Some(Command::Extract(cmd)) => cmd.common.verbose,
            Some(Command::Init) | None => false,
        }
    }
}

/// Arguments shared by commands that read the project configuration.
#[derive(Debug, Clone, Args)]
pub struct CommonArgs {
    /// Project root: where the config file is searched from and includes are resolved
    #[arg(long)]
    pub source_root: Option<PathBuf>,

    /// Directory holding the locale tables (overrides config file)
    #[arg(long)]
    pub locales_root: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Args)]
pub struct ExtractCommand {
    /// Files or directories to process (overrides `includes` from the config file)
    pub sources: Vec<PathBuf>,

    /// Report what would change without writing any file
    #[arg(long)]
    pub dry_run: bool,

    /// How lookup keys are derived from text (overrides config file)
    #[arg(long, value_enum)]
    pub key_strategy: Option<KeyStrategy>,

    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Replace hard-coded JSX text with t() calls and record the keys in the locale tables
    Extract(ExtractCommand),
    /// Initialize a new .i18nizerc.json configuration file
    Init,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_extract_arguments() {
        let args = Arguments::try_parse_from([
            "i18nize",
            "extract",
            "src/App.tsx",
            "src/pages",
            "--dry-run",
            "--key-strategy",
            "component-slug",
            "-v",
        ])
        .unwrap();

        let Some(Command::Extract(cmd)) = &args.command else {
            panic!("expected extract command");
        };
        assert_eq!(
            cmd.sources,
            vec![PathBuf::from("src/App.tsx"), PathBuf::from("src/pages")]
        );
        assert!(cmd.dry_run);
        assert_eq!(cmd.key_strategy, Some(KeyStrategy::ComponentSlug));
        assert!(args.verbose());
    }

    #[test]
    fn test_no_command() {
        let args = Arguments::try_parse_from(["i18nize"]).unwrap();
        assert!(args.command.is_none());
        assert!(!args.verbose());
    }
}
