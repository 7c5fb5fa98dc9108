//! i18nize - extract hard-coded JSX text into react-i18next lookups
//!
//! i18nize rewrites the human-readable text in React components into `t('key')`
//! calls, injects the `useTranslation` hook where it is missing, and records every
//! key in a source-language and a target-language JSON table.
//!
//! ## Module Structure
//!
//! - `cli`: Command-line interface layer
//! - `config`: Configuration file loading and validation
//! - `core`: The per-file transform engine (classify, inject, extract)
//! - `error`: Error types for transforms and locale persistence
//! - `locale`: Locale table loading, merging, and atomic writes

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod locale;
