//! Core transform engine.
//!
//! A file goes through one pipeline, driven by [`transform::transform_source`]:
//!
//! 1. **Parse** (`parsers`, `source_unit`): swc module plus the original text
//! 2. **Classify** (`classify`): which functions are components
//! 3. **Inject** (`inject`): hook import and per-component `t` binding
//! 4. **Extract** (`extract`, `keygen`): JSX text to `t('key')` calls
//! 5. **Render** (`patch`): edits spliced into the original text
//!
//! `file_scanner` finds the files to feed it.

pub mod classify;
pub mod extract;
pub mod file_scanner;
pub mod inject;
pub mod keygen;
pub mod parsers;
pub mod patch;
pub mod source_unit;
pub mod transform;
