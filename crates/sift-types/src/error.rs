//! # Top-Level Error
//!
//! [`SiftError`] gathers every failure a caller of the full sift stack can
//! see: malformed rules, data rejected through
//! [`ValidationResult::into_result`](sift_schema::ValidationResult::into_result),
//! and declarative definitions that failed to load.

use sift_core::CompileError;
use sift_schema::ValidationErrors;
use thiserror::Error;

use crate::definition::DefinitionError;

/// Top-level error type for sift.
#[derive(Error, Debug)]
pub enum SiftError {
    /// A rule descriptor or schema definition could not be compiled.
    #[error("schema compile error: {0}")]
    Compile(#[from] CompileError),

    /// An object failed validation and the caller asked for a hard error.
    #[error("validation failed:\n{0}")]
    Validation(#[from] ValidationErrors),

    /// A declarative schema definition could not be loaded.
    #[error("definition error: {0}")]
    Definition(#[from] DefinitionError),
}
