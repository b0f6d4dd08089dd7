//! Fatal error taxonomy for a scan run.
//!
//! Everything here aborts the run before a report is written. Individual
//! matcher failures are deliberately *not* represented: they are isolated
//! inside the evaluator and surface only as stderr diagnostics.

use thiserror::Error;

/// Errors that abort a scan before any report is produced.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The scope descriptor resolved to zero Solidity files.
    #[error("scope is empty: no Solidity files resolved from {0:?}")]
    EmptyScope(String),

    /// The front-end could not build a syntax tree for a file.
    ///
    /// The run requires a tree for every file in scope; a partial tree set
    /// would silently drop files from every category's analysis.
    #[error("failed to build syntax tree for {path}: {reason}")]
    Compilation { path: String, reason: String },

    /// Two issue definitions in the catalog share an id.
    #[error("duplicate issue id {0:?} in catalog")]
    DuplicateIssueId(String),

    /// A configured category code does not name a recognized category.
    #[error("unknown category {0:?} (expected one of H, M, L, NC, GAS)")]
    UnknownCategory(String),
}
