//! Solscan - static analysis for Solidity sources.
//!
//! Solscan resolves a scope of `.sol` files, parses each into a syntax
//! tree, evaluates a categorized catalog of issue definitions against
//! every file, and assembles a deterministic two-part markdown report:
//! a summary table for every issue (zero counts included), then a detail
//! section per issue with at least one instance.
//!
//! # Architecture
//!
//! - `scope`: Turns a scope descriptor (directory, file, or inline text)
//!   into an ordered, deduplicated list of `.sol` paths
//! - `compile`: Tree-sitter front-end producing a `SourceFile` per path
//! - `catalog`: The issue definitions, grouped by category, plus the
//!   matcher predicates they are built from
//! - `evaluate`: Runs one issue against one file, fail-soft
//! - `analyze`: Fans the (issue x file) grid out over worker threads and
//!   aggregates per-issue findings for one category
//! - `report`: Markdown and JSON assembly
//! - `config`: YAML run configuration (category order, disabled issues,
//!   excluded paths)
//!
//! # Adding a New Issue
//!
//! See `src/catalog/` for examples. Build an `IssueDefinition` from one
//! of the matcher types in `catalog::matchers` and append it to the
//! category module's `issues()` list.

pub mod analyze;
pub mod catalog;
pub mod cli;
pub mod compile;
pub mod config;
pub mod error;
pub mod evaluate;
pub mod install;
pub mod report;
pub mod scope;

pub use analyze::{analyze, AnalysisResult, IssueReport};
pub use catalog::{Catalog, Category, IssueDefinition, Match, Matcher, Severity};
pub use compile::{compile, SourceFile, Span};
pub use config::RunConfig;
pub use error::ScanError;
pub use evaluate::Finding;
