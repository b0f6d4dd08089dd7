//! The matcher evaluator: one issue definition against one source file.
//!
//! Evaluation is a pure function of the (issue, file) pair, which is what
//! allows the category analyzer to fan the grid out over worker threads.
//! An unreliable matcher must never take down the run: a predicate error is
//! downgraded to "no findings for this pair" plus a stderr diagnostic.

use serde::Serialize;

use crate::catalog::IssueDefinition;
use crate::compile::{SourceFile, Span};

/// One concrete occurrence of an issue in one file at one location.
#[derive(Debug, Clone, Serialize)]
pub struct Finding {
    pub issue_id: String,
    pub file: String,
    /// Position of the file in scope-resolution order; report ordering key.
    #[serde(skip)]
    pub file_index: usize,
    pub span: Span,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Run one issue's predicate against one file.
///
/// Fail-soft: a matcher error yields zero findings and a diagnostic.
pub fn evaluate(issue: &IssueDefinition, file_index: usize, file: &SourceFile) -> Vec<Finding> {
    match issue.matcher.find(file) {
        Ok(matches) => matches
            .into_iter()
            .map(|m| Finding {
                issue_id: issue.id.to_string(),
                file: file.path.clone(),
                file_index,
                span: m.span,
                message: m.message,
            })
            .collect(),
        Err(e) => {
            eprintln!(
                "Warning: matcher {:?} failed on {}: {}",
                issue.id, file.path, e
            );
            Vec::new()
        }
    }
}

/// Sort findings into canonical report order (file order, then in-file
/// span order) and drop duplicates sharing `(issue_id, file, span)`.
pub fn dedup_findings(findings: &mut Vec<Finding>) {
    findings.sort_by(|a, b| {
        (a.file_index, a.span.ordinal(), a.issue_id.as_str())
            .cmp(&(b.file_index, b.span.ordinal(), b.issue_id.as_str()))
    });
    findings.dedup_by(|a, b| a.issue_id == b.issue_id && a.file == b.file && a.span == b.span);
}
