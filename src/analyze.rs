//! The category analyzer: evaluates every (issue × file) pair for one
//! category and aggregates the findings per issue.
//!
//! The evaluation grid is embarrassingly parallel - no cell shares mutable
//! state with another - so issues fan out over rayon workers. Rendered
//! order must never depend on completion order: rayon's `collect` writes
//! each issue's results into its canonical slot, and findings are sorted
//! into (file order, span order) before anything is rendered.

use rayon::prelude::*;

use crate::catalog::{Category, IssueDefinition};
use crate::compile::SourceFile;
use crate::evaluate::{dedup_findings, evaluate, Finding};
use crate::report;

/// Aggregated findings for one issue across all files in scope.
pub struct IssueReport {
    /// Report label, e.g. `GAS-1`: category code plus the issue's
    /// 1-based position within its category partition.
    pub label: String,
    pub id: String,
    pub title: String,
    pub description: Option<&'static str>,
    pub severity: crate::catalog::Severity,
    /// Deduplicated instance count; zero is valid and still reported.
    pub count: usize,
    /// Findings in (file order, span order).
    pub findings: Vec<Finding>,
}

/// One category's slice of the report, built once per run and consumed by
/// the assembler.
pub struct AnalysisResult {
    pub category: Category,
    /// Per-issue aggregates in catalog order, zero counts included.
    pub issues: Vec<IssueReport>,
    /// Rendered detail blocks, only for issues with at least one instance.
    pub detail_sections: Vec<String>,
}

impl AnalysisResult {
    /// Summary rows in catalog order: `(label, title, instance count)`.
    pub fn summary_rows(&self) -> impl Iterator<Item = (&str, &str, usize)> {
        self.issues
            .iter()
            .map(|issue| (issue.label.as_str(), issue.title.as_str(), issue.count))
    }
}

/// Run every issue of one category over every file in scope.
///
/// A category with no issue definitions yields an empty result, never an
/// error.
pub fn analyze(
    files: &[SourceFile],
    issues_in_category: &[&IssueDefinition],
    category: Category,
) -> AnalysisResult {
    // Canonical-slot collection: the result vector is indexed by catalog
    // position, not by completion order.
    let per_issue: Vec<Vec<Finding>> = issues_in_category
        .par_iter()
        .map(|issue| {
            let mut findings: Vec<Finding> = files
                .iter()
                .enumerate()
                .flat_map(|(file_index, file)| evaluate(issue, file_index, file))
                .collect();
            dedup_findings(&mut findings);
            findings
        })
        .collect();

    let issues: Vec<IssueReport> = issues_in_category
        .iter()
        .zip(per_issue)
        .enumerate()
        .map(|(index, (issue, findings))| IssueReport {
            label: format!("{}-{}", category.code(), index + 1),
            id: issue.id.to_string(),
            title: issue.title.to_string(),
            description: issue.description,
            severity: issue.severity(),
            count: findings.len(),
            findings,
        })
        .collect();

    let detail_sections = issues
        .iter()
        .filter(|issue| issue.count > 0)
        .map(|issue| report::render_detail_section(issue, files))
        .collect();

    AnalysisResult {
        category,
        issues,
        detail_sections,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::matchers::{LineRegex, Walker};
    use crate::catalog::Severity;

    fn issue(id: &'static str, matcher: Box<dyn crate::catalog::Matcher>) -> IssueDefinition {
        IssueDefinition {
            id,
            title: id,
            description: None,
            category: Category::Medium,
            severity: Some(Severity::Warning),
            matcher,
        }
    }

    fn files() -> Vec<SourceFile> {
        vec![
            SourceFile::parse(
                "a.sol",
                "contract A {\n  address x = tx.origin;\n}\n".to_string(),
            )
            .unwrap(),
            SourceFile::parse("b.sol", "contract B {\n  uint256 y = 1;\n}\n".to_string()).unwrap(),
        ]
    }

    #[test]
    fn test_zero_findings_still_get_a_summary_row() {
        let defs = vec![
            issue("hits", Box::new(LineRegex::new(r"tx\.origin"))),
            issue("misses", Box::new(LineRegex::new(r"never_present"))),
        ];
        let refs: Vec<&IssueDefinition> = defs.iter().collect();

        let result = analyze(&files(), &refs, Category::Medium);

        let rows: Vec<(&str, &str, usize)> = result.summary_rows().collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], ("M-1", "hits", 1));
        assert_eq!(rows[1], ("M-2", "misses", 0));
        // Detail gating: only the issue with instances gets a section.
        assert_eq!(result.detail_sections.len(), 1);
        assert!(result.detail_sections[0].contains("a.sol"));
    }

    #[test]
    fn test_empty_category_is_not_an_error() {
        let result = analyze(&files(), &[], Category::High);
        assert!(result.issues.is_empty());
        assert!(result.detail_sections.is_empty());
    }

    #[test]
    fn test_failing_matcher_does_not_poison_other_issues() {
        let defs = vec![
            issue("broken", Box::new(Walker(|_| anyhow::bail!("bug")))),
            issue("works", Box::new(LineRegex::new(r"tx\.origin"))),
        ];
        let refs: Vec<&IssueDefinition> = defs.iter().collect();

        let result = analyze(&files(), &refs, Category::Medium);
        assert_eq!(result.issues[0].count, 0);
        assert_eq!(result.issues[1].count, 1);
    }

    #[test]
    fn test_findings_ordered_by_file_then_location() {
        let defs = vec![issue("ts", Box::new(LineRegex::new(r"uint256|tx\.origin")))];
        let refs: Vec<&IssueDefinition> = defs.iter().collect();

        let result = analyze(&files(), &refs, Category::Medium);
        let findings = &result.issues[0].findings;
        assert_eq!(findings.len(), 2);
        assert_eq!(findings[0].file, "a.sol");
        assert_eq!(findings[1].file, "b.sol");
    }
}
