//! Report assembly and output formatting.
//!
//! Two formats:
//! - Markdown: the primary report - one summary table for all categories,
//!   then every detail block ("overview, then drill-down").
//! - JSON: structured findings for programmatic consumption.
//!
//! Output is fully deterministic: row and section order depend only on
//! (category order, catalog order, file order, in-file location order), so
//! identical inputs give byte-identical reports and runs can be diffed
//! across commits.

use serde::Serialize;

use crate::analyze::{analyze, AnalysisResult, IssueReport};
use crate::catalog::{Catalog, Category};
use crate::compile::SourceFile;

/// Run the category analyzer over every category in order.
pub fn build(
    categories: &[Category],
    files: &[SourceFile],
    catalog: &Catalog,
) -> Vec<AnalysisResult> {
    categories
        .iter()
        .map(|&category| analyze(files, &catalog.partition(category), category))
        .collect()
}

/// Assemble the full markdown report for the given category order.
pub fn assemble(
    categories: &[Category],
    files: &[SourceFile],
    catalog: &Catalog,
    verbose: bool,
) -> String {
    let results = build(categories, files, catalog);
    render(&results, files, verbose)
}

/// Render analysis results as the final markdown document.
pub fn render(results: &[AnalysisResult], files: &[SourceFile], verbose: bool) -> String {
    let mut out = String::from("# Report\n\n");

    if verbose {
        out.push_str("## Files analyzed\n\n");
        for file in files {
            out.push_str(&format!(" - {}\n", file.path));
        }
        out.push('\n');
    }

    out.push_str("## Summary \n\n");
    out.push_str("\n| |Issue|Instances|\n|-|:-|:-:|\n");
    for result in results {
        for (label, title, count) in result.summary_rows() {
            out.push_str(&format!("| [{}] | {} | {} |\n", label, title, count));
        }
    }
    out.push('\n');

    out.push_str("## Issues \n\n");
    for result in results {
        for section in &result.detail_sections {
            out.push_str(section);
        }
    }

    out
}

/// Render one issue's detail block: heading, optional description, and
/// every instance grouped by file.
pub fn render_detail_section(issue: &IssueReport, files: &[SourceFile]) -> String {
    let mut out = format!("### [{}] {}\n", issue.label, issue.title);
    if let Some(description) = issue.description {
        out.push_str(description);
        out.push('\n');
    }
    out.push_str(&format!("\n*Instances ({})*:\n", issue.count));

    let mut current_file = usize::MAX;
    for finding in &issue.findings {
        if finding.file_index != current_file {
            if current_file != usize::MAX {
                out.push_str("```\n\n");
            }
            current_file = finding.file_index;
            out.push_str(&format!("```solidity\nFile: {}\n\n", finding.file));
        }

        let line_text = files
            .get(finding.file_index)
            .and_then(|f| f.line(finding.span.start_line))
            .unwrap_or("")
            .trim_end();
        out.push_str(&format!("{}: {}\n", finding.span.start_line, line_text));

        if let Some(message) = &finding.message {
            out.push_str(&format!("   // {}\n", message));
        }
    }
    if current_file != usize::MAX {
        out.push_str("```\n\n");
    }

    out
}

// =============================================================================
// JSON format
// =============================================================================

/// JSON report structure.
#[derive(Serialize)]
pub struct JsonReport {
    pub version: String,
    pub files_scanned: usize,
    pub files: Vec<String>,
    pub issues: Vec<JsonIssue>,
}

/// One issue with its summary data and findings.
#[derive(Serialize)]
pub struct JsonIssue {
    pub label: String,
    pub id: String,
    pub title: String,
    pub category: Category,
    pub severity: String,
    pub instances: usize,
    pub findings: Vec<JsonFinding>,
}

#[derive(Serialize)]
pub struct JsonFinding {
    pub file: String,
    pub line: usize,
    pub column: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Render analysis results as pretty-printed JSON.
pub fn render_json(results: &[AnalysisResult], files: &[SourceFile]) -> anyhow::Result<String> {
    let issues = results
        .iter()
        .flat_map(|result| {
            result.issues.iter().map(|issue| JsonIssue {
                label: issue.label.clone(),
                id: issue.id.clone(),
                title: issue.title.clone(),
                category: result.category,
                severity: issue.severity.to_string(),
                instances: issue.count,
                findings: issue
                    .findings
                    .iter()
                    .map(|f| JsonFinding {
                        file: f.file.clone(),
                        line: f.span.start_line,
                        column: f.span.start_col,
                        message: f.message.clone(),
                    })
                    .collect(),
            })
        })
        .collect();

    let report = JsonReport {
        version: env!("CARGO_PKG_VERSION").to_string(),
        files_scanned: files.len(),
        files: files.iter().map(|f| f.path.clone()).collect(),
        issues,
    };

    Ok(serde_json::to_string_pretty(&report)?)
}
