//! The issue catalog: declarative issue definitions as data.
//!
//! Every issue the scanner knows about is a value in one ordered catalog -
//! an id, a title, a category, and a matcher predicate. Category
//! partitioning and report ordering are pure data operations over that
//! sequence: the catalog's registration order is a visible contract,
//! reflected verbatim in the summary table and detail sections.

pub mod matchers;

mod gas;
mod high;
mod low;
mod medium;
mod noncritical;

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::RunConfig;
use crate::error::ScanError;

pub use matchers::{Match, Matcher};

/// Issue classification bucket; defines report section grouping.
///
/// The set is closed: configuration can reorder or drop categories but
/// never introduce new ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    High,
    Medium,
    Low,
    NonCritical,
    Gas,
}

impl Category {
    /// Default report order.
    pub const DEFAULT_ORDER: [Category; 5] = [
        Category::High,
        Category::Medium,
        Category::Low,
        Category::NonCritical,
        Category::Gas,
    ];

    /// Short code used in issue labels (`[H-1]`, `[GAS-3]`, ...) and in
    /// configuration.
    pub fn code(&self) -> &'static str {
        match self {
            Category::High => "H",
            Category::Medium => "M",
            Category::Low => "L",
            Category::NonCritical => "NC",
            Category::Gas => "GAS",
        }
    }

    /// Parse a category code.
    pub fn parse(code: &str) -> Option<Self> {
        match code {
            "H" => Some(Category::High),
            "M" => Some(Category::Medium),
            "L" => Some(Category::Low),
            "NC" => Some(Category::NonCritical),
            "GAS" => Some(Category::Gas),
            _ => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::High => write!(f, "High"),
            Category::Medium => write!(f, "Medium"),
            Category::Low => write!(f, "Low"),
            Category::NonCritical => write!(f, "Non-Critical"),
            Category::Gas => write!(f, "Gas Optimization"),
        }
    }
}

/// Severity levels for findings (used in JSON output).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
        }
    }
}

/// A named, categorized rule with a predicate that inspects a file and
/// reports findings. Immutable after catalog load.
pub struct IssueDefinition {
    /// Unique id (kebab-case, stable across runs).
    pub id: &'static str,
    /// Human-readable title used in the report.
    pub title: &'static str,
    /// Optional longer description rendered under the detail heading.
    pub description: Option<&'static str>,
    pub category: Category,
    /// Explicit severity; when absent it defaults from the category.
    pub severity: Option<Severity>,
    /// The detection predicate.
    pub matcher: Box<dyn Matcher>,
}

impl IssueDefinition {
    /// The effective severity for this issue.
    pub fn severity(&self) -> Severity {
        self.severity.unwrap_or(match self.category {
            Category::High | Category::Medium => Severity::Error,
            Category::Low => Severity::Warning,
            Category::NonCritical | Category::Gas => Severity::Info,
        })
    }
}

/// The ordered, validated collection of issue definitions for a run.
pub struct Catalog {
    issues: Vec<IssueDefinition>,
}

impl fmt::Debug for Catalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Catalog")
            .field(
                "issues",
                &self.issues.iter().map(|i| i.id).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl Catalog {
    /// Load the built-in catalog, minus any issues the config disables.
    pub fn load(config: &RunConfig) -> Result<Self, ScanError> {
        let issues = builtin_issues()
            .into_iter()
            .filter(|issue| !config.is_issue_disabled(issue.id))
            .collect();
        Self::from_issues(issues)
    }

    /// Build a catalog from explicit definitions, validating id uniqueness.
    pub fn from_issues(issues: Vec<IssueDefinition>) -> Result<Self, ScanError> {
        let mut seen = HashSet::new();
        for issue in &issues {
            if !seen.insert(issue.id) {
                return Err(ScanError::DuplicateIssueId(issue.id.to_string()));
            }
        }
        Ok(Self { issues })
    }

    pub fn issues(&self) -> &[IssueDefinition] {
        &self.issues
    }

    /// The issues of one category, preserving catalog order.
    pub fn partition(&self, category: Category) -> Vec<&IssueDefinition> {
        self.issues
            .iter()
            .filter(|issue| issue.category == category)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }
}

/// All built-in issue definitions, in catalog order.
fn builtin_issues() -> Vec<IssueDefinition> {
    let mut issues = Vec::new();
    issues.extend(high::issues());
    issues.extend(medium::issues());
    issues.extend(low::issues());
    issues.extend(noncritical::issues());
    issues.extend(gas::issues());
    issues
}
