//! Run configuration.
//!
//! The issue catalog contents and the category ordering are configuration
//! inputs, not hardcoded behavior: a YAML config can reorder or drop report
//! sections, disable individual issues, and exclude paths from the scope.
//! Everything is optional; an absent config means the built-in defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::catalog::Category;
use crate::error::ScanError;

/// Top-level run configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct RunConfig {
    /// Category codes in report order (e.g. `["H", "M", "GAS"]`).
    /// Absent means all categories in the default order.
    #[serde(default)]
    pub categories: Option<Vec<String>>,
    /// Issue ids to leave out of the catalog for this run.
    #[serde(default)]
    pub disabled_issues: Vec<String>,
    /// Glob patterns for paths to drop from the scope (e.g. `"test/**"`).
    #[serde(default)]
    pub excluded_paths: Vec<String>,
}

impl RunConfig {
    /// Parse a configuration from a YAML file.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: RunConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// The category order for the report.
    ///
    /// Fails with [`ScanError::UnknownCategory`] when a configured code does
    /// not name a recognized category; the recognized set is closed.
    pub fn category_order(&self) -> Result<Vec<Category>, ScanError> {
        match &self.categories {
            None => Ok(Category::DEFAULT_ORDER.to_vec()),
            Some(codes) => codes
                .iter()
                .map(|code| {
                    Category::parse(code).ok_or_else(|| ScanError::UnknownCategory(code.clone()))
                })
                .collect(),
        }
    }

    /// Check whether an issue id is disabled for this run.
    pub fn is_issue_disabled(&self, id: &str) -> bool {
        self.disabled_issues.iter().any(|d| d == id)
    }

    /// Check if a path matches any excluded_paths pattern.
    pub fn is_path_excluded(&self, path: &Path) -> bool {
        if self.excluded_paths.is_empty() {
            return false;
        }

        let path_str = path.to_string_lossy();
        for pattern in &self.excluded_paths {
            if let Ok(glob) = globset::Glob::new(pattern) {
                if glob.compile_matcher().is_match(&*path_str) {
                    return true;
                }
            }
        }
        false
    }
}

/// Validate a configuration for correctness before any file is touched.
pub fn validate(config: &RunConfig) -> anyhow::Result<()> {
    config.category_order()?;

    for pattern in &config.excluded_paths {
        globset::Glob::new(pattern)
            .map_err(|e| anyhow::anyhow!("invalid excluded_paths pattern {:?}: {}", pattern, e))?;
    }

    Ok(())
}
