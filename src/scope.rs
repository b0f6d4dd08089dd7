//! Scope resolution: turning a scope descriptor into an ordered,
//! deduplicated list of Solidity file paths.
//!
//! The descriptor is deliberately forgiving. It may be:
//! - a directory, which is walked for `.sol` files;
//! - a text file whose content embeds paths (a scope list, a markdown
//!   table, audit notes - anything), from which path-shaped words ending
//!   in `.sol` are extracted;
//! - an inline string of paths, treated the same way.
//!
//! File and inline descriptors go through a single word-extraction step, so
//! a descriptor that is itself a literal path and a file containing paths
//! behave identically.

use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;
use walkdir::WalkDir;

use crate::config::RunConfig;
use crate::error::ScanError;

/// Path-shaped words inside a scope descriptor.
static PATH_WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[a-zA-Z0-9/\\._\-]+").expect("path word pattern"));

/// Resolve a scope descriptor to an ordered, deduplicated list of `.sol`
/// paths, relative to `root` when possible.
///
/// Fails with [`ScanError::EmptyScope`] when nothing resolves; an empty
/// scope would make every category's analysis vacuous.
pub fn resolve(descriptor: &str, root: &Path, config: &RunConfig) -> Result<Vec<PathBuf>, ScanError> {
    let descriptor_path = root.join(descriptor);

    let candidates = if descriptor_path.is_dir() {
        walk_directory(&descriptor_path, root)
    } else {
        // A descriptor naming a .sol file is the scope itself, not a list.
        let text = if descriptor_path.is_file() && !descriptor.ends_with(".sol") {
            std::fs::read_to_string(&descriptor_path)
                .map_err(|e| ScanError::Compilation {
                    path: descriptor.to_string(),
                    reason: e.to_string(),
                })?
        } else {
            descriptor.to_string()
        };
        extract_paths(&text, root)
    };

    let mut seen = std::collections::HashSet::new();
    let mut paths = Vec::new();
    for path in candidates {
        if config.is_path_excluded(&path) {
            continue;
        }
        if seen.insert(path.clone()) {
            paths.push(path);
        }
    }

    if paths.is_empty() {
        return Err(ScanError::EmptyScope(descriptor.to_string()));
    }
    Ok(paths)
}

/// Extract existing `.sol` paths from free-form descriptor text, in the
/// order they appear.
fn extract_paths(text: &str, root: &Path) -> Vec<PathBuf> {
    PATH_WORD
        .find_iter(text)
        .map(|m| m.as_str())
        .filter(|word| word.ends_with(".sol"))
        .map(PathBuf::from)
        .filter(|p| root.join(p).is_file() || p.is_file())
        .collect()
}

/// Collect `.sol` files under a directory, skipping dependency and hidden
/// directories. Sorted walk order keeps the scope deterministic.
fn walk_directory(dir: &Path, root: &Path) -> Vec<PathBuf> {
    let mut paths = Vec::new();

    for entry in WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            let name = e.file_name().to_string_lossy();
            if e.file_type().is_dir()
                && (name.starts_with('.') || name == "node_modules" || name == "lib" || name == "out")
            {
                return false;
            }
            true
        })
        .flatten()
    {
        let path = entry.path();
        if entry.file_type().is_file() && path.extension().is_some_and(|e| e == "sol") {
            let rel = path.strip_prefix(root).unwrap_or(path);
            paths.push(rel.to_path_buf());
        }
    }

    paths
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, "contract C {}").unwrap();
    }

    #[test]
    fn test_scope_file_extracts_paths_in_order() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "contracts/Token.sol");
        touch(temp.path(), "contracts/Vault.sol");
        std::fs::write(
            temp.path().join("scope.txt"),
            "audit targets:\n- contracts/Vault.sol\n- contracts/Token.sol\n- contracts/Missing.sol\n",
        )
        .unwrap();

        let paths = resolve("scope.txt", temp.path(), &RunConfig::default()).unwrap();
        assert_eq!(
            paths,
            vec![
                PathBuf::from("contracts/Vault.sol"),
                PathBuf::from("contracts/Token.sol"),
            ]
        );
    }

    #[test]
    fn test_scope_deduplicates_preserving_first_occurrence() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "a.sol");
        touch(temp.path(), "b.sol");
        std::fs::write(temp.path().join("scope.txt"), "b.sol a.sol b.sol a.sol").unwrap();

        let paths = resolve("scope.txt", temp.path(), &RunConfig::default()).unwrap();
        assert_eq!(paths, vec![PathBuf::from("b.sol"), PathBuf::from("a.sol")]);
    }

    #[test]
    fn test_inline_descriptor() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "contracts/Token.sol");

        let paths = resolve("contracts/Token.sol", temp.path(), &RunConfig::default()).unwrap();
        assert_eq!(paths, vec![PathBuf::from("contracts/Token.sol")]);
    }

    #[test]
    fn test_directory_descriptor_skips_dependencies() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "src/A.sol");
        touch(temp.path(), "src/B.sol");
        touch(temp.path(), "src/node_modules/dep/Dep.sol");
        touch(temp.path(), "src/.hidden/H.sol");

        let paths = resolve("src", temp.path(), &RunConfig::default()).unwrap();
        assert_eq!(
            paths,
            vec![PathBuf::from("src/A.sol"), PathBuf::from("src/B.sol")]
        );
    }

    #[test]
    fn test_empty_scope_is_fatal() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("scope.txt"), "nothing here").unwrap();

        let err = resolve("scope.txt", temp.path(), &RunConfig::default()).unwrap_err();
        assert!(matches!(err, ScanError::EmptyScope(_)));
    }

    #[test]
    fn test_excluded_paths_filter_scope() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "src/A.sol");
        touch(temp.path(), "test/Mock.sol");
        std::fs::write(temp.path().join("scope.txt"), "src/A.sol test/Mock.sol").unwrap();

        let config = RunConfig {
            excluded_paths: vec!["test/**".to_string()],
            ..Default::default()
        };
        let paths = resolve("scope.txt", temp.path(), &config).unwrap();
        assert_eq!(paths, vec![PathBuf::from("src/A.sol")]);
    }
}
