//! Compiler front-end and syntax tree model.
//!
//! Each file in scope is parsed once, up front, into a [`SourceFile`]
//! holding the original text and its tree-sitter syntax tree. Matchers get
//! a read-only view: they can walk nodes in source order, filter by kind,
//! resolve a node's text through its span, and navigate to parents via
//! tree-sitter's own back-references. Nothing here mutates a tree after
//! construction, which is what makes sharing files across evaluator
//! threads safe.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tree_sitter::Node;

use crate::error::ScanError;

/// Source location span with byte offsets and line/column positions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Span {
    /// Start byte offset (0-indexed).
    pub start_byte: usize,
    /// End byte offset (0-indexed, exclusive).
    pub end_byte: usize,
    /// Start line (1-indexed).
    pub start_line: usize,
    /// Start column (1-indexed).
    pub start_col: usize,
    /// End line (1-indexed).
    pub end_line: usize,
    /// End column (1-indexed).
    pub end_col: usize,
}

impl Span {
    /// Create a span from a tree-sitter node.
    pub fn from_node(node: Node) -> Self {
        let start = node.start_position();
        let end = node.end_position();
        Self {
            start_byte: node.start_byte(),
            end_byte: node.end_byte(),
            start_line: start.row + 1, // tree-sitter is 0-indexed
            start_col: start.column + 1,
            end_line: end.row + 1,
            end_col: end.column + 1,
        }
    }

    /// Create a single-line span from a byte range within that line.
    pub fn on_line(line: usize, line_start_byte: usize, start_col0: usize, end_col0: usize) -> Self {
        Self {
            start_byte: line_start_byte + start_col0,
            end_byte: line_start_byte + end_col0,
            start_line: line,
            start_col: start_col0 + 1,
            end_line: line,
            end_col: end_col0 + 1,
        }
    }

    /// Create a span from a byte range, computing line/column positions
    /// from the surrounding content.
    pub fn from_range(content: &str, start_byte: usize, end_byte: usize) -> Self {
        let (start_line, start_col) = position(content, start_byte);
        let (end_line, end_col) = position(content, end_byte);
        Self {
            start_byte,
            end_byte,
            start_line,
            start_col,
            end_line,
            end_col,
        }
    }

    /// Sort key: file-order position of the span.
    pub fn ordinal(&self) -> (usize, usize) {
        (self.start_byte, self.end_byte)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.start_line, self.start_col)
    }
}

/// A parsed source file: path, original text, and its syntax tree.
///
/// Immutable once constructed and owned by the run that loaded it. The
/// catalog's matchers receive it by shared reference only.
#[derive(Debug)]
pub struct SourceFile {
    /// Path as it appeared in the resolved scope (project-relative when
    /// possible), used as the file's unique key in findings and the report.
    pub path: String,
    /// The full source text.
    pub content: String,
    /// The tree-sitter parse tree.
    pub tree: tree_sitter::Tree,
}

impl SourceFile {
    /// Parse Solidity source text into a `SourceFile`.
    pub fn parse(path: &str, content: String) -> Result<Self, ScanError> {
        let mut parser = tree_sitter::Parser::new();
        parser
            .set_language(&language())
            .map_err(|e| ScanError::Compilation {
                path: path.to_string(),
                reason: e.to_string(),
            })?;

        let tree = parser
            .parse(&content, None)
            .ok_or_else(|| ScanError::Compilation {
                path: path.to_string(),
                reason: "parser produced no tree".to_string(),
            })?;

        Ok(Self {
            path: path.to_string(),
            content,
            tree,
        })
    }

    /// The root node of the syntax tree.
    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    /// Resolve a node's originating text via its span.
    pub fn node_text(&self, node: Node) -> &str {
        node.utf8_text(self.content.as_bytes()).unwrap_or("")
    }

    /// Get the text of a single source line (1-indexed), if it exists.
    pub fn line(&self, line: usize) -> Option<&str> {
        self.content.lines().nth(line.saturating_sub(1))
    }
}

/// The Solidity grammar.
pub fn language() -> tree_sitter::Language {
    tree_sitter_solidity::LANGUAGE.into()
}

/// 1-indexed (line, column) of a byte offset within `content`.
fn position(content: &str, byte: usize) -> (usize, usize) {
    let byte = byte.min(content.len());
    let before = &content[..byte];
    let line = before.bytes().filter(|&b| b == b'\n').count() + 1;
    let col = byte - before.rfind('\n').map_or(0, |i| i + 1) + 1;
    (line, col)
}

/// Visit `node` and all of its descendants in source (pre-order) order.
pub fn visit<'a, F: FnMut(Node<'a>)>(node: Node<'a>, f: &mut F) {
    f(node);
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        visit(child, f);
    }
}

/// Build a syntax tree for every file in scope.
///
/// Paths are read relative to `root` (absolute paths pass through). This is
/// all-or-nothing: any unreadable or unparseable file fails the run with
/// [`ScanError::Compilation`] so analysis never starts on a partial scope.
pub fn compile(root: &Path, paths: &[PathBuf]) -> Result<Vec<SourceFile>, ScanError> {
    let mut files = Vec::with_capacity(paths.len());

    for path in paths {
        let abs = if path.is_absolute() {
            path.clone()
        } else {
            root.join(path)
        };
        let key = path.to_string_lossy().replace('\\', "/");

        let content = fs::read_to_string(&abs).map_err(|e| ScanError::Compilation {
            path: key.clone(),
            reason: e.to_string(),
        })?;

        files.push(SourceFile::parse(&key, content)?);
    }

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    const VAULT: &str = r#"
pragma solidity ^0.8.0;

contract Vault {
    address owner;

    function withdraw(uint256 amount) public {
        require(msg.sender == owner);
    }
}
"#;

    #[test]
    fn test_parse_builds_tree() {
        let file = SourceFile::parse("Vault.sol", VAULT.to_string()).unwrap();
        assert_eq!(file.root().kind(), "source_file");
        assert!(file.root().child_count() > 0);
    }

    #[test]
    fn test_visit_walks_in_source_order() {
        let file = SourceFile::parse("Vault.sol", VAULT.to_string()).unwrap();

        let mut last_start = 0usize;
        let mut contract_seen = false;
        visit(file.root(), &mut |node| {
            // Pre-order traversal never moves a subtree start backwards
            // past its parent's start.
            if node.kind() == "contract_declaration" {
                contract_seen = true;
                assert!(node.start_byte() >= last_start);
            }
            last_start = last_start.max(node.start_byte());
        });
        assert!(contract_seen);
    }

    #[test]
    fn test_node_text_resolves_span() {
        let file = SourceFile::parse("Vault.sol", VAULT.to_string()).unwrap();

        let mut found = None;
        visit(file.root(), &mut |node| {
            if node.kind() == "contract_declaration" && found.is_none() {
                found = Some(Span::from_node(node));
            }
        });

        let span = found.expect("contract node");
        let text = &file.content[span.start_byte..span.end_byte];
        assert!(text.starts_with("contract Vault"));
    }

    #[test]
    fn test_compile_missing_file_is_fatal() {
        let temp = tempfile::TempDir::new().unwrap();
        let err = compile(temp.path(), &[PathBuf::from("nope.sol")]).unwrap_err();
        assert!(matches!(err, ScanError::Compilation { .. }));
    }

    #[test]
    fn test_compile_keeps_scope_order() {
        let temp = tempfile::TempDir::new().unwrap();
        std::fs::write(temp.path().join("b.sol"), "contract B {}").unwrap();
        std::fs::write(temp.path().join("a.sol"), "contract A {}").unwrap();

        let files = compile(
            temp.path(),
            &[PathBuf::from("b.sol"), PathBuf::from("a.sol")],
        )
        .unwrap();
        assert_eq!(files[0].path, "b.sol");
        assert_eq!(files[1].path, "a.sol");
    }
}
