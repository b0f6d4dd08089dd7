//! Matcher predicates.
//!
//! A matcher is a pure function of one source file: it may inspect the raw
//! text, the syntax tree, or both, and returns the spans it flags. Matchers
//! never share mutable state, so evaluations for different (issue, file)
//! pairs can run concurrently without coordination.

use anyhow::Result;
use once_cell::sync::OnceCell;
use regex::Regex;
use streaming_iterator::StreamingIterator;
use tree_sitter::{Node, Query, QueryCursor};

use crate::compile::{self, SourceFile, Span};

/// One flagged occurrence inside a file.
#[derive(Debug, Clone)]
pub struct Match {
    pub span: Span,
    /// Optional note rendered alongside the instance.
    pub message: Option<String>,
}

impl Match {
    pub fn at(span: Span) -> Self {
        Self {
            span,
            message: None,
        }
    }
}

/// A detection predicate over one source file.
pub trait Matcher: Send + Sync {
    fn find(&self, file: &SourceFile) -> Result<Vec<Match>>;
}

// =============================================================================
// Line-oriented regex matcher
// =============================================================================

/// Flags every regex match, line by line.
///
/// In the default (code-only) mode, matches inside string literals or after
/// a `//` comment start are skipped. `anywhere` keeps them, for rules that
/// target comments themselves.
pub struct LineRegex {
    pattern: &'static str,
    code_only: bool,
    compiled: OnceCell<Regex>,
}

impl LineRegex {
    /// Match in code only (skip comments and string literals).
    pub fn new(pattern: &'static str) -> Self {
        Self {
            pattern,
            code_only: true,
            compiled: OnceCell::new(),
        }
    }

    /// Match anywhere on the line, comments and strings included.
    pub fn anywhere(pattern: &'static str) -> Self {
        Self {
            code_only: false,
            ..Self::new(pattern)
        }
    }

    fn regex(&self) -> Result<&Regex> {
        self.compiled.get_or_try_init(|| {
            Regex::new(self.pattern)
                .map_err(|e| anyhow::anyhow!("compiling pattern {:?}: {}", self.pattern, e))
        })
    }
}

impl Matcher for LineRegex {
    fn find(&self, file: &SourceFile) -> Result<Vec<Match>> {
        let regex = self.regex()?;
        let mut matches = Vec::new();
        let mut offset = 0usize;

        for (idx, line) in file.content.split('\n').enumerate() {
            let comment = comment_start(line);
            for m in regex.find_iter(line) {
                let skip = self.code_only
                    && (comment.is_some_and(|c| m.start() >= c)
                        || is_inside_string_literal(line, m.start()));
                if !skip {
                    matches.push(Match::at(Span::on_line(idx + 1, offset, m.start(), m.end())));
                }
            }
            offset += line.len() + 1;
        }

        Ok(matches)
    }
}

/// Byte offset where a `//` comment starts on this line, ignoring `//`
/// sequences inside string literals.
pub fn comment_start(line: &str) -> Option<usize> {
    let bytes = line.as_bytes();
    let mut in_string = false;
    let mut string_char = 0u8;
    let mut escaped = false;

    let mut i = 0;
    while i < bytes.len() {
        let ch = bytes[i];
        if escaped {
            escaped = false;
        } else if in_string {
            match ch {
                b'\\' => escaped = true,
                c if c == string_char => in_string = false,
                _ => {}
            }
        } else {
            match ch {
                b'"' | b'\'' => {
                    in_string = true;
                    string_char = ch;
                }
                b'/' if i + 1 < bytes.len() && bytes[i + 1] == b'/' => return Some(i),
                _ => {}
            }
        }
        i += 1;
    }
    None
}

/// Check if a position in a line falls within a string literal.
pub fn is_inside_string_literal(line: &str, pos: usize) -> bool {
    let mut in_string = false;
    let mut string_char = None;
    let mut escaped = false;

    for (i, ch) in line.char_indices() {
        if i >= pos {
            return in_string;
        }

        if escaped {
            escaped = false;
            continue;
        }
        if ch == '\\' && in_string {
            escaped = true;
            continue;
        }

        if ch == '"' || ch == '\'' {
            if !in_string {
                in_string = true;
                string_char = Some(ch);
            } else if Some(ch) == string_char {
                in_string = false;
                string_char = None;
            }
        }
    }

    in_string
}

// =============================================================================
// Syntax tree matchers
// =============================================================================

/// Flags nodes captured by a tree-sitter query, optionally narrowed by a
/// filter over the captured node.
pub struct NodeQuery {
    query: &'static str,
    capture: &'static str,
    filter: Option<fn(&SourceFile, Node) -> bool>,
}

impl NodeQuery {
    pub fn new(query: &'static str, capture: &'static str) -> Self {
        Self {
            query,
            capture,
            filter: None,
        }
    }

    pub fn with_filter(mut self, filter: fn(&SourceFile, Node) -> bool) -> Self {
        self.filter = Some(filter);
        self
    }
}

impl Matcher for NodeQuery {
    fn find(&self, file: &SourceFile) -> Result<Vec<Match>> {
        let language = compile::language();
        let query = Query::new(&language, self.query)
            .map_err(|e| anyhow::anyhow!("compiling query: {}", e))?;
        let capture_index = query
            .capture_index_for_name(self.capture)
            .ok_or_else(|| anyhow::anyhow!("query has no capture named {:?}", self.capture))?;

        let mut matches = Vec::new();
        let mut cursor = QueryCursor::new();
        let mut results = cursor.matches(&query, file.root(), file.content.as_bytes());

        results.advance();
        while let Some(result) = results.get() {
            for capture in result.captures {
                if capture.index != capture_index {
                    continue;
                }
                let keep = self.filter.map_or(true, |f| f(file, capture.node));
                if keep {
                    matches.push(Match::at(Span::from_node(capture.node)));
                }
            }
            results.advance();
        }

        Ok(matches)
    }
}

/// A free-function predicate, for rules whose logic doesn't fit a single
/// regex or query.
pub struct Walker(pub fn(&SourceFile) -> Result<Vec<Match>>);

impl Matcher for Walker {
    fn find(&self, file: &SourceFile) -> Result<Vec<Match>> {
        (self.0)(file)
    }
}
