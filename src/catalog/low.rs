//! Low-severity issue definitions.

use anyhow::Result;

use crate::compile::{SourceFile, Span};

use super::matchers::{LineRegex, Match, Walker};
use super::{Category, IssueDefinition};

pub fn issues() -> Vec<IssueDefinition> {
    vec![
        IssueDefinition {
            id: "block-timestamp",
            title: "Reliance on `block.timestamp`",
            description: Some(
                "Validators have some control over block timestamps; time-sensitive \
                 logic tolerating less than a ~15 second skew should not depend on it.",
            ),
            category: Category::Low,
            severity: None,
            matcher: Box::new(LineRegex::new(r"block\.timestamp")),
        },
        IssueDefinition {
            id: "abi-encodepacked-collision",
            title: "`abi.encodePacked` with dynamic types",
            description: Some(
                "Packed encoding of more than one dynamic type is ambiguous: \
                 `encodePacked(\"a\", \"bc\")` equals `encodePacked(\"ab\", \"c\")`. \
                 Use `abi.encode` when hashing.",
            ),
            category: Category::Low,
            severity: None,
            matcher: Box::new(LineRegex::new(r"abi\.encodePacked\(")),
        },
        IssueDefinition {
            id: "floating-pragma",
            title: "Floating or unbounded pragma",
            description: Some(
                "Contracts should be deployed with the compiler version they were \
                 tested against; pin the pragma instead of `^` or `>` ranges.",
            ),
            category: Category::Low,
            severity: None,
            matcher: Box::new(Walker(floating_pragma)),
        },
    ]
}

/// Flag `pragma solidity` directives that use a range instead of a pinned
/// version.
fn floating_pragma(file: &SourceFile) -> Result<Vec<Match>> {
    let mut matches = Vec::new();
    let mut offset = 0usize;

    for line in file.content.split('\n') {
        let trimmed = line.trim_start();
        if let Some(rest) = trimmed.strip_prefix("pragma solidity") {
            if rest.contains('^') || rest.contains('>') {
                let start = offset + (line.len() - trimmed.len());
                let end = offset + line.trim_end().len();
                matches.push(Match::at(Span::from_range(&file.content, start, end)));
            }
        }
        offset += line.len() + 1;
    }

    Ok(matches)
}
