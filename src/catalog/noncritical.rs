//! Non-critical (style and hygiene) issue definitions.

use anyhow::Result;

use crate::compile::{SourceFile, Span};

use super::matchers::{LineRegex, Match, Walker};
use super::{Category, IssueDefinition};

pub fn issues() -> Vec<IssueDefinition> {
    vec![
        IssueDefinition {
            id: "require-no-message",
            title: "`require()` without an error message",
            description: Some(
                "A bare `require(condition)` reverts without telling the caller what \
                 failed; add a reason string or a custom error.",
            ),
            category: Category::NonCritical,
            severity: None,
            matcher: Box::new(Walker(require_without_message)),
        },
        IssueDefinition {
            id: "missing-spdx",
            title: "Missing SPDX license identifier",
            description: None,
            category: Category::NonCritical,
            severity: None,
            matcher: Box::new(Walker(missing_spdx)),
        },
        IssueDefinition {
            id: "unresolved-markers",
            title: "Unfinished-work markers left in code",
            description: None,
            category: Category::NonCritical,
            severity: None,
            matcher: Box::new(LineRegex::anywhere(r"\b(TODO|FIXME|XXX)\b")),
        },
    ]
}

/// Flag `require(...)` calls whose argument list has no second (message)
/// argument. Handles calls spanning multiple lines.
fn require_without_message(file: &SourceFile) -> Result<Vec<Match>> {
    let content = &file.content;
    let bytes = content.as_bytes();
    let mut matches = Vec::new();
    let mut search_from = 0usize;

    while let Some(rel) = content[search_from..].find("require") {
        let start = search_from + rel;
        search_from = start + "require".len();

        // Must be the identifier `require`, not a suffix of another name.
        if start > 0 {
            let prev = bytes[start - 1];
            if prev.is_ascii_alphanumeric() || prev == b'_' {
                continue;
            }
        }

        // Skip whitespace to the opening parenthesis.
        let mut i = search_from;
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        if i >= bytes.len() || bytes[i] != b'(' {
            continue;
        }

        // Walk the balanced argument list, counting top-level commas and
        // ignoring anything inside nested parens or string literals.
        let mut depth = 0usize;
        let mut top_level_commas = 0usize;
        let mut in_string = false;
        let mut string_char = 0u8;
        let mut escaped = false;
        let open = i;
        let mut close = None;

        for (j, &ch) in bytes.iter().enumerate().skip(open) {
            if escaped {
                escaped = false;
                continue;
            }
            if in_string {
                match ch {
                    b'\\' => escaped = true,
                    c if c == string_char => in_string = false,
                    _ => {}
                }
                continue;
            }
            match ch {
                b'"' | b'\'' => {
                    in_string = true;
                    string_char = ch;
                }
                b'(' => depth += 1,
                b')' => {
                    depth -= 1;
                    if depth == 0 {
                        close = Some(j);
                        break;
                    }
                }
                b',' if depth == 1 => top_level_commas += 1,
                _ => {}
            }
        }

        if let Some(close) = close {
            if top_level_commas == 0 {
                matches.push(Match::at(Span::from_range(content, start, close + 1)));
            }
            search_from = close + 1;
        }
    }

    Ok(matches)
}

/// One finding at the top of the file when no SPDX identifier is present.
fn missing_spdx(file: &SourceFile) -> Result<Vec<Match>> {
    if file.content.contains("SPDX-License-Identifier") {
        return Ok(Vec::new());
    }
    Ok(vec![Match {
        span: Span::from_range(&file.content, 0, 0),
        message: Some("file does not declare an SPDX license identifier".to_string()),
    }])
}
