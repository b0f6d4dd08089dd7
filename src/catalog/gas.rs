//! Gas-optimization issue definitions.

use anyhow::Result;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::compile::{SourceFile, Span};

use super::matchers::{comment_start, LineRegex, Match, Walker};
use super::{Category, IssueDefinition};

pub fn issues() -> Vec<IssueDefinition> {
    vec![
        IssueDefinition {
            id: "postfix-increment-in-loop",
            title: "`i++` costs more gas than `++i` in for-loops",
            description: None,
            category: Category::Gas,
            severity: None,
            matcher: Box::new(LineRegex::new(r"for\s*\([^;]*;[^;]*;\s*\w+\+\+")),
        },
        IssueDefinition {
            id: "uncached-array-length",
            title: "Array length read on every loop iteration",
            description: Some(
                "Reading `.length` of a storage array in the loop condition costs a \
                 warm SLOAD per iteration; cache it in a local before the loop.",
            ),
            category: Category::Gas,
            severity: None,
            matcher: Box::new(LineRegex::new(r"for\s*\([^;]*;\s*\w+\s*<\s*\w+\.length")),
        },
        IssueDefinition {
            id: "gt-zero-comparison",
            title: "`> 0` can be `!= 0` for unsigned integers",
            description: None,
            category: Category::Gas,
            severity: None,
            matcher: Box::new(LineRegex::new(r">\s*0([^\d.]|$)")),
        },
        IssueDefinition {
            id: "long-revert-string",
            title: "Revert string longer than 32 bytes",
            description: Some(
                "Reason strings over 32 bytes need more than one EVM word to store \
                 and encode; shorten the message or use a custom error.",
            ),
            category: Category::Gas,
            severity: None,
            matcher: Box::new(Walker(long_revert_string)),
        },
    ]
}

static LONG_STRING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""[^"]{33,}""#).expect("long string pattern"));

/// Flag string literals over 32 bytes on `require`/`revert` lines.
fn long_revert_string(file: &SourceFile) -> Result<Vec<Match>> {
    let mut matches = Vec::new();
    let mut offset = 0usize;

    for line in file.content.split('\n') {
        let relevant = line.contains("require") || line.contains("revert");
        if relevant {
            let limit = comment_start(line).unwrap_or(line.len());
            for m in LONG_STRING.find_iter(line) {
                if m.start() < limit {
                    matches.push(Match::at(Span::from_range(
                        &file.content,
                        offset + m.start(),
                        offset + m.end(),
                    )));
                }
            }
        }
        offset += line.len() + 1;
    }

    Ok(matches)
}
