//! High-severity issue definitions.

use anyhow::Result;

use crate::compile::{visit, SourceFile, Span};

use super::matchers::{LineRegex, Match, Walker};
use super::{Category, IssueDefinition};

pub fn issues() -> Vec<IssueDefinition> {
    vec![
        IssueDefinition {
            id: "delegatecall-in-loop",
            title: "`delegatecall` inside a loop",
            description: Some(
                "A `delegatecall` made in a loop forwards `msg.value` on every \
                 iteration and can be abused to drain the contract.",
            ),
            category: Category::High,
            severity: None,
            matcher: Box::new(Walker(delegatecall_in_loop)),
        },
        IssueDefinition {
            id: "selfdestruct-used",
            title: "Use of `selfdestruct`",
            description: Some(
                "`selfdestruct` removes the contract and force-sends its balance; \
                 if reachable it must be behind strict access control.",
            ),
            category: Category::High,
            severity: None,
            matcher: Box::new(LineRegex::new(r"\bselfdestruct\s*\(")),
        },
    ]
}

/// Flag every call expression mentioning `delegatecall` that sits inside a
/// loop body.
fn delegatecall_in_loop(file: &SourceFile) -> Result<Vec<Match>> {
    let mut matches = Vec::new();

    visit(file.root(), &mut |node| {
        if !matches!(
            node.kind(),
            "for_statement" | "while_statement" | "do_while_statement"
        ) {
            return;
        }
        visit(node, &mut |inner| {
            if inner.kind() == "call_expression" && file.node_text(inner).contains("delegatecall") {
                matches.push(Match::at(Span::from_node(inner)));
            }
        });
    });

    Ok(matches)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Matcher;

    #[test]
    fn test_delegatecall_flagged_only_inside_loops() {
        let file = SourceFile::parse(
            "test.sol",
            r#"
contract Proxy {
    function batch(address target, bytes[] memory calls) public {
        for (uint256 i = 0; i < calls.length; i++) {
            target.delegatecall(calls[i]);
        }
    }

    function single(address target, bytes memory data) public {
        target.delegatecall(data);
    }
}
"#
            .to_string(),
        )
        .unwrap();

        let matches = delegatecall_in_loop(&file).unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].span.start_line, 5);
    }

    #[test]
    fn test_selfdestruct_regex() {
        let file = SourceFile::parse(
            "test.sol",
            "contract C {\n  function kill() public {\n    selfdestruct(payable(msg.sender));\n  }\n}\n"
                .to_string(),
        )
        .unwrap();

        let issue = &issues()[1];
        assert_eq!(issue.id, "selfdestruct-used");
        let matches = issue.matcher.find(&file).unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].span.start_line, 3);
    }
}
