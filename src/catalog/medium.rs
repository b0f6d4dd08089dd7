//! Medium-severity issue definitions.

use super::matchers::{LineRegex, NodeQuery};
use super::{Category, IssueDefinition, Severity};

pub fn issues() -> Vec<IssueDefinition> {
    vec![
        IssueDefinition {
            id: "tx-origin-auth",
            title: "`tx.origin` used for authorization",
            description: Some(
                "`tx.origin` is the transaction sender, not the caller; any contract \
                 the user interacts with can pass a `tx.origin` check on their behalf. \
                 Use `msg.sender` instead.",
            ),
            category: Category::Medium,
            severity: None,
            matcher: Box::new(LineRegex::new(r"tx\.origin")),
        },
        IssueDefinition {
            id: "unchecked-transfer",
            title: "Return value of `transfer`/`transferFrom` not checked",
            description: Some(
                "Tokens that return `false` instead of reverting will fail silently \
                 when the result of `transfer` or `transferFrom` is discarded.",
            ),
            category: Category::Medium,
            severity: Some(Severity::Warning),
            matcher: Box::new(
                NodeQuery::new("(call_expression) @call", "call").with_filter(|file, node| {
                    let text = file.node_text(node);
                    let is_transfer =
                        text.contains(".transfer(") || text.contains(".transferFrom(");
                    // A bare call statement discards the return value.
                    let discarded = node
                        .parent()
                        .is_some_and(|p| p.kind() == "expression_statement");
                    is_transfer && discarded
                }),
            ),
        },
    ]
}
