//! Structural code smell detection.
//!
//! Thresholds are fixed contract values; they are deliberately not
//! configurable.

use crate::analyze::types::{Finding, Severity};
use crate::ast::{Node, Value};

/// Maximum top-level statements in a function body.
pub const MAX_FUNCTION_STATEMENTS: usize = 40;
/// Maximum conditional nodes anywhere inside a function.
pub const MAX_FUNCTION_BRANCHES: usize = 5;
/// Maximum statements in a class body.
pub const MAX_CLASS_STATEMENTS: usize = 100;
/// Numeric literals above this absolute value are magic numbers.
pub const MAGIC_NUMBER_THRESHOLD: f64 = 1000.0;

/// Detect structural smells in a parsed tree.
pub fn detect(tree: &Node) -> Vec<Finding> {
    let mut findings = Vec::new();
    visit(tree, &mut findings);
    findings
}

fn visit(node: &Node, findings: &mut Vec<Finding>) {
    match node {
        Node::FunctionDef {
            name, line, body, ..
        } => {
            if body.len() > MAX_FUNCTION_STATEMENTS {
                findings.push(
                    Finding::new(
                        Some(*line),
                        Severity::Medium,
                        "Long Function",
                        format!(
                            "Function '{}' has {} top-level statements (limit {}).",
                            name,
                            body.len(),
                            MAX_FUNCTION_STATEMENTS
                        ),
                    )
                    .with_suggestion("Split the function into smaller pieces."),
                );
            }
            let branches: usize = body.iter().map(conditional_count).sum();
            if branches > MAX_FUNCTION_BRANCHES {
                findings.push(
                    Finding::new(
                        Some(*line),
                        Severity::Medium,
                        "Deeply Nested Function",
                        format!(
                            "Function '{}' has {} conditional branches (limit {}).",
                            name, branches, MAX_FUNCTION_BRANCHES
                        ),
                    )
                    .with_suggestion("Flatten the branching with early returns or dispatch."),
                );
            }
        }
        Node::ClassDef {
            name, line, body, ..
        } => {
            if body.len() > MAX_CLASS_STATEMENTS {
                findings.push(
                    Finding::new(
                        Some(*line),
                        Severity::Medium,
                        "Large Class",
                        format!(
                            "Class '{}' has {} statements (limit {}).",
                            name,
                            body.len(),
                            MAX_CLASS_STATEMENTS
                        ),
                    )
                    .with_suggestion("Break the class up along its responsibilities."),
                );
            }
        }
        Node::Constant {
            line,
            value: Value::Num(value),
        } => {
            if value.abs() > MAGIC_NUMBER_THRESHOLD {
                findings.push(
                    Finding::new(
                        Some(*line),
                        Severity::Low,
                        "Magic Number",
                        format!("Magic number {} should be a named constant.", format_number(*value)),
                    )
                    .with_suggestion("Extract the value into a named constant."),
                );
            }
        }
        _ => {}
    }

    for child in node.children() {
        visit(child, findings);
    }
}

/// Count conditional nodes in the full sub-tree rooted at `node`.
fn conditional_count(node: &Node) -> usize {
    let own = matches!(node, Node::Conditional { .. }) as usize;
    own + node.children().iter().map(|c| conditional_count(c)).sum::<usize>()
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}
