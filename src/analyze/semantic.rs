//! Semantic issue detection.
//!
//! One traversal finds three independent issue classes: unused
//! bindings, mutable default arguments, and statically unreachable
//! branches. Unused-binding detection is per-name: a name read anywhere
//! in the tree is never flagged, regardless of which assignment site
//! the read follows.

use std::collections::HashSet;

use crate::analyze::types::{Finding, Severity};
use crate::ast::{Node, Value};

/// Detect semantic issues in a parsed tree.
pub fn analyze(tree: &Node) -> Vec<Finding> {
    let mut collector = Collector::default();
    collector.visit(tree);

    let mut findings = collector.findings;
    for name in &collector.assigned_order {
        if !collector.reads.contains(name) {
            findings.push(
                Finding::new(
                    None,
                    Severity::Low,
                    "Unused Variable",
                    format!("Variable '{}' is assigned but never used.", name),
                )
                .with_suggestion("Remove the assignment or use the variable."),
            );
        }
    }
    findings
}

#[derive(Default)]
struct Collector {
    /// Bound names, in first-assignment order.
    assigned_order: Vec<String>,
    assigned: HashSet<String>,
    reads: HashSet<String>,
    findings: Vec<Finding>,
}

impl Collector {
    fn bind(&mut self, name: &str) {
        if self.assigned.insert(name.to_string()) {
            self.assigned_order.push(name.to_string());
        }
    }

    fn visit(&mut self, node: &Node) {
        match node {
            Node::Assign { targets, value, .. } => {
                for target in targets {
                    self.bind(target);
                }
                self.visit(value);
            }
            Node::Loop {
                targets,
                header,
                body,
                orelse,
                ..
            } => {
                for target in targets {
                    self.bind(target);
                }
                for child in header.iter().chain(body).chain(orelse) {
                    self.visit(child);
                }
            }
            Node::Name { id, .. } => {
                self.reads.insert(id.clone());
            }
            Node::Call {
                callee, operands, ..
            } => {
                if let Some(name) = callee {
                    self.reads.insert(name.clone());
                }
                for child in operands {
                    self.visit(child);
                }
            }
            Node::FunctionDef {
                name,
                line,
                params,
                body,
            } => {
                for param in params {
                    if let Some(default) = &param.default {
                        if let Node::Container { kind, .. } = default {
                            if kind.is_mutable() {
                                self.findings.push(
                                    Finding::new(
                                        Some(*line),
                                        Severity::Medium,
                                        "Mutable Default Argument",
                                        format!(
                                            "Function '{}' has a mutable default argument ({} literal); \
                                             it is shared across calls.",
                                            name,
                                            kind.as_str()
                                        ),
                                    )
                                    .with_suggestion(
                                        "Default to None and create the value inside the function.",
                                    ),
                                );
                            }
                        }
                        self.visit(default);
                    }
                }
                for child in body {
                    self.visit(child);
                }
            }
            Node::Conditional {
                line,
                test,
                then_body,
                else_body,
            } => {
                if let Node::Constant {
                    value: Value::Bool(literal),
                    ..
                } = test.as_ref()
                {
                    self.findings.push(
                        Finding::new(
                            Some(*line),
                            Severity::Medium,
                            "Unreachable Code",
                            format!(
                                "Condition is literally {}; one branch can never execute.",
                                if *literal { "True" } else { "False" }
                            ),
                        )
                        .with_suggestion("Remove the dead branch or use a real condition."),
                    );
                }
                self.visit(test);
                for child in then_body.iter().chain(else_body) {
                    self.visit(child);
                }
            }
            _ => {
                for child in node.children() {
                    self.visit(child);
                }
            }
        }
    }
}
