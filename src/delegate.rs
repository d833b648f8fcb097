//! Collaborator interfaces for delegated analyses.
//!
//! Style linting, per-function cyclomatic complexity, and security
//! scanning are external collaborators: the core consumes their output
//! as opaque data and tolerates absence or failure. Each trait has a
//! built-in in-process implementation so the CLI works without external
//! tools; callers may substitute their own (e.g. adapters around flake8
//! or radon output).

use anyhow::Result;
use serde::Serialize;

use crate::analyze::types::Finding;
use crate::ast::Node;
use crate::parser;

/// One style finding passed through from the linter.
#[derive(Debug, Clone, Serialize)]
pub struct StyleIssue {
    pub line: Option<usize>,
    pub code: String,
    pub message: String,
}

/// Per-function cyclomatic complexity with a radon-style letter rank.
#[derive(Debug, Clone, Serialize)]
pub struct FunctionMetric {
    pub name: String,
    pub complexity: u32,
    pub rank: char,
}

/// Output of the complexity/maintainability collaborator.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ComplexityMetrics {
    pub functions: Vec<FunctionMetric>,
    pub maintainability_index: Option<f64>,
}

/// Supplies style findings for a source unit.
pub trait StyleLinter: Send + Sync {
    fn lint(&self, source: &str) -> Result<Vec<StyleIssue>>;
}

/// Supplies per-function complexity scores for a source unit.
pub trait ComplexityOracle: Send + Sync {
    fn measure(&self, source: &str) -> Result<ComplexityMetrics>;
}

/// Supplies security findings for a source unit.
pub trait SecurityScanner: Send + Sync {
    fn scan(&self, source: &str) -> Result<Vec<Finding>>;
}

/// Built-in complexity oracle computing cyclomatic complexity from the
/// lowered syntax tree.
///
/// CC = 1 + decision points (conditionals and loops). Nested functions
/// are measured separately and do not contribute to their enclosing
/// function's score.
#[derive(Debug, Default)]
pub struct AstComplexityOracle;

impl ComplexityOracle for AstComplexityOracle {
    fn measure(&self, source: &str) -> Result<ComplexityMetrics> {
        let tree = parser::parse(source).map_err(anyhow::Error::new)?;
        let mut functions = Vec::new();
        collect_functions(&tree, &mut functions);
        Ok(ComplexityMetrics {
            functions,
            maintainability_index: None,
        })
    }
}

fn collect_functions(node: &Node, out: &mut Vec<FunctionMetric>) {
    if let Node::FunctionDef { name, body, .. } = node {
        let complexity = 1 + body.iter().map(decision_points).sum::<u32>();
        out.push(FunctionMetric {
            name: name.clone(),
            complexity,
            rank: rank(complexity),
        });
    }
    for child in node.children() {
        collect_functions(child, out);
    }
}

/// Decision points in a sub-tree, stopping at nested function bounds.
fn decision_points(node: &Node) -> u32 {
    match node {
        Node::FunctionDef { .. } => 0,
        Node::Conditional { .. } | Node::Loop { .. } => {
            1 + node.children().iter().map(|c| decision_points(c)).sum::<u32>()
        }
        _ => node.children().iter().map(|c| decision_points(c)).sum(),
    }
}

/// radon's rank scale.
fn rank(complexity: u32) -> char {
    match complexity {
        0..=5 => 'A',
        6..=10 => 'B',
        11..=20 => 'C',
        21..=30 => 'D',
        31..=40 => 'E',
        _ => 'F',
    }
}
