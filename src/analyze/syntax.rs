//! Syntax and indentation checking.
//!
//! This is the only analyzer that can halt the pipeline: a parse
//! failure produces exactly one high-severity finding and marks the
//! check fatal, which suppresses every downstream analyzer. When the
//! parse succeeds, raw lines are scanned for mixed indentation
//! independently of the tree.

use crate::analyze::types::{Finding, Severity};
use crate::ast::Node;
use crate::parser::{self, ParseError};

/// Outcome of the syntax check.
#[derive(Debug)]
pub struct SyntaxCheck {
    /// True when the source could not be parsed at all.
    pub fatal: bool,
    pub findings: Vec<Finding>,
    /// The lowered tree, present only when the parse succeeded.
    pub tree: Option<Node>,
}

/// Parse the source and collect syntax-level findings.
pub fn check(source: &str) -> SyntaxCheck {
    match parser::parse(source) {
        Ok(tree) => SyntaxCheck {
            fatal: false,
            findings: check_indentation(source),
            tree: Some(tree),
        },
        Err(err) => SyntaxCheck {
            fatal: true,
            findings: vec![parse_failure_finding(&err)],
            tree: None,
        },
    }
}

fn parse_failure_finding(err: &ParseError) -> Finding {
    Finding::new(err.line, Severity::High, "Syntax Error", err.to_string())
        .with_suggestion("Fix the syntax error before further analysis can run.")
}

/// Flag lines that begin with spaces but also contain a tab.
fn check_indentation(source: &str) -> Vec<Finding> {
    source
        .lines()
        .enumerate()
        .filter(|(_, line)| line.starts_with(' ') && line.contains('\t'))
        .map(|(idx, _)| {
            Finding::new(
                Some(idx + 1),
                Severity::Medium,
                "Mixed Indentation",
                "Line mixes spaces and tabs.".to_string(),
            )
            .with_suggestion("Indent with spaces only (PEP 8).")
        })
        .collect()
}
