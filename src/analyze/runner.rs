//! Pipeline orchestration.
//!
//! The [`Runner`] owns references to the configured collaborators and
//! drives one analysis: parse and syntax check, short-circuit on a
//! fatal parse, otherwise fan the three tree analyzers out in parallel
//! and join their results with the collaborator output at the
//! aggregator. A run is stateless: nothing is cached between calls and
//! identical input produces an identical report.

use crate::analyze::{complexity, semantic, smells, syntax};
use crate::delegate::{ComplexityOracle, SecurityScanner, StyleLinter};
use crate::report::{self, AnalysisReport};
use crate::security;

/// Executes the full analysis pipeline over one source unit.
#[derive(Default)]
pub struct Runner<'a> {
    linter: Option<&'a dyn StyleLinter>,
    oracle: Option<&'a dyn ComplexityOracle>,
    scanner: Option<&'a dyn SecurityScanner>,
}

impl<'a> Runner<'a> {
    /// Create a runner with no collaborators configured.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_linter(mut self, linter: &'a dyn StyleLinter) -> Self {
        self.linter = Some(linter);
        self
    }

    pub fn with_complexity_oracle(mut self, oracle: &'a dyn ComplexityOracle) -> Self {
        self.oracle = Some(oracle);
        self
    }

    pub fn with_security_scanner(mut self, scanner: &'a dyn SecurityScanner) -> Self {
        self.scanner = Some(scanner);
        self
    }

    /// Run the pipeline. Never fails: a fatal parse is a reported
    /// state and collaborator failures degrade to absent fields.
    pub fn run(&self, source: &str) -> AnalysisReport {
        let checked = syntax::check(source);
        let tree = match (checked.fatal, checked.tree) {
            (false, Some(tree)) => tree,
            _ => return AnalysisReport::fatal(checked.findings),
        };

        // independent analyzers over the same immutable tree; the join
        // is the aggregation barrier
        let (estimate, (semantic_findings, smell_findings)) = rayon::join(
            || complexity::estimate(&tree),
            || rayon::join(|| semantic::analyze(&tree), || smells::detect(&tree)),
        );

        let style_findings = self
            .linter
            .and_then(|l| degrade("style linter", l.lint(source)));
        let metrics = self
            .oracle
            .and_then(|o| degrade("complexity oracle", o.measure(source)));
        let security_findings = self
            .scanner
            .and_then(|s| degrade("security scanner", s.scan(source)))
            .map(security::normalize);

        report::aggregate(
            checked.findings,
            estimate,
            semantic_findings,
            smell_findings,
            style_findings,
            metrics,
            security_findings,
        )
    }
}

/// Collaborator failures degrade to an absent result.
fn degrade<T>(what: &str, result: anyhow::Result<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            eprintln!("Warning: {} unavailable: {}", what, e);
            None
        }
    }
}
