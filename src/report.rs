//! Report assembly and output formatting.
//!
//! The aggregator merges the analyzers' findings and the collaborators'
//! output into one [`AnalysisReport`]. Aggregation never fails: a fatal
//! parse is a reported state, and absent collaborator output degrades
//! to `null` fields. Output formats are pretty (colored terminal) and
//! JSON.

use colored::*;
use serde::Serialize;

use crate::analyze::complexity::{ComplexityEstimate, SpaceComplexity, TimeComplexity};
use crate::analyze::types::{Finding, Severity};
use crate::delegate::{ComplexityMetrics, FunctionMetric, StyleIssue};

/// Derived roll-up of one analysis run.
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    /// Number of functions the complexity collaborator reported on.
    pub functions: usize,
    /// Mean cyclomatic complexity across those functions, 0 if none.
    pub avg_complexity: f64,
    pub estimated_time: TimeComplexity,
    pub estimated_space: SpaceComplexity,
    /// High-severity syntax findings.
    pub high_severity_warnings: usize,
}

/// The aggregate result of one analysis run.
#[derive(Debug, Serialize)]
pub struct AnalysisReport {
    pub fatal: bool,
    pub syntax_findings: Vec<Finding>,
    pub complexity_estimate: ComplexityEstimate,
    pub semantic_findings: Vec<Finding>,
    pub smell_findings: Vec<Finding>,
    /// Delegated style findings; `null` when the linter was unavailable.
    pub style_findings: Option<Vec<StyleIssue>>,
    /// Delegated per-function metrics; `null` when unavailable.
    pub function_metrics: Option<Vec<FunctionMetric>>,
    pub maintainability_index: Option<f64>,
    /// Delegated security findings; `null` when unavailable.
    pub security_findings: Option<Vec<Finding>>,
    pub summary: Summary,
}

impl AnalysisReport {
    /// The short-circuit report for unparseable input.
    pub fn fatal(syntax_findings: Vec<Finding>) -> Self {
        let high = count_high(&syntax_findings);
        Self {
            fatal: true,
            syntax_findings,
            complexity_estimate: ComplexityEstimate::unknown(),
            semantic_findings: Vec::new(),
            smell_findings: Vec::new(),
            style_findings: None,
            function_metrics: None,
            maintainability_index: None,
            security_findings: None,
            summary: Summary {
                functions: 0,
                avg_complexity: 0.0,
                estimated_time: TimeComplexity::Unknown,
                estimated_space: SpaceComplexity::Unknown,
                high_severity_warnings: high,
            },
        }
    }

    /// True if any finding anywhere in the report is high severity.
    pub fn has_high_findings(&self) -> bool {
        self.all_findings().any(|f| f.severity == Severity::High)
    }

    fn all_findings(&self) -> impl Iterator<Item = &Finding> {
        self.syntax_findings
            .iter()
            .chain(self.semantic_findings.iter())
            .chain(self.smell_findings.iter())
            .chain(self.security_findings.iter().flatten())
    }
}

/// Merge analyzer and collaborator output into the final report.
#[allow(clippy::too_many_arguments)]
pub fn aggregate(
    syntax_findings: Vec<Finding>,
    complexity_estimate: ComplexityEstimate,
    semantic_findings: Vec<Finding>,
    smell_findings: Vec<Finding>,
    style_findings: Option<Vec<StyleIssue>>,
    metrics: Option<ComplexityMetrics>,
    security_findings: Option<Vec<Finding>>,
) -> AnalysisReport {
    let (function_metrics, maintainability_index) = match metrics {
        Some(m) => (Some(m.functions), m.maintainability_index),
        None => (None, None),
    };

    let functions = function_metrics.as_ref().map_or(0, |m| m.len());
    let avg_complexity = match &function_metrics {
        Some(m) if !m.is_empty() => {
            m.iter().map(|f| f.complexity as f64).sum::<f64>() / m.len() as f64
        }
        _ => 0.0,
    };

    let summary = Summary {
        functions,
        avg_complexity,
        estimated_time: complexity_estimate.time,
        estimated_space: complexity_estimate.space,
        high_severity_warnings: count_high(&syntax_findings),
    };

    AnalysisReport {
        fatal: false,
        syntax_findings,
        complexity_estimate,
        semantic_findings,
        smell_findings,
        style_findings,
        function_metrics,
        maintainability_index,
        security_findings,
        summary,
    }
}

fn count_high(findings: &[Finding]) -> usize {
    findings
        .iter()
        .filter(|f| f.severity == Severity::High)
        .count()
}

// =============================================================================
// JSON Format
// =============================================================================

/// Write the report as pretty-printed JSON.
pub fn write_json(report: &AnalysisReport) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    println!("{}", json);
    Ok(())
}

// =============================================================================
// Pretty Format
// =============================================================================

/// Write the report in human-readable form.
pub fn write_pretty(path: &str, report: &AnalysisReport) {
    println!();
    print!("  ");
    print!("{}", "pycritic".cyan().bold());
    println!(" v{}", env!("CARGO_PKG_VERSION"));
    println!();

    print!("  {}", "Analyzing: ".dimmed());
    println!("{}", path);
    println!();

    if report.fatal {
        println!("  {}", "✗ analysis could not complete".red().bold());
        println!();
        write_findings("Syntax", &report.syntax_findings);
        println!();
        return;
    }

    write_findings("Syntax", &report.syntax_findings);
    write_estimate(&report.complexity_estimate);
    write_findings("Semantic issues", &report.semantic_findings);
    write_findings("Code smells", &report.smell_findings);
    if let Some(style) = &report.style_findings {
        write_style(style);
    }
    if let Some(security) = &report.security_findings {
        write_findings("Security", security);
    }
    if let Some(metrics) = &report.function_metrics {
        write_metrics(metrics);
    }
    write_summary(&report.summary);
    println!();
}

fn write_findings(section: &str, findings: &[Finding]) {
    if findings.is_empty() {
        return;
    }
    println!("  {} ({}):", section.bold(), findings.len());
    println!();
    for finding in findings {
        write_severity_tag(&finding.severity);
        print!("   ");
        print!("{:<24}", finding.category.dimmed());
        match finding.line {
            Some(line) => println!("{}", format!("line {}", line).blue()),
            None => println!("{}", "line unknown".dimmed()),
        }
        println!("            {}", finding.message);
        if let Some(suggestion) = &finding.suggestion {
            println!("            {}", format!("hint: {}", suggestion).dimmed());
        }
        println!();
    }
}

fn write_severity_tag(severity: &Severity) {
    match severity {
        Severity::High => print!("    {} ", "HIGH ".red()),
        Severity::Medium => print!("    {} ", "MED  ".yellow()),
        Severity::Low => print!("    {} ", "LOW  ".blue()),
        Severity::Info => print!("    {} ", "INFO ".dimmed()),
    }
}

fn write_estimate(estimate: &ComplexityEstimate) {
    println!("  {}", "Complexity estimate:".bold());
    println!(
        "    time {}  space {}",
        estimate.time.to_string().yellow(),
        estimate.space.to_string().yellow()
    );
    for entry in &estimate.trace {
        println!("    {}", format!("- {}", entry).dimmed());
    }
    println!();
}

fn write_style(issues: &[StyleIssue]) {
    if issues.is_empty() {
        return;
    }
    println!("  {} ({}):", "Style".bold(), issues.len());
    for issue in issues {
        let line = issue
            .line
            .map(|l| l.to_string())
            .unwrap_or_else(|| "?".to_string());
        println!(
            "    {:<8}{} {}",
            issue.code.dimmed(),
            format!("line {}", line).blue(),
            issue.message
        );
    }
    println!();
}

fn write_metrics(metrics: &[FunctionMetric]) {
    if metrics.is_empty() {
        return;
    }
    println!("  {}", "Function complexity:".bold());
    for metric in metrics {
        println!(
            "    {:<24} {:>3} ({})",
            metric.name, metric.complexity, metric.rank
        );
    }
    println!();
}

fn write_summary(summary: &Summary) {
    println!("  {}", "Summary:".bold());
    println!("    functions: {}", summary.functions);
    println!("    avg complexity: {:.2}", summary.avg_complexity);
    println!(
        "    estimated: time {} space {}",
        summary.estimated_time, summary.estimated_space
    );
    println!(
        "    high severity warnings: {}",
        summary.high_severity_warnings
    );
}
