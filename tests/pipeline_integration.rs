//! Integration tests for the full analysis pipeline.
//!
//! These exercise the public `Runner` surface end to end: parsing,
//! the three tree analyzers, the built-in collaborators, and the
//! aggregated report shape.

use pycritic::analyze::complexity::{SpaceComplexity, TimeComplexity};
use pycritic::{AstComplexityOracle, PatternScanner, Runner, Severity};

fn full_runner<'a>(
    oracle: &'a AstComplexityOracle,
    scanner: &'a PatternScanner,
) -> Runner<'a> {
    Runner::new()
        .with_complexity_oracle(oracle)
        .with_security_scanner(scanner)
}

#[test]
fn test_nested_loop_function_end_to_end() {
    let source = "def f(x):\n    for i in range(x):\n        for j in range(x):\n            print(i,j)\n";
    let oracle = AstComplexityOracle;
    let scanner = PatternScanner;
    let report = full_runner(&oracle, &scanner).run(source);

    assert!(!report.fatal);
    assert_eq!(report.complexity_estimate.time, TimeComplexity::Quadratic);
    assert_eq!(report.complexity_estimate.space, SpaceComplexity::Linear);
    assert!(report.semantic_findings.is_empty());
    assert!(report.smell_findings.is_empty());
    assert_eq!(report.summary.functions, 1);
    // 1 + two loops
    assert!((report.summary.avg_complexity - 3.0).abs() < f64::EPSILON);
}

#[test]
fn test_trivial_source_is_constant_time_and_space() {
    let report = Runner::new().run("def f(x):\n    return x + 1\n");
    assert_eq!(report.complexity_estimate.time, TimeComplexity::Constant);
    assert_eq!(report.complexity_estimate.space, SpaceComplexity::Constant);
}

#[test]
fn test_recursive_function_end_to_end() {
    let source = "def fact(n):\n    if n <= 1:\n        return 1\n    return n * fact(n - 1)\n";
    let report = Runner::new().run(source);
    assert_eq!(report.complexity_estimate.time, TimeComplexity::Recursive);
    assert_eq!(
        report.complexity_estimate.space,
        SpaceComplexity::RecursionDepth
    );
}

#[test]
fn test_fatal_input_produces_degenerate_report() {
    let oracle = AstComplexityOracle;
    let scanner = PatternScanner;
    let report = full_runner(&oracle, &scanner).run("def broken(:\n    pass\n");

    assert!(report.fatal);
    assert_eq!(report.syntax_findings.len(), 1);
    assert_eq!(report.syntax_findings[0].severity, Severity::High);
    assert_eq!(report.syntax_findings[0].category, "Syntax Error");
    assert!(report.semantic_findings.is_empty());
    assert!(report.smell_findings.is_empty());
    assert_eq!(report.complexity_estimate.time, TimeComplexity::Unknown);
    assert!(report.complexity_estimate.trace.is_empty());
    assert!(report.function_metrics.is_none());
    assert!(report.security_findings.is_none());
    assert_eq!(report.summary.functions, 0);
    assert_eq!(report.summary.avg_complexity, 0.0);
    assert_eq!(report.summary.high_severity_warnings, 1);
}

#[test]
fn test_pipeline_is_idempotent() {
    let source = "\
import os

def risky(cmd, acc=[]):
    x = eval(cmd)
    unused = 42
    for i in range(10):
        acc.append(i)
    if True:
        os.system(cmd)
    return acc
";
    let oracle = AstComplexityOracle;
    let scanner = PatternScanner;
    let runner = full_runner(&oracle, &scanner);

    let first = serde_json::to_string(&runner.run(source)).unwrap();
    let second = serde_json::to_string(&runner.run(source)).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_combined_findings_across_analyzers() {
    let source = "\
def setup(config={}):
    timeout = 99999
    if False:
        print(\"never\")
    secret = eval(config)
    return secret
";
    let oracle = AstComplexityOracle;
    let scanner = PatternScanner;
    let report = full_runner(&oracle, &scanner).run(source);

    let categories: Vec<&str> = report
        .semantic_findings
        .iter()
        .map(|f| f.category.as_str())
        .collect();
    assert!(categories.contains(&"Mutable Default Argument"));
    assert!(categories.contains(&"Unreachable Code"));
    assert!(categories.contains(&"Unused Variable"));
    // 'secret' is returned, 'timeout' is not
    assert!(report
        .semantic_findings
        .iter()
        .any(|f| f.message.contains("'timeout'")));

    assert!(report
        .smell_findings
        .iter()
        .any(|f| f.category == "Magic Number" && f.message.contains("99999")));

    let security = report.security_findings.unwrap();
    assert!(security.iter().any(|f| f.message.contains("eval")));
}

#[test]
fn test_security_findings_sorted_high_first() {
    let source = "os.system(cmd)\nresult = eval(expr)\n";
    let oracle = AstComplexityOracle;
    let scanner = PatternScanner;
    let report = full_runner(&oracle, &scanner).run(source);

    let security = report.security_findings.unwrap();
    assert!(security.len() >= 2);
    assert_eq!(security[0].severity, Severity::High);
    for pair in security.windows(2) {
        assert!(pair[0].severity.rank() <= pair[1].severity.rank());
    }
}

#[test]
fn test_mixed_indentation_is_not_fatal() {
    let source = "def f():\n    return [1,\t2]\n";
    let report = Runner::new().run(source);
    assert!(!report.fatal);
    assert_eq!(report.syntax_findings.len(), 1);
    assert_eq!(report.syntax_findings[0].category, "Mixed Indentation");
    assert_eq!(report.summary.high_severity_warnings, 0);
}

#[test]
fn test_unused_finding_serializes_unknown_line() {
    let report = Runner::new().run("x = 1\n");
    let json = serde_json::to_value(&report).unwrap();
    let semantic = json["semantic_findings"].as_array().unwrap();
    assert_eq!(semantic.len(), 1);
    assert_eq!(semantic[0]["line"], "unknown");
    assert_eq!(semantic[0]["severity"], "low");
}

#[test]
fn test_report_json_shape() {
    let oracle = AstComplexityOracle;
    let scanner = PatternScanner;
    let report = full_runner(&oracle, &scanner).run("def f():\n    return 1\n");
    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["fatal"], false);
    assert!(json["syntax_findings"].is_array());
    assert_eq!(json["complexity_estimate"]["time"], "O(1)");
    assert_eq!(json["complexity_estimate"]["space"], "O(1)");
    assert!(json["complexity_estimate"]["trace"].is_array());
    assert!(json["semantic_findings"].is_array());
    assert!(json["smell_findings"].is_array());
    // no linter configured: unavailable, not empty
    assert!(json["style_findings"].is_null());
    assert!(json["function_metrics"].is_array());
    assert_eq!(json["summary"]["functions"], 1);
    assert_eq!(json["summary"]["high_severity_warnings"], 0);
}

#[test]
fn test_analysis_from_file_on_disk() {
    use std::io::Write;

    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        "def lookup(xs, key):\n    for x in xs:\n        if x == key:\n            return x\n    return None\n"
    )
    .unwrap();

    let source = std::fs::read_to_string(file.path()).unwrap();
    let report = Runner::new().run(&source);
    assert!(!report.fatal);
    assert_eq!(report.complexity_estimate.time, TimeComplexity::Linear);
}
