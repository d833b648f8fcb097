//! Built-in security pattern scanner.
//!
//! Line-oriented regex rules for the classic Python footguns: dynamic
//! code evaluation, hardcoded credentials, shell execution, and unsafe
//! deserialization. The scanner is a collaborator like any other; its
//! raw output is normalized by [`normalize`] before aggregation.

use anyhow::Result;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::analyze::types::{Finding, Severity};
use crate::delegate::SecurityScanner;

struct Rule {
    pattern: &'static Lazy<Regex>,
    severity: Severity,
    category: &'static str,
    message: &'static str,
    suggestion: &'static str,
}

static EVAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"\beval\s*\(").unwrap());
static EXEC: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bexec\s*\(").unwrap());
static PASSWORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)\b(password|passwd|secret)\b\s*=\s*["']"#).unwrap());
static SHELL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bos\.system\s*\(|\bsubprocess\.Popen\b").unwrap());
static PICKLE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bpickle\.loads?\s*\(").unwrap());

static RULES: &[Rule] = &[
    Rule {
        pattern: &EVAL,
        severity: Severity::High,
        category: "Dangerous Function",
        message: "Use of eval() detected.",
        suggestion: "Avoid eval(); use ast.literal_eval() for literal parsing.",
    },
    Rule {
        pattern: &EXEC,
        severity: Severity::High,
        category: "Dangerous Function",
        message: "Use of exec() detected.",
        suggestion: "Avoid exec(); restructure the code to not execute strings.",
    },
    Rule {
        pattern: &PASSWORD,
        severity: Severity::Medium,
        category: "Hardcoded Credential",
        message: "Hardcoded password detected.",
        suggestion: "Load secrets from the environment or a secrets manager.",
    },
    Rule {
        pattern: &SHELL,
        severity: Severity::Medium,
        category: "Command Execution",
        message: "Potentially dangerous system call.",
        suggestion: "Prefer subprocess.run() with a list argument and shell=False.",
    },
    Rule {
        pattern: &PICKLE,
        severity: Severity::Medium,
        category: "Unsafe Deserialization",
        message: "Unpickling untrusted data can execute arbitrary code.",
        suggestion: "Use json or another safe format for untrusted input.",
    },
];

/// The built-in line-scanning security collaborator.
#[derive(Debug, Default)]
pub struct PatternScanner;

impl SecurityScanner for PatternScanner {
    fn scan(&self, source: &str) -> Result<Vec<Finding>> {
        let mut findings = Vec::new();
        for (idx, line) in source.lines().enumerate() {
            for rule in RULES {
                if rule.pattern.is_match(line) {
                    findings.push(
                        Finding::new(
                            Some(idx + 1),
                            rule.severity,
                            rule.category,
                            rule.message.to_string(),
                        )
                        .with_suggestion(rule.suggestion),
                    );
                }
            }
        }
        Ok(findings)
    }
}

/// Normalize raw scanner output: drop duplicates on (line, message),
/// then stable-sort by severity (High first). Ties keep first-seen
/// order.
pub fn normalize(findings: Vec<Finding>) -> Vec<Finding> {
    let mut seen = std::collections::HashSet::new();
    let mut unique: Vec<Finding> = findings
        .into_iter()
        .filter(|f| seen.insert((f.line, f.message.clone())))
        .collect();
    unique.sort_by_key(|f| f.severity.rank());
    unique
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(source: &str) -> Vec<Finding> {
        PatternScanner.scan(source).unwrap()
    }

    #[test]
    fn test_eval_detected() {
        let findings = scan("value = eval(user_input)\n");
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].line, Some(1));
        assert_eq!(findings[0].severity, Severity::High);
        assert!(findings[0].message.contains("eval"));
    }

    #[test]
    fn test_hardcoded_password_detected() {
        let findings = scan("password = \"hunter2\"\n");
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].category, "Hardcoded Credential");
    }

    #[test]
    fn test_password_variable_read_not_flagged() {
        let findings = scan("check(password)\n");
        assert!(findings.is_empty());
    }

    #[test]
    fn test_system_calls_detected() {
        let findings = scan("os.system(cmd)\nsubprocess.Popen(args)\n");
        assert_eq!(findings.len(), 2);
        assert_eq!(findings[0].line, Some(1));
        assert_eq!(findings[1].line, Some(2));
    }

    #[test]
    fn test_clean_code_produces_nothing() {
        let findings = scan("def add(a, b):\n    return a + b\n");
        assert!(findings.is_empty());
    }

    #[test]
    fn test_normalize_deduplicates_on_line_and_message() {
        let finding = |line, severity, message: &str| {
            Finding::new(line, severity, "Test", message.to_string())
        };
        let raw = vec![
            finding(Some(1), Severity::Low, "a"),
            finding(Some(1), Severity::Low, "a"),
            finding(Some(2), Severity::Low, "a"),
        ];
        let normalized = normalize(raw);
        assert_eq!(normalized.len(), 2);
    }

    #[test]
    fn test_normalize_sorts_by_severity_keeping_ties_stable() {
        let finding = |line, severity, message: &str| {
            Finding::new(line, severity, "Test", message.to_string())
        };
        let raw = vec![
            finding(Some(5), Severity::Low, "first low"),
            finding(Some(1), Severity::High, "high"),
            finding(Some(9), Severity::Low, "second low"),
            finding(Some(2), Severity::Medium, "medium"),
        ];
        let normalized = normalize(raw);
        let order: Vec<&str> = normalized.iter().map(|f| f.message.as_str()).collect();
        assert_eq!(order, vec!["high", "medium", "first low", "second low"]);
    }
}
