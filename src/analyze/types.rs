//! Core types for analysis findings.

use serde::{Serialize, Serializer};

/// Severity levels for findings, ordered High before Medium before Low
/// before Info when sorting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Low,
    Medium,
    High,
}

impl Severity {
    /// Sort rank: lower ranks sort first.
    pub fn rank(&self) -> u8 {
        match self {
            Severity::High => 0,
            Severity::Medium => 1,
            Severity::Low => 2,
            Severity::Info => 3,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Low => write!(f, "low"),
            Severity::Medium => write!(f, "medium"),
            Severity::High => write!(f, "high"),
        }
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "info" => Ok(Severity::Info),
            "low" => Ok(Severity::Low),
            "medium" => Ok(Severity::Medium),
            "high" => Ok(Severity::High),
            _ => Err(format!("unknown severity: {}", s)),
        }
    }
}

/// A single reported observation.
///
/// Findings are immutable once created; within equal severity their
/// order is the order they were encountered.
#[derive(Debug, Clone, Serialize)]
pub struct Finding {
    /// 1-based source line, serialized as the string `"unknown"` when
    /// the observation has no single line.
    #[serde(serialize_with = "serialize_line")]
    pub line: Option<usize>,
    pub severity: Severity,
    pub category: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl Finding {
    pub fn new(
        line: Option<usize>,
        severity: Severity,
        category: &str,
        message: String,
    ) -> Self {
        Self {
            line,
            severity,
            category: category.to_string(),
            message,
            suggestion: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: &str) -> Self {
        self.suggestion = Some(suggestion.to_string());
        self
    }
}

fn serialize_line<S: Serializer>(line: &Option<usize>, s: S) -> Result<S::Ok, S::Error> {
    match line {
        Some(n) => s.serialize_u64(*n as u64),
        None => s.serialize_str("unknown"),
    }
}
