//! Pycritic - static analysis engine for Python code review.
//!
//! Pycritic consumes one Python source file and produces a structured
//! report combining syntax validity, heuristic time/space complexity
//! estimation, semantic-issue detection (unused bindings, mutable
//! default arguments, unreachable branches), and code-smell detection
//! (oversized functions and classes, excessive branching, magic
//! numbers). Each run is a pure function of the input text: no state
//! is kept between analyses.
//!
//! # Architecture
//!
//! The pipeline parses with tree-sitter and lowers into a closed AST:
//!
//! - `parser`: tree-sitter parsing and lowering into the `ast` types
//! - `ast`: the closed node enum the analyzers match over
//! - `analyze`: the four analyzers and the pipeline `Runner`
//! - `delegate`: collaborator traits (style linter, complexity oracle,
//!   security scanner) plus the built-in AST complexity oracle
//! - `security`: the built-in regex security scanner
//! - `report`: aggregation and output formatting (pretty, JSON)
//!
//! A parse failure is fatal and suppresses every other analyzer; any
//! collaborator failure degrades that report field to "unavailable".

pub mod analyze;
pub mod ast;
pub mod cli;
pub mod delegate;
pub mod parser;
pub mod report;
pub mod security;

pub use analyze::{Finding, Runner, Severity};
pub use delegate::{AstComplexityOracle, ComplexityOracle, SecurityScanner, StyleLinter};
pub use parser::ParseError;
pub use report::{AnalysisReport, Summary};
pub use security::PatternScanner;
