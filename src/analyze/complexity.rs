//! Heuristic complexity estimation.
//!
//! A single depth-first traversal tallies loops, loop nesting,
//! comprehensions, sort calls, and recursive calls, then maps the tally
//! onto closed time/space complexity labels. Depth is loop-nesting
//! depth: it increases only when entering a loop node and is inherited
//! by every descendant of that loop, conditionals included.
//!
//! This is a best-effort estimate from syntactic shape, not a sound
//! complexity analysis.

use serde::Serialize;

use crate::ast::{CompKind, Node};

/// Estimated time-complexity class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TimeComplexity {
    #[serde(rename = "O(1)")]
    Constant,
    #[serde(rename = "O(n)")]
    Linear,
    #[serde(rename = "O(n log n)")]
    Linearithmic,
    #[serde(rename = "O(n^2)")]
    Quadratic,
    #[serde(rename = "O(n^rec)")]
    Recursive,
    Unknown,
}

impl std::fmt::Display for TimeComplexity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimeComplexity::Constant => write!(f, "O(1)"),
            TimeComplexity::Linear => write!(f, "O(n)"),
            TimeComplexity::Linearithmic => write!(f, "O(n log n)"),
            TimeComplexity::Quadratic => write!(f, "O(n^2)"),
            TimeComplexity::Recursive => write!(f, "O(n^rec)"),
            TimeComplexity::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Estimated space-complexity class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SpaceComplexity {
    #[serde(rename = "O(1)")]
    Constant,
    #[serde(rename = "O(n)")]
    Linear,
    #[serde(rename = "O(recursion depth)")]
    RecursionDepth,
    Unknown,
}

impl std::fmt::Display for SpaceComplexity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SpaceComplexity::Constant => write!(f, "O(1)"),
            SpaceComplexity::Linear => write!(f, "O(n)"),
            SpaceComplexity::RecursionDepth => write!(f, "O(recursion depth)"),
            SpaceComplexity::Unknown => write!(f, "Unknown"),
        }
    }
}

/// The estimator's output: both labels plus the evidence trace, one
/// entry per counted construct in traversal order.
#[derive(Debug, Clone, Serialize)]
pub struct ComplexityEstimate {
    pub time: TimeComplexity,
    pub space: SpaceComplexity,
    pub trace: Vec<String>,
}

impl ComplexityEstimate {
    /// The degenerate estimate for input that could not be parsed.
    pub fn unknown() -> Self {
        Self {
            time: TimeComplexity::Unknown,
            space: SpaceComplexity::Unknown,
            trace: Vec::new(),
        }
    }
}

/// Evidence accumulator, threaded by value through the traversal.
#[derive(Debug, Default)]
struct Tally {
    loops: usize,
    /// Loops entered at ambient nesting depth >= 1.
    nested: usize,
    comps: usize,
    sorts: usize,
    recursions: usize,
    trace: Vec<String>,
}

/// Estimate time and space complexity for a parsed tree.
pub fn estimate(tree: &Node) -> ComplexityEstimate {
    let mut stack = Vec::new();
    let tally = walk(tree, 0, &mut stack, Tally::default());

    let time = if tally.recursions > 0 {
        TimeComplexity::Recursive
    } else if tally.nested > 0 {
        TimeComplexity::Quadratic
    } else if tally.loops > 0 && tally.sorts > 0 {
        TimeComplexity::Linearithmic
    } else if tally.loops == 1 {
        TimeComplexity::Linear
    } else if tally.comps > 0 && tally.loops == 0 {
        TimeComplexity::Linear
    } else {
        TimeComplexity::Constant
    };

    let space = if tally.comps > 0 || tally.loops > 0 {
        SpaceComplexity::Linear
    } else if tally.recursions > 0 {
        SpaceComplexity::RecursionDepth
    } else {
        SpaceComplexity::Constant
    };

    ComplexityEstimate {
        time,
        space,
        trace: tally.trace,
    }
}

fn is_sort_call(name: &str) -> bool {
    name == "sort" || name == "sorted"
}

fn walk(node: &Node, depth: usize, stack: &mut Vec<String>, mut acc: Tally) -> Tally {
    match node {
        Node::FunctionDef {
            name, params, body, ..
        } => {
            // defaults evaluate in the enclosing scope
            for param in params {
                if let Some(default) = &param.default {
                    acc = walk(default, depth, stack, acc);
                }
            }
            stack.push(name.clone());
            for child in body {
                acc = walk(child, depth, stack, acc);
            }
            stack.pop();
            acc
        }
        Node::Loop {
            kind,
            line,
            header,
            body,
            orelse,
            ..
        } => {
            if depth >= 1 {
                acc.nested += 1;
            }
            acc.loops += 1;
            acc.trace.push(format!("{} at line {}", kind.as_str(), line));
            for child in header.iter().chain(body).chain(orelse) {
                acc = walk(child, depth + 1, stack, acc);
            }
            acc
        }
        Node::Comprehension { kind, line, parts } => {
            if *kind != CompKind::Generator {
                acc.comps += 1;
                acc.trace.push(format!("{} at line {}", kind.as_str(), line));
            }
            for child in parts {
                acc = walk(child, depth, stack, acc);
            }
            acc
        }
        Node::Call {
            line,
            callee,
            operands,
        } => {
            if let Some(name) = callee {
                if is_sort_call(name) {
                    acc.sorts += 1;
                    acc.trace.push(format!("call to {}() at line {}", name, line));
                }
                if stack.iter().any(|frame| frame == name) {
                    acc.recursions += 1;
                    acc.trace
                        .push(format!("recursive call to '{}' at line {}", name, line));
                }
            }
            for child in operands {
                acc = walk(child, depth, stack, acc);
            }
            acc
        }
        _ => {
            for child in node.children() {
                acc = walk(child, depth, stack, acc);
            }
            acc
        }
    }
}
