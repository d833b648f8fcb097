//! The syntax tree consumed by the analyzers.
//!
//! Python source is lowered from the tree-sitter CST into this closed
//! enum so every analyzer can match exhaustively over node kinds. Node
//! kinds the analyzers have no interest in are preserved as [`Node::Other`]
//! with their children intact, which keeps traversals total without
//! giving up the closed-set guarantee.
//!
//! The tree is plain owned data: it is `Send + Sync` and can be shared
//! by reference across the analyzer tasks.

/// Kind of loop statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopKind {
    For,
    While,
}

impl LoopKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoopKind::For => "for loop",
            LoopKind::While => "while loop",
        }
    }
}

/// Kind of comprehension expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompKind {
    List,
    Set,
    Dict,
    /// Generator expressions are lowered for traversal but are not
    /// counted as comprehensions by the complexity estimator.
    Generator,
}

impl CompKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompKind::List => "list comprehension",
            CompKind::Set => "set comprehension",
            CompKind::Dict => "dict comprehension",
            CompKind::Generator => "generator expression",
        }
    }
}

/// Kind of container literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind {
    List,
    Set,
    Dict,
    Tuple,
}

impl ContainerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContainerKind::List => "list",
            ContainerKind::Set => "set",
            ContainerKind::Dict => "dict",
            ContainerKind::Tuple => "tuple",
        }
    }

    /// Mutable containers are hazardous as default argument values.
    pub fn is_mutable(&self) -> bool {
        matches!(
            self,
            ContainerKind::List | ContainerKind::Set | ContainerKind::Dict
        )
    }
}

/// A constant value carried by a [`Node::Constant`].
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Num(f64),
    Str,
    Bool(bool),
    NoneVal,
}

/// A function parameter with its optional default expression.
#[derive(Debug, Clone)]
pub struct Param {
    pub name: String,
    pub default: Option<Node>,
}

/// One node of the lowered syntax tree.
///
/// Every variant carries the 1-based source line of the construct.
#[derive(Debug, Clone)]
pub enum Node {
    Module {
        body: Vec<Node>,
    },
    FunctionDef {
        name: String,
        line: usize,
        params: Vec<Param>,
        body: Vec<Node>,
    },
    ClassDef {
        name: String,
        line: usize,
        body: Vec<Node>,
    },
    Loop {
        kind: LoopKind,
        line: usize,
        /// Names bound by a `for` target (empty for `while`).
        targets: Vec<String>,
        /// Iterable / condition expressions.
        header: Vec<Node>,
        body: Vec<Node>,
        orelse: Vec<Node>,
    },
    Comprehension {
        kind: CompKind,
        line: usize,
        parts: Vec<Node>,
    },
    Conditional {
        line: usize,
        test: Box<Node>,
        then_body: Vec<Node>,
        else_body: Vec<Node>,
    },
    Call {
        line: usize,
        /// Simple call-target name: the identifier for `f(...)`, the
        /// final attribute for `x.f(...)`. `None` for computed targets.
        callee: Option<String>,
        /// Receiver and argument expressions, in source order.
        operands: Vec<Node>,
    },
    Assign {
        line: usize,
        /// Plain names bound by this assignment.
        targets: Vec<String>,
        value: Box<Node>,
    },
    /// A name read.
    Name {
        line: usize,
        id: String,
    },
    Constant {
        line: usize,
        value: Value,
    },
    Container {
        kind: ContainerKind,
        line: usize,
        items: Vec<Node>,
    },
    /// Any other construct, kept only for its children.
    Other {
        line: usize,
        children: Vec<Node>,
    },
}

impl Node {
    /// Source line of this node (line 1 for the module itself).
    pub fn line(&self) -> usize {
        match self {
            Node::Module { .. } => 1,
            Node::FunctionDef { line, .. }
            | Node::ClassDef { line, .. }
            | Node::Loop { line, .. }
            | Node::Comprehension { line, .. }
            | Node::Conditional { line, .. }
            | Node::Call { line, .. }
            | Node::Assign { line, .. }
            | Node::Name { line, .. }
            | Node::Constant { line, .. }
            | Node::Container { line, .. }
            | Node::Other { line, .. } => *line,
        }
    }

    /// All direct children, in source order.
    ///
    /// Convenience for sub-tree scans that do not care about node kind
    /// (e.g. counting conditionals under a function). Analyzers that do
    /// care match on the enum directly.
    pub fn children(&self) -> Vec<&Node> {
        match self {
            Node::Module { body } => body.iter().collect(),
            Node::FunctionDef { params, body, .. } => params
                .iter()
                .filter_map(|p| p.default.as_ref())
                .chain(body.iter())
                .collect(),
            Node::ClassDef { body, .. } => body.iter().collect(),
            Node::Loop {
                header,
                body,
                orelse,
                ..
            } => header.iter().chain(body.iter()).chain(orelse.iter()).collect(),
            Node::Comprehension { parts, .. } => parts.iter().collect(),
            Node::Conditional {
                test,
                then_body,
                else_body,
                ..
            } => std::iter::once(test.as_ref())
                .chain(then_body.iter())
                .chain(else_body.iter())
                .collect(),
            Node::Call { operands, .. } => operands.iter().collect(),
            Node::Assign { value, .. } => vec![value.as_ref()],
            Node::Name { .. } | Node::Constant { .. } => Vec::new(),
            Node::Container { items, .. } => items.iter().collect(),
            Node::Other { children, .. } => children.iter().collect(),
        }
    }
}
