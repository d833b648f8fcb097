//! Python source parsing via tree-sitter.
//!
//! The entry point is [`parse`], which turns one source unit into the
//! crate's lowered [`Node`] tree or a [`ParseError`]. tree-sitter itself
//! is error-tolerant and always produces a tree; "parse failure" here
//! means the tree contains ERROR or MISSING nodes, in which case the
//! first such node in document order supplies the reported line and
//! description.

mod lower;

use thiserror::Error;

use crate::ast::Node;

/// A fatal parse failure.
///
/// `class` is a Python-style error-class prefix (e.g. `SyntaxError`),
/// `detail` a short description, and `line` the 1-based source line
/// where the parser gave up, when known.
#[derive(Debug, Clone, Error)]
#[error("{class}: {detail}")]
pub struct ParseError {
    pub class: &'static str,
    pub detail: String,
    pub line: Option<usize>,
}

/// Parse Python source text into the lowered syntax tree.
pub fn parse(source: &str) -> Result<Node, ParseError> {
    let mut parser = tree_sitter::Parser::new();
    parser
        .set_language(&tree_sitter_python::LANGUAGE.into())
        .map_err(|e| ParseError {
            class: "ParserError",
            detail: e.to_string(),
            line: None,
        })?;

    let tree = parser.parse(source, None).ok_or_else(|| ParseError {
        class: "ParserError",
        detail: "parser produced no tree".to_string(),
        line: None,
    })?;

    let root = tree.root_node();
    if root.has_error() {
        return Err(describe_error(root));
    }

    Ok(lower::lower_module(root, source))
}

/// Build a [`ParseError`] from the first ERROR/MISSING node in the tree.
fn describe_error(root: tree_sitter::Node) -> ParseError {
    match first_error(root) {
        Some(node) => {
            let detail = if node.is_missing() {
                format!("expected {}", node.kind())
            } else {
                "invalid syntax".to_string()
            };
            ParseError {
                class: "SyntaxError",
                detail,
                line: Some(node.start_position().row + 1),
            }
        }
        None => ParseError {
            class: "SyntaxError",
            detail: "invalid syntax".to_string(),
            line: None,
        },
    }
}

fn first_error<'a>(node: tree_sitter::Node<'a>) -> Option<tree_sitter::Node<'a>> {
    if node.is_missing() || node.is_error() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if let Some(found) = first_error(child) {
            return Some(found);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{CompKind, ContainerKind, LoopKind, Value};

    fn module_body(source: &str) -> Vec<Node> {
        match parse(source).expect("should parse") {
            Node::Module { body } => body,
            other => panic!("expected module, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_empty_source() {
        let body = module_body("");
        assert!(body.is_empty());
    }

    #[test]
    fn test_parse_reports_syntax_error_with_line() {
        let err = parse("def f(:\n    pass\n").unwrap_err();
        assert_eq!(err.class, "SyntaxError");
        assert_eq!(err.line, Some(1));
        assert!(err.to_string().starts_with("SyntaxError: "));
    }

    #[test]
    fn test_lower_function_with_default() {
        let body = module_body("def f(x, y=[]):\n    return x\n");
        match &body[0] {
            Node::FunctionDef {
                name, params, line, ..
            } => {
                assert_eq!(name, "f");
                assert_eq!(*line, 1);
                assert_eq!(params.len(), 2);
                assert_eq!(params[0].name, "x");
                assert!(params[0].default.is_none());
                match params[1].default.as_ref().unwrap() {
                    Node::Container { kind, .. } => assert_eq!(*kind, ContainerKind::List),
                    other => panic!("expected list default, got {:?}", other),
                }
            }
            other => panic!("expected function def, got {:?}", other),
        }
    }

    #[test]
    fn test_lower_for_loop_targets() {
        let body = module_body("for i, j in pairs:\n    print(i, j)\n");
        match &body[0] {
            Node::Loop {
                kind,
                targets,
                header,
                body,
                ..
            } => {
                assert_eq!(*kind, LoopKind::For);
                assert_eq!(targets, &["i".to_string(), "j".to_string()]);
                assert_eq!(header.len(), 1);
                assert_eq!(body.len(), 1);
            }
            other => panic!("expected loop, got {:?}", other),
        }
    }

    #[test]
    fn test_lower_call_targets() {
        let body = module_body("sorted(xs)\nxs.sort()\n");
        match &body[0] {
            Node::Call { callee, .. } => assert_eq!(callee.as_deref(), Some("sorted")),
            other => panic!("expected call, got {:?}", other),
        }
        match &body[1] {
            Node::Call {
                callee, operands, ..
            } => {
                assert_eq!(callee.as_deref(), Some("sort"));
                // receiver lowered as a read
                assert!(matches!(&operands[0], Node::Name { id, .. } if id == "xs"));
            }
            other => panic!("expected call, got {:?}", other),
        }
    }

    #[test]
    fn test_lower_elif_chain_as_nested_conditionals() {
        let source = "if a:\n    pass\nelif b:\n    pass\nelse:\n    pass\n";
        let body = module_body(source);
        match &body[0] {
            Node::Conditional { else_body, .. } => {
                assert_eq!(else_body.len(), 1);
                match &else_body[0] {
                    Node::Conditional { else_body, .. } => assert_eq!(else_body.len(), 1),
                    other => panic!("expected nested conditional, got {:?}", other),
                }
            }
            other => panic!("expected conditional, got {:?}", other),
        }
    }

    #[test]
    fn test_lower_literals() {
        let body = module_body("x = 5000\ny = True\nz = None\n");
        match &body[0] {
            Node::Assign { targets, value, .. } => {
                assert_eq!(targets, &["x".to_string()]);
                assert!(matches!(value.as_ref(), Node::Constant { value: Value::Num(n), .. } if *n == 5000.0));
            }
            other => panic!("expected assignment, got {:?}", other),
        }
        match &body[1] {
            Node::Assign { value, .. } => {
                assert!(matches!(
                    value.as_ref(),
                    Node::Constant {
                        value: Value::Bool(true),
                        ..
                    }
                ));
            }
            other => panic!("expected assignment, got {:?}", other),
        }
        match &body[2] {
            Node::Assign { value, .. } => {
                assert!(matches!(
                    value.as_ref(),
                    Node::Constant {
                        value: Value::NoneVal,
                        ..
                    }
                ));
            }
            other => panic!("expected assignment, got {:?}", other),
        }
    }

    #[test]
    fn test_lower_comprehensions() {
        let body = module_body("ys = [x * x for x in xs]\n");
        match &body[0] {
            Node::Assign { value, .. } => match value.as_ref() {
                Node::Comprehension { kind, .. } => assert_eq!(*kind, CompKind::List),
                other => panic!("expected comprehension, got {:?}", other),
            },
            other => panic!("expected assignment, got {:?}", other),
        }
    }

    #[test]
    fn test_augmented_assignment_is_not_a_binding() {
        let body = module_body("x += 1\n");
        assert!(!matches!(&body[0], Node::Assign { .. }));
    }
}
