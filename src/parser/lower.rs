//! Lowering from the tree-sitter CST to the crate's [`Node`] enum.
//!
//! The lowering is total: any construct without a dedicated variant
//! becomes [`Node::Other`] with its named children lowered, so every
//! analyzer traversal sees the whole tree. Comments are dropped.

use crate::ast::{CompKind, ContainerKind, LoopKind, Node, Param, Value};

type TsNode<'a> = tree_sitter::Node<'a>;

pub(super) fn lower_module(root: TsNode, src: &str) -> Node {
    Node::Module {
        body: lower_children(root, src),
    }
}

fn line_of(node: TsNode) -> usize {
    node.start_position().row + 1
}

fn text<'a>(node: TsNode, src: &'a str) -> &'a str {
    node.utf8_text(src.as_bytes()).unwrap_or("")
}

/// Lower all named children of `node`, skipping comments.
fn lower_children(node: TsNode, src: &str) -> Vec<Node> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|n| n.kind() != "comment")
        .map(|n| lower(n, src))
        .collect()
}

/// Lower the block held by a field, or nothing if the field is absent.
fn lower_block(node: Option<TsNode>, src: &str) -> Vec<Node> {
    node.map(|n| lower_children(n, src)).unwrap_or_default()
}

fn lower(node: TsNode, src: &str) -> Node {
    let line = line_of(node);
    match node.kind() {
        "expression_statement" => {
            let mut children = lower_children(node, src);
            if children.len() == 1 {
                children.remove(0)
            } else {
                Node::Other { line, children }
            }
        }
        "decorated_definition" => {
            let mut cursor = node.walk();
            let inner = node.named_children(&mut cursor).find(|n| {
                matches!(n.kind(), "function_definition" | "class_definition")
            });
            match inner {
                Some(def) => lower(def, src),
                None => Node::Other {
                    line,
                    children: lower_children(node, src),
                },
            }
        }
        "function_definition" => lower_function(node, src),
        "class_definition" => {
            let name = node
                .child_by_field_name("name")
                .map(|n| text(n, src).to_string())
                .unwrap_or_default();
            Node::ClassDef {
                name,
                line,
                body: lower_block(node.child_by_field_name("body"), src),
            }
        }
        "for_statement" => {
            let mut targets = Vec::new();
            let mut header = Vec::new();
            if let Some(left) = node.child_by_field_name("left") {
                collect_bound_names(left, src, &mut targets);
                if targets.is_empty() {
                    // non-name target (attribute, subscript): its parts are reads
                    header.push(lower(left, src));
                }
            }
            if let Some(right) = node.child_by_field_name("right") {
                header.push(lower(right, src));
            }
            Node::Loop {
                kind: LoopKind::For,
                line,
                targets,
                header,
                body: lower_block(node.child_by_field_name("body"), src),
                orelse: lower_else_clauses(node, src),
            }
        }
        "while_statement" => Node::Loop {
            kind: LoopKind::While,
            line,
            targets: Vec::new(),
            header: node
                .child_by_field_name("condition")
                .map(|n| vec![lower(n, src)])
                .unwrap_or_default(),
            body: lower_block(node.child_by_field_name("body"), src),
            orelse: lower_else_clauses(node, src),
        },
        "if_statement" => lower_if(node, src),
        "call" => {
            let mut callee = None;
            let mut operands = Vec::new();
            if let Some(func) = node.child_by_field_name("function") {
                match func.kind() {
                    "identifier" => callee = Some(text(func, src).to_string()),
                    "attribute" => {
                        callee = func
                            .child_by_field_name("attribute")
                            .map(|n| text(n, src).to_string());
                        if let Some(object) = func.child_by_field_name("object") {
                            operands.push(lower(object, src));
                        }
                    }
                    _ => operands.push(lower(func, src)),
                }
            }
            if let Some(args) = node.child_by_field_name("arguments") {
                operands.extend(lower_children(args, src));
            }
            Node::Call {
                line,
                callee,
                operands,
            }
        }
        "assignment" => {
            let left = node.child_by_field_name("left");
            let right = node.child_by_field_name("right");
            match (left, right) {
                (Some(left), Some(right)) => {
                    let mut targets = Vec::new();
                    collect_bound_names(left, src, &mut targets);
                    if targets.is_empty() {
                        // attribute/subscript target: everything is a read
                        Node::Other {
                            line,
                            children: vec![lower(left, src), lower(right, src)],
                        }
                    } else {
                        Node::Assign {
                            line,
                            targets,
                            value: Box::new(lower(right, src)),
                        }
                    }
                }
                // bare annotation (`x: int`) binds nothing
                _ => Node::Other {
                    line,
                    children: lower_children(node, src),
                },
            }
        }
        "identifier" => Node::Name {
            line,
            id: text(node, src).to_string(),
        },
        "attribute" => Node::Other {
            line,
            // only the receiver is a name read; the attribute itself is not
            children: node
                .child_by_field_name("object")
                .map(|n| vec![lower(n, src)])
                .unwrap_or_default(),
        },
        "keyword_argument" => Node::Other {
            line,
            children: node
                .child_by_field_name("value")
                .map(|n| vec![lower(n, src)])
                .unwrap_or_default(),
        },
        "integer" | "float" => match parse_number(text(node, src)) {
            Some(value) => Node::Constant {
                line,
                value: Value::Num(value),
            },
            None => Node::Other {
                line,
                children: Vec::new(),
            },
        },
        "true" => Node::Constant {
            line,
            value: Value::Bool(true),
        },
        "false" => Node::Constant {
            line,
            value: Value::Bool(false),
        },
        "none" => Node::Constant {
            line,
            value: Value::NoneVal,
        },
        "string" | "concatenated_string" => Node::Constant {
            line,
            value: Value::Str,
        },
        "list" => lower_container(node, src, ContainerKind::List),
        "set" => lower_container(node, src, ContainerKind::Set),
        "dictionary" => lower_container(node, src, ContainerKind::Dict),
        "tuple" => lower_container(node, src, ContainerKind::Tuple),
        "list_comprehension" => lower_comprehension(node, src, CompKind::List),
        "set_comprehension" => lower_comprehension(node, src, CompKind::Set),
        "dictionary_comprehension" => lower_comprehension(node, src, CompKind::Dict),
        "generator_expression" => lower_comprehension(node, src, CompKind::Generator),
        _ => Node::Other {
            line,
            children: lower_children(node, src),
        },
    }
}

fn lower_container(node: TsNode, src: &str, kind: ContainerKind) -> Node {
    Node::Container {
        kind,
        line: line_of(node),
        items: lower_children(node, src),
    }
}

fn lower_comprehension(node: TsNode, src: &str, kind: CompKind) -> Node {
    Node::Comprehension {
        kind,
        line: line_of(node),
        parts: lower_children(node, src),
    }
}

fn lower_function(node: TsNode, src: &str) -> Node {
    let name = node
        .child_by_field_name("name")
        .map(|n| text(n, src).to_string())
        .unwrap_or_default();

    let mut params = Vec::new();
    if let Some(parameters) = node.child_by_field_name("parameters") {
        let mut cursor = parameters.walk();
        for child in parameters.named_children(&mut cursor) {
            match child.kind() {
                "identifier" => params.push(Param {
                    name: text(child, src).to_string(),
                    default: None,
                }),
                "typed_parameter" | "list_splat_pattern" | "dictionary_splat_pattern" => {
                    if let Some(name) = first_identifier(child, src) {
                        params.push(Param {
                            name,
                            default: None,
                        });
                    }
                }
                "default_parameter" | "typed_default_parameter" => {
                    let name = child
                        .child_by_field_name("name")
                        .map(|n| text(n, src).to_string())
                        .unwrap_or_default();
                    let default = child
                        .child_by_field_name("value")
                        .map(|n| lower(n, src));
                    params.push(Param { name, default });
                }
                _ => {}
            }
        }
    }

    Node::FunctionDef {
        name,
        line: line_of(node),
        params,
        body: lower_block(node.child_by_field_name("body"), src),
    }
}

fn lower_if(node: TsNode, src: &str) -> Node {
    let test = node
        .child_by_field_name("condition")
        .map(|n| lower(n, src))
        .unwrap_or(Node::Other {
            line: line_of(node),
            children: Vec::new(),
        });

    let mut cursor = node.walk();
    let alternatives: Vec<TsNode> = node
        .children_by_field_name("alternative", &mut cursor)
        .collect();

    Node::Conditional {
        line: line_of(node),
        test: Box::new(test),
        then_body: lower_block(node.child_by_field_name("consequence"), src),
        else_body: lower_alternatives(&alternatives, src),
    }
}

/// Lower an `elif`/`else` chain; each `elif` becomes a nested conditional.
fn lower_alternatives(alternatives: &[TsNode], src: &str) -> Vec<Node> {
    let (first, rest) = match alternatives.split_first() {
        Some(split) => split,
        None => return Vec::new(),
    };
    match first.kind() {
        "elif_clause" => {
            let test = first
                .child_by_field_name("condition")
                .map(|n| lower(n, src))
                .unwrap_or(Node::Other {
                    line: line_of(*first),
                    children: Vec::new(),
                });
            vec![Node::Conditional {
                line: line_of(*first),
                test: Box::new(test),
                then_body: lower_block(first.child_by_field_name("consequence"), src),
                else_body: lower_alternatives(rest, src),
            }]
        }
        "else_clause" => lower_block(first.child_by_field_name("body"), src),
        _ => lower_alternatives(rest, src),
    }
}

fn lower_else_clauses(node: TsNode, src: &str) -> Vec<Node> {
    let mut cursor = node.walk();
    let clauses: Vec<TsNode> = node
        .children_by_field_name("alternative", &mut cursor)
        .collect();
    clauses
        .iter()
        .filter(|n| n.kind() == "else_clause")
        .flat_map(|n| lower_block(n.child_by_field_name("body"), src))
        .collect()
}

/// Collect plain names bound by an assignment or loop target.
///
/// Attribute and subscript targets bind nothing; their reads are lowered
/// by the caller instead.
fn collect_bound_names(node: TsNode, src: &str, out: &mut Vec<String>) {
    match node.kind() {
        "identifier" => out.push(text(node, src).to_string()),
        "pattern_list" | "tuple_pattern" | "list_pattern" | "parenthesized_expression"
        | "list_splat_pattern" => {
            let mut cursor = node.walk();
            for child in node.named_children(&mut cursor) {
                collect_bound_names(child, src, out);
            }
        }
        _ => {}
    }
}

fn first_identifier(node: TsNode, src: &str) -> Option<String> {
    if node.kind() == "identifier" {
        return Some(text(node, src).to_string());
    }
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        if let Some(found) = first_identifier(child, src) {
            return Some(found);
        }
    }
    None
}

/// Parse a Python numeric literal. Returns `None` for complex literals.
fn parse_number(raw: &str) -> Option<f64> {
    let cleaned = raw.replace('_', "").to_ascii_lowercase();
    if cleaned.ends_with('j') {
        return None;
    }
    if let Some(hex) = cleaned.strip_prefix("0x") {
        return i128::from_str_radix(hex, 16).ok().map(|v| v as f64);
    }
    if let Some(oct) = cleaned.strip_prefix("0o") {
        return i128::from_str_radix(oct, 8).ok().map(|v| v as f64);
    }
    if let Some(bin) = cleaned.strip_prefix("0b") {
        return i128::from_str_radix(bin, 2).ok().map(|v| v as f64);
    }
    cleaned.parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::parse_number;

    #[test]
    fn test_parse_number_forms() {
        assert_eq!(parse_number("42"), Some(42.0));
        assert_eq!(parse_number("1_000_000"), Some(1_000_000.0));
        assert_eq!(parse_number("0xFF"), Some(255.0));
        assert_eq!(parse_number("0o17"), Some(15.0));
        assert_eq!(parse_number("0b101"), Some(5.0));
        assert_eq!(parse_number("2.5"), Some(2.5));
        assert_eq!(parse_number("3j"), None);
    }
}
