//! Ruby gemspec parsing via tree-sitter-ruby.
//!
//! Locates the first `Gem::Specification.new do |spec| ... end` call and classifies the
//! statements in its block. Byte offsets come straight from tree-sitter, which reports them
//! in the same UTF-8 encoding as the source buffer.

use crate::error::Error;
use crate::script::{Literal, NodeValue, ScriptBlock, ScriptParser, Statement};
use tree_sitter::{Node, Parser};

/// Methods whose calls declare a dependency.
pub const DEPENDENCY_METHODS: [&str; 3] = [
    "add_dependency",
    "add_runtime_dependency",
    "add_development_dependency",
];

/// Tree-sitter backed parser for gemspec-style Ruby scripts.
#[derive(Debug, Clone, Copy, Default)]
pub struct RubyParser;

impl ScriptParser for RubyParser {
    fn parse_block(&self, source: &str) -> Result<ScriptBlock, Error> {
        let language: tree_sitter::Language = tree_sitter_ruby::LANGUAGE.into();
        let mut parser = Parser::new();
        parser.set_language(&language)?;
        let tree = parser.parse(source, None).ok_or(Error::Unparseable)?;
        let root = tree.root_node();
        if root.has_error() {
            return Err(Error::Unparseable);
        }

        let call = find_spec_call(root, source).ok_or(Error::MissingBlock)?;
        let block = call.child_by_field_name("block").ok_or(Error::MissingBlock)?;

        let mut cursor = block.walk();
        let children: Vec<Node<'_>> = block.children(&mut cursor).collect();
        let params = children
            .iter()
            .find(|child| child.kind() == "block_parameters");
        let receiver = params
            .and_then(|params| {
                let mut cursor = params.walk();
                let first = params
                    .named_children(&mut cursor)
                    .find(|param| param.kind() == "identifier");
                first
            })
            .and_then(|ident| text(ident, source))
            .ok_or(Error::MissingBlock)?
            .to_string();

        let opening = params.or_else(|| children.first()).ok_or(Error::MissingBlock)?;
        let closing = children.last().ok_or(Error::MissingBlock)?;
        let body = opening.end_byte()..closing.start_byte();
        if body.start > body.end {
            return Err(Error::MissingBlock);
        }

        let statements = match children
            .iter()
            .find(|child| matches!(child.kind(), "body_statement" | "block_body"))
        {
            Some(container) => {
                let mut cursor = container.walk();
                let nodes: Vec<Node<'_>> = container.named_children(&mut cursor).collect();
                nodes
            }
            None => children
                .iter()
                .filter(|child| child.is_named() && child.kind() != "block_parameters")
                .copied()
                .collect(),
        }
        .into_iter()
        .filter(|node| node.kind() != "comment")
        .map(|node| classify(node, &receiver, source))
        .collect();

        Ok(ScriptBlock {
            receiver,
            body,
            statements,
        })
    }
}

fn text<'s>(node: Node<'_>, source: &'s str) -> Option<&'s str> {
    node.utf8_text(source.as_bytes()).ok()
}

fn find_spec_call<'t>(root: Node<'t>, source: &str) -> Option<Node<'t>> {
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if node.kind() == "call" && is_spec_constructor(node, source) {
            return Some(node);
        }
        let mut cursor = node.walk();
        let children: Vec<Node<'t>> = node.named_children(&mut cursor).collect();
        stack.extend(children.into_iter().rev());
    }
    None
}

fn is_spec_constructor(call: Node<'_>, source: &str) -> bool {
    let method = call
        .child_by_field_name("method")
        .and_then(|method| text(method, source));
    let receiver = call
        .child_by_field_name("receiver")
        .and_then(|receiver| text(receiver, source));
    method == Some("new")
        && receiver.is_some_and(|receiver| receiver.trim().ends_with("Specification"))
        && call.child_by_field_name("block").is_some()
}

/// Receiver and method names of a `receiver.method` call node.
fn call_parts<'s>(call: Node<'_>, source: &'s str) -> Option<(&'s str, &'s str)> {
    if call.kind() != "call" {
        return None;
    }
    let receiver = text(call.child_by_field_name("receiver")?, source)?;
    let method = text(call.child_by_field_name("method")?, source)?;
    Some((receiver, method))
}

fn classify(node: Node<'_>, receiver: &str, source: &str) -> Statement {
    let span = node.byte_range();
    match node.kind() {
        "assignment" => {
            let target = node
                .child_by_field_name("left")
                .and_then(|left| call_parts(left, source))
                .filter(|(owner, _)| *owner == receiver);
            if let Some((_, field)) = target {
                let value = node
                    .child_by_field_name("right")
                    .map_or(NodeValue::Dynamic, |right| literal_value(right, source));
                return Statement::Field {
                    field: field.to_string(),
                    value,
                    span,
                };
            }
        }
        "call" => {
            if let Some((owner, method)) = call_parts(node, source) {
                if owner == receiver && DEPENDENCY_METHODS.contains(&method) {
                    let name = node
                        .child_by_field_name("arguments")
                        .and_then(|args| {
                            let mut cursor = args.walk();
                            let first = args.named_children(&mut cursor).next();
                            first
                        })
                        .and_then(|arg| match literal_value(arg, source) {
                            NodeValue::Literal(Literal::Str(name)) => Some(name),
                            _ => None,
                        });
                    return Statement::Dependency {
                        method: method.to_string(),
                        name,
                        span,
                    };
                }
            }
        }
        _ => {}
    }
    Statement::Other { span }
}

fn literal_value(node: Node<'_>, source: &str) -> NodeValue {
    match node.kind() {
        "string" => string_literal(node, source).map_or(NodeValue::Dynamic, |value| {
            NodeValue::Literal(Literal::Str(value))
        }),
        "array" | "string_array" => {
            let mut cursor = node.walk();
            let items: Option<Vec<String>> = node
                .named_children(&mut cursor)
                .map(|item| match item.kind() {
                    "string" | "bare_string" => string_literal(item, source),
                    _ => None,
                })
                .collect();
            items.map_or(NodeValue::Dynamic, |items| {
                NodeValue::Literal(Literal::List(items))
            })
        }
        _ => NodeValue::Dynamic,
    }
}

/// Decoded contents of a string node, or `None` if it interpolates.
fn string_literal(node: Node<'_>, source: &str) -> Option<String> {
    let mut value = String::new();
    let mut cursor = node.walk();
    for part in node.named_children(&mut cursor) {
        match part.kind() {
            "string_content" => value.push_str(text(part, source)?),
            "escape_sequence" => value.push_str(&unescape(text(part, source)?)),
            _ => return None,
        }
    }
    Some(value)
}

fn unescape(sequence: &str) -> String {
    let mut chars = sequence.chars();
    match (chars.next(), chars.next()) {
        (Some('\\'), Some('n')) => "\n".to_string(),
        (Some('\\'), Some('t')) => "\t".to_string(),
        (Some('\\'), Some('s')) => " ".to_string(),
        (Some('\\'), Some(c)) if chars.as_str().is_empty() => c.to_string(),
        _ => sequence.to_string(),
    }
}

#[cfg(test)]
#[path = "tests/ruby.rs"]
mod tests;
