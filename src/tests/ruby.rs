use super::RubyParser;
use crate::error::Error;
use crate::script::{Literal, NodeValue, ScriptParser, Statement};
use pretty_assertions::assert_eq;

const GEMSPEC: &str = "\
# frozen_string_literal: true

require_relative \"lib/kettle/version\"

Gem::Specification.new do |spec|
  spec.name = \"kettle-soup\"
  spec.version = Kettle::VERSION
  spec.authors = [\"Ada\", \"Grace\"]
  spec.summary = \"🍲 \"
  spec.files = Dir[\"lib/**/*.rb\"]
  # Runtime deps
  spec.add_dependency \"version_gem\", \"~> 1.1\"
  spec.add_development_dependency(\"rake\", \"~> 13.0\")
  spec.metadata[\"homepage_uri\"] = spec.homepage
end
";

fn field(name: &str, value: NodeValue) -> (String, NodeValue) {
    (name.to_string(), value)
}

#[test]
fn test_locates_receiver_and_body() {
    let block = RubyParser.parse_block(GEMSPEC).unwrap();

    assert_eq!(block.receiver, "spec");
    let body = block.body_text(GEMSPEC).unwrap();
    assert!(body.starts_with("\n  spec.name"), "{body:?}");
    assert!(body.ends_with("spec.homepage\n"), "{body:?}");
    assert!(GEMSPEC[block.body.end..].starts_with("end"));
}

#[test]
fn test_classifies_fields() {
    let block = RubyParser.parse_block(GEMSPEC).unwrap();

    let fields: Vec<(String, NodeValue)> = block
        .statements
        .iter()
        .filter_map(|statement| match statement {
            Statement::Field { field, value, .. } => Some((field.clone(), value.clone())),
            _ => None,
        })
        .collect();
    assert_eq!(
        fields,
        vec![
            field("name", NodeValue::Literal(Literal::Str("kettle-soup".into()))),
            field("version", NodeValue::Dynamic),
            field(
                "authors",
                NodeValue::Literal(Literal::List(vec!["Ada".into(), "Grace".into()]))
            ),
            field("summary", NodeValue::Literal(Literal::Str("🍲 ".into()))),
            field("files", NodeValue::Dynamic),
        ]
    );
}

#[test]
fn test_classifies_dependencies_and_skips_comments() {
    let block = RubyParser.parse_block(GEMSPEC).unwrap();

    let dependencies: Vec<(&str, Option<&str>)> = block
        .statements
        .iter()
        .filter_map(|statement| match statement {
            Statement::Dependency { method, name, .. } => {
                Some((method.as_str(), name.as_deref()))
            }
            _ => None,
        })
        .collect();
    assert_eq!(
        dependencies,
        vec![
            ("add_dependency", Some("version_gem")),
            ("add_development_dependency", Some("rake")),
        ]
    );
    assert_eq!(block.statements.len(), 8);
    assert!(matches!(block.statements[7], Statement::Other { .. }));
}

#[test]
fn test_spans_are_byte_offsets() {
    let block = RubyParser.parse_block(GEMSPEC).unwrap();

    let summary = block.find_field("summary").unwrap();
    assert_eq!(&GEMSPEC[summary.span().clone()], "spec.summary = \"🍲 \"");
    let files = block.find_field("files").unwrap();
    assert_eq!(
        &GEMSPEC[files.span().clone()],
        "spec.files = Dir[\"lib/**/*.rb\"]"
    );
}

#[test]
fn test_interpolated_string_is_dynamic() {
    let source = "Gem::Specification.new do |s|\n  s.summary = \"v#{VERSION}\"\nend\n";
    let block = RubyParser.parse_block(source).unwrap();

    assert_eq!(block.receiver, "s");
    assert!(matches!(
        block.find_field("summary"),
        Some(Statement::Field {
            value: NodeValue::Dynamic,
            ..
        })
    ));
}

#[test]
fn test_word_array_is_a_list() {
    let source = "Gem::Specification.new do |spec|\n  spec.executables = %w[soup kettle]\nend\n";
    let block = RubyParser.parse_block(source).unwrap();

    assert!(matches!(
        block.find_field("executables"),
        Some(Statement::Field {
            value: NodeValue::Literal(Literal::List(items)),
            ..
        }) if items == &vec!["soup".to_string(), "kettle".to_string()]
    ));
}

#[test]
fn test_assignment_on_other_receiver_is_not_a_field() {
    let source = "Gem::Specification.new do |spec|\n  other.name = \"x\"\nend\n";
    let block = RubyParser.parse_block(source).unwrap();

    assert!(block.find_field("name").is_none());
    assert!(matches!(block.statements.as_slice(), [Statement::Other { .. }]));
}

#[test]
fn test_syntax_error_is_unparseable() {
    let result = RubyParser.parse_block("Gem::Specification.new do |spec|\n  spec.name = \"x\"\n");
    assert!(matches!(result, Err(Error::Unparseable)));
}

#[test]
fn test_script_without_declaration_block() {
    let result = RubyParser.parse_block("puts \"hello\"\n");
    assert!(matches!(result, Err(Error::MissingBlock)));
}
