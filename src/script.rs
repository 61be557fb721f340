//! Parser-agnostic model of a declarative script's declaration block.
//!
//! A parser reduces the script to the one block the splicer edits (for a gemspec, the body of
//! `Gem::Specification.new do |spec| ... end`) and classifies each statement in it exactly
//! once. Every location is a byte offset into the original source buffer, never a character
//! count, so that splicing stays correct when the script contains multi-byte text.

use crate::error::Error;
use std::ops::Range;

#[derive(Clone, Debug, PartialEq, Eq)]
/// Decoded value of a literal node.
pub enum Literal {
    /// A string literal.
    Str(String),
    /// An array whose elements are all string literals.
    List(Vec<String>),
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Right-hand side of a field declaration.
pub enum NodeValue {
    /// A literal the splicer may safely overwrite.
    Literal(Literal),
    /// Computed value (interpolation, method call, constant); never overwritten.
    Dynamic,
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// A statement in the declaration block, classified by shape.
pub enum Statement {
    /// `receiver.field = value`.
    Field {
        /// Field name (the method part of the assignment target).
        field: String,
        /// Assigned value.
        value: NodeValue,
        /// Byte span of the whole assignment.
        span: Range<usize>,
    },
    /// A dependency declaration such as `receiver.add_dependency "name", "~> 1.0"`.
    Dependency {
        /// Declaring method.
        method: String,
        /// First argument, when it is a string literal.
        name: Option<String>,
        /// Byte span of the call.
        span: Range<usize>,
    },
    /// Anything else; never edited.
    Other {
        /// Byte span of the statement.
        span: Range<usize>,
    },
}

impl Statement {
    /// Byte span of the statement in the source buffer.
    #[must_use]
    pub fn span(&self) -> &Range<usize> {
        match self {
            Self::Field { span, .. } | Self::Dependency { span, .. } | Self::Other { span } => {
                span
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// The declaration block of a script and its classified statements.
pub struct ScriptBlock {
    /// Block parameter that receives field assignments (`spec` in `do |spec|`).
    pub receiver: String,
    /// Byte range of the body, between the block opening and its closing boundary.
    pub body: Range<usize>,
    /// Statements of the body in source order.
    pub statements: Vec<Statement>,
}

impl ScriptBlock {
    /// The body text as it appears in `source`, if the body range fits the source.
    #[must_use]
    pub fn body_text<'a>(&self, source: &'a str) -> Option<&'a str> {
        source.get(self.body.clone())
    }

    /// Convert an absolute source span into a body-relative one, if it lies inside the body.
    #[must_use]
    pub fn relative(&self, span: &Range<usize>) -> Option<Range<usize>> {
        let start = span.start.checked_sub(self.body.start)?;
        let end = span.end.checked_sub(self.body.start)?;
        (start <= end && end <= self.body.len()).then_some(start..end)
    }

    /// First field declaration for `field`, if any.
    #[must_use]
    pub fn find_field(&self, field: &str) -> Option<&Statement> {
        self.statements.iter().find(
            |statement| matches!(statement, Statement::Field { field: name, .. } if name == field),
        )
    }

    /// Put `new_body` back between the block boundaries, leaving the rest of `source` intact.
    ///
    /// Returns `None` if the body range does not fit `source`.
    #[must_use]
    pub fn reassemble(&self, source: &str, new_body: &str) -> Option<String> {
        let before = source.get(..self.body.start)?;
        let after = source.get(self.body.end..)?;
        let mut output = String::with_capacity(before.len() + new_body.len() + after.len());
        output.push_str(before);
        output.push_str(new_body);
        output.push_str(after);
        Some(output)
    }
}

/// Parses a script far enough to locate and classify its declaration block.
pub trait ScriptParser {
    /// Locate the declaration block in `source`.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be parsed or has no declaration block.
    fn parse_block(&self, source: &str) -> Result<ScriptBlock, Error>;
}

/// Render a literal as script source text.
#[must_use]
pub fn render_literal(value: &Literal) -> String {
    match value {
        Literal::Str(text) => quote(text),
        Literal::List(items) => {
            let items: Vec<String> = items.iter().map(|item| quote(item)).collect();
            format!("[{}]", items.join(", "))
        }
    }
}

fn quote(text: &str) -> String {
    let mut quoted = String::with_capacity(text.len() + 2);
    quoted.push('"');
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\t' => quoted.push_str("\\t"),
            '#' if chars.peek().is_some_and(|next| matches!(next, '{' | '@' | '$')) => {
                quoted.push_str("\\#");
            }
            _ => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}
