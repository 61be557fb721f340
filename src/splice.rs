//! Field-level splicing of a script's declaration block.
//!
//! Each requested field either rewrites exactly the byte span of its existing declaration,
//! or is inserted after an anchor declaration (or at the end of the block). Everything else
//! in the script, comments and dynamic logic included, is left byte-for-byte intact.

use crate::edit_plan::{Edit, EditPlan};
use crate::error::Error;
use crate::script::{render_literal, Literal, NodeValue, ScriptBlock, ScriptParser, Statement};
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
/// Which fields are freeform and where new fields go.
pub struct SplicePolicy {
    /// Fields whose template placeholders are never inserted (summary, description).
    pub freeform_fields: Vec<String>,
    /// Field after which new declarations are inserted, when present.
    pub anchor_field: Option<String>,
}

impl Default for SplicePolicy {
    fn default() -> Self {
        Self {
            freeform_fields: vec!["summary".to_string(), "description".to_string()],
            anchor_field: Some("version".to_string()),
        }
    }
}

impl SplicePolicy {
    fn is_freeform(&self, field: &str) -> bool {
        self.freeform_fields.iter().any(|name| name == field)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Desired value for one field.
pub struct FieldUpdate {
    /// Field name, without the receiver.
    pub field: String,
    /// Value to write.
    pub value: Literal,
}

impl FieldUpdate {
    /// Set `field` to a string value.
    #[must_use]
    pub fn text(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            value: Literal::Str(value.into()),
        }
    }

    /// Set `field` to a list of strings.
    #[must_use]
    pub fn list<I, S>(field: impl Into<String>, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            field: field.into(),
            value: Literal::List(items.into_iter().map(Into::into).collect()),
        }
    }

    /// Parse a `FIELD=VALUE` argument; with `list`, the value is split on commas.
    ///
    /// # Errors
    ///
    /// Returns an error if there is no `=` or the field name is empty.
    pub fn parse_arg(arg: &str, list: bool) -> Result<Self, Error> {
        let (field, value) = arg
            .split_once('=')
            .filter(|(field, _)| !field.trim().is_empty())
            .ok_or_else(|| Error::InvalidAssignment(arg.to_string()))?;
        let field = field.trim();
        if list {
            Ok(Self::list(
                field,
                value
                    .split(',')
                    .map(str::trim)
                    .filter(|item| !item.is_empty()),
            ))
        } else {
            Ok(Self::text(field, value))
        }
    }
}

/// Whether `value` is a template stand-in rather than real text.
///
/// A placeholder has no alphanumeric characters and is either empty or starts with a
/// non-ASCII symbol, such as a bare emoji.
#[must_use]
pub fn is_placeholder(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.chars().all(|c| !c.is_alphanumeric())
        && trimmed.chars().next().is_none_or(|c| !c.is_ascii())
}

fn is_placeholder_literal(value: &Literal) -> bool {
    match value {
        Literal::Str(text) => is_placeholder(text),
        Literal::List(items) => items.iter().all(|item| is_placeholder(item)),
    }
}

#[derive(Debug, Clone, Copy)]
/// Computes body-relative edit plans for a parsed declaration block.
pub struct FieldSplicer<'p> {
    policy: &'p SplicePolicy,
}

impl<'p> FieldSplicer<'p> {
    /// Splice under `policy`.
    #[must_use]
    pub fn new(policy: &'p SplicePolicy) -> Self {
        Self { policy }
    }

    /// Edits that bring each field in `updates` to its desired value.
    ///
    /// Returns `None` if a span reported by the parser does not fit the body.
    #[must_use]
    pub fn replace(
        &self,
        block: &ScriptBlock,
        source: &str,
        updates: &[FieldUpdate],
    ) -> Option<EditPlan> {
        let body = block.body_text(source)?;
        let indent = body_indent(block, body)?;
        let anchor = match self
            .policy
            .anchor_field
            .as_deref()
            .and_then(|field| block.find_field(field))
        {
            Some(statement) => Some(line_end(body, block.relative(statement.span())?.end)?),
            None => None,
        };

        let mut plan = EditPlan::default();
        for update in updates {
            let placeholder = is_placeholder_literal(&update.value);
            let assignment = format!(
                "{}.{} = {}",
                block.receiver,
                update.field,
                render_literal(&update.value)
            );

            match block.find_field(&update.field) {
                Some(Statement::Field { value, span, .. }) => {
                    let NodeValue::Literal(existing) = value else {
                        debug!(field = %update.field, "Leaving dynamic field value untouched");
                        continue;
                    };
                    if *existing == update.value {
                        continue;
                    }
                    if placeholder && !is_placeholder_literal(existing) {
                        debug!(field = %update.field, "Keeping existing value over placeholder");
                        continue;
                    }
                    let span = block.relative(span)?;
                    plan.push(Edit::replace(span.start, span.end, assignment));
                }
                _ => {
                    if placeholder && self.policy.is_freeform(&update.field) {
                        debug!(field = %update.field, "Not inserting placeholder field");
                        continue;
                    }
                    plan.push(match anchor {
                        Some(offset) => Edit::insert(offset, format!("\n{indent}{assignment}")),
                        None => match body.rfind('\n') {
                            Some(newline) => {
                                Edit::insert(newline + 1, format!("{indent}{assignment}\n"))
                            }
                            None => Edit::insert(body.len(), format!("\n{indent}{assignment}\n")),
                        },
                    });
                }
            }
        }
        Some(plan)
    }

    /// Edits removing every dependency declaration whose name is `target`, whole lines at a time.
    ///
    /// Returns `None` if a span reported by the parser does not fit the body.
    #[must_use]
    pub fn remove_matching(
        &self,
        block: &ScriptBlock,
        source: &str,
        target: &str,
    ) -> Option<EditPlan> {
        let body = block.body_text(source)?;
        let mut plan = EditPlan::default();
        for statement in &block.statements {
            let Statement::Dependency {
                name: Some(name),
                span,
                ..
            } = statement
            else {
                continue;
            };
            if name != target {
                continue;
            }
            let span = block.relative(span)?;
            let start = line_start(body, span.start)?;
            let end = (line_end(body, span.end)? + 1).min(body.len());
            plan.push(Edit::remove(start, end));
        }
        Some(plan)
    }
}

/// Offset just after the newline preceding `offset`, or zero.
fn line_start(body: &str, offset: usize) -> Option<usize> {
    Some(body.get(..offset)?.rfind('\n').map_or(0, |newline| newline + 1))
}

/// Offset of the newline ending the line containing `offset`, or the end of `body`.
fn line_end(body: &str, offset: usize) -> Option<usize> {
    Some(
        body.get(offset..)?
            .find('\n')
            .map_or(body.len(), |newline| offset + newline),
    )
}

/// Leading whitespace of the first declaration's line, or two spaces.
fn body_indent(block: &ScriptBlock, body: &str) -> Option<String> {
    let Some(first) = block.statements.first() else {
        return Some("  ".to_string());
    };
    let start = block.relative(first.span())?.start;
    let line = body.get(line_start(body, start)?..start)?;
    let indent: String = line.chars().take_while(|c| c.is_whitespace()).collect();
    Some(if indent.is_empty() {
        "  ".to_string()
    } else {
        indent
    })
}

/// Set fields and remove dependencies in one pass over `source`.
///
/// Any failure to locate the declaration block, or a block whose spans do not fit `source`,
/// returns `source` unchanged.
#[must_use]
pub fn splice_script<P: ScriptParser + ?Sized>(
    parser: &P,
    source: &str,
    policy: &SplicePolicy,
    updates: &[FieldUpdate],
    removals: &[String],
) -> String {
    let block = match parser.parse_block(source) {
        Ok(block) => block,
        Err(error) => {
            warn!(%error, "Leaving script unchanged");
            return source.to_string();
        }
    };

    match splice_block(&block, source, policy, updates, removals) {
        Some(spliced) => spliced,
        None => {
            warn!(
                body_start = block.body.start,
                body_end = block.body.end,
                source_len = source.len(),
                "Declaration block spans do not fit the script, leaving it unchanged"
            );
            source.to_string()
        }
    }
}

fn splice_block(
    block: &ScriptBlock,
    source: &str,
    policy: &SplicePolicy,
    updates: &[FieldUpdate],
    removals: &[String],
) -> Option<String> {
    let splicer = FieldSplicer::new(policy);
    let mut plan = splicer.replace(block, source, updates)?;
    for target in removals {
        plan.edits
            .extend(splicer.remove_matching(block, source, target)?.edits);
    }
    if plan.is_empty() {
        return Some(source.to_string());
    }

    let body = plan.apply(block.body_text(source)?);
    block.reassemble(source, &body)
}

/// Bring the fields in `updates` to their desired values.
#[must_use]
pub fn splice_fields<P: ScriptParser + ?Sized>(
    parser: &P,
    source: &str,
    policy: &SplicePolicy,
    updates: &[FieldUpdate],
) -> String {
    splice_script(parser, source, policy, updates, &[])
}

/// Remove every declaration of the dependency `name`.
#[must_use]
pub fn remove_dependency<P: ScriptParser + ?Sized>(
    parser: &P,
    source: &str,
    name: &str,
) -> String {
    splice_script(
        parser,
        source,
        &SplicePolicy::default(),
        &[],
        &[name.to_string()],
    )
}

#[cfg(test)]
#[path = "tests/splice.rs"]
mod tests;
