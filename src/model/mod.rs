//! Compilation output model.

use crate::store::SchemaField;

use serde::Serialize;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SqlType {
    Varchar,
    Integer,
}

impl fmt::Display for SqlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SqlType::Varchar => "varchar",
            SqlType::Integer => "integer",
        })
    }
}

/// One column of the procedure's `RETURNS TABLE (...)` clause.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReturnColumn {
    pub alias: String,
    pub sql_type: SqlType,
}

impl ReturnColumn {
    pub fn new(alias: impl Into<String>, sql_type: SqlType) -> Self {
        Self {
            alias: alias.into(),
            sql_type,
        }
    }
}

impl fmt::Display for ReturnColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.alias, self.sql_type)
    }
}

/// Conditions the resolver recovers from. None of them stops compilation.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResolveIssue {
    #[error("saved event '{name}' not found, emitted as an opaque call")]
    UnresolvableReference { name: String },

    #[error("saved event '{name}' {detail}")]
    DegenerateSchema { name: String, detail: String },

    #[error("stored algebra of '{name}' {detail}")]
    MalformedStoredAlgebra { name: String, detail: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompiledExpression {
    pub name: String,
    /// The relational-algebra expression, also what gets stored on save.
    pub expression: String,
    pub signature: Vec<ReturnColumn>,
    /// User columns, as persisted in a saved event's `outputSchema`.
    pub output_schema: Vec<SchemaField>,
    /// Full stored-procedure text.
    pub procedure: String,
    /// Index operand 2 started at.
    pub op2_start: usize,
    /// Leaf slots used by both operands together.
    pub leaves: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<ResolveIssue>,
}

impl CompiledExpression {
    /// `alias type, ...` as it appears in `RETURNS TABLE`.
    pub fn signature_text(&self) -> String {
        render_signature(&self.signature)
    }
}

pub fn render_signature(columns: &[ReturnColumn]) -> String {
    columns
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_renders_alias_then_type() {
        let cols = vec![
            ReturnColumn::new("who", SqlType::Varchar),
            ReturnColumn::new("sf", SqlType::Integer),
        ];
        assert_eq!(render_signature(&cols), "who varchar, sf integer");
    }

    #[test]
    fn issues_display_the_event_name() {
        let issue = ResolveIssue::UnresolvableReference {
            name: "Ghost".into(),
        };
        assert_eq!(
            issue.to_string(),
            "saved event 'Ghost' not found, emitted as an opaque call"
        );
    }
}
