//! Constraint and projection clauses.
//!
//! Variables in both are symbolic at this point (`M1.arg1`, `M2.sf`, ...)
//! and are remapped onto global leaf indices during compilation.

use crate::Result;
use crate::diagnostics;

use anyhow::bail;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default interval boundary sources.
pub const DEFAULT_START: &str = "M1.sf";
pub const DEFAULT_END: &str = "M2.ef";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOp {
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
}

impl ComparisonOp {
    pub fn parse(s: &str) -> Option<Self> {
        Some(match s.trim() {
            "=" => ComparisonOp::Eq,
            "!=" | "≠" => ComparisonOp::Ne,
            "<" => ComparisonOp::Lt,
            ">" => ComparisonOp::Gt,
            "<=" | "≤" => ComparisonOp::Le,
            ">=" | "≥" => ComparisonOp::Ge,
            _ => return None,
        })
    }
}

impl fmt::Display for ComparisonOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ComparisonOp::Eq => "=",
            ComparisonOp::Ne => "!=",
            ComparisonOp::Lt => "<",
            ComparisonOp::Gt => ">",
            ComparisonOp::Le => "<=",
            ComparisonOp::Ge => ">=",
        })
    }
}

/// `left op right [modifier]`, e.g. `M1.ef < M2.sf +5`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintSpec {
    pub left: String,
    pub op: ComparisonOp,
    pub right: String,
    pub modifier: Option<i64>,
}

impl ConstraintSpec {
    pub fn new(left: impl Into<String>, op: ComparisonOp, right: impl Into<String>) -> Self {
        Self {
            left: left.into(),
            op,
            right: right.into(),
            modifier: None,
        }
    }

    pub fn with_modifier(mut self, modifier: i64) -> Self {
        self.modifier = Some(modifier);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectionField {
    pub source: String,
    pub alias: Option<String>,
}

impl ProjectionField {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            alias: None,
        }
    }

    pub fn aliased(source: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            alias: Some(alias.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectionSpec {
    pub fields: Vec<ProjectionField>,
    pub start: String,
    pub end: String,
}

impl Default for ProjectionSpec {
    fn default() -> Self {
        Self {
            fields: Vec::new(),
            start: DEFAULT_START.to_string(),
            end: DEFAULT_END.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawConstraint {
    #[serde(default)]
    pub op1: String,

    #[serde(default)]
    pub operator: String,

    #[serde(default)]
    pub op2: String,

    #[serde(rename = "mod", default)]
    pub modifier: String,
}

impl RawConstraint {
    pub fn build(&self, position: usize) -> Result<ConstraintSpec> {
        let left = self.op1.trim();
        let right = self.op2.trim();
        if left.is_empty() || right.is_empty() {
            bail!(
                "{}",
                diagnostics::error_message(format!(
                    "constraint {} is missing a variable",
                    position
                ))
            );
        }
        let Some(op) = ComparisonOp::parse(&self.operator) else {
            bail!(
                "{}",
                diagnostics::error_message(format!(
                    "constraint {} has unknown operator {:?}",
                    position, self.operator
                ))
            );
        };
        Ok(ConstraintSpec {
            left: left.to_string(),
            op,
            right: right.to_string(),
            modifier: parse_modifier(&self.modifier, position)?,
        })
    }
}

/// "+3", "-1", "2" or blank.
fn parse_modifier(input: &str, position: usize) -> Result<Option<i64>> {
    let s = input.trim();
    if s.is_empty() {
        return Ok(None);
    }
    let digits = s.strip_prefix('+').unwrap_or(s).trim();
    match digits.parse::<i64>() {
        Ok(n) => Ok(Some(n)),
        Err(_) => bail!(
            "{}",
            diagnostics::error_message(format!(
                "constraint {} has non-numeric modifier {:?}",
                position, s
            ))
        ),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawProjectionField {
    #[serde(default)]
    pub source: String,

    #[serde(default)]
    pub alias: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawProjection {
    #[serde(default)]
    pub start: String,

    #[serde(default)]
    pub end: String,

    #[serde(default)]
    pub fields: Vec<RawProjectionField>,
}

impl RawProjection {
    pub fn build(&self) -> Result<ProjectionSpec> {
        let mut fields = Vec::with_capacity(self.fields.len());
        for (i, raw) in self.fields.iter().enumerate() {
            let source = raw.source.trim();
            if source.is_empty() {
                bail!(
                    "{}",
                    diagnostics::error_message(format!("projection field {} has no source", i + 1))
                );
            }
            let alias = Some(raw.alias.trim())
                .filter(|a| !a.is_empty())
                .map(str::to_string);
            fields.push(ProjectionField {
                source: source.to_string(),
                alias,
            });
        }

        Ok(ProjectionSpec {
            fields,
            start: or_default(&self.start, DEFAULT_START),
            end: or_default(&self.end, DEFAULT_END),
        })
    }
}

fn or_default(value: &str, default: &str) -> String {
    let v = value.trim();
    let chosen = if v.is_empty() { default } else { v };
    chosen.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn raw(op1: &str, operator: &str, op2: &str, modifier: &str) -> RawConstraint {
        RawConstraint {
            op1: op1.into(),
            operator: operator.into(),
            op2: op2.into(),
            modifier: modifier.into(),
        }
    }

    #[test]
    fn modifiers_parse_with_or_without_sign() {
        assert_eq!(raw("M1.sf", "<", "M2.sf", "+3").build(1).unwrap().modifier, Some(3));
        assert_eq!(raw("M1.sf", "<", "M2.sf", "-2").build(1).unwrap().modifier, Some(-2));
        assert_eq!(raw("M1.sf", "<", "M2.sf", "7").build(1).unwrap().modifier, Some(7));
        assert_eq!(raw("M1.sf", "<", "M2.sf", "").build(1).unwrap().modifier, None);
        assert!(raw("M1.sf", "<", "M2.sf", "+x").build(1).is_err());
    }

    #[test]
    fn unicode_operators_are_accepted() {
        assert_eq!(raw("a", "≤", "b", "").build(1).unwrap().op, ComparisonOp::Le);
        assert_eq!(raw("a", "≠", "b", "").build(1).unwrap().op, ComparisonOp::Ne);
        assert!(raw("a", "~", "b", "").build(2).is_err());
    }

    #[test]
    fn projection_defaults_boundaries() {
        let raw = RawProjection {
            fields: vec![RawProjectionField {
                source: "M1.arg1".into(),
                alias: "  ".into(),
            }],
            ..Default::default()
        };
        let spec = raw.build().unwrap();
        assert_eq!(spec.fields, vec![ProjectionField::new("M1.arg1")]);
        assert_eq!(spec.start, "M1.sf");
        assert_eq!(spec.end, "M2.ef");
    }
}
