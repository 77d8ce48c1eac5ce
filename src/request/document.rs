//! Request document (request.json, and the `uiState` of a saved event).
//!
//! JSON shape:
//! {
//!   "name": "GivesKeys",
//!   "op1": { "pred": "in", "existName": "", "args": { "arg1": "keys" } },
//!   "op2": { "pred": "EXISTING", "existName": "HasPkg", "args": {} },
//!   "relation": { "type": "sequential", "seqOrder": "before", "seqGap": "",
//!                 "overlapType": "DJ", "delta": "", "epsilon": "" },
//!   "constraints": [ { "op1": "M1.arg1", "operator": "=", "op2": "M2.arg1", "mod": "" } ],
//!   "exclusion": false,
//!   "projection": { "start": "M1.sf", "end": "M2.ef",
//!                   "fields": [ { "source": "M1.arg1", "alias": "who" } ] }
//! }
//!
//! Empty strings mean "not supplied". `validate_and_build` runs the checks the
//! form used to run before generating, so the compiler itself never fails.

use crate::Result;
use crate::diagnostics;
use crate::request::clause::{ConstraintSpec, ProjectionSpec, RawConstraint, RawProjection};
use crate::request::operand::{OperandSpec, RawOperand};
use crate::request::relation::{RawRelation, RelationSpec};

use anyhow::{Context, bail};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequestDoc {
    /// Left out of a saved `uiState`, where the record's own name applies.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    #[serde(default)]
    pub op1: RawOperand,

    #[serde(default)]
    pub op2: RawOperand,

    #[serde(default)]
    pub relation: RawRelation,

    #[serde(default)]
    pub constraints: Vec<RawConstraint>,

    #[serde(default)]
    pub exclusion: bool,

    #[serde(default)]
    pub projection: RawProjection,
}

/// Validated compilation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub name: String,
    pub op1: OperandSpec,
    pub op2: OperandSpec,
    pub relation: RelationSpec,
    pub constraints: Vec<ConstraintSpec>,
    pub exclusion: bool,
    pub projection: ProjectionSpec,
}

impl Request {
    /// A request with no constraints and default boundaries.
    pub fn new(
        name: impl Into<String>,
        op1: OperandSpec,
        op2: OperandSpec,
        relation: RelationSpec,
    ) -> Self {
        Self {
            name: name.into(),
            op1,
            op2,
            relation,
            constraints: Vec::new(),
            exclusion: false,
            projection: ProjectionSpec::default(),
        }
    }
}

impl RequestDoc {
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text)
            .with_context(|| diagnostics::error_message("request document is not valid JSON"))
    }

    /// Validate every block and build the typed request.
    pub fn validate_and_build(&self) -> Result<Request> {
        let name = self.name.trim();
        if name.is_empty() {
            bail!("{}", diagnostics::error_message("event name is required"));
        }
        if !is_identifier(name) {
            bail!(
                "{}",
                diagnostics::error_message(format!(
                    "event name {:?} must be a plain identifier (letters, digits, '_')",
                    name
                ))
            );
        }

        let op1 = self.op1.build("op1")?;
        let op2 = self.op2.build("op2")?;
        let relation = self.relation.build()?;

        let constraints = self
            .constraints
            .iter()
            .enumerate()
            .map(|(i, c)| c.build(i + 1))
            .collect::<Result<Vec<_>>>()?;

        let projection = self.projection.build()?;

        Ok(Request {
            name: name.to_string(),
            op1,
            op2,
            relation,
            constraints,
            exclusion: self.exclusion,
            projection,
        })
    }
}

/// The name becomes a SQL function name and a leaf call `Name(M3)`.
fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::clause::{ComparisonOp, ProjectionField};
    use crate::request::relation::{Bound, SeqOrder};
    use pretty_assertions::assert_eq;

    const DOC: &str = r#"{
        "name": "GivesKeys",
        "op1": { "pred": "in", "existName": "", "args": { "arg1": "keys" } },
        "op2": { "pred": "hasPkg" },
        "relation": { "type": "sequential", "seqOrder": "after", "seqGap": "30" },
        "constraints": [ { "op1": "M1.arg2", "operator": "=", "op2": "M2.arg1", "mod": "+0" } ],
        "projection": { "fields": [ { "source": "M1.arg2", "alias": "who" } ] }
    }"#;

    #[test]
    fn builds_full_request() {
        let req = RequestDoc::from_json(DOC).unwrap().validate_and_build().unwrap();
        assert_eq!(req.name, "GivesKeys");
        assert_eq!(req.op1, OperandSpec::atomic("in").with_filter("arg1", "keys"));
        assert_eq!(req.op2, OperandSpec::atomic("hasPkg"));
        assert_eq!(
            req.relation,
            RelationSpec::Sequential {
                order: SeqOrder::After,
                gap: Bound::frames(30),
            }
        );
        assert_eq!(
            req.constraints,
            vec![ConstraintSpec::new("M1.arg2", ComparisonOp::Eq, "M2.arg1").with_modifier(0)]
        );
        assert!(!req.exclusion);
        assert_eq!(req.projection.fields, vec![ProjectionField::aliased("M1.arg2", "who")]);
    }

    #[test]
    fn name_is_required() {
        let mut doc = RequestDoc::from_json(DOC).unwrap();
        doc.name = "   ".into();
        let err = doc.validate_and_build().unwrap_err().to_string();
        assert_eq!(err, "iseql: event name is required");

        doc.name = "gives keys".into();
        assert!(doc.validate_and_build().is_err());
    }

    #[test]
    fn doc_survives_a_json_round_trip() {
        let doc = RequestDoc::from_json(DOC).unwrap();
        let value = serde_json::to_value(&doc).unwrap();
        let back: RequestDoc = serde_json::from_value(value).unwrap();
        assert_eq!(back, doc);
    }
}
