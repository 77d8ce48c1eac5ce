//! Operand slots: an atomic predicate or a reference to a saved event.
//!
//! JSON shape (one slot of the request document):
//! {
//!   "pred": "in",               // predicate name, or "EXISTING"
//!   "existName": "GivesKeys",   // saved event name when pred == "EXISTING"
//!   "args": { "arg1": "keys" }  // field filters, document order is kept
//! }

use crate::Result;
use crate::diagnostics;

use anyhow::bail;
use serde::{Deserialize, Serialize};

/// Predicate marker selecting a saved event instead of an atomic predicate.
pub const EXISTING: &str = "EXISTING";

/// One `field="value"` filter applied to an operand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldFilter {
    pub field: String,
    pub value: String,
}

impl FieldFilter {
    pub fn new(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperandKind {
    Atomic { predicate: String },
    Saved { name: String },
}

/// One side of the binary temporal relation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperandSpec {
    pub kind: OperandKind,
    pub filters: Vec<FieldFilter>,
}

impl OperandSpec {
    pub fn atomic(predicate: impl Into<String>) -> Self {
        Self {
            kind: OperandKind::Atomic {
                predicate: predicate.into(),
            },
            filters: Vec::new(),
        }
    }

    pub fn saved(name: impl Into<String>) -> Self {
        Self {
            kind: OperandKind::Saved { name: name.into() },
            filters: Vec::new(),
        }
    }

    pub fn with_filter(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.push(FieldFilter::new(field, value));
        self
    }
}

/// Raw operand slot as it appears in the request document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawOperand {
    #[serde(default)]
    pub pred: String,

    #[serde(default)]
    pub exist_name: String,

    #[serde(default, with = "args")]
    pub args: Vec<FieldFilter>,
}

impl RawOperand {
    /// Validate one slot. `slot` names it in error messages ("op1", "op2").
    pub fn build(&self, slot: &str) -> Result<OperandSpec> {
        let pred = self.pred.trim();
        if pred.is_empty() {
            bail!(
                "{}",
                diagnostics::error_message(format!("{} has no predicate selected", slot))
            );
        }

        let kind = if pred == EXISTING {
            let name = self.exist_name.trim();
            if name.is_empty() {
                bail!(
                    "{}",
                    diagnostics::error_message(format!(
                        "{} selects a saved event but names none",
                        slot
                    ))
                );
            }
            OperandKind::Saved {
                name: name.to_string(),
            }
        } else {
            OperandKind::Atomic {
                predicate: pred.to_string(),
            }
        };

        // Blank inputs mean "no filter".
        let filters = self
            .args
            .iter()
            .filter(|f| !f.value.trim().is_empty())
            .cloned()
            .collect();

        Ok(OperandSpec { kind, filters })
    }
}

/// `args` is a JSON object whose entry order matters (it is the order the
/// filters are rendered in), so it is read through a visitor rather than a map.
mod args {
    use super::FieldFilter;

    use serde::de::{MapAccess, Visitor};
    use serde::ser::SerializeMap;
    use serde::{Deserializer, Serializer};
    use std::fmt;

    pub fn serialize<S>(filters: &[FieldFilter], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(filters.len()))?;
        for f in filters {
            map.serialize_entry(&f.field, &f.value)?;
        }
        map.end()
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<FieldFilter>, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ArgsVisitor;

        impl<'de> Visitor<'de> for ArgsVisitor {
            type Value = Vec<FieldFilter>;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an object mapping field ids to filter values")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut out = Vec::new();
                while let Some((field, value)) = access.next_entry::<String, String>()? {
                    out.push(FieldFilter { field, value });
                }
                Ok(out)
            }
        }

        deserializer.deserialize_map(ArgsVisitor)
    }
}
