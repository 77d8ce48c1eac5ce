//! Temporal relation between the two operands.

use crate::Result;
use crate::diagnostics;

use anyhow::bail;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A temporal parameter: a concrete number of frames, or no bound at all.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Bound {
    /// Decimal literal, rendered exactly as written (`30`, `-1`, `2.5`).
    Numeric(String),
    #[default]
    Unbounded,
}

impl Bound {
    pub fn frames(n: i64) -> Self {
        Bound::Numeric(n.to_string())
    }

    /// Parse a form value. Blank input means unbounded.
    pub fn parse(input: &str) -> Result<Self> {
        let s = input.trim();
        if s.is_empty() {
            return Ok(Bound::Unbounded);
        }
        if !is_decimal(s) {
            bail!(
                "{}",
                diagnostics::error_message(format!("bound must be a number, got {:?}", s))
            );
        }
        Ok(Bound::Numeric(s.to_string()))
    }
}

/// `[+-]digits[.digits]`
fn is_decimal(s: &str) -> bool {
    let unsigned = s.strip_prefix(['+', '-']).unwrap_or(s);
    let (whole, fraction) = match unsigned.split_once('.') {
        Some((w, f)) => (w, Some(f)),
        None => (unsigned, None),
    };
    let digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
    digits(whole) && fraction.is_none_or(digits)
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bound::Numeric(n) => f.write_str(n),
            Bound::Unbounded => f.write_str("d"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeqOrder {
    Before,
    After,
}

impl SeqOrder {
    pub fn tag(self) -> &'static str {
        match self {
            SeqOrder::Before => "Bef",
            SeqOrder::After => "Aft",
        }
    }
}

/// Overlap-style joins. Each one takes a start bound (δ), an end bound (ε), or both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlapKind {
    /// During join: the second interval contains the first.
    Dj,
    /// Reverse during join.
    Rdj,
    /// Left overlap join.
    Loj,
    /// Right overlap join.
    Roj,
    /// Start preceding.
    Sp,
    /// End following.
    Ef,
}

impl OverlapKind {
    pub const ALL: [OverlapKind; 6] = [
        OverlapKind::Dj,
        OverlapKind::Rdj,
        OverlapKind::Loj,
        OverlapKind::Roj,
        OverlapKind::Sp,
        OverlapKind::Ef,
    ];

    pub fn tag(self) -> &'static str {
        match self {
            OverlapKind::Dj => "DJ",
            OverlapKind::Rdj => "RDJ",
            OverlapKind::Loj => "LOJ",
            OverlapKind::Roj => "ROJ",
            OverlapKind::Sp => "SP",
            OverlapKind::Ef => "EF",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.tag() == tag)
    }

    pub fn uses_start(self) -> bool {
        !matches!(self, OverlapKind::Ef)
    }

    pub fn uses_end(self) -> bool {
        !matches!(self, OverlapKind::Sp)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelationSpec {
    Sequential { order: SeqOrder, gap: Bound },
    Overlap { kind: OverlapKind, start: Bound, end: Bound },
}

impl RelationSpec {
    pub fn before() -> Self {
        RelationSpec::Sequential {
            order: SeqOrder::Before,
            gap: Bound::Unbounded,
        }
    }
}

/// Raw relation block. Both the sequential and the overlap inputs are kept,
/// only the ones selected by `type` are read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRelation {
    #[serde(rename = "type", default)]
    pub kind: String,

    #[serde(default)]
    pub seq_order: String,

    #[serde(default)]
    pub seq_gap: String,

    #[serde(default)]
    pub overlap_type: String,

    #[serde(default)]
    pub delta: String,

    #[serde(default)]
    pub epsilon: String,
}

impl RawRelation {
    pub fn build(&self) -> Result<RelationSpec> {
        match self.kind.trim() {
            "sequential" => {
                let order = match self.seq_order.trim() {
                    "" | "before" => SeqOrder::Before,
                    "after" => SeqOrder::After,
                    other => bail!(
                        "{}",
                        diagnostics::error_message(format!("unknown sequential order {:?}", other))
                    ),
                };
                Ok(RelationSpec::Sequential {
                    order,
                    gap: Bound::parse(&self.seq_gap)?,
                })
            }
            "overlapping" | "overlap" => {
                let tag = self.overlap_type.trim();
                let Some(kind) = OverlapKind::from_tag(tag) else {
                    bail!(
                        "{}",
                        diagnostics::error_message(format!("unknown overlap type {:?}", tag))
                    );
                };
                Ok(RelationSpec::Overlap {
                    kind,
                    start: Bound::parse(&self.delta)?,
                    end: Bound::parse(&self.epsilon)?,
                })
            }
            "" => bail!(
                "{}",
                diagnostics::error_message("no temporal relation type selected")
            ),
            other => bail!(
                "{}",
                diagnostics::error_message(format!("unknown relation type {:?}", other))
            ),
        }
    }
}
