//! Operand resolution: one operand slot in, one algebra fragment out, plus
//! the number of leaf indices the fragment occupies.

use crate::Result;
use crate::compile::leaf::{LeafPattern, MAX_LEAF_INDEX, leaf};
use crate::diagnostics;
use crate::model::ResolveIssue;
use crate::request::{FieldFilter, OperandKind, OperandSpec};
use crate::store::{EventStore, SchemaField};

use serde::Serialize;

/// Where a resolved fragment came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OperandOrigin {
    /// A selection over a single leaf.
    Atomic,
    /// A saved event spliced in from the store.
    Inlined,
    /// The stored version of the event currently being redefined.
    PriorVersion,
    /// `Name(Mk)`: the reference could not be expanded.
    Opaque,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedOperand {
    pub fragment: String,
    /// Leaf slots used, starting at the index the operand was resolved at.
    pub consumed: usize,
    pub origin: OperandOrigin,
    pub issues: Vec<ResolveIssue>,
}

/// Resolves operand slots against an event store.
///
/// `definition_in_progress` is the name of the event being compiled. A slot
/// that references it inlines whatever version the store holds, which is the
/// previous one: the new version is only stored after compilation returns.
/// Only the operand itself is compared, stored algebra is spliced as text and
/// never resolved again, so reference chains cannot loop.
pub struct OperandResolver<'a> {
    store: &'a dyn EventStore,
    definition_in_progress: &'a str,
    leaves: LeafPattern,
}

impl<'a> OperandResolver<'a> {
    pub fn new(store: &'a dyn EventStore, definition_in_progress: &'a str) -> Result<Self> {
        Ok(Self::with_leaves(
            store,
            definition_in_progress,
            LeafPattern::new()?,
        ))
    }

    pub(crate) fn with_leaves(
        store: &'a dyn EventStore,
        definition_in_progress: &'a str,
        leaves: LeafPattern,
    ) -> Self {
        Self {
            store,
            definition_in_progress,
            leaves,
        }
    }

    pub fn resolve(&self, spec: &OperandSpec, start: usize) -> ResolvedOperand {
        match &spec.kind {
            OperandKind::Atomic { predicate } => resolve_atomic(predicate, &spec.filters, start),
            OperandKind::Saved { name } => self.resolve_saved(name, &spec.filters, start),
        }
    }

    fn resolve_saved(&self, name: &str, filters: &[FieldFilter], start: usize) -> ResolvedOperand {
        let mut issues = Vec::new();
        let self_reference = name == self.definition_in_progress;

        let Some(evt) = self.store.get(name) else {
            if self_reference {
                tracing::debug!(event = name, "no stored version to redefine from");
            }
            record(
                &mut issues,
                ResolveIssue::UnresolvableReference {
                    name: name.to_string(),
                },
            );
            return opaque(name, filters, start, issues);
        };

        let Some(algebra) = evt.algebra() else {
            record(
                &mut issues,
                ResolveIssue::DegenerateSchema {
                    name: name.to_string(),
                    detail: "has no stored algebra, emitted as an opaque call".to_string(),
                },
            );
            return opaque(name, filters, start, issues);
        };

        let default_schema;
        let schema: &[SchemaField] = if evt.output_schema.is_empty() {
            record(
                &mut issues,
                ResolveIssue::DegenerateSchema {
                    name: name.to_string(),
                    detail: "declares no output schema, assuming arg1, arg2".to_string(),
                },
            );
            default_schema = SchemaField::default_schema();
            &default_schema
        } else {
            &evt.output_schema
        };

        let consumed = match self.leaves.max_leaf(algebra) {
            Some(max) if max > MAX_LEAF_INDEX => {
                record(
                    &mut issues,
                    ResolveIssue::MalformedStoredAlgebra {
                        name: name.to_string(),
                        detail: format!(
                            "uses leaf index {} (limit {}), emitted as an opaque call",
                            max, MAX_LEAF_INDEX
                        ),
                    },
                );
                return opaque(name, filters, start, issues);
            }
            Some(max) => max,
            None => {
                record(
                    &mut issues,
                    ResolveIssue::MalformedStoredAlgebra {
                        name: name.to_string(),
                        detail: "has no positional leaves, assuming one".to_string(),
                    },
                );
                1
            }
        };

        let shifted = self.leaves.shift(algebra, start.saturating_sub(1));
        let conditions = render_filters(filters, schema);
        let fragment = if conditions.is_empty() {
            format!("( \n {} \n )", shifted)
        } else {
            format!(
                "σ_{{ {} }} ( \n {} \n )",
                conditions.join(" ∧ "),
                shifted
            )
        };

        let origin = if self_reference {
            tracing::debug!(event = name, start, "inlining prior version of the event being redefined");
            OperandOrigin::PriorVersion
        } else {
            tracing::debug!(event = name, start, consumed, "inlined saved event");
            OperandOrigin::Inlined
        };

        ResolvedOperand {
            fragment,
            consumed,
            origin,
            issues,
        }
    }
}

fn resolve_atomic(predicate: &str, filters: &[FieldFilter], start: usize) -> ResolvedOperand {
    let mut conditions = vec![format!("pred=\"{}\"", predicate)];
    conditions.extend(render_filters(filters, &SchemaField::default_schema()));

    ResolvedOperand {
        fragment: format!("σ_{{ {} }}({})", conditions.join(" ∧ "), leaf(start)),
        consumed: 1,
        origin: OperandOrigin::Atomic,
        issues: Vec::new(),
    }
}

fn opaque(
    name: &str,
    filters: &[FieldFilter],
    start: usize,
    issues: Vec<ResolveIssue>,
) -> ResolvedOperand {
    if !filters.is_empty() {
        diagnostics::warn(format!(
            "filters on '{}' dropped, it cannot be expanded",
            name
        ));
    }
    ResolvedOperand {
        fragment: format!("{}({})", name, leaf(start)),
        consumed: 1,
        origin: OperandOrigin::Opaque,
        issues,
    }
}

/// `field="value"` conditions, schema fields first in schema order, then any
/// other filters in the order given.
fn render_filters(filters: &[FieldFilter], schema: &[SchemaField]) -> Vec<String> {
    let mut ordered: Vec<&FieldFilter> = Vec::with_capacity(filters.len());
    for field in schema {
        ordered.extend(filters.iter().filter(|f| f.field == field.id));
    }
    ordered.extend(
        filters
            .iter()
            .filter(|f| !schema.iter().any(|s| s.id == f.field)),
    );

    ordered
        .into_iter()
        .map(|f| format!("{}=\"{}\"", f.field, f.value))
        .collect()
}

fn record(issues: &mut Vec<ResolveIssue>, issue: ResolveIssue) {
    diagnostics::warn(&issue);
    issues.push(issue);
}
