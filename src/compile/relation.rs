//! Temporal operator and constraint predicate rendering.

use crate::request::{Bound, ConstraintSpec, RelationSpec};

/// Predicate used when there are no constraints.
pub const TAUTOLOGY: &str = "True";

/// `Bef_{δ=10}`, `DJ_{δ=d, ε=5}`, `EF_{ε=d}`, ...
pub fn render_relation(spec: &RelationSpec) -> String {
    match spec {
        RelationSpec::Sequential { order, gap } => format!("{}_{{δ={}}}", order.tag(), gap),
        RelationSpec::Overlap { kind, start, end } => {
            let mut params: Vec<String> = Vec::with_capacity(2);
            if kind.uses_start() {
                params.push(param("δ", start));
            }
            if kind.uses_end() {
                params.push(param("ε", end));
            }
            format!("{}_{{{}}}", kind.tag(), params.join(", "))
        }
    }
}

fn param(symbol: &str, bound: &Bound) -> String {
    format!("{}={}", symbol, bound)
}

/// Conjunction of constraints, variables already remapped.
pub fn render_constraints(constraints: &[ConstraintSpec]) -> String {
    if constraints.is_empty() {
        return TAUTOLOGY.to_string();
    }
    constraints
        .iter()
        .map(render_constraint)
        .collect::<Vec<_>>()
        .join(" ∧ ")
}

fn render_constraint(c: &ConstraintSpec) -> String {
    match c.modifier {
        // +0 is the form's placeholder, not an offset.
        Some(m) if m != 0 => format!("{} {} {} {:+}", c.left, c.op, c.right, m),
        _ => format!("{} {} {}", c.left, c.op, c.right),
    }
}
