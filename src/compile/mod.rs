//! Expression assembly.
//!
//! Pipeline for one request:
//! 1. Resolve operand 1 at leaf index 1.
//! 2. Resolve operand 2 right after the slots operand 1 consumed.
//! 3. Remap `M1` / `M2` in constraints and projection onto those starts.
//! 4. Render operator, predicate and projection.
//! 5. Assemble the relational (or exclusion) expression and wrap it.

pub mod leaf;
pub mod operand;
pub mod projection;
pub mod relation;

pub use leaf::{LeafPattern, remap_var};
pub use operand::{OperandOrigin, OperandResolver, ResolvedOperand};
pub use projection::{AliasPolicy, Projection, render_projection};
pub use relation::{render_constraints, render_relation};

use crate::Result;
use crate::model::{CompiledExpression, render_signature};
use crate::render;
use crate::request::{ConstraintSpec, ProjectionField, Request};
use crate::store::EventStore;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompileOptions {
    pub alias_policy: AliasPolicy,
}

impl CompileOptions {
    /// Options for a compile whose result is going to be saved.
    pub fn for_save() -> Self {
        Self {
            alias_policy: AliasPolicy::Positional,
        }
    }
}

/// Compiles requests against a read-only view of the event store.
///
/// Compilation is a pure function of the request and the store contents;
/// the leaf counter lives on the stack of each `compile` call.
pub struct Compiler<'a> {
    store: &'a dyn EventStore,
    options: CompileOptions,
    leaves: LeafPattern,
}

impl<'a> Compiler<'a> {
    pub fn new(store: &'a dyn EventStore) -> Result<Self> {
        Self::with_options(store, CompileOptions::default())
    }

    pub fn with_options(store: &'a dyn EventStore, options: CompileOptions) -> Result<Self> {
        Ok(Self {
            store,
            options,
            leaves: LeafPattern::new()?,
        })
    }

    pub fn compile(&self, request: &Request) -> CompiledExpression {
        let resolver = OperandResolver::with_leaves(self.store, &request.name, self.leaves.clone());

        // Each operand consumes at most MAX_LEAF_INDEX slots.
        let mut counter = 1usize;
        let op1_start = counter;
        let op1 = resolver.resolve(&request.op1, op1_start);
        counter = counter.saturating_add(op1.consumed);

        let op2_start = counter;
        let op2 = resolver.resolve(&request.op2, op2_start);
        counter = counter.saturating_add(op2.consumed);

        tracing::debug!(
            event = %request.name,
            op1_start,
            op2_start,
            leaves = counter - 1,
            "operands resolved"
        );

        let constraints: Vec<ConstraintSpec> = request
            .constraints
            .iter()
            .map(|c| ConstraintSpec {
                left: remap_var(&c.left, op1_start, op2_start),
                right: remap_var(&c.right, op1_start, op2_start),
                ..c.clone()
            })
            .collect();
        let fields: Vec<ProjectionField> = request
            .projection
            .fields
            .iter()
            .map(|f| ProjectionField {
                source: remap_var(&f.source, op1_start, op2_start),
                alias: f.alias.clone(),
            })
            .collect();
        let start = remap_var(&request.projection.start, op1_start, op2_start);
        let end = remap_var(&request.projection.end, op1_start, op2_start);

        let predicate = render_constraints(&constraints);
        let projection = render_projection(&fields, &start, &end, self.options.alias_policy);

        let expression = if request.exclusion {
            render::render_exclusion(&projection.clause, &predicate, &op1.fragment, &op2.fragment)
        } else {
            render::render_relational(
                &projection.clause,
                &predicate,
                &op1.fragment,
                &render_relation(&request.relation),
                &op2.fragment,
            )
        };

        let signature_text = render_signature(&projection.signature);
        let procedure = render::render_procedure(&request.name, &signature_text, &expression);

        let mut issues = op1.issues;
        issues.extend(op2.issues);

        CompiledExpression {
            name: request.name.clone(),
            expression,
            signature: projection.signature,
            output_schema: projection.schema,
            procedure,
            op2_start,
            leaves: counter - 1,
            issues,
        }
    }
}
