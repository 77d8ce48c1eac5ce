//! Request layer: the JSON request document and the validated request the
//! compiler consumes.

pub mod clause;
pub mod document;
pub mod operand;
pub mod relation;

pub use clause::{ComparisonOp, ConstraintSpec, ProjectionField, ProjectionSpec};
pub use document::{Request, RequestDoc};
pub use operand::{EXISTING, FieldFilter, OperandKind, OperandSpec};
pub use relation::{Bound, OverlapKind, RelationSpec, SeqOrder};
