//! Text rendering of assembled expressions and the procedure wrapper.

pub mod expression;
pub mod procedure;

pub use expression::{render_exclusion, render_relational};
pub use procedure::render_procedure;
