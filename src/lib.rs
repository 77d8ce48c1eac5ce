//! ISEQL query compiler.
//!
//! Turns a two-operand temporal event request into a relational-algebra
//! expression and wraps it in a stored-procedure skeleton. Previously saved
//! events can be used as operands; their stored algebra is spliced in with
//! every positional leaf re-indexed so that no two leaves collide.

pub mod compile;
pub mod diagnostics;
pub mod model;
pub mod render;
pub mod request;
pub mod store;

pub use compile::{AliasPolicy, CompileOptions, Compiler};
pub use model::CompiledExpression;
pub use request::{Request, RequestDoc};
pub use store::{EventStore, FileStore, MemoryStore, SavedEvent};

pub type Result<T> = anyhow::Result<T>;
