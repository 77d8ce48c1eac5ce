//! Event store: the library of previously compiled, named events.
//!
//! The compiler only reads through `EventStore::get`; mutations happen
//! between compilations (save, delete, import).

pub mod event;
pub mod exchange;
pub mod file;
pub mod memory;

pub use event::{SavedEvent, SchemaField};
pub use exchange::{export_event, import_event};
pub use file::FileStore;
pub use memory::MemoryStore;

use crate::Result;

pub trait EventStore {
    fn get(&self, name: &str) -> Option<&SavedEvent>;

    /// Upsert by name.
    fn put(&mut self, event: SavedEvent) -> Result<()>;

    /// Returns whether a record was removed.
    fn delete(&mut self, name: &str) -> Result<bool>;

    /// All records in library order.
    fn list(&self) -> &[SavedEvent];
}
