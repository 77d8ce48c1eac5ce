use crate::Result;
use crate::store::{EventStore, SavedEvent};

/// In-memory event library. Keeps insertion order, like the JSON array it
/// is usually loaded from.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    events: Vec<SavedEvent>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Later records win when names repeat.
    pub fn from_events(events: impl IntoIterator<Item = SavedEvent>) -> Self {
        let mut store = Self::new();
        for evt in events {
            store.upsert(evt);
        }
        store
    }

    pub(crate) fn upsert(&mut self, event: SavedEvent) {
        self.events.retain(|e| e.name != event.name);
        self.events.push(event);
    }

    pub(crate) fn remove(&mut self, name: &str) -> bool {
        let before = self.events.len();
        self.events.retain(|e| e.name != name);
        self.events.len() != before
    }
}

impl EventStore for MemoryStore {
    fn get(&self, name: &str) -> Option<&SavedEvent> {
        self.events.iter().find(|e| e.name == name)
    }

    fn put(&mut self, event: SavedEvent) -> Result<()> {
        self.upsert(event);
        Ok(())
    }

    fn delete(&mut self, name: &str) -> Result<bool> {
        Ok(self.remove(name))
    }

    fn list(&self) -> &[SavedEvent] {
        &self.events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::SchemaField;

    fn names(store: &MemoryStore) -> Vec<&str> {
        store.list().iter().map(|e| e.name.as_str()).collect()
    }

    #[test]
    fn put_replaces_and_moves_to_end() {
        let mut store = MemoryStore::new();
        store.put(SavedEvent::stub("A", vec![])).unwrap();
        store.put(SavedEvent::stub("B", vec![])).unwrap();
        store
            .put(SavedEvent::stub("A", vec![SchemaField::new("x", "X")]))
            .unwrap();

        assert_eq!(names(&store), vec!["B", "A"]);
        assert_eq!(store.get("A").unwrap().output_schema.len(), 1);
    }

    #[test]
    fn delete_reports_whether_anything_went() {
        let mut store = MemoryStore::from_events([SavedEvent::stub("A", vec![])]);
        assert!(store.delete("A").unwrap());
        assert!(!store.delete("A").unwrap());
        assert!(store.get("A").is_none());
    }
}
